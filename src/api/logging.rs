//! Structured logging with correlation tracking for remote calls
//!
//! Every call gets a correlation id so the request, response and outcome
//! lines of one call can be matched up in the log file.

use log::{debug, info, warn};
use serde_json::json;
use std::time::{Duration, Instant};

/// Structured logger for API operations with correlation tracking
#[derive(Debug, Clone, Default)]
pub struct ApiLogger;

/// Context for a single API call
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Unique correlation ID for this call
    pub correlation_id: String,
    /// Remote operation name (forms.get, drive.files.delete, ...)
    pub operation: &'static str,
    /// Resource the call targets, usually a form or file id
    pub resource: String,
    /// Start time for performance tracking
    pub start_time: Instant,
}

impl ApiLogger {
    /// Start tracking a new call
    pub fn start_operation(&self, operation: &'static str, resource: &str) -> OperationContext {
        let context = OperationContext {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            operation,
            resource: resource.to_string(),
            start_time: Instant::now(),
        };

        let log_data = json!({
            "event": "operation_started",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "resource": context.resource,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        debug!("API Operation Started: {}", log_data);

        context
    }

    /// Log HTTP request details
    pub fn log_request(&self, context: &OperationContext, method: &str, url: &str) {
        let log_data = json!({
            "event": "http_request",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "method": method,
            "url": url,
        });
        debug!("HTTP Request: {}", log_data);
    }

    /// Log HTTP response details
    pub fn log_response(&self, context: &OperationContext, status_code: u16, duration: Duration) {
        let log_data = json!({
            "event": "http_response",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "resource": context.resource,
            "status_code": status_code,
            "duration_ms": duration.as_millis(),
        });

        if status_code >= 400 {
            warn!("HTTP Response (Error): {}", log_data);
        } else {
            debug!("HTTP Response: {}", log_data);
        }
    }

    /// Log the final outcome of a call
    pub fn complete_operation(&self, context: &OperationContext, error: Option<&str>) {
        let elapsed = context.start_time.elapsed();
        match error {
            None => info!(
                "{} {} completed in {}ms [{}]",
                context.operation,
                context.resource,
                elapsed.as_millis(),
                context.correlation_id
            ),
            Some(message) => warn!(
                "{} {} failed after {}ms [{}]: {}",
                context.operation,
                context.resource,
                elapsed.as_millis(),
                context.correlation_id,
                message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_context_has_unique_correlation_ids() {
        let logger = ApiLogger;
        let first = logger.start_operation("forms.get", "abc");
        let second = logger.start_operation("forms.get", "abc");

        assert_eq!(first.operation, "forms.get");
        assert_eq!(first.resource, "abc");
        assert_ne!(first.correlation_id, second.correlation_id);
    }
}
