use thiserror::Error;

/// Failure of a single remote call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status
    #[error("{operation} failed with status {status}: {message}")]
    Remote {
        operation: &'static str,
        status: u16,
        message: String,
    },
    /// The request never produced a response
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The response body was not the expected document
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn remote(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            operation,
            status,
            message: message.into(),
        }
    }

    /// HTTP status for remote failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode { .. } => None,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Remote { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => operation,
        }
    }
}

/// Pull `error.message` out of a Google error document, falling back to the raw body
pub fn google_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|doc| {
            doc.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_error_message() {
        let body = r#"{"error": {"code": 400, "message": "Invalid requests[3].createItem", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(google_error_message(body), "Invalid requests[3].createItem");
        assert_eq!(google_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(google_error_message("  "), "empty response body");
    }

    #[test]
    fn test_remote_error_display() {
        let err = ApiError::remote("forms.get", 404, "Requested entity was not found.");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.operation(), "forms.get");
        assert_eq!(
            err.to_string(),
            "forms.get failed with status 404: Requested entity was not found."
        );
    }
}
