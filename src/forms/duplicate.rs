//! Copying a form's settings and items into a new form
//!
//! The batched mode submits every write as one `batchUpdate` (or a few
//! ordered chunks of at most `chunk_size` operations), which brings a form
//! of any size down to three remote calls in the common case. The
//! sequential mode issues one call per item and keeps going past failures.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fmt;
use std::time::{Duration, Instant};

use super::ItemFailure;
use super::manage::describe_new_form;
use super::sanitize::sanitize;
use crate::api::constants::DEFAULT_CHUNK_SIZE;
use crate::api::models::{Form, edit_uri};
use crate::api::{FormsService, Operation, Operations};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicationMode {
    #[default]
    Batched,
    Sequential,
}

#[derive(Debug, Clone)]
pub struct DuplicateOptions {
    /// Maximum operations per batch call; must be at least 1
    pub chunk_size: usize,
    pub mode: DuplicationMode,
}

impl Default for DuplicateOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            mode: DuplicationMode::Batched,
        }
    }
}

/// How the item writes were submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    SingleBatch,
    Chunked { chunks: usize },
    Sequential,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::SingleBatch => write!(f, "single batch"),
            Strategy::Chunked { chunks } => write!(f, "chunked batch ({} chunks)", chunks),
            Strategy::Sequential => write!(f, "sequential"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DuplicationResult {
    pub new_form_id: String,
    pub responder_uri: Option<String>,
    pub edit_uri: String,
    pub copied_items: usize,
    pub total_items: usize,
    /// Remote calls issued, including failed ones
    pub api_calls: usize,
    pub elapsed: Duration,
    pub strategy: Strategy,
    /// Items that were not copied
    pub failures: Vec<ItemFailure>,
    /// Non-item problems (description, settings) that did not stop the copy
    pub warnings: Vec<String>,
}

impl DuplicationResult {
    pub fn is_complete(&self) -> bool {
        self.copied_items == self.total_items && self.warnings.is_empty()
    }
}

struct Progress {
    api_calls: usize,
    copied: usize,
    failures: Vec<ItemFailure>,
    warnings: Vec<String>,
}

/// Duplicate `source_form_id` into a new form titled `new_title`.
///
/// Fails outright only when the source cannot be read or the destination
/// cannot be created. Everything after that is reported in the result.
pub async fn duplicate<S>(
    service: &S,
    source_form_id: &str,
    new_title: &str,
    options: &DuplicateOptions,
) -> Result<DuplicationResult>
where
    S: FormsService + ?Sized,
{
    if options.chunk_size == 0 {
        return Err(ValidationError::InvalidChunkSize.into());
    }

    let start = Instant::now();
    info!(
        "Duplicating form {} as '{}' ({:?}, chunk size {})",
        source_form_id, new_title, options.mode, options.chunk_size
    );

    let source = service
        .get_form(source_form_id)
        .await
        .with_context(|| format!("Failed to fetch source form {}", source_form_id))?;

    let destination = service
        .create_form(new_title)
        .await
        .with_context(|| format!("Failed to create form '{}'", new_title))?;
    let form_id = destination.form_id.clone();
    info!("Created destination form {}", form_id);

    let mut progress = Progress {
        api_calls: 2,
        copied: 0,
        failures: Vec::new(),
        warnings: Vec::new(),
    };

    let description = source.description();
    if !description.is_empty() {
        progress.api_calls += 1;
        if let Err(err) = describe_new_form(service, &form_id, description).await {
            warn!("Failed to copy description to {}: {}", form_id, err);
            progress
                .warnings
                .push(format!("Description not copied: {}", err));
        }
    }

    let strategy = match options.mode {
        DuplicationMode::Batched => {
            copy_batched(service, &form_id, &source, options.chunk_size, &mut progress).await
        }
        DuplicationMode::Sequential => {
            copy_sequential(service, &form_id, &source, &mut progress).await
        }
    };

    let result = DuplicationResult {
        edit_uri: edit_uri(&form_id),
        new_form_id: form_id,
        responder_uri: destination.responder_uri,
        copied_items: progress.copied,
        total_items: source.items.len(),
        api_calls: progress.api_calls,
        elapsed: start.elapsed(),
        strategy,
        failures: progress.failures,
        warnings: progress.warnings,
    };

    info!(
        "Duplication finished: {}/{} items, {} calls, {} in {:.2}s",
        result.copied_items,
        result.total_items,
        result.api_calls,
        result.strategy,
        result.elapsed.as_secs_f64()
    );
    Ok(result)
}

/// Settings replace for the copy, present only when the source has settings.
///
/// A wildcard mask is refused unless the quiz flag is spelled out.
fn settings_operation(source: &Form) -> Option<Operation> {
    source
        .settings
        .as_ref()
        .filter(|settings| settings.quiz_settings.is_some() || !settings.extra.is_empty())
        .map(|settings| Operation::update_settings(settings.clone().with_explicit_quiz_flag(), "*"))
}

async fn copy_batched<S>(
    service: &S,
    form_id: &str,
    source: &Form,
    chunk_size: usize,
    progress: &mut Progress,
) -> Strategy
where
    S: FormsService + ?Sized,
{
    let mut operations = Operations::new();
    let has_settings = match settings_operation(source) {
        Some(operation) => {
            operations.push(operation);
            true
        }
        None => false,
    };

    // Indices are absolute destination positions; chunks apply in order so
    // each chunk appends behind the items its predecessors created.
    for (index, item) in source.items.iter().enumerate() {
        operations.push(Operation::create_item(sanitize(item), index));
    }

    if operations.len() <= chunk_size {
        if !operations.is_empty() {
            submit_chunks(service, form_id, source, vec![operations], has_settings, progress).await;
        }
        return Strategy::SingleBatch;
    }

    let chunks = operations.chunks(chunk_size);
    let count = chunks.len();
    submit_chunks(service, form_id, source, chunks, has_settings, progress).await;
    Strategy::Chunked { chunks: count }
}

async fn submit_chunks<S>(
    service: &S,
    form_id: &str,
    source: &Form,
    chunks: Vec<Operations>,
    has_settings: bool,
    progress: &mut Progress,
) where
    S: FormsService + ?Sized,
{
    let total = chunks.len();
    let mut next_item = 0;

    for (number, chunk) in chunks.iter().enumerate() {
        let items_in_chunk = chunk.create_item_count();
        progress.api_calls += 1;

        match service.batch_update(form_id, &chunk.to_request()).await {
            Ok(_) => {
                progress.copied += items_in_chunk;
                next_item += items_in_chunk;
                info!(
                    "Chunk {}/{} committed ({} operations, {} items)",
                    number + 1,
                    total,
                    chunk.len(),
                    items_in_chunk
                );
            }
            Err(err) => {
                warn!("Chunk {}/{} failed: {}", number + 1, total, err);

                if number == 0 && has_settings {
                    progress
                        .warnings
                        .push(format!("Settings not copied: {}", err));
                }

                let failed_end = next_item + items_in_chunk;
                let reason = err.to_string();
                for index in next_item..failed_end {
                    progress
                        .failures
                        .push(ItemFailure::for_item(index, &source.items[index], reason.as_str()));
                }

                let skipped = format!("Not attempted: chunk {} of {} failed", number + 1, total);
                for index in failed_end..source.items.len() {
                    progress
                        .failures
                        .push(ItemFailure::for_item(index, &source.items[index], skipped.as_str()));
                }
                break;
            }
        }
    }
}

async fn copy_sequential<S>(
    service: &S,
    form_id: &str,
    source: &Form,
    progress: &mut Progress,
) -> Strategy
where
    S: FormsService + ?Sized,
{
    if let Some(operation) = settings_operation(source) {
        progress.api_calls += 1;
        if let Err(err) = service
            .batch_update(form_id, &Operations::from(operation).to_request())
            .await
        {
            warn!("Failed to copy settings to {}: {}", form_id, err);
            progress
                .warnings
                .push(format!("Settings not copied: {}", err));
        }
    }

    for (index, item) in source.items.iter().enumerate() {
        // Position among the items actually created, so a failure leaves no gap
        let request = Operations::new()
            .create_item(sanitize(item), progress.copied)
            .to_request();
        progress.api_calls += 1;

        match service.batch_update(form_id, &request).await {
            Ok(_) => progress.copied += 1,
            Err(err) => {
                warn!("Failed to copy item {} of {}: {}", index + 1, source.items.len(), err);
                progress
                    .failures
                    .push(ItemFailure::for_item(index, item, err.to_string()));
            }
        }
    }

    Strategy::Sequential
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::FormSettings;
    use serde_json::json;

    #[test]
    fn test_settings_operation_forces_quiz_flag() {
        let mut source = Form::default();
        assert!(settings_operation(&source).is_none());

        source.settings = Some(FormSettings::default());
        assert!(settings_operation(&source).is_none());

        source.settings = Some(
            serde_json::from_value::<FormSettings>(json!({"emailCollectionType": "VERIFIED"}))
                .unwrap(),
        );
        let operation = settings_operation(&source).unwrap();
        assert_eq!(
            serde_json::to_value(&operation).unwrap(),
            json!({
                "updateSettings": {
                    "settings": {"quizSettings": {"isQuiz": false}, "emailCollectionType": "VERIFIED"},
                    "updateMask": "*"
                }
            })
        );
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Chunked { chunks: 3 }.to_string(), "chunked batch (3 chunks)");
        assert_eq!(Strategy::SingleBatch.to_string(), "single batch");
    }
}
