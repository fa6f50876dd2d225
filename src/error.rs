//! Local (non-remote) error types

use thiserror::Error;

/// Input the tool refuses before or instead of calling the service
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("unsupported question type '{0}'")]
    UnknownQuestionType(String),
    #[error("item with ID '{0}' not found in form")]
    ItemNotFound(String),
    #[error("no fields to update")]
    NoFields,
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,
    #[error("invalid spreadsheet URL: {0}")]
    InvalidSpreadsheetUrl(String),
    #[error("{question_type} questions need at least one entry in '{parameter}'")]
    MissingParameter {
        question_type: &'static str,
        parameter: &'static str,
    },
    #[error("'{parameter}' does not apply to {question_type} questions")]
    UnusedParameter {
        question_type: &'static str,
        parameter: &'static str,
    },
    #[error("template is missing '{0}'")]
    MissingTemplateField(&'static str),
}

/// Missing or unusable local configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing OAuth credentials: {}. Run 'gforms auth setup' to configure them", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("environment file not found: {0}")]
    EnvFileNotFound(String),
    #[error("failed to load environment file '{path}': {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}
