//! Form engines built on top of [`FormsService`](crate::api::FormsService)
//!
//! Every engine takes the service by reference, re-fetches whatever form
//! structure it needs and reports partial failure through its result type.

pub mod builder;
pub mod duplicate;
pub mod export;
pub mod manage;
pub mod personalize;
pub mod sanitize;
pub mod template;

pub use builder::{
    NewQuestion, QuestionParams, QuestionSpec, QuestionType, SingleQuestion, parse_question_type,
};
pub use duplicate::{DuplicateOptions, DuplicationMode, DuplicationResult, Strategy, duplicate};
pub use export::{ExportOptions, ResponseExport, responses_to_csv};
pub use manage::{CreatedForm, FormListing, FormSummary, ItemPatch};
pub use personalize::{PersonalizationResult, Replacements, personalize};
pub use sanitize::{sanitize, strip_line_breaks, without_identifiers};
pub use template::{FormTemplate, TemplateQuestion, TemplateResult, apply_template, export_template};

use crate::api::models::Item;

/// An item an engine could not write, and why
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Position of the item in the form it was read from
    pub index: usize,
    pub item_id: Option<String>,
    pub title: Option<String>,
    pub reason: String,
}

impl ItemFailure {
    pub fn for_item(index: usize, item: &Item, reason: impl Into<String>) -> Self {
        Self {
            index,
            item_id: item.item_id.clone(),
            title: item.title.clone(),
            reason: reason.into(),
        }
    }

    /// Title for display, falling back to the position
    pub fn label(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => format!("item {}", self.index + 1),
        }
    }
}
