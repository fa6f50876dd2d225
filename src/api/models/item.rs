//! Form items and the questions nested inside them
//!
//! Google encodes the kind of an item (and of a question) by which one of
//! several optional keys is present. Here those keys become enum variants,
//! flattened into the parent struct so the JSON shape stays identical.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of a form's top-level item sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Server-assigned identifier, never chosen by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` when the item carries a kind this model does not know
    #[serde(flatten)]
    pub kind: Option<ItemKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    QuestionItem(QuestionItem),
    QuestionGroupItem(QuestionGroupItem),
    PageBreakItem(PageBreakItem),
    TextItem(TextItem),
    ImageItem(ImageItem),
    VideoItem(VideoItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub question: Question,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
}

/// A grid: several row questions answered against shared column options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionGroupItem {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub columns: ChoiceQuestion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_questions: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBreakItem {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextItem {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    pub image: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoItem {
    pub video: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Item {
    /// Human-readable name of the item kind, used in listings
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            Some(ItemKind::QuestionItem(q)) => q.question.kind_name(),
            Some(ItemKind::QuestionGroupItem(_)) => "Grid",
            Some(ItemKind::PageBreakItem(_)) => "Section",
            Some(ItemKind::TextItem(_)) => "Text",
            Some(ItemKind::ImageItem(_)) => "Image",
            Some(ItemKind::VideoItem(_)) => "Video",
            None => "Unknown",
        }
    }

    pub fn question(&self) -> Option<&Question> {
        match &self.kind {
            Some(ItemKind::QuestionItem(q)) => Some(&q.question),
            _ => None,
        }
    }
}

/// The answerable payload of a question item, or one row of a grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Server-assigned; responses key their answers by this id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading: Option<Value>,
    #[serde(flatten)]
    pub kind: Option<QuestionKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    ChoiceQuestion(ChoiceQuestion),
    TextQuestion(TextQuestion),
    ScaleQuestion(ScaleQuestion),
    DateQuestion(DateQuestion),
    TimeQuestion(TimeQuestion),
    FileUploadQuestion(FileUploadQuestion),
    RowQuestion(RowQuestion),
    RatingQuestion(RatingQuestion),
}

impl Question {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            Some(QuestionKind::ChoiceQuestion(c)) => match c.choice_type {
                ChoiceType::Radio => "Multiple choice",
                ChoiceType::Checkbox => "Checkboxes",
                ChoiceType::DropDown => "Dropdown",
            },
            Some(QuestionKind::TextQuestion(t)) if t.paragraph.unwrap_or(false) => "Paragraph",
            Some(QuestionKind::TextQuestion(_)) => "Short answer",
            Some(QuestionKind::ScaleQuestion(_)) => "Linear scale",
            Some(QuestionKind::DateQuestion(_)) => "Date",
            Some(QuestionKind::TimeQuestion(_)) => "Time",
            Some(QuestionKind::FileUploadQuestion(_)) => "File upload",
            Some(QuestionKind::RowQuestion(_)) => "Grid row",
            Some(QuestionKind::RatingQuestion(_)) => "Rating",
            None => "Question",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    #[serde(rename = "type")]
    pub choice_type: ChoiceType,
    /// Display order is meaningful and must be preserved
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoiceType {
    Radio,
    Checkbox,
    DropDown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_other: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_to_action: Option<String>,
    /// Item id of a section in the same form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_to_section_id: Option<String>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleQuestion {
    #[serde(default)]
    pub low: i32,
    #[serde(default)]
    pub high: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_year: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadQuestion {
    #[serde(default)]
    pub folder_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<i32>,
    /// int64 values travel as JSON strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowQuestion {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingQuestion {
    #[serde(default)]
    pub rating_scale_level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
}
