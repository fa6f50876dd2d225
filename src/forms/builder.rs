//! Building new question items from a question type and its parameters

use std::fmt;
use std::str::FromStr;

use super::sanitize::strip_line_breaks;
use crate::api::models::{
    ChoiceOption, ChoiceQuestion, ChoiceType, DateQuestion, FileUploadQuestion, Grid, Item,
    ItemKind, Question, QuestionGroupItem, QuestionItem, QuestionKind, RatingQuestion,
    RowQuestion, ScaleQuestion, TextQuestion, TimeQuestion,
};
use crate::error::ValidationError;

/// Default upload limit: 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: i64 = 10 * 1024 * 1024;

/// The question types a user can ask for by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    ShortAnswer,
    Paragraph,
    MultipleChoice,
    Checkboxes,
    Dropdown,
    LinearScale,
    Date,
    Time,
    FileUpload,
    MultipleChoiceGrid,
    CheckboxGrid,
    Rating,
}

impl QuestionType {
    pub const ALL: [QuestionType; 12] = [
        QuestionType::ShortAnswer,
        QuestionType::Paragraph,
        QuestionType::MultipleChoice,
        QuestionType::Checkboxes,
        QuestionType::Dropdown,
        QuestionType::LinearScale,
        QuestionType::Date,
        QuestionType::Time,
        QuestionType::FileUpload,
        QuestionType::MultipleChoiceGrid,
        QuestionType::CheckboxGrid,
        QuestionType::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ShortAnswer => "SHORT_ANSWER",
            QuestionType::Paragraph => "PARAGRAPH",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::Checkboxes => "CHECKBOXES",
            QuestionType::Dropdown => "DROPDOWN",
            QuestionType::LinearScale => "LINEAR_SCALE",
            QuestionType::Date => "DATE",
            QuestionType::Time => "TIME",
            QuestionType::FileUpload => "FILE_UPLOAD",
            QuestionType::MultipleChoiceGrid => "MULTIPLE_CHOICE_GRID",
            QuestionType::CheckboxGrid => "CHECKBOX_GRID",
            QuestionType::Rating => "RATING",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        QuestionType::ALL
            .into_iter()
            .find(|question_type| question_type.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownQuestionType(s.to_string()))
    }
}

pub fn parse_question_type(name: &str) -> Result<QuestionType, ValidationError> {
    name.parse()
}

/// Per-type parameters as they arrive from the command line or a template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionParams {
    pub options: Vec<String>,
    pub low: Option<i32>,
    pub high: Option<i32>,
    pub low_label: Option<String>,
    pub high_label: Option<String>,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub folder_id: Option<String>,
    pub max_files: Option<i32>,
    pub max_file_size: Option<i64>,
    pub allowed_types: Vec<String>,
    pub include_time: Option<bool>,
    pub include_year: Option<bool>,
    pub duration: Option<bool>,
}

impl QuestionParams {
    /// Names of the parameters that were actually given
    fn given(&self) -> Vec<&'static str> {
        [
            ("options", !self.options.is_empty()),
            ("low", self.low.is_some()),
            ("high", self.high.is_some()),
            ("low-label", self.low_label.is_some()),
            ("high-label", self.high_label.is_some()),
            ("rows", !self.rows.is_empty()),
            ("columns", !self.columns.is_empty()),
            ("folder-id", self.folder_id.is_some()),
            ("max-files", self.max_files.is_some()),
            ("max-file-size", self.max_file_size.is_some()),
            ("allowed-types", !self.allowed_types.is_empty()),
            ("include-time", self.include_time.is_some()),
            ("include-year", self.include_year.is_some()),
            ("duration", self.duration.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, given)| given.then_some(name))
        .collect()
    }
}

impl QuestionType {
    /// Parameters a question of this type accepts
    fn parameters(&self) -> &'static [&'static str] {
        match self {
            QuestionType::ShortAnswer | QuestionType::Paragraph => &[],
            QuestionType::MultipleChoice | QuestionType::Checkboxes | QuestionType::Dropdown => {
                &["options"]
            }
            QuestionType::LinearScale => &["low", "high", "low-label", "high-label"],
            QuestionType::Rating => &["high"],
            QuestionType::Date => &["include-time", "include-year"],
            QuestionType::Time => &["duration"],
            QuestionType::FileUpload => &["folder-id", "max-files", "max-file-size", "allowed-types"],
            QuestionType::MultipleChoiceGrid | QuestionType::CheckboxGrid => &["rows", "columns"],
        }
    }
}

/// Configuration of a question that stands on its own
#[derive(Debug, Clone, PartialEq)]
pub enum SingleQuestion {
    ShortAnswer,
    Paragraph,
    Choice {
        kind: ChoiceType,
        options: Vec<String>,
    },
    Scale {
        low: i32,
        high: i32,
        low_label: Option<String>,
        high_label: Option<String>,
    },
    Rating {
        high: i32,
    },
    Date {
        include_time: bool,
        include_year: bool,
    },
    Time {
        duration: bool,
    },
    FileUpload {
        folder_id: String,
        max_files: i32,
        max_file_size: i64,
        types: Vec<String>,
    },
}

/// Configuration of a new question: a single question, or a grid of row questions
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionSpec {
    Single(SingleQuestion),
    Grid {
        kind: ChoiceType,
        rows: Vec<String>,
        columns: Vec<String>,
    },
}

fn require(
    question_type: QuestionType,
    values: &[String],
    parameter: &'static str,
) -> Result<Vec<String>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::MissingParameter {
            question_type: question_type.as_str(),
            parameter,
        });
    }
    Ok(values.to_vec())
}

impl QuestionSpec {
    /// Fill in the configuration for `question_type`, defaulting what `params` leaves out.
    ///
    /// Parameters the type does not take are rejected, as are choice questions
    /// without options and grids without rows or columns.
    pub fn from_params(
        question_type: QuestionType,
        params: &QuestionParams,
    ) -> Result<Self, ValidationError> {
        if let Some(parameter) = params
            .given()
            .into_iter()
            .find(|name| !question_type.parameters().contains(name))
        {
            return Err(ValidationError::UnusedParameter {
                question_type: question_type.as_str(),
                parameter,
            });
        }

        let choice_question = |kind| -> Result<SingleQuestion, ValidationError> {
            Ok(SingleQuestion::Choice {
                kind,
                options: require(question_type, &params.options, "options")?,
            })
        };
        let grid_question = |kind| -> Result<QuestionSpec, ValidationError> {
            Ok(QuestionSpec::Grid {
                kind,
                rows: require(question_type, &params.rows, "rows")?,
                columns: require(question_type, &params.columns, "columns")?,
            })
        };

        let single = match question_type {
            QuestionType::ShortAnswer => SingleQuestion::ShortAnswer,
            QuestionType::Paragraph => SingleQuestion::Paragraph,
            QuestionType::MultipleChoice => choice_question(ChoiceType::Radio)?,
            QuestionType::Checkboxes => choice_question(ChoiceType::Checkbox)?,
            QuestionType::Dropdown => choice_question(ChoiceType::DropDown)?,
            QuestionType::LinearScale => SingleQuestion::Scale {
                low: params.low.unwrap_or(1),
                high: params.high.unwrap_or(5),
                low_label: params.low_label.clone(),
                high_label: params.high_label.clone(),
            },
            QuestionType::Rating => SingleQuestion::Rating {
                high: params.high.unwrap_or(5),
            },
            QuestionType::Date => SingleQuestion::Date {
                include_time: params.include_time.unwrap_or(false),
                include_year: params.include_year.unwrap_or(true),
            },
            QuestionType::Time => SingleQuestion::Time {
                duration: params.duration.unwrap_or(false),
            },
            QuestionType::FileUpload => SingleQuestion::FileUpload {
                folder_id: params.folder_id.clone().unwrap_or_default(),
                max_files: params.max_files.unwrap_or(1),
                max_file_size: params.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
                types: params.allowed_types.clone(),
            },
            QuestionType::MultipleChoiceGrid => return grid_question(ChoiceType::Radio),
            QuestionType::CheckboxGrid => return grid_question(ChoiceType::Checkbox),
        };
        Ok(QuestionSpec::Single(single))
    }
}

fn choice(kind: ChoiceType, values: &[String]) -> ChoiceQuestion {
    ChoiceQuestion {
        choice_type: kind,
        options: values
            .iter()
            .map(|value| ChoiceOption::new(strip_line_breaks(value)))
            .collect(),
        shuffle: None,
    }
}

/// A question about to be added to a form
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub spec: QuestionSpec,
}

impl NewQuestion {
    pub fn new(title: impl Into<String>, spec: QuestionSpec) -> Self {
        Self {
            title: title.into(),
            description: None,
            required: false,
            spec,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    /// The `createItem` payload: a grid becomes a question group, anything else a single question
    pub fn to_item(&self) -> Item {
        let kind = match &self.spec {
            QuestionSpec::Grid {
                kind,
                rows,
                columns,
            } => ItemKind::QuestionGroupItem(QuestionGroupItem {
                questions: rows
                    .iter()
                    .map(|row| Question {
                        required: self.required.then_some(true),
                        kind: Some(QuestionKind::RowQuestion(RowQuestion {
                            title: strip_line_breaks(row),
                        })),
                        ..Question::default()
                    })
                    .collect(),
                grid: Some(Grid {
                    columns: choice(*kind, columns),
                    shuffle_questions: None,
                }),
                image: None,
            }),
            QuestionSpec::Single(single) => ItemKind::QuestionItem(QuestionItem {
                question: Question {
                    required: Some(self.required),
                    kind: Some(question_kind(single)),
                    ..Question::default()
                },
                image: None,
            }),
        };

        Item {
            item_id: None,
            title: Some(strip_line_breaks(&self.title)),
            description: self.description.as_deref().map(strip_line_breaks),
            kind: Some(kind),
        }
    }
}

fn question_kind(single: &SingleQuestion) -> QuestionKind {
    match single {
        SingleQuestion::ShortAnswer => QuestionKind::TextQuestion(TextQuestion {
            paragraph: Some(false),
        }),
        SingleQuestion::Paragraph => QuestionKind::TextQuestion(TextQuestion {
            paragraph: Some(true),
        }),
        SingleQuestion::Choice { kind, options } => {
            QuestionKind::ChoiceQuestion(choice(*kind, options))
        }
        SingleQuestion::Scale {
            low,
            high,
            low_label,
            high_label,
        } => QuestionKind::ScaleQuestion(ScaleQuestion {
            low: *low,
            high: *high,
            low_label: low_label.as_deref().map(strip_line_breaks),
            high_label: high_label.as_deref().map(strip_line_breaks),
        }),
        SingleQuestion::Rating { high } => QuestionKind::RatingQuestion(RatingQuestion {
            rating_scale_level: *high,
            icon_type: Some("STAR".to_string()),
        }),
        SingleQuestion::Date {
            include_time,
            include_year,
        } => QuestionKind::DateQuestion(DateQuestion {
            include_time: Some(*include_time),
            include_year: Some(*include_year),
        }),
        SingleQuestion::Time { duration } => QuestionKind::TimeQuestion(TimeQuestion {
            duration: Some(*duration),
        }),
        SingleQuestion::FileUpload {
            folder_id,
            max_files,
            max_file_size,
            types,
        } => QuestionKind::FileUploadQuestion(FileUploadQuestion {
            folder_id: folder_id.clone(),
            types: types.clone(),
            max_files: Some(*max_files),
            max_file_size: Some(max_file_size.to_string()),
        }),
    }
}
