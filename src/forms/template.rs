//! YAML form templates: create a form from a template, or export one

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::ItemFailure;
use super::builder::{NewQuestion, QuestionParams, QuestionSpec, QuestionType, parse_question_type};
use super::manage::{CreatedForm, add_question, create_form};
use super::sanitize::strip_line_breaks;
use crate::api::FormsService;
use crate::api::models::{ChoiceType, Form, QuestionKind};
use crate::error::ValidationError;

const TEMPLATE_HEADER: &str = "\
# Google Forms Template
# Created by: gforms forms export-template
#
# Usage: gforms forms apply this_file.yaml
#
# Supported question types:
#   - SHORT_ANSWER
#   - PARAGRAPH
#   - MULTIPLE_CHOICE (with options)
#   - CHECKBOXES (with options)
#   - DROPDOWN (with options)
#   - LINEAR_SCALE (with low, high, lowLabel, highLabel)
#   - DATE
#   - TIME
#   - RATING (with high)
#   - MULTIPLE_CHOICE_GRID (with rows, columns)
#   - CHECKBOX_GRID (with rows, columns)
#   - FILE_UPLOAD (with folderId, maxFiles, maxFileSize, allowedTypes)
#
";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<TemplateForm>,
    #[serde(default)]
    pub questions: Vec<TemplateQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_question_type() -> String {
    QuestionType::ShortAnswer.as_str().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuestion {
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_types: Vec<String>,
}

impl FormTemplate {
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml_bw::from_str(text).context("Failed to parse form template")
    }

    /// Title and description of the form to create
    pub fn form_info(&self) -> Result<(&str, Option<&str>), ValidationError> {
        let form = self
            .form
            .as_ref()
            .ok_or(ValidationError::MissingTemplateField("form"))?;
        let title = form
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .ok_or(ValidationError::MissingTemplateField("form.title"))?;
        Ok((title, form.description.as_deref()))
    }

    /// YAML text with the usage header
    pub fn render(&self) -> Result<String> {
        let yaml = serde_yaml_bw::to_string(self).context("Failed to render form template")?;
        Ok(format!("{}{}", TEMPLATE_HEADER, yaml))
    }
}

impl TemplateQuestion {
    pub fn to_new_question(&self) -> Result<NewQuestion, ValidationError> {
        let question_type = parse_question_type(&self.question_type)?;
        let params = QuestionParams {
            options: self.options.clone(),
            low: self.low,
            high: self.high,
            low_label: self.low_label.clone(),
            high_label: self.high_label.clone(),
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            folder_id: self.folder_id.clone(),
            max_files: self.max_files,
            max_file_size: self.max_file_size,
            allowed_types: self.allowed_types.clone(),
            ..QuestionParams::default()
        };

        Ok(NewQuestion::new(
            strip_line_breaks(&self.title).trim(),
            QuestionSpec::from_params(question_type, &params)?,
        )
        .required(self.required.unwrap_or(false))
        .description(self.description.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct TemplateResult {
    pub form: CreatedForm,
    pub questions_added: usize,
    pub failures: Vec<ItemFailure>,
}

/// Create the form, then add questions one at a time.
///
/// A failed question does not advance the insert position, so later
/// questions keep their relative order without gaps.
pub async fn apply_template<S>(service: &S, template: &FormTemplate) -> Result<TemplateResult>
where
    S: FormsService + ?Sized,
{
    let (title, description) = template.form_info()?;
    let form = create_form(service, title, description).await?;
    info!(
        "Applying template with {} questions to form {}",
        template.questions.len(),
        form.form_id
    );

    let mut position = 0;
    let mut failures = Vec::new();

    for (index, question) in template.questions.iter().enumerate() {
        let outcome = match question.to_new_question() {
            Ok(new_question) => {
                add_question(service, &form.form_id, &new_question, Some(position)).await
            }
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok(_) => position += 1,
            Err(err) => {
                warn!("Failed to add question '{}': {:#}", question.title, err);
                failures.push(ItemFailure {
                    index,
                    item_id: None,
                    title: Some(question.title.clone()),
                    reason: format!("{:#}", err),
                });
            }
        }
    }

    Ok(TemplateResult {
        form,
        questions_added: position,
        failures,
    })
}

/// Template for the question items of `form`; other item kinds are skipped
pub fn export_template(form: &Form) -> FormTemplate {
    let questions = form
        .items
        .iter()
        .filter_map(|item| {
            let question = item.question()?;
            let mut exported = TemplateQuestion {
                title: item.title.clone().unwrap_or_else(|| "Untitled".to_string()),
                description: item.description.clone(),
                required: Some(question.is_required()),
                ..TemplateQuestion::default()
            };

            let question_type = match &question.kind {
                Some(QuestionKind::TextQuestion(text)) if text.paragraph.unwrap_or(false) => {
                    QuestionType::Paragraph
                }
                Some(QuestionKind::ChoiceQuestion(choice)) => {
                    exported.options = choice
                        .options
                        .iter()
                        .map(|option| option.value.clone().unwrap_or_default())
                        .collect();
                    match choice.choice_type {
                        ChoiceType::Radio => QuestionType::MultipleChoice,
                        ChoiceType::Checkbox => QuestionType::Checkboxes,
                        ChoiceType::DropDown => QuestionType::Dropdown,
                    }
                }
                Some(QuestionKind::ScaleQuestion(scale)) => {
                    exported.low = Some(scale.low);
                    exported.high = Some(scale.high);
                    exported.low_label = scale.low_label.clone().filter(|l| !l.is_empty());
                    exported.high_label = scale.high_label.clone().filter(|l| !l.is_empty());
                    QuestionType::LinearScale
                }
                Some(QuestionKind::DateQuestion(_)) => QuestionType::Date,
                Some(QuestionKind::TimeQuestion(_)) => QuestionType::Time,
                Some(QuestionKind::FileUploadQuestion(upload)) => {
                    exported.folder_id = Some(upload.folder_id.clone()).filter(|id| !id.is_empty());
                    exported.max_files = Some(upload.max_files.unwrap_or(1));
                    QuestionType::FileUpload
                }
                _ => QuestionType::ShortAnswer,
            };
            exported.question_type = question_type.as_str().to_string();

            Some(exported)
        })
        .collect();

    FormTemplate {
        form: Some(TemplateForm {
            title: Some(form.info.title.clone().unwrap_or_else(|| "Untitled".to_string())),
            description: Some(form.description().to_string()),
        }),
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::builder::SingleQuestion;
    use serde_json::json;

    const TEMPLATE: &str = r#"
form:
  title: Onboarding
  description: For new starters
questions:
  - type: short_answer
    title: "Your\nname"
    required: true
  - type: MULTIPLE_CHOICE
    title: Team
    options: [Sales, Support]
  - type: LINEAR_SCALE
    title: Mood
    low: 0
    high: 10
    lowLabel: Low
  - title: Anything else?
"#;

    #[test]
    fn test_parse_template() {
        let template = FormTemplate::parse(TEMPLATE).unwrap();
        assert_eq!(template.form_info().unwrap(), ("Onboarding", Some("For new starters")));
        assert_eq!(template.questions.len(), 4);
        assert_eq!(template.questions[3].question_type, "SHORT_ANSWER");

        let first = template.questions[0].to_new_question().unwrap();
        assert_eq!(first.title, "Your name");
        assert!(first.required);

        let scale = template.questions[2].to_new_question().unwrap();
        assert_eq!(
            scale.spec,
            QuestionSpec::Single(SingleQuestion::Scale {
                low: 0,
                high: 10,
                low_label: Some("Low".to_string()),
                high_label: None
            })
        );
    }

    #[test]
    fn test_missing_form_section() {
        let template = FormTemplate::parse("questions: []\n").unwrap();
        assert_eq!(
            template.form_info(),
            Err(ValidationError::MissingTemplateField("form"))
        );

        let template = FormTemplate::parse("form:\n  description: x\n").unwrap();
        assert_eq!(
            template.form_info(),
            Err(ValidationError::MissingTemplateField("form.title"))
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let question = TemplateQuestion {
            question_type: "SLIDER".to_string(),
            title: "x".to_string(),
            ..TemplateQuestion::default()
        };
        assert_eq!(
            question.to_new_question(),
            Err(ValidationError::UnknownQuestionType("SLIDER".to_string()))
        );
    }

    #[test]
    fn test_export_template_infers_types() {
        let form: Form = serde_json::from_value(json!({
            "formId": "f",
            "info": {"title": "Survey", "description": "Tell us"},
            "items": [
                {"itemId": "1", "title": "Bio", "questionItem": {"question": {"required": true, "textQuestion": {"paragraph": true}}}},
                {"itemId": "2", "title": "Section", "pageBreakItem": {}},
                {"itemId": "3", "title": "Pick", "questionItem": {"question": {"choiceQuestion": {"type": "CHECKBOX", "options": [{"value": "A"}, {"value": "B"}]}}}},
                {"itemId": "4", "title": "When", "questionItem": {"question": {"dateQuestion": {}}}},
                {"itemId": "5", "title": "Stars", "questionItem": {"question": {"ratingQuestion": {"ratingScaleLevel": 5, "iconType": "STAR"}}}}
            ]
        }))
        .unwrap();

        let template = export_template(&form);
        let types: Vec<_> = template
            .questions
            .iter()
            .map(|q| q.question_type.as_str())
            .collect();
        assert_eq!(types, vec!["PARAGRAPH", "CHECKBOXES", "DATE", "SHORT_ANSWER"]);
        assert_eq!(template.questions[1].options, vec!["A", "B"]);
        assert_eq!(template.questions[0].required, Some(true));

        let rendered = template.render().unwrap();
        assert!(rendered.starts_with("# Google Forms Template"));
        let reparsed = FormTemplate::parse(&rendered).unwrap();
        assert_eq!(reparsed, template);
    }
}
