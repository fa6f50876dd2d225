use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::item::Item;

/// A Google Form as returned by `forms.get`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default)]
    pub form_id: String,
    #[serde(default)]
    pub info: FormInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<FormSettings>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_sheet_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Drive-visible document name; only writable on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Form-wide settings. Fields not modelled here are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_settings: Option<QuizSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    #[serde(default)]
    pub is_quiz: bool,
}

impl Form {
    pub fn title(&self) -> &str {
        self.info.title.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.info.description.as_deref().unwrap_or("")
    }

    /// Position of an item in the current item sequence
    pub fn item_index(&self, item_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.item_id.as_deref() == Some(item_id))
    }
}

impl FormSettings {
    /// A wildcard settings replace is rejected unless the quiz flag is explicit
    pub fn with_explicit_quiz_flag(mut self) -> Self {
        if self.quiz_settings.is_none() {
            self.quiz_settings = Some(QuizSettings { is_quiz: false });
        }
        self
    }

    pub fn not_a_quiz() -> Self {
        Self {
            quiz_settings: Some(QuizSettings { is_quiz: false }),
            extra: Map::new(),
        }
    }
}

/// Body of `forms.create`; only the title fields are honoured by the service
#[derive(Debug, Clone, Serialize)]
pub struct NewForm {
    pub info: FormInfo,
}

impl NewForm {
    pub fn titled(title: &str) -> Self {
        Self {
            info: FormInfo {
                title: Some(title.to_string()),
                document_title: Some(title.to_string()),
                description: None,
            },
        }
    }
}

pub fn edit_uri(form_id: &str) -> String {
    format!("https://docs.google.com/forms/d/{}/edit", form_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_preserve_unknown_fields() {
        let settings: FormSettings = serde_json::from_value(json!({
            "emailCollectionType": "VERIFIED"
        }))
        .unwrap();

        assert!(settings.quiz_settings.is_none());
        let replaced = serde_json::to_value(settings.with_explicit_quiz_flag()).unwrap();
        assert_eq!(
            replaced,
            json!({"quizSettings": {"isQuiz": false}, "emailCollectionType": "VERIFIED"})
        );
    }

    #[test]
    fn test_existing_quiz_flag_is_kept() {
        let settings = FormSettings {
            quiz_settings: Some(QuizSettings { is_quiz: true }),
            extra: Map::new(),
        };
        assert_eq!(
            settings.with_explicit_quiz_flag().quiz_settings,
            Some(QuizSettings { is_quiz: true })
        );
    }

    #[test]
    fn test_item_index_lookup() {
        let form: Form = serde_json::from_value(json!({
            "formId": "f1",
            "info": {"title": "Survey"},
            "items": [
                {"itemId": "a", "textItem": {}},
                {"itemId": "b", "pageBreakItem": {}}
            ]
        }))
        .unwrap();

        assert_eq!(form.item_index("b"), Some(1));
        assert_eq!(form.item_index("zzz"), None);
        assert_eq!(form.title(), "Survey");
        assert_eq!(form.description(), "");
    }
}
