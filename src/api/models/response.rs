use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One submitted response to a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    #[serde(default)]
    pub response_id: String,
    #[serde(default)]
    pub create_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_submitted_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_email: Option<String>,
    /// Keyed by question id, not item id
    #[serde(default)]
    pub answers: HashMap<String, Answer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default)]
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_answers: Option<TextAnswers>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnswers {
    #[serde(default)]
    pub answers: Vec<TextAnswer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnswer {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseList {
    #[serde(default)]
    pub responses: Vec<FormResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl Answer {
    /// Text values of this answer in submission order
    pub fn text_values(&self) -> Vec<&str> {
        self.text_answers
            .as_ref()
            .map(|t| t.answers.iter().map(|a| a.value.as_str()).collect())
            .unwrap_or_default()
    }
}
