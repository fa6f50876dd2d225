//! Response export to CSV
//!
//! Answers are keyed by question id, so grid rows each get their own column.

use anyhow::{Context, Result};

use crate::api::models::{Form, FormResponse, ItemKind, QuestionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub timestamps: bool,
    pub email: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timestamps: true,
            email: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseExport {
    pub csv: String,
    pub row_count: usize,
}

/// Question id and column title for every answerable question, in item order
pub fn question_columns(form: &Form) -> Vec<(String, String)> {
    let mut columns = Vec::new();

    for item in &form.items {
        match &item.kind {
            Some(ItemKind::QuestionItem(question_item)) => {
                if let Some(question_id) = &question_item.question.question_id {
                    let title = item
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("Question {}", question_id));
                    columns.push((question_id.clone(), title));
                }
            }
            Some(ItemKind::QuestionGroupItem(group)) => {
                let grid_title = item.title.as_deref().unwrap_or("Grid");
                for row in &group.questions {
                    let Some(question_id) = &row.question_id else {
                        continue;
                    };
                    let row_title = match &row.kind {
                        Some(QuestionKind::RowQuestion(row)) if !row.title.is_empty() => {
                            format!("{} - {}", grid_title, row.title)
                        }
                        _ => grid_title.to_string(),
                    };
                    columns.push((question_id.clone(), row_title));
                }
            }
            _ => {}
        }
    }

    columns
}

pub fn responses_to_csv(
    form: &Form,
    responses: &[FormResponse],
    options: ExportOptions,
) -> Result<ResponseExport> {
    if responses.is_empty() {
        return Ok(ResponseExport {
            csv: String::new(),
            row_count: 0,
        });
    }

    let columns = question_columns(form);
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(columns.len() + 2);
    if options.timestamps {
        header.push("Timestamp");
    }
    if options.email {
        header.push("Email");
    }
    header.extend(columns.iter().map(|(_, title)| title.as_str()));
    writer
        .write_record(&header)
        .context("Failed to write CSV header")?;

    for response in responses {
        let mut row = Vec::with_capacity(header.len());
        if options.timestamps {
            row.push(response.create_time.clone());
        }
        if options.email {
            row.push(response.respondent_email.clone().unwrap_or_default());
        }
        for (question_id, _) in &columns {
            let value = response
                .answers
                .get(question_id)
                .map(|answer| answer.text_values().join("; "))
                .unwrap_or_default();
            row.push(value);
        }
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write response {}", response.response_id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    let csv = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;

    Ok(ResponseExport {
        csv,
        row_count: responses.len(),
    })
}
