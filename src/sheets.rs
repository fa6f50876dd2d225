//! Read-only Google Sheets access: metadata, range reads and CSV export

use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::api::models::Spreadsheet;
use crate::api::{ApiError, SheetsService};
use crate::error::ValidationError;

static SPREADSHEET_URL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("spreadsheet id pattern is valid"));

/// Remote failures translated into something a user can act on
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("spreadsheet not found: {0}")]
    NotFound(String),
    #[error(
        "access denied to spreadsheet: {0}. Make sure you have view access and have re-authenticated with 'gforms auth setup'"
    )]
    AccessDenied(String),
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn classify(error: ApiError, spreadsheet_id: &str, range: Option<&str>) -> SheetsError {
    match (error.status(), range) {
        (Some(404), _) => SheetsError::NotFound(spreadsheet_id.to_string()),
        (Some(403), _) => SheetsError::AccessDenied(spreadsheet_id.to_string()),
        (Some(400), Some(range)) => SheetsError::InvalidRange(range.to_string()),
        _ => SheetsError::Api(error),
    }
}

/// Accept a bare spreadsheet id or a Sheets URL containing `/d/<id>`
pub fn extract_spreadsheet_id(id_or_url: &str) -> Result<String, ValidationError> {
    let input = id_or_url.trim();
    if input.contains("docs.google.com") || input.contains("sheets.google.com") {
        return SPREADSHEET_URL_ID
            .captures(input)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string())
            .ok_or_else(|| ValidationError::InvalidSpreadsheetUrl(input.to_string()));
    }
    Ok(input.to_string())
}

/// A1 notation for an optional sheet name and optional cell range
pub fn build_range(sheet: Option<&str>, range: Option<&str>) -> String {
    let quoted = sheet.map(|name| format!("'{}'", name.replace('\'', "''")));
    match (quoted, range) {
        (Some(sheet), Some(range)) => format!("{}!{}", sheet, range),
        (Some(sheet), None) => sheet,
        (None, Some(range)) => range.to_string(),
        (None, None) => "A:ZZ".to_string(),
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Pad jagged rows with empty cells so every row has the same length
pub fn normalize_values(rows: &[Vec<Value>]) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(cell_text).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect()
}

/// Values read from one range
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub range: String,
    pub values: Vec<Vec<String>>,
}

impl SheetData {
    fn new(range: String, rows: &[Vec<Value>]) -> Self {
        Self {
            range,
            values: normalize_values(rows),
        }
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn column_count(&self) -> usize {
        self.values.first().map(Vec::len).unwrap_or(0)
    }
}

pub async fn get_spreadsheet<S>(service: &S, id_or_url: &str) -> Result<Spreadsheet>
where
    S: SheetsService + ?Sized,
{
    let spreadsheet_id = extract_spreadsheet_id(id_or_url)?;
    debug!("Fetching spreadsheet {}", spreadsheet_id);

    let spreadsheet = service
        .get_spreadsheet(&spreadsheet_id)
        .await
        .map_err(|err| classify(err, &spreadsheet_id, None))?;
    Ok(spreadsheet)
}

pub async fn read_values<S>(
    service: &S,
    id_or_url: &str,
    sheet: Option<&str>,
    range: Option<&str>,
) -> Result<SheetData>
where
    S: SheetsService + ?Sized,
{
    let spreadsheet_id = extract_spreadsheet_id(id_or_url)?;
    let range = build_range(sheet, range);
    info!("Reading {} from spreadsheet {}", range, spreadsheet_id);

    let values = service
        .get_values(&spreadsheet_id, &range)
        .await
        .map_err(|err| classify(err, &spreadsheet_id, Some(&range)))?;

    let returned_range = if values.range.is_empty() {
        range
    } else {
        values.range
    };
    Ok(SheetData::new(returned_range, &values.values))
}

/// Read several ranges in one call
pub async fn read_batch<S>(service: &S, id_or_url: &str, ranges: &[String]) -> Result<Vec<SheetData>>
where
    S: SheetsService + ?Sized,
{
    let spreadsheet_id = extract_spreadsheet_id(id_or_url)?;
    info!("Reading {} ranges from spreadsheet {}", ranges.len(), spreadsheet_id);

    let batch = service
        .batch_get_values(&spreadsheet_id, ranges)
        .await
        .map_err(|err| classify(err, &spreadsheet_id, None))?;

    Ok(batch
        .value_ranges
        .into_iter()
        .map(|value_range| SheetData::new(value_range.range, &value_range.values))
        .collect())
}

/// Render a range as CSV; an empty range renders as an empty string
pub fn to_csv(data: &SheetData) -> Result<String> {
    if data.values.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &data.values {
        writer
            .write_record(row)
            .context("Failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub async fn export_csv<S>(
    service: &S,
    id_or_url: &str,
    sheet: Option<&str>,
    range: Option<&str>,
) -> Result<String>
where
    S: SheetsService + ?Sized,
{
    let data = read_values(service, id_or_url, sheet, range).await?;
    to_csv(&data)
}
