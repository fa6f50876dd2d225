//! Service traits the form and sheet engines are written against

use async_trait::async_trait;

use super::error::ApiError;
use super::models::{
    BatchValueRanges, DriveFileList, Form, FormResponse, ResponseList, Spreadsheet, ValueRange,
};
use super::operations::{BatchUpdateRequest, BatchUpdateResponse};

/// Remote Forms and Drive operations.
///
/// Every method issues exactly one HTTP call, maps non-2xx answers to
/// [`ApiError::Remote`] and never retries.
#[async_trait]
pub trait FormsService: Send + Sync {
    /// `forms.create`; only the title is honoured by the service
    async fn create_form(&self, title: &str) -> Result<Form, ApiError>;

    /// `forms.get`
    async fn get_form(&self, form_id: &str) -> Result<Form, ApiError>;

    /// `forms.batchUpdate`, applied atomically and in array order
    async fn batch_update(
        &self,
        form_id: &str,
        request: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, ApiError>;

    /// `drive.files.update` of the document name
    async fn rename_file(&self, file_id: &str, name: &str) -> Result<(), ApiError>;

    /// `drive.files.list` restricted to form documents
    async fn list_form_files(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<DriveFileList, ApiError>;

    /// `drive.files.delete`
    async fn delete_file(&self, file_id: &str) -> Result<(), ApiError>;

    /// `forms.responses.list`
    async fn list_responses(
        &self,
        form_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ResponseList, ApiError>;

    /// `forms.responses.get`
    async fn get_response(&self, form_id: &str, response_id: &str) -> Result<FormResponse, ApiError>;
}

/// Read-only Sheets operations
#[async_trait]
pub trait SheetsService: Send + Sync {
    /// `spreadsheets.get` without grid data
    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, ApiError>;

    /// `spreadsheets.values.get` with formatted values
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange, ApiError>;

    /// `spreadsheets.values.batchGet` with formatted values
    async fn batch_get_values(
        &self,
        spreadsheet_id: &str,
        ranges: &[String],
    ) -> Result<BatchValueRanges, ApiError>;
}
