use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::{Duration, Instant};

use super::constants::{self, FORMS_BASE_URL};
use super::error::{ApiError, google_error_message};
use super::logging::ApiLogger;
use super::models::{
    BatchValueRanges, DriveFileList, Form, FormResponse, NewForm, ResponseList, Spreadsheet,
    ValueRange,
};
use super::operations::{BatchUpdateRequest, BatchUpdateResponse};
use super::service::{FormsService, SheetsService};

/// Authenticated client for the Forms, Drive and Sheets REST APIs.
///
/// Built once per process from an access token and passed by reference to
/// whatever needs it.
#[derive(Clone)]
pub struct GoogleClient {
    http_client: reqwest::Client,
    access_token: String,
    api_logger: ApiLogger,
}

impl GoogleClient {
    pub fn new(access_token: String) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)           // Max idle connections per host
            .pool_idle_timeout(Duration::from_secs(90))  // Keep connections alive for 90s
            .user_agent(concat!("gforms-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_custom_client(access_token, http_client)
    }

    /// Create a new client with custom HTTP client configuration
    pub fn with_custom_client(access_token: String, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            access_token,
            api_logger: ApiLogger::default(),
        }
    }

    /// Send one authenticated request and return the body of a 2xx response
    async fn send(
        &self,
        operation: &'static str,
        resource: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, ApiError> {
        let context = self.api_logger.start_operation(operation, resource);

        let request = request
            .bearer_auth(&self.access_token)
            .build()
            .map_err(|source| ApiError::Transport { operation, source })?;
        self.api_logger
            .log_request(&context, request.method().as_str(), request.url().as_str());

        let request_start = Instant::now();
        let response = match self.http_client.execute(request).await {
            Ok(response) => response,
            Err(source) => {
                self.api_logger
                    .complete_operation(&context, Some(&source.to_string()));
                return Err(ApiError::Transport { operation, source });
            }
        };

        let status = response.status();
        self.api_logger
            .log_response(&context, status.as_u16(), request_start.elapsed());

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport { operation, source })?;

        if !status.is_success() {
            let error = ApiError::remote(operation, status.as_u16(), google_error_message(&body));
            self.api_logger
                .complete_operation(&context, Some(&error.to_string()));
            return Err(error);
        }

        self.api_logger.complete_operation(&context, None);
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T, ApiError> {
        let body = if body.trim().is_empty() { "{}" } else { body };
        serde_json::from_str(body).map_err(|source| ApiError::Decode { operation, source })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        resource: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(operation, resource, request).await?;
        Self::decode(operation, &body)
    }
}

#[async_trait]
impl FormsService for GoogleClient {
    async fn create_form(&self, title: &str) -> Result<Form, ApiError> {
        let request = self
            .http_client
            .post(FORMS_BASE_URL)
            .json(&NewForm::titled(title));
        self.send_json("forms.create", title, request).await
    }

    async fn get_form(&self, form_id: &str) -> Result<Form, ApiError> {
        let request = self.http_client.get(constants::form_endpoint(form_id));
        self.send_json("forms.get", form_id, request).await
    }

    async fn batch_update(
        &self,
        form_id: &str,
        request: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, ApiError> {
        let http_request = self
            .http_client
            .post(constants::batch_update_endpoint(form_id))
            .json(request);
        self.send_json("forms.batchUpdate", form_id, http_request)
            .await
    }

    async fn rename_file(&self, file_id: &str, name: &str) -> Result<(), ApiError> {
        let request = self
            .http_client
            .patch(constants::drive_file_endpoint(file_id))
            .query(&[("fields", "id,name")])
            .json(&json!({ "name": name }));
        self.send("drive.files.update", file_id, request).await?;
        Ok(())
    }

    async fn list_form_files(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<DriveFileList, ApiError> {
        let mut params = vec![
            ("q", constants::form_files_query()),
            ("pageSize", page_size.to_string()),
            ("fields", "files(id,name,webViewLink),nextPageToken".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let request = self.http_client.get(constants::DRIVE_FILES_URL).query(&params);
        self.send_json("drive.files.list", "forms", request).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), ApiError> {
        let request = self
            .http_client
            .delete(constants::drive_file_endpoint(file_id));
        self.send("drive.files.delete", file_id, request).await?;
        Ok(())
    }

    async fn list_responses(
        &self,
        form_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ResponseList, ApiError> {
        let mut params = vec![("pageSize", page_size.to_string())];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let request = self
            .http_client
            .get(constants::responses_endpoint(form_id))
            .query(&params);
        self.send_json("forms.responses.list", form_id, request)
            .await
    }

    async fn get_response(&self, form_id: &str, response_id: &str) -> Result<FormResponse, ApiError> {
        let request = self
            .http_client
            .get(constants::response_endpoint(form_id, response_id));
        self.send_json("forms.responses.get", response_id, request)
            .await
    }
}

#[async_trait]
impl SheetsService for GoogleClient {
    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, ApiError> {
        let request = self
            .http_client
            .get(constants::spreadsheet_endpoint(spreadsheet_id))
            .query(&[("includeGridData", "false")]);
        self.send_json("sheets.spreadsheets.get", spreadsheet_id, request)
            .await
    }

    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange, ApiError> {
        let request = self
            .http_client
            .get(constants::values_endpoint(spreadsheet_id, range))
            .query(&[
                ("valueRenderOption", "FORMATTED_VALUE"),
                ("dateTimeRenderOption", "FORMATTED_STRING"),
            ]);
        self.send_json("sheets.values.get", spreadsheet_id, request)
            .await
    }

    async fn batch_get_values(
        &self,
        spreadsheet_id: &str,
        ranges: &[String],
    ) -> Result<BatchValueRanges, ApiError> {
        let mut params: Vec<(&str, &str)> = ranges.iter().map(|r| ("ranges", r.as_str())).collect();
        params.push(("valueRenderOption", "FORMATTED_VALUE"));
        params.push(("dateTimeRenderOption", "FORMATTED_STRING"));

        let request = self
            .http_client
            .get(constants::values_batch_get_endpoint(spreadsheet_id))
            .query(&params);
        self.send_json("sheets.values.batchGet", spreadsheet_id, request)
            .await
    }
}
