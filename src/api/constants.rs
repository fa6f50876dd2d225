//! API constants and endpoint builders for the Google Forms, Drive and Sheets APIs

/// Forms API v1 collection root
pub const FORMS_BASE_URL: &str = "https://forms.googleapis.com/v1/forms";

/// Drive API v3 files collection root
pub const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

/// Sheets API v4 spreadsheets collection root
pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// OAuth 2.0 token endpoint
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Drive mime type of Google Forms documents
pub const FORM_MIME_TYPE: &str = "application/vnd.google-apps.form";

/// Default chunk size for batched duplication
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// OAuth scopes required by the tool
pub mod scopes {
    pub const FORMS_BODY: &str = "https://www.googleapis.com/auth/forms.body";
    pub const FORMS_RESPONSES_READONLY: &str =
        "https://www.googleapis.com/auth/forms.responses.readonly";
    pub const DRIVE_FILE: &str = "https://www.googleapis.com/auth/drive.file";
    pub const SPREADSHEETS_READONLY: &str =
        "https://www.googleapis.com/auth/spreadsheets.readonly";

    pub const ALL: [&str; 4] = [FORMS_BODY, FORMS_RESPONSES_READONLY, DRIVE_FILE, SPREADSHEETS_READONLY];
}

/// Build the URL of a single form
pub fn form_endpoint(form_id: &str) -> String {
    format!("{}/{}", FORMS_BASE_URL, urlencoding::encode(form_id))
}

/// Build the batch update URL of a form
pub fn batch_update_endpoint(form_id: &str) -> String {
    format!("{}:batchUpdate", form_endpoint(form_id))
}

/// Build the responses collection URL of a form
pub fn responses_endpoint(form_id: &str) -> String {
    format!("{}/responses", form_endpoint(form_id))
}

/// Build the URL of a single response
pub fn response_endpoint(form_id: &str, response_id: &str) -> String {
    format!(
        "{}/{}",
        responses_endpoint(form_id),
        urlencoding::encode(response_id)
    )
}

/// Build the URL of a Drive file
pub fn drive_file_endpoint(file_id: &str) -> String {
    format!("{}/{}", DRIVE_FILES_URL, urlencoding::encode(file_id))
}

/// Build the URL of a spreadsheet
pub fn spreadsheet_endpoint(spreadsheet_id: &str) -> String {
    format!("{}/{}", SHEETS_BASE_URL, urlencoding::encode(spreadsheet_id))
}

/// Build the URL for reading one range of values
pub fn values_endpoint(spreadsheet_id: &str, range: &str) -> String {
    format!(
        "{}/values/{}",
        spreadsheet_endpoint(spreadsheet_id),
        urlencoding::encode(range)
    )
}

/// Build the URL for reading several ranges at once
pub fn values_batch_get_endpoint(spreadsheet_id: &str) -> String {
    format!("{}/values:batchGet", spreadsheet_endpoint(spreadsheet_id))
}

/// Drive query selecting only form documents
pub fn form_files_query() -> String {
    format!("mimeType='{}' and trashed=false", FORM_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(
            batch_update_endpoint("abc123"),
            "https://forms.googleapis.com/v1/forms/abc123:batchUpdate"
        );
        assert_eq!(
            response_endpoint("abc", "r1"),
            "https://forms.googleapis.com/v1/forms/abc/responses/r1"
        );
        assert_eq!(
            values_endpoint("sid", "'My Sheet'!A1:B2"),
            "https://sheets.googleapis.com/v4/spreadsheets/sid/values/%27My%20Sheet%27%21A1%3AB2"
        );
    }
}
