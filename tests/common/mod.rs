//! In-memory stand-in for the Forms, Drive and Sheets services
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use gforms_cli::api::models::{
    BatchValueRanges, DriveFile, DriveFileList, FormResponse, ItemKind, ResponseList, Spreadsheet,
    ValueRange,
};
use gforms_cli::api::{
    ApiError, BatchUpdateRequest, BatchUpdateResponse, Form, FormsService, Operation,
    SheetsService,
};

/// Every remote call the fake received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateForm(String),
    GetForm(String),
    BatchUpdate(String, BatchUpdateRequest),
    RenameFile(String, String),
    ListFormFiles,
    DeleteFile(String),
    ListResponses(String, Option<String>),
    GetResponse(String, String),
    GetSpreadsheet(String),
    GetValues(String, String),
    BatchGetValues(String, Vec<String>),
}

#[derive(Default)]
struct State {
    forms: HashMap<String, Form>,
    form_order: Vec<String>,
    responses: HashMap<String, Vec<FormResponse>>,
    spreadsheets: HashMap<String, (Spreadsheet, HashMap<String, ValueRange>)>,
    calls: Vec<Call>,
    batch_update_count: usize,
    failing_batch_updates: HashSet<usize>,
    failing_renames: bool,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeService {
    state: Mutex<State>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `form` as if it already existed remotely, assigning missing ids
    pub fn insert_form(&self, mut form: Form) -> String {
        let mut state = self.state.lock().unwrap();
        for item in &mut form.items {
            assign_ids(&mut state.next_id, item);
        }
        let form_id = form.form_id.clone();
        state.form_order.push(form_id.clone());
        state.forms.insert(form_id.clone(), form);
        form_id
    }

    pub fn insert_responses(&self, form_id: &str, responses: Vec<FormResponse>) {
        let mut state = self.state.lock().unwrap();
        state.responses.insert(form_id.to_string(), responses);
    }

    pub fn insert_spreadsheet(&self, spreadsheet: Spreadsheet, ranges: Vec<ValueRange>) {
        let mut state = self.state.lock().unwrap();
        let ranges = ranges
            .into_iter()
            .map(|range| (range.range.clone(), range))
            .collect();
        state
            .spreadsheets
            .insert(spreadsheet.spreadsheet_id.clone(), (spreadsheet, ranges));
    }

    /// Make the `n`th batch update call (1-based) fail with a 500
    pub fn fail_batch_update(&self, n: usize) {
        self.state.lock().unwrap().failing_batch_updates.insert(n);
    }

    pub fn fail_renames(&self) {
        self.state.lock().unwrap().failing_renames = true;
    }

    pub fn form(&self, form_id: &str) -> Option<Form> {
        self.state.lock().unwrap().forms.get(form_id).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Bodies of every batch update sent, including failed ones
    pub fn batch_requests(&self) -> Vec<BatchUpdateRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::BatchUpdate(_, request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn fresh_id(next_id: &mut usize, prefix: &str) -> String {
    *next_id += 1;
    format!("{}{}", prefix, next_id)
}

fn assign_ids(next_id: &mut usize, item: &mut gforms_cli::api::Item) {
    if item.item_id.is_none() {
        item.item_id = Some(fresh_id(next_id, "item"));
    }
    match &mut item.kind {
        Some(ItemKind::QuestionItem(question_item)) => {
            if question_item.question.question_id.is_none() {
                question_item.question.question_id = Some(fresh_id(next_id, "q"));
            }
        }
        Some(ItemKind::QuestionGroupItem(group)) => {
            for row in &mut group.questions {
                if row.question_id.is_none() {
                    row.question_id = Some(fresh_id(next_id, "q"));
                }
            }
        }
        _ => {}
    }
}

fn invalid(message: impl Into<String>) -> ApiError {
    ApiError::remote("forms.batchUpdate", 400, message)
}

fn masked(mask: &str, field: &str) -> bool {
    mask == "*" || mask.split(',').any(|f| f.trim() == field)
}

/// Apply one operation to `form`, returning its reply
fn apply(form: &mut Form, operation: &Operation, next_id: &mut usize) -> Result<Value, ApiError> {
    match operation {
        Operation::UpdateFormInfo(update) => {
            if masked(&update.update_mask, "title") {
                form.info.title = update.info.title.clone();
            }
            if masked(&update.update_mask, "description") {
                form.info.description = update.info.description.clone();
            }
            Ok(json!({}))
        }
        Operation::UpdateSettings(update) => {
            if update.update_mask == "*" && update.settings.quiz_settings.is_none() {
                return Err(invalid("quizSettings.isQuiz is required"));
            }
            form.settings = Some(update.settings.clone());
            Ok(json!({}))
        }
        Operation::CreateItem(create) => {
            if create.location.index > form.items.len() {
                return Err(invalid(format!(
                    "index {} out of range for {} items",
                    create.location.index,
                    form.items.len()
                )));
            }
            if create.item.item_id.is_some() {
                return Err(invalid("itemId must not be set on create"));
            }
            let mut item = create.item.clone();
            assign_ids(next_id, &mut item);
            let item_id = item.item_id.clone();
            form.items.insert(create.location.index, item);
            Ok(json!({"createItem": {"itemId": item_id}}))
        }
        Operation::UpdateItem(update) => {
            let index = update.location.index;
            let existing = form
                .items
                .get_mut(index)
                .ok_or_else(|| invalid(format!("no item at index {}", index)))?;
            let item_id = existing.item_id.clone();
            if masked(&update.update_mask, "title") {
                existing.title = update.item.title.clone();
            }
            if masked(&update.update_mask, "description") {
                existing.description = update.item.description.clone();
            }
            if masked(&update.update_mask, "questionItem.question.required") {
                if let (Some(ItemKind::QuestionItem(target)), Some(ItemKind::QuestionItem(patch))) =
                    (&mut existing.kind, &update.item.kind)
                {
                    target.question.required = patch.question.required;
                }
            }
            existing.item_id = item_id;
            Ok(json!({}))
        }
        Operation::DeleteItem(delete) => {
            if delete.location.index >= form.items.len() {
                return Err(invalid("delete index out of range"));
            }
            form.items.remove(delete.location.index);
            Ok(json!({}))
        }
        Operation::MoveItem(mv) => {
            let from = mv.original_location.index;
            let to = mv.new_location.index;
            if from >= form.items.len() || to >= form.items.len() {
                return Err(invalid("move index out of range"));
            }
            let item = form.items.remove(from);
            form.items.insert(to, item);
            Ok(json!({}))
        }
    }
}

fn not_found(operation: &'static str, id: &str) -> ApiError {
    ApiError::remote(operation, 404, format!("Requested entity was not found: {}", id))
}

#[async_trait]
impl FormsService for FakeService {
    async fn create_form(&self, title: &str) -> Result<Form, ApiError> {
        self.record(Call::CreateForm(title.to_string()));
        let mut state = self.state.lock().unwrap();
        let form_id = fresh_id(&mut state.next_id, "form");
        let mut form = Form {
            form_id: form_id.clone(),
            responder_uri: Some(format!("https://docs.google.com/forms/d/e/{}/viewform", form_id)),
            ..Form::default()
        };
        form.info.title = Some(title.to_string());
        form.info.document_title = Some(title.to_string());
        state.form_order.push(form_id.clone());
        state.forms.insert(form_id, form.clone());
        Ok(form)
    }

    async fn get_form(&self, form_id: &str) -> Result<Form, ApiError> {
        self.record(Call::GetForm(form_id.to_string()));
        self.state
            .lock()
            .unwrap()
            .forms
            .get(form_id)
            .cloned()
            .ok_or_else(|| not_found("forms.get", form_id))
    }

    async fn batch_update(
        &self,
        form_id: &str,
        request: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, ApiError> {
        self.record(Call::BatchUpdate(form_id.to_string(), request.clone()));
        let mut state = self.state.lock().unwrap();
        state.batch_update_count += 1;
        if state.failing_batch_updates.contains(&state.batch_update_count) {
            return Err(ApiError::remote("forms.batchUpdate", 500, "Internal error encountered."));
        }

        let mut next_id = state.next_id;
        let mut form = state
            .forms
            .get(form_id)
            .cloned()
            .ok_or_else(|| not_found("forms.batchUpdate", form_id))?;

        // All or nothing, like the real service
        let mut replies = Vec::with_capacity(request.requests.len());
        for operation in &request.requests {
            replies.push(apply(&mut form, operation, &mut next_id)?);
        }

        state.next_id = next_id;
        state.forms.insert(form_id.to_string(), form);
        Ok(BatchUpdateResponse {
            replies,
            form: None,
        })
    }

    async fn rename_file(&self, file_id: &str, name: &str) -> Result<(), ApiError> {
        self.record(Call::RenameFile(file_id.to_string(), name.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.failing_renames {
            return Err(ApiError::remote("drive.files.update", 403, "Insufficient permissions"));
        }
        let form = state
            .forms
            .get_mut(file_id)
            .ok_or_else(|| not_found("drive.files.update", file_id))?;
        form.info.document_title = Some(name.to_string());
        Ok(())
    }

    async fn list_form_files(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<DriveFileList, ApiError> {
        self.record(Call::ListFormFiles);
        let state = self.state.lock().unwrap();
        let start: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + page_size as usize).min(state.form_order.len());

        let files = state.form_order[start..end]
            .iter()
            .map(|id| DriveFile {
                id: id.clone(),
                name: state.forms[id]
                    .info
                    .document_title
                    .clone()
                    .unwrap_or_else(|| state.forms[id].title().to_string()),
                web_view_link: None,
            })
            .collect();
        let next_page_token = (end < state.form_order.len()).then(|| end.to_string());
        Ok(DriveFileList {
            files,
            next_page_token,
        })
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), ApiError> {
        self.record(Call::DeleteFile(file_id.to_string()));
        let mut state = self.state.lock().unwrap();
        state
            .forms
            .remove(file_id)
            .ok_or_else(|| not_found("drive.files.delete", file_id))?;
        state.form_order.retain(|id| id != file_id);
        Ok(())
    }

    async fn list_responses(
        &self,
        form_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ResponseList, ApiError> {
        self.record(Call::ListResponses(
            form_id.to_string(),
            page_token.map(str::to_string),
        ));
        let state = self.state.lock().unwrap();
        if !state.forms.contains_key(form_id) {
            return Err(not_found("forms.responses.list", form_id));
        }
        let all = state.responses.get(form_id).cloned().unwrap_or_default();
        let start: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + page_size as usize).min(all.len());
        Ok(ResponseList {
            responses: all[start..end].to_vec(),
            next_page_token: (end < all.len()).then(|| end.to_string()),
        })
    }

    async fn get_response(&self, form_id: &str, response_id: &str) -> Result<FormResponse, ApiError> {
        self.record(Call::GetResponse(form_id.to_string(), response_id.to_string()));
        self.state
            .lock()
            .unwrap()
            .responses
            .get(form_id)
            .and_then(|responses| responses.iter().find(|r| r.response_id == response_id))
            .cloned()
            .ok_or_else(|| not_found("forms.responses.get", response_id))
    }
}

#[async_trait]
impl SheetsService for FakeService {
    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, ApiError> {
        self.record(Call::GetSpreadsheet(spreadsheet_id.to_string()));
        self.state
            .lock()
            .unwrap()
            .spreadsheets
            .get(spreadsheet_id)
            .map(|(spreadsheet, _)| spreadsheet.clone())
            .ok_or_else(|| not_found("sheets.spreadsheets.get", spreadsheet_id))
    }

    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange, ApiError> {
        self.record(Call::GetValues(spreadsheet_id.to_string(), range.to_string()));
        let state = self.state.lock().unwrap();
        let (_, ranges) = state
            .spreadsheets
            .get(spreadsheet_id)
            .ok_or_else(|| not_found("sheets.values.get", spreadsheet_id))?;
        ranges.get(range).cloned().ok_or_else(|| {
            ApiError::remote("sheets.values.get", 400, format!("Unable to parse range: {}", range))
        })
    }

    async fn batch_get_values(
        &self,
        spreadsheet_id: &str,
        ranges: &[String],
    ) -> Result<BatchValueRanges, ApiError> {
        self.record(Call::BatchGetValues(spreadsheet_id.to_string(), ranges.to_vec()));
        let state = self.state.lock().unwrap();
        let (_, stored) = state
            .spreadsheets
            .get(spreadsheet_id)
            .ok_or_else(|| not_found("sheets.values.batchGet", spreadsheet_id))?;
        let value_ranges = ranges
            .iter()
            .map(|range| {
                stored.get(range).cloned().ok_or_else(|| {
                    ApiError::remote("sheets.values.batchGet", 400, format!("Unable to parse range: {}", range))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BatchValueRanges {
            spreadsheet_id: spreadsheet_id.to_string(),
            value_ranges,
        })
    }
}

/// Parse a form document written in the service's JSON shape
pub fn form_from_json(value: Value) -> Form {
    serde_json::from_value(value).expect("valid form document")
}
