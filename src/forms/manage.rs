//! Form and item management: create, update, delete, list, and item edits
//!
//! Item positions are a function of server state, so every item edit
//! resolves its target index from a freshly fetched form.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use super::builder::NewQuestion;
use super::sanitize::{strip_line_breaks, without_identifiers};
use crate::api::models::{
    Form, FormInfo, FormResponse, FormSettings, Item, ItemKind, PageBreakItem, edit_uri,
};
use crate::api::{ApiError, BatchUpdateResponse, FormsService, Operation, Operations};
use crate::error::ValidationError;

/// Largest page the responses endpoint accepts
const RESPONSE_COUNT_PAGE_SIZE: u32 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedForm {
    pub form_id: String,
    pub responder_uri: Option<String>,
    pub edit_uri: String,
}

/// One row of `forms list`
#[derive(Debug, Clone, PartialEq)]
pub struct FormSummary {
    pub form_id: String,
    pub title: String,
    pub responder_uri: Option<String>,
    pub response_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FormListing {
    pub forms: Vec<FormSummary>,
    pub next_page_token: Option<String>,
}

/// Fields of an existing item to overwrite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.required.is_none()
    }
}

/// Description and the non-quiz default for a freshly created form.
///
/// `forms.create` only honours the title, so both go in one follow-up batch.
pub(crate) async fn describe_new_form<S>(
    service: &S,
    form_id: &str,
    description: &str,
) -> Result<(), ApiError>
where
    S: FormsService + ?Sized,
{
    let info = FormInfo {
        description: Some(description.to_string()),
        ..FormInfo::default()
    };
    let request = Operations::new()
        .update_form_info(info, "description")
        .update_settings(FormSettings::not_a_quiz(), "quizSettings.isQuiz")
        .to_request();
    service.batch_update(form_id, &request).await.map(|_| ())
}

pub async fn create_form<S>(service: &S, title: &str, description: Option<&str>) -> Result<CreatedForm>
where
    S: FormsService + ?Sized,
{
    info!("Creating form '{}'", title);
    let form = service
        .create_form(title)
        .await
        .with_context(|| format!("Failed to create form '{}'", title))?;

    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        describe_new_form(service, &form.form_id, description)
            .await
            .with_context(|| format!("Failed to set description of form {}", form.form_id))?;
    }

    Ok(CreatedForm {
        edit_uri: edit_uri(&form.form_id),
        responder_uri: form.responder_uri,
        form_id: form.form_id,
    })
}

/// Update title and/or description and return the form as it now stands
pub async fn update_form<S>(
    service: &S,
    form_id: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Form>
where
    S: FormsService + ?Sized,
{
    let mut operations = Operations::new();
    if let Some(title) = title {
        let info = FormInfo {
            title: Some(title.to_string()),
            ..FormInfo::default()
        };
        operations.push(Operation::update_form_info(info, "title"));
    }
    if let Some(description) = description {
        let info = FormInfo {
            description: Some(description.to_string()),
            ..FormInfo::default()
        };
        operations.push(Operation::update_form_info(info, "description"));
    }
    if operations.is_empty() {
        return Err(ValidationError::NoFields.into());
    }

    service
        .batch_update(form_id, &operations.to_request())
        .await
        .with_context(|| format!("Failed to update form {}", form_id))?;

    if let Some(title) = title {
        if let Err(err) = service.rename_file(form_id, title).await {
            warn!("Failed to sync Drive name of {}: {}", form_id, err);
        }
    }

    service
        .get_form(form_id)
        .await
        .with_context(|| format!("Failed to fetch form {}", form_id))
}

pub async fn delete_form<S>(service: &S, form_id: &str) -> Result<()>
where
    S: FormsService + ?Sized,
{
    info!("Deleting form {}", form_id);
    service
        .delete_file(form_id)
        .await
        .with_context(|| format!("Failed to delete form {}", form_id))
}

/// One page of the user's forms with their share links and response counts
pub async fn list_forms<S>(service: &S, page_size: u32, page_token: Option<&str>) -> Result<FormListing>
where
    S: FormsService + ?Sized,
{
    let files = service
        .list_form_files(page_size, page_token)
        .await
        .context("Failed to list forms")?;

    let mut forms = Vec::with_capacity(files.files.len());
    for file in files.files {
        let responder_uri = match service.get_form(&file.id).await {
            Ok(form) => form.responder_uri,
            Err(err) => {
                debug!("Could not fetch form {}: {}", file.id, err);
                None
            }
        };
        let response_count = match list_all_responses(service, &file.id, RESPONSE_COUNT_PAGE_SIZE).await {
            Ok(responses) => responses.len(),
            Err(err) => {
                debug!("Could not count responses of {}: {:#}", file.id, err);
                0
            }
        };

        forms.push(FormSummary {
            form_id: file.id,
            title: file.name,
            responder_uri,
            response_count,
        });
    }

    Ok(FormListing {
        forms,
        next_page_token: files.next_page_token,
    })
}

/// Every response of a form, following page tokens to the end
pub async fn list_all_responses<S>(service: &S, form_id: &str, page_size: u32) -> Result<Vec<FormResponse>>
where
    S: FormsService + ?Sized,
{
    let mut responses = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = service
            .list_responses(form_id, page_size, page_token.as_deref())
            .await
            .with_context(|| format!("Failed to list responses of form {}", form_id))?;
        responses.extend(page.responses);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    debug!("Fetched {} responses for form {}", responses.len(), form_id);
    Ok(responses)
}

/// Current position of `item_id` in `form`
pub fn item_index(form: &Form, item_id: &str) -> Result<usize, ValidationError> {
    form.item_index(item_id)
        .ok_or_else(|| ValidationError::ItemNotFound(item_id.to_string()))
}

async fn fetch_form<S>(service: &S, form_id: &str) -> Result<Form>
where
    S: FormsService + ?Sized,
{
    service
        .get_form(form_id)
        .await
        .with_context(|| format!("Failed to fetch form {}", form_id))
}

/// `itemId` the service assigned to the first created item, if it reported one
fn created_item_id(response: &BatchUpdateResponse) -> Option<String> {
    response
        .replies
        .first()
        .and_then(|reply| reply.get("createItem"))
        .and_then(|created| created.get("itemId"))
        .and_then(|id| id.as_str())
        .map(str::to_string)
}

/// Insert `question` at `position`, or at the end of the form when no position is given.
///
/// Returns the new item's id when the service reports it.
pub async fn add_question<S>(
    service: &S,
    form_id: &str,
    question: &NewQuestion,
    position: Option<usize>,
) -> Result<Option<String>>
where
    S: FormsService + ?Sized,
{
    let position = match position {
        Some(position) => position,
        None => fetch_form(service, form_id).await?.items.len(),
    };

    insert_item(service, form_id, question.to_item(), position)
        .await
        .with_context(|| format!("Failed to add question '{}'", question.title))
}

/// Insert a section break, appending when no position is given
pub async fn add_section<S>(
    service: &S,
    form_id: &str,
    title: &str,
    description: Option<&str>,
    position: Option<usize>,
) -> Result<Option<String>>
where
    S: FormsService + ?Sized,
{
    let position = match position {
        Some(position) => position,
        None => fetch_form(service, form_id).await?.items.len(),
    };

    let item = Item {
        item_id: None,
        title: Some(strip_line_breaks(title)),
        description: description.map(strip_line_breaks),
        kind: Some(ItemKind::PageBreakItem(PageBreakItem::default())),
    };

    insert_item(service, form_id, item, position)
        .await
        .with_context(|| format!("Failed to add section '{}'", title))
}

async fn insert_item<S>(service: &S, form_id: &str, item: Item, position: usize) -> Result<Option<String>>
where
    S: FormsService + ?Sized,
{
    let request = Operations::new().create_item(item, position).to_request();
    let response = service.batch_update(form_id, &request).await?;
    Ok(created_item_id(&response))
}

/// Overwrite the fields named in `patch`, resubmitting the rest of the item as it is
pub async fn update_item<S>(service: &S, form_id: &str, item_id: &str, patch: &ItemPatch) -> Result<()>
where
    S: FormsService + ?Sized,
{
    if patch.is_empty() {
        return Err(ValidationError::NoFields.into());
    }

    let form = fetch_form(service, form_id).await?;
    let index = item_index(&form, item_id)?;
    let mut item = without_identifiers(&form.items[index]);
    let mut mask = Vec::new();

    if let Some(title) = &patch.title {
        item.title = Some(strip_line_breaks(title));
        mask.push("title");
    }
    if let Some(description) = &patch.description {
        item.description = Some(strip_line_breaks(description));
        mask.push("description");
    }
    if let Some(required) = patch.required {
        if let Some(ItemKind::QuestionItem(question_item)) = &mut item.kind {
            question_item.question.required = Some(required);
            mask.push("questionItem.question.required");
        } else {
            warn!("Item {} is not a question; ignoring required flag", item_id);
        }
    }
    if mask.is_empty() {
        return Err(ValidationError::NoFields.into());
    }

    let request = Operations::from(Operation::update_item(item, index, mask.join(","))).to_request();
    service
        .batch_update(form_id, &request)
        .await
        .with_context(|| format!("Failed to update item {}", item_id))?;
    Ok(())
}

pub async fn delete_item<S>(service: &S, form_id: &str, item_id: &str) -> Result<()>
where
    S: FormsService + ?Sized,
{
    let form = fetch_form(service, form_id).await?;
    let index = item_index(&form, item_id)?;

    let request = Operations::new().delete_item(index).to_request();
    service
        .batch_update(form_id, &request)
        .await
        .with_context(|| format!("Failed to delete item {}", item_id))?;
    Ok(())
}

pub async fn move_item<S>(service: &S, form_id: &str, item_id: &str, new_position: usize) -> Result<()>
where
    S: FormsService + ?Sized,
{
    let form = fetch_form(service, form_id).await?;
    let index = item_index(&form, item_id)?;

    let request = Operations::from(Operation::move_item(index, new_position)).to_request();
    service
        .batch_update(form_id, &request)
        .await
        .with_context(|| format!("Failed to move item {}", item_id))?;
    Ok(())
}
