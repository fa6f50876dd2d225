mod common;

use anyhow::Result;
use common::{Call, FakeService, form_from_json};
use gforms_cli::api::Operation;
use gforms_cli::forms::{Replacements, personalize};
use serde_json::json;

fn review_form() -> serde_json::Value {
    json!({
        "formId": "review",
        "info": {"title": "Feedback for NAME", "description": "Dear NAME, thanks"},
        "items": [
            {"title": "How did NAME do?", "description": "Rate NAME honestly",
             "questionItem": {"question": {"required": true, "scaleQuestion": {"low": 1, "high": 5}}}},
            {"title": "Anything else?", "questionItem": {"question": {"textQuestion": {"paragraph": true}}}},
            {"title": "Goals of Employee Name", "textItem": {}}
        ]
    })
}

fn placeholders() -> Replacements {
    let names = vec!["NAME".to_string(), "Employee Name".to_string()];
    Replacements::for_placeholders(&names, "Jane Doe")
}

#[tokio::test]
async fn test_personalize_updates_form_and_matching_items() -> Result<()> {
    let service = FakeService::new();
    service.insert_form(form_from_json(review_form()));

    let result = personalize(&service, "review", &placeholders()).await?;

    assert!(result.form_info_updated);
    assert_eq!(result.items_updated, 2);
    assert_eq!(result.total_items, 3);
    assert!(result.failures.is_empty());
    // get, form info, Drive rename, two item updates
    assert_eq!(result.api_calls, 5);
    assert_eq!(service.call_count(), 5);

    let form = service.form("review").unwrap();
    assert_eq!(form.title(), "Feedback for Jane Doe");
    assert_eq!(form.description(), "Dear Jane Doe, thanks");
    assert_eq!(form.info.document_title.as_deref(), Some("Feedback for Jane Doe"));
    assert_eq!(form.items[0].title.as_deref(), Some("How did Jane Doe do?"));
    assert_eq!(form.items[0].description.as_deref(), Some("Rate Jane Doe honestly"));
    assert_eq!(form.items[1].title.as_deref(), Some("Anything else?"));
    assert_eq!(form.items[2].title.as_deref(), Some("Goals of Jane Doe"));
    Ok(())
}

#[tokio::test]
async fn test_item_update_masks_and_payload() -> Result<()> {
    let service = FakeService::new();
    service.insert_form(form_from_json(review_form()));

    personalize(&service, "review", &placeholders()).await?;

    let requests = service.batch_requests();
    assert_eq!(requests.len(), 3);
    match &requests[0].requests[0] {
        Operation::UpdateFormInfo(update) => assert_eq!(update.update_mask, "title,description"),
        other => panic!("expected updateFormInfo, got {:?}", other),
    }
    match &requests[1].requests[0] {
        Operation::UpdateItem(update) => {
            assert_eq!(update.location.index, 0);
            assert_eq!(update.update_mask, "title,description");
            assert!(update.item.item_id.is_none());
            assert!(update.item.question().unwrap().question_id.is_none());
            assert!(update.item.question().unwrap().is_required());
        }
        other => panic!("expected updateItem, got {:?}", other),
    }
    match &requests[2].requests[0] {
        Operation::UpdateItem(update) => {
            assert_eq!(update.location.index, 2);
            assert_eq!(update.update_mask, "title");
        }
        other => panic!("expected updateItem, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_substitution_is_single_pass() -> Result<()> {
    let service = FakeService::new();
    service.insert_form(form_from_json(json!({
        "formId": "f",
        "info": {"title": "Plain"},
        "items": [{"title": "A and B", "textItem": {}}]
    })));

    let replacements = Replacements::new().with("A", "B").with("B", "C");
    let result = personalize(&service, "f", &replacements).await?;

    assert!(!result.form_info_updated);
    assert_eq!(result.items_updated, 1);
    assert_eq!(
        service.form("f").unwrap().items[0].title.as_deref(),
        Some("B and C")
    );
    Ok(())
}

#[tokio::test]
async fn test_whitespace_only_difference_is_not_written() -> Result<()> {
    let service = FakeService::new();
    service.insert_form(form_from_json(json!({
        "formId": "f",
        "info": {"title": "Team survey "},
        "items": [
            {"title": "Line one\nline two", "textItem": {}},
            {"title": "  padded  ", "pageBreakItem": {}}
        ]
    })));

    let result = personalize(&service, "f", &placeholders()).await?;

    assert!(!result.form_info_updated);
    assert_eq!(result.items_updated, 0);
    assert_eq!(result.api_calls, 1);
    assert_eq!(service.calls(), vec![Call::GetForm("f".to_string())]);
    Ok(())
}

#[tokio::test]
async fn test_failed_item_does_not_stop_the_rest() -> Result<()> {
    let service = FakeService::new();
    service.insert_form(form_from_json(json!({
        "formId": "f",
        "info": {"title": "Static"},
        "items": [
            {"title": "Q for NAME", "textItem": {}},
            {"title": "Another NAME", "textItem": {}}
        ]
    })));
    service.fail_batch_update(1);

    let result = personalize(&service, "f", &placeholders()).await?;

    assert_eq!(result.items_updated, 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].index, 0);
    assert_eq!(result.failures[0].label(), "Q for NAME");
    assert_eq!(result.api_calls, 3);

    let form = service.form("f").unwrap();
    assert_eq!(form.items[0].title.as_deref(), Some("Q for NAME"));
    assert_eq!(form.items[1].title.as_deref(), Some("Another Jane Doe"));
    Ok(())
}

#[tokio::test]
async fn test_failed_form_update_is_fatal() {
    let service = FakeService::new();
    service.insert_form(form_from_json(review_form()));
    service.fail_batch_update(1);

    let err = personalize(&service, "review", &placeholders())
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("title/description"));
    assert_eq!(service.call_count(), 2);
}

#[tokio::test]
async fn test_failed_rename_is_tolerated() -> Result<()> {
    let service = FakeService::new();
    service.insert_form(form_from_json(review_form()));
    service.fail_renames();

    let result = personalize(&service, "review", &placeholders()).await?;

    assert!(result.form_info_updated);
    assert_eq!(result.items_updated, 2);
    assert_eq!(service.form("review").unwrap().title(), "Feedback for Jane Doe");
    Ok(())
}
