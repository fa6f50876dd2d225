mod common;

use anyhow::Result;
use common::{FakeService, form_from_json};
use gforms_cli::api::models::{FormResponse, Sheet, SheetProperties, Spreadsheet, ValueRange};
use gforms_cli::forms::manage;
use gforms_cli::forms::{ExportOptions, FormTemplate, apply_template, export_template, responses_to_csv};
use gforms_cli::sheets::{self, SheetsError};
use serde_json::json;

const TEMPLATE: &str = r#"
form:
  title: Event signup
  description: Tell us you're coming
questions:
  - type: SHORT_ANSWER
    title: Full name
    required: true
  - type: MULTIPLE_CHOICE
    title: Meal
    options: [Meat, Fish, Vegetarian]
  - type: NOT_A_TYPE
    title: Broken
  - type: LINEAR_SCALE
    title: Excitement
    low: 0
    high: 10
    highLabel: Very
"#;

#[tokio::test]
async fn test_apply_template_keeps_order_past_failures() -> Result<()> {
    let service = FakeService::new();
    let template = FormTemplate::parse(TEMPLATE)?;

    let result = apply_template(&service, &template).await?;

    assert_eq!(result.questions_added, 3);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].index, 2);
    assert!(result.failures[0].reason.contains("NOT_A_TYPE"));

    let form = service.form(&result.form.form_id).unwrap();
    assert_eq!(form.title(), "Event signup");
    assert_eq!(form.description(), "Tell us you're coming");
    let titles: Vec<_> = form.items.iter().map(|i| i.title.clone().unwrap()).collect();
    assert_eq!(titles, vec!["Full name", "Meal", "Excitement"]);
    assert!(form.items[0].question().unwrap().is_required());
    Ok(())
}

#[tokio::test]
async fn test_template_without_title_creates_nothing() {
    let service = FakeService::new();
    let template = FormTemplate::parse("questions:\n  - title: Orphan\n").unwrap();

    assert!(apply_template(&service, &template).await.is_err());
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_exported_template_recreates_the_questions() -> Result<()> {
    let service = FakeService::new();
    let template = FormTemplate::parse(TEMPLATE)?;
    let original = apply_template(&service, &template).await?;

    let form = service.form(&original.form.form_id).unwrap();
    let yaml = export_template(&form).render()?;
    assert!(yaml.starts_with('#'));

    let reparsed = FormTemplate::parse(&yaml)?;
    assert_eq!(reparsed.questions.len(), 3);
    assert_eq!(reparsed.questions[1].question_type, "MULTIPLE_CHOICE");
    assert_eq!(reparsed.questions[1].options, vec!["Meat", "Fish", "Vegetarian"]);
    assert_eq!(reparsed.questions[2].question_type, "LINEAR_SCALE");
    assert_eq!(reparsed.questions[2].high, Some(10));
    assert_eq!(reparsed.questions[2].high_label.as_deref(), Some("Very"));

    let copy = apply_template(&service, &reparsed).await?;
    assert_eq!(copy.questions_added, 3);
    assert!(copy.failures.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_export_collects_every_page_of_responses() -> Result<()> {
    let service = FakeService::new();
    service.insert_form(form_from_json(json!({
        "formId": "f",
        "info": {"title": "Poll"},
        "items": [{"itemId": "i1", "title": "Pick", "questionItem": {"question": {"questionId": "q1",
            "choiceQuestion": {"type": "CHECKBOX", "options": [{"value": "A"}, {"value": "B"}]}}}}]
    })));
    let responses: Vec<FormResponse> = (0..3)
        .map(|i| {
            serde_json::from_value(json!({
                "responseId": format!("r{}", i),
                "createTime": format!("2024-05-0{}T09:00:00Z", i + 1),
                "answers": {"q1": {"questionId": "q1", "textAnswers": {"answers": [{"value": "A"}, {"value": "B"}]}}}
            }))
            .unwrap()
        })
        .collect();
    service.insert_responses("f", responses);

    let form = service.form("f").unwrap();
    let all = manage::list_all_responses(&service, "f", 2).await?;
    let options = ExportOptions {
        email: false,
        ..ExportOptions::default()
    };
    let export = responses_to_csv(&form, &all, options)?;

    assert_eq!(export.row_count, 3);
    assert_eq!(
        export.csv,
        "Timestamp,Pick\n\
         2024-05-01T09:00:00Z,A; B\n\
         2024-05-02T09:00:00Z,A; B\n\
         2024-05-03T09:00:00Z,A; B\n"
    );
    Ok(())
}

fn roster() -> Spreadsheet {
    Spreadsheet {
        spreadsheet_id: "sheet1".to_string(),
        sheets: vec![Sheet {
            properties: SheetProperties {
                title: "Roster".to_string(),
                ..SheetProperties::default()
            },
        }],
        ..Spreadsheet::default()
    }
}

#[tokio::test]
async fn test_read_sheet_by_url() -> Result<()> {
    let service = FakeService::new();
    service.insert_spreadsheet(
        roster(),
        vec![ValueRange {
            range: "'Roster'!A1:B3".to_string(),
            values: vec![
                vec![json!("Name"), json!("Team")],
                vec![json!("Ann")],
                vec![json!("Bo"), json!("Blue")],
            ],
        }],
    );

    let data = sheets::read_values(
        &service,
        "https://docs.google.com/spreadsheets/d/sheet1/edit#gid=0",
        Some("Roster"),
        Some("A1:B3"),
    )
    .await?;

    assert_eq!(data.row_count(), 3);
    assert_eq!(data.values[1], vec!["Ann", ""]);
    assert_eq!(sheets::to_csv(&data)?, "Name,Team\nAnn,\nBo,Blue\n");
    Ok(())
}

#[tokio::test]
async fn test_sheet_errors_are_classified() {
    let service = FakeService::new();
    service.insert_spreadsheet(roster(), vec![]);

    let missing = sheets::get_spreadsheet(&service, "nope").await.unwrap_err();
    assert!(matches!(
        missing.downcast_ref::<SheetsError>(),
        Some(SheetsError::NotFound(id)) if id == "nope"
    ));

    let bad_range = sheets::read_values(&service, "sheet1", None, Some("ZZ"))
        .await
        .unwrap_err();
    assert!(matches!(
        bad_range.downcast_ref::<SheetsError>(),
        Some(SheetsError::InvalidRange(range)) if range == "ZZ"
    ));
}
