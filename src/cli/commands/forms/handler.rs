//! Dispatch for `gforms forms ...`

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;
use log::info;
use std::fs;
use std::path::Path;

use super::FormsSubcommands;
use crate::api::{FormsService, GoogleClient};
use crate::api::models::{Form, edit_uri};
use crate::cli::authenticated_client;
use crate::cli::output;
use crate::config::Config;
use crate::forms::export::question_columns;
use crate::forms::manage::{self, ItemPatch};
use crate::forms::{
    DuplicateOptions, DuplicationMode, ExportOptions, FormTemplate, NewQuestion, QuestionParams,
    QuestionSpec, Replacements, apply_template, duplicate, export_template, personalize,
    responses_to_csv,
};

pub async fn handle_forms_command(command: FormsSubcommands, config: &Config) -> Result<()> {
    let client = authenticated_client(config).await?;
    let settings = config.get_settings();

    match command {
        FormsSubcommands::List {
            page_size,
            page_token,
        } => {
            list_command(
                &client,
                page_size.unwrap_or(settings.list_page_size),
                page_token.as_deref(),
            )
            .await
        }
        FormsSubcommands::Create { title, description } => {
            let created = manage::create_form(&client, &title, description.as_deref()).await?;
            output::success(format!("Created form '{}'", title));
            output::field("Form ID", &created.form_id);
            output::field("Edit", &created.edit_uri);
            if let Some(uri) = &created.responder_uri {
                output::field("Share", uri);
            }
            Ok(())
        }
        FormsSubcommands::Get { form_id, json } => get_command(&client, &form_id, json).await,
        FormsSubcommands::Update {
            form_id,
            title,
            description,
        } => {
            let form =
                manage::update_form(&client, &form_id, title.as_deref(), description.as_deref())
                    .await?;
            output::success(format!("Updated form {}", form_id));
            output::field("Title", form.title());
            output::field("Description", form.description());
            Ok(())
        }
        FormsSubcommands::Delete { form_id, yes } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Delete form {}? This cannot be undone", form_id))
                    .default(false)
                    .interact()?
            {
                println!("Operation cancelled.");
                return Ok(());
            }
            manage::delete_form(&client, &form_id).await?;
            output::success(format!("Deleted form {}", form_id));
            Ok(())
        }
        FormsSubcommands::Duplicate {
            form_id,
            title,
            chunk_size,
            sequential,
        } => {
            let options = DuplicateOptions {
                chunk_size: chunk_size.unwrap_or(settings.chunk_size),
                mode: if sequential {
                    DuplicationMode::Sequential
                } else {
                    DuplicationMode::Batched
                },
            };
            duplicate_command(&client, &form_id, &title, &options).await
        }
        FormsSubcommands::Personalize {
            form_id,
            name,
            replacements,
        } => {
            let mut all = match &name {
                Some(name) => Replacements::for_placeholders(&settings.personalize_placeholders, name),
                None => Replacements::new(),
            };
            for (placeholder, value) in replacements {
                all.push(placeholder, value);
            }
            personalize_command(&client, &form_id, &all).await
        }
        FormsSubcommands::Link { form_id } => {
            let form = client
                .get_form(&form_id)
                .await
                .with_context(|| format!("Failed to fetch form {}", form_id))?;
            println!("{}", form.title().bold());
            if let Some(uri) = &form.responder_uri {
                output::field("Share", uri);
            }
            output::field("Edit", edit_uri(&form.form_id));
            Ok(())
        }
        FormsSubcommands::AddQuestion {
            form_id,
            question_type,
            title,
            description,
            required,
            options,
            low,
            high,
            low_label,
            high_label,
            rows,
            columns,
            folder_id,
            max_files,
            max_file_size,
            allowed_types,
            include_time,
            no_year,
            duration,
            position,
        } => {
            let params = QuestionParams {
                options,
                low,
                high,
                low_label,
                high_label,
                rows,
                columns,
                folder_id,
                max_files,
                max_file_size,
                allowed_types,
                include_time: include_time.then_some(true),
                include_year: no_year.then_some(false),
                duration: duration.then_some(true),
            };
            let question = NewQuestion::new(title, QuestionSpec::from_params(question_type, &params)?)
                .required(required)
                .description(description);

            let item_id = manage::add_question(&client, &form_id, &question, position).await?;
            output::success(format!("Added {} question '{}'", question_type, question.title));
            if let Some(item_id) = item_id {
                output::field("Item ID", item_id);
            }
            Ok(())
        }
        FormsSubcommands::UpdateQuestion {
            form_id,
            item_id,
            title,
            description,
            required,
        } => {
            let patch = ItemPatch {
                title,
                description,
                required,
            };
            manage::update_item(&client, &form_id, &item_id, &patch).await?;
            output::success(format!("Updated item {}", item_id));
            Ok(())
        }
        FormsSubcommands::DeleteQuestion {
            form_id,
            item_id,
            yes,
        } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Delete item {}?", item_id))
                    .default(false)
                    .interact()?
            {
                println!("Operation cancelled.");
                return Ok(());
            }
            manage::delete_item(&client, &form_id, &item_id).await?;
            output::success(format!("Deleted item {}", item_id));
            Ok(())
        }
        FormsSubcommands::MoveQuestion {
            form_id,
            item_id,
            position,
        } => {
            manage::move_item(&client, &form_id, &item_id, position).await?;
            output::success(format!("Moved item {} to position {}", item_id, position));
            Ok(())
        }
        FormsSubcommands::AddSection {
            form_id,
            title,
            description,
            position,
        } => {
            let item_id =
                manage::add_section(&client, &form_id, &title, description.as_deref(), position)
                    .await?;
            output::success(format!("Added section '{}'", title));
            if let Some(item_id) = item_id {
                output::field("Item ID", item_id);
            }
            Ok(())
        }
        FormsSubcommands::Responses {
            form_id,
            response_id,
            json,
        } => match response_id {
            Some(response_id) => response_command(&client, &form_id, &response_id, json).await,
            None => responses_command(&client, &form_id, settings.response_page_size, json).await,
        },
        FormsSubcommands::Export {
            form_id,
            output: output_path,
            no_timestamps,
            no_email,
        } => {
            let options = ExportOptions {
                timestamps: !no_timestamps,
                email: !no_email,
            };
            export_command(
                &client,
                &form_id,
                settings.response_page_size,
                options,
                output_path.as_deref(),
            )
            .await
        }
        FormsSubcommands::Apply { file } => apply_command(&client, &file).await,
        FormsSubcommands::ExportTemplate {
            form_id,
            output: output_path,
        } => {
            let form = client
                .get_form(&form_id)
                .await
                .with_context(|| format!("Failed to fetch form {}", form_id))?;
            let yaml = export_template(&form).render()?;
            output::write_or_print(output_path.as_deref(), &yaml)
        }
    }
}

async fn list_command(client: &GoogleClient, page_size: u32, page_token: Option<&str>) -> Result<()> {
    let listing = manage::list_forms(client, page_size, page_token).await?;

    if listing.forms.is_empty() {
        println!("No forms found.");
        return Ok(());
    }

    println!("{}", format!("Found {} form(s):", listing.forms.len()).bold());
    for summary in &listing.forms {
        println!();
        println!("{}", summary.title.bright_white().bold());
        output::field("Form ID", &summary.form_id);
        output::field("Responses", summary.response_count);
        if let Some(uri) = &summary.responder_uri {
            output::field("Share", uri);
        }
    }

    if let Some(token) = &listing.next_page_token {
        println!();
        println!("More forms available: --page-token {}", token.cyan());
    }
    Ok(())
}

fn print_form(form: &Form) {
    println!("{}", form.title().bright_white().bold());
    if !form.description().is_empty() {
        println!("{}", form.description());
    }
    println!();
    output::field("Form ID", &form.form_id);
    output::field("Edit", edit_uri(&form.form_id));
    if let Some(uri) = &form.responder_uri {
        output::field("Share", uri);
    }
    output::field("Items", form.items.len());

    for (index, item) in form.items.iter().enumerate() {
        let required = match item.question() {
            Some(question) if question.is_required() => " *".bright_red().to_string(),
            _ => String::new(),
        };
        println!(
            "  {:>3}. {}{} {} {}",
            index,
            item.title.as_deref().unwrap_or("(untitled)"),
            required,
            format!("[{}]", item.kind_name()).cyan(),
            item.item_id.as_deref().unwrap_or("").dimmed()
        );
    }
}

async fn get_command(client: &GoogleClient, form_id: &str, json: bool) -> Result<()> {
    let form = client
        .get_form(form_id)
        .await
        .with_context(|| format!("Failed to fetch form {}", form_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&form)?);
    } else {
        print_form(&form);
    }
    Ok(())
}

async fn duplicate_command(
    client: &GoogleClient,
    form_id: &str,
    title: &str,
    options: &DuplicateOptions,
) -> Result<()> {
    println!("Duplicating form {} as '{}'...", form_id, title);
    let result = duplicate(client, form_id, title, options).await?;

    if result.is_complete() {
        output::success(format!(
            "Copied {}/{} items",
            result.copied_items, result.total_items
        ));
    } else {
        output::warning(format!(
            "Copied {}/{} items",
            result.copied_items, result.total_items
        ));
    }
    output::field("Form ID", &result.new_form_id);
    output::field("Edit", &result.edit_uri);
    if let Some(uri) = &result.responder_uri {
        output::field("Share", uri);
    }
    output::field("Strategy", result.strategy);
    output::field("API calls", result.api_calls);
    output::field("Time", format!("{:.2}s", result.elapsed.as_secs_f64()));

    for warning in &result.warnings {
        output::warning(warning);
    }
    output::failures(&result.failures);
    Ok(())
}

async fn personalize_command(
    client: &GoogleClient,
    form_id: &str,
    replacements: &Replacements,
) -> Result<()> {
    if replacements.is_empty() {
        anyhow::bail!("Nothing to replace: pass --name or at least one --replace PLACEHOLDER=VALUE");
    }
    info!("Personalizing {} with {:?}", form_id, replacements.pairs());

    let result = personalize(client, form_id, replacements).await?;
    for update in &result.updates {
        println!("  {}", update);
    }
    if result.form_info_updated || result.items_updated > 0 {
        output::success(format!(
            "Updated {}/{} items{}",
            result.items_updated,
            result.total_items,
            if result.form_info_updated {
                " and the form title/description"
            } else {
                ""
            }
        ));
    } else {
        println!("Nothing matched; the form is unchanged.");
    }
    output::field("API calls", result.api_calls);
    output::failures(&result.failures);
    Ok(())
}

async fn responses_command(
    client: &GoogleClient,
    form_id: &str,
    page_size: u32,
    json: bool,
) -> Result<()> {
    let responses = manage::list_all_responses(client, form_id, page_size).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&responses)?);
        return Ok(());
    }

    println!("{}", format!("{} response(s)", responses.len()).bold());
    for response in &responses {
        println!(
            "  {} {} {} ({} answers)",
            response.response_id.dimmed(),
            response.create_time,
            response.respondent_email.as_deref().unwrap_or(""),
            response.answers.len()
        );
    }
    Ok(())
}

async fn response_command(
    client: &GoogleClient,
    form_id: &str,
    response_id: &str,
    json: bool,
) -> Result<()> {
    let response = client
        .get_response(form_id, response_id)
        .await
        .with_context(|| format!("Failed to fetch response {}", response_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let form = client
        .get_form(form_id)
        .await
        .with_context(|| format!("Failed to fetch form {}", form_id))?;
    println!("{}", response.response_id.bold());
    output::field("Submitted", &response.create_time);
    if let Some(email) = &response.respondent_email {
        output::field("Email", email);
    }
    for (question_id, title) in question_columns(&form) {
        let answer = response
            .answers
            .get(&question_id)
            .map(|answer| answer.text_values().join("; "))
            .unwrap_or_default();
        println!("  {}: {}", title.bold(), answer);
    }
    Ok(())
}

async fn export_command(
    client: &GoogleClient,
    form_id: &str,
    page_size: u32,
    options: ExportOptions,
    output_path: Option<&Path>,
) -> Result<()> {
    let form = client
        .get_form(form_id)
        .await
        .with_context(|| format!("Failed to fetch form {}", form_id))?;
    let responses = manage::list_all_responses(client, form_id, page_size).await?;

    let export = responses_to_csv(&form, &responses, options)?;
    if export.row_count == 0 {
        output::warning(format!("Form {} has no responses", form_id));
        return Ok(());
    }
    output::write_or_print(output_path, &export.csv)?;
    if output_path.is_some() {
        output::field("Rows", export.row_count);
    }
    Ok(())
}

async fn apply_command(client: &GoogleClient, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read template {}", file.display()))?;
    let template = FormTemplate::parse(&text)?;

    let result = apply_template(client, &template).await?;
    output::success(format!(
        "Created form with {}/{} questions",
        result.questions_added,
        template.questions.len()
    ));
    output::field("Form ID", &result.form.form_id);
    output::field("Edit", &result.form.edit_uri);
    if let Some(uri) = &result.form.responder_uri {
        output::field("Share", uri);
    }
    output::failures(&result.failures);
    Ok(())
}
