//! Dispatch for `gforms sheets ...`

use anyhow::Result;
use colored::*;

use super::SheetsSubcommands;
use crate::cli::{authenticated_client, output};
use crate::config::Config;
use crate::sheets::{self, SheetData};

pub async fn handle_sheets_command(command: SheetsSubcommands, config: &Config) -> Result<()> {
    let client = authenticated_client(config).await?;

    match command {
        SheetsSubcommands::Info { spreadsheet } => {
            let spreadsheet = sheets::get_spreadsheet(&client, &spreadsheet).await?;
            println!("{}", spreadsheet.properties.title.bright_white().bold());
            output::field("ID", &spreadsheet.spreadsheet_id);
            if let Some(locale) = &spreadsheet.properties.locale {
                output::field("Locale", locale);
            }
            if let Some(time_zone) = &spreadsheet.properties.time_zone {
                output::field("Time zone", time_zone);
            }
            output::field("Sheets", spreadsheet.sheets.len());
            Ok(())
        }
        SheetsSubcommands::List { spreadsheet } => {
            let spreadsheet = sheets::get_spreadsheet(&client, &spreadsheet).await?;
            for sheet in &spreadsheet.sheets {
                let properties = &sheet.properties;
                println!(
                    "  {:>3}. {} {}",
                    properties.index,
                    properties.title.bold(),
                    format!(
                        "({} rows x {} columns)",
                        properties.grid_properties.row_count,
                        properties.grid_properties.column_count
                    )
                    .dimmed()
                );
            }
            Ok(())
        }
        SheetsSubcommands::Read {
            spreadsheet,
            sheet,
            range,
            batch,
            json,
        } => {
            let ranges = if batch.is_empty() {
                vec![sheets::read_values(&client, &spreadsheet, sheet.as_deref(), range.as_deref()).await?]
            } else {
                sheets::read_batch(&client, &spreadsheet, &batch).await?
            };

            if json {
                let values: Vec<_> = ranges
                    .iter()
                    .map(|data| serde_json::json!({"range": data.range, "values": data.values}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                for data in &ranges {
                    print_values(data);
                }
            }
            Ok(())
        }
        SheetsSubcommands::Export {
            spreadsheet,
            sheet,
            range,
            output: output_path,
        } => {
            let csv = sheets::export_csv(&client, &spreadsheet, sheet.as_deref(), range.as_deref()).await?;
            if csv.is_empty() {
                output::warning("The range is empty");
                return Ok(());
            }
            output::write_or_print(output_path.as_deref(), &csv)
        }
    }
}

fn print_values(data: &SheetData) {
    println!(
        "{} {}",
        data.range.bold(),
        format!("({} rows x {} columns)", data.row_count(), data.column_count()).dimmed()
    );
    if data.values.is_empty() {
        println!("  (empty)");
        return;
    }

    let mut widths = vec![0; data.column_count()];
    for row in &data.values {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    for row in &data.values {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        println!("  {}", cells.join(" | "));
    }
    println!();
}
