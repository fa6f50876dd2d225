//! Shared console formatting for command results

use colored::*;

use crate::forms::ItemFailure;

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".bright_green().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{} {}", "⚠".bright_yellow().bold(), message.as_ref());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<14} {}", format!("{}:", label).dimmed(), value);
}

/// Print every failed item, or nothing when the list is empty
pub fn failures(failures: &[ItemFailure]) {
    if failures.is_empty() {
        return;
    }
    println!();
    println!(
        "{} {} item(s) failed:",
        "✗".bright_red().bold(),
        failures.len()
    );
    for failure in failures {
        println!(
            "  {} {}: {}",
            format!("[{}]", failure.index + 1).dimmed(),
            failure.label().bold(),
            failure.reason
        );
    }
}

/// Write `contents` to `output`, or to stdout when no path is given
pub fn write_or_print(output: Option<&std::path::Path>, contents: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    match output {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            success(format!("Wrote {}", path.display()));
        }
        None => print!("{}", contents),
    }
    Ok(())
}
