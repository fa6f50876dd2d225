//! Filling placeholders in a form's title, description and item texts

use anyhow::{Context, Result};
use log::{info, warn};

use super::ItemFailure;
use super::sanitize::{strip_line_breaks, without_identifiers};
use crate::api::models::FormInfo;
use crate::api::{FormsService, Operation, Operations};

/// Ordered placeholder to value pairs.
///
/// Substitution is a single left-to-right pass: at each position the first
/// pair whose placeholder matches wins, and inserted values are never
/// rescanned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair; an empty placeholder is ignored
    pub fn with(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(placeholder, value);
        self
    }

    pub fn push(&mut self, placeholder: impl Into<String>, value: impl Into<String>) {
        let placeholder = placeholder.into();
        if !placeholder.is_empty() {
            self.pairs.push((placeholder, value.into()));
        }
    }

    /// Map every placeholder in `placeholders` to the same value
    pub fn for_placeholders(placeholders: &[String], value: &str) -> Self {
        placeholders
            .iter()
            .fold(Self::new(), |replacements, placeholder| {
                replacements.with(placeholder.as_str(), value)
            })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn apply(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut rest = text;

        while !rest.is_empty() {
            if let Some((placeholder, value)) = self
                .pairs
                .iter()
                .find(|(placeholder, _)| rest.starts_with(placeholder.as_str()))
            {
                output.push_str(value);
                rest = &rest[placeholder.len()..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                output.push(ch);
            }
            rest = chars.as_str();
        }

        output
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Replacements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |replacements, (placeholder, value)| {
                replacements.with(placeholder, value)
            })
    }
}

/// Parse a `PLACEHOLDER=value` command line argument
pub fn parse_replacement(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((placeholder, _)) if placeholder.is_empty() => {
            Err(format!("placeholder is empty in '{}'", arg))
        }
        Some((placeholder, value)) => Ok((placeholder.to_string(), value.to_string())),
        None => Err(format!("expected PLACEHOLDER=value, got '{}'", arg)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonalizationResult {
    pub form_id: String,
    pub form_info_updated: bool,
    pub items_updated: usize,
    pub total_items: usize,
    /// Human-readable log of what changed
    pub updates: Vec<String>,
    pub failures: Vec<ItemFailure>,
    pub api_calls: usize,
}

fn normalize(text: &str) -> String {
    strip_line_breaks(text).trim().to_string()
}

fn preview(text: &str) -> String {
    if text.chars().count() > 40 {
        format!("{}...", text.chars().take(40).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Apply `replacements` to the form and every item, writing only what changed.
///
/// A failed form-level update is fatal; a failed item update is recorded and
/// the remaining items are still processed.
pub async fn personalize<S>(
    service: &S,
    form_id: &str,
    replacements: &Replacements,
) -> Result<PersonalizationResult>
where
    S: FormsService + ?Sized,
{
    info!(
        "Personalizing form {} with {} replacements",
        form_id,
        replacements.len()
    );

    let form = service
        .get_form(form_id)
        .await
        .with_context(|| format!("Failed to fetch form {}", form_id))?;

    let mut result = PersonalizationResult {
        form_id: form_id.to_string(),
        total_items: form.items.len(),
        api_calls: 1,
        ..Default::default()
    };

    let new_title = replacements.apply(form.title());
    let new_description = replacements.apply(form.description());
    let title_changed = normalize(&new_title) != normalize(form.title());
    let description_changed = normalize(&new_description) != normalize(form.description());

    if title_changed || description_changed {
        let mut info = FormInfo::default();
        let mut mask = Vec::new();
        if title_changed {
            info.title = Some(new_title.clone());
            mask.push("title");
        }
        if description_changed {
            info.description = Some(new_description);
            mask.push("description");
        }

        result.api_calls += 1;
        let request = Operations::new()
            .update_form_info(info, mask.join(","))
            .to_request();
        service
            .batch_update(form_id, &request)
            .await
            .context("Failed to update form title/description")?;
        result.form_info_updated = true;
        result.updates.push("Form title/description updated".to_string());

        if title_changed {
            result.api_calls += 1;
            if let Err(err) = service.rename_file(form_id, &new_title).await {
                warn!("Failed to sync Drive name of {}: {}", form_id, err);
            }
        }
    }

    for (index, item) in form.items.iter().enumerate() {
        let title = item.title.as_deref().unwrap_or("");
        let description = item.description.as_deref().filter(|d| !d.is_empty());

        let new_title = normalize(&replacements.apply(title));
        let new_description = description.map(|d| normalize(&replacements.apply(d)));

        let title_changed = new_title != normalize(title);
        let description_changed = match (description, new_description.as_deref()) {
            (Some(old), Some(new)) => new != normalize(old),
            _ => false,
        };
        if !title_changed && !description_changed {
            continue;
        }

        let mut payload = without_identifiers(item);
        payload.title = Some(new_title.clone());
        let mut mask = String::from("title");
        if let Some(description) = new_description {
            payload.description = Some(description);
            mask.push_str(",description");
        }

        result.api_calls += 1;
        let request = Operations::from(Operation::update_item(payload, index, mask)).to_request();
        match service.batch_update(form_id, &request).await {
            Ok(_) => {
                result.items_updated += 1;
                result.updates.push(format!("Updated: {}", preview(&new_title)));
            }
            Err(err) => {
                warn!("Failed to update item {:?} of {}: {}", item.item_id, form_id, err);
                result
                    .failures
                    .push(ItemFailure::for_item(index, item, err.to_string()));
            }
        }
    }

    info!(
        "Personalized form {}: {}/{} items updated, {} failures",
        form_id,
        result.items_updated,
        result.total_items,
        result.failures.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_is_single_pass() {
        let replacements = Replacements::new().with("A", "B").with("B", "C");
        assert_eq!(replacements.apply("A"), "B");
        assert_eq!(replacements.apply("AB"), "BC");
    }

    #[test]
    fn test_apply_first_pair_wins_at_a_position() {
        let replacements = Replacements::new()
            .with("Employee Name", "Jane Doe")
            .with("NAME", "Jane");
        assert_eq!(
            replacements.apply("Hi NAME, Employee Name"),
            "Hi Jane, Jane Doe"
        );
    }

    #[test]
    fn test_apply_leaves_other_text_alone() {
        let replacements = Replacements::new().with("NAME", "Zoë");
        assert_eq!(replacements.apply("héllo NAME!"), "héllo Zoë!");
        assert_eq!(replacements.apply(""), "");
    }

    #[test]
    fn test_empty_placeholder_is_ignored() {
        let replacements = Replacements::new().with("", "x").with("N", "M");
        assert_eq!(replacements.len(), 1);
        assert_eq!(replacements.apply("NaN"), "MaM");
    }

    #[test]
    fn test_parse_replacement() {
        assert_eq!(
            parse_replacement("NAME=Jane=Doe").unwrap(),
            ("NAME".to_string(), "Jane=Doe".to_string())
        );
        assert!(parse_replacement("=x").is_err());
        assert!(parse_replacement("NAME").is_err());
    }

    #[test]
    fn test_for_placeholders() {
        let placeholders = vec!["NAME".to_string(), "Employee Name".to_string()];
        let replacements = Replacements::for_placeholders(&placeholders, "Sam");
        assert_eq!(replacements.apply("NAME / Employee Name"), "Sam / Sam");
    }
}
