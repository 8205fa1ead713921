use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;
use tracing::warn;

use crate::browser::Automation;
use crate::config::Selectors;

static INDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]+").unwrap());

/// One problem's page content, extracted before persistence.
#[derive(Debug, Clone)]
pub struct ProblemRecord {
    pub title: String,
    pub description: String,
    pub example_input: String,
    pub example_output: String,
}

impl ProblemRecord {
    /// Title and description are mandatory; a record missing either must
    /// never reach disk.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// Extract the record off the current page. Errors when title or
/// description are missing so partial metadata is never written; the
/// sample blocks are optional and degrade to empty strings.
pub async fn extract_record<A: Automation>(
    automation: &A,
    selectors: &Selectors,
) -> Result<ProblemRecord> {
    let title = first_text(automation, &selectors.title)
        .await?
        .unwrap_or_default();
    let description = first_text(automation, &selectors.description)
        .await?
        .map(|d| normalize_description(&d))
        .unwrap_or_default();
    let example_input = optional_text(automation, &selectors.example_input, "sample input").await?;
    let example_output =
        optional_text(automation, &selectors.example_output, "sample output").await?;

    let record = ProblemRecord {
        title: title.trim().to_string(),
        description,
        example_input,
        example_output,
    };
    if !record.is_valid() {
        bail!("page is missing its title or description");
    }
    Ok(record)
}

/// Text of the first element matching `selector`, if any.
async fn first_text<A: Automation>(automation: &A, selector: &str) -> Result<Option<String>> {
    let handles = automation.query(selector).await?;
    match handles.first() {
        Some(handle) => Ok(Some(automation.text(handle).await?)),
        None => Ok(None),
    }
}

async fn optional_text<A: Automation>(
    automation: &A,
    selector: &str,
    what: &str,
) -> Result<String> {
    match first_text(automation, selector).await? {
        Some(text) => Ok(text.trim().to_string()),
        None => {
            warn!("No {what} on page ({selector})");
            Ok(String::new())
        }
    }
}

/// Strip leading whitespace after embedded newlines. The page indents
/// wrapped paragraph lines and that indentation must not leak into the
/// rendered markdown body.
pub fn normalize_description(raw: &str) -> String {
    INDENT_RE.replace_all(raw.trim(), "\n").to_string()
}

// ── Tests ──
