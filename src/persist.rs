use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::extract::ProblemRecord;
use crate::testcases::TestCase;

/// Directory name of an item: its 1-based position in the category plus
/// the title with spaces as dashes. `{:02}` pads single digits and
/// leaves 10+ as-is, matching the established layout.
pub fn item_dir_name(position: usize, title: &str) -> String {
    format!("{:02}-{}", position, title.trim().replace(' ', "-"))
}

/// Render the problem document.
pub fn render_readme(record: &ProblemRecord) -> String {
    format!(
        "## {}\n\n{}\n\n### Sample Input\n```\n{}\n```\n\n### Sample Output\n```\n{}\n```\n",
        record.title, record.description, record.example_input, record.example_output
    )
}

/// Write one item's directory: README.md, testcases.json, and one empty
/// subdirectory per target language. Plain overwrites throughout, so
/// re-scraping an uncommitted item just rewrites the same paths.
pub fn write_item(
    root: &Path,
    category: &str,
    position: usize,
    record: &ProblemRecord,
    cases: &[TestCase],
    languages: &[String],
) -> Result<PathBuf> {
    let dir = root.join(category).join(item_dir_name(position, &record.title));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    for language in languages {
        let sub = dir.join(language);
        fs::create_dir_all(&sub).with_context(|| format!("creating {}", sub.display()))?;
    }

    let readme = dir.join("README.md");
    fs::write(&readme, render_readme(record))
        .with_context(|| format!("writing {}", readme.display()))?;

    let testcases = dir.join("testcases.json");
    let json = serde_json::to_string_pretty(cases).context("serializing test cases")?;
    fs::write(&testcases, json).with_context(|| format!("writing {}", testcases.display()))?;

    Ok(dir)
}

// ── Tests ──
