use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Completed item URLs, one per line in a UTF-8 text file. The file is
/// the only state shared across runs: a URL is appended immediately after
/// its item is fully persisted, never before, so an interrupted run can
/// only under-report progress.
pub struct CrawlState {
    file: File,
    done: HashSet<String>,
}

impl CrawlState {
    /// Load the skip-list, creating an empty file on first run.
    pub fn load(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening skip-list {}", path.display()))?;

        let mut done = HashSet::new();
        for line in BufReader::new(&file).lines() {
            let line = line.with_context(|| format!("reading skip-list {}", path.display()))?;
            let url = line.trim();
            if !url.is_empty() {
                done.insert(url.to_string());
            }
        }
        info!("Skip-list {}: {} completed items", path.display(), done.len());
        Ok(Self { file, done })
    }

    pub fn contains(&self, url: &str) -> bool {
        self.done.contains(url)
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    /// Record one completed URL. Called only after the item's files are
    /// durably written; an append failure is surfaced, not swallowed,
    /// since losing it would mean silently re-scraping next run.
    pub fn commit(&mut self, url: &str) -> Result<()> {
        writeln!(&self.file, "{url}").context("appending to skip-list")?;
        self.file.flush().context("flushing skip-list")?;
        self.done.insert(url.to_string());
        Ok(())
    }
}

// ── Tests ──
