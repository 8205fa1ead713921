use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// CSS selectors for the catalog's page regions. All of these are data,
/// not code: the site ships obfuscated class names that rotate, so the
/// selectors live in the config file where they can be patched without a
/// rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Item links of one category; `{category}` is substituted before the query.
    pub category_links: String,
    pub title: String,
    pub description: String,
    pub example_input: String,
    pub example_output: String,
    /// Button that opens the test-case panel.
    pub testcase_button: String,
    /// Visible text required on that button.
    pub testcase_button_label: String,
    /// Collapsed test-case rows, each expanded with a click before reading.
    pub testcase_toggle: String,
    /// Flat fragment sequence, complete only once every row is expanded.
    pub testcase_fragments: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            category_links: "[data-category=\"{category}\"] a[href*=\"/questions/\"]".into(),
            title: "h2[class*='questionTitle']".into(),
            description: "div[class*='questionPrompt']".into(),
            example_input: "pre[class*='sampleInput']".into(),
            example_output: "pre[class*='sampleOutput']".into(),
            testcase_button: "button[class*='runCode']".into(),
            testcase_button_label: "Run Code".into(),
            testcase_toggle: "div[class*='testCase'][class*='collapsed']".into(),
            testcase_fragments: "div[class*='testCase'] span[class*='value']".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub start_url: String,
    pub download_root: PathBuf,
    /// Skip-list of completed item URLs, one per line.
    pub skip_list: PathBuf,
    /// Categories in crawl order; each is also an output path segment.
    pub categories: Vec<String>,
    /// Target languages; each gets an empty subdirectory per item.
    pub languages: Vec<String>,
    /// DevTools endpoint of the already-authenticated browser.
    pub debug_url: String,
    /// Human-pacing delay bounds in milliseconds, inclusive.
    pub delay_ms: (u64, u64),
    pub selectors: Selectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.algoexpert.io".into(),
            start_url: "https://www.algoexpert.io/questions".into(),
            download_root: PathBuf::from("problems"),
            skip_list: PathBuf::from("data/scraped.txt"),
            categories: vec![
                "Arrays".into(),
                "Binary Search Trees".into(),
                "Binary Trees".into(),
                "Dynamic Programming".into(),
                "Famous Algorithms".into(),
                "Graphs".into(),
                "Greedy Algorithms".into(),
                "Heaps".into(),
                "Linked Lists".into(),
                "Recursion".into(),
                "Searching".into(),
                "Sorting".into(),
                "Stacks".into(),
                "Strings".into(),
                "Tries".into(),
            ],
            languages: vec!["python".into(), "javascript".into(), "go".into()],
            debug_url: "ws://127.0.0.1:9222/devtools/browser".into(),
            delay_ms: (800, 2500),
            selectors: Selectors::default(),
        }
    }
}

impl ScrapeConfig {
    /// Load a config file; fields left out fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// One randomized human-pacing delay drawn from the configured bounds.
    pub fn jitter(&self) -> Duration {
        let (lo, hi) = self.delay_ms;
        let ms = if hi <= lo { lo } else { rand::rng().random_range(lo..=hi) };
        Duration::from_millis(ms)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "categories": ["Arrays"], "delay_ms": [0, 0] }"#).unwrap();

        let config = ScrapeConfig::load(&path).unwrap();
        assert_eq!(config.categories, vec!["Arrays".to_string()]);
        assert_eq!(config.delay_ms, (0, 0));
        assert_eq!(config.base_url, ScrapeConfig::default().base_url);
        assert!(!config.selectors.title.is_empty());
    }

    #[test]
    fn jitter_stays_inside_bounds() {
        let mut config = ScrapeConfig::default();
        config.delay_ms = (10, 20);
        for _ in 0..50 {
            let d = config.jitter().as_millis() as u64;
            assert!((10..=20).contains(&d));
        }
    }

    #[test]
    fn zero_bounds_mean_no_delay() {
        let mut config = ScrapeConfig::default();
        config.delay_ms = (0, 0);
        assert_eq!(config.jitter(), Duration::ZERO);
    }
}
