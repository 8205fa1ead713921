use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::browser::Automation;
use crate::config::ScrapeConfig;
use crate::extract;
use crate::index;
use crate::persist;
use crate::state::CrawlState;
use crate::testcases;

/// Counters for one run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub scraped: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Drives the crawl: one category at a time, one item at a time, on the
/// one shared page. Items already in the skip-list are skipped; an item
/// is committed there only after its files are fully written, so a run
/// can be interrupted anywhere and resumed safely.
pub struct Pipeline<'a, A: Automation> {
    automation: &'a A,
    config: &'a ScrapeConfig,
    state: CrawlState,
}

impl<'a, A: Automation + Sync> Pipeline<'a, A> {
    pub fn new(automation: &'a A, config: &'a ScrapeConfig, state: CrawlState) -> Self {
        Self { automation, config, state }
    }

    /// Crawl every configured category. Item failures are isolated to
    /// the item; only skip-list write errors abort the run.
    pub async fn run(&mut self, limit: Option<usize>) -> Result<RunStats> {
        let catalog = index::index_catalog(self.automation, self.config).await?;
        let mut stats = RunStats::default();

        'categories: for (category, urls) in &catalog {
            let pb = ProgressBar::new(urls.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
                    .progress_chars("=> "),
            );
            pb.set_message(category.clone());

            for (i, url) in urls.iter().enumerate() {
                if limit.is_some_and(|n| stats.scraped + stats.failed >= n) {
                    pb.finish_and_clear();
                    info!("Item limit reached, stopping");
                    break 'categories;
                }

                if self.state.contains(url) {
                    stats.skipped += 1;
                    pb.inc(1);
                    continue;
                }

                match self.scrape_item(category, i + 1, url).await {
                    Ok(()) => {
                        // Commit strictly after the successful persist;
                        // a failure here must not be swallowed.
                        self.state
                            .commit(url)
                            .with_context(|| format!("recording completed item {url}"))?;
                        stats.scraped += 1;
                    }
                    Err(e) => {
                        error!("Failed {url}: {e:#}");
                        stats.failed += 1;
                    }
                }
                pb.inc(1);
            }
            pb.finish_and_clear();
        }

        info!(
            "Run complete: {} scraped, {} skipped, {} failed",
            stats.scraped, stats.skipped, stats.failed
        );
        Ok(stats)
    }

    /// One item: navigate, extract the record, pair the test cases,
    /// persist. Any error leaves the item uncommitted for the next run.
    async fn scrape_item(&self, category: &str, position: usize, url: &str) -> Result<()> {
        self.automation
            .navigate(url)
            .await
            .context("navigating to item")?;
        self.automation.settle(self.config.jitter()).await;

        let record = extract::extract_record(self.automation, &self.config.selectors).await?;

        let fragments = self.collect_fragments().await?;
        let cases = testcases::pair_fragments(&fragments);

        let dir = persist::write_item(
            &self.config.download_root,
            category,
            position,
            &record,
            &cases,
            &self.config.languages,
        )?;
        info!("Saved {} ({} test cases) to {}", record.title, cases.len(), dir.display());
        Ok(())
    }

    /// Open the test-case panel and expand every collapsed row, so the
    /// fragment query sees the complete sequence.
    async fn collect_fragments(&self) -> Result<Vec<String>> {
        let selectors = &self.config.selectors;
        self.automation
            .click_by_text(&selectors.testcase_button, &selectors.testcase_button_label)
            .await
            .context("opening test-case panel")?;
        self.automation.settle(self.config.jitter()).await;

        let toggles = self.automation.query(&selectors.testcase_toggle).await?;
        for toggle in &toggles {
            self.automation.click(toggle).await?;
            self.automation.settle(self.config.jitter()).await;
        }

        let handles = self.automation.query(&selectors.testcase_fragments).await?;
        let mut fragments = Vec::with_capacity(handles.len());
        for handle in &handles {
            fragments.push(self.automation.text(handle).await?);
        }
        Ok(fragments)
    }
}

// ── Tests ──
