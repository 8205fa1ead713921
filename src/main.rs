mod browser;
mod config;
mod extract;
mod index;
mod persist;
mod pipeline;
mod state;
mod testcases;
#[cfg(test)]
mod testutil;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::browser::CdpBrowser;
use crate::config::ScrapeConfig;
use crate::pipeline::Pipeline;
use crate::state::CrawlState;

#[derive(Parser)]
#[command(
    name = "prep_scraper",
    about = "Coding-problem catalog scraper driving an authenticated browser session"
)]
struct Cli {
    /// Path to a JSON config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every category and scrape items not yet in the skip-list
    Run {
        /// Max items to scrape this run (default: all remaining)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List categories and their item counts without scraping
    Index,
    /// Show completed-item statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ScrapeConfig::load(path)?,
        None => ScrapeConfig::default(),
    };

    let result = match cli.command {
        Commands::Run { limit } => {
            let state = CrawlState::load(&config.skip_list)?;
            let browser = CdpBrowser::connect(&config.debug_url).await?;
            let mut pipeline = Pipeline::new(&browser, &config, state);
            let stats = pipeline.run(limit).await?;
            println!(
                "Done: {} scraped, {} skipped, {} failed.",
                stats.scraped, stats.skipped, stats.failed
            );
            Ok(())
        }
        Commands::Index => {
            let browser = CdpBrowser::connect(&config.debug_url).await?;
            let catalog = index::index_catalog(&browser, &config).await?;
            for (category, urls) in &catalog {
                println!("{:<24} {:>4} items", category, urls.len());
            }
            let total: usize = catalog.iter().map(|(_, urls)| urls.len()).sum();
            println!("\n{} categories, {} items total", catalog.len(), total);
            Ok(())
        }
        Commands::Stats => {
            let state = CrawlState::load(&config.skip_list)?;
            println!("Completed items: {}", state.len());
            println!("Categories:      {}", config.categories.len());
            println!("Skip-list:       {}", config.skip_list.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
