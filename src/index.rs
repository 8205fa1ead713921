use anyhow::{Context, Result};
use tracing::{info, warn};
use url::Url;

use crate::browser::Automation;
use crate::config::ScrapeConfig;

/// Navigate to the catalog page and enumerate every configured category,
/// in configured order.
pub async fn index_catalog<A: Automation + Sync>(
    automation: &A,
    config: &ScrapeConfig,
) -> Result<Vec<(String, Vec<String>)>> {
    automation
        .navigate(&config.start_url)
        .await
        .context("opening catalog page")?;
    automation.settle(config.jitter()).await;

    let mut catalog = Vec::with_capacity(config.categories.len());
    for category in &config.categories {
        let urls = index_category(automation, config, category).await?;
        catalog.push((category.clone(), urls));
    }
    Ok(catalog)
}

/// Item URLs of one category, in DOM document order. That order is what
/// numbers the output directories, so no sorting and no dedup here; the
/// skip-list handles repeats downstream.
pub async fn index_category<A: Automation>(
    automation: &A,
    config: &ScrapeConfig,
    category: &str,
) -> Result<Vec<String>> {
    let selector = config.selectors.category_links.replace("{category}", category);
    let base = Url::parse(&config.base_url)
        .with_context(|| format!("invalid base URL {}", config.base_url))?;

    let handles = automation.query(&selector).await?;
    let mut urls = Vec::with_capacity(handles.len());
    for handle in &handles {
        match automation.attribute(handle, "href").await? {
            Some(href) => {
                let resolved = base
                    .join(&href)
                    .with_context(|| format!("resolving link {href}"))?;
                urls.push(resolved.to_string());
            }
            None => warn!("Category {category}: link element without href, skipping"),
        }
    }

    if urls.is_empty() {
        warn!("Category {category}: no items matched {selector}");
    } else {
        info!("Category {category}: {} items", urls.len());
    }
    Ok(urls)
}

// ── Tests ──
