use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tracing::debug;

/// The slice of browser behavior the pipeline consumes. One shared page;
/// callers must not interleave navigations.
#[async_trait]
pub trait Automation {
    type Handle: Send + Sync;

    async fn navigate(&self, url: &str) -> Result<()>;

    /// All elements currently matching `selector`, in document order.
    async fn query(&self, selector: &str) -> Result<Vec<Self::Handle>>;

    async fn text(&self, handle: &Self::Handle) -> Result<String>;

    async fn attribute(&self, handle: &Self::Handle, name: &str) -> Result<Option<String>>;

    async fn click(&self, handle: &Self::Handle) -> Result<()>;

    /// Click the first element matching `selector` whose visible text
    /// equals `text`. Errors when no such element exists.
    async fn click_by_text(&self, selector: &str, text: &str) -> Result<()>;

    /// Let the page settle for `wait`.
    async fn settle(&self, wait: Duration) {
        tokio::time::sleep(wait).await;
    }
}

/// CDP-backed automation attached to an already-running browser. The
/// operator logs in by hand; this process only drives the page.
pub struct CdpBrowser {
    // Dropping the Browser tears down the CDP connection, so it rides
    // along even though only the page is used.
    _browser: Browser,
    page: Page,
}

impl CdpBrowser {
    /// Attach over the DevTools websocket endpoint and open a fresh tab.
    pub async fn connect(debug_url: &str) -> Result<Self> {
        let (browser, mut handler) = Browser::connect(debug_url)
            .await
            .with_context(|| format!("connecting to browser at {debug_url}"))?;

        // The handler stream must be polled for the connection to make progress.
        tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .context("opening a new page")?;
        Ok(Self { _browser: browser, page })
    }
}

#[async_trait]
impl Automation for CdpBrowser {
    type Handle = Element;

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("navigate {url}");
        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigating to {url}"))?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn query(&self, selector: &str) -> Result<Vec<Element>> {
        self.page
            .find_elements(selector)
            .await
            .with_context(|| format!("querying {selector}"))
    }

    async fn text(&self, handle: &Element) -> Result<String> {
        Ok(handle.inner_text().await?.unwrap_or_default())
    }

    async fn attribute(&self, handle: &Element, name: &str) -> Result<Option<String>> {
        Ok(handle.attribute(name).await?)
    }

    async fn click(&self, handle: &Element) -> Result<()> {
        handle.click().await?;
        Ok(())
    }

    async fn click_by_text(&self, selector: &str, text: &str) -> Result<()> {
        for el in self.page.find_elements(selector).await? {
            let label = el.inner_text().await?.unwrap_or_default();
            if label.trim() == text {
                el.click().await?;
                return Ok(());
            }
        }
        bail!("no element matching {selector:?} with text {text:?}")
    }
}
