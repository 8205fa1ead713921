//! Scripted stand-ins for the browser, so the pipeline can be driven
//! against canned pages.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::browser::Automation;
use crate::config::{ScrapeConfig, Selectors};

/// One scripted element: its text plus any attributes.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub attrs: HashMap<String, String>,
}

impl FakeElement {
    pub fn text(text: &str) -> Self {
        Self { text: text.to_string(), attrs: HashMap::new() }
    }

    pub fn link(href: &str) -> Self {
        Self {
            text: String::new(),
            attrs: HashMap::from([("href".to_string(), href.to_string())]),
        }
    }
}

/// Scripted page: selector → elements, in document order.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: HashMap<String, Vec<FakeElement>>,
}

impl FakePage {
    pub fn with(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }
}

/// Scripted automation: pages keyed by URL, elements keyed by selector.
/// Clicks are recorded for assertions; settling is a no-op.
#[derive(Default)]
pub struct FakeAutomation {
    pages: HashMap<String, FakePage>,
    broken: Vec<String>,
    current: Mutex<String>,
    clicked: Mutex<Vec<String>>,
}

impl FakeAutomation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Mark a URL whose navigation fails outright.
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.push(url.to_string());
        self
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicked.lock().unwrap().clone()
    }

    fn on_current_page(&self, selector: &str) -> Vec<FakeElement> {
        let current = self.current.lock().unwrap().clone();
        self.pages
            .get(&current)
            .and_then(|page| page.elements.get(selector))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Automation for FakeAutomation {
    type Handle = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        if self.broken.iter().any(|b| b == url) {
            bail!("navigation failed: {url}");
        }
        *self.current.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn query(&self, selector: &str) -> Result<Vec<FakeElement>> {
        Ok(self.on_current_page(selector))
    }

    async fn text(&self, handle: &FakeElement) -> Result<String> {
        Ok(handle.text.clone())
    }

    async fn attribute(&self, handle: &FakeElement, name: &str) -> Result<Option<String>> {
        Ok(handle.attrs.get(name).cloned())
    }

    async fn click(&self, handle: &FakeElement) -> Result<()> {
        self.clicked.lock().unwrap().push(handle.text.clone());
        Ok(())
    }

    async fn click_by_text(&self, selector: &str, text: &str) -> Result<()> {
        let found = self
            .on_current_page(selector)
            .iter()
            .any(|el| el.text.trim() == text);
        if !found {
            bail!("no element matching {selector:?} with text {text:?}");
        }
        self.clicked.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn settle(&self, _wait: Duration) {}
}

/// Config pointing at a temp directory, with the simplified selectors
/// the scripted pages use and no pacing delays.
pub fn test_config(root: &Path) -> ScrapeConfig {
    ScrapeConfig {
        base_url: "https://example.com".into(),
        start_url: "https://example.com/questions".into(),
        download_root: root.join("problems"),
        skip_list: root.join("scraped.txt"),
        categories: vec!["Arrays".into()],
        languages: vec!["python".into()],
        debug_url: String::new(),
        delay_ms: (0, 0),
        selectors: Selectors {
            category_links: "[data-category=\"{category}\"] a".into(),
            title: "h2.title".into(),
            description: "div.prompt".into(),
            example_input: "pre.sample-input".into(),
            example_output: "pre.sample-output".into(),
            testcase_button: "button.run".into(),
            testcase_button_label: "Run Code".into(),
            testcase_toggle: "div.collapsed".into(),
            testcase_fragments: "span.value".into(),
        },
    }
}

/// A complete problem page: record fields, the panel button, and the
/// given raw fragment sequence.
pub fn problem_page(title: &str, description: &str, fragments: &[&str]) -> FakePage {
    FakePage::default()
        .with("h2.title", vec![FakeElement::text(title)])
        .with("div.prompt", vec![FakeElement::text(description)])
        .with("pre.sample-input", vec![FakeElement::text("[3, 5, -4], 1")])
        .with("pre.sample-output", vec![FakeElement::text("[-4, 5]")])
        .with("button.run", vec![FakeElement::text("Run Code")])
        .with(
            "span.value",
            fragments.iter().map(|f| FakeElement::text(f)).collect(),
        )
}
