use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use url::Url;

use super::{PageAccessor, PageSnapshot};
use crate::{ScraperError, ScraperResult};

#[derive(Default)]
struct MockSite {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    failures: HashSet<String>,
    unreadable: HashSet<String>,
}

#[derive(Default)]
struct MockState {
    current: Option<Url>,
    operator_moves: VecDeque<String>,
    visits: Vec<String>,
    signals: usize,
    closed: bool,
}

/// Scripted page accessor. Unknown URLs render as an empty document.
/// Clones share state so a test can keep a handle after boxing one.
#[derive(Clone, Default)]
pub struct MockPage {
    site: Arc<RwLock<MockSite>>,
    state: Arc<RwLock<MockState>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.site
            .write()
            .pages
            .insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_redirect(self, from: &str, to: &str) -> Self {
        self.site
            .write()
            .redirects
            .insert(from.to_string(), to.to_string());
        self
    }

    /// Navigating to `url` fails as if the browser went away.
    pub fn with_failure(self, url: &str) -> Self {
        self.site.write().failures.insert(url.to_string());
        self
    }

    /// Reading the DOM at `url` raises an extraction error.
    pub fn with_unreadable(self, url: &str) -> Self {
        self.site.write().unreadable.insert(url.to_string());
        self
    }

    /// On the next operator signal, the operator leaves the browser on `url`.
    pub fn with_operator_navigation(self, url: &str, html: &str) -> Self {
        self.site
            .write()
            .pages
            .insert(url.to_string(), html.to_string());
        self.state
            .write()
            .operator_moves
            .push_back(url.to_string());
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.state.read().visits.clone()
    }

    pub fn signal_count(&self) -> usize {
        self.state.read().signals
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }
}

#[async_trait]
impl PageAccessor for MockPage {
    async fn goto(&self, url: &Url) -> ScraperResult<()> {
        let requested = url.to_string();
        let site = self.site.read();
        if site.failures.contains(&requested) {
            return Err(ScraperError::navigation(url, "mock navigation failure"));
        }

        let landed = match site.redirects.get(&requested) {
            Some(target) => Url::parse(target)?,
            None => url.clone(),
        };

        let mut state = self.state.write();
        state.visits.push(requested);
        state.current = Some(landed);
        Ok(())
    }

    async fn read_dom(&self) -> ScraperResult<PageSnapshot> {
        let current = self
            .state
            .read()
            .current
            .clone()
            .ok_or_else(|| ScraperError::Browser("no page loaded".to_string()))?;

        let site = self.site.read();
        if site.unreadable.contains(current.as_str()) {
            return Err(ScraperError::Extraction(format!(
                "mock DOM read failure at {}",
                current
            )));
        }

        let html = site.pages.get(current.as_str()).cloned().unwrap_or_default();
        Ok(PageSnapshot::new(current, html))
    }

    async fn wait_for_operator(&self, prompt: &str) -> ScraperResult<()> {
        debug!("Operator prompt: {}", prompt);
        let mut state = self.state.write();
        state.signals += 1;
        if let Some(url) = state.operator_moves.pop_front() {
            state.current = Some(Url::parse(&url)?);
        }
        Ok(())
    }

    async fn close(&self) -> ScraperResult<()> {
        self.state.write().closed = true;
        Ok(())
    }
}
