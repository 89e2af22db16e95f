use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{info, warn};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::spawn_blocking;
use url::Url;

use super::{PageAccessor, PageSnapshot};
use crate::core::BrowserConfig;
use crate::{ScraperError, ScraperResult};

// Operator waits can last as long as a login takes.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// A single Chrome tab driven over the DevTools protocol.
pub struct ChromePage {
    // Dropping the browser kills the Chrome process.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    pub fn launch(config: &BrowserConfig) -> ScraperResult<Self> {
        info!(
            "Launching browser (headless={}, profile={:?})",
            config.headless, config.user_data_dir
        );

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .user_data_dir(config.user_data_dir.clone())
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .build()
            .map_err(|e| ScraperError::Browser(e.to_string()))?;

        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

async fn blocking<T, F>(f: F) -> ScraperResult<anyhow::Result<T>>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| ScraperError::Browser(format!("browser task failed: {}", e)))
}

#[async_trait]
impl PageAccessor for ChromePage {
    async fn goto(&self, url: &Url) -> ScraperResult<()> {
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();

        // headless_chrome has no network-idle wait; the caller's settle delay
        // covers requests issued after the load event.
        blocking(move || {
            tab.navigate_to(&target)?;
            tab.wait_until_navigated()?;
            Ok(())
        })
        .await?
        .map_err(|e| ScraperError::navigation(url, e))
    }

    async fn read_dom(&self) -> ScraperResult<PageSnapshot> {
        let tab = Arc::clone(&self.tab);
        let location = tab.get_url();
        let url = Url::parse(&location)?;

        let html = blocking(move || tab.get_content())
            .await?
            .map_err(|e| ScraperError::Extraction(format!("reading DOM of {}: {}", location, e)))?;

        Ok(PageSnapshot::new(url, html))
    }

    async fn wait_for_operator(&self, prompt: &str) -> ScraperResult<()> {
        println!("\n{}", prompt);
        println!("Press Enter in this terminal to continue...\n");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        if read == 0 {
            warn!("stdin closed, continuing without operator confirmation");
        }
        Ok(())
    }

    async fn close(&self) -> ScraperResult<()> {
        let tab = Arc::clone(&self.tab);
        blocking(move || tab.close(true))
            .await?
            .map_err(|e| ScraperError::Browser(e.to_string()))?;
        info!("Browser tab closed");
        Ok(())
    }
}
