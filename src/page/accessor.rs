use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, trace};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

use super::PageSnapshot;
use crate::ScraperResult;

/// The browser surface the traversal drives. One navigation at a time.
#[async_trait]
pub trait PageAccessor: Send + Sync {
    /// Load `url` and wait until the page stops loading.
    async fn goto(&self, url: &Url) -> ScraperResult<()>;

    /// Read the DOM of whatever page is currently shown.
    async fn read_dom(&self) -> ScraperResult<PageSnapshot>;

    /// Block until the operator signals they are done with the browser.
    /// No timeout.
    async fn wait_for_operator(&self, prompt: &str) -> ScraperResult<()>;

    async fn close(&self) -> ScraperResult<()>;

    async fn visit(&self, url: &Url, settle: Duration) -> ScraperResult<PageSnapshot> {
        let start_time = Utc::now();
        info!("Navigating to {}", url);
        self.goto(url).await?;

        if !settle.is_zero() {
            trace!("Settling for {:?}", settle);
            sleep(settle).await;
        }

        let snapshot = self.read_dom().await?;
        debug!(
            "Loaded {} (landed on {}, {} bytes, {} ms)",
            url,
            snapshot.url,
            snapshot.html.len(),
            Utc::now().signed_duration_since(start_time).num_milliseconds()
        );
        Ok(snapshot)
    }
}
