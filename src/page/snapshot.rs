use chrono::{DateTime, Utc};
use url::Url;

/// Rendered markup of the current page, captured after it settled.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: Url,
    pub html: String,
    pub timestamp: DateTime<Utc>,
}

impl PageSnapshot {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
            timestamp: Utc::now(),
        }
    }
}
