use log::trace;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use super::fields::{element_text, selector};
use crate::core::RoundRef;
use crate::ScraperResult;

pub const UNKNOWN_ROUND: &str = "Unknown Round";

static ROUND_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/l/[a-f0-9]+/([a-f0-9]+)/").expect("round pattern is valid")
});

pub struct RoundLocator {
    links: Selector,
    title: Selector,
}

impl RoundLocator {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            links: selector("a[href]")?,
            title: selector("h5.card-title")?,
        })
    }

    /// Round links on a league page, unique by absolute URL, in DOM order.
    ///
    /// Any link shaped like `/l/{league}/{round}/` is kept, so pages that are
    /// not rounds can come through; submission extraction returns nothing for
    /// them.
    pub fn discover(&self, document: &Html, page_url: &Url) -> Vec<RoundRef> {
        let mut seen = HashSet::new();
        let mut rounds = Vec::new();

        for link in document.select(&self.links) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let Ok(target) = page_url.join(href) else {
                trace!("Skipping unparsable href {}", href);
                continue;
            };
            if !ROUND_HREF.is_match(target.as_str()) {
                continue;
            }

            let text = element_text(link);
            let looks_like_round = text.contains("Results")
                || text.contains("Round")
                || target.as_str().contains("/l/");
            if !looks_like_round {
                continue;
            }

            if seen.insert(target.to_string()) {
                rounds.push(RoundRef {
                    url: target,
                    name: text,
                });
            }
        }

        rounds
    }

    /// Title shown on the round page, or [`UNKNOWN_ROUND`] when the page has
    /// no title element.
    pub fn round_name(&self, document: &Html) -> String {
        document
            .select(&self.title)
            .next()
            .map(element_text)
            .unwrap_or_else(|| UNKNOWN_ROUND.to_string())
    }
}
