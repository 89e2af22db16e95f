use log::{debug, trace};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use super::fields::{element_text, selector};
use crate::core::LeagueRef;
use crate::ScraperResult;

static LEAGUE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/l/([a-f0-9]+)/").expect("league pattern is valid"));

pub struct LeagueLocator {
    links: Selector,
}

impl LeagueLocator {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            links: selector(r#"a[href*="/l/"]"#)?,
        })
    }

    /// League links in DOM order, one per league id. The first link seen for
    /// an id supplies its name.
    pub fn discover(&self, document: &Html, page_url: &Url, base: &Url) -> Vec<LeagueRef> {
        let mut seen = HashSet::new();
        let mut leagues = Vec::new();

        for link in document.select(&self.links) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let Ok(target) = page_url.join(href) else {
                trace!("Skipping unparsable href {}", href);
                continue;
            };
            let Some(captures) = LEAGUE_HREF.captures(target.as_str()) else {
                continue;
            };

            let id = captures[1].to_string();
            if seen.contains(&id) {
                continue;
            }

            let url = match base.join(&format!("l/{}/", id)) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Cannot build league URL for {}: {}", id, e);
                    continue;
                }
            };

            seen.insert(id.clone());
            leagues.push(LeagueRef {
                id,
                name: element_text(link),
                url,
            });
        }

        leagues
    }
}
