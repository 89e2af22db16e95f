use scraper::{ElementRef, Selector};

use crate::{ScraperError, ScraperResult};

pub fn selector(css: &str) -> ScraperResult<Selector> {
    Selector::parse(css).map_err(|_| ScraperError::Selector(css.to_string()))
}

/// Visible text of an element with surrounding whitespace removed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

enum Strategy {
    First(Selector),
    Nth(Selector, usize),
}

impl Strategy {
    fn apply(&self, scope: ElementRef<'_>) -> Option<String> {
        let found = match self {
            Strategy::First(sel) => scope.select(sel).next(),
            Strategy::Nth(sel, index) => scope.select(sel).nth(*index),
        };
        found.map(element_text).filter(|text| !text.is_empty())
    }
}

/// Ordered list of best-effort lookups for one field. The first strategy that
/// yields non-empty text wins; when none does the field is empty.
pub struct FieldResolver {
    strategies: Vec<Strategy>,
}

impl FieldResolver {
    pub fn first(css: &str) -> ScraperResult<Self> {
        Ok(Self {
            strategies: vec![Strategy::First(selector(css)?)],
        })
    }

    pub fn nth(css: &str, index: usize) -> ScraperResult<Self> {
        Ok(Self {
            strategies: vec![Strategy::Nth(selector(css)?, index)],
        })
    }

    pub fn or_first(mut self, css: &str) -> ScraperResult<Self> {
        self.strategies.push(Strategy::First(selector(css)?));
        Ok(self)
    }

    pub fn resolve(&self, scope: ElementRef<'_>) -> String {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.apply(scope))
            .unwrap_or_default()
    }
}
