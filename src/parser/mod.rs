//! Pure extraction over rendered markup. Nothing here touches the browser;
//! every function takes an already parsed [`scraper::Html`].

pub mod fields;
pub mod league;
pub mod points;
pub mod round;
pub mod submission;

pub use fields::FieldResolver;
pub use league::LeagueLocator;
pub use points::normalize_points;
pub use round::{RoundLocator, UNKNOWN_ROUND};
pub use submission::SubmissionLocator;

use crate::ScraperResult;

/// All locators, with their selectors compiled once per run.
pub struct EntityLocator {
    pub leagues: LeagueLocator,
    pub rounds: RoundLocator,
    pub submissions: SubmissionLocator,
}

impl EntityLocator {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            leagues: LeagueLocator::new()?,
            rounds: RoundLocator::new()?,
            submissions: SubmissionLocator::new()?,
        })
    }
}
