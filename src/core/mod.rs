pub mod config;
mod errors;
pub mod model;
pub mod traversal;

pub use config::{BrowserConfig, RunMode, ScrapeConfig, SettleDelays};
pub use errors::{ScraperError, ScraperResult};
pub use model::{LeagueRef, RoundRef, SubmissionRecord, SubmitterId};
pub use traversal::{Phase, RunOutcome, RunReport, Traversal};
