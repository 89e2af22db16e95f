pub mod core;
pub mod dedupe;
pub mod page;
pub mod parser;
pub mod stats;
pub mod storage;

pub use core::Traversal;
pub use core::{ScraperError, ScraperResult};
pub use page::{PageAccessor, PageSnapshot};
pub use stats::StatsTracker;
pub use storage::{CsvSink, RecordSink};
