use async_trait::async_trait;

use crate::core::SubmissionRecord;
use crate::ScraperResult;

/// Append-only destination for records. `append` returns only once the row
/// is durable, so a crash never loses a row that was reported written.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append(&mut self, record: &SubmissionRecord) -> ScraperResult<()>;

    /// Human readable location, reported at the end of the run.
    fn location(&self) -> String;
}
