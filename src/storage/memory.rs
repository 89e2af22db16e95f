use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use super::RecordSink;
use crate::core::SubmissionRecord;
use crate::{ScraperError, ScraperResult};

/// Keeps rows in memory. Clones share the same rows.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<RwLock<Vec<SubmissionRecord>>>,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `limit` rows, then fail every further append.
    pub fn failing_after(limit: usize) -> Self {
        Self {
            fail_after: Some(limit),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn append(&mut self, record: &SubmissionRecord) -> ScraperResult<()> {
        let mut records = self.records.write();
        if self.fail_after.is_some_and(|limit| records.len() >= limit) {
            return Err(ScraperError::StorageError("memory sink is full".to_string()));
        }
        records.push(record.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
