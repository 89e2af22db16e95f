use std::path::PathBuf;

use super::{CsvSink, MemorySink, RecordSink};
use crate::ScraperResult;

pub enum StorageType {
    Csv { path: PathBuf },
    Memory,
}

pub fn create_storage(storage_type: StorageType) -> ScraperResult<Box<dyn RecordSink>> {
    match storage_type {
        StorageType::Csv { path } => Ok(Box::new(CsvSink::create(path)?)),
        StorageType::Memory => Ok(Box::new(MemorySink::new())),
    }
}
