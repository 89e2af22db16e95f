use async_trait::async_trait;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};

use super::RecordSink;
use crate::core::SubmissionRecord;
use crate::ScraperResult;

/// CSV file with every field quoted and embedded quotes doubled.
pub struct CsvSink {
    path: PathBuf,
    writer: Writer<File>,
    rows: usize,
}

impl CsvSink {
    /// Truncates `path` and writes the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> ScraperResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_path(&path)?;

        let mut sink = Self {
            path,
            writer,
            rows: 0,
        };
        sink.writer.write_record(SubmissionRecord::HEADER)?;
        sink.sync()?;

        info!("Writing to: {}", sink.path.display());
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn sync(&mut self) -> ScraperResult<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn append(&mut self, record: &SubmissionRecord) -> ScraperResult<()> {
        self.writer.write_record(record.fields())?;
        self.sync()?;
        self.rows += 1;
        debug!("Appended row {} to {}", self.rows, self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
