use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Invalid selector `{0}`")]
    Selector(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ScraperError {
    pub fn navigation(url: impl ToString, reason: impl ToString) -> Self {
        ScraperError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Fatal errors stop the traversal; everything else is contained to the
    /// round that raised it.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScraperError::Extraction(_))
    }
}

impl From<anyhow::Error> for ScraperError {
    fn from(err: anyhow::Error) -> Self {
        ScraperError::Browser(err.to_string())
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;
