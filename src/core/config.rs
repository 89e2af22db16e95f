use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::model::SubmitterId;
use super::{ScraperError, ScraperResult};

pub const DEFAULT_BASE_URL: &str = "https://app.musicleague.com/";
pub const DEFAULT_OUTPUT: &str = "musicleague-submissions.csv";
pub const DEFAULT_USER_DATA_DIR: &str = "./user-data";

/// Which submissions the traversal collects. Fixed before the first navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Single(SubmitterId),
    AllSubmitters,
}

impl RunMode {
    /// Empty or missing identity selects all submitters.
    pub fn from_identity(identity: Option<&str>) -> Self {
        match identity.and_then(SubmitterId::new) {
            Some(id) => RunMode::Single(id),
            None => RunMode::AllSubmitters,
        }
    }

    pub fn entry_url(&self, base: &Url) -> ScraperResult<Url> {
        match self {
            RunMode::Single(id) => Ok(base.join(&format!("user/{}/", id))?),
            RunMode::AllSubmitters => Ok(base.join("/")?),
        }
    }

    pub fn submitter(&self) -> Option<&SubmitterId> {
        match self {
            RunMode::Single(id) => Some(id),
            RunMode::AllSubmitters => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettleDelays {
    pub entry: Duration,
    pub league: Duration,
    pub round: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            entry: Duration::from_millis(2000),
            league: Duration::from_millis(1500),
            round: Duration::from_millis(1000),
        }
    }
}

impl SettleDelays {
    pub fn none() -> Self {
        Self {
            entry: Duration::ZERO,
            league: Duration::ZERO,
            round: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub window_size: (u32, u32),
    /// Keeps the login session between runs.
    pub user_data_dir: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_size: (1280, 800),
            user_data_dir: Some(PathBuf::from(DEFAULT_USER_DATA_DIR)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub run_mode: RunMode,
    pub output_path: PathBuf,
    pub settle: SettleDelays,
    pub browser: BrowserConfig,
    pub hold_on_finish: bool,
}

impl ScrapeConfig {
    pub fn new(run_mode: RunMode) -> ScraperResult<Self> {
        Ok(Self {
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            run_mode,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            settle: SettleDelays::default(),
            browser: BrowserConfig::default(),
            hold_on_finish: true,
        })
    }

    /// Reads `ML_USER_ID`, `ML_HOST`, `ML_OUTPUT` and `ML_HEADLESS`.
    pub fn from_env() -> ScraperResult<Self> {
        let identity = env::var("ML_USER_ID").ok();
        let mut config = Self::new(RunMode::from_identity(identity.as_deref()))?;

        if let Ok(host) = env::var("ML_HOST") {
            config = config.with_base_url(&host)?;
        }
        if let Ok(output) = env::var("ML_OUTPUT") {
            if !output.trim().is_empty() {
                config = config.with_output_path(output.trim());
            }
        }
        if let Ok(headless) = env::var("ML_HEADLESS") {
            config.browser.headless = parse_flag(&headless)?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base: &str) -> ScraperResult<Self> {
        let base = base.trim();
        let base = if base.contains("://") {
            base.to_string()
        } else {
            format!("https://{}", base)
        };
        let url = Url::parse(&base)?;
        if url.host_str().is_none() {
            return Err(ScraperError::Config(format!("base URL has no host: {}", base)));
        }
        self.base_url = url.join("/")?;
        Ok(self)
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_settle(mut self, settle: SettleDelays) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    pub fn with_hold_on_finish(mut self, hold: bool) -> Self {
        self.hold_on_finish = hold;
        self
    }

    pub fn entry_url(&self) -> ScraperResult<Url> {
        self.run_mode.entry_url(&self.base_url)
    }
}

fn parse_flag(value: &str) -> ScraperResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ScraperError::Config(format!("not a boolean: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_from_identity() {
        assert_eq!(RunMode::from_identity(None), RunMode::AllSubmitters);
        assert_eq!(RunMode::from_identity(Some("")), RunMode::AllSubmitters);
        assert_eq!(
            RunMode::from_identity(Some("abc")),
            RunMode::Single(SubmitterId::new("abc").unwrap())
        );
    }

    #[test]
    fn test_entry_urls() {
        let base = Url::parse("https://app.musicleague.com/").unwrap();
        let single = RunMode::from_identity(Some("21efc313"));
        assert_eq!(
            single.entry_url(&base).unwrap().as_str(),
            "https://app.musicleague.com/user/21efc313/"
        );
        assert_eq!(
            RunMode::AllSubmitters.entry_url(&base).unwrap().as_str(),
            "https://app.musicleague.com/"
        );
    }

    #[test]
    fn test_base_url_normalisation() {
        let config = ScrapeConfig::new(RunMode::AllSubmitters)
            .unwrap()
            .with_base_url("league.test/some/path")
            .unwrap();
        assert_eq!(config.base_url.as_str(), "https://league.test/");
        assert_eq!(config.entry_url().unwrap().as_str(), "https://league.test/");
    }

    #[test]
    fn test_defaults_match_original_run() {
        let config = ScrapeConfig::new(RunMode::AllSubmitters).unwrap();
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.settle.entry, Duration::from_millis(2000));
        assert_eq!(config.settle.league, Duration::from_millis(1500));
        assert_eq!(config.settle.round, Duration::from_millis(1000));
        assert!(!config.browser.headless);
        assert!(config.hold_on_finish);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
