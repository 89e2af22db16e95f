use log::{debug, error, info, warn};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{Phase, RunOutcome, RunReport};
use crate::core::{LeagueRef, RoundRef, RunMode, ScrapeConfig, SubmissionRecord};
use crate::dedupe::dedupe;
use crate::page::{PageAccessor, PageSnapshot};
use crate::parser::submission::RoundContext;
use crate::parser::EntityLocator;
use crate::stats::StatsTracker;
use crate::storage::RecordSink;
use crate::ScraperResult;

const AUTH_PATH_PREFIXES: [&str; 4] = ["/login", "/signin", "/auth", "/oauth"];

const LOGIN_PROMPT: &str = "Please log in to Music League in the browser window.\n\
     After logging in, navigate back to your profile if needed.";
const LEAGUES_PROMPT: &str = "No leagues found on the current page.\n\
     Open a page that lists your leagues in the browser window.";

/// True when the browser ended up somewhere other than the app itself, or on
/// one of its sign-in pages.
pub fn is_auth_location(location: &Url, base: &Url) -> bool {
    if location.host_str() != base.host_str() {
        return true;
    }
    let path = location.path();
    AUTH_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Walks leagues, then rounds, then submissions, one page at a time, and
/// appends every record before moving to the next round.
pub struct Traversal {
    config: ScrapeConfig,
    page: Box<dyn PageAccessor>,
    sink: Box<dyn RecordSink>,
    locator: EntityLocator,
    stats: Arc<StatsTracker>,
    phase: Phase,
}

impl Traversal {
    pub fn new(
        config: ScrapeConfig,
        page: Box<dyn PageAccessor>,
        sink: Box<dyn RecordSink>,
    ) -> ScraperResult<Self> {
        info!("Initializing traversal");
        Ok(Self {
            config,
            page,
            sink,
            locator: EntityLocator::new()?,
            stats: Arc::new(StatsTracker::new()),
            phase: Phase::Start,
        })
    }

    pub fn page(&self) -> &dyn PageAccessor {
        self.page.as_ref()
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs to completion or to the first fatal error. Rows appended before
    /// an abort stay in the sink and are counted in the report.
    pub async fn run(&mut self) -> RunReport {
        info!(
            "Starting run {} ({})",
            self.stats.run_id(),
            match &self.config.run_mode {
                RunMode::Single(id) => format!("submitter {}", id),
                RunMode::AllSubmitters => "all submitters".to_string(),
            }
        );

        let outcome = match self.walk().await {
            Ok(()) => {
                self.enter(Phase::Done);
                RunOutcome::Done
            }
            Err(e) => {
                error!("Traversal aborted during {}: {}", self.phase, e);
                RunOutcome::Aborted {
                    phase: self.phase,
                    reason: e.to_string(),
                }
            }
        };

        self.report(outcome)
    }

    /// Snapshot of the run so far. Also used when the run is interrupted
    /// from outside.
    pub fn report(&self, outcome: RunOutcome) -> RunReport {
        self.stats.finish();
        let stats = self.stats.get_stats();
        RunReport {
            outcome,
            records_written: stats.records_written,
            output: self.sink.location(),
            stats,
        }
    }

    async fn walk(&mut self) -> ScraperResult<()> {
        self.authenticate().await?;

        let leagues = self.discover_leagues().await?;
        let total = leagues.len();
        for (index, league) in leagues.iter().enumerate() {
            info!("[{}/{}] Processing league: {}", index + 1, total, league.name);
            self.process_league(league).await?;
        }

        info!(
            "Total submissions found: {}",
            self.stats.get_stats().records_written
        );
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Entering {}", phase);
        self.phase = phase;
    }

    async fn load(&self, url: &Url, settle: Duration) -> ScraperResult<PageSnapshot> {
        self.stats.record_navigation();
        self.page.visit(url, settle).await
    }

    async fn operator_wait(&self, prompt: &str) -> ScraperResult<()> {
        self.stats.record_operator_wait();
        self.page.wait_for_operator(prompt).await
    }

    async fn authenticate(&mut self) -> ScraperResult<()> {
        self.enter(Phase::Authenticating);
        let entry = self.config.entry_url()?;
        info!("Opening {}", entry);

        let needs_operator = match self.load(&entry, self.config.settle.entry).await {
            Ok(snapshot) => self.needs_operator(&snapshot.url),
            Err(e) if !e.is_fatal() => {
                warn!("Could not read entry page: {}", e);
                true
            }
            Err(e) => return Err(e),
        };

        if needs_operator {
            self.operator_wait(LOGIN_PROMPT).await?;
        }
        Ok(())
    }

    fn needs_operator(&self, location: &Url) -> bool {
        if is_auth_location(location, &self.config.base_url) {
            info!("Landed on {}, login required", location);
            return true;
        }
        match self.config.run_mode.submitter() {
            Some(id) if !location.as_str().contains(id.as_str()) => {
                info!("Landed on {}, not the profile of {}", location, id);
                true
            }
            _ => false,
        }
    }

    async fn discover_leagues(&mut self) -> ScraperResult<Vec<LeagueRef>> {
        self.enter(Phase::DiscoverLeagues);
        info!("Finding all leagues...");

        let mut leagues = self.leagues_on_current_page().await?;
        if leagues.is_empty() {
            warn!("No leagues found, waiting for operator");
            self.operator_wait(LEAGUES_PROMPT).await?;
            leagues = self.leagues_on_current_page().await?;
        }

        self.stats.record_leagues(leagues.len());
        info!("Found {} leagues", leagues.len());
        Ok(leagues)
    }

    async fn leagues_on_current_page(&self) -> ScraperResult<Vec<LeagueRef>> {
        match self.page.read_dom().await {
            Ok(snapshot) => Ok(self.parse_leagues(&snapshot)),
            Err(e) if !e.is_fatal() => {
                warn!("Could not read current page: {}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn parse_leagues(&self, snapshot: &PageSnapshot) -> Vec<LeagueRef> {
        let document = Html::parse_document(&snapshot.html);
        self.locator
            .leagues
            .discover(&document, &snapshot.url, &self.config.base_url)
    }

    async fn process_league(&mut self, league: &LeagueRef) -> ScraperResult<()> {
        self.enter(Phase::DiscoverRounds);

        let rounds = match self.load(&league.url, self.config.settle.league).await {
            Ok(snapshot) => self.parse_rounds(&snapshot),
            Err(e) if !e.is_fatal() => {
                warn!("  Could not read league page {}: {}", league.url, e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        info!("  Found {} rounds", rounds.len());
        if rounds.is_empty() {
            self.stats.record_league_without_rounds();
            return Ok(());
        }

        let total = rounds.len();
        for (index, round) in rounds.iter().enumerate() {
            info!("    Checking round {}/{}...", index + 1, total);
            self.process_round(league, round).await?;
        }
        Ok(())
    }

    fn parse_rounds(&self, snapshot: &PageSnapshot) -> Vec<RoundRef> {
        let document = Html::parse_document(&snapshot.html);
        self.locator.rounds.discover(&document, &snapshot.url)
    }

    async fn process_round(&mut self, league: &LeagueRef, round: &RoundRef) -> ScraperResult<()> {
        self.enter(Phase::LoadRound);

        let records = match self.load(&round.url, self.config.settle.round).await {
            Ok(snapshot) => self.extract_round(league, &snapshot),
            Err(e) if !e.is_fatal() => {
                warn!("      Skipping round {}: {}", round.url, e);
                self.stats.record_extraction_error();
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        self.enter(Phase::ExtractAndPersist);
        for record in &records {
            self.sink.append(record).await?;
            self.stats.record_written();
            info!("      Found: {} by {}", record.song, record.artist);
        }

        if records.is_empty() {
            debug!("      No submissions on {}", round.url);
        }
        self.stats.record_round(records.len());
        Ok(())
    }

    fn extract_round(&self, league: &LeagueRef, snapshot: &PageSnapshot) -> Vec<SubmissionRecord> {
        let document = Html::parse_document(&snapshot.html);
        let round_name = self.locator.rounds.round_name(&document);
        let context = RoundContext {
            league: &league.name,
            round: &round_name,
        };
        let submissions = &self.locator.submissions;

        match &self.config.run_mode {
            RunMode::AllSubmitters => {
                let extracted = submissions.extract_all(&document, context);
                let found = extracted.len();
                let records = dedupe(extracted);
                if found > records.len() {
                    debug!("      Dropped {} duplicate cards", found - records.len());
                    self.stats.record_duplicates(found - records.len());
                }
                records
            }
            RunMode::Single(id) => submissions
                .extract_for(&document, id, context)
                .map(|mut record| {
                    if record.submitter.is_empty() {
                        record.submitter = id.to_string();
                    }
                    record
                })
                .into_iter()
                .collect(),
        }
    }
}
