use std::fmt;

use crate::stats::RunStats;

/// Where the traversal is. Aborts are reported with the phase they hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Authenticating,
    DiscoverLeagues,
    DiscoverRounds,
    LoadRound,
    ExtractAndPersist,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "start",
            Phase::Authenticating => "authentication",
            Phase::DiscoverLeagues => "league discovery",
            Phase::DiscoverRounds => "round discovery",
            Phase::LoadRound => "round loading",
            Phase::ExtractAndPersist => "extraction",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Done,
    Aborted { phase: Phase, reason: String },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub records_written: usize,
    /// Where the rows went, e.g. the CSV path.
    pub output: String,
    pub stats: RunStats,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Done
    }
}
