use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub run_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub navigations: usize,
    pub leagues_discovered: usize,
    pub leagues_without_rounds: usize,
    pub rounds_visited: usize,
    pub rounds_without_records: usize,
    pub extraction_errors: usize,
    pub duplicates_dropped: usize,
    pub operator_waits: usize,
    pub records_written: usize,
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<RunStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(RunStats {
                run_id: Uuid::now_v7(),
                start_time: Utc::now(),
                end_time: None,
                navigations: 0,
                leagues_discovered: 0,
                leagues_without_rounds: 0,
                rounds_visited: 0,
                rounds_without_records: 0,
                extraction_errors: 0,
                duplicates_dropped: 0,
                operator_waits: 0,
                records_written: 0,
            })),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.stats.read().run_id
    }

    pub fn record_navigation(&self) {
        self.stats.write().navigations += 1;
    }

    pub fn record_leagues(&self, count: usize) {
        self.stats.write().leagues_discovered = count;
    }

    pub fn record_league_without_rounds(&self) {
        self.stats.write().leagues_without_rounds += 1;
    }

    pub fn record_round(&self, records: usize) {
        let mut stats = self.stats.write();
        stats.rounds_visited += 1;
        if records == 0 {
            stats.rounds_without_records += 1;
        }
    }

    pub fn record_extraction_error(&self) {
        self.stats.write().extraction_errors += 1;
    }

    pub fn record_duplicates(&self, dropped: usize) {
        self.stats.write().duplicates_dropped += dropped;
    }

    pub fn record_operator_wait(&self) {
        self.stats.write().operator_waits += 1;
    }

    pub fn record_written(&self) {
        self.stats.write().records_written += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> RunStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        println!("\nScraping Statistics:");
        println!("===================");
        println!("Run: {}", stats.run_id);
        println!("Duration: {} seconds", duration.num_seconds());
        println!("Page Loads: {}", stats.navigations);
        println!(
            "Leagues: {} ({} without rounds)",
            stats.leagues_discovered, stats.leagues_without_rounds
        );
        println!(
            "Rounds Visited: {} ({} without submissions)",
            stats.rounds_visited, stats.rounds_without_records
        );
        println!("Duplicates Dropped: {}", stats.duplicates_dropped);
        if stats.extraction_errors > 0 {
            println!("Rounds Skipped After Errors: {}", stats.extraction_errors);
        }
        if stats.operator_waits > 0 {
            println!("Operator Waits: {}", stats.operator_waits);
        }
        println!("Records Written: {}", stats.records_written);
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
