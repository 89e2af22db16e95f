//! Collapses repeated renderings of one submission on a round page. The page
//! draws a sticky preview card and a list card for the same entry.

use std::collections::HashSet;

use crate::core::SubmissionRecord;

/// Everything but league and round, which are constant within a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SubmissionKey {
    submitter: String,
    song: String,
    artist: String,
    album: String,
    rank: String,
    points: String,
    voters: String,
}

impl From<&SubmissionRecord> for SubmissionKey {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            submitter: record.submitter.clone(),
            song: record.song.clone(),
            artist: record.artist.clone(),
            album: record.album.clone(),
            rank: record.rank.clone(),
            points: record.points.clone(),
            voters: record.voters.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<SubmissionKey>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time a key is offered.
    pub fn admit(&mut self, record: &SubmissionRecord) -> bool {
        self.seen.insert(SubmissionKey::from(record))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// First occurrence of each key, in original order.
pub fn dedupe(records: Vec<SubmissionRecord>) -> Vec<SubmissionRecord> {
    let mut dedup = Deduplicator::new();
    records
        .into_iter()
        .filter(|record| dedup.admit(record))
        .collect()
}
