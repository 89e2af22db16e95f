use serde::Serialize;
use std::fmt;
use url::Url;

/// Identity of a submitter as it appears in profile URLs (`/user/{id}/`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmitterId(String);

impl SubmitterId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path fragment that any link to this submitter's profile contains.
    pub fn profile_fragment(&self) -> String {
        format!("/user/{}", self.0)
    }
}

impl fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueRef {
    pub id: String,
    pub name: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRef {
    pub url: Url,
    /// Link text; often just "Results", the round page has the real title.
    pub name: String,
}

/// One row of output. Field order matches [`SubmissionRecord::HEADER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    pub league: String,
    pub round: String,
    pub submitter: String,
    pub song: String,
    pub artist: String,
    pub album: String,
    pub rank: String,
    pub points: String,
    pub voters: String,
}

impl SubmissionRecord {
    pub const HEADER: [&'static str; 9] = [
        "League",
        "Round",
        "Submitter",
        "Song",
        "Artist",
        "Album",
        "Rank",
        "Points",
        "Voters",
    ];

    pub fn fields(&self) -> [&str; 9] {
        [
            &self.league,
            &self.round,
            &self.submitter,
            &self.song,
            &self.artist,
            &self.album,
            &self.rank,
            &self.points,
            &self.voters,
        ]
    }

    /// Layout artifacts render a card without any song metadata.
    pub fn is_blank(&self) -> bool {
        self.song.is_empty() && self.artist.is_empty() && self.album.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitter_id_rejects_blank() {
        assert!(SubmitterId::new("").is_none());
        assert!(SubmitterId::new("   ").is_none());
        let id = SubmitterId::new(" 21efc3 ").unwrap();
        assert_eq!(id.as_str(), "21efc3");
        assert_eq!(id.profile_fragment(), "/user/21efc3");
    }

    #[test]
    fn test_record_has_nine_fields() {
        let record = SubmissionRecord {
            song: "Song A".into(),
            ..Default::default()
        };
        assert_eq!(record.fields().len(), SubmissionRecord::HEADER.len());
        assert_eq!(record.fields()[3], "Song A");
        assert!(record.fields().iter().filter(|f| f.is_empty()).count() == 8);
    }

    #[test]
    fn test_blank_detection() {
        let mut record = SubmissionRecord {
            submitter: "Someone".into(),
            rank: "1".into(),
            ..Default::default()
        };
        assert!(record.is_blank());
        record.album = "Album".into();
        assert!(!record.is_blank());
    }
}
