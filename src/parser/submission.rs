use log::{debug, trace};
use scraper::{ElementRef, Html, Selector};

use super::fields::{selector, FieldResolver};
use super::points::normalize_points;
use crate::core::{SubmissionRecord, SubmitterId};
use crate::ScraperResult;

/// League and round labels stamped on every record from one round page.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    pub league: &'a str,
    pub round: &'a str,
}

pub struct SubmissionLocator {
    sticky_cards: Selector,
    cards: Selector,
    song_title: Selector,
    links: Selector,
    submitter: FieldResolver,
    song: FieldResolver,
    artist: FieldResolver,
    album: FieldResolver,
    rank: FieldResolver,
    points: FieldResolver,
    voters: FieldResolver,
}

impl SubmissionLocator {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            sticky_cards: selector(".card-body.sticky-top")?,
            cards: selector(".card-body")?,
            song_title: selector("h6.card-title")?,
            links: selector("a[href]")?,
            submitter: FieldResolver::first("h6.text-truncate.text-body.fw-semibold")?
                .or_first(r#"a[href*="/user/"] h6"#)?
                .or_first(r#"a[href*="/user/"]"#)?,
            song: FieldResolver::first("h6.card-title a")?.or_first("h6.card-title")?,
            artist: FieldResolver::nth(".card-text", 0)?,
            album: FieldResolver::nth(".card-text", 1)?,
            rank: FieldResolver::first(".font-monospace.m-0, .font-monospace.text-body-secondary")?,
            points: FieldResolver::first(".col-auto.text-end h3")?,
            voters: FieldResolver::first(".text-body-tertiary.fw-semibold")?,
        })
    }

    /// The highlighted card belonging to `submitter`, if the page has one.
    /// Later matching cards on the same page are ignored.
    pub fn extract_for(
        &self,
        document: &Html,
        submitter: &SubmitterId,
        context: RoundContext<'_>,
    ) -> Option<SubmissionRecord> {
        let fragment = submitter.profile_fragment();

        let card = document
            .select(&self.sticky_cards)
            .find(|card| self.links_to(*card, &fragment))?;

        trace!("Matched sticky card for {}", submitter);
        Some(self.read_card(card, context))
    }

    /// Every submission card on the page in DOM order, duplicates included.
    /// A card counts only if it has a song title element and at least one of
    /// song, artist or album is non-empty.
    pub fn extract_all(&self, document: &Html, context: RoundContext<'_>) -> Vec<SubmissionRecord> {
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for card in document.select(&self.cards) {
            if card.select(&self.song_title).next().is_none() {
                continue;
            }

            let record = self.read_card(card, context);
            if record.is_blank() {
                skipped += 1;
                continue;
            }
            records.push(record);
        }

        if skipped > 0 {
            debug!("Skipped {} empty submission cards", skipped);
        }
        records
    }

    fn links_to(&self, card: ElementRef<'_>, fragment: &str) -> bool {
        card.select(&self.links).any(|link| {
            link.value()
                .attr("href")
                .is_some_and(|href| profile_matches(href, fragment))
        })
    }

    fn read_card(&self, card: ElementRef<'_>, context: RoundContext<'_>) -> SubmissionRecord {
        SubmissionRecord {
            league: context.league.to_string(),
            round: context.round.to_string(),
            submitter: self.submitter.resolve(card),
            song: self.song.resolve(card),
            artist: self.artist.resolve(card),
            album: self.album.resolve(card),
            rank: self.rank.resolve(card),
            points: normalize_points(&self.points.resolve(card)),
            voters: self.voters.resolve(card),
        }
    }
}

/// `/user/abc` must not match `/user/abcdef/`.
fn profile_matches(href: &str, fragment: &str) -> bool {
    href.match_indices(fragment).any(|(at, _)| {
        matches!(
            href[at + fragment.len()..].chars().next(),
            None | Some('/') | Some('?') | Some('#')
        )
    })
}
