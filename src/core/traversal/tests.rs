use url::Url;

use super::{is_auth_location, Phase, RunOutcome, Traversal};
use crate::core::{RunMode, ScrapeConfig, SettleDelays, SubmissionRecord};
use crate::page::MockPage;
use crate::storage::MemorySink;

const BASE: &str = "https://ml.test/";

fn config(identity: Option<&str>) -> ScrapeConfig {
    ScrapeConfig::new(RunMode::from_identity(identity))
        .unwrap()
        .with_base_url(BASE)
        .unwrap()
        .with_settle(SettleDelays::none())
        .with_hold_on_finish(false)
}

fn url(path: &str) -> String {
    format!("https://ml.test{}", path)
}

fn leagues_page(leagues: &[(&str, &str)]) -> String {
    leagues
        .iter()
        .map(|(id, name)| format!(r#"<a href="/l/{id}/">{name}</a>"#))
        .collect::<Vec<_>>()
        .join("\n")
}

fn league_page(league: &str, rounds: &[&str]) -> String {
    let mut html = format!(r#"<a href="/l/{league}/">Overview</a><a href="/user/me/">Me</a>"#);
    for round in rounds {
        html.push_str(&format!(r#"<a href="/l/{league}/{round}/">Results</a>"#));
    }
    html
}

struct Card<'a> {
    sticky: bool,
    user: &'a str,
    name: &'a str,
    song: &'a str,
    artist: &'a str,
}

impl Card<'_> {
    fn render(&self) -> String {
        format!(
            r##"<div class="card-body{sticky}">
                 <a href="/user/{user}/"><img alt="avatar"></a>
                 <h6 class="text-truncate text-body fw-semibold">{name}</h6>
                 <h6 class="card-title"><a href="#">{song}</a></h6>
                 <p class="card-text">{artist}</p>
                 <span class="font-monospace m-0">3</span>
                 <div class="col-auto text-end"><h3>+2 pts</h3></div>
                 <span class="text-body-tertiary fw-semibold">5 voters</span>
               </div>"##,
            sticky = if self.sticky { " sticky-top" } else { "" },
            user = self.user,
            name = self.name,
            song = self.song,
            artist = self.artist,
        )
    }
}

fn round_page(title: Option<&str>, cards: &[Card<'_>]) -> String {
    let mut html = String::new();
    if let Some(title) = title {
        html.push_str(&format!(r#"<h5 class="card-title">{title}</h5>"#));
    }
    for card in cards {
        html.push_str(&card.render());
    }
    html
}

fn u1_card() -> Card<'static> {
    Card {
        sticky: true,
        user: "U1",
        name: "",
        song: "Song A",
        artist: "Artist A",
    }
}

async fn run(config: ScrapeConfig, page: &MockPage, sink: &MemorySink) -> super::RunReport {
    let mut traversal =
        Traversal::new(config, Box::new(page.clone()), Box::new(sink.clone())).unwrap();
    traversal.run().await
}

#[tokio::test]
async fn test_single_user_found() {
    let page = MockPage::new()
        .with_page(&url("/user/U1/"), &leagues_page(&[("aaa", "Friday Tunes")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01"]))
        .with_page(&url("/l/aaa/a01/"), &round_page(Some("Rain"), &[u1_card()]));
    let sink = MemorySink::new();

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(report.is_complete());
    assert_eq!(report.records_written, 1);
    assert_eq!(report.output, "memory");
    assert_eq!(
        sink.records(),
        vec![SubmissionRecord {
            league: "Friday Tunes".into(),
            round: "Rain".into(),
            submitter: "U1".into(),
            song: "Song A".into(),
            artist: "Artist A".into(),
            album: "".into(),
            rank: "3".into(),
            points: "2".into(),
            voters: "5 voters".into(),
        }]
    );
    assert_eq!(page.signal_count(), 0);
}

#[tokio::test]
async fn test_single_user_absent_round_is_skipped() {
    let someone_else = Card {
        user: "U7",
        name: "Seven",
        ..u1_card()
    };
    let page = MockPage::new()
        .with_page(&url("/user/U1/"), &leagues_page(&[("aaa", "Friday Tunes")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01", "a02"]))
        .with_page(&url("/l/aaa/a01/"), &round_page(Some("One"), &[someone_else]))
        .with_page(&url("/l/aaa/a02/"), &round_page(Some("Two"), &[u1_card()]));
    let sink = MemorySink::new();

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(report.is_complete());
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].round, "Two");
    assert_eq!(report.stats.rounds_visited, 2);
    assert_eq!(report.stats.rounds_without_records, 1);
    assert_eq!(report.stats.extraction_errors, 0);
}

#[tokio::test]
async fn test_all_submitters_collapses_sticky_duplicate() {
    let u2 = |sticky| Card {
        sticky,
        user: "U2",
        name: "Two",
        song: "Song B",
        artist: "Artist B",
    };
    let u3 = Card {
        sticky: false,
        user: "U3",
        name: "Three",
        song: "Song C",
        artist: "Artist C",
    };
    let page = MockPage::new()
        .with_page(BASE, &leagues_page(&[("aaa", "Friday Tunes")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01"]))
        .with_page(
            &url("/l/aaa/a01/"),
            &round_page(Some("Rain"), &[u2(true), u2(false), u3]),
        );
    let sink = MemorySink::new();

    let report = run(config(None), &page, &sink).await;

    assert!(report.is_complete());
    let submitters: Vec<_> = sink.records().into_iter().map(|r| r.submitter).collect();
    assert_eq!(submitters, vec!["Two", "Three"]);
    assert_eq!(report.stats.duplicates_dropped, 1);
}

#[tokio::test]
async fn test_empty_discovery_recovers_after_operator() {
    let page = MockPage::new()
        .with_page(BASE, "<p>Welcome</p>")
        .with_operator_navigation(
            &url("/leagues/"),
            &leagues_page(&[("aaa", "First"), ("bbb", "Second")]),
        )
        .with_page(&url("/l/aaa/"), &league_page("aaa", &[]))
        .with_page(&url("/l/bbb/"), &league_page("bbb", &[]));
    let sink = MemorySink::new();

    let report = run(config(None), &page, &sink).await;

    assert!(report.is_complete());
    assert_eq!(page.signal_count(), 1);
    assert_eq!(report.stats.leagues_discovered, 2);
    assert_eq!(report.stats.leagues_without_rounds, 2);
    assert_eq!(
        page.visits(),
        vec![BASE.to_string(), url("/l/aaa/"), url("/l/bbb/")]
    );
}

#[tokio::test]
async fn test_empty_discovery_retried_only_once() {
    let page = MockPage::new().with_page(BASE, "<p>Welcome</p>");
    let sink = MemorySink::new();

    let report = run(config(None), &page, &sink).await;

    assert!(report.is_complete());
    assert_eq!(page.signal_count(), 1);
    assert_eq!(report.stats.leagues_discovered, 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_login_redirect_waits_for_operator() {
    let page = MockPage::new()
        .with_redirect(&url("/user/U1/"), "https://accounts.example/authorize")
        .with_operator_navigation(&url("/user/U1/"), &leagues_page(&[("aaa", "Only")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01"]))
        .with_page(&url("/l/aaa/a01/"), &round_page(Some("Rain"), &[u1_card()]));
    let sink = MemorySink::new();

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(report.is_complete());
    assert_eq!(page.signal_count(), 1);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_wrong_profile_waits_for_operator() {
    let page = MockPage::new()
        .with_redirect(&url("/user/U1/"), &url("/user/someone-else/"))
        .with_page(&url("/user/someone-else/"), &leagues_page(&[("aaa", "Only")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &[]));
    let sink = MemorySink::new();

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(report.is_complete());
    assert_eq!(page.signal_count(), 1);
}

#[tokio::test]
async fn test_navigation_failure_aborts_with_partial_results() {
    let page = MockPage::new()
        .with_page(&url("/user/U1/"), &leagues_page(&[("aaa", "A"), ("bbb", "B")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01", "a02", "a03"]))
        .with_page(&url("/l/aaa/a01/"), &round_page(Some("One"), &[u1_card()]))
        .with_failure(&url("/l/aaa/a02/"));
    let sink = MemorySink::new();

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(matches!(
        report.outcome,
        RunOutcome::Aborted {
            phase: Phase::LoadRound,
            ..
        }
    ));
    assert_eq!(report.records_written, 1);
    assert_eq!(sink.len(), 1);
    // No retry, and nothing after the failure is visited.
    assert!(!page.visits().contains(&url("/l/aaa/a03/")));
    assert!(!page.visits().contains(&url("/l/bbb/")));
}

#[tokio::test]
async fn test_unreadable_round_counts_as_empty() {
    let page = MockPage::new()
        .with_page(&url("/user/U1/"), &leagues_page(&[("aaa", "A")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01", "a02"]))
        .with_unreadable(&url("/l/aaa/a01/"))
        .with_page(&url("/l/aaa/a02/"), &round_page(Some("Two"), &[u1_card()]));
    let sink = MemorySink::new();

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(report.is_complete());
    assert_eq!(report.stats.extraction_errors, 1);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_traversal_order_and_unknown_round_name() {
    let page = MockPage::new()
        .with_page(&url("/user/U1/"), &leagues_page(&[("bbb", "B"), ("aaa", "A")]))
        .with_page(&url("/l/bbb/"), &league_page("bbb", &["b02", "b01"]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01"]))
        .with_page(&url("/l/bbb/b02/"), &round_page(None, &[u1_card()]))
        .with_page(&url("/l/bbb/b01/"), &round_page(Some("B1"), &[u1_card()]))
        .with_page(&url("/l/aaa/a01/"), &round_page(Some("A1"), &[u1_card()]));
    let sink = MemorySink::new();

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(report.is_complete());
    assert_eq!(
        page.visits(),
        vec![
            url("/user/U1/"),
            url("/l/bbb/"),
            url("/l/bbb/b02/"),
            url("/l/bbb/b01/"),
            url("/l/aaa/"),
            url("/l/aaa/a01/"),
        ]
    );
    let rounds: Vec<_> = sink.records().into_iter().map(|r| r.round).collect();
    assert_eq!(rounds, vec!["Unknown Round", "B1", "A1"]);
}

#[tokio::test]
async fn test_sink_failure_aborts() {
    let page = MockPage::new()
        .with_page(&url("/user/U1/"), &leagues_page(&[("aaa", "A")]))
        .with_page(&url("/l/aaa/"), &league_page("aaa", &["a01", "a02"]))
        .with_page(&url("/l/aaa/a01/"), &round_page(Some("One"), &[u1_card()]))
        .with_page(&url("/l/aaa/a02/"), &round_page(Some("Two"), &[u1_card()]));
    let sink = MemorySink::failing_after(1);

    let report = run(config(Some("U1")), &page, &sink).await;

    assert!(matches!(
        report.outcome,
        RunOutcome::Aborted {
            phase: Phase::ExtractAndPersist,
            ..
        }
    ));
    assert_eq!(report.records_written, 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_is_auth_location() {
    let base = Url::parse(BASE).unwrap();
    let at = |s: &str| Url::parse(s).unwrap();

    assert!(is_auth_location(&at("https://accounts.example/authorize"), &base));
    assert!(is_auth_location(&at("https://ml.test/login"), &base));
    assert!(is_auth_location(&at("https://ml.test/oauth/callback"), &base));
    assert!(!is_auth_location(&at("https://ml.test/user/U1/"), &base));
    assert!(!is_auth_location(&at("https://ml.test/"), &base));
}
