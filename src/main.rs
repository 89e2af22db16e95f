use leaguescraper::core::{RunOutcome, ScrapeConfig};
use leaguescraper::page::ChromePage;
use leaguescraper::storage::{create_storage, StorageType};
use leaguescraper::{PageAccessor, ScraperResult, Traversal};
use log::{error, info, warn};

#[tokio::main]
async fn main() -> ScraperResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .filter_module("headless_chrome", log::LevelFilter::Warn)
        .filter_module("tungstenite", log::LevelFilter::Warn)
        .init();

    info!("Starting Music League scraper...");
    let config = ScrapeConfig::from_env()?;

    let sink = create_storage(StorageType::Csv {
        path: config.output_path.clone(),
    })?;
    let page = ChromePage::launch(&config.browser)?;
    let hold_on_finish = config.hold_on_finish;

    let mut traversal = Traversal::new(config, Box::new(page), sink)?;
    let finished = tokio::select! {
        report = traversal.run() => Some(report),
        _ = tokio::signal::ctrl_c() => None,
    };
    let report = match finished {
        Some(report) => report,
        None => {
            // Every appended row is already synced; nothing to roll back.
            warn!("Interrupted, stopping traversal");
            traversal.report(RunOutcome::Aborted {
                phase: traversal.phase(),
                reason: "interrupted".to_string(),
            })
        }
    };
    traversal.stats().print_summary();

    match &report.outcome {
        RunOutcome::Done => {
            println!("\nTotal submissions found: {}", report.records_written);
            println!("Submissions saved to: {}", report.output);
        }
        RunOutcome::Aborted { phase, reason } => {
            error!("Error during scraping ({}): {}", phase, reason);
            println!(
                "\nPartial results ({} submissions) saved to: {}",
                report.records_written, report.output
            );
        }
    }

    if hold_on_finish && report.is_complete() {
        traversal
            .page()
            .wait_for_operator("Done. The browser stays open until you continue.")
            .await?;
    }

    if let Err(e) = traversal.page().close().await {
        warn!("Closing the browser failed: {}", e);
    }
    drop(traversal);

    // stdin may still have a pending read from an operator prompt.
    std::process::exit(0);
}
