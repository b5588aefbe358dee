use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use basket_watcher::browser::BrowserSession;
use basket_watcher::config::AppConfig;
use basket_watcher::orchestrator::RunOrchestrator;
use basket_watcher::profiles::builtin_profiles;
use basket_watcher::store::{Snapshot, Wishlist};

#[derive(Parser, Debug)]
#[command(
    name = "basket-watcher",
    about = "Finds the cheapest price for each wishlist item across grocery retailers",
    version
)]
struct Cli {
    /// Append this item to the wishlist before scraping (or set NEW_ITEM).
    #[arg(long)]
    new_item: Option<String>,

    /// Scrape only this item and merge it into the existing snapshot
    /// (or set TARGET_ITEM).
    #[arg(long)]
    target_item: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("basket_watcher=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let new_item = cli
        .new_item
        .or_else(|| std::env::var("NEW_ITEM").ok())
        .filter(|item| !item.trim().is_empty());
    let target_item = cli
        .target_item
        .or_else(|| std::env::var("TARGET_ITEM").ok())
        .filter(|item| !item.trim().is_empty());

    let config = AppConfig::from_env()?;
    let wishlist_path = PathBuf::from(&config.storage.wishlist_path);
    let snapshot_path = PathBuf::from(&config.storage.snapshot_path);

    let mut wishlist = Wishlist::load_or_default(&wishlist_path);

    // Persist new items before scraping starts, so they survive a crashed run.
    if let Some(item) = new_item.as_deref() {
        if wishlist.append_if_new(item) {
            wishlist.save(&wishlist_path)?;
            info!(item = %item.trim(), "added new item to wishlist");
        }
    }

    let targets: Vec<String> = match target_item {
        Some(target) => vec![target.trim().to_string()],
        None => wishlist.items().to_vec(),
    };

    let mut snapshot = Snapshot::load_or_default(&snapshot_path);
    let profiles = builtin_profiles();

    info!(
        items = targets.len(),
        retailers = profiles.len(),
        "scraping for cheapest prices"
    );

    // The one fatal failure in the system: no browser, no run.
    let session = BrowserSession::launch(&config.browser)?;

    let orchestrator = RunOrchestrator::new(&session, &config);
    let summary = orchestrator.run(&profiles, &targets).await;

    session.close();

    for report in &summary.reports {
        snapshot.apply(&report.retailer, &report.attempted, &report.inventory);
    }
    snapshot.save(&snapshot_path)?;

    info!(path = %snapshot_path.display(), "scrape complete, snapshot written");
    Ok(())
}
