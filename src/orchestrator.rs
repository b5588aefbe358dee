use scraper::Html;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::browser::BrowserSession;
use crate::config::AppConfig;
use crate::consent::ConsentNegotiator;
use crate::extract;
use crate::humanize;
use crate::pricing::PriceQuote;
use crate::profiles::RetailerProfile;
use crate::store::Inventory;
use crate::utils::error::Result;

/// Outcome of one retailer's sweep over the target items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerReport {
    pub retailer: String,
    /// Every item this sweep attempted, found or not. The snapshot merge
    /// overwrites exactly this set and nothing else.
    pub attempted: Vec<String>,
    pub inventory: Inventory,
    pub items_found: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub reports: Vec<RetailerReport>,
}

/// Sequences retailer profiles × wishlist items through the shared browser
/// session. Strictly serial: one tab, retailers in configured order, items in
/// wishlist order. No retailer's failures reach another retailer's inventory.
pub struct RunOrchestrator<'a> {
    session: &'a BrowserSession,
    config: &'a AppConfig,
}

impl<'a> RunOrchestrator<'a> {
    pub fn new(session: &'a BrowserSession, config: &'a AppConfig) -> Self {
        Self { session, config }
    }

    pub async fn run(&self, profiles: &[RetailerProfile], items: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();

        for profile in profiles {
            let report = self.sweep_retailer(profile, items).await;
            info!(
                retailer = %report.retailer,
                found = report.items_found,
                attempted = report.attempted.len(),
                elapsed_ms = report.elapsed_ms,
                "retailer sweep finished"
            );
            summary.reports.push(report);
        }

        summary
    }

    async fn sweep_retailer(&self, profile: &RetailerProfile, items: &[String]) -> RetailerReport {
        let start = Instant::now();
        let mut negotiator = ConsentNegotiator::new();
        let mut inventory = Inventory::new();
        let mut attempted = Vec::with_capacity(items.len());

        if profile.warmup {
            self.warm_up(profile).await;
        }

        for item in items {
            attempted.push(item.clone());

            match self.check_item(profile, &mut negotiator, item).await {
                Ok(Some(quote)) => {
                    info!(
                        retailer = %profile.id,
                        item = %item,
                        price = %quote.price(),
                        "recorded cheapest price on page"
                    );
                    inventory.insert(item.clone(), quote);
                }
                Ok(None) => {
                    info!(retailer = %profile.id, item = %item, "not found on result page");
                    self.capture_miss(profile, item);
                }
                Err(e) => {
                    // One bad item never takes the rest of the sweep with it.
                    warn!(retailer = %profile.id, item = %item, "item check failed: {e}");
                }
            }
        }

        let items_found = inventory.len();
        RetailerReport {
            retailer: profile.id.clone(),
            attempted,
            inventory,
            items_found,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Visit the retailer's home page before searching, to pick up session
    /// cookies the search pages expect. Best-effort.
    async fn warm_up(&self, profile: &RetailerProfile) {
        let Some(home) = profile.home_url() else {
            return;
        };

        debug!(retailer = %profile.id, url = %home, "warming up session");
        if let Err(e) = self.session.navigate(&home) {
            debug!(retailer = %profile.id, "warmup navigation failed: {e}");
            return;
        }

        let browser = &self.config.browser;
        humanize::wiggle(self.session, browser.window_width, browser.window_height).await;
        tokio::time::sleep(Duration::from_millis(self.config.run.warmup_settle_ms)).await;
    }

    async fn check_item(
        &self,
        profile: &RetailerProfile,
        negotiator: &mut ConsentNegotiator,
        item: &str,
    ) -> Result<Option<PriceQuote>> {
        let url = profile.build_search_url(item);
        self.session.navigate(&url)?;

        let browser = &self.config.browser;
        humanize::wiggle(self.session, browser.window_width, browser.window_height).await;
        tokio::time::sleep(Duration::from_millis(self.config.run.page_settle_ms)).await;

        negotiator
            .negotiate(
                self.session,
                &profile.consent,
                Duration::from_millis(self.config.run.consent_wait_ms),
                Duration::from_millis(self.config.run.consent_settle_ms),
            )
            .await;

        let html = self.session.page_html()?;
        let document = Html::parse_document(&html);
        Ok(extract::cheapest(extract::scan(&document, profile)))
    }

    /// Diagnostic screenshot for a not-found item, named from retailer and
    /// item with whitespace stripped. Best-effort.
    fn capture_miss(&self, profile: &RetailerProfile, item: &str) {
        if !self.config.storage.screenshots_enabled {
            return;
        }

        let stripped: String = item.chars().filter(|c| !c.is_whitespace()).collect();
        let filename = format!("debug-{}-{}.png", profile.id, stripped);
        let path = Path::new(&self.config.storage.screenshot_dir).join(filename);

        match self.session.screenshot(&path) {
            Ok(()) => debug!(path = %path.display(), "saved miss screenshot"),
            Err(e) => debug!(retailer = %profile.id, item = %item, "screenshot failed: {e}"),
        }
    }
}
