use std::time::Duration;
use tracing::debug;

use crate::browser::BrowserSession;
use crate::profiles::ConsentStrategy;

/// One-shot dismissal of a retailer's cookie/consent overlays.
///
/// Scoped to a single browsing session with one retailer: the first page load
/// gets exactly one attempt at the configured strategy, and later items in
/// the same session never repeat it. Consent handling is opportunistic; a
/// failed attempt still counts, and nothing here can block extraction.
#[derive(Debug, Default)]
pub struct ConsentNegotiator {
    negotiated: bool,
}

impl ConsentNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn negotiated(&self) -> bool {
        self.negotiated
    }

    pub async fn negotiate(
        &mut self,
        session: &BrowserSession,
        strategy: &ConsentStrategy,
        wait: Duration,
        settle: Duration,
    ) {
        if self.negotiated {
            return;
        }
        self.negotiated = true;

        let attempted = match strategy {
            ConsentStrategy::None => false,
            ConsentStrategy::ButtonById { selector } => {
                match session.click_with_wait(selector, wait) {
                    Ok(()) => debug!(selector = %selector, "dismissed consent overlay"),
                    Err(e) => debug!(selector = %selector, "consent button not clicked: {e}"),
                }
                true
            }
            ConsentStrategy::ButtonLabelled { phrase } => {
                match session.click_button_labelled(phrase) {
                    Ok(true) => debug!(phrase = %phrase, "accepted consent via labelled button"),
                    Ok(false) => debug!(phrase = %phrase, "no button carried the consent label"),
                    Err(e) => debug!(phrase = %phrase, "labelled consent scan failed: {e}"),
                }
                true
            }
            ConsentStrategy::DismissSequence { selectors } => {
                for selector in selectors {
                    if session.try_click(selector) {
                        debug!(selector = %selector, "dismissed overlay control");
                    }
                }
                true
            }
        };

        if attempted {
            tokio::time::sleep(settle).await;
        }
    }
}
