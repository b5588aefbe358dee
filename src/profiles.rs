use serde::{Deserialize, Serialize};
use url::Url;

/// How a retailer's cookie/consent overlay gets dismissed.
///
/// Consent UIs differ structurally between retailers: some expose a stable
/// button id, some only a button with known visible text, and some stack
/// several independent overlays that each need their own dismissal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsentStrategy {
    /// Wait briefly for a selector to appear, then click it.
    ButtonById { selector: String },
    /// Scan every button on the page for one whose text contains the phrase.
    ButtonLabelled { phrase: String },
    /// Click each selector in order, each one best-effort.
    DismissSequence { selectors: Vec<String> },
    /// No overlay handling at all.
    None,
}

/// Static description of how to search one retailer and read its results.
///
/// Selector cascades are ordered by observed reliability, most stable first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerProfile {
    /// Display identifier, also the key in the snapshot file.
    pub id: String,
    /// Search URL prefix; the encoded item text is appended.
    pub search_url: String,
    /// Price selector cascade, tried in order until one matches.
    pub price_selectors: Vec<String>,
    /// Optional product-name selector cascade, paired with prices by index.
    pub name_selectors: Option<Vec<String>>,
    pub consent: ConsentStrategy,
    /// Visit the retailer's home page first to establish a session.
    pub warmup: bool,
}

impl RetailerProfile {
    /// Full search URL for an item, with the item text percent-encoded.
    pub fn build_search_url(&self, item: &str) -> String {
        format!("{}{}", self.search_url, urlencoding::encode(item))
    }

    /// Scheme + host origin of the search URL, used for warmup navigation.
    pub fn home_url(&self) -> Option<String> {
        Url::parse(&self.search_url)
            .ok()
            .map(|url| url.origin().ascii_serialization())
    }
}

/// The configured retailer set, in processing order.
pub fn builtin_profiles() -> Vec<RetailerProfile> {
    vec![
        RetailerProfile {
            id: "Tesco".to_string(),
            search_url: "https://www.tesco.com/groceries/en-GB/search?query=".to_string(),
            price_selectors: vec![
                "._64Yvfa_priceText".to_string(),
                ".price-per-sellable-unit .value".to_string(),
                "[data-auto=\"price-value\"]".to_string(),
                ".beans-price__text".to_string(),
            ],
            name_selectors: Some(vec![
                "[data-auto=\"product-tile--title\"]".to_string(),
                ".product-details--wrapper h3".to_string(),
            ]),
            consent: ConsentStrategy::ButtonLabelled {
                phrase: "Accept all".to_string(),
            },
            warmup: false,
        },
        RetailerProfile {
            id: "Asda".to_string(),
            search_url: "https://groceries.asda.com/search/".to_string(),
            price_selectors: vec![
                "[data-locator=\"txt-product-price\"]".to_string(),
                ".co-product-list__main-cntr .co-item__price".to_string(),
                ".price".to_string(),
                "strong.co-product-list__price".to_string(),
            ],
            name_selectors: None,
            consent: ConsentStrategy::ButtonById {
                selector: "#onetrust-accept-btn-handler".to_string(),
            },
            warmup: true,
        },
        RetailerProfile {
            id: "Aldi".to_string(),
            search_url: "https://www.aldi.co.uk/results?q=".to_string(),
            price_selectors: vec![
                ".base-price__regular".to_string(),
                ".product-tile-price .h4".to_string(),
                ".product-price span".to_string(),
            ],
            name_selectors: None,
            consent: ConsentStrategy::DismissSequence {
                selectors: vec![
                    ".close-modal".to_string(),
                    "button[aria-label=\"Close\"]".to_string(),
                    "#onetrust-accept-btn-handler".to_string(),
                ],
            },
            warmup: false,
        },
        RetailerProfile {
            id: "Morrisons".to_string(),
            search_url: "https://groceries.morrisons.com/search?q=".to_string(),
            price_selectors: vec![
                "[data-test=\"fop-price\"]".to_string(),
                "span._display_xy0eg_1".to_string(),
                ".fops-price".to_string(),
                ".bop-price__current".to_string(),
            ],
            name_selectors: Some(vec![
                "[data-test=\"fop-title\"]".to_string(),
                ".fop-title".to_string(),
            ]),
            consent: ConsentStrategy::ButtonById {
                selector: "#onetrust-accept-btn-handler".to_string(),
            },
            warmup: false,
        },
    ]
}
