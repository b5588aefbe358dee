use rust_decimal::Decimal;
use scraper::{Html, Selector};
use tracing::debug;

use crate::pricing::{PriceQuote, parse_price};
use crate::profiles::RetailerProfile;

/// Text content of every element matched by the first selector in the cascade
/// that matches anything. Later selectors are never consulted once one hits:
/// different page templates expose the same data under different markup, and
/// the first hit is the layout actually being served.
pub fn all_texts(document: &Html, selectors: &[String]) -> Vec<String> {
    for raw in selectors {
        let selector = match Selector::parse(raw) {
            Ok(selector) => selector,
            Err(e) => {
                debug!(selector = %raw, "skipping unparseable selector: {e:?}");
                continue;
            }
        };

        let texts: Vec<String> = document
            .select(&selector)
            .map(|element| {
                element
                    .text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim()
                    .to_string()
            })
            .collect();

        if !texts.is_empty() {
            return texts;
        }
    }

    Vec::new()
}

/// All valid (price, name) candidates on a result page for one item.
///
/// Multiple matches on one selector are multiple product tiles for a fuzzy
/// search query; every one of them is a candidate. Non-positive and
/// unparseable prices are dropped.
pub fn scan(document: &Html, profile: &RetailerProfile) -> Vec<(Decimal, Option<String>)> {
    let price_texts = all_texts(document, &profile.price_selectors);
    if price_texts.is_empty() {
        return Vec::new();
    }

    let name_texts = profile
        .name_selectors
        .as_ref()
        .map(|selectors| all_texts(document, selectors))
        .unwrap_or_default();

    price_texts
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let price = parse_price(raw)?;
            if price <= Decimal::ZERO {
                return None;
            }
            // Names pair with prices by index position: grid layouts emit both
            // in matching DOM order. This is an approximation, not a guarantee.
            let name = name_texts
                .get(index)
                .filter(|name| !name.is_empty())
                .cloned();
            Some((price, name))
        })
        .collect()
}

/// Cheapest-first policy: the minimum price among all candidates on the page.
pub fn cheapest(candidates: Vec<(Decimal, Option<String>)>) -> Option<PriceQuote> {
    candidates
        .into_iter()
        .min_by_key(|(price, _)| *price)
        .map(|(price, name)| PriceQuote::new(price, name))
}
