use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// First decimal number in a string, e.g. "2.50" out of "2.50each".
fn leading_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?|\.\d+)").unwrap())
}

/// Turn raw price text from a product tile into a decimal amount in pounds.
///
/// Everything except digits, a decimal point and the pence marker `p` is
/// stripped first, so currency symbols, surrounding words and whitespace are
/// all tolerated. A surviving `p` means the number is pence ("80p" -> 0.80);
/// otherwise the number is read as pounds ("£1.50" -> 1.50, "now £2" -> 2.00).
/// Empty or numberless input yields `None`, never an error.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == 'p')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let pence = cleaned.contains('p');
    let digits: String = cleaned.chars().filter(|c| *c != 'p').collect();

    let captures = leading_number_regex().captures(&digits)?;
    let amount = Decimal::from_str(captures.get(1)?.as_str()).ok()?;

    if pence {
        Some(amount / Decimal::from(100))
    } else {
        Some(amount)
    }
}

/// The cheapest price found for one item at one retailer, with the product's
/// display name when the retailer profile knows how to read one.
///
/// Serializes as a bare number when unnamed, or `{"price": .., "name": ..}`
/// when named, which is exactly the shape the snapshot file records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceQuote {
    Named { price: Decimal, name: String },
    Bare(Decimal),
}

impl PriceQuote {
    pub fn new(price: Decimal, name: Option<String>) -> Self {
        match name {
            Some(name) => PriceQuote::Named { price, name },
            None => PriceQuote::Bare(price),
        }
    }

    pub fn price(&self) -> Decimal {
        match self {
            PriceQuote::Named { price, .. } => *price,
            PriceQuote::Bare(price) => *price,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PriceQuote::Named { name, .. } => Some(name),
            PriceQuote::Bare(_) => None,
        }
    }
}
