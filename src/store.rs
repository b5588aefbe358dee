use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::pricing::PriceQuote;
use crate::utils::error::Result;

/// Seed list used whenever no usable wishlist file exists.
pub const DEFAULT_WISHLIST: [&str; 2] = ["Milk", "Bread"];

/// Prices recorded for one retailer, keyed by wishlist item. A missing key
/// means the item was not found on the retailer's result page this run.
pub type Inventory = BTreeMap<String, PriceQuote>;

/// The persistent list of tracked item names driving every scrape run.
///
/// Items are case-insensitively unique and only ever appended; the list is
/// never reordered or pruned automatically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<String>,
}

impl Wishlist {
    /// Read the persisted wishlist, falling back to the built-in default when
    /// the file is missing or corrupt. Never fails at startup.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        "wishlist file is corrupt ({e}), using built-in default"
                    );
                    Self::default_list()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no wishlist file, using built-in default");
                Self::default_list()
            }
        }
    }

    pub fn default_list() -> Self {
        Self {
            items: DEFAULT_WISHLIST.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(item))
    }

    /// Append a new item unless an equal one (ignoring case) already exists.
    /// Returns whether the wishlist changed; the caller persists immediately
    /// on `true` so the item survives even if the scrape run crashes.
    pub fn append_if_new(&mut self, item: &str) -> bool {
        let formatted = item.trim();
        if formatted.is_empty() || self.contains(formatted) {
            return false;
        }
        self.items.push(formatted.to_string());
        true
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Full persisted record of last-known prices across retailers and items.
///
/// Loaded at run start (or defaulted), mutated per retailer sweep, rewritten
/// in full at run end. Entries for items a run did not attempt are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub last_updated: String,
    pub prices: BTreeMap<String, Inventory>,
}

impl Snapshot {
    /// Read the persisted snapshot, starting empty when the file is missing
    /// or corrupt. Prior data loss is logged, never fatal.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        "snapshot file is corrupt ({e}), starting from empty"
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Merge one retailer's sweep results.
    ///
    /// Every *attempted* item is overwritten: found items get their new quote,
    /// missing items lose any stale entry. Items outside the attempted set are
    /// left exactly as the previous run recorded them.
    pub fn apply(&mut self, retailer: &str, attempted: &[String], found: &Inventory) {
        let inventory = self.prices.entry(retailer.to_string()).or_default();
        for item in attempted {
            match found.get(item) {
                Some(quote) => {
                    inventory.insert(item.clone(), quote.clone());
                }
                None => {
                    inventory.remove(item);
                }
            }
        }
    }

    /// Stamp and rewrite the whole snapshot file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.last_updated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
