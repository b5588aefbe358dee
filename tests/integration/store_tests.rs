use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use tempfile::tempdir;

use basket_watcher::pricing::PriceQuote;
use basket_watcher::store::{Inventory, Snapshot, Wishlist};

fn quote(price: &str) -> PriceQuote {
    PriceQuote::new(Decimal::from_str(price).unwrap(), None)
}

#[test]
fn test_wishlist_lifecycle_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wishlist.json");

    // First run: nothing on disk yet, the built-in default applies.
    let mut wishlist = Wishlist::load_or_default(&path);
    assert_eq!(wishlist.items(), ["Milk", "Bread"]);

    // An externally supplied item gets remembered before any scraping.
    assert!(wishlist.append_if_new("Oat Milk"));
    wishlist.save(&path).unwrap();

    // Second run sees the appended item; re-adding it (any case) is a no-op.
    let mut reloaded = Wishlist::load_or_default(&path);
    assert_eq!(reloaded.items(), ["Milk", "Bread", "Oat Milk"]);
    assert!(!reloaded.append_if_new("OAT MILK"));
    assert_eq!(reloaded.items().len(), 3);
}

#[test]
fn test_snapshot_merge_across_runs_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prices.json");
    let full_set = ["Milk".to_string(), "Bread".to_string()];

    // Run 1: full sweep over two retailers.
    let mut snapshot = Snapshot::load_or_default(&path);
    let mut tesco = Inventory::new();
    tesco.insert("Milk".to_string(), quote("1.15"));
    tesco.insert("Bread".to_string(), quote("0.90"));
    let mut asda = Inventory::new();
    asda.insert("Milk".to_string(), quote("1.09"));
    asda.insert("Bread".to_string(), quote("0.95"));
    snapshot.apply("Tesco", &full_set, &tesco);
    snapshot.apply("Asda", &full_set, &asda);
    snapshot.save(&path).unwrap();

    // Run 2: targeted at Bread only; Tesco found it cheaper, Asda lost it.
    let mut snapshot = Snapshot::load_or_default(&path);
    let target = ["Bread".to_string()];
    let mut tesco_update = Inventory::new();
    tesco_update.insert("Bread".to_string(), quote("0.75"));
    snapshot.apply("Tesco", &target, &tesco_update);
    snapshot.apply("Asda", &target, &Inventory::new());
    snapshot.save(&path).unwrap();

    // Milk entries from run 1 are untouched at both retailers.
    let final_state = Snapshot::load_or_default(&path);
    assert_eq!(final_state.prices["Tesco"]["Milk"], quote("1.15"));
    assert_eq!(final_state.prices["Asda"]["Milk"], quote("1.09"));
    assert_eq!(final_state.prices["Tesco"]["Bread"], quote("0.75"));
    assert!(!final_state.prices["Asda"].contains_key("Bread"));
}

#[test]
fn test_corrupt_state_files_never_abort_startup() {
    let dir = tempdir().unwrap();
    let wishlist_path = dir.path().join("wishlist.json");
    let snapshot_path = dir.path().join("prices.json");
    fs::write(&wishlist_path, "garbage").unwrap();
    fs::write(&snapshot_path, "{\"lastUpdated\": 42}").unwrap();

    let wishlist = Wishlist::load_or_default(&wishlist_path);
    assert_eq!(wishlist.items(), ["Milk", "Bread"]);

    let snapshot = Snapshot::load_or_default(&snapshot_path);
    assert!(snapshot.prices.is_empty());
}

#[test]
fn test_snapshot_timestamp_refreshes_on_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prices.json");

    let mut snapshot = Snapshot::default();
    assert!(snapshot.last_updated.is_empty());
    snapshot.save(&path).unwrap();
    assert!(!snapshot.last_updated.is_empty());

    let reloaded = Snapshot::load_or_default(&path);
    assert_eq!(reloaded.last_updated, snapshot.last_updated);
}
