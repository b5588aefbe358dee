use rust_decimal::Decimal;
use scraper::Html;
use std::str::FromStr;

use basket_watcher::extract;
use basket_watcher::store::Snapshot;

use super::{fixture_profile, legacy_result_page, result_page, sweep_fixture_pages};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_sweep_picks_cheapest_tile_per_item() {
    let profile = fixture_profile("TestMart");
    let milk_page = result_page(&[
        ("Whole Milk 2L", "£1.45"),
        ("Semi Skimmed Milk 2L", "£1.20"),
        ("Organic Milk 1L", "£1.80"),
    ]);
    let bread_page = result_page(&[("White Loaf", "85p"), ("Sourdough", "£2.50")]);

    let inventory = sweep_fixture_pages(
        &profile,
        &[("Milk", milk_page.as_str()), ("Bread", bread_page.as_str())],
    );

    assert_eq!(inventory["Milk"].price(), dec("1.20"));
    assert_eq!(inventory["Milk"].name(), Some("Semi Skimmed Milk 2L"));
    assert_eq!(inventory["Bread"].price(), dec("0.85"));
    assert_eq!(inventory["Bread"].name(), Some("White Loaf"));
}

#[test]
fn test_fallback_template_still_yields_prices() {
    // A/B-tested layout without the data attribute: the cascade falls through
    // to the legacy selector, names unavailable.
    let profile = fixture_profile("TestMart");
    let page = legacy_result_page(&["£2.00", "£1.20", "£5.00"]);

    let inventory = sweep_fixture_pages(&profile, &[("Eggs", page.as_str())]);
    assert_eq!(inventory["Eggs"].price(), dec("1.20"));
    assert_eq!(inventory["Eggs"].name(), None);
}

#[test]
fn test_identical_pages_give_identical_inventories() {
    let profile = fixture_profile("TestMart");
    let page = result_page(&[("Butter 250g", "£1.99"), ("Butter 500g", "£3.40")]);
    let pages = [("Butter", page.as_str())];

    let first = sweep_fixture_pages(&profile, &pages);
    let second = sweep_fixture_pages(&profile, &pages);
    assert_eq!(first, second);

    // And merging the repeat run changes nothing in the snapshot.
    let attempted = vec!["Butter".to_string()];
    let mut snapshot = Snapshot::default();
    snapshot.apply("TestMart", &attempted, &first);
    let after_first = snapshot.prices.clone();
    snapshot.apply("TestMart", &attempted, &second);
    assert_eq!(snapshot.prices, after_first);
}

#[test]
fn test_one_retailers_failure_leaves_others_untouched() {
    let profile_a = fixture_profile("MartA");
    let profile_c = fixture_profile("MartC");
    let page = result_page(&[("Thing", "£1.00")]);
    let items = vec![
        "Milk".to_string(),
        "Bread".to_string(),
        "Eggs".to_string(),
    ];

    let inventory_a = sweep_fixture_pages(
        &profile_a,
        &[
            ("Milk", page.as_str()),
            ("Bread", page.as_str()),
            ("Eggs", page.as_str()),
        ],
    );
    // Retailer B's item 2 blew up mid-navigation: items 1 and 3 still landed.
    let inventory_b = sweep_fixture_pages(
        &fixture_profile("MartB"),
        &[("Milk", page.as_str()), ("Eggs", page.as_str())],
    );
    let inventory_c = sweep_fixture_pages(
        &profile_c,
        &[
            ("Milk", page.as_str()),
            ("Bread", page.as_str()),
            ("Eggs", page.as_str()),
        ],
    );

    let mut snapshot = Snapshot::default();
    snapshot.apply("MartA", &items, &inventory_a);
    snapshot.apply("MartB", &items, &inventory_b);
    snapshot.apply("MartC", &items, &inventory_c);

    assert_eq!(snapshot.prices["MartA"].len(), 3);
    assert_eq!(snapshot.prices["MartC"].len(), 3);
    assert_eq!(snapshot.prices["MartB"].len(), 2);
    assert!(snapshot.prices["MartB"].contains_key("Milk"));
    assert!(snapshot.prices["MartB"].contains_key("Eggs"));
    assert!(!snapshot.prices["MartB"].contains_key("Bread"));
}

#[test]
fn test_empty_result_page_means_not_found() {
    let profile = fixture_profile("TestMart");
    let page = "<html><body><p>No results for your search.</p></body></html>";

    let inventory = sweep_fixture_pages(&profile, &[("Caviar", page)]);
    assert!(inventory.is_empty());
}

#[test]
fn test_scan_tolerates_noisy_tiles() {
    let profile = fixture_profile("TestMart");
    let html = result_page(&[
        ("Mystery Item", "Price unavailable"),
        ("Real Item", "now £3.15"),
    ]);
    let document = Html::parse_document(&html);

    let candidates = extract::scan(&document, &profile);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].0, dec("3.15"));
}
