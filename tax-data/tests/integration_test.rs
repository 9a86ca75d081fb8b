//! Integration tests for loading bracket tables from the on-disk fixtures.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{RegimeCalculator, RegimeComparison, RegimeId, TaxRegime};
use tax_data::{BracketLoaderError, BracketTableLoader};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

#[test]
fn test_load_both_regimes_from_fixture() {
    let tables = BracketTableLoader::load_file(&fixture("brackets_2024_2025.csv"))
        .expect("fixture should load");

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[&RegimeId::Old].len(), 6);
    assert_eq!(tables[&RegimeId::New].len(), 7);
}

#[test]
fn test_loaded_tables_reproduce_preset_results() {
    let tables = BracketTableLoader::load_file(&fixture("brackets_2024_2025.csv")).unwrap();
    let old = BracketTableLoader::apply(&tables, TaxRegime::old_2024());
    let new = BracketTableLoader::apply(&tables, TaxRegime::new_2025());

    let loaded = RegimeComparison::compare(dec!(1500000), &old, &new).unwrap();
    let preset =
        RegimeComparison::compare(dec!(1500000), &TaxRegime::old_2024(), &TaxRegime::new_2025())
            .unwrap();

    assert_eq!(loaded, preset);
}

#[test]
fn test_partial_file_only_overrides_its_regime() {
    let tables = BracketTableLoader::load_file(&fixture("flat_new_regime.csv")).unwrap();
    let new = BracketTableLoader::apply(&tables, TaxRegime::new_2025());

    let result = RegimeCalculator::new(&new).calculate(dec!(1500000)).unwrap();

    // taxable 14.25L: 10% of 9.25L, no rebate (excess 2.25L > 92,500)
    assert_eq!(result.tax_before_rebate, dec!(92500));
    assert_eq!(result.total_tax, dec!(96200));
    assert!(!tables.contains_key(&RegimeId::Old));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = BracketTableLoader::load_file(&fixture("does_not_exist.csv"))
        .expect_err("missing file should fail");

    assert!(matches!(err, BracketLoaderError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}
