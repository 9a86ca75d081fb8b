use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{RegimeError, RegimeId, TaxBracket, TaxRegime, validate_brackets};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown regime '{regime}' on row {row}")]
    UnknownRegime { regime: String, row: usize },

    #[error("invalid bracket table for the {regime} regime: {source}")]
    InvalidTable {
        regime: RegimeId,
        #[source]
        source: RegimeError,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket table CSV file.
///
/// - `regime`: `old`, `new`, `2024` or `2025`
/// - `min_income`: lower bound of the slab
/// - `max_income`: upper bound of the slab (empty for unbounded)
/// - `rate`: marginal rate as a decimal (e.g. 0.05 for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub regime: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Bracket tables keyed by the regime they replace.
pub type BracketTables = BTreeMap<RegimeId, Vec<TaxBracket>>;

/// Loader for regime bracket tables stored as CSV.
///
/// Rows may appear in any order; each regime's rows are sorted by
/// `min_income` and the resulting table must be contiguous from zero with an
/// unbounded last slab.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by regime and validate each table.
    pub fn into_tables(records: &[BracketRecord]) -> Result<BracketTables, BracketLoaderError> {
        let mut tables = BracketTables::new();

        for (index, record) in records.iter().enumerate() {
            let regime = RegimeId::parse(&record.regime).ok_or_else(|| {
                BracketLoaderError::UnknownRegime {
                    regime: record.regime.clone(),
                    row: index + 1,
                }
            })?;
            tables.entry(regime).or_default().push(TaxBracket::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        for (regime, brackets) in tables.iter_mut() {
            brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            validate_brackets(brackets).map_err(|source| BracketLoaderError::InvalidTable {
                regime: *regime,
                source,
            })?;
            debug!(%regime, slabs = brackets.len(), "bracket table validated");
        }

        Ok(tables)
    }

    /// Read, parse and validate a bracket CSV file.
    pub fn load_file(path: &Path) -> Result<BracketTables, BracketLoaderError> {
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records = Self::parse(file)?;
        let tables = Self::into_tables(&records)?;
        info!(
            path = %path.display(),
            regimes = tables.len(),
            "loaded bracket tables"
        );
        Ok(tables)
    }

    /// Replace the brackets of `regime` when `tables` has a table for it.
    pub fn apply(
        tables: &BracketTables,
        regime: TaxRegime,
    ) -> TaxRegime {
        match tables.get(&regime.id) {
            Some(brackets) => regime.with_brackets(brackets.clone()),
            None => regime,
        }
    }
}
