//! Session state for the comparison shell.
//!
//! Holds the current income entry and the comparison it produced. Nothing
//! else survives between entries.

use rust_decimal::Decimal;
use tax_core::{CalculationError, RegimeComparison, TaxRegime};
use tracing::{debug, warn};

use crate::utils::parse_income;

/// The two regimes being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regimes {
    pub old: TaxRegime,
    pub new: TaxRegime,
}

impl Default for Regimes {
    fn default() -> Self {
        Self {
            old: TaxRegime::old_2024(),
            new: TaxRegime::new_2025(),
        }
    }
}

impl Regimes {
    pub fn compare(
        &self,
        income: Decimal,
    ) -> Result<RegimeComparison, CalculationError> {
        RegimeComparison::compare(income, &self.old, &self.new)
    }
}

/// Current input and the results derived from it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Raw text of the latest entry.
    pub input: String,

    /// Results for `input`. `None` whenever the entry is not a positive
    /// number, so a stale comparison is never shown.
    pub comparison: Option<RegimeComparison>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input and recompute both regimes.
    ///
    /// Returns the fresh comparison, or `None` when the entry is rejected.
    pub fn update(
        &mut self,
        input: &str,
        regimes: &Regimes,
    ) -> Result<Option<&RegimeComparison>, CalculationError> {
        self.input = input.to_string();
        self.comparison = None;

        let income = match parse_income(input) {
            Ok(income) => income,
            Err(reason) => {
                warn!(input = %input.trim(), %reason, "income ignored");
                return Ok(None);
            }
        };

        let comparison = regimes.compare(income)?;
        debug!(
            %income,
            old = %comparison.old.total_tax,
            new = %comparison.new.total_tax,
            "comparison updated"
        );
        self.comparison = Some(comparison);
        Ok(self.comparison.as_ref())
    }

    pub fn has_result(&self) -> bool {
        self.comparison.is_some()
    }

    /// Clear the entry and its results.
    pub fn clear(&mut self) {
        self.input.clear();
        self.comparison = None;
    }
}
