//! Side-by-side comparison of the old and new regimes for one income.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::calculations::calculator::{CalculationError, RegimeCalculator};
use crate::{RegimeId, TaxRegime, TaxResult};

/// Both regime results for one income plus the derived savings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub gross_income: Decimal,
    pub old: TaxResult,
    pub new: TaxResult,
    /// Old tax before cess minus new tax before cess. Positive when the new
    /// regime is cheaper.
    pub savings: Decimal,
    /// `savings` as a percentage of the old tax, one decimal place. `None`
    /// when the old regime owes nothing.
    pub savings_percent: Option<Decimal>,
    /// Regime with the lower tax before cess. Ties go to the old regime.
    pub preferred: RegimeId,
}

impl RegimeComparison {
    /// Runs `gross_income` through both regimes.
    ///
    /// # Errors
    ///
    /// Returns the first [`CalculationError`] from either calculator.
    pub fn compare(
        gross_income: Decimal,
        old: &TaxRegime,
        new: &TaxRegime,
    ) -> Result<Self, CalculationError> {
        let old = RegimeCalculator::new(old).calculate(gross_income)?;
        let new = RegimeCalculator::new(new).calculate(gross_income)?;

        let (old_tax, new_tax) = (old.tax_before_cess(), new.tax_before_cess());
        let savings = old_tax - new_tax;
        let savings_percent = (old_tax > Decimal::ZERO).then(|| {
            (savings / old_tax * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        });
        let preferred = if old_tax <= new_tax {
            RegimeId::Old
        } else {
            RegimeId::New
        };

        Ok(Self {
            gross_income,
            old,
            new,
            savings,
            savings_percent,
            preferred,
        })
    }

    pub fn result(
        &self,
        id: RegimeId,
    ) -> &TaxResult {
        match id {
            RegimeId::Old => &self.old,
            RegimeId::New => &self.new,
        }
    }

    pub fn new_regime_saves(&self) -> bool {
        self.savings > Decimal::ZERO
    }
}
