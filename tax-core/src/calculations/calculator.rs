//! Per-regime tax calculation.
//!
//! [`RegimeCalculator`] runs one income through every stage of a regime and
//! assembles the [`TaxResult`]:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income: gross income less the standard deduction, minimum 0 |
//! | 2    | Slab tax from the bracket table |
//! | 3    | Rebate (full at or below the threshold, marginal above it) |
//! | 4    | Surcharge less marginal relief, when the regime has a surcharge policy |
//! | 5    | Cess on the tax after rebate plus surcharge |
//! | 6    | Final tax, effective rate and take-home pay |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxRegime;
//! use tax_core::calculations::RegimeCalculator;
//!
//! let regime = TaxRegime::new_2025();
//! let result = RegimeCalculator::new(&regime).calculate(dec!(1500000)).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(1425000));
//! assert_eq!(result.tax_before_rebate, dec!(93750));
//! assert_eq!(result.rebate, dec!(0));
//! assert_eq!(result.cess, dec!(3750));
//! assert_eq!(result.total_tax, dec!(97500));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::brackets::evaluate_brackets;
use crate::calculations::common::{max, round_half_up};
use crate::calculations::rebate::apply_rebate;
use crate::calculations::surcharge::{SurchargeOutcome, apply_surcharge};
use crate::{RegimeError, TaxRegime, TaxResult};

/// Errors that can occur while calculating a regime's tax.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// The regime parameters failed validation.
    #[error("invalid regime: {0}")]
    InvalidRegime(#[from] RegimeError),

    /// Gross income was below zero.
    #[error("gross income must be non-negative, got {0}")]
    NegativeIncome(Decimal),
}

/// Calculator bound to one set of regime parameters.
#[derive(Debug, Clone)]
pub struct RegimeCalculator<'a> {
    regime: &'a TaxRegime,
}

impl<'a> RegimeCalculator<'a> {
    pub fn new(regime: &'a TaxRegime) -> Self {
        Self { regime }
    }

    pub fn regime(&self) -> &'a TaxRegime {
        self.regime
    }

    /// Calculates the full result for `gross_income`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if:
    /// - the regime parameters are invalid
    /// - `gross_income` is negative
    pub fn calculate(
        &self,
        gross_income: Decimal,
    ) -> Result<TaxResult, CalculationError> {
        self.regime.validate()?;
        if gross_income < Decimal::ZERO {
            return Err(CalculationError::NegativeIncome(gross_income));
        }

        let taxable_income = self.taxable_income(gross_income);
        let evaluation = evaluate_brackets(taxable_income, &self.regime.brackets);

        let rebate = apply_rebate(
            taxable_income,
            evaluation.tax,
            self.regime.rebate_threshold,
        );

        let surcharge = self.surcharge(rebate.tax_after_rebate, gross_income);
        let cess = self.cess(rebate.tax_after_rebate + surcharge.surcharge);
        let total_tax = rebate.tax_after_rebate + surcharge.surcharge + cess;

        debug!(
            regime = %self.regime.id,
            %gross_income,
            %taxable_income,
            tax = %evaluation.tax,
            rebate = %rebate.rebate,
            surcharge = %surcharge.surcharge,
            %cess,
            %total_tax,
            "regime calculated"
        );

        Ok(TaxResult {
            regime: self.regime.id,
            gross_income,
            standard_deduction: self.regime.standard_deduction,
            taxable_income,
            basic_exemption: self.regime.basic_exemption(),
            breakdown: evaluation.breakdown,
            tax_before_rebate: evaluation.tax,
            rebate: rebate.rebate,
            excess_above_rebate_threshold: rebate.excess_above_threshold,
            tax_after_rebate: rebate.tax_after_rebate,
            surcharge_rate: surcharge.rate,
            gross_surcharge: surcharge.gross_surcharge,
            marginal_relief: surcharge.marginal_relief,
            surcharge: surcharge.surcharge,
            cess_rate: self.regime.cess_rate,
            cess,
            total_tax,
            effective_rate: self.effective_rate(total_tax, gross_income),
            take_home: gross_income - total_tax,
        })
    }

    /// Gross income less the standard deduction, never below zero.
    fn taxable_income(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        max(gross_income - self.regime.standard_deduction, Decimal::ZERO)
    }

    /// Runs the surcharge policy, if the regime has one.
    fn surcharge(
        &self,
        tax_after_rebate: Decimal,
        gross_income: Decimal,
    ) -> SurchargeOutcome {
        match &self.regime.surcharge {
            Some(policy) => apply_surcharge(tax_after_rebate, gross_income, policy),
            None => SurchargeOutcome::default(),
        }
    }

    fn cess(
        &self,
        tax: Decimal,
    ) -> Decimal {
        round_half_up(tax * self.regime.cess_rate)
    }

    /// Final tax as a percentage of gross income.
    fn effective_rate(
        &self,
        total_tax: Decimal,
        gross_income: Decimal,
    ) -> Decimal {
        if gross_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_half_up(total_tax / gross_income * Decimal::ONE_HUNDRED)
    }
}
