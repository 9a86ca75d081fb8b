//! Slab-by-slab evaluation of a progressive bracket table.

use rust_decimal::Decimal;
use tracing::trace;

use crate::calculations::common::round_half_up;
use crate::{BracketContribution, TaxBracket};

/// Outcome of walking a bracket table for one taxable income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketEvaluation {
    /// Sum of the per-slab tax amounts.
    pub tax: Decimal,
    /// One entry per slab that received a positive share of the income.
    pub breakdown: Vec<BracketContribution>,
}

/// Taxes `taxable_income` slab by slab.
///
/// Each slab taxes the smaller of the remaining income and its width, and the
/// walk stops once the income is exhausted. Slabs are half-open, so income
/// sitting exactly on a boundary is attributed entirely to the lower slab.
/// The table is expected to be ordered and contiguous; see
/// [`validate_brackets`](crate::validate_brackets).
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxRegime;
/// use tax_core::calculations::evaluate_brackets;
///
/// let regime = TaxRegime::new_2025();
/// let evaluation = evaluate_brackets(dec!(1425000), &regime.brackets);
///
/// // 5% of 4L + 10% of 4L + 15% of 2.25L
/// assert_eq!(evaluation.tax, dec!(93750));
/// assert_eq!(evaluation.breakdown.len(), 4);
/// ```
pub fn evaluate_brackets(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> BracketEvaluation {
    let mut remaining = taxable_income;
    let mut tax = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxable_amount = match bracket.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };

        if taxable_amount > Decimal::ZERO {
            let slab_tax = round_half_up(taxable_amount * bracket.tax_rate);
            trace!(
                slab = %bracket.label(),
                %taxable_amount,
                %slab_tax,
                "slab evaluated"
            );
            tax += slab_tax;
            breakdown.push(BracketContribution {
                label: bracket.label(),
                min_income: bracket.min_income,
                max_income: bracket.max_income,
                rate: bracket.tax_rate,
                rate_label: bracket.rate_label(),
                taxable_amount,
                tax: slab_tax,
            });
        }

        remaining -= taxable_amount;
    }

    BracketEvaluation { tax, breakdown }
}
