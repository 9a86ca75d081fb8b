//! Rebate with marginal phase-out above the threshold.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::max;

/// Result of applying the rebate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateOutcome {
    pub rebate: Decimal,
    pub tax_after_rebate: Decimal,
    /// Taxable income above the threshold, zero at or below it.
    pub excess_above_threshold: Decimal,
}

/// Applies the rebate to the slab tax.
///
/// At or below `threshold` the whole tax is forgiven. Above it the rebate only
/// covers the part of the tax that exceeds the income over the threshold, so
/// crossing the threshold by one rupee never costs more than one rupee.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::apply_rebate;
///
/// let outcome = apply_rebate(dec!(1210000), dec!(61500), dec!(1200000));
///
/// assert_eq!(outcome.tax_after_rebate, dec!(10000));
/// assert_eq!(outcome.rebate, dec!(51500));
/// ```
pub fn apply_rebate(
    taxable_income: Decimal,
    tax: Decimal,
    threshold: Decimal,
) -> RebateOutcome {
    let excess_above_threshold = max(taxable_income - threshold, Decimal::ZERO);

    let rebate = if taxable_income <= threshold {
        tax
    } else if tax > excess_above_threshold {
        tax - excess_above_threshold
    } else {
        Decimal::ZERO
    };

    RebateOutcome {
        rebate,
        tax_after_rebate: tax - rebate,
        excess_above_threshold,
    }
}
