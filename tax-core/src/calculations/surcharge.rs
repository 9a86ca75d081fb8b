//! Tiered surcharge on high incomes, with marginal relief at each tier.
//!
//! # Marginal relief
//!
//! For gross income `I` inside the tier starting at `L` with rate `r`, where
//! the tier below has rate `r₀` (zero for the first tier):
//!
//! | Quantity        | Formula |
//! |-----------------|---------|
//! | raw surcharge   | `tax × r` |
//! | reference tax   | `tax × L / I` |
//! | allowed total   | `reference tax × (1 + r₀) + (I − L)` |
//! | relief          | `tax × (1 + r) − allowed total`, rounded up to paise and clamped to `[0, raw surcharge]` |
//! | net surcharge   | `raw surcharge − relief` |
//!
//! The reference tax scales the actual tax linearly down to the boundary
//! instead of re-running the bracket table at `L`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SurchargePolicy;
use crate::calculations::common::{clamp_non_negative, round_half_up, round_up_paise};

/// Result of applying a surcharge policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurchargeOutcome {
    /// Rate of the tier the gross income falls in, zero below the first tier.
    pub rate: Decimal,
    /// Lower bound of that tier.
    pub tier_threshold: Option<Decimal>,
    /// `tax × rate` before relief.
    pub gross_surcharge: Decimal,
    pub marginal_relief: Decimal,
    /// Surcharge actually owed.
    pub surcharge: Decimal,
}

/// Applies `policy` to `tax` (the tax after rebate) based on `gross_income`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::SurchargePolicy;
/// use tax_core::calculations::apply_surcharge;
///
/// let policy = SurchargePolicy::statutory();
///
/// let below = apply_surcharge(dec!(1400000), dec!(5000000), &policy);
/// assert_eq!(below.surcharge, dec!(0));
///
/// let above = apply_surcharge(dec!(3000000), dec!(10000001), &policy);
/// assert_eq!(above.rate, dec!(0.15));
/// ```
pub fn apply_surcharge(
    tax: Decimal,
    gross_income: Decimal,
    policy: &SurchargePolicy,
) -> SurchargeOutcome {
    let Some(index) = policy.tier_index(gross_income) else {
        return SurchargeOutcome::default();
    };
    if tax <= Decimal::ZERO {
        return SurchargeOutcome {
            rate: policy.tiers[index].rate,
            tier_threshold: Some(policy.tiers[index].threshold),
            ..SurchargeOutcome::default()
        };
    }

    let tier = policy.tiers[index];
    let previous_rate = index
        .checked_sub(1)
        .map(|i| policy.tiers[i].rate)
        .unwrap_or(Decimal::ZERO);

    let gross_surcharge = round_half_up(tax * tier.rate);
    // Excess over the allowed total, ordered so no intermediate exceeds the
    // gross income. Rounded up so the net surcharge never overshoots.
    let excess = tax + gross_surcharge
        - (gross_income - tier.threshold)
        - boundary_total(tax, gross_income, tier.threshold, previous_rate);
    let marginal_relief = clamp_non_negative(round_up_paise(excess), gross_surcharge);
    let surcharge = gross_surcharge - marginal_relief;

    debug!(
        rate = %tier.rate,
        threshold = %tier.threshold,
        %gross_surcharge,
        %marginal_relief,
        "surcharge applied"
    );

    SurchargeOutcome {
        rate: tier.rate,
        tier_threshold: Some(tier.threshold),
        gross_surcharge,
        marginal_relief,
        surcharge,
    }
}

/// Tax plus surcharge at the tier boundary, with the tax scaled linearly from
/// `gross_income` down to `threshold`.
pub fn boundary_total(
    tax: Decimal,
    gross_income: Decimal,
    threshold: Decimal,
    previous_rate: Decimal,
) -> Decimal {
    if gross_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let reference_tax = tax * (threshold / gross_income);
    reference_tax * (Decimal::ONE + previous_rate)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::SurchargeTier;

    #[test]
    fn no_surcharge_at_or_below_first_threshold() {
        let policy = SurchargePolicy::statutory();

        let outcome = apply_surcharge(dec!(1500000), dec!(5000000), &policy);

        assert_eq!(outcome, SurchargeOutcome::default());
    }

    #[test]
    fn zero_tax_reports_rate_but_no_surcharge() {
        let policy = SurchargePolicy::statutory();

        let outcome = apply_surcharge(dec!(0), dec!(6000000), &policy);

        assert_eq!(outcome.rate, dec!(0.10));
        assert_eq!(outcome.surcharge, dec!(0));
        assert_eq!(outcome.marginal_relief, dec!(0));
    }

    #[test]
    fn relief_caps_increase_just_above_first_threshold() {
        let policy = SurchargePolicy::statutory();
        let tax = dec!(1400000);
        let income = dec!(5010000);

        let outcome = apply_surcharge(tax, income, &policy);

        assert_eq!(outcome.gross_surcharge, dec!(140000));
        // reference = 1,400,000 * 5,000,000 / 5,010,000 = 1,397,205.5888...
        // allowed   = 1,397,205.5888... + 10,000
        // relief    = 1,540,000 - 1,407,205.5888... = 132,794.4111..., rounded up
        assert_eq!(outcome.marginal_relief, dec!(132794.42));
        assert_eq!(outcome.surcharge, dec!(7205.58));
    }

    #[test]
    fn no_relief_well_inside_tier() {
        let policy = SurchargePolicy::statutory();

        let outcome = apply_surcharge(dec!(2500000), dec!(9000000), &policy);

        assert_eq!(outcome.gross_surcharge, dec!(250000));
        assert_eq!(outcome.marginal_relief, dec!(0));
        assert_eq!(outcome.surcharge, dec!(250000));
    }

    #[test]
    fn relief_uses_previous_tier_rate_at_boundary() {
        let policy = SurchargePolicy::statutory();
        let tax = dec!(3000000);
        let income = dec!(10001000);

        let outcome = apply_surcharge(tax, income, &policy);

        assert_eq!(outcome.rate, dec!(0.15));
        assert_eq!(outcome.tier_threshold, Some(dec!(10000000)));
        let allowed = boundary_total(tax, income, dec!(10000000), dec!(0.10)) + dec!(1000);
        assert!(tax + outcome.surcharge <= allowed);
        assert!(outcome.marginal_relief > Decimal::ZERO);
    }

    #[test]
    fn top_tier_above_five_crore_uses_37_percent() {
        let policy = SurchargePolicy::statutory();
        let tax = dec!(17557500);
        let income = dec!(60000000);

        let outcome = apply_surcharge(tax, income, &policy);

        assert_eq!(outcome.rate, dec!(0.37));
        assert_eq!(outcome.gross_surcharge, dec!(6496275));
        let allowed = boundary_total(tax, income, dec!(50000000), dec!(0.25)) + dec!(10000000);
        assert!(tax + outcome.surcharge <= allowed);
    }

    #[test]
    fn relief_never_exceeds_raw_surcharge() {
        let policy = SurchargePolicy::new(vec![SurchargeTier {
            threshold: dec!(100),
            rate: dec!(0.50),
        }]);

        let outcome = apply_surcharge(dec!(90), dec!(101), &policy);

        assert_eq!(outcome.gross_surcharge, dec!(45));
        assert!(outcome.marginal_relief <= outcome.gross_surcharge);
        assert!(outcome.surcharge >= Decimal::ZERO);
    }

    #[test]
    fn increase_over_boundary_is_bounded_without_rounding_slack() {
        let policy = SurchargePolicy::statutory();
        let tax = dec!(1234567.89);
        let income = dec!(5000123.45);

        let outcome = apply_surcharge(tax, income, &policy);

        let allowed = boundary_total(tax, income, dec!(5000000), dec!(0)) + dec!(123.45);
        assert!(outcome.marginal_relief > Decimal::ZERO);
        assert!(tax + outcome.surcharge <= allowed);
    }

    #[test]
    fn extreme_income_does_not_overflow() {
        let policy = SurchargePolicy::statutory();
        let income = dec!(10000000000000000000000);
        let tax = income * dec!(0.3);

        let outcome = apply_surcharge(tax, income, &policy);

        assert_eq!(outcome.rate, dec!(0.37));
        assert_eq!(outcome.marginal_relief, dec!(0));
        assert_eq!(outcome.surcharge, tax * dec!(0.37));
    }

    #[test]
    fn boundary_total_at_extreme_income_stays_in_range() {
        let income = Decimal::MAX;

        let total = boundary_total(income * dec!(0.3), income, dec!(50000000), dec!(0.25));

        // 0.3 × 5 crore × 1.25
        assert!((total - dec!(18750000)).abs() < dec!(1));
    }

    #[test]
    fn boundary_total_is_zero_for_zero_income() {
        assert_eq!(boundary_total(dec!(10), dec!(0), dec!(5), dec!(0.1)), dec!(0));
    }
}
