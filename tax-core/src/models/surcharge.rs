use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One step of a surcharge table keyed on gross income.
///
/// The tier applies once gross income strictly exceeds `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeTier {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Tiered surcharge with marginal relief at every tier boundary.
///
/// Tiers are ordered by ascending threshold. Attaching a policy to a
/// [`TaxRegime`](crate::TaxRegime) turns on the extended calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargePolicy {
    pub tiers: Vec<SurchargeTier>,
}

impl SurchargePolicy {
    pub fn new(tiers: Vec<SurchargeTier>) -> Self {
        Self { tiers }
    }

    /// 10% above 50 lakh, 15% above 1 crore, 25% above 2 crore and 37% above
    /// 5 crore.
    pub fn statutory() -> Self {
        Self::new(vec![
            SurchargeTier {
                threshold: dec!(5000000),
                rate: dec!(0.10),
            },
            SurchargeTier {
                threshold: dec!(10000000),
                rate: dec!(0.15),
            },
            SurchargeTier {
                threshold: dec!(20000000),
                rate: dec!(0.25),
            },
            SurchargeTier {
                threshold: dec!(50000000),
                rate: dec!(0.37),
            },
        ])
    }

    /// Index of the tier whose threshold `gross_income` exceeds, if any.
    pub fn tier_index(
        &self,
        gross_income: Decimal,
    ) -> Option<usize> {
        self.tiers
            .iter()
            .rposition(|tier| gross_income > tier.threshold)
    }

    /// Highest rate in the table, zero when there are no tiers.
    pub fn top_rate(&self) -> Decimal {
        self.tiers
            .iter()
            .map(|tier| tier.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tier_index_is_none_at_or_below_first_threshold() {
        let policy = SurchargePolicy::statutory();

        assert_eq!(policy.tier_index(dec!(4999999)), None);
        assert_eq!(policy.tier_index(dec!(5000000)), None);
    }

    #[test]
    fn tier_index_picks_highest_exceeded_threshold() {
        let policy = SurchargePolicy::statutory();

        assert_eq!(policy.tier_index(dec!(5000001)), Some(0));
        assert_eq!(policy.tier_index(dec!(10000000)), Some(0));
        assert_eq!(policy.tier_index(dec!(15000000)), Some(1));
        assert_eq!(policy.tier_index(dec!(20000001)), Some(2));
        assert_eq!(policy.tier_index(dec!(60000000)), Some(3));
    }

    #[test]
    fn top_rate_of_statutory_policy_is_37_percent() {
        assert_eq!(SurchargePolicy::statutory().top_rate(), dec!(0.37));
        assert_eq!(SurchargePolicy::new(vec![]).top_rate(), Decimal::ZERO);
    }
}
