use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{SurchargePolicy, TaxBracket};

/// Which of the two compared regimes a set of parameters describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegimeId {
    Old,
    New,
}

impl RegimeId {
    pub fn all() -> &'static [RegimeId] {
        &[RegimeId::Old, RegimeId::New]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Old => "2024 Tax Regime",
            Self::New => "2025 Tax Regime",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" | "2024" => Some(Self::Old),
            "new" | "2025" => Some(Self::New),
            _ => None,
        }
    }
}

impl fmt::Display for RegimeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegimeId {
    type Err = RegimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RegimeError::UnknownRegime(s.to_string()))
    }
}

/// Problems found while validating regime parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegimeError {
    #[error("unknown regime '{0}' (expected old, new, 2024 or 2025)")]
    UnknownRegime(String),

    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("first bracket must start at 0, got {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket {index} starts at {found}, expected {expected}")]
    NonContiguousBracket {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {0} has an upper bound not above its lower bound")]
    EmptyBracket(usize),

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast(usize),

    #[error("last bracket must be unbounded")]
    BoundedTopBracket,

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {0} rate is lower than the bracket before it")]
    DecreasingRate(usize),

    #[error("standard deduction must be non-negative, got {0}")]
    InvalidStandardDeduction(Decimal),

    #[error("rebate threshold must be non-negative, got {0}")]
    InvalidRebateThreshold(Decimal),

    #[error("cess rate must be between 0 and 1, got {0}")]
    InvalidCessRate(Decimal),

    #[error("surcharge tier {index} is invalid: {reason}")]
    InvalidSurchargeTier { index: usize, reason: &'static str },

    #[error("combined top marginal rate {0} exceeds 100%")]
    ConfiscatoryTopRate(Decimal),
}

/// Parameters of one tax regime.
///
/// This is the configuration object the calculator runs against. The base
/// calculation leaves `surcharge` empty; attaching a [`SurchargePolicy`]
/// enables the surcharge and marginal relief steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRegime {
    pub id: RegimeId,
    pub standard_deduction: Decimal,
    pub rebate_threshold: Decimal,
    pub cess_rate: Decimal,
    pub brackets: Vec<TaxBracket>,
    #[serde(default)]
    pub surcharge: Option<SurchargePolicy>,
}

/// Health and education cess shared by both regimes.
pub const CESS_RATE: Decimal = dec!(0.04);

impl TaxRegime {
    /// The 2024 regime.
    pub fn old_2024() -> Self {
        Self {
            id: RegimeId::Old,
            standard_deduction: dec!(50000),
            rebate_threshold: dec!(700000),
            cess_rate: CESS_RATE,
            brackets: vec![
                TaxBracket::new(dec!(0), Some(dec!(300000)), dec!(0)),
                TaxBracket::new(dec!(300000), Some(dec!(700000)), dec!(0.05)),
                TaxBracket::new(dec!(700000), Some(dec!(1000000)), dec!(0.10)),
                TaxBracket::new(dec!(1000000), Some(dec!(1200000)), dec!(0.15)),
                TaxBracket::new(dec!(1200000), Some(dec!(1500000)), dec!(0.20)),
                TaxBracket::new(dec!(1500000), None, dec!(0.30)),
            ],
            surcharge: None,
        }
    }

    /// The 2025 regime.
    pub fn new_2025() -> Self {
        Self {
            id: RegimeId::New,
            standard_deduction: dec!(75000),
            rebate_threshold: dec!(1200000),
            cess_rate: CESS_RATE,
            brackets: vec![
                TaxBracket::new(dec!(0), Some(dec!(400000)), dec!(0)),
                TaxBracket::new(dec!(400000), Some(dec!(800000)), dec!(0.05)),
                TaxBracket::new(dec!(800000), Some(dec!(1200000)), dec!(0.10)),
                TaxBracket::new(dec!(1200000), Some(dec!(1600000)), dec!(0.15)),
                TaxBracket::new(dec!(1600000), Some(dec!(2000000)), dec!(0.20)),
                TaxBracket::new(dec!(2000000), Some(dec!(2400000)), dec!(0.25)),
                TaxBracket::new(dec!(2400000), None, dec!(0.30)),
            ],
            surcharge: None,
        }
    }

    /// Preset parameters for `id`.
    pub fn preset(id: RegimeId) -> Self {
        match id {
            RegimeId::Old => Self::old_2024(),
            RegimeId::New => Self::new_2025(),
        }
    }

    pub fn with_surcharge(
        mut self,
        policy: SurchargePolicy,
    ) -> Self {
        self.surcharge = Some(policy);
        self
    }

    pub fn with_brackets(
        mut self,
        brackets: Vec<TaxBracket>,
    ) -> Self {
        self.brackets = brackets;
        self
    }

    /// Upper bound of the zero-tax first slab.
    pub fn basic_exemption(&self) -> Decimal {
        self.brackets
            .first()
            .and_then(|b| b.max_income)
            .unwrap_or(Decimal::ZERO)
    }

    /// Checks that the bracket table is contiguous from zero, ends unbounded
    /// and has non-decreasing rates, and that the remaining parameters keep
    /// the final tax at or below gross income.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegimeError`] found.
    pub fn validate(&self) -> Result<(), RegimeError> {
        validate_brackets(&self.brackets)?;

        if self.standard_deduction < Decimal::ZERO {
            return Err(RegimeError::InvalidStandardDeduction(
                self.standard_deduction,
            ));
        }
        if self.rebate_threshold < Decimal::ZERO {
            return Err(RegimeError::InvalidRebateThreshold(self.rebate_threshold));
        }
        if self.cess_rate < Decimal::ZERO || self.cess_rate > Decimal::ONE {
            return Err(RegimeError::InvalidCessRate(self.cess_rate));
        }

        let top_surcharge = match &self.surcharge {
            Some(policy) => {
                validate_surcharge(policy)?;
                policy.top_rate()
            }
            None => Decimal::ZERO,
        };

        let top_rate = self
            .brackets
            .iter()
            .map(|b| b.tax_rate)
            .max()
            .unwrap_or(Decimal::ZERO);
        let combined = top_rate * (Decimal::ONE + top_surcharge) * (Decimal::ONE + self.cess_rate);
        if combined > Decimal::ONE {
            return Err(RegimeError::ConfiscatoryTopRate(combined));
        }

        Ok(())
    }
}

/// Validates a bracket table on its own, without any regime parameters.
///
/// # Errors
///
/// Returns the first [`RegimeError`] found in the table.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), RegimeError> {
    let first = brackets.first().ok_or(RegimeError::NoTaxBrackets)?;
    if first.min_income != Decimal::ZERO {
        return Err(RegimeError::FirstBracketNotAtZero(first.min_income));
    }

    let last_index = brackets.len() - 1;
    let mut expected_min = Decimal::ZERO;
    let mut previous_rate = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.min_income != expected_min {
            return Err(RegimeError::NonContiguousBracket {
                index,
                expected: expected_min,
                found: bracket.min_income,
            });
        }
        if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
            return Err(RegimeError::InvalidRate {
                index,
                rate: bracket.tax_rate,
            });
        }
        if bracket.tax_rate < previous_rate {
            return Err(RegimeError::DecreasingRate(index));
        }
        previous_rate = bracket.tax_rate;

        match bracket.max_income {
            Some(max) if max <= bracket.min_income => {
                return Err(RegimeError::EmptyBracket(index));
            }
            Some(_) if index == last_index => return Err(RegimeError::BoundedTopBracket),
            Some(max) => expected_min = max,
            None if index != last_index => {
                return Err(RegimeError::UnboundedBracketNotLast(index));
            }
            None => {}
        }
    }

    Ok(())
}

fn validate_surcharge(policy: &SurchargePolicy) -> Result<(), RegimeError> {
    let mut previous: Option<(Decimal, Decimal)> = None;

    for (index, tier) in policy.tiers.iter().enumerate() {
        if tier.threshold < Decimal::ZERO {
            return Err(RegimeError::InvalidSurchargeTier {
                index,
                reason: "threshold is negative",
            });
        }
        if tier.rate < Decimal::ZERO || tier.rate > Decimal::ONE {
            return Err(RegimeError::InvalidSurchargeTier {
                index,
                reason: "rate must be between 0 and 1",
            });
        }
        if let Some((threshold, rate)) = previous {
            if tier.threshold <= threshold {
                return Err(RegimeError::InvalidSurchargeTier {
                    index,
                    reason: "thresholds must be strictly ascending",
                });
            }
            if tier.rate < rate {
                return Err(RegimeError::InvalidSurchargeTier {
                    index,
                    reason: "rate is lower than the tier before it",
                });
            }
        }
        previous = Some((tier.threshold, tier.rate));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::SurchargeTier;

    // =========================================================================
    // RegimeId tests
    // =========================================================================

    #[test]
    fn regime_id_parses_names_and_years() {
        assert_eq!(RegimeId::parse("old"), Some(RegimeId::Old));
        assert_eq!(RegimeId::parse(" NEW "), Some(RegimeId::New));
        assert_eq!(RegimeId::parse("2024"), Some(RegimeId::Old));
        assert_eq!(RegimeId::parse("2025"), Some(RegimeId::New));
        assert_eq!(RegimeId::parse("2026"), None);
    }

    #[test]
    fn regime_id_from_str_reports_unknown_value() {
        assert_eq!(
            "legacy".parse::<RegimeId>(),
            Err(RegimeError::UnknownRegime("legacy".to_string()))
        );
    }

    #[test]
    fn regime_titles_name_the_year() {
        assert_eq!(RegimeId::Old.title(), "2024 Tax Regime");
        assert_eq!(RegimeId::New.title(), "2025 Tax Regime");
    }

    // =========================================================================
    // preset tests
    // =========================================================================

    #[test]
    fn presets_are_valid() {
        assert_eq!(TaxRegime::old_2024().validate(), Ok(()));
        assert_eq!(TaxRegime::new_2025().validate(), Ok(()));
        assert_eq!(
            TaxRegime::new_2025()
                .with_surcharge(SurchargePolicy::statutory())
                .validate(),
            Ok(())
        );
    }

    #[test]
    fn basic_exemption_is_first_slab_upper_bound() {
        assert_eq!(TaxRegime::old_2024().basic_exemption(), dec!(300000));
        assert_eq!(TaxRegime::new_2025().basic_exemption(), dec!(400000));
    }

    #[test]
    fn preset_matches_id() {
        for id in RegimeId::all() {
            assert_eq!(TaxRegime::preset(*id).id, *id);
        }
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_rejects_empty_table() {
        let regime = TaxRegime::old_2024().with_brackets(vec![]);

        assert_eq!(regime.validate(), Err(RegimeError::NoTaxBrackets));
    }

    #[test]
    fn validate_rejects_table_not_starting_at_zero() {
        let regime = TaxRegime::old_2024().with_brackets(vec![TaxBracket::new(
            dec!(100),
            None,
            dec!(0.10),
        )]);

        assert_eq!(
            regime.validate(),
            Err(RegimeError::FirstBracketNotAtZero(dec!(100)))
        );
    }

    #[test]
    fn validate_rejects_gap_between_brackets() {
        let regime = TaxRegime::old_2024().with_brackets(vec![
            TaxBracket::new(dec!(0), Some(dec!(300000)), dec!(0)),
            TaxBracket::new(dec!(350000), None, dec!(0.10)),
        ]);

        assert_eq!(
            regime.validate(),
            Err(RegimeError::NonContiguousBracket {
                index: 1,
                expected: dec!(300000),
                found: dec!(350000),
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_top_bracket() {
        let regime = TaxRegime::old_2024().with_brackets(vec![TaxBracket::new(
            dec!(0),
            Some(dec!(300000)),
            dec!(0),
        )]);

        assert_eq!(regime.validate(), Err(RegimeError::BoundedTopBracket));
    }

    #[test]
    fn validate_rejects_unbounded_middle_bracket() {
        let regime = TaxRegime::old_2024().with_brackets(vec![
            TaxBracket::new(dec!(0), None, dec!(0)),
            TaxBracket::new(dec!(300000), None, dec!(0.10)),
        ]);

        assert_eq!(regime.validate(), Err(RegimeError::UnboundedBracketNotLast(0)));
    }

    #[test]
    fn validate_rejects_decreasing_rates() {
        let regime = TaxRegime::old_2024().with_brackets(vec![
            TaxBracket::new(dec!(0), Some(dec!(300000)), dec!(0.10)),
            TaxBracket::new(dec!(300000), None, dec!(0.05)),
        ]);

        assert_eq!(regime.validate(), Err(RegimeError::DecreasingRate(1)));
    }

    #[test]
    fn validate_rejects_empty_bracket() {
        let regime = TaxRegime::old_2024().with_brackets(vec![
            TaxBracket::new(dec!(0), Some(dec!(0)), dec!(0)),
            TaxBracket::new(dec!(0), None, dec!(0.05)),
        ]);

        assert_eq!(regime.validate(), Err(RegimeError::EmptyBracket(0)));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let regime = TaxRegime::old_2024().with_brackets(vec![TaxBracket::new(
            dec!(0),
            None,
            dec!(1.5),
        )]);

        assert_eq!(
            regime.validate(),
            Err(RegimeError::InvalidRate {
                index: 0,
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_deduction_and_threshold() {
        let mut regime = TaxRegime::new_2025();
        regime.standard_deduction = dec!(-1);
        assert_eq!(
            regime.validate(),
            Err(RegimeError::InvalidStandardDeduction(dec!(-1)))
        );

        let mut regime = TaxRegime::new_2025();
        regime.rebate_threshold = dec!(-1);
        assert_eq!(
            regime.validate(),
            Err(RegimeError::InvalidRebateThreshold(dec!(-1)))
        );
    }

    #[test]
    fn validate_rejects_unordered_surcharge_tiers() {
        let regime = TaxRegime::new_2025().with_surcharge(SurchargePolicy::new(vec![
            SurchargeTier {
                threshold: dec!(10000000),
                rate: dec!(0.15),
            },
            SurchargeTier {
                threshold: dec!(5000000),
                rate: dec!(0.10),
            },
        ]));

        assert!(matches!(
            regime.validate(),
            Err(RegimeError::InvalidSurchargeTier { index: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_combined_rate_above_one() {
        let regime = TaxRegime::new_2025()
            .with_brackets(vec![TaxBracket::new(dec!(0), None, dec!(0.80))])
            .with_surcharge(SurchargePolicy::statutory());

        // 0.80 * 1.37 * 1.04
        assert_eq!(
            regime.validate(),
            Err(RegimeError::ConfiscatoryTopRate(dec!(1.139840)))
        );
    }
}
