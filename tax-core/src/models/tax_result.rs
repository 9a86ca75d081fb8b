use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RegimeId;

/// Tax attributed to one slab of the bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketContribution {
    /// Slab range in lakh, e.g. `"3.0-7.0 lakh"`.
    pub label: String,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    /// Whole-percentage rate, e.g. `"5%"`.
    pub rate_label: String,
    /// Portion of taxable income falling inside the slab.
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Full breakdown of the tax owed under one regime for one income.
///
/// A result is derived fresh for every (income, regime) pair and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: RegimeId,
    pub gross_income: Decimal,
    pub standard_deduction: Decimal,
    /// Gross income less the standard deduction, floored at zero.
    pub taxable_income: Decimal,
    pub basic_exemption: Decimal,
    pub breakdown: Vec<BracketContribution>,

    pub tax_before_rebate: Decimal,
    pub rebate: Decimal,
    pub excess_above_rebate_threshold: Decimal,
    pub tax_after_rebate: Decimal,

    // Zero unless the regime carries a surcharge policy
    pub surcharge_rate: Decimal,
    pub gross_surcharge: Decimal,
    pub marginal_relief: Decimal,
    pub surcharge: Decimal,

    pub cess_rate: Decimal,
    pub cess: Decimal,
    /// Final liability: tax after rebate plus net surcharge plus cess.
    pub total_tax: Decimal,
    /// `total_tax / gross_income` as a percentage with two decimals.
    pub effective_rate: Decimal,
    pub take_home: Decimal,
}

impl TaxResult {
    /// Tax owed before cess is added.
    pub fn tax_before_cess(&self) -> Decimal {
        self.tax_after_rebate + self.surcharge
    }

    pub fn has_rebate(&self) -> bool {
        self.rebate > Decimal::ZERO
    }

    pub fn has_surcharge(&self) -> bool {
        self.gross_surcharge > Decimal::ZERO
    }

    /// Slabs that actually contributed tax.
    pub fn taxed_slabs(&self) -> impl Iterator<Item = &BracketContribution> {
        self.breakdown.iter().filter(|b| b.tax > Decimal::ZERO)
    }
}
