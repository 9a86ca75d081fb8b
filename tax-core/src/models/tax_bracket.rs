use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single slab of a progressive bracket table.
///
/// Slabs are half-open intervals `[min_income, max_income)`. The last slab of
/// a table has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    #[serde(default)]
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    /// Width of the slab, or `None` for the unbounded top slab.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }

    /// Display label in lakh, e.g. `"3.0-7.0 lakh"` or `"15.0-∞ lakh"`.
    pub fn label(&self) -> String {
        let upper = self
            .max_income
            .map(format_lakh)
            .unwrap_or_else(|| "∞".to_string());
        format!("{}-{} lakh", format_lakh(self.min_income), upper)
    }

    /// Rate as a whole percentage, e.g. `"5%"`.
    pub fn rate_label(&self) -> String {
        format!("{}%", (self.tax_rate * Decimal::ONE_HUNDRED).normalize())
    }
}

fn format_lakh(amount: Decimal) -> String {
    let lakh = (amount / Decimal::from(100_000))
        .round_dp_with_strategy(1, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{lakh:.1}")
}
