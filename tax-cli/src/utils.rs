use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Why an income entry was not accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeInputError {
    #[error("no income entered")]
    Empty,

    #[error("income '{0}' is not a number")]
    NotNumeric(String),

    #[error("income must be greater than zero, got {0}")]
    NotPositive(Decimal),
}

/// Normalizes input for decimal parsing: trims whitespace, drops a leading
/// rupee sign and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('₹').unwrap_or(trimmed);
    trimmed.trim().replace(',', "")
}

/// Parses an annual income entry.
///
/// Accepts plain decimals with optional `,` separators and an optional `₹`
/// prefix (`"15,00,000"`, `"1500000.50"`, `"₹ 7,00,000"`). Only numeric,
/// strictly positive values are accepted; anything else means no result is
/// shown.
pub fn parse_income(s: &str) -> Result<Decimal, IncomeInputError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(IncomeInputError::Empty);
    }

    let income: Decimal = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid income: {}", e);
        IncomeInputError::NotNumeric(s.trim().to_string())
    })?;

    if income <= Decimal::ZERO {
        return Err(IncomeInputError::NotPositive(income));
    }
    Ok(income)
}

/// Formats an amount as Indian rupees with no fraction digits, e.g.
/// `₹12,34,567` or `-₹500`.
///
/// Uses en-IN grouping: the last three digits, then groups of two.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().normalize().to_string();
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}₹{}", group_indian(&digits))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Formats a percentage value with a fixed number of decimals, e.g. `6.50%`.
pub fn format_percent(
    value: Decimal,
    decimals: u32,
) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}%", prec = decimals as usize)
}

/// Formats a rate stored as a fraction (`0.04`) as a whole percentage (`4%`).
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
