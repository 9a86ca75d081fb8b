//! Plain-text and JSON rendering of a [`RegimeComparison`].

use rust_decimal::Decimal;
use tax_core::{RegimeComparison, RegimeId, TaxResult};

use crate::utils::{format_inr, format_percent, format_rate};

pub const TITLE: &str = "Income Tax Calculator (2024 vs 2025)";

const LABEL_WIDTH: usize = 34;
const VALUE_WIDTH: usize = 16;

fn row(
    label: &str,
    value: &str,
) -> String {
    format!("  {label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$}")
}

fn deduction(amount: Decimal) -> String {
    format!("-{}", format_inr(amount))
}

fn rule() -> String {
    "-".repeat(LABEL_WIDTH + VALUE_WIDTH + 2)
}

/// The savings card shown above the two panels.
fn savings_lines(comparison: &RegimeComparison) -> Vec<String> {
    let arrow = if comparison.savings >= Decimal::ZERO {
        '↓'
    } else {
        '↑'
    };
    let mut lines = vec![
        format!(
            "Tax Savings in 2025  {arrow} {}",
            format_inr(comparison.savings.abs())
        ),
        "Compared to 2024 regime".to_string(),
    ];

    if let Some(percent) = comparison.savings_percent {
        let shown = format_percent(percent.abs(), 1);
        if percent >= Decimal::ZERO {
            lines.push(format!("You save {shown} on your tax payment"));
        } else {
            lines.push(format!("Tax payment increases by {shown}"));
        }
    }
    lines
}

fn panel_lines(
    result: &TaxResult,
    preferred: bool,
) -> Vec<String> {
    let heading = if preferred {
        format!("{} (lower tax)", result.regime.title())
    } else {
        result.regime.title().to_string()
    };

    let mut lines = vec![heading, rule()];
    lines.push(row("Gross Income", &format_inr(result.gross_income)));
    lines.push(row("Standard Deduction", &deduction(result.standard_deduction)));
    lines.push(row("Taxable Income", &format_inr(result.taxable_income)));

    for slab in result.taxed_slabs() {
        lines.push(row(
            &format!("{} @ {}", slab.label, slab.rate_label),
            &format_inr(slab.tax),
        ));
    }

    if result.has_rebate() {
        lines.push(row("Initial Tax", &format_inr(result.tax_before_rebate)));
        lines.push(row("Tax Rebate", &deduction(result.rebate)));
    }

    if result.has_surcharge() {
        lines.push(row(
            &format!("Surcharge @ {}", format_rate(result.surcharge_rate)),
            &format_inr(result.gross_surcharge),
        ));
        if result.marginal_relief > Decimal::ZERO {
            lines.push(row("Marginal Relief", &deduction(result.marginal_relief)));
        }
    }

    lines.push(row("Tax before Cess", &format_inr(result.tax_before_cess())));
    lines.push(row(
        &format!("Health & Education Cess @ {}", format_rate(result.cess_rate)),
        &format_inr(result.cess),
    ));
    lines.push(rule());
    lines.push(row("Final Tax", &format_inr(result.total_tax)));
    lines.push(row("Take Home", &format_inr(result.take_home)));
    lines.push(row(
        "Effective Tax Rate",
        &format_percent(result.effective_rate, 2),
    ));
    lines
}

/// Renders the savings summary followed by one panel per regime.
pub fn render_text(comparison: &RegimeComparison) -> String {
    let mut lines = vec![
        TITLE.to_string(),
        format!("Annual income: {}", format_inr(comparison.gross_income)),
        String::new(),
    ];
    lines.extend(savings_lines(comparison));

    for &id in RegimeId::all() {
        lines.push(String::new());
        lines.extend(panel_lines(
            comparison.result(id),
            comparison.preferred == id,
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_json(comparison: &RegimeComparison) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::{SurchargePolicy, TaxRegime};

    fn compare(income: Decimal) -> RegimeComparison {
        RegimeComparison::compare(income, &TaxRegime::old_2024(), &TaxRegime::new_2025()).unwrap()
    }

    fn compare_extended(income: Decimal) -> RegimeComparison {
        RegimeComparison::compare(
            income,
            &TaxRegime::old_2024().with_surcharge(SurchargePolicy::statutory()),
            &TaxRegime::new_2025().with_surcharge(SurchargePolicy::statutory()),
        )
        .unwrap()
    }

    // ── row ──────────────────────────────────────────────────────────────────

    #[test]
    fn row_pads_label_and_right_aligns_value() {
        let line = row("Final Tax", "₹97,500");

        assert!(line.starts_with("  Final Tax "));
        assert!(line.ends_with(" ₹97,500"));
        assert_eq!(line.chars().count(), 2 + LABEL_WIDTH + VALUE_WIDTH);
    }

    // ── savings card ─────────────────────────────────────────────────────────

    #[test]
    fn savings_card_when_new_regime_is_cheaper() {
        let lines = savings_lines(&compare(dec!(1500000)));

        assert_eq!(
            lines,
            vec![
                "Tax Savings in 2025  ↓ ₹36,250".to_string(),
                "Compared to 2024 regime".to_string(),
                "You save 27.9% on your tax payment".to_string(),
            ]
        );
    }

    #[test]
    fn savings_card_omits_percentage_when_old_tax_is_zero() {
        let lines = savings_lines(&compare(dec!(700000)));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Tax Savings in 2025  ↓ ₹0");
    }

    #[test]
    fn savings_card_reports_increase() {
        let mut comparison = compare(dec!(1500000));
        comparison.savings = dec!(-5000);
        comparison.savings_percent = Some(dec!(-3.7));

        let lines = savings_lines(&comparison);

        assert_eq!(lines[0], "Tax Savings in 2025  ↑ ₹5,000");
        assert_eq!(lines[2], "Tax payment increases by 3.7%");
    }

    // ── panels ───────────────────────────────────────────────────────────────

    #[test]
    fn panel_lists_taxed_slabs_and_totals() {
        let text = render_text(&compare(dec!(1500000)));

        assert!(text.starts_with(TITLE));
        assert!(text.contains("2025 Tax Regime (lower tax)"));
        assert!(text.contains("4.0-8.0 lakh @ 5%"));
        assert!(text.contains("8.0-12.0 lakh @ 10%"));
        assert!(text.contains("12.0-16.0 lakh @ 15%"));
        assert!(!text.contains("0.0-4.0 lakh"));
        assert!(text.contains("Health & Education Cess @ 4%"));
        assert!(text.contains(&row("Final Tax", "₹97,500")));
        assert!(text.contains(&row("Final Tax", "₹1,35,200")));
        assert!(!text.contains("Tax Rebate"));
        assert!(!text.contains("Surcharge"));
    }

    #[test]
    fn panel_shows_rebate_lines_when_rebate_applies() {
        let text = render_text(&compare(dec!(1000000)));

        assert!(text.contains(&row("Initial Tax", "₹32,500")));
        assert!(text.contains(&row("Tax Rebate", "-₹32,500")));
    }

    #[test]
    fn panel_shows_surcharge_and_relief_for_extended_regimes() {
        let text = render_text(&compare_extended(dec!(5010000)));

        assert!(text.contains("Surcharge @ 10%"));
        assert!(text.contains("Marginal Relief"));
    }

    #[test]
    fn tie_marks_old_regime_as_preferred() {
        let text = render_text(&compare(dec!(700000)));

        assert!(text.contains("2024 Tax Regime (lower tax)"));
        assert!(!text.contains("2025 Tax Regime (lower tax)"));
    }

    // ── json ─────────────────────────────────────────────────────────────────

    #[test]
    fn json_carries_both_results() {
        let json = render_json(&compare(dec!(1500000))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["preferred"], "new");
        assert_eq!(value["new"]["regime"], "new");
        assert_eq!(value["old"]["regime"], "old");
    }
}
