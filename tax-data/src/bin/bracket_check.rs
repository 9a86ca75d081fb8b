use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tax_core::{RegimeCalculator, SurchargePolicy, TaxRegime};
use tax_data::BracketTableLoader;
use tracing_subscriber::EnvFilter;

/// Check a bracket table CSV file against the regime presets.
///
/// The CSV file should have the following columns:
/// - regime: old, new, 2024 or 2025
/// - min_income: The lower bound of the slab
/// - max_income: The upper bound (empty for unbounded)
/// - rate: The marginal tax rate as a decimal (e.g., 0.05)
#[derive(Parser, Debug)]
#[command(name = "bracket-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket tables
    #[arg(short, long)]
    file: PathBuf,

    /// Also validate each table with the statutory surcharge attached
    #[arg(short, long, default_value_t = false)]
    surcharge: bool,

    /// Print the final tax each loaded regime charges on this income
    #[arg(short, long)]
    income: Option<Decimal>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("Checking bracket tables in: {}", args.file.display());

    let tables = BracketTableLoader::load_file(&args.file)
        .with_context(|| format!("Failed to load: {}", args.file.display()))?;

    if tables.is_empty() {
        println!("No bracket rows found.");
        return Ok(());
    }

    for (id, brackets) in &tables {
        let mut regime = BracketTableLoader::apply(&tables, TaxRegime::preset(*id));
        if args.surcharge {
            regime = regime.with_surcharge(SurchargePolicy::statutory());
        }
        regime
            .validate()
            .with_context(|| format!("{} regime rejected with preset parameters", id))?;

        println!("{} ({} slabs)", id.title(), brackets.len());
        for bracket in brackets {
            println!("  {:<16} @ {}", bracket.label(), bracket.rate_label());
        }

        if let Some(income) = args.income.filter(|income| *income > Decimal::ZERO) {
            let result = RegimeCalculator::new(&regime).calculate(income)?;
            println!("  final tax on {}: {}", income, result.total_tax);
        }
    }

    println!("All {} tables are valid.", tables.len());

    Ok(())
}
