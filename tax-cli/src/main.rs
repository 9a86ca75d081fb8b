use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_cli::{OutputFormat, build_regimes, logging, run_interactive, run_once};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare income tax under the 2024 (old) and 2025 (new) regimes.
///
/// With an INCOME argument the comparison is printed once. Without it,
/// incomes are read line by line from stdin and each one is re-rendered.
#[derive(Debug, Parser)]
#[command(name = "tax-cli", version)]
struct Cli {
    /// Annual gross income in rupees, e.g. `1500000` or `15,00,000`.
    #[arg(allow_hyphen_values = true)]
    income: Option<String>,

    /// Read incomes from stdin even when INCOME is given.
    #[arg(short, long)]
    interactive: bool,

    /// Apply the statutory surcharge with marginal relief to both regimes.
    #[arg(short, long)]
    surcharge: bool,

    /// TOML file with regime overrides.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV file with bracket tables (`regime,min_income,max_income,rate`).
    #[arg(short, long, value_name = "FILE")]
    brackets: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log filter, e.g. `debug` or `tax_core=trace`. Overrides RUST_LOG.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())
        .context("initializing logging")?;

    let regimes = build_regimes(cli.config.as_deref(), cli.brackets.as_deref(), cli.surcharge)?;

    let mut stdout = io::stdout().lock();
    if let Some(income) = &cli.income {
        run_once(income, &regimes, cli.format, &mut stdout)?;
        if !cli.interactive {
            return Ok(());
        }
    }

    debug!(tty = io::stdin().is_terminal(), "reading incomes from stdin");
    run_interactive(io::stdin().lock(), &regimes, cli.format, &mut stdout)
}
