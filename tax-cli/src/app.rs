use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use tax_core::{RegimeComparison, RegimeId};
use tax_data::BracketTableLoader;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::logging;
use crate::render::{render_json, render_text};
use crate::state::{AppState, Regimes};
use crate::utils::parse_income;

/// How a comparison is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub const PROMPT: &str = "Annual income (₹): ";

/// Builds both regimes from the optional config file and bracket tables.
pub fn build_regimes(
    config_path: Option<&Path>,
    brackets_path: Option<&Path>,
    surcharge: bool,
) -> anyhow::Result<Regimes> {
    let config = match config_path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let tables = brackets_path
        .map(|path| {
            BracketTableLoader::load_file(path)
                .with_context(|| format!("loading bracket tables {}", path.display()))
        })
        .transpose()?;

    let old = config.regime(RegimeId::Old, tables.as_ref(), surcharge)?;
    let new = config.regime(RegimeId::New, tables.as_ref(), surcharge)?;
    debug!(
        old_surcharge = old.surcharge.is_some(),
        new_surcharge = new.surcharge.is_some(),
        "regimes ready"
    );
    Ok(Regimes { old, new })
}

pub fn render(
    comparison: &RegimeComparison,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(comparison)),
        OutputFormat::Json => {
            let mut json = render_json(comparison).context("serializing comparison")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Computes and prints the comparison for a single income entry.
///
/// A rejected entry writes nothing to `out` and is returned as an error.
pub fn run_once<W: Write>(
    input: &str,
    regimes: &Regimes,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let income = parse_income(input)?;
    let comparison = regimes.compare(income)?;
    info!(%income, preferred = %comparison.preferred, "compared regimes");

    out.write_all(render(&comparison, format)?.as_bytes())?;
    Ok(())
}

/// Line-oriented shell: every line replaces the income and re-renders.
///
/// `quit` or `exit` (or end of input) stops, `clear` resets the entry and
/// `log <level>` changes the log filter. A rejected entry prints nothing.
pub fn run_interactive<R: BufRead, W: Write>(
    input: R,
    regimes: &Regimes,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut state = AppState::new();

    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("reading income")?;
        let entry = line.trim();

        match entry {
            "quit" | "exit" => break,
            "clear" => state.clear(),
            _ => {
                if let Some(level) = entry.strip_prefix("log ") {
                    if let Err(error) = logging::set_log_level(level.trim()) {
                        warn!(%error, "log level unchanged");
                    }
                } else if let Some(comparison) = state.update(entry, regimes)? {
                    out.write_all(render(comparison, format)?.as_bytes())?;
                }
            }
        }

        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}
