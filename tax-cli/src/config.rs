//! TOML configuration for regime parameters.
//!
//! Every value is optional; anything left out falls back to the built-in
//! 2024 and 2025 presets.
//!
//! ```toml
//! # Attach the surcharge policy to both regimes
//! surcharge = true
//!
//! [old]
//! standard_deduction = 50000
//! rebate_threshold = 500000
//!
//! [new]
//! cess_rate = 0.04
//! brackets = [
//!     { min_income = 0, max_income = 400000, tax_rate = 0 },
//!     { min_income = 400000, tax_rate = 0.10 },
//! ]
//! surcharge_tiers = [
//!     { threshold = 5000000, rate = 0.10 },
//!     { threshold = 10000000, rate = 0.15 },
//!     { threshold = 20000000, rate = 0.25 },
//! ]
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{RegimeError, RegimeId, SurchargePolicy, SurchargeTier, TaxBracket, TaxRegime};
use tax_data::{BracketTableLoader, BracketTables};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading or applying the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{regime} regime is invalid: {source}")]
    InvalidRegime {
        regime: RegimeId,
        #[source]
        source: RegimeError,
    },
}

/// Overrides for one regime's parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegimeOverrides {
    pub standard_deduction: Option<Decimal>,
    pub rebate_threshold: Option<Decimal>,
    pub cess_rate: Option<Decimal>,
    pub brackets: Option<Vec<TaxBracket>>,
    pub surcharge_tiers: Option<Vec<SurchargeTier>>,
}

impl RegimeOverrides {
    fn apply(
        &self,
        mut regime: TaxRegime,
    ) -> TaxRegime {
        if let Some(amount) = self.standard_deduction {
            regime.standard_deduction = amount;
        }
        if let Some(amount) = self.rebate_threshold {
            regime.rebate_threshold = amount;
        }
        if let Some(rate) = self.cess_rate {
            regime.cess_rate = rate;
        }
        if let Some(brackets) = &self.brackets {
            regime.brackets = brackets.clone();
        }
        regime
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Attach a surcharge policy to both regimes.
    #[serde(default)]
    pub surcharge: bool,
    #[serde(default)]
    pub old: RegimeOverrides,
    #[serde(default)]
    pub new: RegimeOverrides,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), surcharge = config.surcharge, "loaded config");
        Ok(config)
    }

    pub fn overrides(
        &self,
        id: RegimeId,
    ) -> &RegimeOverrides {
        match id {
            RegimeId::Old => &self.old,
            RegimeId::New => &self.new,
        }
    }

    /// Builds the validated parameters for `id`.
    ///
    /// Layers, lowest first: preset, bracket tables from CSV, this file.
    /// `force_surcharge` turns the surcharge on even when the file does not.
    pub fn regime(
        &self,
        id: RegimeId,
        tables: Option<&BracketTables>,
        force_surcharge: bool,
    ) -> Result<TaxRegime, ConfigError> {
        let overrides = self.overrides(id);

        let mut regime = TaxRegime::preset(id);
        if let Some(tables) = tables {
            regime = BracketTableLoader::apply(tables, regime);
        }
        regime = overrides.apply(regime);

        if self.surcharge || force_surcharge {
            let policy = overrides
                .surcharge_tiers
                .clone()
                .map(SurchargePolicy::new)
                .unwrap_or_else(SurchargePolicy::statutory);
            regime = regime.with_surcharge(policy);
        }

        regime
            .validate()
            .map_err(|source| ConfigError::InvalidRegime { regime: id, source })?;
        Ok(regime)
    }
}
