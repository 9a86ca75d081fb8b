//! Tax calculation stages for comparing the 2024 and 2025 regimes.
//!
//! Each stage lives in its own module and is a pure function of its inputs;
//! [`RegimeCalculator`] chains them for one regime and [`RegimeComparison`]
//! runs both regimes side by side.

pub mod brackets;
pub mod calculator;
pub mod common;
pub mod comparison;
pub mod rebate;
pub mod surcharge;

pub use brackets::{BracketEvaluation, evaluate_brackets};
pub use calculator::{CalculationError, RegimeCalculator};
pub use comparison::RegimeComparison;
pub use rebate::{RebateOutcome, apply_rebate};
pub use surcharge::{SurchargeOutcome, apply_surcharge, boundary_total};
