pub mod calculations;
pub mod models;

pub use calculations::{CalculationError, RegimeCalculator, RegimeComparison};
pub use models::*;
