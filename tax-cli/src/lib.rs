pub mod app;
pub mod config;
pub mod logging;
pub mod render;
pub mod state;
pub mod utils;

pub use app::{OutputFormat, build_regimes, run_interactive, run_once};
pub use state::{AppState, Regimes};
