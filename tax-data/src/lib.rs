//! Loading regime bracket tables from CSV.

mod loader;

pub use loader::{BracketLoaderError, BracketRecord, BracketTableLoader, BracketTables};
