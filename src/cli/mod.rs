//! Command-line interface for Nomiko.

mod commands;
pub mod helpers;
pub mod icons;

pub use commands::{is_verbose, run};
