//! Logtrim CLI library.
//!
//! - `args` - Command-line argument parsing and policy validation
//! - `report` - Text and JSON rendering of a plan
//! - `run` - Orchestration of a single retention pass

pub mod args;
pub mod report;
pub mod run;

pub use args::{Cli, LOG_LEVEL_ENV, LogLevel};
