//! CLI command handlers for InteriorRec.
//!
//! Headless access to the design backend and configuration, plus the
//! `serve` entry point for the web API.

pub mod common;
pub mod config;
pub mod generate;
#[cfg(feature = "web")]
pub mod serve;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use generate::{GenerateArgs, OpeningArg};
#[cfg(feature = "web")]
pub use serve::ServeArgs;
