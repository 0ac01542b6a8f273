//! CLI commands for affectedpkgs
//!
//! - **affected**: List the module's packages that depend on a given module

pub mod affected;

pub use affected::{OutputFormat, Outcome, run_affected};
