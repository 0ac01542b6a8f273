//! Core building blocks shared by every part of affectedpkgs
//!
//! - **config**: affectedpkgs.toml parsing and validation
//! - **error**: Error types with contextual help messages and exit codes

pub mod config;
pub mod error;
