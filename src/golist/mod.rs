//! Go package introspection
//!
//! - **record**: `go list -json` package objects
//! - **source**: The `PackageSource` seam and the streaming record decoder
//! - **command**: `go list` subprocess backend

pub mod command;
pub mod record;
pub mod source;

pub use command::GoList;
pub use record::PackageRecord;
pub use source::{ListQuery, PackageSource};
