//! `affectedpkgs <module>` - List the packages affected by a module
//!
//! Loads the package graph of the module in the working directory, finds the
//! packages that transitively import the given module and prints them in
//! `go list` order, one per line or as a JSON array.

use crate::core::config::{AffectedConfig, PROGRAM_ENV};
use crate::core::error::{AffectedResult, ResultExt};
use crate::golist::{GoList, PackageSource};
use crate::graph::{AffectedQuery, PackageGraph, affected};
use std::io::Write;
use std::path::Path;

/// Output format for the package list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  /// One import path per line
  Text,
  /// A single JSON array of strings
  Json,
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// At least one package is affected; the list was printed
  Affected,
  /// No package depends on the module; nothing was printed
  NothingAffected,
}

/// Run the affected command against `go list` in `dir`
pub fn run_affected(dir: &Path, query: AffectedQuery, format: OutputFormat) -> AffectedResult<Outcome> {
  let config = AffectedConfig::load(dir)?.apply_env(std::env::var(PROGRAM_ENV).ok());
  let source = GoList::new(dir, &config.tool);

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  run_with_source(&source, &query, format, &mut out)
}

/// Run the affected command against any package source, writing to `out`
pub fn run_with_source(
  source: &dyn PackageSource,
  query: &AffectedQuery,
  format: OutputFormat,
  out: &mut dyn Write,
) -> AffectedResult<Outcome> {
  let graph = PackageGraph::load(source, query.include_tests)?;
  let analysis = affected::analyze(&graph, query);

  if analysis.is_empty() {
    tracing::debug!("no package depends on {}", query.target_module);
    return Ok(Outcome::NothingAffected);
  }

  write_packages(out, analysis.packages(), format)?;
  Ok(Outcome::Affected)
}

/// Write the package list in the requested format
fn write_packages(out: &mut dyn Write, packages: &[String], format: OutputFormat) -> AffectedResult<()> {
  match format {
    OutputFormat::Text => {
      for package in packages {
        writeln!(out, "{}", package)?;
      }
    }
    OutputFormat::Json => {
      serde_json::to_writer(&mut *out, packages).context("Failed to encode JSON output")?;
      writeln!(out)?;
    }
  }

  out.flush()?;
  Ok(())
}
