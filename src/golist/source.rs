//! Package sources: where package records come from
//!
//! The graph never talks to `go` directly. It asks a [`PackageSource`] for a
//! stream of records, so the algorithms can run against in-memory graphs in
//! tests and against `go list` in production.

use super::record::PackageRecord;
use crate::core::error::{AffectedError, AffectedResult, ToolError};
use std::io::{BufReader, Read};

/// Which package listing to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListQuery {
  /// Packages of the module under analysis only (no deps, no tests)
  Targets,

  /// Every package in the transitive dependency graph
  Graph { include_tests: bool },
}

/// Producer of package records.
///
/// Records are handed to `visit` one at a time, in the order the source
/// produces them.
pub trait PackageSource {
  fn for_each_package(&self, query: ListQuery, visit: &mut dyn FnMut(PackageRecord)) -> AffectedResult<()>;
}

/// Decode a concatenated stream of JSON package objects.
///
/// Returns the number of records decoded. A malformed or truncated stream is
/// an error; whitespace between and after objects is accepted.
pub fn decode_stream<R: Read>(
  reader: R,
  command: &str,
  visit: &mut dyn FnMut(PackageRecord),
) -> AffectedResult<usize> {
  let stream = serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter::<PackageRecord>();

  let mut count = 0;
  for record in stream {
    let record = record.map_err(|e| {
      let reason = if e.is_io() {
        format!("read error: {}", e)
      } else {
        format!("record {}: {}", count + 1, e)
      };
      AffectedError::Tool(ToolError::Decode {
        command: command.to_string(),
        reason,
      })
    })?;
    visit(record);
    count += 1;
  }

  Ok(count)
}

/// In-memory source for tests.
#[cfg(test)]
pub struct MemorySource {
  pub targets: Vec<PackageRecord>,
  pub packages: Vec<PackageRecord>,
  pub queries: std::cell::RefCell<Vec<ListQuery>>,
}

#[cfg(test)]
impl MemorySource {
  pub fn new(targets: &[&str], packages: Vec<PackageRecord>) -> Self {
    Self {
      targets: targets
        .iter()
        .map(|path| PackageRecord {
          import_path: path.to_string(),
          ..Default::default()
        })
        .collect(),
      packages,
      queries: std::cell::RefCell::new(Vec::new()),
    }
  }
}

#[cfg(test)]
impl PackageSource for MemorySource {
  fn for_each_package(&self, query: ListQuery, visit: &mut dyn FnMut(PackageRecord)) -> AffectedResult<()> {
    self.queries.borrow_mut().push(query);
    let records = match query {
      ListQuery::Targets => &self.targets,
      ListQuery::Graph { .. } => &self.packages,
    };
    for record in records {
      visit(record.clone());
    }
    Ok(())
  }
}
