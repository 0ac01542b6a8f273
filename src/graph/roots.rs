//! Root reduction of an affected set
//!
//! A root is an affected package that no other affected package imports
//! directly. Only direct edges count: if A imports B and B imports C, all three
//! affected, then B and C are both dropped and A is the only root.
//!
//! Every affected package is under build/test consideration, so with
//! `include_tests` the test imports of every member count as edges.

use super::package_graph::PackageGraph;
use std::collections::HashSet;

/// Affected packages not imported by another affected package, in input order.
///
/// Members of an import cycle contained in the affected set import each other,
/// so none of them is a root.
pub fn root_packages(graph: &PackageGraph, affected: &[String], include_tests: bool) -> Vec<String> {
  let affected_set: HashSet<&str> = affected.iter().map(String::as_str).collect();

  let mut imported: HashSet<&str> = HashSet::new();
  for package in affected {
    for dep in graph.direct_imports(package, include_tests) {
      if affected_set.contains(dep) {
        imported.insert(dep);
      }
    }
  }

  affected
    .iter()
    .filter(|package| !imported.contains(package.as_str()))
    .cloned()
    .collect()
}
