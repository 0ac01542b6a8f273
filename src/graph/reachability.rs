//! Memoized reachability: does a package transitively import a module?
//!
//! Depth-first search over the package graph with a per-node tri-state memo.
//! A node is `InProgress` while its dependencies are being explored; meeting it
//! again during that exploration (an import cycle) answers `false`. Once its
//! exploration finishes the node is `Resolved` and the answer is reused.
//!
//! The memo belongs to one `Reachability` value and dies with it, so separate
//! queries never share state.

use super::package_graph::PackageGraph;
use std::collections::HashMap;

/// Memo state of a visited package (absent = unvisited).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
  InProgress,
  Resolved(bool),
}

/// Reachability engine for one target module.
pub struct Reachability<'g> {
  graph: &'g PackageGraph,
  target_module: &'g str,
  include_tests: bool,
  memo: HashMap<&'g str, Visit>,
}

impl<'g> Reachability<'g> {
  /// `include_tests` follows test imports, but only out of target packages.
  pub fn new(graph: &'g PackageGraph, target_module: &'g str, include_tests: bool) -> Self {
    Self {
      graph,
      target_module,
      include_tests,
      memo: HashMap::new(),
    }
  }

  /// Whether `import_path` transitively imports a package of the target module.
  ///
  /// Packages missing from the graph (typically the standard library) never
  /// reach the target.
  pub fn reaches(&mut self, import_path: &'g str) -> bool {
    match self.memo.get(import_path) {
      Some(Visit::Resolved(reached)) => return *reached,
      Some(Visit::InProgress) => return false,
      None => {}
    }

    let graph = self.graph;
    let Some(node) = graph.package(import_path) else {
      return self.resolve(import_path, false);
    };

    if node.in_module(self.target_module) {
      return self.resolve(import_path, true);
    }

    // A dependency's own tests are not built when its importers are
    let follow_tests = self.include_tests && graph.is_target(import_path);

    self.memo.insert(import_path, Visit::InProgress);
    let reached = node.dependencies(follow_tests).any(|dep| self.reaches(dep));
    self.resolve(import_path, reached)
  }

  /// Memo state of a package, None if never visited.
  #[cfg(test)]
  pub fn state(&self, import_path: &str) -> Option<Visit> {
    self.memo.get(import_path).copied()
  }

  /// Number of packages visited so far.
  pub fn visited(&self) -> usize {
    self.memo.len()
  }

  fn resolve(&mut self, import_path: &'g str, reached: bool) -> bool {
    self.memo.insert(import_path, Visit::Resolved(reached));
    reached
  }
}
