//! Affected package analysis
//!
//! Given the package graph and a target module, determine:
//! - Which target packages transitively import the module (affected)
//! - Optionally, which of those are roots (not imported by another affected package)

use super::package_graph::PackageGraph;
use super::reachability::Reachability;
use super::roots::root_packages;

/// What to ask of the graph.
#[derive(Debug, Clone)]
pub struct AffectedQuery {
  /// Module whose impact is queried
  pub target_module: String,
  /// Follow test imports of target packages
  pub include_tests: bool,
  /// Reduce the result to root packages
  pub roots_only: bool,
}

/// Complete affected analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedAnalysis {
  /// Affected target packages, in target listing order
  pub affected: Vec<String>,

  /// Root reduction of `affected`, when requested
  pub roots: Option<Vec<String>>,
}

impl AffectedAnalysis {
  /// Nothing in the module depends on the target module.
  ///
  /// Looks at the affected set before root reduction: a non-empty set whose
  /// members all import each other still counts as affected.
  pub fn is_empty(&self) -> bool {
    self.affected.is_empty()
  }

  /// The packages to report: the roots if reduced, otherwise every affected package.
  pub fn packages(&self) -> &[String] {
    self.roots.as_deref().unwrap_or(&self.affected)
  }
}

/// Analyze which target packages are affected by the target module.
///
/// Algorithm:
/// 1. Memoized DFS from every target package, in listing order (shared memo)
/// 2. Keep the targets that reach the module
/// 3. Optionally drop those imported by another affected package
pub fn analyze(graph: &PackageGraph, query: &AffectedQuery) -> AffectedAnalysis {
  let mut engine = Reachability::new(graph, &query.target_module, query.include_tests);

  let mut affected = Vec::new();
  for target in graph.targets() {
    if engine.reaches(target) {
      affected.push(target.clone());
    }
  }

  tracing::debug!(
    "{} of {} target packages reach {} ({} packages visited)",
    affected.len(),
    graph.targets().len(),
    query.target_module,
    engine.visited()
  );

  if tracing::enabled!(tracing::Level::DEBUG) {
    for cycle in graph.import_cycles(query.include_tests) {
      tracing::debug!("import cycle: {}", cycle.join(" -> "));
    }
  }

  let roots = query.roots_only.then(|| {
    let roots = root_packages(graph, &affected, query.include_tests);
    tracing::debug!("{} root packages", roots.len());
    roots
  });

  AffectedAnalysis { affected, roots }
}
