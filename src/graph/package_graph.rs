//! Package dependency graph built from `go list` records + petgraph
//!
//! ## Graph Structure
//!
//! - **Nodes**: One `PackageNode` per import path (last record wins)
//! - **Edges**: `A → B` means "A imports B", labelled by the kind of import
//! - **Index**: O(1) lookup by import path
//! - **Targets**: The packages of the module under analysis, in listing order
//!
//! Each node keeps its import lists exactly as listed, including paths that
//! never appeared as records. The petgraph edges only cover imports that
//! resolve to a node and are used for structural queries (cycles).

use crate::core::error::{AffectedResult, ResultExt};
use crate::golist::{ListQuery, PackageRecord, PackageSource};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// How a package pulls in one of its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
  /// Needed to build the package
  Normal,
  /// Needed by the package's own `_test.go` files
  Test,
  /// Needed by the package's external `_test` package
  XTest,
}

impl ImportKind {
  pub fn is_test(self) -> bool {
    !matches!(self, ImportKind::Normal)
  }
}

/// A package node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
  pub import_path: String,
  /// Owning module, absent for standard library packages
  pub module: Option<String>,
  pub imports: Vec<String>,
  pub test_imports: Vec<String>,
  pub xtest_imports: Vec<String>,
  /// Standard library package
  #[allow(dead_code)]
  pub is_standard: bool,
}

impl From<PackageRecord> for PackageNode {
  fn from(record: PackageRecord) -> Self {
    let module = record.module_path().map(str::to_string);
    Self {
      module,
      import_path: record.import_path,
      imports: record.imports,
      test_imports: record.test_imports,
      xtest_imports: record.xtest_imports,
      is_standard: record.standard,
    }
  }
}

impl PackageNode {
  /// Direct dependencies in listed order: imports first, then (optionally)
  /// test imports and external test imports.
  pub fn dependencies(&self, include_tests: bool) -> impl Iterator<Item = &str> {
    let tests = if include_tests {
      Some(self.test_imports.iter().chain(self.xtest_imports.iter()))
    } else {
      None
    };

    self
      .imports
      .iter()
      .chain(tests.into_iter().flatten())
      .map(String::as_str)
  }

  /// Whether this package belongs to `module`
  pub fn in_module(&self, module: &str) -> bool {
    self.module.as_deref() == Some(module)
  }
}

/// Package dependency graph.
pub struct PackageGraph {
  /// Nodes: PackageNode, edges: ImportKind
  graph: DiGraph<PackageNode, ImportKind>,

  /// Index: import path → node index
  path_to_node: HashMap<String, NodeIndex>,

  /// Target packages in listing order (first occurrence wins)
  targets: Vec<String>,

  /// Membership index for `targets`
  target_set: HashSet<String>,
}

impl PackageGraph {
  /// Load the target list and the full graph from a package source.
  ///
  /// Runs the two queries sequentially: targets first, then the transitive
  /// graph (with test dependencies when `include_tests` is set).
  pub fn load(source: &dyn PackageSource, include_tests: bool) -> AffectedResult<Self> {
    let mut targets = Vec::new();
    source
      .for_each_package(ListQuery::Targets, &mut |record| targets.push(record.import_path))
      .context("Failed to list packages")?;

    let mut records = Vec::new();
    source
      .for_each_package(ListQuery::Graph { include_tests }, &mut |record| records.push(record))
      .context("Failed to load the dependency graph")?;

    Ok(Self::from_records(targets, records))
  }

  /// Build a graph from target import paths and package records.
  pub fn from_records(targets: impl IntoIterator<Item = String>, records: impl IntoIterator<Item = PackageRecord>) -> Self {
    let mut graph = DiGraph::new();
    let mut path_to_node: HashMap<String, NodeIndex> = HashMap::new();

    for record in records {
      let node = PackageNode::from(record);
      match path_to_node.get(&node.import_path) {
        Some(&idx) => {
          tracing::debug!("duplicate record for {}, keeping the later one", node.import_path);
          graph[idx] = node;
        }
        None => {
          let path = node.import_path.clone();
          let idx = graph.add_node(node);
          path_to_node.insert(path, idx);
        }
      }
    }

    // Edges are added once all records are in, so replaced records leave no stale edges
    let mut edges = Vec::new();
    for from_idx in graph.node_indices() {
      let node = &graph[from_idx];
      let kinds = [
        (ImportKind::Normal, &node.imports),
        (ImportKind::Test, &node.test_imports),
        (ImportKind::XTest, &node.xtest_imports),
      ];
      for (kind, paths) in kinds {
        for path in paths {
          if let Some(&to_idx) = path_to_node.get(path) {
            edges.push((from_idx, to_idx, kind));
          }
        }
      }
    }
    for (from_idx, to_idx, kind) in edges {
      graph.add_edge(from_idx, to_idx, kind);
    }

    let mut target_set = HashSet::new();
    let mut ordered_targets = Vec::new();
    for target in targets {
      if target_set.insert(target.clone()) {
        ordered_targets.push(target);
      }
    }

    for target in &ordered_targets {
      if !path_to_node.contains_key(target) {
        tracing::warn!("target package {} is missing from the dependency graph", target);
      }
    }

    let package_graph = Self {
      graph,
      path_to_node,
      targets: ordered_targets,
      target_set,
    };

    tracing::debug!(
      "package graph: {} packages, {} resolved imports, {} targets",
      package_graph.package_count(),
      package_graph.graph.edge_count(),
      package_graph.targets.len()
    );
    package_graph
  }

  /// Look up a package by import path.
  pub fn package(&self, import_path: &str) -> Option<&PackageNode> {
    self.path_to_node.get(import_path).map(|&idx| &self.graph[idx])
  }

  /// Target packages in listing order.
  pub fn targets(&self) -> &[String] {
    &self.targets
  }

  /// Whether `import_path` is one of the packages under analysis.
  pub fn is_target(&self, import_path: &str) -> bool {
    self.target_set.contains(import_path)
  }

  /// Number of packages in the graph.
  pub fn package_count(&self) -> usize {
    self.graph.node_count()
  }

  /// Direct dependencies of a package as listed; empty if it is not in the graph.
  pub fn direct_imports(&self, import_path: &str, include_tests: bool) -> impl Iterator<Item = &str> {
    self
      .package(import_path)
      .into_iter()
      .flat_map(move |node| node.dependencies(include_tests))
  }

  /// Import cycles as traversed by reachability, using Tarjan's SCC algorithm.
  ///
  /// Considers normal imports everywhere, plus test imports out of target
  /// packages when `include_tests` is set. Returns components with more than one
  /// package (or a package importing itself), each sorted.
  pub fn import_cycles(&self, include_tests: bool) -> Vec<Vec<String>> {
    let followed = self.graph.filter_map(
      |_, node| Some(node.import_path.as_str()),
      |edge, kind| {
        let (from, _) = self.graph.edge_endpoints(edge)?;
        let follow = !kind.is_test() || (include_tests && self.is_target(&self.graph[from].import_path));
        follow.then_some(())
      },
    );

    let mut cycles: Vec<Vec<String>> = algo::tarjan_scc(&followed)
      .into_iter()
      .filter(|component| component.len() > 1 || followed.contains_edge(component[0], component[0]))
      .map(|component| {
        let mut paths: Vec<String> = component.into_iter().map(|idx| followed[idx].to_string()).collect();
        paths.sort();
        paths
      })
      .collect();

    cycles.sort();
    cycles
  }
}
