//! Package graph analysis
//!
//! Built on `go list` records + petgraph. The graph owns the data; the
//! algorithms borrow it.

pub mod affected;
pub mod package_graph;
pub mod reachability;
pub mod roots;

pub use affected::AffectedQuery;
pub use package_graph::PackageGraph;
