//! Package records as emitted by `go list -json`
//!
//! Only the fields the dependency graph needs are decoded; everything else in
//! the (large) `go list` object is skipped by serde.

use serde::Deserialize;

/// One package object from a `go list -json` stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageRecord {
  /// Unique import path (graph key)
  pub import_path: String,

  /// Owning module; absent for standard library and synthetic packages
  #[serde(default)]
  pub module: Option<ModuleRef>,

  /// Imports required to build the package
  #[serde(default)]
  pub imports: Vec<String>,

  /// Imports of the package's in-package `_test.go` files
  #[serde(default)]
  pub test_imports: Vec<String>,

  /// Imports of the package's external (`package foo_test`) test files
  #[serde(default, rename = "XTestImports")]
  pub xtest_imports: Vec<String>,

  /// Part of the Go standard library
  #[serde(default)]
  pub standard: bool,
}

/// The `Module` sub-object of a package record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleRef {
  pub path: String,
}

impl PackageRecord {
  /// Path of the owning module, if any
  pub fn module_path(&self) -> Option<&str> {
    self.module.as_ref().map(|m| m.path.as_str())
  }
}
