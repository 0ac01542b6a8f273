//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::json;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const MODULE: &str = "example.com/test";
pub const LOGRUS: &str = "github.com/sirupsen/logrus";

/// A Go module directory with a fake `go` executable.
///
/// The fake answers `go list` from canned JSON files and logs its arguments,
/// one invocation per line, to `calls.log`.
pub struct FakeModule {
  _root: TempDir,
  pub path: PathBuf,
  bin_dir: PathBuf,
}

impl FakeModule {
  /// Create a module whose `go list` outputs are empty
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("module");
    let bin_dir = root.path().join("bin");
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&bin_dir)?;

    let script = format!(
      r#"#!/bin/sh
dir='{dir}'
echo "$*" >> "$dir/calls.log"
if [ -f "$dir/exit_code" ]; then
  exit "$(cat "$dir/exit_code")"
fi
case " $* " in
  *" -deps "*" -test "*) cat "$dir/graph_test.json" ;;
  *" -deps "*) cat "$dir/graph.json" ;;
  *) cat "$dir/targets.json" ;;
esac
"#,
      dir = bin_dir.display()
    );
    let go = bin_dir.join("go");
    std::fs::write(&go, script)?;
    std::fs::set_permissions(&go, std::fs::Permissions::from_mode(0o755))?;

    let module = Self { _root: root, path, bin_dir };
    module.set_targets(&[])?;
    module.set_graph("")?;
    Ok(module)
  }

  /// The standard scenario: A imports A/lib, A/lib imports logrus, A/tools
  /// only test-imports logrus.
  pub fn scenario() -> Result<Self> {
    let module = Self::new()?;
    module.set_targets(&[MODULE, "example.com/test/lib", "example.com/test/tools"])?;

    let graph = [
      std_package("errors", &[]),
      std_package("fmt", &["errors"]),
      std_package("testing", &["fmt"]),
      package("golang.org/x/sys/unix", "golang.org/x/sys", &["errors"], &[], &[]),
      package(LOGRUS, LOGRUS, &["fmt", "golang.org/x/sys/unix"], &["testing"], &[]),
      package("example.com/test/lib", MODULE, &["fmt", LOGRUS], &[], &["testing"]),
      package(MODULE, MODULE, &["example.com/test/lib", "fmt"], &[], &[]),
      package("example.com/test/tools", MODULE, &["fmt"], &[LOGRUS, "testing"], &[]),
    ];
    module.set_graph(&graph.join("\n"))?;

    // `-test` adds test variants; they are not targets and must not change the result
    let test_graph = [
      graph.join("\n"),
      package(
        "example.com/test/tools [example.com/test/tools.test]",
        MODULE,
        &["fmt", LOGRUS, "testing"],
        &[],
        &[],
      ),
      package("example.com/test/tools.test", MODULE, &["example.com/test/tools [example.com/test/tools.test]"], &[], &[]),
    ];
    module.set_test_graph(&test_graph.join("\n"))?;

    Ok(module)
  }

  /// Output of `go list -json <patterns>`
  pub fn set_targets(&self, targets: &[&str]) -> Result<()> {
    let records: Vec<String> = targets
      .iter()
      .map(|path| pretty(json!({ "ImportPath": path, "Name": "pkg" })))
      .collect();
    std::fs::write(self.bin_dir.join("targets.json"), records.join("\n"))?;
    Ok(())
  }

  /// Output of `go list -json -deps <patterns>`, also used for `-test` unless overridden
  pub fn set_graph(&self, stream: &str) -> Result<()> {
    std::fs::write(self.bin_dir.join("graph.json"), stream)?;
    self.set_test_graph(stream)
  }

  /// Output of `go list -json -deps -test <patterns>`
  pub fn set_test_graph(&self, stream: &str) -> Result<()> {
    std::fs::write(self.bin_dir.join("graph_test.json"), stream)?;
    Ok(())
  }

  /// Make every `go` invocation exit with `code` and print nothing
  pub fn fail_with(&self, code: i32) -> Result<()> {
    std::fs::write(self.bin_dir.join("exit_code"), code.to_string())?;
    Ok(())
  }

  /// Write affectedpkgs.toml into the module directory
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("affectedpkgs.toml"), content)?;
    Ok(())
  }

  /// Argument lines of every `go` invocation so far
  pub fn calls(&self) -> Result<Vec<String>> {
    let log = std::fs::read_to_string(self.bin_dir.join("calls.log")).unwrap_or_default();
    Ok(log.lines().map(String::from).collect())
  }

  pub fn go_path(&self) -> PathBuf {
    self.bin_dir.join("go")
  }

  /// Run affectedpkgs in the module directory with the fake `go`
  pub fn run(&self, args: &[&str]) -> Result<RunOutput> {
    run_affectedpkgs(&self.path, &self.go_path(), args)
  }
}

/// One package record in `go list -json` layout
pub fn package(path: &str, module: &str, imports: &[&str], test_imports: &[&str], xtest_imports: &[&str]) -> String {
  let mut record = json!({
    "ImportPath": path,
    "Module": { "Path": module, "Version": "v1.0.0" },
    "Imports": imports,
  });
  if !test_imports.is_empty() {
    record["TestImports"] = json!(test_imports);
  }
  if !xtest_imports.is_empty() {
    record["XTestImports"] = json!(xtest_imports);
  }
  pretty(record)
}

/// A standard library package record
pub fn std_package(path: &str, imports: &[&str]) -> String {
  pretty(json!({ "ImportPath": path, "Standard": true, "Imports": imports }))
}

fn pretty(value: serde_json::Value) -> String {
  serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Captured result of one affectedpkgs run
pub struct RunOutput {
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl RunOutput {
  pub fn lines(&self) -> Vec<&str> {
    self.stdout.lines().collect()
  }
}

/// Run the affectedpkgs binary without judging its exit status
pub fn run_affectedpkgs(cwd: &Path, go: &Path, args: &[&str]) -> Result<RunOutput> {
  let bin = env!("CARGO_BIN_EXE_affectedpkgs");

  let output = Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env("AFFECTEDPKGS_GO", go)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run affectedpkgs")?;

  Ok(RunOutput {
    code: output.status.code(),
    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
  })
}
