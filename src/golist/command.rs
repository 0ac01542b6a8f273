//! `go list` subprocess backend
//!
//! Runs the Go toolchain in the module directory and streams its stdout into
//! the record decoder. One subprocess per query, run to completion.

use super::record::PackageRecord;
use super::source::{ListQuery, PackageSource, decode_stream};
use crate::core::config::ToolConfig;
use crate::core::error::{AffectedError, AffectedResult, ResultExt, ToolError};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Package source backed by `go list -json`
pub struct GoList {
  program: String,
  dir: PathBuf,
  patterns: Vec<String>,
  tags: Vec<String>,
}

impl GoList {
  /// Create a source that runs `tool.program` inside `dir`
  pub fn new(dir: &Path, tool: &ToolConfig) -> Self {
    Self {
      program: tool.program.clone(),
      dir: dir.to_path_buf(),
      patterns: tool.patterns.clone(),
      tags: tool.tags.clone(),
    }
  }

  /// Arguments for a query, without the program name
  pub fn args(&self, query: ListQuery) -> Vec<String> {
    let mut args = vec!["list".to_string(), "-json".to_string()];

    if let ListQuery::Graph { include_tests } = query {
      args.push("-deps".to_string());
      if include_tests {
        args.push("-test".to_string());
      }
    }

    if !self.tags.is_empty() {
      args.push(format!("-tags={}", self.tags.join(",")));
    }

    args.extend(self.patterns.iter().cloned());
    args
  }

  fn command_line(&self, args: &[String]) -> String {
    format!("{} {}", self.program, args.join(" "))
  }
}

impl PackageSource for GoList {
  fn for_each_package(&self, query: ListQuery, visit: &mut dyn FnMut(PackageRecord)) -> AffectedResult<()> {
    let args = self.args(query);
    let command = self.command_line(&args);
    tracing::debug!("running `{}` in {}", command, self.dir.display());

    // stderr is inherited: the child's diagnostics go straight to the user and
    // cannot fill a pipe we are not reading.
    let mut child = Command::new(&self.program)
      .args(&args)
      .current_dir(&self.dir)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::inherit())
      .spawn()
      .map_err(|source| {
        AffectedError::Tool(ToolError::Spawn {
          program: self.program.clone(),
          source,
        })
      })?;

    let Some(stdout) = child.stdout.take() else {
      reap(&mut child);
      return Err(AffectedError::message(format!("No stdout pipe for `{}`", command)));
    };

    let decoded = decode_stream(stdout, &command, visit);
    if decoded.is_err() {
      reap(&mut child);
    }

    let status = child
      .wait()
      .with_context(|| format!("Failed to wait for `{}`", command))?;
    let count = decoded?;

    if !status.success() {
      return Err(AffectedError::Tool(ToolError::CommandFailed {
        command,
        status: status.to_string(),
      }));
    }

    tracing::debug!("`{}` produced {} package records", command, count);
    Ok(())
  }
}

/// Stop a child whose output is no longer wanted. Already failing, so the
/// kill and wait results add nothing.
fn reap(child: &mut Child) {
  let _ = child.kill();
  let _ = child.wait();
}
