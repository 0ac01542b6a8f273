//! Error types for affectedpkgs with contextual messages and exit codes
//!
//! Every failure is fatal and surfaces at the top level. Errors are grouped by
//! where they come from so `main` can print a helpful hint and pick an exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for affectedpkgs
///
/// Success (0) is not an error and has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Tool, decode, config or output failure, and the "nothing affected" outcome
  Failure = 1,
  /// Invalid invocation
  Usage = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for affectedpkgs
#[derive(Debug)]
pub enum AffectedError {
  /// Configuration errors
  Config(ConfigError),

  /// Package introspection tool errors (`go list`)
  Tool(ToolError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl AffectedError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    AffectedError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  ///
  /// Structured errors are converted into a message so the context is never lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      AffectedError::Message { message, context, help } => AffectedError::Message {
        message: ctx_str,
        context: Some(context.map(|c| format!("{}\n{}", message, c)).unwrap_or(message)),
        help,
      },
      other => {
        let help = other.help_message();
        AffectedError::Message {
          message: ctx_str,
          context: Some(other.to_string()),
          help,
        }
      }
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      AffectedError::Config(_) | AffectedError::Tool(_) | AffectedError::Io(_) | AffectedError::Message { .. } => {
        ExitCode::Failure
      }
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      AffectedError::Config(e) => e.help_message(),
      AffectedError::Tool(e) => e.help_message(),
      AffectedError::Message { help, .. } => help.clone(),
      AffectedError::Io(_) => None,
    }
  }
}

impl fmt::Display for AffectedError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AffectedError::Config(e) => write!(f, "{}", e),
      AffectedError::Tool(e) => write!(f, "{}", e),
      AffectedError::Io(e) => write!(f, "I/O error: {}", e),
      AffectedError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for AffectedError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      AffectedError::Io(e) => Some(e),
      AffectedError::Tool(ToolError::Spawn { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for AffectedError {
  fn from(err: io::Error) -> Self {
    AffectedError::Io(err)
  }
}

impl From<String> for AffectedError {
  fn from(msg: String) -> Self {
    AffectedError::message(msg)
  }
}

impl From<&str> for AffectedError {
  fn from(msg: &str) -> Self {
    AffectedError::message(msg)
  }
}

impl From<serde_json::Error> for AffectedError {
  fn from(err: serde_json::Error) -> Self {
    AffectedError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for AffectedError {
  fn from(err: toml_edit::de::Error) -> Self {
    AffectedError::message(format!("TOML deserialization error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field holds a value we cannot use
  InvalidField { path: PathBuf, field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidField { field, .. } => Some(format!(
        "Fix or remove `{}`; every setting in affectedpkgs.toml is optional.",
        field
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidField { path, field, reason } => {
        write!(f, "Invalid `{}` in {}: {}", field, path.display(), reason)
      }
    }
  }
}

/// Package introspection tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The tool could not be started
  Spawn { program: String, source: io::Error },

  /// The tool ran but exited unsuccessfully
  CommandFailed { command: String, status: String },

  /// The tool's output is not a valid stream of package records
  Decode { command: String, reason: String },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => Some(
        "Install the Go toolchain, or point AFFECTEDPKGS_GO (or `tool.program` in affectedpkgs.toml) at it."
          .to_string(),
      ),
      ToolError::CommandFailed { command, .. } => Some(format!(
        "Run `{}` from the module root to see the full diagnostics.",
        command
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { program, source } => {
        write!(f, "Failed to run `{}`: {}", program, source)
      }
      ToolError::CommandFailed { command, status } => {
        write!(f, "Command failed: {} ({})", command, status)
      }
      ToolError::Decode { command, reason } => {
        write!(f, "Failed to decode output of `{}`: {}", command, reason)
      }
    }
  }
}

/// Result type alias for affectedpkgs
pub type AffectedResult<T> = Result<T, AffectedError>;

/// Attach a leading message to any error convertible into `AffectedError`
pub trait ResultExt<T> {
  fn context(self, ctx: impl Into<String>) -> AffectedResult<T>;

  /// Like `context`, but the message is only built on the error path
  fn with_context(self, ctx: impl FnOnce() -> String) -> AffectedResult<T>;
}

impl<T, E: Into<AffectedError>> ResultExt<T> for Result<T, E> {
  fn context(self, ctx: impl Into<String>) -> AffectedResult<T> {
    let ctx = ctx.into();
    self.with_context(|| ctx)
  }

  fn with_context(self, ctx: impl FnOnce() -> String) -> AffectedResult<T> {
    self.map_err(|e| Into::<AffectedError>::into(e).context(ctx()))
  }
}

/// Print an error to stderr with its help text
pub fn print_error(error: &AffectedError) {
  eprintln!("error: {}", error);

  if let Some(help) = error.help_message() {
    eprintln!("help: {}", help);
  }
}
