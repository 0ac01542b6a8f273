use crate::core::error::{AffectedError, AffectedResult, ConfigError, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `tool.program`
pub const PROGRAM_ENV: &str = "AFFECTEDPKGS_GO";

/// Configuration for affectedpkgs
/// Searched in order: affectedpkgs.toml, .affectedpkgs.toml, .config/affectedpkgs.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AffectedConfig {
  #[serde(default)]
  pub tool: ToolConfig,
}

/// How to invoke the package introspection tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolConfig {
  /// Executable to run (default: "go")
  #[serde(default = "default_program")]
  pub program: String,

  /// Package patterns passed to `go list` (default: ["./..."])
  #[serde(default = "default_patterns")]
  pub patterns: Vec<String>,

  /// Build tags, passed as a single `-tags=a,b` flag
  #[serde(default)]
  pub tags: Vec<String>,
}

fn default_program() -> String {
  "go".to_string()
}

fn default_patterns() -> Vec<String> {
  vec!["./...".to_string()]
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      program: default_program(),
      patterns: default_patterns(),
      tags: Vec::new(),
    }
  }
}

impl ToolConfig {
  /// Validate tool settings
  pub fn validate(&self, path: &Path) -> AffectedResult<()> {
    let invalid = |field: &str, reason: &str| {
      AffectedError::Config(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: field.to_string(),
        reason: reason.to_string(),
      })
    };

    if self.program.trim().is_empty() {
      return Err(invalid("tool.program", "must not be empty"));
    }
    if self.patterns.is_empty() {
      return Err(invalid("tool.patterns", "must list at least one package pattern"));
    }
    if self.patterns.iter().any(|p| p.trim().is_empty()) {
      return Err(invalid("tool.patterns", "patterns must not be empty strings"));
    }
    if self.tags.iter().any(|t| t.trim().is_empty() || t.contains(',')) {
      return Err(invalid("tool.tags", "tags must be non-empty and must not contain ','"));
    }

    Ok(())
  }
}

impl AffectedConfig {
  /// Find config file in search order: affectedpkgs.toml, .affectedpkgs.toml, .config/affectedpkgs.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("affectedpkgs.toml"),
      path.join(".affectedpkgs.toml"),
      path.join(".config").join("affectedpkgs.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from `dir`, falling back to defaults when no file exists.
  ///
  /// The `AFFECTEDPKGS_GO` override is applied afterwards, see [`AffectedConfig::apply_env`].
  pub fn load(dir: &Path) -> AffectedResult<Self> {
    let Some(config_path) = Self::find_config_path(dir) else {
      tracing::debug!("no affectedpkgs.toml in {}, using defaults", dir.display());
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content, &config_path)?;

    tracing::debug!("loaded config from {}", config_path.display());
    Ok(config)
  }

  /// Parse and validate config text; `path` is only used in error messages
  pub fn parse(content: &str, path: &Path) -> AffectedResult<Self> {
    let config: AffectedConfig =
      toml_edit::de::from_str(content).with_context(|| format!("Failed to parse config from {}", path.display()))?;

    config.tool.validate(path)?;
    Ok(config)
  }

  /// Apply the program override from the environment, if set and non-empty
  pub fn apply_env(mut self, program_override: Option<String>) -> Self {
    if let Some(program) = program_override.filter(|p| !p.trim().is_empty()) {
      tracing::debug!("{} overrides tool program with {}", PROGRAM_ENV, program);
      self.tool.program = program;
    }
    self
  }
}
