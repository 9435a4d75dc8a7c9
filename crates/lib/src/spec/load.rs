//! Reading buildspec files from disk.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::types::BuildSpec;

/// Errors raised while loading or validating a buildspec.
#[derive(Debug, Error)]
pub enum SpecError {
  #[error("spec file not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("invalid buildspec:\n  {}", .0.join("\n  "))]
  Invalid(Vec<String>),
}

/// Load and decode the buildspec at `path`.
pub fn load_spec(path: &Path) -> Result<BuildSpec, SpecError> {
  if !path.is_file() {
    return Err(SpecError::NotFound(path.to_path_buf()));
  }

  let content = std::fs::read_to_string(path).map_err(|source| SpecError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let spec = parse_spec(&content).map_err(|source| SpecError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  debug!(
    path = %path.display(),
    inputs = spec.inputs.len(),
    phases = spec.phases.len(),
    "loaded buildspec"
  );

  Ok(spec)
}

/// Decode a buildspec document. An empty document is an empty spec.
pub fn parse_spec(content: &str) -> Result<BuildSpec, serde_yaml::Error> {
  if content.trim().is_empty() {
    return Ok(BuildSpec::default());
  }
  Ok(serde_yaml::from_str::<Option<BuildSpec>>(content)?.unwrap_or_default())
}
