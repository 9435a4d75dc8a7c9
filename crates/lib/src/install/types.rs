use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::execute::ExecError;
use crate::spec::PackageEntry;

/// A package to install, optionally pinned to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

impl PackageSpec {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      version: None,
    }
  }

  pub fn with_version(mut self, version: impl Into<String>) -> Self {
    self.version = Some(version.into());
    self
  }

  /// The identifier handed to the package manager: `name` or `name-version`.
  pub fn identifier(&self) -> String {
    match &self.version {
      Some(version) if !version.is_empty() => format!("{}-{}", self.name, version),
      _ => self.name.clone(),
    }
  }

  /// Reject identifiers the package manager would read as options or split.
  pub fn check(&self) -> Result<(), InstallError> {
    let id = self.identifier();
    let bad = self.name.is_empty()
      || id.starts_with('-')
      || id.chars().any(|c| c.is_whitespace() || c.is_control());
    if bad {
      return Err(InstallError::InvalidPackage(id));
    }
    Ok(())
  }
}

impl fmt::Display for PackageSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.identifier())
  }
}

impl From<&PackageEntry> for PackageSpec {
  fn from(entry: &PackageEntry) -> Self {
    Self {
      name: entry.name().to_string(),
      version: entry.version().map(str::to_string),
    }
  }
}

/// Result of installing one package (or an empty list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallOutcome {
  /// Installed; `releasever` is `None` when the default repositories worked.
  Installed {
    package: String,
    releasever: Option<String>,
  },
  /// Every attempt failed. `tried` lists the release versions attempted after
  /// the default install.
  Exhausted { package: String, tried: Vec<String> },
  /// Nothing to install.
  Skipped,
}

impl InstallOutcome {
  pub fn is_installed(&self) -> bool {
    matches!(self, InstallOutcome::Installed { .. })
  }
}

#[derive(Debug, Error)]
pub enum InstallError {
  #[error("no package manager available: {0}")]
  ToolingUnavailable(String),

  #[error("failed to install package '{package}' using default repos and fallback releasevers [{}]", tried.join(", "))]
  Exhausted { package: String, tried: Vec<String> },

  #[error("invalid package identifier '{0}'")]
  InvalidPackage(String),

  #[error("package manager could not be started: {0}")]
  Command(#[from] ExecError),
}
