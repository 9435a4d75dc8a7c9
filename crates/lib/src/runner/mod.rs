//! OS runners: the capability surface the pipeline provisions through.

pub mod rpm;
pub mod select;
pub mod unsupported;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::environment::EnvMap;
use crate::install::{InstallError, InstallOutcome, PackageSpec};
use crate::platform::OsIdentity;

pub use rpm::RpmRunner;
pub use select::{RunnerChoice, RunnerSelection, select};
pub use unsupported::UnsupportedRunner;

/// OS families with a concrete runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerFamily {
  Anolis23,
  Anolis8,
}

impl RunnerFamily {
  /// Matching order for automatic selection.
  pub const SUPPORTED: [RunnerFamily; 2] = [RunnerFamily::Anolis23, RunnerFamily::Anolis8];

  /// Substring expected in `NAME`.
  pub fn token(&self) -> &'static str {
    "Anolis"
  }

  /// Expected major component of `VERSION_ID`.
  pub fn major(&self) -> &'static str {
    match self {
      RunnerFamily::Anolis23 => "23",
      RunnerFamily::Anolis8 => "8",
    }
  }

  pub fn matches(&self, identity: &OsIdentity) -> bool {
    identity.name.contains(self.token()) && identity.major_version() == Some(self.major())
  }
}

impl fmt::Display for RunnerFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.token(), self.major())
  }
}

#[derive(Debug, Error)]
pub enum RunnerError {
  #[error("{capability} is not implemented for OS '{name}' (VERSION_ID '{version_id}')")]
  UnsupportedOs {
    capability: &'static str,
    name: String,
    version_id: String,
  },

  #[error(transparent)]
  Install(#[from] InstallError),
}

/// The runner chosen for this host.
pub enum OsRunner {
  Rpm(RpmRunner),
  Unsupported(UnsupportedRunner),
}

impl OsRunner {
  pub fn family(&self) -> Option<RunnerFamily> {
    match self {
      OsRunner::Rpm(runner) => Some(runner.family()),
      OsRunner::Unsupported(_) => None,
    }
  }

  /// Install system packages in order.
  ///
  /// On an unsupported OS this never returns.
  pub fn install_system_packages(
    &mut self,
    packages: &[PackageSpec],
    env: &EnvMap,
  ) -> Result<Vec<InstallOutcome>, RunnerError> {
    match self {
      OsRunner::Rpm(runner) => runner.install_system_packages(packages, env),
      OsRunner::Unsupported(runner) => runner.install_system_packages(packages),
    }
  }

  /// Install one build tool.
  ///
  /// On an unsupported OS this never returns.
  pub fn install_tool(&mut self, tool: &PackageSpec, env: &EnvMap) -> Result<InstallOutcome, RunnerError> {
    match self {
      OsRunner::Rpm(runner) => runner.install_tool(tool, env),
      OsRunner::Unsupported(runner) => runner.install_tool(tool),
    }
  }
}

impl fmt::Display for OsRunner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OsRunner::Rpm(runner) => write!(f, "{} (rpm)", runner.family()),
      OsRunner::Unsupported(runner) => write!(f, "unsupported ({})", runner.identity()),
    }
  }
}
