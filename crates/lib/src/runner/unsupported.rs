//! Fail-closed runner for hosts no family matches.

use tracing::error;

use super::RunnerError;
use crate::consts::EXIT_FAILURE;
use crate::install::PackageSpec;
use crate::platform::OsIdentity;

/// Every capability logs a diagnostic and exits the process.
#[derive(Debug, Clone)]
pub struct UnsupportedRunner {
  identity: OsIdentity,
}

impl UnsupportedRunner {
  pub fn new(identity: OsIdentity) -> Self {
    Self { identity }
  }

  pub fn identity(&self) -> &OsIdentity {
    &self.identity
  }

  pub fn install_system_packages(&self, packages: &[PackageSpec]) -> ! {
    self.fail("install_system_packages", packages.len())
  }

  pub fn install_tool(&self, _tool: &PackageSpec) -> ! {
    self.fail("install_tool", 1)
  }

  fn fail(&self, capability: &'static str, requested: usize) -> ! {
    let err = RunnerError::UnsupportedOs {
      capability,
      name: self.identity.name.clone(),
      version_id: self.identity.version_id.clone(),
    };
    error!(requested, "{}", err);
    std::process::exit(EXIT_FAILURE)
  }
}
