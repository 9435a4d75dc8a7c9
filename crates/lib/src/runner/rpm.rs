//! Runner for RPM-based families (`dnf`/`yum`).

use tracing::{debug, info};

use super::{RunnerError, RunnerFamily};
use crate::environment::EnvMap;
use crate::install::{InstallOutcome, PackageInstaller, PackageSpec};

pub struct RpmRunner {
  family: RunnerFamily,
  installer: PackageInstaller,
}

impl RpmRunner {
  pub fn new(family: RunnerFamily, installer: PackageInstaller) -> Self {
    debug!(family = %family, manager = installer.manager_name(), "rpm runner ready");
    Self { family, installer }
  }

  pub fn family(&self) -> RunnerFamily {
    self.family
  }

  pub fn install_system_packages(
    &mut self,
    packages: &[PackageSpec],
    env: &EnvMap,
  ) -> Result<Vec<InstallOutcome>, RunnerError> {
    if packages.is_empty() {
      return Ok(vec![InstallOutcome::Skipped]);
    }
    let outcomes = self.installer.install_all(packages, env)?;
    Ok(outcomes)
  }

  pub fn install_tool(&mut self, tool: &PackageSpec, env: &EnvMap) -> Result<InstallOutcome, RunnerError> {
    info!(tool = %tool, "installing tool");
    let mut outcomes = self.install_system_packages(std::slice::from_ref(tool), env)?;
    Ok(outcomes.pop().unwrap_or(InstallOutcome::Skipped))
  }
}
