//! Per-package install with release-version fallback.

use tracing::{debug, info, warn};

use super::manager::PackageManager;
use super::releasever::ReleaseStream;
use super::types::{InstallError, InstallOutcome, PackageSpec};
use crate::environment::EnvMap;
use crate::execute::ExecError;

/// Installs packages one at a time, falling back through a [`ReleaseStream`].
///
/// A release version that fails metadata validation is remembered for the
/// rest of the session: neither it nor any later candidate is tried again,
/// for this package or the ones after it.
pub struct PackageInstaller {
  manager: Box<dyn PackageManager>,
  stream: ReleaseStream,
  invalid_from: Option<usize>,
}

impl PackageInstaller {
  pub fn new(manager: Box<dyn PackageManager>, stream: ReleaseStream) -> Self {
    Self {
      manager,
      stream,
      invalid_from: None,
    }
  }

  pub fn manager_name(&self) -> &str {
    self.manager.name()
  }

  pub fn stream(&self) -> &ReleaseStream {
    &self.stream
  }

  /// Index of the first candidate known to be invalid, if any.
  pub fn invalid_from(&self) -> Option<usize> {
    self.invalid_from
  }

  /// Install `packages` in order. The first package that cannot be installed
  /// aborts the list.
  pub fn install_all(&mut self, packages: &[PackageSpec], env: &EnvMap) -> Result<Vec<InstallOutcome>, InstallError> {
    if packages.is_empty() {
      debug!("no packages to install");
      return Ok(vec![InstallOutcome::Skipped]);
    }

    for package in packages {
      package.check()?;
    }

    let names: Vec<String> = packages.iter().map(PackageSpec::identifier).collect();
    info!(manager = self.manager.name(), packages = %names.join(" "), "installing packages");

    let mut outcomes = Vec::with_capacity(packages.len());
    for package in packages {
      match self.install_one(package, env)? {
        InstallOutcome::Exhausted { package, tried } => {
          return Err(InstallError::Exhausted { package, tried });
        }
        outcome => outcomes.push(outcome),
      }
    }
    Ok(outcomes)
  }

  /// Install a single package.
  ///
  /// Tries the default repositories first, then each candidate release
  /// version: validate, then install. Stops at the first successful install
  /// or the first candidate that fails validation.
  pub fn install_one(&mut self, package: &PackageSpec, env: &EnvMap) -> Result<InstallOutcome, InstallError> {
    let id = package.identifier();

    if attempt(self.manager.install(&id, None, env))? {
      info!(package = %id, "installed");
      return Ok(InstallOutcome::Installed {
        package: id,
        releasever: None,
      });
    }
    warn!(package = %id, "default install failed, trying fallback releasevers");

    let mut tried = Vec::new();
    for (index, rv) in self.stream.candidates().enumerate() {
      if self.invalid_from.is_some_and(|cutoff| index >= cutoff) {
        debug!(package = %id, releasever = %rv, "releasever already known invalid");
        break;
      }

      if !attempt(self.manager.refresh_metadata(&rv, env))? {
        warn!(releasever = %rv, "releasever failed validation, giving up on later releasevers");
        self.invalid_from = Some(index);
        break;
      }

      info!(package = %id, releasever = %rv, "trying install");
      tried.push(rv.clone());
      if attempt(self.manager.install(&id, Some(&rv), env))? {
        info!(package = %id, releasever = %rv, "installed");
        return Ok(InstallOutcome::Installed {
          package: id,
          releasever: Some(rv),
        });
      }
    }

    Ok(InstallOutcome::Exhausted { package: id, tried })
  }
}

/// A non-zero exit is a failed attempt; failing to start the process is fatal.
fn attempt(result: Result<(), ExecError>) -> Result<bool, InstallError> {
  match result {
    Ok(()) => Ok(true),
    Err(ExecError::CmdFailed { cmd, code }) => {
      debug!(cmd = %cmd, code = ?code, "attempt failed");
      Ok(false)
    }
    Err(err) => Err(err.into()),
  }
}
