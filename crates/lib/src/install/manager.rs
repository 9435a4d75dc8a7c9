//! Package manager backends.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::types::InstallError;
use crate::consts::PKG_MGR_ENV;
use crate::environment::EnvMap;
use crate::execute::{CommandExecutor, ExecError, Invocation};

/// Binaries looked up on `PATH`, in order of preference.
pub const PACKAGE_MANAGERS: &[&str] = &["dnf", "yum"];

/// Operations the installer needs from a package manager.
pub trait PackageManager {
  /// Short name for logs.
  fn name(&self) -> &str;

  /// Install one package, optionally against a specific release version.
  fn install(&self, package: &str, releasever: Option<&str>, env: &EnvMap) -> Result<(), ExecError>;

  /// Refresh repository metadata for `releasever` without installing anything.
  /// Success means the release version is served by the configured mirrors.
  fn refresh_metadata(&self, releasever: &str, env: &EnvMap) -> Result<(), ExecError>;
}

/// `dnf`/`yum` driven through a [`CommandExecutor`].
pub struct RpmPackageManager {
  binary: PathBuf,
  executor: Arc<dyn CommandExecutor>,
}

impl RpmPackageManager {
  pub fn new(binary: impl Into<PathBuf>, executor: Arc<dyn CommandExecutor>) -> Self {
    Self {
      binary: binary.into(),
      executor,
    }
  }

  pub fn binary(&self) -> &Path {
    &self.binary
  }

  pub fn install_invocation(&self, package: &str, releasever: Option<&str>) -> Invocation {
    let inv = Invocation::new(self.program()).arg("install").arg("-y").arg(package);
    match releasever {
      Some(rv) => inv.arg(format!("--releasever={}", rv)),
      None => inv,
    }
  }

  pub fn refresh_invocation(&self, releasever: &str) -> Invocation {
    Invocation::new(self.program())
      .arg("-q")
      .arg("-y")
      .arg("makecache")
      .arg(format!("--releasever={}", releasever))
  }

  fn program(&self) -> String {
    self.binary.to_string_lossy().into_owned()
  }
}

impl PackageManager for RpmPackageManager {
  fn name(&self) -> &str {
    self
      .binary
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or("package-manager")
  }

  fn install(&self, package: &str, releasever: Option<&str>, env: &EnvMap) -> Result<(), ExecError> {
    self.executor.run(&self.install_invocation(package, releasever), env)
  }

  fn refresh_metadata(&self, releasever: &str, env: &EnvMap) -> Result<(), ExecError> {
    self.executor.run(&self.refresh_invocation(releasever), env)
  }
}

/// Locate the package manager binary.
///
/// Resolution order:
/// 1. explicit override (`REPROBUILD_PKG_MGR`)
/// 2. `dnf` on `PATH`
/// 3. `yum` on `PATH`
pub fn resolve_package_manager(override_path: Option<&Path>) -> Result<PathBuf, InstallError> {
  if let Some(path) = override_path {
    if path.is_file() {
      debug!(path = %path.display(), "using package manager override");
      return Ok(path.to_path_buf());
    }
    if let Ok(found) = which::which(path) {
      return Ok(found);
    }
    return Err(InstallError::ToolingUnavailable(format!(
      "{} points to non-existent path: {}",
      PKG_MGR_ENV,
      path.display()
    )));
  }

  for candidate in PACKAGE_MANAGERS {
    if let Ok(found) = which::which(candidate) {
      debug!(path = %found.display(), "found package manager");
      return Ok(found);
    }
  }

  Err(InstallError::ToolingUnavailable(format!(
    "neither {} found on PATH (set {} to override)",
    PACKAGE_MANAGERS.join(" nor "),
    PKG_MGR_ENV
  )))
}
