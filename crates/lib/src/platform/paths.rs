//! Host paths the runner reads or writes, with environment overrides.

use std::path::PathBuf;

use crate::consts::{
  CARGO_CONFIG_ENV, DEFAULT_OS_RELEASE, DEFAULT_RPM_MACROS, OS_RELEASE_ENV, PKG_MGR_ENV, RPM_MACROS_ENV,
};

/// Returns the user's home directory
pub fn home_dir() -> PathBuf {
  std::env::var("HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("/root"))
}

/// Release metadata file used for OS detection.
pub fn os_release_path() -> PathBuf {
  env_path(OS_RELEASE_ENV).unwrap_or_else(|| PathBuf::from(DEFAULT_OS_RELEASE))
}

/// Explicit package manager binary, bypassing the `dnf`/`yum` lookup.
pub fn package_manager_override() -> Option<PathBuf> {
  env_path(PKG_MGR_ENV)
}

/// RPM macro file pinning build timestamps.
pub fn rpm_macros_path() -> PathBuf {
  env_path(RPM_MACROS_ENV).unwrap_or_else(|| PathBuf::from(DEFAULT_RPM_MACROS))
}

/// Cargo configuration pinning linker and codegen flags.
pub fn cargo_config_path() -> PathBuf {
  env_path(CARGO_CONFIG_ENV).unwrap_or_else(|| home_dir().join(".cargo").join("config.toml"))
}

fn env_path(var: &str) -> Option<PathBuf> {
  std::env::var_os(var)
    .filter(|value| !value.is_empty())
    .map(PathBuf::from)
}

/// All host paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
  pub os_release: PathBuf,
  pub rpm_macros: PathBuf,
  pub cargo_config: PathBuf,
  pub package_manager: Option<PathBuf>,
}

impl HostPaths {
  /// Resolve every path from the environment, falling back to defaults.
  pub fn from_env() -> Self {
    Self {
      os_release: os_release_path(),
      rpm_macros: rpm_macros_path(),
      cargo_config: cargo_config_path(),
      package_manager: package_manager_override(),
    }
  }
}
