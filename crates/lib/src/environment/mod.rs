//! Build environment: variables, reproducibility files, packages and tools.

pub mod repro;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::install::{InstallOutcome, PackageSpec};
use crate::runner::{OsRunner, RunnerError};
use crate::spec::EnvironmentSpec;

pub use repro::{ReproFiles, apply_defaults, render_cargo_config, write_repro_files};

/// Variables layered over the inherited process environment for every
/// command the runner spawns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvMap(BTreeMap<String, String>);

impl EnvMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Assign `name`. Returns whether the stored value changed.
  pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
    let value = value.into();
    match self.0.insert(name.into(), value.clone()) {
      Some(previous) => previous != value,
      None => true,
    }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[derive(Debug, Error)]
pub enum EnvError {
  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Runner(#[from] RunnerError),
}

/// What the configurator did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentReport {
  /// Names of the variables declared in the buildspec.
  pub variables: Vec<String>,
  pub packages: Vec<InstallOutcome>,
  pub tools: Vec<InstallOutcome>,
}

/// Prepare the build environment.
///
/// Order: reproducibility defaults, reproducibility files, declared
/// variables, system packages, then tools one by one. Declared variables
/// override the defaults.
pub fn configure(
  spec: &EnvironmentSpec,
  runner: &mut OsRunner,
  env: &mut EnvMap,
  files: &ReproFiles,
) -> Result<EnvironmentReport, EnvError> {
  let mut report = EnvironmentReport::default();

  apply_defaults(env);
  write_repro_files(files)?;

  for var in &spec.variables {
    if env.set(var.name.as_str(), var.value.as_str()) {
      info!(name = %var.name, value = %var.value, "set environment variable");
    } else {
      debug!(name = %var.name, "environment variable unchanged");
    }
    report.variables.push(var.name.clone());
  }

  let packages: Vec<PackageSpec> = spec.system_packages.iter().map(PackageSpec::from).collect();
  report.packages = if packages.is_empty() {
    debug!("no system packages declared");
    vec![InstallOutcome::Skipped]
  } else {
    runner.install_system_packages(&packages, env)?
  };

  for tool in spec.tools.iter().map(PackageSpec::from) {
    report.tools.push(runner.install_tool(&tool, env)?);
  }

  Ok(report)
}
