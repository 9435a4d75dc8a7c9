//! The run state machine.
//!
//! `SpecLoaded -> RunnerSelected -> InputsFetched -> EnvironmentConfigured
//! -> PhasesExecuted -> Done`, strictly in order. The first failure aborts
//! the run; nothing is rolled back.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::environment::{self, EnvError, EnvMap, EnvironmentReport, ReproFiles};
use crate::execute::CommandExecutor;
use crate::inputs::{self, ArtifactFetcher, FetchedInput, InputError};
use crate::install::{InstallError, PackageInstaller, PackageManager, ReleaseStream, RpmPackageManager};
use crate::phases::{self, PhaseError, PhaseRecord};
use crate::platform::{self, HostPaths, OsIdentity};
use crate::runner::{self, OsRunner, RpmRunner, RunnerChoice, RunnerFamily, RunnerSelection, UnsupportedRunner};
use crate::spec::{self, BuildSpec, SpecError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  SpecLoaded,
  RunnerSelected,
  InputsFetched,
  EnvironmentConfigured,
  PhasesExecuted,
  Done,
}

impl Stage {
  /// What the pipeline does to reach this stage.
  pub fn action(&self) -> &'static str {
    match self {
      Stage::SpecLoaded => "loading buildspec",
      Stage::RunnerSelected => "selecting runner",
      Stage::InputsFetched => "fetching inputs",
      Stage::EnvironmentConfigured => "configuring environment",
      Stage::PhasesExecuted => "executing phases",
      Stage::Done => "finishing",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.action())
  }
}

#[derive(Debug, Error)]
pub enum PipelineFailure {
  #[error(transparent)]
  Spec(#[from] SpecError),

  /// No package manager for the selected runner.
  #[error(transparent)]
  Runner(#[from] InstallError),

  #[error(transparent)]
  Input(#[from] InputError),

  #[error(transparent)]
  Environment(#[from] EnvError),

  #[error(transparent)]
  Phase(#[from] PhaseError),
}

/// A failed run: the stage being entered and why it failed.
#[derive(Debug, Error)]
#[error("{stage}: {failure}")]
pub struct PipelineError {
  pub stage: Stage,
  #[source]
  pub failure: PipelineFailure,
}

fn at<E: Into<PipelineFailure>>(stage: Stage) -> impl FnOnce(E) -> PipelineError {
  move |err| PipelineError {
    stage,
    failure: err.into(),
  }
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
  pub selection: RunnerSelection,
  pub paths: HostPaths,
}

impl PipelineOptions {
  pub fn from_env(selection: RunnerSelection) -> Self {
    Self {
      selection,
      paths: HostPaths::from_env(),
    }
  }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub spec: Option<PathBuf>,
  pub identity: OsIdentity,
  /// `None` when no family matched.
  pub runner: Option<RunnerFamily>,
  pub inputs: Vec<FetchedInput>,
  pub environment: EnvironmentReport,
  pub phases: Vec<PhaseRecord>,
  pub env: EnvMap,
  #[serde(skip)]
  pub elapsed: Duration,
}

/// Drives one run. Consumed by [`Pipeline::run`], so a run cannot be resumed.
pub struct Pipeline {
  options: PipelineOptions,
  fetcher: Box<dyn ArtifactFetcher>,
  executor: Arc<dyn CommandExecutor>,
  package_manager: Option<Box<dyn PackageManager>>,
  stage: Option<Stage>,
  env: EnvMap,
}

impl Pipeline {
  pub fn new(options: PipelineOptions, fetcher: Box<dyn ArtifactFetcher>, executor: Arc<dyn CommandExecutor>) -> Self {
    Self {
      options,
      fetcher,
      executor,
      package_manager: None,
      stage: None,
      env: EnvMap::new(),
    }
  }

  /// Use `manager` instead of resolving `dnf`/`yum`.
  pub fn with_package_manager(mut self, manager: Box<dyn PackageManager>) -> Self {
    self.package_manager = Some(manager);
    self
  }

  /// Load the buildspec at `path` and run it.
  pub fn run(self, path: &Path) -> Result<RunReport, PipelineError> {
    info!(path = %path.display(), "loading buildspec");
    let spec = spec::load_spec(path).map_err(at(Stage::SpecLoaded))?;
    let mut report = self.run_spec(&spec)?;
    report.spec = Some(path.to_path_buf());
    Ok(report)
  }

  /// Run an already decoded buildspec.
  pub fn run_spec(mut self, spec: &BuildSpec) -> Result<RunReport, PipelineError> {
    let start = Instant::now();

    spec::check_inputs(spec).map_err(at(Stage::SpecLoaded))?;
    self.advance(Stage::SpecLoaded);

    let identity = platform::probe(&self.options.paths.os_release);
    info!(identity = %identity, "detected OS");
    let choice = runner::select(&identity, self.options.selection, spec.container_image());
    let mut os_runner = self.build_runner(choice, &identity).map_err(at(Stage::RunnerSelected))?;
    info!(runner = %os_runner, "selected runner");
    self.advance(Stage::RunnerSelected);

    let fetched = inputs::fetch_inputs(&spec.inputs, self.fetcher.as_ref()).map_err(at(Stage::InputsFetched))?;
    self.advance(Stage::InputsFetched);

    let files = ReproFiles::from(&self.options.paths);
    let environment = environment::configure(&spec.environment, &mut os_runner, &mut self.env, &files)
      .map_err(at(Stage::EnvironmentConfigured))?;
    self.advance(Stage::EnvironmentConfigured);

    let phases =
      phases::run_phases(spec, self.executor.as_ref(), &self.env).map_err(at(Stage::PhasesExecuted))?;
    self.advance(Stage::PhasesExecuted);

    self.advance(Stage::Done);
    Ok(RunReport {
      spec: None,
      identity,
      runner: os_runner.family(),
      inputs: fetched,
      environment,
      phases,
      env: self.env,
      elapsed: start.elapsed(),
    })
  }

  fn advance(&mut self, next: Stage) {
    debug_assert!(self.stage.is_none_or(|current| current < next));
    debug!(from = ?self.stage, to = ?next, "pipeline transition");
    self.stage = Some(next);
  }

  /// A supported family needs a package manager up front, before any input
  /// is fetched or file written.
  fn build_runner(&mut self, choice: RunnerChoice, identity: &OsIdentity) -> Result<OsRunner, InstallError> {
    let family = match choice {
      RunnerChoice::Supported(family) => family,
      RunnerChoice::Unsupported => return Ok(OsRunner::Unsupported(UnsupportedRunner::new(identity.clone()))),
    };

    let manager = match self.package_manager.take() {
      Some(manager) => manager,
      None => runner_manager(&self.options.paths, &self.executor)?,
    };
    let stream = ReleaseStream::for_identity(identity);
    Ok(OsRunner::Rpm(RpmRunner::new(family, PackageInstaller::new(manager, stream))))
  }
}

fn runner_manager(
  paths: &HostPaths,
  executor: &Arc<dyn CommandExecutor>,
) -> Result<Box<dyn PackageManager>, InstallError> {
  let binary = crate::install::resolve_package_manager(paths.package_manager.as_deref())?;
  Ok(Box::new(RpmPackageManager::new(binary, Arc::clone(executor))))
}
