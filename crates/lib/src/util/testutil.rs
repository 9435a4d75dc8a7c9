//! Recording test doubles for the executor, package manager and fetcher.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::environment::EnvMap;
use crate::execute::{CommandExecutor, ExecError, Invocation};
use crate::inputs::{ArtifactFetcher, FetchError, Fetched};
use crate::install::PackageManager;
use crate::util::hash::hash_bytes;

/// Records every command instead of running it.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
  log: Arc<Mutex<Vec<(String, EnvMap)>>>,
  fail_on: Vec<String>,
}

impl RecordingExecutor {
  /// Fail any command whose text contains `needle`.
  pub fn fail_on(mut self, needle: &str) -> Self {
    self.fail_on.push(needle.to_string());
    self
  }

  pub fn commands(&self) -> Vec<String> {
    self.log.lock().unwrap().iter().map(|(cmd, _)| cmd.clone()).collect()
  }

  /// Environment passed with the `n`th command.
  pub fn env_at(&self, n: usize) -> EnvMap {
    self.log.lock().unwrap()[n].1.clone()
  }
}

impl CommandExecutor for RecordingExecutor {
  fn run(&self, invocation: &Invocation, env: &EnvMap) -> Result<(), ExecError> {
    let cmd = invocation.to_string();
    self.log.lock().unwrap().push((cmd.clone(), env.clone()));
    if self.fail_on.iter().any(|needle| cmd.contains(needle.as_str())) {
      return Err(ExecError::CmdFailed { cmd, code: Some(1) });
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerCall {
  Install { package: String, releasever: Option<String> },
  Refresh(String),
}

impl ManagerCall {
  pub fn install(package: &str, releasever: Option<&str>) -> Self {
    ManagerCall::Install {
      package: package.to_string(),
      releasever: releasever.map(str::to_string),
    }
  }

  pub fn refresh(releasever: &str) -> Self {
    ManagerCall::Refresh(releasever.to_string())
  }
}

/// Package manager whose answers are scripted per package and releasever.
///
/// By default every default install succeeds and every releasever install
/// fails; every releasever validates.
#[derive(Debug, Clone, Default)]
pub struct ScriptedManager {
  calls: Arc<Mutex<Vec<ManagerCall>>>,
  fail_all_default: bool,
  fail_default: BTreeSet<String>,
  install_ok: BTreeMap<String, String>,
  invalid: BTreeSet<String>,
  spawn_error: bool,
}

impl ScriptedManager {
  pub fn fail_default(mut self) -> Self {
    self.fail_all_default = true;
    self
  }

  pub fn fail_default_for(mut self, package: &str) -> Self {
    self.fail_default.insert(package.to_string());
    self
  }

  /// Let `package` install at `releasever`.
  pub fn install_ok(mut self, package: &str, releasever: &str) -> Self {
    self.install_ok.insert(package.to_string(), releasever.to_string());
    self
  }

  /// Fail metadata validation for `releasever`.
  pub fn invalid_at(mut self, releasever: &str) -> Self {
    self.invalid.insert(releasever.to_string());
    self
  }

  pub fn spawn_error(mut self) -> Self {
    self.spawn_error = true;
    self
  }

  pub fn calls(&self) -> Vec<ManagerCall> {
    self.calls.lock().unwrap().clone()
  }

  pub fn clear(&self) {
    self.calls.lock().unwrap().clear();
  }

  fn failed(cmd: String) -> ExecError {
    ExecError::CmdFailed { cmd, code: Some(1) }
  }

  fn check_spawn(&self) -> Result<(), ExecError> {
    if self.spawn_error {
      return Err(ExecError::Spawn {
        program: "stub".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "stub"),
      });
    }
    Ok(())
  }
}

impl PackageManager for ScriptedManager {
  fn name(&self) -> &str {
    "stub"
  }

  fn install(&self, package: &str, releasever: Option<&str>, _env: &EnvMap) -> Result<(), ExecError> {
    self.calls.lock().unwrap().push(ManagerCall::install(package, releasever));
    self.check_spawn()?;
    let ok = match releasever {
      None => !self.fail_all_default && !self.fail_default.contains(package),
      Some(rv) => self.install_ok.get(package).is_some_and(|want| want == rv),
    };
    if ok { Ok(()) } else { Err(Self::failed(format!("install {}", package))) }
  }

  fn refresh_metadata(&self, releasever: &str, _env: &EnvMap) -> Result<(), ExecError> {
    self.calls.lock().unwrap().push(ManagerCall::refresh(releasever));
    self.check_spawn()?;
    if self.invalid.contains(releasever) {
      return Err(Self::failed(format!("makecache {}", releasever)));
    }
    Ok(())
  }
}

/// Writes canned content instead of downloading.
#[derive(Debug, Clone, Default)]
pub struct RecordingFetcher {
  fetched: Arc<Mutex<Vec<(String, PathBuf)>>>,
  content: Vec<u8>,
}

impl RecordingFetcher {
  pub fn with_content(content: &[u8]) -> Self {
    Self {
      content: content.to_vec(),
      ..Self::default()
    }
  }

  pub fn fetched(&self) -> Vec<(String, PathBuf)> {
    self.fetched.lock().unwrap().clone()
  }
}

impl ArtifactFetcher for RecordingFetcher {
  fn fetch(&self, url: &str, sha256: Option<&str>, dest: &Path) -> Result<Fetched, FetchError> {
    self.fetched.lock().unwrap().push((url.to_string(), dest.to_path_buf()));
    let actual = hash_bytes(&self.content);
    if let Some(expected) = sha256 {
      if expected != actual {
        return Err(FetchError::HashMismatch {
          url: url.to_string(),
          expected: expected.to_string(),
          actual,
        });
      }
    }
    fs::write(dest, &self.content).map_err(|source| FetchError::Io {
      path: dest.to_path_buf(),
      source,
    })?;
    Ok(Fetched {
      sha256: actual,
      bytes: self.content.len() as u64,
      cached: false,
    })
  }
}
