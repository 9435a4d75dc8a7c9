//! Blocking process execution.

use std::process::Command;

use tracing::{debug, info};

use super::types::{ExecError, Invocation};
use crate::environment::EnvMap;

/// Runs one command to completion.
///
/// Implementations must block until the process exits and report a non-zero
/// exit as [`ExecError::CmdFailed`].
pub trait CommandExecutor {
  fn run(&self, invocation: &Invocation, env: &EnvMap) -> Result<(), ExecError>;
}

/// Executes commands on the host.
///
/// The child inherits the runner's environment and stdio; `env` is layered
/// on top, so later assignments win.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
  fn run(&self, invocation: &Invocation, env: &EnvMap) -> Result<(), ExecError> {
    info!(cmd = %invocation, "executing command");
    debug!(overlay = env.len(), "applying environment overlay");

    let status = Command::new(&invocation.program)
      .args(&invocation.args)
      .envs(env.iter())
      .status()
      .map_err(|source| ExecError::Spawn {
        program: invocation.program.clone(),
        source,
      })?;

    if !status.success() {
      return Err(ExecError::CmdFailed {
        cmd: invocation.to_string(),
        code: status.code(),
      });
    }

    Ok(())
  }
}
