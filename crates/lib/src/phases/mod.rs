//! Phase execution: `prepare` then `build`.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::environment::EnvMap;
use crate::execute::{CommandExecutor, ExecError, Invocation};
use crate::spec::BuildSpec;

/// Phases run, in order. Other phase names are ignored.
pub const PHASE_ORDER: &[&str] = &["prepare", "build"];

#[derive(Debug, Error)]
pub enum PhaseError {
  #[error("phase '{phase}' failed: {source}")]
  Command {
    phase: String,
    #[source]
    source: ExecError,
  },
}

/// One executed phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseRecord {
  pub name: String,
  pub commands: usize,
  #[serde(skip)]
  pub elapsed: Duration,
}

/// Run every known phase's commands in order through `executor`.
///
/// Phases that are absent or have no commands are skipped. The first failing
/// command aborts the run.
pub fn run_phases(
  spec: &BuildSpec,
  executor: &dyn CommandExecutor,
  env: &EnvMap,
) -> Result<Vec<PhaseRecord>, PhaseError> {
  for name in spec.phases.keys() {
    if !PHASE_ORDER.contains(&name.as_str()) {
      debug!(phase = %name, "ignoring unknown phase");
    }
  }

  let mut records = Vec::new();
  for phase in PHASE_ORDER {
    let commands = spec.phase_commands(phase);
    if commands.is_empty() {
      debug!(phase, "phase has no commands");
      continue;
    }

    info!(phase, commands = commands.len(), "running phase");
    let start = Instant::now();
    for command in commands {
      executor
        .run(&Invocation::shell(command), env)
        .map_err(|source| PhaseError::Command {
          phase: phase.to_string(),
          source,
        })?;
    }

    records.push(PhaseRecord {
      name: phase.to_string(),
      commands: commands.len(),
      elapsed: start.elapsed(),
    });
  }

  Ok(records)
}
