//! Synchronous command execution.
//!
//! Commands are argument vectors, never interpolated shell strings. Phase
//! commands are the one place a shell is involved, as `/bin/sh -c <command>`.

pub mod cmd;
pub mod types;

pub use cmd::{CommandExecutor, ShellExecutor};
pub use types::{ExecError, Invocation};
