mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use reprobuild_lib::consts::{DEFAULT_SPEC_FILE, EXIT_FAILURE};
use reprobuild_lib::runner::{RunnerFamily, RunnerSelection};

use crate::output::{OutputFormat, print_error};

/// reprobuild - reproducible builds from a declarative buildspec
#[derive(Parser)]
#[command(name = "reprobuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the buildspec
  #[arg(default_value = DEFAULT_SPEC_FILE)]
  spec: PathBuf,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,

  /// Runner to use instead of matching /etc/os-release
  #[arg(long, value_enum, default_value_t = RunnerArg::Auto)]
  runner: RunnerArg,

  /// Only load and validate the buildspec
  #[arg(long)]
  validate: bool,

  /// Report format
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RunnerArg {
  Auto,
  #[value(name = "anolis23")]
  Anolis23,
  #[value(name = "anolis8")]
  Anolis8,
}

impl From<RunnerArg> for RunnerSelection {
  fn from(arg: RunnerArg) -> Self {
    match arg {
      RunnerArg::Auto => RunnerSelection::Auto,
      RunnerArg::Anolis23 => RunnerSelection::Forced(RunnerFamily::Anolis23),
      RunnerArg::Anolis8 => RunnerSelection::Forced(RunnerFamily::Anolis8),
    }
  }
}

fn init_tracing(verbose: bool) {
  let level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("warn,reprobuild={level},reprobuild_lib={level}")));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = if cli.validate {
    cmd::cmd_validate(&cli.spec, cli.format)
  } else {
    cmd::cmd_run(&cli.spec, cli.runner.into(), cli.format)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&err.to_string());
      ExitCode::from(EXIT_FAILURE as u8)
    }
  }
}
