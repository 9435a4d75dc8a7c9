//! Default command: run a buildspec end to end.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use reprobuild_lib::execute::ShellExecutor;
use reprobuild_lib::inputs::HttpFetcher;
use reprobuild_lib::install::InstallOutcome;
use reprobuild_lib::pipeline::{Pipeline, PipelineOptions, RunReport};
use reprobuild_lib::runner::RunnerSelection;

use crate::output::{
  ARROW, OutputFormat, Status, format_duration, format_size, print_field, print_json, print_status, short_digest,
};

pub fn cmd_run(spec: &Path, selection: RunnerSelection, format: OutputFormat) -> Result<()> {
  let options = PipelineOptions::from_env(selection);
  debug!(spec = %spec.display(), selection = ?selection, paths = ?options.paths, "starting run");
  let fetcher = HttpFetcher::new()?;
  let report = Pipeline::new(options, Box::new(fetcher), Arc::new(ShellExecutor)).run(spec)?;

  if format.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report);
  }
  Ok(())
}

fn print_report(report: &RunReport) {
  print_status(
    Status::Done,
    &format!("Build finished in {}", format_duration(report.elapsed)),
  );
  print_field("OS", &report.identity.to_string());
  match report.runner {
    Some(family) => print_field("Runner", &family.to_string()),
    None => print_status(
      Status::Warning,
      &format!("No runner supports {}; nothing was installed", report.identity),
    ),
  }

  if !report.inputs.is_empty() {
    println!();
    println!("Inputs:");
    for input in &report.inputs {
      let source = if input.fetched.cached {
        "cached".to_string()
      } else {
        format_size(input.fetched.bytes)
      };
      println!(
        "  {} {} {} {} ({}, {})",
        Status::Note.symbol(),
        input.name,
        ARROW,
        input.path.display(),
        short_digest(&input.fetched.sha256),
        source
      );
    }
  }

  let installed: Vec<&InstallOutcome> = report
    .environment
    .packages
    .iter()
    .chain(&report.environment.tools)
    .filter(|outcome| outcome.is_installed())
    .collect();
  if !installed.is_empty() {
    println!();
    println!("Packages:");
    for outcome in installed {
      if let InstallOutcome::Installed { package, releasever } = outcome {
        match releasever {
          Some(rv) => println!("  {} {} (releasever {})", Status::Note.symbol(), package, rv),
          None => println!("  {} {}", Status::Note.symbol(), package),
        }
      }
    }
  }

  println!();
  if report.phases.is_empty() {
    print_status(Status::Note, "No phases to run");
  }
  for phase in &report.phases {
    print_field(
      &phase.name,
      &format!("{} command(s) in {}", phase.commands, format_duration(phase.elapsed)),
    );
  }
}
