//! `--validate`: check a buildspec without running it.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use reprobuild_lib::phases::PHASE_ORDER;
use reprobuild_lib::spec::{load_spec, validate};

use crate::output::{OutputFormat, Status, print_field, print_json, print_status};

pub fn cmd_validate(path: &Path, format: OutputFormat) -> Result<()> {
  let spec = load_spec(path)?;
  validate(&spec)?;

  let phases: Vec<&str> = PHASE_ORDER
    .iter()
    .copied()
    .filter(|phase| !spec.phase_commands(phase).is_empty())
    .collect();

  if format.is_json() {
    return print_json(&json!({
      "spec": path,
      "valid": true,
      "inputs": spec.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
      "system_packages": spec.environment.system_packages.len(),
      "tools": spec.environment.tools.len(),
      "phases": phases,
      "container_image": spec.container_image(),
    }));
  }

  print_status(Status::Done, &format!("{} is valid", path.display()));
  print_field("Inputs", &spec.inputs.len().to_string());
  print_field("System packages", &spec.environment.system_packages.len().to_string());
  print_field("Tools", &spec.environment.tools.len().to_string());
  print_field("Phases", &phases.join(", "));
  if let Some(image) = spec.container_image() {
    print_status(Status::Note, &format!("Container image: {}", image));
  }
  Ok(())
}
