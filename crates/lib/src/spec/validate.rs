//! Structural checks that decoding alone cannot express.

use tracing::warn;

use super::load::SpecError;
use super::types::BuildSpec;

/// Check that every input names a url and an absolute `targetPath`.
///
/// All offending inputs are reported together.
pub fn check_inputs(spec: &BuildSpec) -> Result<(), SpecError> {
  let problems = input_problems(spec);
  if problems.is_empty() {
    Ok(())
  } else {
    Err(SpecError::Invalid(problems))
  }
}

/// Full validation: inputs plus absolute `outputs[].path`.
pub fn validate(spec: &BuildSpec) -> Result<(), SpecError> {
  let mut problems = input_problems(spec);

  if spec.outputs.is_empty() {
    warn!("buildspec declares no outputs");
  }

  for (index, output) in spec.outputs.iter().enumerate() {
    match &output.path {
      Some(path) if !path.is_absolute() => {
        problems.push(format!("outputs[{}].path '{}' is not absolute", index, path.display()));
      }
      Some(_) => {}
      None => warn!(index, "output has no path"),
    }
  }

  if problems.is_empty() {
    Ok(())
  } else {
    Err(SpecError::Invalid(problems))
  }
}

fn input_problems(spec: &BuildSpec) -> Vec<String> {
  let mut problems = Vec::new();

  for input in &spec.inputs {
    let has_url = input.url.as_deref().is_some_and(|u| !u.trim().is_empty());
    match (&input.target_path, has_url) {
      (Some(path), true) => {
        if !path.is_absolute() {
          problems.push(format!(
            "inputs['{}'].targetPath '{}' is not absolute",
            input.name,
            path.display()
          ));
        }
      }
      _ => problems.push(format!("input '{}' must specify url and targetPath", input.name)),
    }
  }

  problems
}
