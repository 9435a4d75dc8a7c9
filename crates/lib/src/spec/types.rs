//! Decoded buildspec types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// The decoded buildspec. Immutable for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSpec {
  /// Declared inputs, in declaration order.
  #[serde(default, deserialize_with = "ordered_inputs")]
  pub inputs: Vec<InputSpec>,

  #[serde(default, deserialize_with = "null_as_default")]
  pub environment: EnvironmentSpec,

  /// Phase name to phase body. A phase may be declared with an empty body.
  #[serde(default, deserialize_with = "null_as_default")]
  pub phases: BTreeMap<String, Option<PhaseSpec>>,

  #[serde(default)]
  pub container: Option<ContainerSpec>,

  #[serde(default, deserialize_with = "null_as_default")]
  pub outputs: Vec<OutputSpec>,
}

impl BuildSpec {
  /// Commands of a phase, or an empty slice if the phase is absent.
  pub fn phase_commands(&self, phase: &str) -> &[String] {
    self
      .phases
      .get(phase)
      .and_then(|p| p.as_ref())
      .map(|p| p.commands.as_slice())
      .unwrap_or_default()
  }

  pub fn container_image(&self) -> Option<&str> {
    self.container.as_ref().and_then(|c| c.image.as_deref())
  }
}

/// A single declared input artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
  /// Key of the input in the `inputs` mapping.
  #[serde(skip)]
  pub name: String,

  pub url: Option<String>,

  /// Expected SHA-256 of the artifact (lowercase hex).
  #[serde(default, alias = "checksum")]
  pub sha256: Option<String>,

  /// Absolute path the artifact is written to.
  #[serde(default, rename = "targetPath")]
  pub target_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
  #[serde(default, deserialize_with = "variables")]
  pub variables: Vec<Variable>,

  #[serde(default, rename = "systemPackages", deserialize_with = "null_as_default")]
  pub system_packages: Vec<PackageEntry>,

  #[serde(default, deserialize_with = "null_as_default")]
  pub tools: Vec<PackageEntry>,
}

/// An environment variable assignment. Values are always strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
  pub name: String,
  pub value: String,
}

/// A system package or tool entry: a bare name or `{name, version}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
  Name(String),
  Detailed {
    name: String,
    #[serde(default, deserialize_with = "optional_scalar")]
    version: Option<String>,
  },
}

impl PackageEntry {
  pub fn name(&self) -> &str {
    match self {
      PackageEntry::Name(name) => name,
      PackageEntry::Detailed { name, .. } => name,
    }
  }

  pub fn version(&self) -> Option<&str> {
    match self {
      PackageEntry::Name(_) => None,
      PackageEntry::Detailed { version, .. } => version.as_deref(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpec {
  #[serde(default, deserialize_with = "null_as_default")]
  pub commands: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
  pub image: Option<String>,
}

/// A declared build output. Only its path is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
  pub path: Option<PathBuf>,
}

/// Treat an explicit `~` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode the `inputs` mapping while keeping declaration order.
fn ordered_inputs<'de, D>(deserializer: D) -> Result<Vec<InputSpec>, D::Error>
where
  D: Deserializer<'de>,
{
  let mapping = Option::<serde_yaml::Mapping>::deserialize(deserializer)?.unwrap_or_default();

  let mut inputs = Vec::with_capacity(mapping.len());
  for (key, value) in mapping {
    let name = scalar_to_string(&key)
      .ok_or_else(|| de::Error::custom("input names must be scalars"))?;
    let mut input: InputSpec = match value {
      Value::Null => InputSpec::default(),
      other => serde_yaml::from_value(other)
        .map_err(|e| de::Error::custom(format!("input '{}': {}", name, e)))?,
    };
    input.name = name;
    inputs.push(input);
  }

  Ok(inputs)
}

/// Accept either a list of `{name, value}` or a `name: value` mapping.
///
/// List items without both keys are skipped.
fn variables<'de, D>(deserializer: D) -> Result<Vec<Variable>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);

  match value {
    Value::Null => Ok(Vec::new()),
    Value::Sequence(items) => {
      let mut vars = Vec::with_capacity(items.len());
      for item in items {
        let (Some(name), Some(value)) = (item.get("name"), item.get("value")) else {
          continue;
        };
        let name = scalar_to_string(name).ok_or_else(|| de::Error::custom("variable names must be scalars"))?;
        let value = scalar_to_string(value)
          .ok_or_else(|| de::Error::custom(format!("variable '{}' must have a scalar value", name)))?;
        vars.push(Variable { name, value });
      }
      Ok(vars)
    }
    Value::Mapping(mapping) => {
      let mut vars = Vec::with_capacity(mapping.len());
      for (key, value) in mapping {
        let name = scalar_to_string(&key).ok_or_else(|| de::Error::custom("variable names must be scalars"))?;
        let value = scalar_to_string(&value)
          .ok_or_else(|| de::Error::custom(format!("variable '{}' must have a scalar value", name)))?;
        vars.push(Variable { name, value });
      }
      Ok(vars)
    }
    _ => Err(de::Error::custom("variables must be a list or a mapping")),
  }
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(value) => scalar_to_string(&value)
      .map(Some)
      .ok_or_else(|| de::Error::custom("expected a scalar")),
  }
}

/// Render a YAML scalar as a string. `version: 1.20` yields `"1.2"`, so
/// versions with trailing zeros should be quoted in the buildspec.
fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Null => Some(String::new()),
    _ => None,
  }
}
