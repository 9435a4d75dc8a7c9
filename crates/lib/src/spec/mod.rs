//! Buildspec model, loading and validation.
//!
//! A buildspec is a YAML document with `inputs`, `environment`, `phases`,
//! `container` and `outputs` sections. Every section is optional.

mod load;
mod types;
mod validate;

pub use load::{SpecError, load_spec, parse_spec};
pub use types::{
  BuildSpec, ContainerSpec, EnvironmentSpec, InputSpec, OutputSpec, PackageEntry, PhaseSpec, Variable,
};
pub use validate::{check_inputs, validate};
