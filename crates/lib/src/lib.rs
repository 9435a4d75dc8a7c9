//! reprobuild-lib: declarative, reproducible build runner.
//!
//! A YAML buildspec drives one run:
//! - `spec`: decode and validate the buildspec
//! - `platform`: probe the host OS and resolve host paths
//! - `runner`: pick the OS runner and install packages through it
//! - `install`: package installs with release-version fallback
//! - `inputs`: fetch declared artifacts
//! - `environment`: variables and reproducibility files
//! - `phases`: run `prepare` and `build`
//! - `pipeline`: the state machine tying them together

pub mod consts;
pub mod environment;
pub mod execute;
pub mod inputs;
pub mod install;
pub mod phases;
pub mod pipeline;
pub mod platform;
pub mod runner;
pub mod spec;
pub mod util;
