//! Reproducibility defaults: locale, timezone, build epoch and the
//! RPM/cargo configuration files that pin timestamps and codegen.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{EnvError, EnvMap};
use crate::consts::SOURCE_DATE_EPOCH;
use crate::platform::HostPaths;

/// Variables set before anything declared in the buildspec.
pub const DEFAULT_VARIABLES: &[(&str, &str)] = &[
  ("LANG", "C.UTF-8"),
  ("LC_ALL", "C.UTF-8"),
  ("TZ", "UTC"),
  ("SOURCE_DATE_EPOCH", SOURCE_DATE_EPOCH),
  ("RPM_BUILD_NCPUS", "1"),
];

/// RPM macros clamping file mtimes and build time to `SOURCE_DATE_EPOCH`.
pub const RPM_MACROS: &str = "%build_mtime_policy clamp_to_source_date_epoch
%clamp_mtime_to_source_date_epoch 1
%use_source_date_epoch_as_buildtime 1
%_buildhost reproducible
";

/// Target triples pinned in the cargo config, with their `target-cpu`.
const CARGO_TARGETS: &[(&str, &str)] = &[
  ("x86_64-unknown-linux-gnu", "x86-64"),
  ("x86_64-unknown-linux-musl", "x86-64"),
  ("aarch64-unknown-linux-gnu", "generic"),
  ("aarch64-unknown-linux-musl", "generic"),
  ("armv7-unknown-linux-gnueabihf", "generic"),
  ("armv7-unknown-linux-musleabihf", "generic"),
  ("riscv64gc-unknown-linux-gnu", "generic"),
  ("riscv64gc-unknown-linux-musl", "generic"),
];

/// Render the cargo configuration.
///
/// Global rustflags stay empty; each target gets `clang` as linker and a
/// fixed `target-cpu`. The release profile uses a single codegen unit.
pub fn render_cargo_config() -> String {
  let mut out = String::from("[build]\nrustflags = []\n");

  for (triple, cpu) in CARGO_TARGETS {
    out.push_str(&format!(
      "\n[target.{}]\nlinker = \"clang\"\nrustflags = [\n    \"-C\", \"target-cpu={}\",\n]\n",
      triple, cpu
    ));
  }

  out.push_str("\n[profile.release]\ncodegen-units = 1\nlto = \"fat\"\ndebug = 1\n");
  out
}

/// Files written by [`write_repro_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReproFiles {
  pub rpm_macros: PathBuf,
  pub cargo_config: PathBuf,
}

impl From<&HostPaths> for ReproFiles {
  fn from(paths: &HostPaths) -> Self {
    Self {
      rpm_macros: paths.rpm_macros.clone(),
      cargo_config: paths.cargo_config.clone(),
    }
  }
}

/// Seed `env` with [`DEFAULT_VARIABLES`].
pub fn apply_defaults(env: &mut EnvMap) {
  for (name, value) in DEFAULT_VARIABLES {
    env.set(*name, *value);
  }
}

/// Write the RPM macro file and the cargo config, replacing existing files.
pub fn write_repro_files(files: &ReproFiles) -> Result<(), EnvError> {
  write_file(&files.rpm_macros, RPM_MACROS)?;
  write_file(&files.cargo_config, &render_cargo_config())?;
  info!(
    rpm_macros = %files.rpm_macros.display(),
    cargo_config = %files.cargo_config.display(),
    "wrote reproducibility config"
  );
  Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), EnvError> {
  let to_err = |source| EnvError::Write {
    path: path.to_path_buf(),
    source,
  };

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(to_err)?;
  }
  fs::write(path, content).map_err(to_err)?;
  debug!(path = %path.display(), bytes = content.len(), "wrote file");
  Ok(())
}
