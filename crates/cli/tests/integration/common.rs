//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Package manager stub: logs its argv to `$STUB_LOG`, succeeds by default.
pub const STUB_OK: &str = r#"#!/bin/sh
echo "$*" >> "$STUB_LOG"
exit 0
"#;

/// Fails the plain install of gcc; every releasever call succeeds.
pub const STUB_NEEDS_RELEASEVER: &str = r#"#!/bin/sh
echo "$*" >> "$STUB_LOG"
case "$*" in
  "install -y gcc") exit 1 ;;
esac
exit 0
"#;

/// Every call fails.
pub const STUB_FAIL: &str = r#"#!/bin/sh
echo "$*" >> "$STUB_LOG"
exit 1
"#;

/// Isolated host: buildspec, os-release, repro files and a stub `dnf`.
pub struct TestEnv {
  pub temp: TempDir,
  pub spec_path: PathBuf,
}

impl TestEnv {
  /// Copy a buildspec fixture to `.buildspec.yaml` on an Anolis 23 host.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    std::fs::write(&env.spec_path, fixture_content(name)).unwrap();
    env
  }

  /// Anolis 23 host with the succeeding stub and no buildspec.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let spec_path = temp.path().join(".buildspec.yaml");
    let env = Self { temp, spec_path };
    env.os_release("anolis23.os-release");
    env.package_manager(STUB_OK);
    env
  }

  /// Absolute path inside the temp directory.
  pub fn path(&self, rel: &str) -> PathBuf {
    let root = dunce::canonicalize(self.temp.path()).unwrap_or_else(|_| self.temp.path().to_path_buf());
    root.join(rel)
  }

  pub fn write_spec(&self, content: &str) {
    std::fs::write(&self.spec_path, content).unwrap();
  }

  /// Replace the host's os-release with a fixture.
  pub fn os_release(&self, fixture: &str) {
    std::fs::write(self.path("os-release"), fixture_content(fixture)).unwrap();
  }

  /// Install `script` as the package manager.
  pub fn package_manager(&self, script: &str) {
    let bin = self.path("bin/dnf");
    std::fs::create_dir_all(bin.parent().unwrap()).unwrap();
    std::fs::write(&bin, script).unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Argument lines the stub package manager received.
  pub fn stub_calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.path("stub.log"))
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  /// Command for the reprobuild binary, isolated to the temp directory.
  ///
  /// Runs in the temp directory and sets:
  /// - `REPROBUILD_OS_RELEASE`, `REPROBUILD_RPM_MACROS`, `REPROBUILD_CARGO_CONFIG`
  /// - `REPROBUILD_PKG_MGR`: the stub written by [`TestEnv::package_manager`]
  /// - `STUB_LOG`: where the stub records its arguments
  pub fn cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("reprobuild");
    cmd.current_dir(self.temp.path());
    cmd.env_remove("RUST_LOG");
    cmd.env("REPROBUILD_OS_RELEASE", self.path("os-release"));
    cmd.env("REPROBUILD_RPM_MACROS", self.path("etc/rpm/macros.buildroot"));
    cmd.env("REPROBUILD_CARGO_CONFIG", self.path("cargo/config.toml"));
    cmd.env("REPROBUILD_PKG_MGR", self.path("bin/dnf"));
    cmd.env("STUB_LOG", self.path("stub.log"));
    cmd
  }
}
