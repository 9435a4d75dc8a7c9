//! Whole runs against a mock HTTP server and the real shell executor.

use std::fs;
use std::sync::Arc;

use reprobuild_lib::execute::ShellExecutor;
use reprobuild_lib::inputs::HttpFetcher;
use reprobuild_lib::pipeline::{Pipeline, PipelineFailure, PipelineOptions, Stage};
use reprobuild_lib::runner::{RunnerFamily, RunnerSelection};
use reprobuild_lib::util::hash::hash_bytes;

use super::common::{ANOLIS_8, ANOLIS_23, LoggingManager, TestHost};

const ARTIFACT: &[u8] = b"source tarball bytes";

fn pipeline(host: &TestHost, selection: RunnerSelection, manager: &LoggingManager) -> Pipeline {
  let options = PipelineOptions {
    selection,
    paths: host.paths(),
  };
  Pipeline::new(options, Box::new(HttpFetcher::new().unwrap()), Arc::new(ShellExecutor))
    .with_package_manager(Box::new(manager.clone()))
}

#[test]
fn end_to_end_fetch_install_build() {
  let mut server = mockito::Server::new();
  let mock = server.mock("GET", "/src.tar.gz").with_body(ARTIFACT).create();
  let host = TestHost::new(ANOLIS_23);
  let target = host.path("work/src.tar.gz");
  let marker = host.path("hi.txt");
  let spec_path = host.path("buildspec.yaml");
  fs::write(
    &spec_path,
    format!(
      r#"
inputs:
  src:
    url: {url}/src.tar.gz
    checksum: {sha}
    targetPath: {target}
environment:
  systemPackages:
    - gcc
phases:
  build:
    commands:
      - echo hi
      - echo hi > {marker}
outputs:
  - path: /out/app.rpm
"#,
      url = server.url(),
      sha = hash_bytes(ARTIFACT),
      target = target.display(),
      marker = marker.display(),
    ),
  )
  .unwrap();
  let manager = LoggingManager::always_ok();

  let report = pipeline(&host, RunnerSelection::Auto, &manager).run(&spec_path).unwrap();

  mock.assert();
  assert_eq!(fs::read(&target).unwrap(), ARTIFACT);
  assert_eq!(manager.calls(), ["install gcc"]);
  assert_eq!(fs::read_to_string(&marker).unwrap(), "hi\n");
  assert_eq!(report.runner, Some(RunnerFamily::Anolis23));
  assert_eq!(report.inputs[0].fetched.sha256, hash_bytes(ARTIFACT));
  assert!(host.path("etc/rpm/macros.buildroot").is_file());
  assert!(host.path("home/.cargo/config.toml").is_file());
}

#[test]
fn checksum_mismatch_aborts_before_environment() {
  let mut server = mockito::Server::new();
  server.mock("GET", "/src.tar.gz").with_body(ARTIFACT).create();
  let host = TestHost::new(ANOLIS_23);
  let manager = LoggingManager::always_ok();
  let spec = reprobuild_lib::spec::parse_spec(&format!(
    "inputs:\n  src:\n    url: {}/src.tar.gz\n    sha256: {}\n    targetPath: {}\nenvironment:\n  systemPackages: [gcc]\n",
    server.url(),
    "ab".repeat(32),
    host.path("src.tar.gz").display()
  ))
  .unwrap();

  let err = pipeline(&host, RunnerSelection::Auto, &manager).run_spec(&spec).unwrap_err();

  assert_eq!(err.stage, Stage::InputsFetched);
  assert!(matches!(err.failure, PipelineFailure::Input(_)));
  assert!(manager.calls().is_empty());
  assert!(!host.path("src.tar.gz").exists());
}

#[test]
fn phases_inherit_reproducible_env() {
  let host = TestHost::new(ANOLIS_8);
  let out = host.path("env.txt");
  let spec = reprobuild_lib::spec::parse_spec(&format!(
    "environment:\n  variables:\n    - name: GREETING\n      value: bonjour\nphases:\n  prepare:\n    commands:\n      - echo \"$GREETING $SOURCE_DATE_EPOCH $TZ\" > {}\n",
    out.display()
  ))
  .unwrap();

  let report = pipeline(&host, RunnerSelection::Auto, &LoggingManager::always_ok())
    .run_spec(&spec)
    .unwrap();

  assert_eq!(report.runner, Some(RunnerFamily::Anolis8));
  assert_eq!(fs::read_to_string(&out).unwrap(), "bonjour 1717020800 UTC\n");
}

#[test]
fn forced_runner_on_foreign_identity_still_installs() {
  let host = TestHost::new("NAME=\"Fedora Linux\"\nVERSION_ID=\"40\"\n");
  let manager = LoggingManager::always_ok();
  let spec =
    reprobuild_lib::spec::parse_spec("environment:\n  tools:\n    - name: rust\n      version: 1.75.0\n").unwrap();

  let report = pipeline(&host, RunnerSelection::Forced(RunnerFamily::Anolis23), &manager)
    .run_spec(&spec)
    .unwrap();

  assert_eq!(report.runner, Some(RunnerFamily::Anolis23));
  assert_eq!(manager.calls(), ["install rust-1.75.0"]);
}

#[test]
fn failing_phase_stops_the_run() {
  let host = TestHost::new(ANOLIS_23);
  let after = host.path("after.txt");
  let spec = reprobuild_lib::spec::parse_spec(&format!(
    "phases:\n  prepare:\n    commands: [\"exit 7\"]\n  build:\n    commands: [\"touch {}\"]\n",
    after.display()
  ))
  .unwrap();

  let err = pipeline(&host, RunnerSelection::Auto, &LoggingManager::always_ok())
    .run_spec(&spec)
    .unwrap_err();

  assert_eq!(err.stage, Stage::PhasesExecuted);
  assert!(err.to_string().contains("exit code Some(7)"));
  assert!(!after.exists());
}
