pub const APP_NAME: &str = "reprobuild";

/// Buildspec used when no path is given on the command line.
pub const DEFAULT_SPEC_FILE: &str = ".buildspec.yaml";

pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";
pub const DEFAULT_RPM_MACROS: &str = "/etc/rpm/macros.buildroot";

/// Environment variables that override host paths.
pub const OS_RELEASE_ENV: &str = "REPROBUILD_OS_RELEASE";
pub const PKG_MGR_ENV: &str = "REPROBUILD_PKG_MGR";
pub const RPM_MACROS_ENV: &str = "REPROBUILD_RPM_MACROS";
pub const CARGO_CONFIG_ENV: &str = "REPROBUILD_CARGO_CONFIG";

/// Fixed build timestamp: 2024-05-29T22:13:20Z.
pub const SOURCE_DATE_EPOCH: &str = "1717020800";

/// Process exit status for every fatal condition.
pub const EXIT_FAILURE: i32 = 1;
