//! Host probing and well-known host paths.

pub mod os_release;
pub mod paths;

pub use os_release::{OsIdentity, parse_os_release, probe};
pub use paths::HostPaths;
