//! OS package installation.

pub mod installer;
pub mod manager;
pub mod releasever;
pub mod types;

pub use installer::PackageInstaller;
pub use manager::{PackageManager, RpmPackageManager, resolve_package_manager};
pub use releasever::ReleaseStream;
pub use types::{InstallError, InstallOutcome, PackageSpec};
