//! Map an OS identity to a runner.

use tracing::{debug, warn};

use super::RunnerFamily;
use crate::platform::OsIdentity;

/// How the runner is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunnerSelection {
  /// Match the probed identity against every supported family.
  #[default]
  Auto,
  /// Use this family regardless of the identity.
  Forced(RunnerFamily),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerChoice {
  Supported(RunnerFamily),
  Unsupported,
}

/// Choose a runner for `identity`.
///
/// `image` is the buildspec's `container.image`; it is only compared for
/// diagnostics and never changes the outcome.
pub fn select(identity: &OsIdentity, selection: RunnerSelection, image: Option<&str>) -> RunnerChoice {
  let choice = match selection {
    RunnerSelection::Auto => RunnerFamily::SUPPORTED
      .into_iter()
      .find(|family| family.matches(identity))
      .map_or(RunnerChoice::Unsupported, RunnerChoice::Supported),
    RunnerSelection::Forced(family) => {
      if !family.matches(identity) {
        warn!(
          expected = %family,
          name = %identity.name,
          version_id = %identity.version_id,
          "OS identity does not match forced runner"
        );
      }
      RunnerChoice::Supported(family)
    }
  };

  if let (Some(image), RunnerChoice::Supported(family)) = (image, choice) {
    if !image_matches(image, family) {
      debug!(image, family = %family, "container image does not look like the selected family");
    }
  }

  debug!(identity = %identity, choice = ?choice, "selected runner");
  choice
}

fn image_matches(image: &str, family: RunnerFamily) -> bool {
  let image = image.to_ascii_lowercase();
  let tag = image.rsplit_once(':').map_or("", |(_, tag)| tag);
  image.contains(&family.token().to_ascii_lowercase())
    && (tag == family.major() || tag.starts_with(&format!("{}.", family.major())))
}
