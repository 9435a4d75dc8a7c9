//! Fallback release-version candidates.
//!
//! Mirrors for a rolling family often lag the `VERSION_ID` of the running
//! image, so a failed install is retried against other repository snapshots.
//! Each stream is finite and ordered.

use crate::platform::OsIdentity;

/// Highest minor tried on a rolling stream (inclusive).
pub const ROLLING_MAX_MINOR: u32 = 100;

/// Known-good snapshot points for the 8.x family, in retry order.
pub const FIXED_8X: &[&str] = &["8", "8.2", "8.4", "8.6", "8.8", "8.9", "8.10"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseStream {
  /// `major.0`, `major.1`, ... up to `major.max_minor`.
  Rolling { major: String, max_minor: u32 },
  /// A fixed list.
  Fixed(&'static [&'static str]),
  /// No fallback.
  None,
}

impl ReleaseStream {
  /// Pick the stream for a probed identity from its major version.
  pub fn for_identity(identity: &OsIdentity) -> Self {
    match identity.major_version() {
      Some("23") => ReleaseStream::Rolling {
        major: "23".to_string(),
        max_minor: ROLLING_MAX_MINOR,
      },
      Some("8") => ReleaseStream::Fixed(FIXED_8X),
      _ => ReleaseStream::None,
    }
  }

  pub fn candidates(&self) -> Candidates<'_> {
    Candidates { stream: self, next: 0 }
  }
}

/// Iterator over a [`ReleaseStream`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
  stream: &'a ReleaseStream,
  next: usize,
}

impl Iterator for Candidates<'_> {
  type Item = String;

  fn next(&mut self) -> Option<String> {
    let item = match self.stream {
      ReleaseStream::Rolling { major, max_minor } => {
        (self.next <= *max_minor as usize).then(|| format!("{}.{}", major, self.next))
      }
      ReleaseStream::Fixed(list) => list.get(self.next).map(|s| s.to_string()),
      ReleaseStream::None => None,
    }?;
    self.next += 1;
    Some(item)
  }
}
