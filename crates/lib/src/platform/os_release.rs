//! OS identity probing from release metadata (`/etc/os-release`).
//!
//! The file is a list of `KEY=VALUE` lines. Values may be wrapped in one
//! layer of double quotes. Blank lines, comments and lines without `=` are
//! skipped. Probing never fails: a missing file yields an empty identity.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

/// Name and version of the running OS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OsIdentity {
  /// `NAME` from release metadata, e.g. `Anolis OS`.
  pub name: String,
  /// `VERSION_ID` from release metadata, e.g. `23.1`.
  pub version_id: String,
}

impl OsIdentity {
  pub fn new(name: impl Into<String>, version_id: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      version_id: version_id.into(),
    }
  }

  /// Build an identity from parsed release fields.
  pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
    Self {
      name: fields.get("NAME").cloned().unwrap_or_default(),
      version_id: fields.get("VERSION_ID").cloned().unwrap_or_default(),
    }
  }

  /// Leading numeric component of `VERSION_ID` (`"23"` for `"23.1"`).
  pub fn major_version(&self) -> Option<&str> {
    let major = self.version_id.trim().split('.').next()?;
    if !major.is_empty() && major.chars().all(|c| c.is_ascii_digit()) {
      Some(major)
    } else {
      None
    }
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_empty() && self.version_id.is_empty()
  }
}

impl fmt::Display for OsIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      write!(f, "unknown")
    } else {
      write!(f, "{} {}", self.name, self.version_id)
    }
  }
}

/// Parse release metadata into a key/value map.
pub fn parse_os_release(content: &str) -> BTreeMap<String, String> {
  content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(String, String)> {
  let line = line.trim();
  if line.is_empty() || line.starts_with('#') {
    return None;
  }

  let (key, value) = line.split_once('=')?;
  let key = key.trim();
  if key.is_empty() {
    return None;
  }

  Some((key.to_string(), unquote(value.trim()).to_string()))
}

/// Strip exactly one layer of surrounding double quotes.
fn unquote(value: &str) -> &str {
  value
    .strip_prefix('"')
    .and_then(|v| v.strip_suffix('"'))
    .unwrap_or(value)
}

/// Read the OS identity from `path`.
pub fn probe(path: &Path) -> OsIdentity {
  match fs::read_to_string(path) {
    Ok(content) => {
      let identity = OsIdentity::from_fields(&parse_os_release(&content));
      debug!(path = %path.display(), os = %identity, "probed release metadata");
      identity
    }
    Err(e) => {
      debug!(path = %path.display(), error = %e, "release metadata unavailable");
      OsIdentity::default()
    }
  }
}
