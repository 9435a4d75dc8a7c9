//! Artifact download with SHA-256 verification.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::APP_NAME;
use crate::util::hash::{hash_bytes, hash_file, normalize_digest};

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request to {url} failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("request to {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  #[error("I/O error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fetched {
  pub sha256: String,
  pub bytes: u64,
  /// The destination already held the expected content.
  pub cached: bool,
}

/// Downloads one artifact to a destination path.
pub trait ArtifactFetcher {
  /// Fetch `url` into `dest`, verifying `sha256` (lowercase hex) when given.
  /// Nothing is written when verification fails.
  fn fetch(&self, url: &str, sha256: Option<&str>, dest: &Path) -> Result<Fetched, FetchError>;
}

/// Blocking HTTP(S) fetcher.
pub struct HttpFetcher {
  client: reqwest::blocking::Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self, FetchError> {
    let client = reqwest::blocking::Client::builder()
      .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self { client })
  }
}

impl ArtifactFetcher for HttpFetcher {
  fn fetch(&self, url: &str, sha256: Option<&str>, dest: &Path) -> Result<Fetched, FetchError> {
    let expected = sha256.map(normalize_digest);
    let io_err = |source| FetchError::Io {
      path: dest.to_path_buf(),
      source,
    };

    if let (Some(expected), true) = (&expected, dest.is_file()) {
      debug!(path = %dest.display(), "checking cached file");
      if let Ok(actual) = hash_file(dest) {
        if &actual == expected {
          info!(path = %dest.display(), "using cached file");
          let bytes = fs::metadata(dest).map_err(io_err)?.len();
          return Ok(Fetched {
            sha256: actual,
            bytes,
            cached: true,
          });
        }
        debug!(expected = %expected, actual = %actual, "cached file hash mismatch, re-downloading");
      }
    }

    info!(url = %url, "fetching URL");
    let request_err = |source| FetchError::Request {
      url: url.to_string(),
      source,
    };
    let response = self.client.get(url).send().map_err(request_err)?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }
    let body = response.bytes().map_err(request_err)?;

    let actual = hash_bytes(&body);
    match &expected {
      Some(expected) if &actual != expected => {
        return Err(FetchError::HashMismatch {
          url: url.to_string(),
          expected: expected.clone(),
          actual,
        });
      }
      Some(_) => debug!(sha256 = %actual, "hash verified"),
      None => debug!(sha256 = %actual, "no checksum declared"),
    }

    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(dest, &body).map_err(io_err)?;

    info!(path = %dest.display(), size = body.len(), "download complete");
    Ok(Fetched {
      sha256: actual,
      bytes: body.len() as u64,
      cached: false,
    })
  }
}
