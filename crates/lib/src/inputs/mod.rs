//! Input fetching.
//!
//! Each declared input is downloaded to its `targetPath`, in declaration
//! order. Inputs are written directly; archives are not unpacked.

pub mod fetch;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::spec::InputSpec;

pub use fetch::{ArtifactFetcher, FetchError, Fetched, HttpFetcher};

#[derive(Debug, Error)]
pub enum InputError {
  #[error("input '{0}' must specify url and targetPath")]
  Missing(String),

  #[error("failed to fetch input '{name}': {source}")]
  Fetch {
    name: String,
    #[source]
    source: FetchError,
  },
}

/// A fetched input, as reported after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedInput {
  pub name: String,
  pub url: String,
  pub path: PathBuf,
  #[serde(flatten)]
  pub fetched: Fetched,
}

/// Fetch every input in order, stopping at the first failure.
pub fn fetch_inputs(inputs: &[InputSpec], fetcher: &dyn ArtifactFetcher) -> Result<Vec<FetchedInput>, InputError> {
  let mut fetched = Vec::with_capacity(inputs.len());

  for input in inputs {
    let (Some(url), Some(path)) = (input.url.as_deref(), input.target_path.as_ref()) else {
      return Err(InputError::Missing(input.name.clone()));
    };

    info!(input = %input.name, url = %url, path = %path.display(), "fetching input");
    let result = fetcher
      .fetch(url, input.sha256.as_deref(), path)
      .map_err(|source| InputError::Fetch {
        name: input.name.clone(),
        source,
      })?;

    fetched.push(FetchedInput {
      name: input.name.clone(),
      url: url.to_string(),
      path: path.clone(),
      fetched: result,
    });
  }

  Ok(fetched)
}
