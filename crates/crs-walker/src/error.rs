//! Walker error types.
//!
//! [`WalkError`] is fatal and aborts the run. Branch-level failures are not
//! errors here: they become `BranchAbandoned` events and the walk goes on.

use std::path::PathBuf;

use crs_core::CoreError;
use crs_gitlab::GitLabError;
use thiserror::Error;

/// Failures that stop the whole run.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The token was rejected.
    #[error("GitLab rejected the access token: {source}")]
    Unauthorized {
        #[source]
        source: GitLabError,
    },

    /// The starting group cannot be resolved.
    #[error("root group '{group}' is unreachable: {source}")]
    RootGroupUnreachable {
        group: String,
        #[source]
        source: GitLabError,
    },
}

/// Failure to mirror a single file.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error(transparent)]
    Path(#[from] CoreError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] GitLabError),

    #[error("write to {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
