//! Cross-cutting error types.
//!
//! Transport and configuration errors live in their own crates
//! (`GitLabError`, `ConfigError`). The binary converges them with `anyhow`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A remote path cannot be mapped under the local output root.
    #[error("Unsafe remote path '{path}': {reason}")]
    UnsafePath { path: String, reason: String },
}
