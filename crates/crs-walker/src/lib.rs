//! # crs-walker
//!
//! The mirror engine: traverses a GitLab group hierarchy, finds directories
//! named exactly `code-review-scores` at any depth of any project's
//! repository, and writes the markdown files inside them under a local root
//! that reproduces `group/…/project/path`.
//!
//! The engine is sequential and depth-first. It consumes plain values
//! ([`WalkOptions`]) and any [`crs_gitlab::GitLabApi`] implementation, and
//! reports progress as [`crs_core::MirrorEvent`]s.
//!
//! Failure policy:
//! - root group unreachable or token rejected → [`WalkError`], run aborted
//! - a group, project or directory that cannot be listed → abandoned,
//!   siblings continue
//! - a file that cannot be fetched or written → reported, next file continues
//! - timeouts, 5xx and 429 → retried with backoff first

mod error;
mod materializer;
mod options;
mod paging;
mod reporter;
mod retry;
mod walker;

pub use error::{MaterializeError, WalkError};
pub use materializer::{Materializer, is_present, write_verbatim};
pub use options::WalkOptions;
pub use reporter::Reporter;
pub use retry::{RetryPolicy, with_retry};
pub use walker::{Walker, mirror};
