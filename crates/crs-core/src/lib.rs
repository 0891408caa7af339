//! # crs-core
//!
//! Core types shared across the crs-mirror crates:
//! - API-derived entities (groups, projects, tree entries, download targets)
//! - Traversal events and the [`EventSink`] port
//! - The run summary accumulated during a mirror run
//! - Pure remote → local path mapping
//! - Cross-cutting error types

pub mod entities;
pub mod errors;
pub mod events;
pub mod paths;
pub mod summary;

pub use entities::{DownloadTarget, EntryKind, GroupNode, ProjectNode, TreeEntry};
pub use errors::CoreError;
pub use events::{EventSink, MirrorEvent};
pub use summary::{AbandonedBranch, FailedFile, RunSummary};

/// Name of the repository directories whose files are mirrored.
///
/// Matching is exact and case-sensitive.
pub const TARGET_DIR_NAME: &str = "code-review-scores";
