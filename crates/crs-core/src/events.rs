//! Traversal events.
//!
//! The engine reports progress as [`MirrorEvent`]s and never formats console
//! output itself. A presentation layer implements [`EventSink`].

use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MirrorEvent {
    GroupEntered {
        full_path: String,
    },
    ProjectEntered {
        path_with_namespace: String,
    },
    /// A `code-review-scores` directory was found.
    DirectoryMatched {
        project: String,
        path: String,
    },
    /// A blob carries the target name; it is not a match.
    TargetIsFile {
        project: String,
        path: String,
    },
    FileDownloaded {
        remote_path: String,
        local_path: PathBuf,
        bytes: u64,
    },
    /// A non-empty file already exists locally.
    FileSkipped {
        remote_path: String,
        local_path: PathBuf,
    },
    /// Dry run: the file would have been downloaded.
    FilePlanned {
        remote_path: String,
        local_path: PathBuf,
    },
    /// The file is inside a target directory but is not markdown.
    FileIgnored {
        project: String,
        remote_path: String,
    },
    FileFailed {
        project: String,
        remote_path: String,
        reason: String,
    },
    /// A group, project or tree path could not be traversed.
    BranchAbandoned {
        branch: String,
        reason: String,
    },
}

/// Receiver for traversal events.
pub trait EventSink {
    fn emit(&mut self, event: &MirrorEvent);
}

/// Discards every event.
impl EventSink for () {
    fn emit(&mut self, _event: &MirrorEvent) {}
}

/// Collects events, mostly useful in tests.
impl EventSink for Vec<MirrorEvent> {
    fn emit(&mut self, event: &MirrorEvent) {
        self.push(event.clone());
    }
}
