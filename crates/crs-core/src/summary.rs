//! Run summary accumulated from traversal events.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::events::MirrorEvent;

/// A subtree that was given up on, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbandonedBranch {
    pub branch: String,
    pub reason: String,
}

/// A single file that could not be fetched or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub project: String,
    pub remote_path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub groups_visited: u32,
    pub projects_visited: u32,
    pub directories_matched: u32,
    pub files_downloaded: u32,
    pub files_skipped: u32,
    pub files_planned: u32,
    pub files_ignored: u32,
    pub files_failed: u32,
    pub bytes_written: u64,
    pub abandoned: Vec<AbandonedBranch>,
    pub failed_files: Vec<FailedFile>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    #[must_use]
    pub fn start() -> Self {
        Self::started_at(Utc::now())
    }

    #[must_use]
    pub const fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            groups_visited: 0,
            projects_visited: 0,
            directories_matched: 0,
            files_downloaded: 0,
            files_skipped: 0,
            files_planned: 0,
            files_ignored: 0,
            files_failed: 0,
            bytes_written: 0,
            abandoned: Vec::new(),
            failed_files: Vec::new(),
            started_at,
            finished_at: None,
        }
    }

    /// Fold one event into the counters.
    pub fn record(&mut self, event: &MirrorEvent) {
        match event {
            MirrorEvent::GroupEntered { .. } => self.groups_visited += 1,
            MirrorEvent::ProjectEntered { .. } => self.projects_visited += 1,
            MirrorEvent::DirectoryMatched { .. } => self.directories_matched += 1,
            MirrorEvent::FileDownloaded { bytes, .. } => {
                self.files_downloaded += 1;
                self.bytes_written += bytes;
            }
            MirrorEvent::FileSkipped { .. } => self.files_skipped += 1,
            MirrorEvent::FilePlanned { .. } => self.files_planned += 1,
            MirrorEvent::FileIgnored { .. } => self.files_ignored += 1,
            MirrorEvent::FileFailed {
                project,
                remote_path,
                reason,
            } => {
                self.files_failed += 1;
                self.failed_files.push(FailedFile {
                    project: project.clone(),
                    remote_path: remote_path.clone(),
                    reason: reason.clone(),
                });
            }
            MirrorEvent::BranchAbandoned { branch, reason } => {
                self.abandoned.push(AbandonedBranch {
                    branch: branch.clone(),
                    reason: reason.clone(),
                });
            }
            MirrorEvent::TargetIsFile { .. } => {}
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration in milliseconds, 0 while the run is in progress.
    pub fn duration_ms(&self) -> i64 {
        self.finished_at
            .map_or(0, |end| (end - self.started_at).num_milliseconds())
    }

    /// True when some branch or file could not be mirrored.
    pub fn has_warnings(&self) -> bool {
        !self.abandoned.is_empty() || self.files_failed > 0
    }
}
