use std::time::Duration;

use crs_core::{EventSink, MirrorEvent};
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr showing where the walk currently is.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Run `f` with the spinner hidden so log lines do not interleave with it.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Console presentation of traversal events: log lines plus the spinner.
pub struct ConsoleSink {
    progress: Progress,
}

impl ConsoleSink {
    pub fn new(show_spinner: bool) -> Self {
        Self {
            progress: Progress::spinner(show_spinner, "resolving root group"),
        }
    }

    pub fn finish(&self) {
        self.progress.finish_clear();
    }
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: &MirrorEvent) {
        match event {
            MirrorEvent::GroupEntered { full_path } => self.progress.set_message(full_path),
            MirrorEvent::ProjectEntered {
                path_with_namespace,
            } => self.progress.set_message(path_with_namespace),
            _ => {}
        }
        self.progress.suspend(|| log_event(event));
    }
}

fn log_event(event: &MirrorEvent) {
    match event {
        MirrorEvent::GroupEntered { full_path } => {
            tracing::debug!(group = %full_path, "entering group");
        }
        MirrorEvent::ProjectEntered {
            path_with_namespace,
        } => tracing::debug!(project = %path_with_namespace, "entering project"),
        MirrorEvent::DirectoryMatched { project, path } => {
            tracing::info!(%project, %path, "found code-review-scores directory");
        }
        MirrorEvent::TargetIsFile { project, path } => {
            tracing::debug!(%project, %path, "code-review-scores is a file, not a directory");
        }
        MirrorEvent::FileDownloaded {
            local_path, bytes, ..
        } => tracing::info!(path = %local_path.display(), bytes, "downloaded"),
        MirrorEvent::FileSkipped { local_path, .. } => {
            tracing::debug!(path = %local_path.display(), "already present, skipped");
        }
        MirrorEvent::FilePlanned { local_path, .. } => {
            tracing::info!(path = %local_path.display(), "would download");
        }
        MirrorEvent::FileIgnored {
            project,
            remote_path,
        } => tracing::debug!(%project, path = %remote_path, "not markdown, ignored"),
        MirrorEvent::FileFailed {
            project,
            remote_path,
            reason,
        } => tracing::warn!(%project, path = %remote_path, %reason, "file not mirrored"),
        MirrorEvent::BranchAbandoned { branch, reason } => {
            tracing::warn!(%branch, %reason, "skipping unreachable branch");
        }
    }
}
