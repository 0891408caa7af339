//! File materializer.
//!
//! Given a matched `code-review-scores` directory, lists one level of it,
//! writes each markdown blob to its mirrored local path and hands nested
//! directories back to the engine. Failures are per file: a file that
//! cannot be fetched or written is reported and the next one proceeds.

use std::path::{Path, PathBuf};

use crs_core::{DownloadTarget, EntryKind, EventSink, MirrorEvent, ProjectNode, TreeEntry};
use crs_gitlab::{GitLabApi, GitLabError};

use crate::error::MaterializeError;
use crate::options::WalkOptions;
use crate::paging::drain_pages;
use crate::reporter::Reporter;
use crate::retry::with_retry;

/// Per-file result before it is turned into an event.
enum FileOutcome {
    Downloaded(u64),
    Skipped,
    Planned,
}

pub struct Materializer<'a, A> {
    api: &'a A,
    options: &'a WalkOptions,
}

impl<'a, A: GitLabApi> Materializer<'a, A> {
    pub const fn new(api: &'a A, options: &'a WalkOptions) -> Self {
        Self { api, options }
    }

    /// Mirror the files directly inside `remote_dir` of `project`.
    ///
    /// Returns the paths of nested directories, which belong to the same
    /// target and must be materialized as well.
    ///
    /// # Errors
    ///
    /// Returns the listing error when the directory itself cannot be listed.
    /// Per-file failures are reported as events instead.
    pub async fn materialize<S: EventSink>(
        &self,
        project: &ProjectNode,
        remote_dir: &str,
        reporter: &mut Reporter<'_, S>,
    ) -> Result<Vec<String>, GitLabError> {
        let git_ref = self.options.git_ref_for(project);
        let entries = drain_pages(&self.options.retry, "target directory listing", |page| {
            self.api.tree(project.id, remote_dir, git_ref, page)
        })
        .await?;

        let mut subdirs = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Tree => subdirs.push(entry.path),
                EntryKind::Blob if entry.has_extension(&self.options.extensions) => {
                    self.materialize_file(project, &entry, reporter).await;
                }
                EntryKind::Blob => reporter.emit(MirrorEvent::FileIgnored {
                    project: project.path_with_namespace.clone(),
                    remote_path: entry.path,
                }),
                EntryKind::Other => {}
            }
        }
        Ok(subdirs)
    }

    async fn materialize_file<S: EventSink>(
        &self,
        project: &ProjectNode,
        entry: &TreeEntry,
        reporter: &mut Reporter<'_, S>,
    ) {
        let target = match DownloadTarget::new(project, &entry.path, &self.options.local_root) {
            Ok(target) => target,
            Err(e) => {
                return reporter.emit(failed(project, &entry.path, &MaterializeError::from(e)));
            }
        };

        let event = match self.fetch_and_write(project, &target).await {
            Ok(FileOutcome::Downloaded(bytes)) => MirrorEvent::FileDownloaded {
                remote_path: target.remote_file_path,
                local_path: target.local_file_path,
                bytes,
            },
            Ok(FileOutcome::Skipped) => MirrorEvent::FileSkipped {
                remote_path: target.remote_file_path,
                local_path: target.local_file_path,
            },
            Ok(FileOutcome::Planned) => MirrorEvent::FilePlanned {
                remote_path: target.remote_file_path,
                local_path: target.local_file_path,
            },
            Err(e) => failed(project, &target.remote_file_path, &e),
        };
        reporter.emit(event);
    }

    async fn fetch_and_write(
        &self,
        project: &ProjectNode,
        target: &DownloadTarget,
    ) -> Result<FileOutcome, MaterializeError> {
        if !self.options.overwrite && is_present(&target.local_file_path).await {
            return Ok(FileOutcome::Skipped);
        }
        if self.options.dry_run {
            return Ok(FileOutcome::Planned);
        }

        let git_ref = self.options.git_ref_for(project);
        let bytes = with_retry(&self.options.retry, "raw file", || {
            self.api
                .raw_file(target.project_id, &target.remote_file_path, git_ref)
        })
        .await?;

        write_verbatim(&target.local_file_path, &bytes).await?;
        Ok(FileOutcome::Downloaded(bytes.len() as u64))
    }
}

fn failed(project: &ProjectNode, remote_path: &str, error: &MaterializeError) -> MirrorEvent {
    MirrorEvent::FileFailed {
        project: project.path_with_namespace.clone(),
        remote_path: remote_path.to_string(),
        reason: error.to_string(),
    }
}

/// A non-empty regular file already exists at `path`.
///
/// Presence only; contents are never read or compared.
pub async fn is_present(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

/// Write `bytes` to `path` unchanged, creating parent directories.
///
/// The bytes go to a hidden `.partial` sibling first and are renamed into
/// place, so an interrupted write never leaves a truncated file at `path`.
pub async fn write_verbatim(path: &Path, bytes: &[u8]) -> Result<(), MaterializeError> {
    let io_err = |source| MaterializeError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let partial = partial_path(path);
    let written = match tokio::fs::write(&partial, bytes).await {
        Ok(()) => tokio::fs::rename(&partial, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(io_err(e));
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_parents_and_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("otc/sapmiddleware/code-review-scores/2024-01.md");
        let bytes = b"# Score\r\n\r\n| a | 5 |\n\xF0\x9F\x91\x8D";

        write_verbatim(&path, bytes).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), bytes);
        assert!(!partial_path(&path).exists());
    }

    #[tokio::test]
    async fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "old").unwrap();

        write_verbatim(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn write_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blocker"), "x").unwrap();
        let path = dir.path().join("blocker/code-review-scores/a.md");

        let err = write_verbatim(&path, b"data").await.unwrap_err();
        assert!(matches!(err, MaterializeError::Io { .. }));
    }

    #[tokio::test]
    async fn failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the file should land makes the rename fail.
        let path = dir.path().join("2024-01.md");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let err = write_verbatim(&path, b"data").await.unwrap_err();

        assert!(matches!(err, MaterializeError::Io { .. }));
        assert!(!partial_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[tokio::test]
    async fn partial_file_is_removed_when_it_cannot_be_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2024-01.md");
        // A leftover `.partial` directory from an earlier crash blocks the write.
        std::fs::create_dir(partial_path(&path)).unwrap();

        let err = write_verbatim(&path, b"data").await.unwrap_err();

        assert!(matches!(err, MaterializeError::Io { .. }));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn presence_requires_non_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.md");
        let full = dir.path().join("full.md");
        std::fs::write(&empty, "").unwrap();
        std::fs::write(&full, "content").unwrap();

        assert!(!is_present(&empty).await);
        assert!(is_present(&full).await);
        assert!(!is_present(&dir.path().join("missing.md")).await);
        assert!(!is_present(dir.path()).await);
    }

    #[test]
    fn partial_path_is_hidden_sibling() {
        assert_eq!(
            partial_path(Path::new("docs/g/p/code-review-scores/2024-01.md")),
            Path::new("docs/g/p/code-review-scores/.2024-01.md.partial")
        );
    }
}
