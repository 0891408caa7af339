//! Remote → local path mapping.
//!
//! The mapping is a pure function of the output root, the project's
//! namespace path and the file path inside the repository. Segments are
//! copied byte-for-byte; nothing is renamed or flattened.

use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Map a remote file onto the local mirror.
///
/// `root / <path_with_namespace segments> / <remote_file_path segments>`
///
/// # Errors
///
/// Returns [`CoreError::UnsafePath`] when a segment is empty, `.` or `..`,
/// since such a path could not round-trip or could escape `root`.
pub fn local_path(
    root: &Path,
    path_with_namespace: &str,
    remote_file_path: &str,
) -> Result<PathBuf, CoreError> {
    let mut local = root.to_path_buf();
    for remote in [path_with_namespace, remote_file_path] {
        for segment in remote.split('/') {
            check_segment(remote, segment)?;
            local.push(segment);
        }
    }
    Ok(local)
}

fn check_segment(path: &str, segment: &str) -> Result<(), CoreError> {
    let reason = match segment {
        "" => "empty path segment",
        "." | ".." => "relative path segment",
        s if s.contains('\\') || s.contains('\0') => "segment contains a path separator",
        _ => return Ok(()),
    };
    Err(CoreError::UnsafePath {
        path: path.to_string(),
        reason: reason.to_string(),
    })
}
