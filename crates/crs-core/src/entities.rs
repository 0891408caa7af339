//! API-derived entities.
//!
//! These records are deserialized straight from GitLab REST responses and
//! live only for the duration of a run. Unknown response fields are ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::paths;

/// A GitLab group or subgroup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: u64,
    /// Namespace path from the top-level group, e.g. `otc/backend`.
    pub full_path: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

/// A project belonging to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub id: u64,
    /// Group full path plus project path, e.g. `otc/sapmiddleware`.
    pub path_with_namespace: String,
    /// `None` for projects with an empty repository.
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Kind of a repository tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Tree,
    Blob,
    /// Submodule commits and anything else GitLab may add later.
    #[serde(other)]
    Other,
}

/// A single file or directory listed at some path within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Full path from the repository root.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
}

impl TreeEntry {
    /// Whether the entry has one of `extensions` (compared ASCII-case-insensitively).
    pub fn has_extension(&self, extensions: &[String]) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// A matched remote file paired with its local destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadTarget {
    pub project_id: u64,
    pub remote_file_path: String,
    pub local_file_path: PathBuf,
}

impl DownloadTarget {
    /// Pair `remote_file_path` in `project` with its path under `local_root`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsafePath`] if either path contains an empty,
    /// `.` or `..` segment.
    pub fn new(
        project: &ProjectNode,
        remote_file_path: &str,
        local_root: &Path,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            project_id: project.id,
            remote_file_path: remote_file_path.to_string(),
            local_file_path: paths::local_path(
                local_root,
                &project.path_with_namespace,
                remote_file_path,
            )?,
        })
    }
}
