use std::path::PathBuf;

use crs_core::ProjectNode;

use crate::retry::RetryPolicy;

/// Plain values the engine runs with. Built by the caller from configuration.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Starting group, by full path or numeric id.
    pub root_group: String,
    /// Directory the remote hierarchy is mirrored under.
    pub local_root: PathBuf,
    /// Ref for tree and file reads; `None` uses each project's default branch.
    pub git_ref: Option<String>,
    /// Re-download files that already exist locally.
    pub overwrite: bool,
    /// Report what would be downloaded without fetching or writing.
    pub dry_run: bool,
    /// Extensions (without the dot) of files to mirror.
    pub extensions: Vec<String>,
    pub retry: RetryPolicy,
}

impl WalkOptions {
    pub fn new(root_group: impl Into<String>, local_root: impl Into<PathBuf>) -> Self {
        Self {
            root_group: root_group.into(),
            local_root: local_root.into(),
            git_ref: None,
            overwrite: false,
            dry_run: false,
            extensions: vec![String::from("md")],
            retry: RetryPolicy::default(),
        }
    }

    /// The ref to read `project` at.
    pub fn git_ref_for<'a>(&'a self, project: &'a ProjectNode) -> Option<&'a str> {
        self.git_ref
            .as_deref()
            .or(project.default_branch.as_deref())
    }
}
