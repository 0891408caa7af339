//! In-memory GitLab used by the engine tests.
//!
//! Groups, projects and repository files are declared with a small builder.
//! Listings are paginated with a configurable page size, and individual
//! calls can be made to fail (access denied, transient errors, rate limits,
//! missing files).

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crs_core::{EntryKind, GroupNode, ProjectNode, TreeEntry};
use crs_gitlab::{GitLabApi, GitLabError, Page};
use crs_walker::{RetryPolicy, WalkOptions};

#[derive(Clone, Copy)]
pub enum Fault {
    Unavailable,
    RateLimited,
}

#[derive(Default)]
pub struct FakeGitLab {
    groups: Vec<GroupNode>,
    /// (owning group id, project)
    projects: Vec<(u64, ProjectNode)>,
    files: HashMap<u64, BTreeMap<String, Vec<u8>>>,
    page_size: usize,
    denied: HashSet<String>,
    missing: HashSet<String>,
    faults: RefCell<HashMap<String, (Fault, u32)>>,
    unauthorized: bool,
    calls: RefCell<Vec<String>>,
}

impl FakeGitLab {
    pub fn new() -> Self {
        Self {
            page_size: 100,
            ..Self::default()
        }
    }

    pub fn group(mut self, id: u64, full_path: &str, parent_id: Option<u64>) -> Self {
        self.groups.push(GroupNode {
            id,
            full_path: full_path.to_string(),
            parent_id,
            name: full_path.rsplit('/').next().unwrap_or_default().to_string(),
        });
        self
    }

    pub fn project(self, id: u64, group_id: u64, files: &[(&str, &[u8])]) -> Self {
        let group = self
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .expect("declare the group before its projects");
        let path_with_namespace = format!("{}/project-{id}", group.full_path);
        self.push_project(id, group_id, &path_with_namespace, files)
    }

    pub fn named_project(
        self,
        id: u64,
        group_id: u64,
        path_with_namespace: &str,
        files: &[(&str, &[u8])],
    ) -> Self {
        self.push_project(id, group_id, path_with_namespace, files)
    }

    fn push_project(
        mut self,
        id: u64,
        group_id: u64,
        path_with_namespace: &str,
        files: &[(&str, &[u8])],
    ) -> Self {
        self.projects.push((
            group_id,
            ProjectNode {
                id,
                path_with_namespace: path_with_namespace.to_string(),
                // GitLab reports no default branch until the first commit.
                default_branch: (!files.is_empty()).then(|| "main".into()),
            },
        ));
        let tree = self.files.entry(id).or_default();
        for (path, bytes) in files {
            tree.insert((*path).to_string(), bytes.to_vec());
        }
        self
    }

    /// List the project in a second group as well, as a shared project would be.
    pub fn also_in_group(mut self, project_id: u64, group_id: u64) -> Self {
        let project = self
            .projects
            .iter()
            .find(|(_, p)| p.id == project_id)
            .map(|(_, p)| p.clone())
            .expect("declare the project first");
        self.projects.push((group_id, project));
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Answer 403 for a call key (see `key_*` helpers).
    pub fn deny(mut self, key: String) -> Self {
        self.denied.insert(key);
        self
    }

    /// Answer 404 for a raw file.
    pub fn missing_file(mut self, project_id: u64, path: &str) -> Self {
        self.missing.insert(key_raw(project_id, path));
        self
    }

    /// Fail the first `times` calls for `key` with `fault`.
    pub fn flaky(self, key: String, fault: Fault, times: u32) -> Self {
        self.faults.borrow_mut().insert(key, (fault, times));
        self
    }

    /// Reject every call with 401.
    pub fn unauthorized(mut self) -> Self {
        self.unauthorized = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn check(&self, key: &str) -> Result<(), GitLabError> {
        self.calls.borrow_mut().push(key.to_string());
        if self.unauthorized {
            return Err(api_error(401, "401 Unauthorized"));
        }
        if let Some((fault, remaining)) = self.faults.borrow_mut().get_mut(key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(match fault {
                    Fault::Unavailable => api_error(503, "Service Unavailable"),
                    Fault::RateLimited => GitLabError::RateLimited {
                        retry_after_secs: 60,
                    },
                });
            }
        }
        if self.denied.contains(key) {
            return Err(api_error(403, "403 Forbidden"));
        }
        Ok(())
    }

    fn paginate<T: Clone>(&self, all: &[T], page: u32) -> Page<T> {
        let start = (page as usize - 1) * self.page_size;
        let items = all.iter().skip(start).take(self.page_size).cloned().collect();
        let next_page = (start + self.page_size < all.len()).then_some(page + 1);
        Page { items, next_page }
    }

    fn list_dir(&self, project_id: u64, path: &str) -> Option<Vec<TreeEntry>> {
        let files = self.files.get(&project_id)?;
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let mut children: BTreeMap<String, EntryKind> = BTreeMap::new();
        for file in files.keys().filter(|f| f.starts_with(&prefix)) {
            let rest = &file[prefix.len()..];
            match rest.split_once('/') {
                Some((dir, _)) => children.insert(dir.to_string(), EntryKind::Tree),
                None => children.insert(rest.to_string(), EntryKind::Blob),
            };
        }
        // GitLab answers 404 both for a missing path and for the root of an
        // empty repository.
        if children.is_empty() {
            return None;
        }
        Some(
            children
                .into_iter()
                .map(|(name, kind)| TreeEntry {
                    path: format!("{prefix}{name}"),
                    kind,
                    name,
                })
                .collect(),
        )
    }
}

pub fn key_subgroups(group_id: u64) -> String {
    format!("subgroups:{group_id}")
}

pub fn key_projects(group_id: u64) -> String {
    format!("projects:{group_id}")
}

pub fn key_tree(project_id: u64, path: &str) -> String {
    format!("tree:{project_id}:{path}")
}

pub fn key_raw(project_id: u64, path: &str) -> String {
    format!("raw:{project_id}:{path}")
}

fn api_error(status: u16, message: &str) -> GitLabError {
    GitLabError::Api {
        status,
        message: message.to_string(),
    }
}

impl GitLabApi for FakeGitLab {
    async fn group(&self, id: &str) -> Result<GroupNode, GitLabError> {
        self.check(&format!("group:{id}"))?;
        self.groups
            .iter()
            .find(|g| g.full_path == id || g.id.to_string() == id)
            .cloned()
            .ok_or_else(|| api_error(404, "404 Group Not Found"))
    }

    async fn subgroups(&self, group_id: u64, page: u32) -> Result<Page<GroupNode>, GitLabError> {
        self.check(&key_subgroups(group_id))?;
        let children: Vec<GroupNode> = self
            .groups
            .iter()
            .filter(|g| g.parent_id == Some(group_id))
            .cloned()
            .collect();
        Ok(self.paginate(&children, page))
    }

    async fn group_projects(
        &self,
        group_id: u64,
        page: u32,
    ) -> Result<Page<ProjectNode>, GitLabError> {
        self.check(&key_projects(group_id))?;
        let projects: Vec<ProjectNode> = self
            .projects
            .iter()
            .filter(|(g, _)| *g == group_id)
            .map(|(_, p)| p.clone())
            .collect();
        Ok(self.paginate(&projects, page))
    }

    async fn tree(
        &self,
        project_id: u64,
        path: &str,
        _git_ref: Option<&str>,
        page: u32,
    ) -> Result<Page<TreeEntry>, GitLabError> {
        self.check(&key_tree(project_id, path))?;
        let entries = self
            .list_dir(project_id, path)
            .ok_or_else(|| api_error(404, "404 Tree Not Found"))?;
        Ok(self.paginate(&entries, page))
    }

    async fn raw_file(
        &self,
        project_id: u64,
        path: &str,
        _git_ref: Option<&str>,
    ) -> Result<Vec<u8>, GitLabError> {
        let key = key_raw(project_id, path);
        self.check(&key)?;
        if self.missing.contains(&key) {
            return Err(api_error(404, "404 File Not Found"));
        }
        self.files
            .get(&project_id)
            .and_then(|files| files.get(path))
            .cloned()
            .ok_or_else(|| api_error(404, "404 File Not Found"))
    }
}

/// Options for a run against `root_group`, writing under `local_root`, with
/// retries that never sleep.
pub fn options(root_group: &str, local_root: &Path) -> WalkOptions {
    WalkOptions {
        retry: RetryPolicy::immediate(3),
        ..WalkOptions::new(root_group, local_root)
    }
}

/// Every file under `root`, as (relative path with `/`, bytes), sorted.
pub fn local_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut out = Vec::new();
    collect(root, root, &mut out);
    out.sort();
    out
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.push((rel, std::fs::read(&path).unwrap()));
        }
    }
}
