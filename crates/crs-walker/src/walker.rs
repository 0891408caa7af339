//! Traversal engine.
//!
//! Walks groups → subgroups → projects → repository trees depth-first with
//! an explicit work-list. Every matched `code-review-scores` directory is
//! handed to the [`Materializer`]. A failing group, project or tree path is
//! reported as abandoned and its siblings are still walked; only failing to
//! resolve the root group stops the run.

use std::collections::HashSet;
use std::rc::Rc;

use crs_core::{
    EntryKind, EventSink, GroupNode, MirrorEvent, ProjectNode, RunSummary, TARGET_DIR_NAME,
};
use crs_gitlab::{GitLabApi, GitLabError};

use crate::error::WalkError;
use crate::materializer::Materializer;
use crate::options::WalkOptions;
use crate::paging::drain_pages;
use crate::reporter::Reporter;
use crate::retry::with_retry;

/// Pending work. Popped LIFO; children are pushed in reverse listing order
/// so they are visited in listing order.
enum WorkItem {
    Group(GroupNode),
    Project(Rc<ProjectNode>),
    /// A directory outside any target, searched for targets.
    Tree { project: Rc<ProjectNode>, path: String },
    /// A target directory, or a directory nested inside one.
    Target { project: Rc<ProjectNode>, path: String },
}

/// Mirror every `code-review-scores` directory reachable from
/// `options.root_group`.
///
/// # Errors
///
/// Returns [`WalkError`] only when the root group cannot be resolved.
/// Everything below the root is fault-isolated and shows up in the
/// returned summary instead.
pub async fn mirror<A: GitLabApi, S: EventSink>(
    api: &A,
    options: &WalkOptions,
    sink: &mut S,
) -> Result<RunSummary, WalkError> {
    Walker::new(api, options, sink).run().await
}

pub struct Walker<'a, 's, A, S> {
    api: &'a A,
    options: &'a WalkOptions,
    reporter: Reporter<'s, S>,
    seen_groups: HashSet<u64>,
    seen_projects: HashSet<u64>,
}

impl<'a, 's, A: GitLabApi, S: EventSink> Walker<'a, 's, A, S> {
    pub fn new(api: &'a A, options: &'a WalkOptions, sink: &'s mut S) -> Self {
        Self {
            api,
            options,
            reporter: Reporter::new(sink),
            seen_groups: HashSet::new(),
            seen_projects: HashSet::new(),
        }
    }

    /// Run the walk to completion.
    ///
    /// # Errors
    ///
    /// See [`mirror`].
    pub async fn run(mut self) -> Result<RunSummary, WalkError> {
        let root = self.resolve_root().await?;
        let materializer = Materializer::new(self.api, self.options);

        let mut stack = vec![WorkItem::Group(root)];
        while let Some(item) = stack.pop() {
            match item {
                WorkItem::Group(group) => self.walk_group(group, &mut stack).await,
                WorkItem::Project(project) => self.walk_project(&project, &mut stack).await,
                WorkItem::Tree { project, path } => {
                    self.walk_project_tree(&project, &path, &mut stack).await;
                }
                WorkItem::Target { project, path } => {
                    match materializer
                        .materialize(&project, &path, &mut self.reporter)
                        .await
                    {
                        Ok(subdirs) => stack.extend(subdirs.into_iter().rev().map(|path| {
                            WorkItem::Target {
                                project: Rc::clone(&project),
                                path,
                            }
                        })),
                        Err(e) => self.reporter.abandon(tree_branch(&project, &path), e),
                    }
                }
            }
        }

        Ok(self.reporter.into_summary())
    }

    async fn resolve_root(&self) -> Result<GroupNode, WalkError> {
        let id = self.options.root_group.as_str();
        with_retry(&self.options.retry, "root group lookup", || self.api.group(id))
            .await
            .map_err(|source| {
                if source.is_unauthorized() {
                    WalkError::Unauthorized { source }
                } else {
                    WalkError::RootGroupUnreachable {
                        group: id.to_string(),
                        source,
                    }
                }
            })
    }

    /// List the subgroups and direct projects of `group` and queue them,
    /// subgroups first.
    async fn walk_group(&mut self, group: GroupNode, stack: &mut Vec<WorkItem>) {
        if !self.seen_groups.insert(group.id) {
            tracing::debug!(group = %group.full_path, "group already visited");
            return;
        }
        self.reporter.emit(MirrorEvent::GroupEntered {
            full_path: group.full_path.clone(),
        });

        let retry = &self.options.retry;
        let api = self.api;
        let subgroups =
            drain_pages(retry, "subgroup listing", |page| api.subgroups(group.id, page)).await;
        let projects =
            drain_pages(retry, "project listing", |page| api.group_projects(group.id, page)).await;

        match projects {
            Ok(projects) => stack.extend(
                projects
                    .into_iter()
                    .rev()
                    .filter(|p| !self.seen_projects.contains(&p.id))
                    .map(|p| WorkItem::Project(Rc::new(p))),
            ),
            Err(e) => self
                .reporter
                .abandon(group.full_path.clone(), format!("listing projects: {e}")),
        }
        match subgroups {
            Ok(subgroups) => stack.extend(subgroups.into_iter().rev().map(WorkItem::Group)),
            Err(e) => self
                .reporter
                .abandon(group.full_path.clone(), format!("listing subgroups: {e}")),
        }
    }

    async fn walk_project(&mut self, project: &Rc<ProjectNode>, stack: &mut Vec<WorkItem>) {
        if !self.seen_projects.insert(project.id) {
            tracing::debug!(project = %project.path_with_namespace, "project already visited");
            return;
        }
        self.reporter.emit(MirrorEvent::ProjectEntered {
            path_with_namespace: project.path_with_namespace.clone(),
        });
        self.walk_project_tree(project, "", stack).await;
    }

    /// List one level of `project`'s tree at `path`: queue target
    /// directories for materialization and every other directory for
    /// further searching. Blobs outside targets are ignored.
    async fn walk_project_tree(
        &mut self,
        project: &Rc<ProjectNode>,
        path: &str,
        stack: &mut Vec<WorkItem>,
    ) {
        let git_ref = self.options.git_ref_for(project);
        let api = self.api;
        let listing = drain_pages(&self.options.retry, "tree listing", |page| {
            api.tree(project.id, path, git_ref, page)
        })
        .await;
        let entries = match listing {
            Ok(entries) => entries,
            Err(e) if is_empty_repository(project, path, &e) => {
                tracing::debug!(project = %project.path_with_namespace, "empty repository");
                return;
            }
            Err(e) => return self.reporter.abandon(tree_branch(project, path), e),
        };

        let mut children = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Tree if entry.name == TARGET_DIR_NAME => {
                    self.reporter.emit(MirrorEvent::DirectoryMatched {
                        project: project.path_with_namespace.clone(),
                        path: entry.path.clone(),
                    });
                    children.push(WorkItem::Target {
                        project: Rc::clone(project),
                        path: entry.path,
                    });
                }
                EntryKind::Tree => children.push(WorkItem::Tree {
                    project: Rc::clone(project),
                    path: entry.path,
                }),
                EntryKind::Blob if entry.name == TARGET_DIR_NAME => {
                    self.reporter.emit(MirrorEvent::TargetIsFile {
                        project: project.path_with_namespace.clone(),
                        path: entry.path,
                    });
                }
                EntryKind::Blob | EntryKind::Other => {}
            }
        }
        stack.extend(children.into_iter().rev());
    }
}

/// GitLab answers 404 for the root tree of a repository without commits,
/// which also has no default branch. That is an empty listing.
fn is_empty_repository(project: &ProjectNode, path: &str, error: &GitLabError) -> bool {
    path.is_empty() && project.default_branch.is_none() && error.status() == Some(404)
}

/// Human-readable name of a tree branch, in GitLab's URL style.
fn tree_branch(project: &ProjectNode, path: &str) -> String {
    if path.is_empty() {
        project.path_with_namespace.clone()
    } else {
        format!("{}/-/tree/{path}", project.path_with_namespace)
    }
}
