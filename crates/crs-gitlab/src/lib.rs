//! # crs-gitlab
//!
//! Read-only GitLab REST client for crs-mirror.
//!
//! Covers the endpoint families the mirror needs:
//! - group lookup by path or id
//! - subgroups and direct projects of a group
//! - one level of a repository tree
//! - raw file content by path
//!
//! All listings are offset-paginated; callers request one page at a time and
//! follow [`Page::next_page`] until it is `None`. The [`GitLabApi`] trait is
//! the seam the traversal engine is written against.

mod endpoints;
mod error;
mod groups;
mod http;
mod repository;

pub use error::GitLabError;

use std::time::Duration;

use crs_core::{GroupNode, ProjectNode, TreeEntry};
use serde::de::DeserializeOwned;

// ── Types ──────────────────────────────────────────────────────────

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` on the last page.
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}

/// Read operations the mirror performs against GitLab.
///
/// Pages are 1-based, as in the REST API.
#[allow(async_fn_in_trait)]
pub trait GitLabApi {
    /// Look up a group by numeric id or full path.
    async fn group(&self, id: &str) -> Result<GroupNode, GitLabError>;

    async fn subgroups(&self, group_id: u64, page: u32) -> Result<Page<GroupNode>, GitLabError>;

    /// Projects directly inside the group (no subgroups, no shared projects).
    async fn group_projects(
        &self,
        group_id: u64,
        page: u32,
    ) -> Result<Page<ProjectNode>, GitLabError>;

    /// Entries one level below `path` (`""` is the repository root).
    async fn tree(
        &self,
        project_id: u64,
        path: &str,
        git_ref: Option<&str>,
        page: u32,
    ) -> Result<Page<TreeEntry>, GitLabError>;

    /// Raw bytes of the file at `path`.
    async fn raw_file(
        &self,
        project_id: u64,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<Vec<u8>, GitLabError>;
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the GitLab REST API.
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    per_page: u32,
}

impl GitLabClient {
    /// Create a client for `base_url` (e.g. `https://gitlab.com/api/v4`).
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(
        base_url: &str,
        token: &str,
        per_page: u32,
        timeout: Duration,
    ) -> Result<Self, GitLabError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("crs-mirror/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            per_page: per_page.clamp(1, 100),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, GitLabError> {
        tracing::trace!(url, "GET");
        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        http::check_response(resp).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitLabError> {
        let resp = self.get(url).await?;
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| GitLabError::Parse(e.to_string()))
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, GitLabError> {
        let resp = self.get(url).await?;
        let next_page = http::next_page(&resp);
        let body = resp.bytes().await?;
        let items = serde_json::from_slice(&body).map_err(|e| GitLabError::Parse(e.to_string()))?;
        Ok(Page { items, next_page })
    }
}

impl GitLabApi for GitLabClient {
    async fn group(&self, id: &str) -> Result<GroupNode, GitLabError> {
        self.fetch_group(id).await
    }

    async fn subgroups(&self, group_id: u64, page: u32) -> Result<Page<GroupNode>, GitLabError> {
        self.list_subgroups(group_id, page).await
    }

    async fn group_projects(
        &self,
        group_id: u64,
        page: u32,
    ) -> Result<Page<ProjectNode>, GitLabError> {
        self.list_group_projects(group_id, page).await
    }

    async fn tree(
        &self,
        project_id: u64,
        path: &str,
        git_ref: Option<&str>,
        page: u32,
    ) -> Result<Page<TreeEntry>, GitLabError> {
        self.list_tree(project_id, path, git_ref, page).await
    }

    async fn raw_file(
        &self,
        project_id: u64,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<Vec<u8>, GitLabError> {
        self.fetch_raw_file(project_id, path, git_ref).await
    }
}
