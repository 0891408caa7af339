//! Group, subgroup and project listing.

use crs_core::{GroupNode, ProjectNode};

use crate::{GitLabClient, Page, endpoints, error::GitLabError};

impl GitLabClient {
    /// Fetch a group by numeric id or URL path (`otc/backend`).
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError`] if the request fails, GitLab returns a
    /// non-success status, or the response cannot be parsed.
    pub async fn fetch_group(&self, id: &str) -> Result<GroupNode, GitLabError> {
        self.get_json(&endpoints::group(&self.base_url, id)).await
    }

    /// Immediate subgroups of `group_id`, one page.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_group`].
    pub async fn list_subgroups(
        &self,
        group_id: u64,
        page: u32,
    ) -> Result<Page<GroupNode>, GitLabError> {
        self.get_page(&endpoints::subgroups(&self.base_url, group_id, self.per_page, page))
            .await
    }

    /// Projects directly inside `group_id`, one page.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_group`].
    pub async fn list_group_projects(
        &self,
        group_id: u64,
        page: u32,
    ) -> Result<Page<ProjectNode>, GitLabError> {
        self.get_page(&endpoints::group_projects(
            &self.base_url,
            group_id,
            self.per_page,
            page,
        ))
        .await
    }
}
