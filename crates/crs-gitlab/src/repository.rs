//! Repository tree listing and raw file reads.

use crs_core::TreeEntry;

use crate::{GitLabClient, Page, endpoints, error::GitLabError};

impl GitLabClient {
    /// One page of the entries directly below `path` (non-recursive).
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError`] if the request fails, GitLab returns a
    /// non-success status (404 for a missing path or empty repository),
    /// or the response cannot be parsed.
    pub async fn list_tree(
        &self,
        project_id: u64,
        path: &str,
        git_ref: Option<&str>,
        page: u32,
    ) -> Result<Page<TreeEntry>, GitLabError> {
        self.get_page(&endpoints::tree(
            &self.base_url,
            project_id,
            path,
            git_ref,
            self.per_page,
            page,
        ))
        .await
    }

    /// Raw content of the file at `path`, byte-for-byte.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError`] if the request fails or GitLab returns a
    /// non-success status.
    pub async fn fetch_raw_file(
        &self,
        project_id: u64,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<Vec<u8>, GitLabError> {
        let resp = self
            .get(&endpoints::raw_file(&self.base_url, project_id, path, git_ref))
            .await?;
        Ok(resp.bytes().await?.to_vec())
    }
}
