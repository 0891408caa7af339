//! URL construction for the GitLab REST endpoints the mirror reads.

/// Ref used for raw file reads when neither a configured ref nor a
/// project default branch is known.
const FALLBACK_REF: &str = "HEAD";

pub fn group(base: &str, id: &str) -> String {
    format!("{base}/groups/{}", urlencoding::encode(id))
}

pub fn subgroups(base: &str, group_id: u64, per_page: u32, page: u32) -> String {
    format!("{base}/groups/{group_id}/subgroups?per_page={per_page}&page={page}")
}

/// Direct projects only; shared projects are reached through their own group.
pub fn group_projects(base: &str, group_id: u64, per_page: u32, page: u32) -> String {
    format!(
        "{base}/groups/{group_id}/projects?include_subgroups=false&with_shared=false&per_page={per_page}&page={page}"
    )
}

pub fn tree(
    base: &str,
    project_id: u64,
    path: &str,
    git_ref: Option<&str>,
    per_page: u32,
    page: u32,
) -> String {
    let mut url = format!(
        "{base}/projects/{project_id}/repository/tree?recursive=false&per_page={per_page}&page={page}"
    );
    if !path.is_empty() {
        url.push_str("&path=");
        url.push_str(&urlencoding::encode(path));
    }
    if let Some(git_ref) = git_ref {
        url.push_str("&ref=");
        url.push_str(&urlencoding::encode(git_ref));
    }
    url
}

pub fn raw_file(base: &str, project_id: u64, path: &str, git_ref: Option<&str>) -> String {
    format!(
        "{base}/projects/{project_id}/repository/files/{}/raw?ref={}",
        urlencoding::encode(path),
        urlencoding::encode(git_ref.unwrap_or(FALLBACK_REF)),
    )
}
