//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`GitLabError::Api`]) and pagination header
//! parsing so the endpoint modules stay focused on request construction.

use crate::error::GitLabError;

/// Header GitLab sets on offset-paginated listings; empty on the last page.
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Fallback wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`GitLabError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** → [`GitLabError::Api`] with status code and
///   the `message` from GitLab's JSON error body when present.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GitLabError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(GitLabError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(GitLabError::Api {
            status,
            message: api_message(&body),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// The next page number, or `None` on the last page.
pub fn next_page(resp: &reqwest::Response) -> Option<u32> {
    resp.headers()
        .get(NEXT_PAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok())
}

/// GitLab error bodies look like `{"message": "404 Project Not Found"}`.
/// `message` can also be an object of field errors; anything that is not
/// a plain string falls back to the raw body.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
