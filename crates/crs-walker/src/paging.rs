//! Draining paginated listings.

use std::future::Future;

use crs_gitlab::{GitLabError, Page};

use crate::retry::{RetryPolicy, with_retry};

/// Fetch every page starting from page 1, retrying each page on its own.
///
/// Stops when a page reports no successor, or when the reported successor
/// does not advance (a misbehaving server must not loop forever).
pub async fn drain_pages<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut fetch: F,
) -> Result<Vec<T>, GitLabError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, GitLabError>>,
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch = with_retry(policy, what, || fetch(page)).await?;
        items.extend(batch.items);
        match batch.next_page {
            Some(next) if next > page => page = next,
            _ => return Ok(items),
        }
    }
}
