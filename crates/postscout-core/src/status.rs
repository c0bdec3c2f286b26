//! Turning a matched feed element into a numeric status identifier.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::error::{Error, Result};
use crate::query::SearchQuery;
use crate::search::{Located, run_search};
use crate::session::{BrowserSession, WaitCondition};

lazy_static! {
    static ref STATUS_ID_RE: Regex = Regex::new(r"/status/(\d+)").unwrap();
}

/// The outcome of a successful search: the post's numeric identifier plus
/// how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct PostId {
    pub id: String,
    pub score: f64,
    pub scrolls: u32,
}

/// Extract the numeric identifier from a `/status/<digits>` path segment.
pub fn extract_status_id(url: &str) -> Option<&str> {
    STATUS_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Click a matched node and read the post identifier off the resulting URL.
///
/// Three distinct failures: the click itself ([`Error::ClickFailed`]), the
/// URL never leaving the feed page within the bound
/// ([`Error::NavigationTimeout`]), and the URL changing to something without
/// a numeric status segment ([`Error::IdentifierUnextractable`]).
pub async fn resolve_status_id<S: BrowserSession>(
    session: &S,
    node: &S::Node,
    navigation_wait: Duration,
) -> Result<String> {
    let origin = session.current_url().await?;

    session.click(node).await.map_err(|e| match e {
        Error::ClickFailed(_) => e,
        other => Error::ClickFailed(other.to_string()),
    })?;

    let changed = session
        .wait_for(WaitCondition::UrlChangedFrom(origin.clone()), navigation_wait)
        .await?;
    if !changed {
        return Err(Error::NavigationTimeout(format!(
            "URL stayed at {origin} for {navigation_wait:?} after clicking the post"
        )));
    }

    let url = session.current_url().await?;
    match extract_status_id(&url) {
        Some(id) => Ok(id.to_string()),
        None => Err(Error::IdentifierUnextractable(url)),
    }
}

/// Run the full search: scroll-and-match, click, identifier extraction.
pub async fn locate_post<S: BrowserSession>(session: &S, query: &SearchQuery) -> Result<PostId> {
    let Located { node, score, scrolls } = run_search(session, query).await?;
    info!(score, scrolls, "post located; resolving status id");
    let id = resolve_status_id(session, &node, query.navigation_wait).await?;
    Ok(PostId { id, score, scrolls })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_id_from_status_url() {
        assert_eq!(
            extract_status_id("https://x.com/SomeUser/status/1234567890123456789"),
            Some("1234567890123456789")
        );
    }

    #[test]
    fn test_extracts_id_with_trailing_segments() {
        assert_eq!(
            extract_status_id("https://x.com/SomeUser/status/42/photo/1"),
            Some("42")
        );
    }

    #[test]
    fn test_no_id_without_status_segment() {
        assert_eq!(extract_status_id("https://x.com/SomeUser"), None);
        assert_eq!(extract_status_id("https://x.com/SomeUser/photo/12345"), None);
    }

    #[test]
    fn test_no_id_for_non_numeric_segment() {
        assert_eq!(extract_status_id("https://x.com/SomeUser/status/latest"), None);
    }
}
