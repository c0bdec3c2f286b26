//! The scroll-and-match search loop.
//!
//! Infinite-scroll feeds only render what has been scrolled into reach, so
//! the loop alternates between scanning the currently rendered content and
//! triggering one more scroll increment, up to a configured budget.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::query::{MatchStrategy, SearchQuery};
use crate::session::{BrowserSession, WaitCondition};
use crate::similarity::{normalize, similarity};

/// A matched element, ready to be clicked.
#[derive(Debug, Clone)]
pub struct Located<N> {
    pub node: N,
    /// 1.0 for exact matches; the similarity ratio otherwise.
    pub score: f64,
    /// Scroll attempts performed when the match was recorded.
    pub scrolls: u32,
}

/// Scroll the feed at `query.profile_url` until the target post is found or
/// the scroll budget runs out.
///
/// Exact strategy: succeeds the moment the exact text is rendered (zero
/// scrolls if it is visible on the first page). Fuzzy strategy: keeps the
/// best-scoring candidate seen so far, stops early once it clears the
/// early-stop threshold, and still succeeds with the best candidate at
/// scroll exhaustion as long as it clears the base threshold.
///
/// The best score never decreases across iterations; equal scores keep the
/// first-encountered candidate, so results are deterministic for a
/// deterministic DOM order.
pub async fn run_search<S: BrowserSession>(
    session: &S,
    query: &SearchQuery,
) -> Result<Located<S::Node>> {
    query.validate()?;

    session.navigate(&query.profile_url).await?;

    let mut attempt: u32 = 0;
    let mut best: Option<Located<S::Node>> = None;
    let mut seen: HashSet<S::Node> = HashSet::new();

    loop {
        match query.strategy {
            MatchStrategy::Exact => {
                if session.is_visible(&query.target_text).await? {
                    if let Some(found) = exact_node(session, query, attempt).await {
                        debug!(scrolls = attempt, "exact target visible");
                        return Ok(found);
                    }
                    // A visible probe with no taggable node means the feed
                    // re-rendered mid-scan; the next iteration probes again.
                }
            }
            MatchStrategy::Fuzzy { threshold, early_stop } => {
                scan_candidates(session, query, threshold, attempt, &mut seen, &mut best).await;
                if let Some(found) = best.take_if(|b| b.score >= early_stop) {
                    debug!(
                        score = found.score,
                        scrolls = attempt,
                        "early-stop threshold reached"
                    );
                    return Ok(found);
                }
            }
        }

        if attempt >= query.max_scrolls {
            break;
        }

        let height = session.content_height().await?;
        session.scroll_to_bottom().await?;
        attempt += 1;
        debug!(attempt, max_scrolls = query.max_scrolls, "scroll attempt");

        // Bounded wait for lazy-loaded content. A stalled feed must not
        // hang the loop, so the outcome is advisory either way.
        match session
            .wait_for(WaitCondition::ContentHeightAbove(height), query.scroll_wait)
            .await
        {
            Ok(true) => {}
            Ok(false) => debug!(attempt, "content height did not grow before the wait expired"),
            Err(e) => warn!(attempt, error = %e, "content wait failed; continuing"),
        }
    }

    // Best-effort fuzzy result at scroll exhaustion still counts: everything
    // stored in `best` already cleared the base threshold.
    best.ok_or(Error::PostNotFound { scrolls: attempt })
}

/// Score every not-yet-seen rendered candidate, keeping the strictly best
/// one that clears `threshold`. Scan failures are logged and skipped; a
/// feed mid-rerender just means fewer candidates this pass.
async fn scan_candidates<S: BrowserSession>(
    session: &S,
    query: &SearchQuery,
    threshold: f64,
    attempt: u32,
    seen: &mut HashSet<S::Node>,
    best: &mut Option<Located<S::Node>>,
) {
    let candidates = match session.find_text_nodes(query.min_text_len).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(attempt, error = %e, "candidate scan failed; skipping this pass");
            return;
        }
    };

    for candidate in candidates {
        if !seen.insert(candidate.node.clone()) {
            // Already scored on an earlier scan.
            continue;
        }
        if normalize(&candidate.text).chars().count() < query.min_text_len {
            continue;
        }

        let score = similarity(&candidate.text, &query.target_text);
        let current = best.as_ref().map(|b| b.score).unwrap_or(0.0);
        // Strictly greater, so ties keep the first-encountered candidate.
        if score >= threshold && score > current {
            debug!(score, scrolls = attempt, "new best candidate");
            *best = Some(Located {
                node: candidate.node,
                score,
                scrolls: attempt,
            });
        }
    }
}

/// Find the node whose normalized text equals the target's. Errors here are
/// transient scan failures, treated the same as an empty scan.
async fn exact_node<S: BrowserSession>(
    session: &S,
    query: &SearchQuery,
    attempt: u32,
) -> Option<Located<S::Node>> {
    let wanted = normalize(&query.target_text);
    let candidates = match session.find_text_nodes(query.min_text_len).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(attempt, error = %e, "exact-match scan failed; will re-probe");
            return None;
        }
    };

    candidates
        .into_iter()
        .find(|c| normalize(&c.text) == wanted)
        .map(|c| Located {
            node: c.node,
            score: 1.0,
            scrolls: attempt,
        })
}
