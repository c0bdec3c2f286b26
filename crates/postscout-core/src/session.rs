use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// A DOM text node under consideration, paired with its rendered text.
///
/// Ephemeral: valid only for the scan that produced it. The node handle
/// stays stable across scans as long as the element survives in the DOM.
#[derive(Debug, Clone)]
pub struct Candidate<N> {
    pub node: N,
    pub text: String,
}

/// A condition for [`BrowserSession::wait_for`].
#[derive(Debug, Clone, PartialEq)]
pub enum WaitCondition {
    /// The page's scrollable content height exceeds the given value
    /// (new feed items finished rendering).
    ContentHeightAbove(u64),
    /// The current URL differs from the given one (click navigation
    /// completed).
    UrlChangedFrom(String),
}

/// The browser collaborator the search loop drives.
///
/// Implementations own page state; the loop owns the session exclusively
/// for its whole run, so methods take `&self` and nothing needs interior
/// coordination. All waits are bounded by the caller-supplied timeout.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Handle to a rendered element. `Eq + Hash` lets the loop skip nodes
    /// it has already scored on earlier scans.
    type Node: Clone + Send + Sync + Eq + Hash;

    /// Load a URL and wait for its initial content to settle.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Enumerate currently-rendered text blocks of at least `min_len`
    /// characters. Read-only; nodes that error mid-scan are skipped,
    /// not reported.
    async fn find_text_nodes(&self, min_len: usize) -> Result<Vec<Candidate<Self::Node>>>;

    /// Whether an element with exactly this text is currently rendered.
    async fn is_visible(&self, exact_text: &str) -> Result<bool>;

    /// Trigger one scroll increment at the bottom of the feed.
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Current scrollable content height.
    async fn content_height(&self) -> Result<u64>;

    /// Wait until `condition` holds or `timeout` elapses. Returns whether
    /// the condition was observed.
    async fn wait_for(&self, condition: WaitCondition, timeout: Duration) -> Result<bool>;

    /// Dispatch a click on a previously returned node.
    async fn click(&self, node: &Self::Node) -> Result<()>;

    async fn current_url(&self) -> Result<String>;
}
