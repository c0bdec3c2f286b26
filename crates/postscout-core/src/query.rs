use std::time::Duration;

use crate::error::{Error, Result};
use crate::similarity::normalize;

/// Scroll budget before the search gives up.
pub const DEFAULT_MAX_SCROLLS: u32 = 100;

/// Minimum fuzzy score for a candidate to count as a match at all.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.90;

/// Score at which the fuzzy loop stops scrolling for a better match.
pub const DEFAULT_EARLY_STOP: f64 = 0.95;

/// Minimum candidate text length, in characters. Filters out UI chrome
/// (timestamps, button labels) and doubles as the minimum legal target
/// length.
pub const DEFAULT_MIN_TEXT_LEN: usize = 20;

/// Cap on the post-scroll wait for lazy-loaded content.
pub const DEFAULT_SCROLL_WAIT: Duration = Duration::from_secs(5);

/// Cap on the wait for the URL to change after clicking the match.
pub const DEFAULT_NAVIGATION_WAIT: Duration = Duration::from_secs(30);

/// How candidate text is compared against the target.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchStrategy {
    /// The rendered text must equal the target exactly.
    Exact,
    /// Similarity-ratio matching. `threshold` is the floor for a candidate
    /// to qualify; `early_stop` ends the search without scrolling further.
    Fuzzy { threshold: f64, early_stop: f64 },
}

impl MatchStrategy {
    /// Fuzzy matching with the default 0.90 / 0.95 thresholds.
    pub fn fuzzy() -> Self {
        MatchStrategy::Fuzzy {
            threshold: DEFAULT_FUZZY_THRESHOLD,
            early_stop: DEFAULT_EARLY_STOP,
        }
    }
}

/// Everything the search loop needs to know, passed in explicitly.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Profile page to search, e.g. `https://x.com/SomeUser`.
    pub profile_url: String,
    /// Post text to look for.
    pub target_text: String,
    pub strategy: MatchStrategy,
    pub max_scrolls: u32,
    pub min_text_len: usize,
    pub scroll_wait: Duration,
    pub navigation_wait: Duration,
}

impl SearchQuery {
    pub fn new(profile_url: impl Into<String>, target_text: impl Into<String>, strategy: MatchStrategy) -> Self {
        Self {
            profile_url: profile_url.into(),
            target_text: target_text.into(),
            strategy,
            max_scrolls: DEFAULT_MAX_SCROLLS,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            scroll_wait: DEFAULT_SCROLL_WAIT,
            navigation_wait: DEFAULT_NAVIGATION_WAIT,
        }
    }

    /// Reject queries the loop cannot meaningfully run. Called before any
    /// browser interaction happens.
    pub fn validate(&self) -> Result<()> {
        let normalized = normalize(&self.target_text);
        if normalized.is_empty() {
            return Err(Error::InvalidTarget("target text is empty".into()));
        }
        if normalized.chars().count() < self.min_text_len {
            return Err(Error::InvalidTarget(format!(
                "target text is {} characters after normalization; at least {} are required to distinguish a post from UI chrome",
                normalized.chars().count(),
                self.min_text_len
            )));
        }
        if let MatchStrategy::Fuzzy { threshold, early_stop } = self.strategy {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::InvalidConfig(format!(
                    "similarity threshold {threshold} is outside [0, 1]"
                )));
            }
            if !(0.0..=1.0).contains(&early_stop) {
                return Err(Error::InvalidConfig(format!(
                    "early-stop threshold {early_stop} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_target() -> &'static str {
        "a perfectly reasonable post text to search for"
    }

    #[test]
    fn test_valid_query_passes() {
        let q = SearchQuery::new("https://x.com/user", long_target(), MatchStrategy::Exact);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_empty_target_rejected() {
        let q = SearchQuery::new("https://x.com/user", "   \n ", MatchStrategy::Exact);
        assert!(matches!(q.validate(), Err(Error::InvalidTarget(_))));
    }

    #[test]
    fn test_short_target_rejected() {
        let q = SearchQuery::new("https://x.com/user", "too short", MatchStrategy::fuzzy());
        assert!(matches!(q.validate(), Err(Error::InvalidTarget(_))));
    }

    #[test]
    fn test_out_of_range_threshold_is_a_config_error() {
        let q = SearchQuery::new(
            "https://x.com/user",
            long_target(),
            MatchStrategy::Fuzzy { threshold: 1.5, early_stop: 0.95 },
        );
        let err = q.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().starts_with("Invalid search configuration"));
    }

    #[test]
    fn test_out_of_range_early_stop_is_a_config_error() {
        let q = SearchQuery::new(
            "https://x.com/user",
            long_target(),
            MatchStrategy::Fuzzy { threshold: 0.9, early_stop: -0.1 },
        );
        assert!(matches!(q.validate(), Err(Error::InvalidConfig(_))));
    }
}
