//! The [`Matcher`] extension trait and the fallback [`DefaultMatcher`].
//!
//! A matcher searches one feed for a term. Matchers are registered once per
//! feed type in a [`MatcherRegistry`](crate::registry::MatcherRegistry) and
//! shared across concurrent searches, so implementations must not keep
//! per-call mutable state.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use feedscan_core::{Feed, Match, Matcher, SearchError};
//!
//! /// Matches against the feed's own name, without fetching anything.
//! pub struct NameMatcher;
//!
//! #[async_trait]
//! impl Matcher for NameMatcher {
//!     fn name(&self) -> &str { "name" }
//!
//!     async fn search(&self, feed: &Feed, term: &str) -> Result<Vec<Match>, SearchError> {
//!         if feed.name.contains(term) {
//!             Ok(vec![Match::new(&feed.name, "name", &feed.name)])
//!         } else {
//!             Ok(Vec::new())
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::SearchError;
use crate::models::{Feed, Match};

/// Searches a single feed for a term.
#[async_trait]
pub trait Matcher: Send + Sync {
    /// Short identifier used in logs (e.g. `"rss"`).
    fn name(&self) -> &str;

    /// Search `feed` for `term` and return every match found.
    ///
    /// `term` is a literal, case-sensitive substring. Errors are confined to
    /// this feed: callers log them and carry on with the remaining feeds.
    async fn search(&self, feed: &Feed, term: &str) -> Result<Vec<Match>, SearchError>;
}

/// Literal containment check used by the built-in matchers.
pub fn contains_term(text: &str, term: &str) -> bool {
    text.contains(term)
}

/// Fallback matcher for feed types with no dedicated matcher.
///
/// Performs no fetch and never matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMatcher;

#[async_trait]
impl Matcher for DefaultMatcher {
    fn name(&self) -> &str {
        "default"
    }

    async fn search(&self, feed: &Feed, _term: &str) -> Result<Vec<Match>, SearchError> {
        tracing::debug!(
            feed = %feed.name,
            feed_type = %feed.feed_type,
            "no matcher for feed type, default matcher yields nothing"
        );
        Ok(Vec::new())
    }
}
