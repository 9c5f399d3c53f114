//! Error taxonomy shared by matchers, feed sources, and the orchestrator.
//!
//! | Variant | Scope | Handling |
//! |---------|-------|----------|
//! | `DuplicateRegistration` | startup | fatal to process init |
//! | `MissingDefaultMatcher` | startup | fatal to process init |
//! | `SourceUnavailable` | one search | returned to the caller |
//! | `FetchFailed` / `ParseFailed` | one feed | logged, feed yields no matches |

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// A matcher is already registered under this feed type.
    #[error("a matcher is already registered for feed type '{0}'")]
    DuplicateRegistration(String),

    /// The registry has no entry for the `"default"` feed type.
    #[error("no matcher registered for the 'default' feed type")]
    MissingDefaultMatcher,

    /// The feed list could not be loaded.
    #[error("feed source unavailable: {0}")]
    SourceUnavailable(String),

    /// The feed's content could not be fetched.
    #[error("fetching feed '{feed}' failed: {reason}")]
    FetchFailed { feed: String, reason: String },

    /// The feed's content was fetched but could not be parsed.
    #[error("parsing feed '{feed}' failed: {reason}")]
    ParseFailed { feed: String, reason: String },
}

impl SearchError {
    /// True for errors confined to a single feed.
    pub fn is_per_feed(&self) -> bool {
        matches!(
            self,
            SearchError::FetchFailed { .. } | SearchError::ParseFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_feed_classification() {
        let fetch = SearchError::FetchFailed {
            feed: "npr".into(),
            reason: "HTTP 503".into(),
        };
        assert!(fetch.is_per_feed());
        assert!(!SearchError::SourceUnavailable("missing".into()).is_per_feed());
        assert!(!SearchError::DuplicateRegistration("rss".into()).is_per_feed());
    }

    #[test]
    fn test_messages_name_the_feed() {
        let err = SearchError::ParseFailed {
            feed: "cnn".into(),
            reason: "unexpected EOF".into(),
        };
        assert_eq!(err.to_string(), "parsing feed 'cnn' failed: unexpected EOF");
    }
}
