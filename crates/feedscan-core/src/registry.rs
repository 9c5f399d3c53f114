//! Mapping from feed-type tag to [`Matcher`].
//!
//! The registry is built once at startup, then shared read-only (behind an
//! `Arc`) with every search. It never substitutes a matcher on a failed
//! lookup: falling back to [`DEFAULT_TAG`] is the caller's decision.
//!
//! ```rust
//! use std::sync::Arc;
//! use feedscan_core::{DefaultMatcher, MatcherRegistry, DEFAULT_TAG};
//!
//! let mut registry = MatcherRegistry::new();
//! assert!(registry.lookup(DEFAULT_TAG).is_some());
//! assert!(registry.register(DEFAULT_TAG, Arc::new(DefaultMatcher)).is_err());
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::SearchError;
use crate::matcher::{DefaultMatcher, Matcher};

/// Feed type whose matcher handles every unregistered type.
pub const DEFAULT_TAG: &str = "default";

pub struct MatcherRegistry {
    matchers: BTreeMap<String, Arc<dyn Matcher>>,
}

impl MatcherRegistry {
    /// Create a registry with [`DefaultMatcher`] bound to [`DEFAULT_TAG`].
    pub fn new() -> Self {
        let mut matchers: BTreeMap<String, Arc<dyn Matcher>> = BTreeMap::new();
        matchers.insert(DEFAULT_TAG.to_string(), Arc::new(DefaultMatcher));
        Self { matchers }
    }

    /// Create a registry with no entries, not even the default.
    pub fn empty() -> Self {
        Self {
            matchers: BTreeMap::new(),
        }
    }

    /// Bind `matcher` to `feed_type`.
    ///
    /// Fails with [`SearchError::DuplicateRegistration`] if the tag is
    /// already bound; the existing entry is left untouched.
    pub fn register(
        &mut self,
        feed_type: impl Into<String>,
        matcher: Arc<dyn Matcher>,
    ) -> Result<(), SearchError> {
        let feed_type = feed_type.into();
        if self.matchers.contains_key(&feed_type) {
            return Err(SearchError::DuplicateRegistration(feed_type));
        }
        tracing::debug!(feed_type = %feed_type, matcher = matcher.name(), "registered matcher");
        self.matchers.insert(feed_type, matcher);
        Ok(())
    }

    /// Find the matcher bound to `feed_type`.
    pub fn lookup(&self, feed_type: &str) -> Option<Arc<dyn Matcher>> {
        self.matchers.get(feed_type).cloned()
    }

    pub fn has_default(&self) -> bool {
        self.matchers.contains_key(DEFAULT_TAG)
    }

    /// Registered feed types in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.matchers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Default for MatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}
