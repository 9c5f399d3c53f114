//! The [`FeedSource`] trait and an in-memory implementation.
//!
//! The application crate provides the file-backed source; anything that can
//! produce a list of [`Feed`]s can stand in for it.

use async_trait::async_trait;

use crate::error::SearchError;
use crate::models::Feed;

/// Supplies the feeds to search.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Load the feed list.
    ///
    /// Fails with [`SearchError::SourceUnavailable`] when the underlying
    /// resource cannot be read. That failure ends the whole search.
    async fn retrieve(&self) -> Result<Vec<Feed>, SearchError>;
}

/// A fixed, in-memory feed list.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedSource {
    feeds: Vec<Feed>,
}

impl StaticFeedSource {
    pub fn new(feeds: Vec<Feed>) -> Self {
        Self { feeds }
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn retrieve(&self) -> Result<Vec<Feed>, SearchError> {
        Ok(self.feeds.clone())
    }
}

/// Parse a JSON array of feeds (the `data.json` format).
pub fn parse_feed_list(json: &str) -> Result<Vec<Feed>, SearchError> {
    serde_json::from_str(json)
        .map_err(|e| SearchError::SourceUnavailable(format!("invalid feed list: {}", e)))
}
