//! File-backed feed list and feed status listing.
//!
//! [`JsonFileFeedSource`] reads the JSON feed list named in `[feeds].path`.
//! [`list_feeds`] backs the `feedscan feeds` command.
//!
//! # Feed list format
//!
//! ```json
//! [
//!   { "site": "npr", "link": "http://www.npr.org/rss/rss.php?id=1001", "type": "rss" }
//! ]
//! ```

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;

use feedscan_core::{parse_feed_list, Feed, FeedSource, MatcherRegistry, SearchError};

/// Reads the feed list from a JSON file on every search.
#[derive(Debug, Clone)]
pub struct JsonFileFeedSource {
    path: PathBuf,
}

impl JsonFileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for JsonFileFeedSource {
    async fn retrieve(&self) -> Result<Vec<Feed>, SearchError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SearchError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let feeds = parse_feed_list(&content)?;
        tracing::debug!(path = %self.path.display(), count = feeds.len(), "loaded feed list");
        Ok(feeds)
    }
}

/// One row of `feedscan feeds`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedStatus {
    pub name: String,
    pub feed_type: String,
    pub uri: String,
    /// Whether a dedicated matcher is registered for the feed's type.
    pub matched: bool,
}

/// Pair every feed with whether its type has a dedicated matcher.
pub fn feed_statuses(feeds: &[Feed], registry: &MatcherRegistry) -> Vec<FeedStatus> {
    feeds
        .iter()
        .map(|feed| FeedStatus {
            name: feed.name.clone(),
            feed_type: feed.feed_type.clone(),
            uri: feed.uri.clone(),
            matched: registry.lookup(&feed.feed_type).is_some(),
        })
        .collect()
}

/// CLI entry point for `feedscan feeds`.
pub async fn list_feeds(source: &dyn FeedSource, registry: &MatcherRegistry) -> Result<()> {
    let feeds = source.retrieve().await?;
    let statuses = feed_statuses(&feeds, registry);

    println!("{:<20} {:<10} {:<8} URI", "FEED", "TYPE", "MATCHER");
    for s in &statuses {
        let matcher = if s.matched { "yes" } else { "default" };
        println!("{:<20} {:<10} {:<8} {}", s.name, s.feed_type, matcher, s.uri);
    }

    Ok(())
}
