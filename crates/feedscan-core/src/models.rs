//! Core data models: the feeds that are searched and the matches they yield.

use serde::{Deserialize, Serialize};

/// A named, typed data source to be searched.
///
/// The on-disk feed list uses the keys `site`, `link`, and `type`;
/// `name` and `uri` are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(rename = "site", alias = "name")]
    pub name: String,
    #[serde(rename = "link", alias = "uri")]
    pub uri: String,
    /// Tag used to look up the matcher for this feed.
    #[serde(rename = "type")]
    pub feed_type: String,
}

impl Feed {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        feed_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            feed_type: feed_type.into(),
        }
    }
}

/// One hit: a piece of content plus the feed it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Name of the feed that produced this match.
    pub source: String,
    /// Which item field contained the term (`"title"`, `"description"`).
    pub field: String,
    /// Text of the matching field.
    pub content: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
}

impl Match {
    pub fn new(
        source: impl Into<String>,
        field: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            field: field.into(),
            content: content.into(),
            description: None,
            date: None,
            link: None,
        }
    }
}
