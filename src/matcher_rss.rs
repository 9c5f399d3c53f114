//! RSS 2.0 matcher.
//!
//! Fetches the feed over HTTP, parses the `<item>` elements of the channel,
//! and returns one [`Match`] per item whose title or description contains
//! the search term. The title is checked first.
//!
//! # Failure mapping
//!
//! | Condition | Error |
//! |-----------|-------|
//! | transport error, timeout, non-2xx status | `FetchFailed` |
//! | malformed XML, no `<rss>`/`<channel>` root, truncated `<item>` | `ParseFailed` |

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use feedscan_core::matcher::contains_term;
use feedscan_core::{Feed, Match, Matcher, SearchError};

use crate::config::HttpConfig;

/// Feed type tag this matcher is registered under.
pub const RSS_TAG: &str = "rss";

pub struct RssMatcher {
    client: reqwest::Client,
}

impl RssMatcher {
    /// Build a matcher with its own HTTP client configured from `[http]`.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, feed: &Feed) -> Result<Vec<u8>, SearchError> {
        let fetch_failed = |reason: String| SearchError::FetchFailed {
            feed: feed.name.clone(),
            reason,
        };

        let resp = self
            .client
            .get(&feed.uri)
            .send()
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_failed(format!("HTTP response error {}", status)));
        }

        let body = resp.bytes().await.map_err(|e| fetch_failed(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Matcher for RssMatcher {
    fn name(&self) -> &str {
        RSS_TAG
    }

    async fn search(&self, feed: &Feed, term: &str) -> Result<Vec<Match>, SearchError> {
        let body = self.fetch(feed).await?;
        let items = parse_rss(&body).map_err(|reason| SearchError::ParseFailed {
            feed: feed.name.clone(),
            reason,
        })?;

        tracing::debug!(feed = %feed.name, items = items.len(), "parsed rss feed");

        Ok(items
            .into_iter()
            .filter_map(|item| item.into_match(&feed.name, term))
            .collect())
    }
}

/// One `<item>` of an RSS channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
}

impl RssItem {
    /// Turn the item into a match if its title or description holds `term`.
    pub fn into_match(self, source: &str, term: &str) -> Option<Match> {
        let (field, content) = if contains_term(&self.title, term) {
            ("title", self.title)
        } else if contains_term(&self.description, term) {
            ("description", self.description.clone())
        } else {
            return None;
        };

        let mut m = Match::new(source, field, content);
        m.description = non_empty(self.description);
        m.link = non_empty(self.link);
        m.date = non_empty(self.pub_date).map(|d| normalize_date(&d));
        Some(m)
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// RSS dates are RFC 2822; emit RFC 3339 when they parse, verbatim otherwise.
fn normalize_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc2822(raw)
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Debug, Clone, Copy)]
enum ItemField {
    Title,
    Description,
    Link,
    PubDate,
}

impl ItemField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Self::Title),
            b"description" => Some(Self::Description),
            b"link" => Some(Self::Link),
            b"pubDate" => Some(Self::PubDate),
            _ => None,
        }
    }

    fn slot<'a>(&self, item: &'a mut RssItem) -> &'a mut String {
        match self {
            Self::Title => &mut item.title,
            Self::Description => &mut item.description,
            Self::Link => &mut item.link,
            Self::PubDate => &mut item.pub_date,
        }
    }
}

/// Parse the items of an RSS 2.0 document.
///
/// Only unprefixed `title`, `description`, `link`, and `pubDate` children
/// of `<item>` are read; text and CDATA sections are both accepted. Markup
/// nested inside one of those fields (unescaped inline HTML) is dropped but
/// its text is kept. Each field is trimmed once, when it closes.
pub fn parse_rss(xml: &[u8]) -> Result<Vec<RssItem>, String> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut saw_root = false;
    let mut items = Vec::new();
    let mut current: Option<RssItem> = None;
    // Active field and how many elements deep we are inside it.
    let mut field: Option<(ItemField, usize)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if let Some((_, depth)) = field.as_mut() {
                    *depth += 1;
                } else {
                    let name = e.name();
                    match name.as_ref() {
                        b"rss" | b"channel" => saw_root = true,
                        b"item" => current = Some(RssItem::default()),
                        tag if current.is_some() => {
                            field = ItemField::from_tag(tag).map(|f| (f, 0))
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => match field {
                Some((f, 0)) => {
                    if let Some(item) = current.as_mut() {
                        let slot = f.slot(item);
                        *slot = slot.trim().to_string();
                    }
                    field = None;
                }
                Some((f, depth)) => field = Some((f, depth - 1)),
                None => {
                    if e.name().as_ref() == b"item" {
                        if let Some(item) = current.take() {
                            items.push(item);
                        }
                    }
                }
            },
            Ok(Event::Text(te)) => {
                if let (Some((f, _)), Some(item)) = (field, current.as_mut()) {
                    let text = te
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&te).into_owned());
                    f.slot(item).push_str(&text);
                }
            }
            Ok(Event::CData(cd)) => {
                if let (Some((f, _)), Some(item)) = (field, current.as_mut()) {
                    f.slot(item).push_str(&String::from_utf8_lossy(&cd));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    if current.is_some() {
        return Err("unexpected end of document inside <item>".to_string());
    }
    if !saw_root {
        return Err("not an RSS document: no <rss> or <channel> element".to_string());
    }

    Ok(items)
}
