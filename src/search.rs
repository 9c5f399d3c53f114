//! Search orchestration: fan a term out across every feed, fan the matches
//! back into one stream.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──retrieve()──▶ Dispatching ──spawn N tasks──▶ Collecting ──join──▶ Done
//!   │                                                                    ▲
//!   └──────────────── SourceUnavailable ─────────────────────────────────┘
//! ```
//!
//! One tokio task is spawned per feed into a [`JoinSet`]. Every task holds a
//! clone of the channel [`mpsc::Sender`]; the original sender belongs to a
//! collector task that drains the `JoinSet` and only then drops it. The
//! channel therefore closes exactly once, after every feed task has
//! returned, and the caller's `recv()` loop ends on its own.
//!
//! Matches from different feeds arrive in completion order. Per-feed
//! failures are logged and counted in [`SearchSummary`]; they never fail the
//! search.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use feedscan_core::{
    Feed, FeedSource, Match, Matcher, MatcherRegistry, SearchError, DEFAULT_TAG,
};

use crate::config::{Config, HttpConfig};
use crate::feeds::JsonFileFeedSource;
use crate::matcher_rss::{RssMatcher, RSS_TAG};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Where a search is in its lifecycle. Reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Dispatching,
    Collecting,
    Done,
}

/// Totals for one finished search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Feeds dispatched.
    pub feeds: usize,
    /// Feeds whose matcher returned an error or panicked.
    pub failed: usize,
    /// Matches delivered to the stream.
    pub matches: usize,
    /// Whether the search was cut short by its cancellation token.
    pub cancelled: bool,
}

/// Result of one feed task.
#[derive(Debug)]
struct FeedOutcome {
    sent: usize,
    failed: bool,
}

/// The match stream returned by [`Searcher::run`].
pub struct ResultStream {
    rx: mpsc::Receiver<Match>,
    collector: JoinHandle<SearchSummary>,
}

impl ResultStream {
    /// A stream that is already closed.
    fn closed(summary: SearchSummary) -> Self {
        let (_, rx) = mpsc::channel(1);
        Self {
            rx,
            collector: tokio::spawn(async move { summary }),
        }
    }

    /// Next match, or `None` once every feed task has finished.
    pub async fn recv(&mut self) -> Option<Match> {
        self.rx.recv().await
    }

    /// Drain the stream into a vector, then return it with the summary.
    pub async fn collect(mut self) -> (Vec<Match>, SearchSummary) {
        let mut matches = Vec::new();
        while let Some(m) = self.rx.recv().await {
            matches.push(m);
        }
        let summary = self.finish().await;
        (matches, summary)
    }

    /// Discard any unread matches and wait for the search to finish.
    pub async fn finish(mut self) -> SearchSummary {
        while self.rx.recv().await.is_some() {}
        match self.collector.await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "search collector task failed");
                SearchSummary::default()
            }
        }
    }
}

/// Runs searches against a fixed registry and feed source.
///
/// Both are injected at construction and shared read-only by every search.
#[derive(Clone)]
pub struct Searcher {
    registry: Arc<MatcherRegistry>,
    source: Arc<dyn FeedSource>,
    channel_capacity: usize,
}

impl Searcher {
    /// Fails with [`SearchError::MissingDefaultMatcher`] when `registry` has
    /// no `"default"` entry.
    pub fn new(
        registry: Arc<MatcherRegistry>,
        source: Arc<dyn FeedSource>,
    ) -> Result<Self, SearchError> {
        if !registry.has_default() {
            return Err(SearchError::MissingDefaultMatcher);
        }
        Ok(Self {
            registry,
            source,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        })
    }

    /// Build the standard searcher: RSS and default matchers, feed list from
    /// `[feeds].path`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = build_registry(&config.http)?;
        let source = JsonFileFeedSource::new(&config.feeds.path);
        let searcher = Self::new(Arc::new(registry), Arc::new(source))?
            .with_channel_capacity(config.search.channel_capacity);
        Ok(searcher)
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn registry(&self) -> &MatcherRegistry {
        &self.registry
    }

    pub fn source(&self) -> &dyn FeedSource {
        self.source.as_ref()
    }

    fn resolve(&self, feed_type: &str) -> Result<Arc<dyn Matcher>, SearchError> {
        self.registry
            .lookup(feed_type)
            .or_else(|| self.registry.lookup(DEFAULT_TAG))
            .ok_or(SearchError::MissingDefaultMatcher)
    }

    /// Search every feed for `term`.
    ///
    /// Returns [`SearchError::SourceUnavailable`] without spawning anything
    /// if the feed list cannot be loaded. Cancelling `cancel` stops all feed
    /// tasks and closes the stream early.
    pub async fn run(
        &self,
        term: &str,
        cancel: CancellationToken,
    ) -> Result<ResultStream, SearchError> {
        tracing::debug!(phase = ?SearchPhase::Idle, term, "search requested");

        let feeds = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Ok(ResultStream::closed(SearchSummary {
                    cancelled: true,
                    ..Default::default()
                }));
            }
            result = self.source.retrieve() => result.map_err(|e| match e {
                SearchError::SourceUnavailable(_) => e,
                other => SearchError::SourceUnavailable(other.to_string()),
            }),
        };
        let feeds = match feeds {
            Ok(feeds) => feeds,
            Err(e) => {
                tracing::error!(phase = ?SearchPhase::Done, error = %e, "feed source failed");
                return Err(e);
            }
        };

        let dispatch = feeds
            .into_iter()
            .map(|feed| {
                let matcher = self.resolve(&feed.feed_type)?;
                Ok((feed, matcher))
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        tracing::debug!(
            phase = ?SearchPhase::Dispatching,
            feeds = dispatch.len(),
            "dispatching"
        );

        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let term: Arc<str> = Arc::from(term);
        let feed_count = dispatch.len();

        let mut tasks = JoinSet::new();
        for (feed, matcher) in dispatch {
            tasks.spawn(search_feed(
                feed,
                matcher,
                term.clone(),
                tx.clone(),
                cancel.clone(),
            ));
        }

        tracing::debug!(phase = ?SearchPhase::Collecting, "all feed tasks launched");

        let collector = tokio::spawn(async move {
            let mut summary = SearchSummary {
                feeds: feed_count,
                ..Default::default()
            };
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(outcome) => {
                        summary.matches += outcome.sent;
                        if outcome.failed {
                            summary.failed += 1;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "feed task panicked");
                        summary.failed += 1;
                    }
                }
            }
            // Last sender: the stream closes here.
            drop(tx);
            summary.cancelled = cancel.is_cancelled();
            tracing::debug!(
                phase = ?SearchPhase::Done,
                feeds = summary.feeds,
                failed = summary.failed,
                matches = summary.matches,
                cancelled = summary.cancelled,
                "search finished"
            );
            summary
        });

        Ok(ResultStream { rx, collector })
    }
}

/// Search one feed and forward its matches.
async fn search_feed(
    feed: Feed,
    matcher: Arc<dyn Matcher>,
    term: Arc<str>,
    tx: mpsc::Sender<Match>,
    cancel: CancellationToken,
) -> FeedOutcome {
    let mut outcome = FeedOutcome {
        sent: 0,
        failed: false,
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(feed = %feed.name, "search cancelled before feed finished");
            return outcome;
        }
        result = matcher.search(&feed, &term) => result,
    };

    let matches = match result {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(
                feed = %feed.name,
                feed_type = %feed.feed_type,
                matcher = matcher.name(),
                error = %e,
                "feed search failed"
            );
            outcome.failed = true;
            return outcome;
        }
    };

    for m in matches {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(m) => {
                if sent.is_err() {
                    // Receiver dropped; nobody is listening.
                    break;
                }
                outcome.sent += 1;
            }
        }
    }

    tracing::debug!(
        feed = %feed.name,
        matcher = matcher.name(),
        matches = outcome.sent,
        "feed searched"
    );
    outcome
}

/// Registry with the built-in matchers: `default` and `rss`.
pub fn build_registry(http: &HttpConfig) -> Result<MatcherRegistry> {
    let mut registry = MatcherRegistry::new();
    registry.register(RSS_TAG, Arc::new(RssMatcher::new(http)?))?;
    Ok(registry)
}

/// A cancellation token that fires on its own after `timeout`.
///
/// Cancel the token once the search is over to stop the timer.
pub fn cancel_after(timeout: Option<Duration>) -> CancellationToken {
    let token = CancellationToken::new();
    if let Some(timeout) = timeout {
        let timer = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    tracing::warn!(timeout_secs = timeout.as_secs(), "search timed out, cancelling");
                    timer.cancel();
                }
                _ = timer.cancelled() => {}
            }
        });
    }
    token
}

/// CLI entry point for `feedscan search`: print matches as they arrive.
pub async fn run_search(
    searcher: &Searcher,
    term: &str,
    cancel: CancellationToken,
) -> Result<SearchSummary> {
    let mut stream = searcher.run(term, cancel).await?;

    while let Some(m) = stream.recv().await {
        print_match(&m);
    }

    let summary = stream.finish().await;
    if summary.matches == 0 {
        println!("No results.");
    }
    println!(
        "{} matches from {} feeds ({} failed{})",
        summary.matches,
        summary.feeds,
        summary.failed,
        if summary.cancelled { ", cancelled" } else { "" }
    );
    Ok(summary)
}

fn print_match(m: &Match) {
    println!("{}", format_match(m));
    if let Some(ref link) = m.link {
        println!("    {}", link);
    }
}

/// `source [field]: content`, with the content folded onto one line.
fn format_match(m: &Match) -> String {
    let content = m.content.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{} [{}]: {}", m.source, m.field, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use feedscan_core::StaticFeedSource;

    struct EchoMatcher;

    #[async_trait]
    impl Matcher for EchoMatcher {
        fn name(&self) -> &str {
            "echo"
        }

        async fn search(&self, feed: &Feed, term: &str) -> Result<Vec<Match>, SearchError> {
            let content = format!("{} from {}", term, feed.name);
            Ok(vec![Match::new(&feed.name, "title", content)])
        }
    }

    fn searcher(feeds: Vec<Feed>) -> Searcher {
        let mut registry = MatcherRegistry::new();
        registry.register("echo", Arc::new(EchoMatcher)).unwrap();
        Searcher::new(Arc::new(registry), Arc::new(StaticFeedSource::new(feeds))).unwrap()
    }

    #[test]
    fn test_format_match_is_one_line() {
        let m = Match::new("npr", "description", "  Rain over\n  中国 today ");
        assert_eq!(format_match(&m), "npr [description]: Rain over 中国 today");
    }

    #[test]
    fn test_missing_default_is_rejected() {
        let result = Searcher::new(
            Arc::new(MatcherRegistry::empty()),
            Arc::new(StaticFeedSource::default()),
        );
        assert!(matches!(result, Err(SearchError::MissingDefaultMatcher)));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let s = searcher(vec![]);
        assert_eq!(s.resolve("echo").unwrap().name(), "echo");
        assert_eq!(s.resolve("nope").unwrap().name(), "default");
    }

    #[tokio::test]
    async fn test_no_feeds_closes_immediately() {
        let (matches, summary) = searcher(vec![])
            .run("x", CancellationToken::new())
            .await
            .unwrap()
            .collect()
            .await;
        assert!(matches.is_empty());
        assert_eq!(summary, SearchSummary::default());
    }

    #[tokio::test]
    async fn test_every_feed_contributes() {
        let feeds = vec![
            Feed::new("a", "mem://a", "echo"),
            Feed::new("b", "mem://b", "echo"),
            Feed::new("c", "mem://c", "unknown"),
        ];
        let (matches, summary) = searcher(feeds)
            .run("go", CancellationToken::new())
            .await
            .unwrap()
            .collect()
            .await;

        let mut sources: Vec<_> = matches.iter().map(|m| m.source.as_str()).collect();
        sources.sort();
        assert_eq!(sources, vec!["a", "b"]);
        assert_eq!(summary.feeds, 3);
        assert_eq!(summary.matches, 2);
        assert_eq!(summary.failed, 0);
        assert!(!summary.cancelled);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_spawns_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (matches, summary) = searcher(vec![Feed::new("a", "mem://a", "echo")])
            .run("go", cancel)
            .await
            .unwrap()
            .collect()
            .await;
        assert!(matches.is_empty());
        assert!(summary.cancelled);
        assert_eq!(summary.feeds, 0);
    }

    #[tokio::test]
    async fn test_capacity_one_still_delivers_everything() {
        let feeds = (0..20)
            .map(|i| Feed::new(format!("f{}", i), "mem://", "echo"))
            .collect();
        let (matches, _) = searcher(feeds)
            .with_channel_capacity(1)
            .run("go", CancellationToken::new())
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(matches.len(), 20);
    }
}
