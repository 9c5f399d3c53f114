//! # feedscan
//!
//! **A concurrent, pluggable keyword search across RSS and other feeds.**
//!
//! feedscan loads a list of feeds, searches every feed in parallel with the
//! matcher registered for its type, and merges the matches into a single
//! stream that is printed by the CLI or returned as JSON by the HTTP server.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌────────────────────┐
//! │ Feed source │──▶│   Searcher   │──▶│ task per feed      │
//! │ data.json   │   │  (registry)  │   │ rss / default / …  │
//! └─────────────┘   └──────┬───────┘   └─────────┬──────────┘
//!                          │   one match stream  │
//!                          ◀─────────────────────┘
//!                  ┌───────┴────────┐
//!                  ▼                ▼
//!             ┌──────────┐    ┌──────────┐
//!             │   CLI    │    │   HTTP   │
//!             │ feedscan │    │ /api/... │
//!             └──────────┘    └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! feedscan feeds                 # list configured feeds
//! feedscan search 中国            # search every feed, print matches
//! feedscan serve                 # GET /api/search?q=<term>
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`feeds`] | JSON feed-list source and `feedscan feeds` listing |
//! | [`matcher_rss`] | RSS 2.0 matcher: fetch, parse, match |
//! | [`search`] | Search orchestration, cancellation, console output |
//! | [`server`] | HTTP search API (Axum) with CORS |
//!
//! The models, the [`Matcher`](feedscan_core::Matcher) trait, and the
//! [`MatcherRegistry`](feedscan_core::MatcherRegistry) live in
//! `feedscan-core` and are re-exported here.

pub mod config;
pub mod feeds;
pub mod matcher_rss;
pub mod search;
pub mod server;

pub use feedscan_core::{
    DefaultMatcher, Feed, FeedSource, Match, Matcher, MatcherRegistry, SearchError,
    StaticFeedSource, DEFAULT_TAG,
};
pub use search::{ResultStream, SearchSummary, Searcher};
