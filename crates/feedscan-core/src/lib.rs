//! # feedscan core
//!
//! Runtime-free building blocks for feedscan: the [`Feed`](models::Feed) and
//! [`Match`](models::Match) data types, the [`Matcher`](matcher::Matcher)
//! extension trait, the [`MatcherRegistry`](registry::MatcherRegistry) that
//! maps feed types to matchers, and the [`FeedSource`](source::FeedSource)
//! trait that supplies the feed list.
//!
//! This crate has no tokio, HTTP, or filesystem dependencies. The search
//! orchestrator, the RSS matcher, and the presenters live in the `feedscan`
//! application crate.

pub mod error;
pub mod matcher;
pub mod models;
pub mod registry;
pub mod source;

pub use error::SearchError;
pub use matcher::{DefaultMatcher, Matcher};
pub use models::{Feed, Match};
pub use registry::{MatcherRegistry, DEFAULT_TAG};
pub use source::{parse_feed_list, FeedSource, StaticFeedSource};
