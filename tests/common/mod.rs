//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::{http::header, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub const CHINA_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Daily</title>
    <item>
      <title>中国新闻</title>
      <description>Top story of the day</description>
      <link>http://daily.example/1</link>
      <pubDate>Mon, 02 Jan 2006 15:04:05 GMT</pubDate>
    </item>
    <item>
      <title>Weather</title>
      <description>Sunny</description>
    </item>
  </channel>
</rss>"#;

/// Serve canned feed documents on an ephemeral port.
///
/// | Path | Response |
/// |------|----------|
/// | `/rss` | [`CHINA_RSS`] |
/// | `/broken` | malformed XML |
/// | anything else | 404 |
pub async fn spawn_feed_server() -> SocketAddr {
    let app = Router::new()
        .route(
            "/rss",
            get(|| async { ([(header::CONTENT_TYPE, "application/rss+xml")], CHINA_RSS) }),
        )
        .route(
            "/broken",
            get(|| async { "<rss><channel><item><title>oops</item></channel></rss>" }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}
