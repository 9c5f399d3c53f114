//! # feedscan CLI
//!
//! ## Usage
//!
//! ```bash
//! feedscan --config ./config/feedscan.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `feedscan search [TERM]` | Search every feed and print matches |
//! | `feedscan serve` | Start the HTTP search API |
//! | `feedscan feeds` | List configured feeds and their matchers |
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use feedscan::config;
use feedscan::feeds;
use feedscan::search::{self, Searcher};
use feedscan::server;

/// feedscan — search many feeds for a keyword, concurrently.
#[derive(Parser)]
#[command(
    name = "feedscan",
    about = "feedscan — a concurrent keyword search across RSS and other feeds",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/feedscan.toml`. Built-in defaults are used when
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/feedscan.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every configured feed for a term.
    ///
    /// Matches are printed as they arrive. Press Ctrl-C to stop early.
    Search {
        /// Literal, case-sensitive term. Defaults to `[search].default_term`.
        term: Option<String>,
    },

    /// Start the HTTP search API on `[server].bind`.
    Serve,

    /// List configured feeds and whether a matcher handles their type.
    Feeds,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Search { term } => {
            let searcher = Searcher::from_config(&cfg)?;
            let term = term.unwrap_or_else(|| cfg.search.default_term.clone());

            let cancel = search::cancel_after(cfg.search.timeout());
            let _guard = cancel.clone().drop_guard();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, cancelling search");
                    on_interrupt.cancel();
                }
            });

            search::run_search(&searcher, &term, cancel).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Feeds => {
            let searcher = Searcher::from_config(&cfg)?;
            feeds::list_feeds(searcher.source(), searcher.registry()).await?;
        }
    }

    Ok(())
}
