//! Node configuration, read from command-line flags with environment fallbacks.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-search", about = "Product search service for the storefront")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "STOREFRONT_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Upstream product API. When unset, products are kept in memory.
    #[arg(long, env = "CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// JSON array of products loaded into the in-memory catalog at startup.
    #[arg(long, env = "CATALOG_SEED")]
    pub seed_file: Option<PathBuf>,

    /// Page size used when a search request omits `limit`.
    #[arg(long, env = "SEARCH_DEFAULT_LIMIT", default_value_t = crate::pagination::DEFAULT_LIMIT)]
    pub default_limit: usize,

    /// Per-request timeout for upstream catalog calls, in milliseconds.
    #[arg(long, env = "CATALOG_TIMEOUT_MS", default_value_t = 2000)]
    pub fetch_timeout_ms: u64,

    /// Attempts per upstream catalog call before giving up.
    #[arg(long, env = "CATALOG_FETCH_ATTEMPTS", default_value_t = 3)]
    pub fetch_attempts: usize,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}

impl Config {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
