//! ghprofile Data Collectors
//!
//! Fetches profile data from GitHub, the user's blog feed and a remote
//! skills document.

pub mod feed;
pub mod github;
mod retry;
pub mod skills;

pub use retry::RetryPolicy;

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Server error: HTTP {0}")]
    Server(u16),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<CollectorError>,
    },
}

impl CollectorError {
    /// Whether the failure is worth another attempt
    pub fn is_transient(&self) -> bool {
        match self {
            CollectorError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            CollectorError::Server(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;

/// Configuration for collectors
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub github_token: Option<String>,
    pub api_base: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Upper bound on pages walked by paginated endpoints
    pub max_pages: u32,
}
