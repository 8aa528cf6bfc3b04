//! # Catalog Error Types Module
//!
//! Error types for fetching, parsing and persisting the remote catalog.
//! The synchronizer swallows these at its boundary (logging them and
//! returning an empty result), so they mostly surface in logs and tests.

use thiserror::Error;

/// Custom error types for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure (DNS, connect, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Fetch exceeded the configured deadline
    #[error("timeout after {0}s")]
    Timeout(u64),

    /// A configured CSS selector failed to parse
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// Catalog store failure
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    /// Blocking store task panicked or was cancelled
    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
