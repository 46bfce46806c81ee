//! Common error types for airrank

use thiserror::Error;

/// Common result type for airrank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the airrank crates
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure talking to the rankings backend
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Backend body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Metric input outside its declared domain (e.g. on-time percentage not in [0,100])
    #[error("Invalid metric input: {0}")]
    InvalidMetricInput(String),

    /// Invalid user input or command parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Command not valid in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the FetchFailure class: network error, non-success status, undecodable body
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Fetch(_) | Error::HttpStatus { .. } | Error::Decode(_)
        )
    }
}
