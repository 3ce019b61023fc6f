//! Service error types.

use thiserror::Error;

/// Service result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
