//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
///
/// Every variant that reaches the binary is fatal. Skippable failures
/// (a status listing, a single detail fetch) are logged where they occur
/// and never surface as an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authorization or token exchange failed.
    #[error("Auth error: {0}")]
    Auth(#[from] aweber_oauth::Error),

    /// The request never produced a response.
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// The API rejected the bearer token.
    #[error("Token expired/invalid (401). Please delete 'aweber_token.json' and retry.")]
    Unauthorized,

    /// Unexpected HTTP status.
    #[error("API error: {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The accounts collection was empty.
    #[error("No account found.")]
    NoAccount,

    /// The account's lists collection was empty.
    #[error("No lists found.")]
    NoLists,

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
