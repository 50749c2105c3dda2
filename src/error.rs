//! Error types for the verification engine.

use thiserror::Error;

/// Result type alias using the keysweep error type.
pub type Result<T> = std::result::Result<T, KeysweepError>;

/// Main error type for the verification engine.
///
/// Per-credential verification failures never appear here: they are
/// captured as `Invalid` outcomes at the client boundary. This type covers
/// caller errors (an empty batch) and the transport errors the verification
/// path converts into outcomes.
#[derive(Error, Debug)]
pub enum KeysweepError {
    /// The caller submitted a batch with no credentials after parsing
    #[error("no credentials to verify")]
    EmptyBatch,

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// System clipboard error
    #[error("clipboard write failed: {0}")]
    Clipboard(#[from] arboard::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
