//! Error types for turn-extract.
//!
//! Extraction itself never fails: malformed trees degrade to plainer output.
//! These errors cover the fallible edges around it (snapshot decoding,
//! configuration and I/O).

/// Error type for the fallible edges of extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A JSON node snapshot could not be decoded.
    #[error("Snapshot decoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The configured base URL is not an absolute URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Reading input or writing output failed.
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
