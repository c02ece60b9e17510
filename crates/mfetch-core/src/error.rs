//! Per-source attempt error.
//!
//! There is a single failure kind as far as the fetcher is concerned: the
//! attempt against one source failed and the next source is tried. The
//! variants only record why, for diagnostics.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttemptError {
    /// The source string is not a usable URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Parsed, but not a scheme the transport fetches.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Creating, writing or moving the temp file failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    /// The body arrived but is not larger than the validation threshold.
    #[error("downloaded file too small: {size} bytes (need more than {min})")]
    Undersized { size: u64, min: u64 },
    /// The transport, the temp file handle and the filesystem disagree on the body size.
    #[error("size mismatch: transport reported {reported} bytes, {on_disk} on disk")]
    SizeMismatch { reported: u64, on_disk: u64 },
}

impl AttemptError {
    /// True when the transfer completed and only the size check rejected it.
    pub fn is_undersized(&self) -> bool {
        matches!(self, AttemptError::Undersized { .. })
    }
}
