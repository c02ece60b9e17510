//! Source URL parsing and display.

use crate::error::AttemptError;
use url::Url;

/// Progress lines show at most this many characters of a source URL.
pub const DISPLAY_WIDTH: usize = 60;

/// Parses a source string, accepting only http(s) and file URLs.
pub fn parse_source(source: &str) -> Result<Url, AttemptError> {
    let url = Url::parse(source.trim())?;
    match url.scheme() {
        "http" | "https" | "file" => Ok(url),
        other => Err(AttemptError::UnsupportedScheme(other.to_string())),
    }
}

/// First `width` characters of `source`, cut on a char boundary.
pub fn shorten(source: &str, width: usize) -> &str {
    match source.char_indices().nth(width) {
        Some((idx, _)) => &source[..idx],
        None => source,
    }
}
