//! Retrieval of one source into a byte sink.
//!
//! `CurlTransport` performs a single blocking GET via libcurl (the `curl`
//! crate), following redirects. No retries and no backoff: one call is one
//! attempt.

use crate::config::TransportConfig;
use crate::error::AttemptError;
use std::io::{self, Write};
use std::time::Duration;
use url::Url;

/// Fetches the resource at `url` into `sink`, returning the number of body bytes written.
pub trait Transport {
    fn retrieve(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, AttemptError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn retrieve(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, AttemptError> {
        (**self).retrieve(url, sink)
    }
}

/// Blocking libcurl transport. Runs in the current thread.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    config: TransportConfig,
}

impl CurlTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

impl Transport for CurlTransport {
    fn retrieve(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, AttemptError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(self.config.max_redirections)?;
        easy.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.config.timeout_secs))?;
        if let Some(ua) = &self.config.user_agent {
            easy.useragent(ua)?;
        }

        let mut received: u64 = 0;
        let mut write_err: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    received += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("sink write failed: {}", e);
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(AttemptError::Storage(e));
        }
        performed?;

        // file:// has no status line; libcurl reports 0.
        if url.scheme() != "file" {
            let code = easy.response_code()?;
            if !(200..300).contains(&code) {
                return Err(AttemptError::Http(code));
            }
        }

        sink.flush()?;
        tracing::debug!(url = %url, bytes = received, "transfer complete");
        Ok(received)
    }
}
