//! Ordered multi-source fetch.
//!
//! Tries each configured source in order and stops at the first attempt whose
//! download is larger than `min_size_bytes`. Every per-source failure is
//! reported and swallowed; only exhaustion of the list is surfaced, as an
//! unsuccessful [`FetchReport`].

use crate::config::FetchConfig;
use crate::error::AttemptError;
use crate::storage::{self, PartFile};
use crate::transport::{CurlTransport, Transport};
use crate::url_model;
use std::path::Path;

/// Progress notification emitted while fetching.
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// About to try source `index` (0-based) of `total`.
    Trying {
        index: usize,
        total: usize,
        url: &'a str,
    },
    /// The attempt failed; the next source will be tried.
    AttemptFailed {
        index: usize,
        url: &'a str,
        error: &'a AttemptError,
    },
    /// The attempt was accepted and the destination now holds its body.
    Fetched {
        index: usize,
        url: &'a str,
        bytes: u64,
        destination: &'a Path,
    },
    /// Every source failed.
    Exhausted { attempts: usize },
}

/// One attempt against one source.
#[derive(Debug)]
pub struct AttemptRecord {
    pub index: usize,
    pub url: String,
    /// Accepted size in bytes, or why the attempt failed.
    pub result: Result<u64, AttemptError>,
}

/// All attempts made by one fetch, in trial order.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub attempts: Vec<AttemptRecord>,
}

impl FetchReport {
    /// The accepted attempt, if any. Always the last one recorded.
    pub fn fetched(&self) -> Option<&AttemptRecord> {
        self.attempts.last().filter(|a| a.result.is_ok())
    }

    pub fn is_success(&self) -> bool {
        self.fetched().is_some()
    }

    /// Size of the accepted download in bytes.
    pub fn bytes(&self) -> Option<u64> {
        self.fetched().and_then(|a| a.result.as_ref().ok().copied())
    }
}

/// Size in mebibytes, as shown in the success line.
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

pub struct Fetcher<'c, T: Transport> {
    config: &'c FetchConfig,
    transport: T,
}

impl<'c> Fetcher<'c, CurlTransport> {
    /// Fetcher using libcurl with the config's transport settings.
    pub fn with_curl(config: &'c FetchConfig) -> Self {
        Fetcher::new(config, CurlTransport::new(config.transport.clone()))
    }
}

impl<'c, T: Transport> Fetcher<'c, T> {
    pub fn new(config: &'c FetchConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Tries every source in order until one is accepted.
    pub fn run(&self, on_event: &mut dyn FnMut(&FetchEvent<'_>)) -> FetchReport {
        let total = self.config.sources.len();
        let mut report = FetchReport::default();

        for (index, url) in self.config.sources.iter().enumerate() {
            on_event(&FetchEvent::Trying { index, total, url });
            tracing::info!(index, total, url = %url, "trying source");

            let result = self.attempt(url);
            match &result {
                Ok(bytes) => {
                    tracing::info!(
                        index,
                        url = %url,
                        bytes,
                        destination = %self.config.destination.display(),
                        "source accepted"
                    );
                    on_event(&FetchEvent::Fetched {
                        index,
                        url,
                        bytes: *bytes,
                        destination: &self.config.destination,
                    });
                }
                Err(error) if error.is_undersized() => {
                    tracing::info!(index, url = %url, "source rejected: {}", error);
                    on_event(&FetchEvent::AttemptFailed { index, url, error });
                }
                Err(error) => {
                    tracing::warn!(index, url = %url, "source failed: {}", error);
                    on_event(&FetchEvent::AttemptFailed { index, url, error });
                }
            }

            let accepted = result.is_ok();
            report.attempts.push(AttemptRecord {
                index,
                url: url.clone(),
                result,
            });
            if accepted {
                return report;
            }
        }

        let attempts = report.attempts.len();
        tracing::error!(attempts, "no source produced an acceptable download");
        on_event(&FetchEvent::Exhausted { attempts });
        report
    }

    /// One attempt: download into the temp file, then accept or reject by size.
    fn attempt(&self, source: &str) -> Result<u64, AttemptError> {
        let url = url_model::parse_source(source)?;
        let destination = self.config.destination.as_path();
        let mut part = PartFile::create(&storage::temp_path(destination))?;

        let size = match self.download(&url, &mut part) {
            Ok(size) => size,
            Err(e) => {
                discard(part);
                return Err(e);
            }
        };

        let min = self.config.min_size_bytes;
        if size > min {
            settle(part, destination)?;
            return Ok(size);
        }

        if self.config.keep_undersized {
            tracing::debug!(size, "keeping undersized download at destination");
            settle(part, destination)?;
        } else {
            discard(part);
        }
        Err(AttemptError::Undersized { size, min })
    }

    /// Streams the body into `part` and returns its size once all counts agree.
    fn download(&self, url: &url::Url, part: &mut PartFile) -> Result<u64, AttemptError> {
        let reported = self.transport.retrieve(url, part)?;
        let on_disk = part.len_on_disk()?;
        if reported != on_disk || part.written() != on_disk {
            return Err(AttemptError::SizeMismatch { reported, on_disk });
        }
        Ok(on_disk)
    }
}

/// Sync and move the temp file over the destination.
fn settle(part: PartFile, destination: &Path) -> Result<(), AttemptError> {
    let temp = part.temp_path().to_path_buf();
    let moved = part.sync().and_then(|()| part.finalize(destination));
    if moved.is_err() {
        let _ = std::fs::remove_file(&temp);
    }
    Ok(moved?)
}

fn discard(part: PartFile) {
    let temp = part.temp_path().to_path_buf();
    if let Err(e) = part.discard() {
        tracing::warn!("failed to remove {}: {}", temp.display(), e);
    }
}

/// Fetch with libcurl and no progress callback. Returns whether a source was accepted.
pub fn fetch(config: &FetchConfig) -> bool {
    Fetcher::with_curl(config).run(&mut |_| {}).is_success()
}
