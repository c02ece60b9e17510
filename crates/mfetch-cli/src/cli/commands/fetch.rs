//! `mfetch fetch` – try each source until one yields a usable file.

use anyhow::Result;
use mfetch_core::config::FetchConfig;
use mfetch_core::fetcher::{megabytes, FetchEvent, Fetcher};
use mfetch_core::url_model::{shorten, DISPLAY_WIDTH};
use std::path::PathBuf;

/// Command-line values that take precedence over the loaded config.
#[derive(Debug, Default)]
pub struct FetchOverrides {
    pub sources: Vec<String>,
    pub dest: Option<PathBuf>,
    pub min_size: Option<u64>,
    pub keep_undersized: bool,
}

impl FetchOverrides {
    pub fn apply(self, cfg: &mut FetchConfig) {
        if !self.sources.is_empty() {
            cfg.sources = self.sources;
        }
        if let Some(dest) = self.dest {
            cfg.destination = dest;
        }
        if let Some(min) = self.min_size {
            cfg.min_size_bytes = min;
        }
        if self.keep_undersized {
            cfg.keep_undersized = true;
        }
    }
}

/// Console line for one fetch event.
pub fn render_event(event: &FetchEvent<'_>) -> String {
    match event {
        FetchEvent::Trying { index, total, url } => format!(
            "Trying source {}/{}: {}...",
            index + 1,
            total,
            shorten(url, DISPLAY_WIDTH)
        ),
        FetchEvent::AttemptFailed { error, .. } => format!("✗ Failed: {}", error),
        FetchEvent::Fetched {
            bytes, destination, ..
        } => format!(
            "✓ Successfully downloaded model ({:.2} MB) to {}",
            megabytes(*bytes),
            destination.display()
        ),
        FetchEvent::Exhausted { .. } => "❌ Could not download model from any source".to_string(),
    }
}

/// Runs the fetch, printing progress. Exhaustion is only an error with `strict`.
pub fn run_fetch(mut cfg: FetchConfig, overrides: FetchOverrides, strict: bool) -> Result<()> {
    overrides.apply(&mut cfg);
    cfg.validate()?;

    let report = Fetcher::with_curl(&cfg).run(&mut |event| println!("{}", render_event(event)));

    if !report.is_success() && strict {
        anyhow::bail!(
            "no source produced an acceptable download ({} attempts)",
            report.attempts.len()
        );
    }
    Ok(())
}
