//! `mfetch sources` – list configured sources in trial order.

use mfetch_core::config::FetchConfig;

pub fn run_sources(cfg: &FetchConfig) {
    for (idx, url) in cfg.sources.iter().enumerate() {
        println!("{:>2}. {}", idx + 1, url);
    }
    println!(
        "-> {} (accepted above {} bytes)",
        cfg.destination.display(),
        cfg.min_size_bytes
    );
}
