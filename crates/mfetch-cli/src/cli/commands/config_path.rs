//! `mfetch config-path` – print where configuration is read from.

use anyhow::Result;
use mfetch_core::config;
use std::path::Path;

pub fn run_config_path(explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(p) => println!("{}", p.display()),
        None => println!("{}", config::config_path()?.display()),
    }
    Ok(())
}
