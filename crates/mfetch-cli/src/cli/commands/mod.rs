//! CLI command handlers. Each command is in its own file.

mod config_path;
pub mod fetch;
mod sources;

pub use config_path::run_config_path;
pub use fetch::{run_fetch, FetchOverrides};
pub use sources::run_sources;
