pub mod config;
pub mod logging;

pub mod error;
pub mod fetcher;
pub mod storage;
pub mod transport;
pub mod url_model;
