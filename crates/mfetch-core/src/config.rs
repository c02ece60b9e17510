use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Built-in candidate sources for the plant disease classifier, in trial order.
pub const DEFAULT_SOURCES: [&str; 3] = [
    "https://tfhub.dev/google/lite-model/cropnet/classifier/cassava_disease_V1/1?lite-format=tflite",
    "https://github.com/rajeshkanna1999/Plant_Disease_Detection/raw/main/model/plant_disease_model.tflite",
    "https://storage.googleapis.com/download.tensorflow.org/models/tflite/aiy/2017_12_18/plant_classification.tflite",
];

/// Built-in destination, relative to the working directory.
pub const DEFAULT_DESTINATION: &str = "app/src/main/assets/plant_disease_model.tflite";

/// Downloads of this many bytes or fewer are rejected.
pub const DEFAULT_MIN_SIZE_BYTES: u64 = 1000;

/// Transport knobs (optional `[transport]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of redirects followed per source.
    pub max_redirections: u32,
    /// Optional User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 600,
            max_redirections: 10,
            user_agent: None,
        }
    }
}

/// Global configuration loaded from `~/.config/mfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Candidate source URLs; order is trial priority.
    pub sources: Vec<String>,
    /// Where the accepted download is stored. Its parent must already exist.
    pub destination: PathBuf,
    /// A download is accepted only when strictly larger than this.
    #[serde(default = "default_min_size_bytes")]
    pub min_size_bytes: u64,
    /// Move rejected (undersized) downloads into the destination anyway.
    #[serde(default)]
    pub keep_undersized: bool,
    #[serde(default)]
    pub transport: TransportConfig,
}

fn default_min_size_bytes() -> u64 {
    DEFAULT_MIN_SIZE_BYTES
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            min_size_bytes: DEFAULT_MIN_SIZE_BYTES,
            keep_undersized: false,
            transport: TransportConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Rejects configurations the fetcher cannot do anything useful with.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            anyhow::bail!("config has no sources");
        }
        if self.destination.as_os_str().is_empty() {
            anyhow::bail!("config has an empty destination");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<FetchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.sources.len(), 3);
        assert!(cfg.sources[0].starts_with("https://tfhub.dev/"));
        assert_eq!(
            cfg.destination,
            PathBuf::from("app/src/main/assets/plant_disease_model.tflite")
        );
        assert_eq!(cfg.min_size_bytes, 1000);
        assert!(!cfg.keep_undersized);
        assert_eq!(cfg.transport.max_redirections, 10);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_minimal_uses_defaults() {
        let toml = r#"
            sources = ["http://a.example/model", "http://b.example/model"]
            destination = "assets/model.tflite"
        "#;
        let cfg: FetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.sources, vec!["http://a.example/model", "http://b.example/model"]);
        assert_eq!(cfg.destination, PathBuf::from("assets/model.tflite"));
        assert_eq!(cfg.min_size_bytes, 1000);
        assert!(!cfg.keep_undersized);
        assert_eq!(cfg.transport, TransportConfig::default());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            sources = ["http://a.example/model"]
            destination = "/tmp/model.bin"
            min_size_bytes = 4096
            keep_undersized = true

            [transport]
            connect_timeout_secs = 5
            timeout_secs = 60
            max_redirections = 3
            user_agent = "mfetch/0.1"
        "#;
        let cfg: FetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.min_size_bytes, 4096);
        assert!(cfg.keep_undersized);
        assert_eq!(cfg.transport.connect_timeout_secs, 5);
        assert_eq!(cfg.transport.timeout_secs, 60);
        assert_eq!(cfg.transport.max_redirections, 3);
        assert_eq!(cfg.transport.user_agent.as_deref(), Some("mfetch/0.1"));
    }

    #[test]
    fn validate_rejects_empty_sources() {
        let cfg = FetchConfig {
            sources: Vec::new(),
            ..FetchConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(FetchConfig::default().validate().is_ok());
    }

    #[test]
    fn load_from_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        fs::write(
            &good,
            "sources = [\"http://a.example/m\"]\ndestination = \"m.bin\"\n",
        )
        .unwrap();
        let cfg = load_from(&good).unwrap();
        assert_eq!(cfg.sources.len(), 1);

        let empty = dir.path().join("empty.toml");
        fs::write(&empty, "sources = []\ndestination = \"m.bin\"\n").unwrap();
        assert!(load_from(&empty).is_err());

        assert!(load_from(&dir.path().join("missing.toml")).is_err());
    }
}
