//! Settings from the optional JSON config file merged with command-line
//! overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chain_btc::network::BtcNetwork;
use explorer::blockchain_info::DEFAULT_BASE_URL;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// On-disk config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub network: Option<BtcNetwork>,
    pub esplora_url: Option<String>,
    pub blockchain_info_url: Option<String>,
    /// 0 disables the timeout.
    pub timeout_secs: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Load `explicit` if given (it must exist), else the default location
    /// if a file is there, else an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "using config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/btcdash/config.json`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("btcdash").join("config.json"))
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub network: Option<BtcNetwork>,
    pub esplora_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub network: BtcNetwork,
    pub esplora_url: String,
    pub blockchain_info_url: String,
    pub timeout: Option<Duration>,
    pub export_dir: PathBuf,
}

impl Settings {
    /// Command line over config file over built-in defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let network = overrides.network.or(file.network).unwrap_or_default();
        let esplora_url = overrides
            .esplora_url
            .or(file.esplora_url)
            .unwrap_or_else(|| network.default_esplora_url().to_string());
        let blockchain_info_url = file
            .blockchain_info_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let export_dir = overrides
            .export_dir
            .or(file.export_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            network,
            esplora_url,
            blockchain_info_url,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            export_dir,
        }
    }
}
