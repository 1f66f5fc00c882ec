//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (or its environment variable, via clap)
//! 2. TOML config file
//! 3. Compiled default
//!
//! A missing TOML file is not an error: a warning is logged and defaults apply.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Default HTTP port for pmatch-api
pub const DEFAULT_PORT: u16 = 5780;

/// Default Vision API base URL
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";

/// Environment variable consulted for the Vision API key
pub const VISION_API_KEY_ENV: &str = "PMATCH_VISION_API_KEY";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional in the file; absent fields take compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding character images served under `/static`
    #[serde(default)]
    pub static_assets: Option<PathBuf>,

    /// Largest accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub vision: VisionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Image analysis provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL; `/v1/images:annotate` is appended
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_vision_endpoint() -> String {
    DEFAULT_VISION_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_assets: None,
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
            vision: VisionConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_vision_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Platform config file location: `<config_dir>/pmatch/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pmatch").join(format!("{}.toml", module_name)))
}

/// Load a TOML config file
///
/// Missing file → defaults with a warning. Unreadable or malformed file → `Error::Config`.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file not found at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load the config from an explicit path, or the platform default location
pub fn load_module_config(explicit: Option<&Path>, module_name: &str) -> Result<TomlConfig> {
    match explicit {
        Some(path) => load_toml_config(path),
        None => match default_config_path(module_name) {
            Some(path) => load_toml_config(&path),
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(TomlConfig::default())
            }
        },
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the Vision API key
///
/// **Priority:** command line / environment → TOML
pub fn resolve_vision_api_key(cli_key: Option<&str>, toml_config: &TomlConfig) -> Result<String> {
    let toml_key = toml_config.vision.api_key.as_deref();

    if let (Some(cli), Some(file)) = (cli_key, toml_key) {
        if is_valid_key(cli) && is_valid_key(file) {
            warn!("Vision API key found in multiple sources. Using command line/environment (highest priority).");
        }
    }

    if let Some(key) = cli_key.filter(|k| is_valid_key(k)) {
        info!("Vision API key loaded from command line/environment");
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_key.filter(|k| is_valid_key(k)) {
        info!("Vision API key loaded from TOML config");
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "Vision API key not configured. Please configure using one of:\n\
         1. Command line: --vision-api-key your-key\n\
         2. Environment: {}=your-key\n\
         3. TOML config: [vision] api_key = \"your-key\"",
        VISION_API_KEY_ENV
    )))
}
