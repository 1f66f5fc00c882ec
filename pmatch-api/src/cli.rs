//! Command-line arguments and effective server configuration
//!
//! Each flag can also come from its environment variable; anything left unset falls
//! back to the TOML file, then to compiled defaults.

use clap::Parser;
use pmatch_common::config::{resolve_vision_api_key, TomlConfig, VISION_API_KEY_ENV};
use pmatch_common::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Directory served under `/static` when nothing else is configured
pub const DEFAULT_STATIC_DIR: &str = "images";

/// Command-line arguments for pmatch-api
#[derive(Parser, Debug)]
#[command(name = "pmatch-api")]
#[command(about = "Photo to character archetype matching service")]
#[command(version)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "PMATCH_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PMATCH_PORT")]
    pub port: Option<u16>,

    /// TOML config file (defaults to <config_dir>/pmatch/pmatch-api.toml)
    #[arg(short, long, env = "PMATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Google Cloud Vision API key
    #[arg(long, env = VISION_API_KEY_ENV, hide_env_values = true)]
    pub vision_api_key: Option<String>,

    /// Directory holding the character images
    #[arg(long, env = "PMATCH_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved settings the server runs with
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub vision_api_key: String,
    pub vision_endpoint: String,
    pub vision_timeout: Duration,
}

impl Args {
    /// Merge arguments over the TOML config
    pub fn resolve(&self, toml_config: TomlConfig) -> Result<ServerConfig> {
        let vision_api_key = resolve_vision_api_key(self.vision_api_key.as_deref(), &toml_config)?;

        Ok(ServerConfig {
            host: self.host.clone().unwrap_or(toml_config.host),
            port: self.port.unwrap_or(toml_config.port),
            static_dir: self
                .static_dir
                .clone()
                .or(toml_config.static_assets)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            max_upload_bytes: toml_config.max_upload_bytes,
            vision_api_key,
            vision_endpoint: toml_config.vision.endpoint,
            vision_timeout: Duration::from_secs(toml_config.vision.timeout_secs),
        })
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
