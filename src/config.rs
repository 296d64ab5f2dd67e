//! Configuration management for the PDF split server

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub extractor: ExtractorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for uploads, in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory for per-request workspaces
    pub upload_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    pub qpdf_path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_UPLOAD_ROOT: &str = "uploads";
const DEFAULT_QPDF_PATH: &str = "qpdf";
const DEFAULT_MAX_UPLOAD_MB: usize = 100;

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            },
            storage: StorageConfig {
                upload_root: PathBuf::from(DEFAULT_UPLOAD_ROOT),
            },
            extractor: ExtractorConfig {
                qpdf_path: DEFAULT_QPDF_PATH.to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from any variable source (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_upload_mb: usize = parse_var(&lookup, "MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB)?;

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: parse_var(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
                max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            },
            storage: StorageConfig {
                upload_root: lookup("UPLOAD_FOLDER")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT)),
            },
            extractor: ExtractorConfig {
                qpdf_path: lookup("QPDF_PATH").unwrap_or_else(|| DEFAULT_QPDF_PATH.to_string()),
            },
        })
    }

    /// `host:port` string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { var, value }),
        },
    }
}
