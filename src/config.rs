//! Configuration management for Orbit Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub index: IndexConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// PubMed documents (`.jsonl` file or directory)
    pub pubmed_path: PathBuf,
    /// ClinicalTrials.gov studies (`.jsonl` file or directory)
    pub ctgov_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            index: IndexConfig {
                pubmed_path: PathBuf::from("/app/index"),
                ctgov_path: PathBuf::from("/app/index-ctgov"),
            },
            search: SearchConfig { timeout_secs: 30 },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&lookup, "SERVER_PORT")?.unwrap_or(defaults.server.port),
            },
            index: IndexConfig {
                pubmed_path: lookup("LOCAL_PUBMED_INDEX_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.index.pubmed_path),
                ctgov_path: lookup("ORBIT_CTGOV_INDEX_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.index.ctgov_path),
            },
            search: SearchConfig {
                timeout_secs: parse_var(&lookup, "SEARCH_TIMEOUT_SECS")?
                    .unwrap_or(defaults.search.timeout_secs),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
