//! Service configuration
//!
//! Loaded from YAML. Every field has a default, so an empty file (or no file)
//! gives a working in-memory setup. The path discovery core itself takes no
//! configuration: [`PathfindingConfig`] is turned into a per-request
//! [`PathConfig`].

use crate::algo::{EdgeFilter, PathConfig, PathError};
use crate::graph::EdgeKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Environment variable overriding `server.port`
pub const ENV_PORT: &str = "WARMPATH_PORT";
/// Environment variable overriding `graph_path`
pub const ENV_GRAPH: &str = "WARMPATH_GRAPH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: String, value: String },

    #[error("Invalid pathfinding defaults: {0}")]
    Invalid(#[from] PathError),
}

/// Default search parameters for every request that does not override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    pub max_hops: usize,
    pub min_strength: f64,
    pub max_results: usize,
    /// Cap on edge relaxations per search (None = unbounded)
    pub max_expansions: Option<usize>,
    /// Wall-clock budget per search in milliseconds (None = unbounded)
    pub timeout_ms: Option<u64>,
    /// Traverse every edge in both directions
    pub bidirectional: bool,
    /// Restrict traversal to these edge kinds (None = all)
    pub kinds: Option<Vec<EdgeKind>>,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_hops: 3,
            min_strength: 0.3,
            max_results: 10,
            max_expansions: None,
            timeout_ms: None,
            bidirectional: false,
            kinds: None,
        }
    }
}

impl PathfindingConfig {
    /// Core search parameters. The deadline, if any, starts now.
    pub fn to_path_config(&self) -> PathConfig {
        PathConfig {
            max_hops: self.max_hops,
            min_strength: self.min_strength,
            max_results: self.max_results,
            max_expansions: self.max_expansions,
            deadline: self
                .timeout_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            prune_weak_branches: true,
        }
    }

    pub fn edge_filter(&self) -> EdgeFilter {
        EdgeFilter {
            kinds: self.kinds.clone(),
            bidirectional: self.bidirectional,
        }
    }

    pub fn validate(&self) -> Result<(), PathError> {
        self.to_path_config().validate()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub pathfinding: PathfindingConfig,
    /// JSON graph snapshot to serve (None = start empty)
    pub graph_path: Option<PathBuf>,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.pathfinding.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply `WARMPATH_PORT` / `WARMPATH_GRAPH` from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PORT) {
            self.server.port = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_PORT.to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_GRAPH) {
            self.graph_path = Some(PathBuf::from(value));
        }
        Ok(())
    }
}
