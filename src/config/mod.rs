//! Environment-backed configuration.
//!
//! Process settings have defaults and are overridden with `SEMGATE_*` environment variables.
//! The deployment definition (collection, fields, vector fields) lives in a JSON file whose path
//! is one of those settings; see [`DeploymentConfig`].

pub mod deployment;
pub mod error;


pub use deployment::{
    DEFAULT_ID_FIELD, DEFAULT_PARENT_FILTER, DEFAULT_PARENT_ID_FIELD, DeploymentConfig,
    VectorFieldConfig, VectorTopology,
};
pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BACKEND_TIMEOUT_MS, DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_TIMEOUT_MS,
    validate_dimension,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SEMGATE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path to the deployment JSON file. Default: `./deployment.json`.
    pub deployment_path: PathBuf,

    /// Solr base URL (without collection). Default: `http://localhost:8983/solr`.
    pub solr_url: String,

    /// Embedding service URL. When unset the gateway runs a deterministic stub embedder.
    pub embedding_url: Option<String>,

    /// Dimension of every embedding vector. Default: `384`.
    pub embedding_dim: usize,

    /// Embedding cache snapshot file. Default: `./.data/embeddings.rkyv`.
    pub cache_path: PathBuf,

    /// Max entries in the embedding cache. Default: `100_000`.
    pub cache_capacity: u64,

    /// Evict entries not read for this long. Default: never.
    pub cache_idle_timeout: Option<Duration>,

    /// Write the snapshot after every new entry (otherwise only on shutdown). Default: `true`.
    pub cache_persist_on_write: bool,

    /// Deadline for one embedding call. Default: 5s.
    pub embedding_timeout: Duration,

    /// Deadline for one backend query. Default: 10s.
    pub backend_timeout: Duration,
}

/// Default Solr URL used when `SEMGATE_SOLR_URL` is not set.
pub const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            deployment_path: PathBuf::from("./deployment.json"),
            solr_url: DEFAULT_SOLR_URL.to_string(),
            embedding_url: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            cache_path: PathBuf::from("./.data/embeddings.rkyv"),
            cache_capacity: 100_000,
            cache_idle_timeout: None,
            cache_persist_on_write: true,
            embedding_timeout: Duration::from_millis(DEFAULT_EMBEDDING_TIMEOUT_MS),
            backend_timeout: Duration::from_millis(DEFAULT_BACKEND_TIMEOUT_MS),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SEMGATE_PORT";
    const ENV_BIND_ADDR: &'static str = "SEMGATE_BIND_ADDR";
    const ENV_DEPLOYMENT_PATH: &'static str = "SEMGATE_DEPLOYMENT_PATH";
    const ENV_SOLR_URL: &'static str = "SEMGATE_SOLR_URL";
    const ENV_EMBEDDING_URL: &'static str = "SEMGATE_EMBEDDING_URL";
    const ENV_EMBEDDING_DIM: &'static str = "SEMGATE_EMBEDDING_DIM";
    const ENV_CACHE_PATH: &'static str = "SEMGATE_CACHE_PATH";
    const ENV_CACHE_CAPACITY: &'static str = "SEMGATE_CACHE_CAPACITY";
    const ENV_CACHE_IDLE_SECS: &'static str = "SEMGATE_CACHE_IDLE_SECS";
    const ENV_CACHE_PERSIST_ON_WRITE: &'static str = "SEMGATE_CACHE_PERSIST_ON_WRITE";
    const ENV_EMBEDDING_TIMEOUT_MS: &'static str = "SEMGATE_EMBEDDING_TIMEOUT_MS";
    const ENV_BACKEND_TIMEOUT_MS: &'static str = "SEMGATE_BACKEND_TIMEOUT_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let deployment_path =
            Self::parse_path_from_env(Self::ENV_DEPLOYMENT_PATH, defaults.deployment_path);
        let solr_url = Self::parse_string_from_env(Self::ENV_SOLR_URL, defaults.solr_url);
        let embedding_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL);
        let embedding_dim =
            Self::parse_u64_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim as u64)?
                as usize;
        let cache_path = Self::parse_path_from_env(Self::ENV_CACHE_PATH, defaults.cache_path);
        let cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;
        let cache_idle_timeout = match Self::parse_u64_from_env(Self::ENV_CACHE_IDLE_SECS, 0)? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let cache_persist_on_write = env::var(Self::ENV_CACHE_PERSIST_ON_WRITE)
            .map(|s| s != "false" && s != "0")
            .unwrap_or(defaults.cache_persist_on_write);
        let embedding_timeout = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_EMBEDDING_TIMEOUT_MS,
            defaults.embedding_timeout.as_millis() as u64,
        )?);
        let backend_timeout = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_BACKEND_TIMEOUT_MS,
            defaults.backend_timeout.as_millis() as u64,
        )?);

        Ok(Self {
            port,
            bind_addr,
            deployment_path,
            solr_url,
            embedding_url,
            embedding_dim,
            cache_path,
            cache_capacity,
            cache_idle_timeout,
            cache_persist_on_write,
            embedding_timeout,
            backend_timeout,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.deployment_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.deployment_path.clone(),
            });
        }
        if !self.deployment_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.deployment_path.clone(),
            });
        }

        if self.cache_path.exists() && !self.cache_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.cache_path.clone(),
            });
        }
        if let Some(parent) = self.cache_path.parent()
            && parent.exists()
            && !parent.is_dir()
        {
            return Err(ConfigError::NotADirectory {
                path: parent.to_path_buf(),
            });
        }

        validate_dimension(self.embedding_dim)?;

        if self.cache_capacity == 0 {
            return Err(ConfigError::invalid("cache capacity must be > 0"));
        }
        if self.embedding_timeout.is_zero() || self.backend_timeout.is_zero() {
            return Err(ConfigError::invalid("timeouts must be > 0"));
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            Err(_) => Ok(default),
        }
    }
}
