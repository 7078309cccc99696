//! Configuration for the social graph client.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variable overrides, then validation.
//!
//! # Example file
//!
//! ```toml
//! [database]
//! mode = "remote"
//! endpoint = "ws://127.0.0.1:8000"
//! username = "root"
//! password = "root"
//! namespace = "social"
//! database = "network"
//!
//! [queries]
//! result_limit = 10
//! max_path_depth = 8
//!
//! [logging]
//! level = "info"
//! ```

use crate::error::{Result, SocialError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// Environment variable names
pub const ENV_CONFIG_PATH: &str = "SOCIAL_CONFIG_PATH";
pub const ENV_DB_MODE: &str = "SOCIAL_DB_MODE";
pub const ENV_DB_URL: &str = "SOCIAL_DB_URL";
pub const ENV_DB_USERNAME: &str = "SOCIAL_DB_USERNAME";
pub const ENV_DB_PASSWORD: &str = "SOCIAL_DB_PASSWORD";
pub const ENV_DB_NAMESPACE: &str = "SOCIAL_DB_NAMESPACE";
pub const ENV_DB_DATABASE: &str = "SOCIAL_DB_DATABASE";
pub const ENV_LOG_LEVEL: &str = "SOCIAL_LOG_LEVEL";
pub const ENV_RESULT_LIMIT: &str = "SOCIAL_RESULT_LIMIT";
pub const ENV_MAX_PATH_DEPTH: &str = "SOCIAL_MAX_PATH_DEPTH";

/// Upper bound for `queries.max_path_depth`; each hop nests one engine
/// function call and the engine caps computation depth.
pub const MAX_PATH_DEPTH_LIMIT: usize = 12;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Where the graph engine lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseMode {
    /// Embedded engine with an in-memory store
    Memory,
    /// Engine reached over its WebSocket protocol
    Remote,
}

impl std::str::FromStr for DatabaseMode {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "remote" => Ok(Self::Remote),
            _ => Err(SocialError::config(format!(
                "Invalid database mode '{}'. Must be one of: memory, remote",
                s
            ))),
        }
    }
}

impl std::fmt::Display for DatabaseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub database: DatabaseConfig,
    pub queries: QueryConfig,
    pub logging: LoggingConfig,
}

/// Engine connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub mode: DatabaseMode,
    /// WebSocket endpoint, used in remote mode
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
    pub connect_timeout_ms: u64,
    pub query_timeout_ms: u64,
}

/// Query shaping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum rows returned by ranked suggestion queries
    pub result_limit: usize,
    /// Longest friendship path, in hops, the path search explores
    pub max_path_depth: usize,
}

/// Logging settings consumed by the CLI subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            mode: DatabaseMode::Remote,
            endpoint: "ws://127.0.0.1:8000".to_string(),
            username: "root".to_string(),
            password: "root".to_string(),
            namespace: "social".to_string(),
            database: "network".to_string(),
            connect_timeout_ms: 5_000,
            query_timeout_ms: 10_000,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            result_limit: 10,
            max_path_depth: 8,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SocialConfig {
    /// Resolve the configuration for a run.
    ///
    /// Uses `path` if given, otherwise `SOCIAL_CONFIG_PATH` if set, otherwise
    /// defaults. Environment overrides are applied in every case.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::read_file(&path).await?,
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };

        config.merge_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file, without environment
    /// overrides
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        let config = Self::read_file(path).await?;
        config.validate()?;
        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SocialError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SocialError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SocialError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Write the configuration, going through a temp file and a rename
    pub async fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = self.to_toml_string()?;
        let temp_path = path.with_extension("toml.tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, path).await?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Merge overrides from the process environment
    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary variable source
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(ENV_DB_MODE) {
            debug!("Overriding database mode from environment: {}", mode);
            self.database.mode = mode.parse()?;
        }

        if let Some(url) = lookup(ENV_DB_URL) {
            debug!("Overriding database endpoint from environment");
            self.database.endpoint = url;
        }

        if let Some(username) = lookup(ENV_DB_USERNAME) {
            debug!("Overriding database username from environment");
            self.database.username = username;
        }

        if let Some(password) = lookup(ENV_DB_PASSWORD) {
            debug!("Overriding database password from environment");
            self.database.password = password;
        }

        if let Some(namespace) = lookup(ENV_DB_NAMESPACE) {
            debug!("Overriding namespace from environment: {}", namespace);
            self.database.namespace = namespace;
        }

        if let Some(database) = lookup(ENV_DB_DATABASE) {
            debug!("Overriding database name from environment: {}", database);
            self.database.database = database;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            debug!("Overriding log level from environment: {}", level);
            self.logging.level = level;
        }

        if let Some(limit) = lookup(ENV_RESULT_LIMIT) {
            let limit = limit.parse::<usize>().map_err(|e| {
                SocialError::config(format!("Invalid result limit in environment: {}", e))
            })?;
            self.queries.result_limit = limit;
        }

        if let Some(depth) = lookup(ENV_MAX_PATH_DEPTH) {
            let depth = depth.parse::<usize>().map_err(|e| {
                SocialError::config(format!("Invalid max path depth in environment: {}", e))
            })?;
            self.queries.max_path_depth = depth;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(SocialError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        let db = &self.database;
        if db.namespace.is_empty() {
            return Err(SocialError::config("Namespace cannot be empty"));
        }
        if db.database.is_empty() {
            return Err(SocialError::config("Database name cannot be empty"));
        }
        if db.mode == DatabaseMode::Remote && db.endpoint.is_empty() {
            return Err(SocialError::config("Remote mode requires an endpoint"));
        }
        if db.connect_timeout_ms == 0 || db.query_timeout_ms == 0 {
            return Err(SocialError::config("Timeouts must be greater than 0"));
        }
        if self.queries.result_limit == 0 {
            return Err(SocialError::config("Result limit must be greater than 0"));
        }
        let depth = self.queries.max_path_depth;
        if depth == 0 || depth > MAX_PATH_DEPTH_LIMIT {
            return Err(SocialError::config(format!(
                "Max path depth must be between 1 and {}",
                MAX_PATH_DEPTH_LIMIT
            )));
        }

        Ok(())
    }
}
