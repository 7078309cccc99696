//! Connection configuration for the graph engine.

use serde::{Deserialize, Serialize};
use social_core::config::{DatabaseConfig, DatabaseMode, QueryConfig, MAX_PATH_DEPTH_LIMIT};
use social_core::error::{Result, SocialError};
use std::time::Duration;

/// Connection mode for the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Embedded engine over an in-memory store (for tests and demos)
    Memory,
    /// Remote server over the WebSocket protocol
    Remote { endpoint: String },
}

/// Configuration for one engine session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub mode: ConnectionMode,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
    pub result_limit: usize,
    pub max_path_depth: usize,
}

impl ConnectionConfig {
    /// Create a new in-memory configuration (for testing)
    pub fn memory() -> Self {
        Self {
            mode: ConnectionMode::Memory,
            namespace: "social".to_string(),
            database: "network".to_string(),
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(10),
            result_limit: 10,
            max_path_depth: 8,
        }
    }

    /// Create a new remote configuration
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            mode: ConnectionMode::Remote {
                endpoint: endpoint.into(),
            },
            ..Self::memory()
        }
    }

    /// Build from the `[database]` and `[queries]` sections
    pub fn from_database_config(config: &DatabaseConfig, queries: &QueryConfig) -> Self {
        let base = match config.mode {
            DatabaseMode::Memory => Self::memory(),
            DatabaseMode::Remote => Self::remote(config.endpoint.clone())
                .with_auth(config.username.clone(), config.password.clone()),
        };

        base.with_namespace(config.namespace.clone())
            .with_database(config.database.clone())
            .with_timeouts(
                Duration::from_millis(config.connect_timeout_ms),
                Duration::from_millis(config.query_timeout_ms),
            )
            .with_result_limit(queries.result_limit)
            .with_max_path_depth(queries.max_path_depth)
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: String) -> Self {
        self.namespace = namespace;
        self
    }

    /// Set the database name
    pub fn with_database(mut self, database: String) -> Self {
        self.database = database;
        self
    }

    /// Set authentication credentials
    pub fn with_auth(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    /// Set the connect and per-query deadlines
    pub fn with_timeouts(mut self, connect: Duration, query: Duration) -> Self {
        self.connect_timeout = connect;
        self.query_timeout = query;
        self
    }

    /// Cap the number of rows ranked queries return
    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit;
        self
    }

    /// Cap the number of hops the path search explores
    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    /// Get the connection string for the engine
    pub fn connection_string(&self) -> String {
        match &self.mode {
            ConnectionMode::Memory => "mem://".to_string(),
            ConnectionMode::Remote { endpoint } => endpoint.clone(),
        }
    }

    /// Credentials to sign in with, if the mode uses them
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.mode, &self.username, &self.password) {
            (ConnectionMode::Remote { .. }, Some(username), Some(password)) => {
                Some((username.as_str(), password.as_str()))
            }
            _ => None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(SocialError::config("Namespace cannot be empty"));
        }
        if self.database.is_empty() {
            return Err(SocialError::config("Database name cannot be empty"));
        }
        if let ConnectionMode::Remote { endpoint } = &self.mode {
            const SCHEMES: [&str; 2] = ["ws://", "wss://"];
            if !SCHEMES.iter().any(|s| endpoint.starts_with(s)) {
                return Err(SocialError::config(format!(
                    "Unsupported endpoint '{}'. Expected one of: {}",
                    endpoint,
                    SCHEMES.join(", ")
                )));
            }
        }
        if self.connect_timeout.is_zero() || self.query_timeout.is_zero() {
            return Err(SocialError::config("Timeouts must be greater than 0"));
        }
        if self.result_limit == 0 {
            return Err(SocialError::config("Result limit must be greater than 0"));
        }
        if self.max_path_depth == 0 || self.max_path_depth > MAX_PATH_DEPTH_LIMIT {
            return Err(SocialError::config(format!(
                "Max path depth must be between 1 and {}",
                MAX_PATH_DEPTH_LIMIT
            )));
        }
        Ok(())
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::memory()
    }
}
