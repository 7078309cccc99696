//! Error types for the social graph client.

/// Result type alias for social graph operations.
pub type Result<T> = std::result::Result<T, SocialError>;

/// Main error type for the social graph client.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// Engine unreachable or credentials rejected
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed caller input, rejected before any request is sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist in the engine
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// The engine rejected or failed a query
    #[error("Engine query error: {0}")]
    EngineQuery(String),

    /// Connect or query deadline elapsed
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SocialError {
    /// Create a new connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a new engine query error
    pub fn engine_query(msg: impl Into<String>) -> Self {
        Self::EngineQuery(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_engine_query(&self) -> bool {
        matches!(self, Self::EngineQuery(_))
    }
}
