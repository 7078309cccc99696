//! Core types and abstractions for the social graph client.
//!
//! This crate provides the error taxonomy, the record types returned by the
//! graph façade, and configuration loading shared by the storage layer and
//! the CLI.

pub mod config;
pub mod error;
pub mod sample;
pub mod types;

pub use config::{DatabaseConfig, DatabaseMode, LoggingConfig, QueryConfig, SocialConfig};
pub use sample::{SAMPLE_FRIENDSHIPS, SAMPLE_INTERESTS, SAMPLE_USERS};
pub use error::{Result, SocialError};
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{DatabaseConfig, DatabaseMode, SocialConfig};
    pub use crate::error::{Result, SocialError};
    pub use crate::types::*;
}
