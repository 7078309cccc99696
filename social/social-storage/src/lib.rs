//! Storage layer for the social graph using SurrealDB.
//!
//! This crate owns the engine session, the graph schema, the parameterized
//! query scripts, and the [`SocialGraph`] façade that exposes one method per
//! social network use case.

pub mod connection;
pub mod graph;
pub mod queries;
pub mod schema;
pub mod session;

pub use connection::{ConnectionConfig, ConnectionMode};
pub use graph::SocialGraph;
pub use queries::Statement;
pub use session::GraphSession;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::connection::{ConnectionConfig, ConnectionMode};
    pub use crate::graph::SocialGraph;
    pub use social_core::prelude::*;
}
