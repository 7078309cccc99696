//! Engine session lifecycle and query execution.

use crate::connection::ConnectionConfig;
use crate::queries::Statement;
use crate::schema;
use serde::de::DeserializeOwned;
use social_core::error::{Result, SocialError};
use std::future::IntoFuture;
use std::time::Duration;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::{Response, Surreal};
use tracing::{debug, info};

/// One authenticated session against the graph engine.
///
/// The underlying client is released when the session is dropped.
pub struct GraphSession {
    db: Surreal<Any>,
    endpoint: String,
    query_timeout: Duration,
}

impl GraphSession {
    /// Connect, authenticate, select namespace/database and bootstrap the schema
    pub async fn open(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = config.connection_string();

        info!(%endpoint, namespace = %config.namespace, database = %config.database, "Opening graph session");

        let db = tokio::time::timeout(
            config.connect_timeout,
            surrealdb::engine::any::connect(endpoint.clone()).into_future(),
        )
        .await
        .map_err(|_| {
            SocialError::timeout(format!(
                "connecting to {} took longer than {:?}",
                endpoint, config.connect_timeout
            ))
        })?
        .map_err(|e| SocialError::connection(format!("Failed to connect to {}: {}", endpoint, e)))?;

        if let Some((username, password)) = config.credentials() {
            db.signin(Root { username, password })
                .await
                .map_err(|e| SocialError::connection(format!("Authentication failed: {}", e)))?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                SocialError::connection(format!("Failed to use namespace/database: {}", e))
            })?;

        schema::init_schema(&db).await?;

        Ok(Self {
            db,
            endpoint,
            query_timeout: config.query_timeout,
        })
    }

    /// Submit one statement and return the checked engine response
    pub async fn execute(&self, statement: Statement) -> Result<Response> {
        let name = statement.name();
        debug!(
            operation = name,
            params = ?statement.params().keys().collect::<Vec<_>>(),
            "Executing graph query"
        );

        let (text, params) = statement.into_parts();
        let query = self.db.query(text).bind(params);

        let response = tokio::time::timeout(self.query_timeout, query.into_future())
            .await
            .map_err(|_| {
                SocialError::timeout(format!(
                    "{} exceeded the query timeout of {:?}",
                    name, self.query_timeout
                ))
            })?
            .and_then(Response::check)
            .map_err(|e| SocialError::engine_query(format!("{} failed: {}", name, e)))?;

        Ok(response)
    }

    /// Endpoint this session talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Drop for GraphSession {
    fn drop(&mut self) {
        debug!(endpoint = %self.endpoint, "Graph session released");
    }
}

/// Decode the rows of the last statement in a response.
///
/// Scripts compute intermediate values with `LET`; the projection the caller
/// wants is always the final statement.
pub fn take_rows<T>(response: &mut Response, operation: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let index = last_index(response, operation)?;
    response.take::<Vec<T>>(index).map_err(|e| decode_error(operation, e))
}

/// Decode the single value of the last statement in a response.
pub fn take_one<T>(response: &mut Response, operation: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let index = last_index(response, operation)?;
    response.take::<Option<T>>(index).map_err(|e| decode_error(operation, e))
}

fn last_index(response: &Response, operation: &str) -> Result<usize> {
    response.num_statements().checked_sub(1).ok_or_else(|| {
        SocialError::engine_query(format!("{} returned no statement results", operation))
    })
}

fn decode_error(operation: &str, e: surrealdb::Error) -> SocialError {
    SocialError::engine_query(format!("Failed to decode {} result: {}", operation, e))
}
