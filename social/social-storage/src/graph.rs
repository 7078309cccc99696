//! The social graph façade.
//!
//! [`SocialGraph`] owns one engine session and exposes one method per use
//! case. Every method validates its input, submits exactly one query script
//! and maps the returned rows into records from `social_core::types`. All
//! traversal, path finding and aggregation happens inside the engine.
//!
//! Reads against an unknown user id return empty results (empty vectors,
//! `None`, zero counts). Writes that reference an unknown user fail with
//! [`SocialError::NotFound`].

use crate::connection::ConnectionConfig;
use crate::queries;
use crate::session::{self, GraphSession};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use social_core::error::{Result, SocialError};
use social_core::types::{
    validate_id, Community, ConnectionPath, FriendSuggestion, InterestMatch, NetworkStatistics,
    User, UserSummary,
};
use tracing::{info, instrument, warn};

/// Typed entry point to the social network stored in the engine.
pub struct SocialGraph {
    session: GraphSession,
    result_limit: usize,
    max_path_depth: usize,
}

impl SocialGraph {
    /// Open a session and make sure the schema exists
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        let session = GraphSession::open(&config).await?;
        info!(endpoint = session.endpoint(), "Social graph ready");

        Ok(Self {
            session,
            result_limit: config.result_limit,
            max_path_depth: config.max_path_depth,
        })
    }

    /// Release the session
    pub fn close(self) {
        info!(endpoint = self.session.endpoint(), "Closing social graph");
    }

    /// Upsert a user keyed by `user_id`; later calls overwrite the attributes.
    #[instrument(skip(self, name, location))]
    pub async fn create_user(
        &self,
        user_id: &str,
        name: &str,
        age: u32,
        location: &str,
    ) -> Result<User> {
        let user = User::new(user_id.trim(), name.trim(), age, location.trim());
        user.validate()?;

        self.session.execute(queries::create_user(&user)).await?;
        Ok(user)
    }

    /// Make two users friends in both directions.
    ///
    /// Existing edges are reused, so repeating the call never duplicates the
    /// friendship. `since` defaults to now.
    #[instrument(skip(self))]
    pub async fn add_friendship(
        &self,
        user1_id: &str,
        user2_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let (user1_id, user2_id) = (user1_id.trim(), user2_id.trim());
        validate_id("user id", user1_id)?;
        validate_id("user id", user2_id)?;
        if user1_id == user2_id {
            return Err(SocialError::validation(format!(
                "user {} cannot befriend themselves",
                user1_id
            )));
        }

        let since = since.unwrap_or_else(Utc::now).to_rfc3339();
        let operation = queries::add_friendship(user1_id, user2_id, &since);
        let name = operation.name();

        let mut response = self.session.execute(operation).await?;
        let found: Vec<String> = session::take_rows(&mut response, name)?;

        if let Some(missing) = [user1_id, user2_id]
            .into_iter()
            .find(|id| !found.iter().any(|f| f == id))
        {
            warn!(user_id = missing, "Friendship references an unknown user");
            return Err(SocialError::not_found("user", missing));
        }

        Ok(())
    }

    /// Tag a user with an interest, creating the interest on first use.
    #[instrument(skip(self))]
    pub async fn add_interest(&self, user_id: &str, interest: &str) -> Result<()> {
        let (user_id, interest) = (user_id.trim(), interest.trim());
        validate_id("user id", user_id)?;
        validate_id("interest", interest)?;

        let operation = queries::add_interest(user_id, interest);
        let name = operation.name();

        let mut response = self.session.execute(operation).await?;
        let found: Vec<String> = session::take_rows(&mut response, name)?;

        if found.is_empty() {
            warn!(user_id, "Interest references an unknown user");
            return Err(SocialError::not_found("user", user_id));
        }

        Ok(())
    }

    /// Users exactly two hops away, ranked by mutual friends then name.
    #[instrument(skip(self))]
    pub async fn find_friends_of_friends(&self, user_id: &str) -> Result<Vec<FriendSuggestion>> {
        let user_id = user_id.trim();
        validate_id("user id", user_id)?;

        let operation = queries::friends_of_friends(user_id, self.result_limit);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        session::take_rows(&mut response, name)
    }

    /// Minimum-hop friendship path, or `None` when the users are not connected
    /// within the configured `max_path_depth` hops.
    #[instrument(skip(self))]
    pub async fn find_shortest_connection_path(
        &self,
        user1_id: &str,
        user2_id: &str,
    ) -> Result<Option<ConnectionPath>> {
        let (user1_id, user2_id) = (user1_id.trim(), user2_id.trim());
        validate_id("user id", user1_id)?;
        validate_id("user id", user2_id)?;

        if user1_id == user2_id {
            let path = self.get_user(user1_id).await?.map(|user| ConnectionPath {
                users: vec![UserSummary {
                    user_id: user.user_id,
                    name: user.name,
                    location: user.location,
                }],
            });
            return Ok(path);
        }

        let operation = queries::shortest_path(user1_id, user2_id, self.max_path_depth);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        let users: Vec<UserSummary> = session::take_rows(&mut response, name)?;

        if users.len() < 2 {
            return Ok(None);
        }
        Ok(Some(ConnectionPath { users }))
    }

    /// Non-friends ranked by how many interests they share with the user.
    #[instrument(skip(self))]
    pub async fn recommend_friends_by_interests(
        &self,
        user_id: &str,
    ) -> Result<Vec<InterestMatch>> {
        let user_id = user_id.trim();
        validate_id("user id", user_id)?;

        let operation = queries::recommend_by_interests(user_id, self.result_limit);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        session::take_rows(&mut response, name)
    }

    /// Interests with at least `min_connections` members, largest first.
    #[instrument(skip(self))]
    pub async fn find_communities(&self, min_connections: usize) -> Result<Vec<Community>> {
        let operation = queries::communities(min_connections);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        session::take_rows(&mut response, name)
    }

    /// Friend, interest and friends-of-friends counts for a user.
    #[instrument(skip(self))]
    pub async fn get_network_statistics(&self, user_id: &str) -> Result<NetworkStatistics> {
        let user_id = user_id.trim();
        validate_id("user id", user_id)?;

        let operation = queries::network_statistics(user_id);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        let stats: Option<NetworkStatistics> = session::take_one(&mut response, name)?;

        Ok(stats.unwrap_or_else(|| NetworkStatistics::empty(user_id)))
    }

    /// Remove every user, interest and relationship. Irreversible.
    #[instrument(skip(self))]
    pub async fn clear_database(&self) -> Result<()> {
        warn!("Clearing the social graph");
        self.session.execute(queries::clear_database()).await?;
        Ok(())
    }

    /// Look up a single user
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user_id = user_id.trim();
        validate_id("user id", user_id)?;

        let operation = queries::get_user(user_id);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        session::take_one(&mut response, name)
    }

    /// Direct friends ordered by name
    #[instrument(skip(self))]
    pub async fn list_friends(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        let user_id = user_id.trim();
        validate_id("user id", user_id)?;

        let operation = queries::list_friends(user_id);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        session::take_rows(&mut response, name)
    }

    /// Interest names of a user, sorted
    #[instrument(skip(self))]
    pub async fn list_interests(&self, user_id: &str) -> Result<Vec<String>> {
        let user_id = user_id.trim();
        validate_id("user id", user_id)?;

        let operation = queries::list_interests(user_id);
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        session::take_rows(&mut response, name)
    }

    /// Number of stored users
    pub async fn user_count(&self) -> Result<u64> {
        #[derive(Deserialize)]
        struct CountRow {
            total: u64,
        }

        let operation = queries::user_count();
        let name = operation.name();
        let mut response = self.session.execute(operation).await?;
        let row: Option<CountRow> = session::take_one(&mut response, name)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }
}
