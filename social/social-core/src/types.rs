//! Record types exchanged with the graph engine.
//!
//! None of these are owned or cached by the client; they are projections of
//! rows the engine returns for a single request.

use crate::error::{Result, SocialError};
use serde::{Deserialize, Serialize};

/// Longest identifier accepted for users and interests.
pub const MAX_ID_LEN: usize = 256;

/// Interest member count at which an interest qualifies as a community
/// when the caller does not pick a threshold.
pub const DEFAULT_MIN_COMMUNITY_SIZE: usize = 3;

/// A member of the social network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub age: u32,
    pub location: String,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        location: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            age,
            location: location.into(),
        }
    }

    /// Check the fields the engine keys on.
    pub fn validate(&self) -> Result<()> {
        validate_id("user id", &self.user_id)?;
        if self.name.trim().is_empty() {
            return Err(SocialError::validation("user name cannot be empty"));
        }
        Ok(())
    }
}

/// Compact user projection used inside other results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    pub name: String,
    pub location: String,
}

/// A second-degree connection and how many friends it shares with the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendSuggestion {
    pub user_id: String,
    pub name: String,
    pub location: String,
    pub mutual_friends: u64,
}

/// Minimum-hop friendship path, ordered from source to target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPath {
    pub users: Vec<UserSummary>,
}

impl ConnectionPath {
    /// Degrees of separation: the number of friendship hops.
    pub fn degrees(&self) -> usize {
        self.users.len().saturating_sub(1)
    }

    /// Display names along the path.
    pub fn names(&self) -> Vec<&str> {
        self.users.iter().map(|u| u.name.as_str()).collect()
    }
}

/// A non-friend who shares interests with the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestMatch {
    pub user_id: String,
    pub name: String,
    pub location: String,
    pub shared_interests: u64,
    pub common_interests: Vec<String>,
}

/// Users grouped under one interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub interest: String,
    pub member_count: u64,
    pub members: Vec<String>,
}

/// Per-user counts computed by the engine in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    pub user_id: String,
    pub name: Option<String>,
    pub friend_count: u64,
    pub interest_count: u64,
    pub potential_connections: u64,
}

impl NetworkStatistics {
    /// Zero counts for an id the engine does not know.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// Reject empty, oversized, or control-character identifiers.
pub fn validate_id(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SocialError::validation(format!("{} cannot be empty", kind)));
    }
    if value.len() > MAX_ID_LEN {
        return Err(SocialError::validation(format!(
            "{} exceeds {} bytes",
            kind, MAX_ID_LEN
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(SocialError::validation(format!(
            "{} contains control characters",
            kind
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_validation() {
        assert!(User::new("alice", "Alice Johnson", 28, "New York").validate().is_ok());
        assert!(User::new("", "Alice", 28, "New York").validate().is_err());
        assert!(User::new("alice", "   ", 28, "New York").validate().is_err());
        // Location is optional
        assert!(User::new("alice", "Alice", 28, "").validate().is_ok());
    }

    #[test]
    fn test_validate_id_rejects_control_chars() {
        let err = validate_id("user id", "ali\nce").unwrap_err();
        assert!(err.is_validation());
        assert!(validate_id("user id", &"x".repeat(MAX_ID_LEN + 1)).is_err());
        assert!(validate_id("user id", &"x".repeat(MAX_ID_LEN)).is_ok());
    }

    #[test]
    fn test_path_degrees() {
        let hop = |id: &str| UserSummary {
            user_id: id.to_string(),
            name: id.to_uppercase(),
            location: String::new(),
        };

        let path = ConnectionPath {
            users: vec![hop("alice"), hop("bob"), hop("carol")],
        };
        assert_eq!(path.degrees(), 2);
        assert_eq!(path.names(), vec!["ALICE", "BOB", "CAROL"]);

        let single = ConnectionPath { users: vec![hop("alice")] };
        assert_eq!(single.degrees(), 0);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = NetworkStatistics::empty("ghost");
        assert_eq!(stats.user_id, "ghost");
        assert_eq!(stats.name, None);
        assert_eq!(stats.friend_count, 0);
        assert_eq!(stats.interest_count, 0);
        assert_eq!(stats.potential_connections, 0);
    }
}
