//! Command implementations for the social CLI.
//!
//! Each handler runs one façade operation and renders the result in the
//! requested output format.

use crate::output::{self, OutputFormat, TableBuilder};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use social_core::config::SocialConfig;
use social_core::types::{
    Community, ConnectionPath, FriendSuggestion, InterestMatch, NetworkStatistics, UserSummary,
};
use social_storage::{ConnectionConfig, SocialGraph};

/// Connect to the engine described by the configuration.
///
/// `memory` forces the embedded engine regardless of the configured mode.
pub async fn open_graph(config: &SocialConfig, memory: bool) -> Result<SocialGraph> {
    let mut connection = ConnectionConfig::from_database_config(&config.database, &config.queries);
    if memory {
        connection = ConnectionConfig::memory()
            .with_namespace(connection.namespace)
            .with_database(connection.database)
            .with_timeouts(connection.connect_timeout, connection.query_timeout)
            .with_result_limit(connection.result_limit)
            .with_max_path_depth(connection.max_path_depth);
    }

    let endpoint = connection.connection_string();
    SocialGraph::connect(connection)
        .await
        .with_context(|| format!("Failed to open social graph at {}", endpoint))
}

// ==============================================================================
// Writes
// ==============================================================================

pub async fn create_user(
    graph: &SocialGraph,
    user_id: &str,
    name: &str,
    age: u32,
    location: &str,
    format: OutputFormat,
) -> Result<()> {
    let user = graph.create_user(user_id, name, age, location).await?;

    match format {
        OutputFormat::Json => output::json(&user),
        OutputFormat::Human => {
            output::success(format!("Saved user {} ({})", user.user_id, user.name));
            Ok(())
        }
    }
}

pub async fn add_friendship(
    graph: &SocialGraph,
    user1_id: &str,
    user2_id: &str,
    since: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let since = since.map(parse_since).transpose()?;
    graph.add_friendship(user1_id, user2_id, since).await?;

    match format {
        OutputFormat::Json => output::json(&json!({
            "user1_id": user1_id,
            "user2_id": user2_id,
            "since": since,
        })),
        OutputFormat::Human => {
            output::success(format!("{} and {} are now friends", user1_id, user2_id));
            Ok(())
        }
    }
}

pub async fn add_interest(
    graph: &SocialGraph,
    user_id: &str,
    interest: &str,
    format: OutputFormat,
) -> Result<()> {
    graph.add_interest(user_id, interest).await?;

    match format {
        OutputFormat::Json => output::json(&json!({
            "user_id": user_id,
            "interest": interest.trim(),
        })),
        OutputFormat::Human => {
            output::success(format!("{} is interested in {}", user_id, interest.trim()));
            Ok(())
        }
    }
}

/// Wipe the graph. Asks first unless `yes` is set.
pub async fn clear(graph: &SocialGraph, yes: bool, format: OutputFormat) -> Result<()> {
    if !yes {
        if format == OutputFormat::Json {
            anyhow::bail!("Refusing to clear without --yes in JSON mode");
        }
        if !output::confirm("Delete every user, interest and friendship?")? {
            output::warning("Aborted");
            return Ok(());
        }
    }

    graph.clear_database().await?;

    match format {
        OutputFormat::Json => output::json(&json!({ "cleared": true })),
        OutputFormat::Human => {
            output::success("Social graph cleared");
            Ok(())
        }
    }
}

fn parse_since(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --since timestamp '{}', expected RFC 3339", value))
}

// ==============================================================================
// Reads
// ==============================================================================

pub async fn show_user(graph: &SocialGraph, user_id: &str, format: OutputFormat) -> Result<()> {
    let user = graph.get_user(user_id).await?;
    let interests = graph.list_interests(user_id).await?;

    match format {
        OutputFormat::Json => output::json(&json!({
            "user": user,
            "interests": interests,
        })),
        OutputFormat::Human => {
            match user {
                Some(user) => {
                    output::header(&user.name);
                    output::kv("ID", &user.user_id);
                    output::kv("Age", user.age);
                    output::kv("Location", &user.location);
                    output::kv(
                        "Interests",
                        if interests.is_empty() {
                            "-".to_string()
                        } else {
                            interests.join(", ")
                        },
                    );
                }
                None => output::warning(format!("No user with id {}", user_id)),
            }
            Ok(())
        }
    }
}

pub async fn list_friends(graph: &SocialGraph, user_id: &str, format: OutputFormat) -> Result<()> {
    let friends = graph.list_friends(user_id).await?;

    match format {
        OutputFormat::Json => output::json(&friends),
        OutputFormat::Human => {
            output::header(format!("Friends of {}", user_id));
            print_users(&friends);
            Ok(())
        }
    }
}

pub async fn friends_of_friends(
    graph: &SocialGraph,
    user_id: &str,
    format: OutputFormat,
) -> Result<()> {
    let suggestions = graph.find_friends_of_friends(user_id).await?;

    match format {
        OutputFormat::Json => output::json(&suggestions),
        OutputFormat::Human => {
            output::header(format!("Friend suggestions for {}", user_id));
            print_suggestions(&suggestions);
            Ok(())
        }
    }
}

pub async fn shortest_path(
    graph: &SocialGraph,
    from: &str,
    to: &str,
    format: OutputFormat,
) -> Result<()> {
    let path = graph.find_shortest_connection_path(from, to).await?;

    match format {
        OutputFormat::Json => output::json(&json!({
            "from": from,
            "to": to,
            "degrees": path.as_ref().map(ConnectionPath::degrees),
            "path": path,
        })),
        OutputFormat::Human => {
            output::header(format!("Shortest path from {} to {}", from, to));
            print_path(path.as_ref(), from, to);
            Ok(())
        }
    }
}

pub async fn recommend(graph: &SocialGraph, user_id: &str, format: OutputFormat) -> Result<()> {
    let matches = graph.recommend_friends_by_interests(user_id).await?;

    match format {
        OutputFormat::Json => output::json(&matches),
        OutputFormat::Human => {
            output::header(format!("Recommendations for {}", user_id));
            print_matches(&matches);
            Ok(())
        }
    }
}

pub async fn communities(
    graph: &SocialGraph,
    min_members: usize,
    format: OutputFormat,
) -> Result<()> {
    let communities = graph.find_communities(min_members).await?;

    match format {
        OutputFormat::Json => output::json(&communities),
        OutputFormat::Human => {
            output::header(format!("Interest communities ({}+ members)", min_members));
            print_communities(&communities);
            Ok(())
        }
    }
}

pub async fn statistics(graph: &SocialGraph, user_id: &str, format: OutputFormat) -> Result<()> {
    let stats = graph.get_network_statistics(user_id).await?;

    match format {
        OutputFormat::Json => output::json(&stats),
        OutputFormat::Human => {
            print_statistics(&stats);
            Ok(())
        }
    }
}

// ==============================================================================
// Human rendering
// ==============================================================================

pub fn print_users(users: &[UserSummary]) {
    if users.is_empty() {
        output::info("No friends");
        return;
    }

    users
        .iter()
        .fold(
            TableBuilder::new().header(["ID", "Name", "Location"]),
            |table, u| table.row([u.user_id.as_str(), u.name.as_str(), u.location.as_str()]),
        )
        .print();
}

pub fn print_suggestions(suggestions: &[FriendSuggestion]) {
    if suggestions.is_empty() {
        output::info("No friends of friends");
        return;
    }

    suggestions
        .iter()
        .fold(
            TableBuilder::new().header(["Name", "Location", "Mutual friends"]),
            |table, s| {
                table.row([
                    s.name.clone(),
                    s.location.clone(),
                    s.mutual_friends.to_string(),
                ])
            },
        )
        .print();
}

pub fn print_path(path: Option<&ConnectionPath>, from: &str, to: &str) {
    match path {
        Some(path) => {
            println!("  {}", path.names().join(" → "));
            output::kv("Degrees of separation", output::format_degrees(path.degrees()));
        }
        None => output::info(format!("No connection between {} and {}", from, to)),
    }
}

pub fn print_matches(matches: &[InterestMatch]) {
    if matches.is_empty() {
        output::info("No recommendations");
        return;
    }

    matches
        .iter()
        .fold(
            TableBuilder::new().header(["Name", "Location", "Shared", "Common interests"]),
            |table, m| {
                table.row([
                    m.name.clone(),
                    m.location.clone(),
                    m.shared_interests.to_string(),
                    m.common_interests.join(", "),
                ])
            },
        )
        .print();
}

pub fn print_communities(communities: &[Community]) {
    if communities.is_empty() {
        output::info("No communities");
        return;
    }

    communities
        .iter()
        .fold(
            TableBuilder::new().header(["Interest", "Members", "Who"]),
            |table, c| {
                table.row([
                    c.interest.clone(),
                    c.member_count.to_string(),
                    c.members.join(", "),
                ])
            },
        )
        .print();
}

pub fn print_statistics(stats: &NetworkStatistics) {
    output::header(format!(
        "Network statistics for {}",
        stats.name.as_deref().unwrap_or(&stats.user_id)
    ));
    output::kv("Friends", stats.friend_count);
    output::kv("Interests", stats.interest_count);
    output::kv("Potential connections", stats.potential_connections);
}
