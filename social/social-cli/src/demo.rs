//! The guided walkthrough behind `social demo`.

use crate::commands;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use serde::Serialize;
use social_core::sample::{
    sample_write_count, SAMPLE_FRIENDSHIPS, SAMPLE_INTERESTS, SAMPLE_USERS,
};
use social_core::types::{
    Community, ConnectionPath, FriendSuggestion, InterestMatch, NetworkStatistics,
    DEFAULT_MIN_COMMUNITY_SIZE,
};
use social_storage::SocialGraph;
use tracing::info;

/// Users the walkthrough reports statistics for
pub const STATS_USERS: [&str; 3] = ["alice", "bob", "frank"];

/// Everything the walkthrough computed, in display order.
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub friends_of_friends: Vec<FriendSuggestion>,
    pub shortest_path: Option<ConnectionPath>,
    pub recommendations: Vec<InterestMatch>,
    pub communities: Vec<Community>,
    pub statistics: Vec<NetworkStatistics>,
}

/// Wipe the graph and load the sample network.
pub async fn seed(graph: &SocialGraph, show_progress: bool) -> Result<()> {
    graph
        .clear_database()
        .await
        .context("Failed to clear the graph before seeding")?;

    let steps = sample_write_count();
    let progress = if show_progress {
        Some(output::progress_bar(steps as u64, "Seeding sample network")?)
    } else {
        None
    };
    let tick = || {
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    };

    for (id, name, age, location) in SAMPLE_USERS {
        graph
            .create_user(id, name, age, location)
            .await
            .with_context(|| format!("Failed to create user {}", id))?;
        tick();
    }

    for (a, b) in SAMPLE_FRIENDSHIPS {
        graph
            .add_friendship(a, b, None)
            .await
            .with_context(|| format!("Failed to link {} and {}", a, b))?;
        tick();
    }

    for (id, interests) in SAMPLE_INTERESTS {
        for interest in interests {
            graph
                .add_interest(id, interest)
                .await
                .with_context(|| format!("Failed to tag {} with {}", id, interest))?;
            tick();
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        users = SAMPLE_USERS.len(),
        friendships = SAMPLE_FRIENDSHIPS.len(),
        "Sample network loaded"
    );
    Ok(())
}

/// Run every query against the seeded sample network.
pub async fn collect(graph: &SocialGraph) -> Result<DemoReport> {
    let friends_of_friends = graph.find_friends_of_friends("alice").await?;
    let shortest_path = graph
        .find_shortest_connection_path("alice", "henry")
        .await?;
    let recommendations = graph.recommend_friends_by_interests("alice").await?;
    let communities = graph.find_communities(DEFAULT_MIN_COMMUNITY_SIZE).await?;

    let mut statistics = Vec::with_capacity(STATS_USERS.len());
    for id in STATS_USERS {
        statistics.push(graph.get_network_statistics(id).await?);
    }

    Ok(DemoReport {
        friends_of_friends,
        shortest_path,
        recommendations,
        communities,
        statistics,
    })
}

/// Seed, query and print the sample network.
pub async fn run(graph: &SocialGraph, format: OutputFormat) -> Result<()> {
    seed(graph, format == OutputFormat::Human).await?;
    let report = collect(graph).await?;

    match format {
        OutputFormat::Json => output::json(&report),
        OutputFormat::Human => {
            output::success(format!(
                "Loaded {} users and {} friendships",
                SAMPLE_USERS.len(),
                SAMPLE_FRIENDSHIPS.len()
            ));

            output::header("Friend suggestions for Alice (friends of friends)");
            commands::print_suggestions(&report.friends_of_friends);

            output::header("Shortest path from Alice to Henry");
            commands::print_path(report.shortest_path.as_ref(), "alice", "henry");

            output::header("Recommendations for Alice by shared interests");
            commands::print_matches(&report.recommendations);

            output::header(format!(
                "Interest communities ({}+ members)",
                DEFAULT_MIN_COMMUNITY_SIZE
            ));
            commands::print_communities(&report.communities);

            for stats in &report.statistics {
                commands::print_statistics(stats);
            }
            Ok(())
        }
    }
}
