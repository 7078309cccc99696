//! Integration tests for the social graph façade.
//!
//! Every test runs against its own embedded in-memory engine, so no server
//! is required and tests never observe each other's data.

use social_core::sample::{SAMPLE_FRIENDSHIPS, SAMPLE_INTERESTS, SAMPLE_USERS};
use social_storage::prelude::*;
use social_storage::{GraphSession, Statement};
use std::time::{Duration, Instant};

// ==============================================================================
// Test Helpers
// ==============================================================================

/// Open a façade over a fresh in-memory engine
async fn create_test_graph() -> SocialGraph {
    SocialGraph::connect(ConnectionConfig::memory())
        .await
        .expect("Failed to connect to in-memory engine")
}

/// Load the eight-user sample network
async fn seed_network(graph: &SocialGraph) {
    for (id, name, age, location) in SAMPLE_USERS {
        graph
            .create_user(id, name, age, location)
            .await
            .expect("Failed to create user");
    }
    for (a, b) in SAMPLE_FRIENDSHIPS {
        graph
            .add_friendship(a, b, None)
            .await
            .expect("Failed to add friendship");
    }
    for (id, interests) in SAMPLE_INTERESTS {
        for interest in interests {
            graph
                .add_interest(id, interest)
                .await
                .expect("Failed to add interest");
        }
    }
}

fn names<T, F>(rows: &[T], name: F) -> Vec<&str>
where
    F: Fn(&T) -> &str,
{
    rows.iter().map(name).collect()
}

// ==============================================================================
// Users
// ==============================================================================

#[tokio::test]
async fn test_create_user_upserts_by_id() {
    let graph = create_test_graph().await;

    let user = graph
        .create_user("alice", "Alice Johnson", 28, "New York")
        .await
        .unwrap();
    assert_eq!(user.user_id, "alice");

    graph
        .create_user("alice", "Alice Cooper", 29, "Boston")
        .await
        .unwrap();

    let stored = graph.get_user("alice").await.unwrap().expect("user exists");
    assert_eq!(stored.name, "Alice Cooper");
    assert_eq!(stored.age, 29);
    assert_eq!(stored.location, "Boston");
    assert_eq!(graph.user_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_user_rejects_invalid_input() {
    let graph = create_test_graph().await;

    let err = graph.create_user("", "Nobody", 20, "Nowhere").await.unwrap_err();
    assert!(err.is_validation());

    let err = graph.create_user("zed", "   ", 20, "Nowhere").await.unwrap_err();
    assert!(err.is_validation());

    assert_eq!(graph.user_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_unknown_user_is_none() {
    let graph = create_test_graph().await;
    assert!(graph.get_user("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_hostile_ids_are_stored_verbatim() {
    let graph = create_test_graph().await;
    let id = "x'); DELETE user; --";

    graph.create_user("bob", "Bob Smith", 32, "San Francisco").await.unwrap();
    graph.create_user(id, "Mallory", 40, "Unknown").await.unwrap();

    let stored = graph.get_user(id).await.unwrap().expect("user exists");
    assert_eq!(stored.user_id, id);
    assert_eq!(graph.user_count().await.unwrap(), 2);
}

// ==============================================================================
// Friendships
// ==============================================================================

#[tokio::test]
async fn test_friendship_is_symmetric() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();
    graph.create_user("bob", "Bob Smith", 32, "San Francisco").await.unwrap();

    graph.add_friendship("alice", "bob", None).await.unwrap();

    let alice_friends = graph.list_friends("alice").await.unwrap();
    let bob_friends = graph.list_friends("bob").await.unwrap();
    assert_eq!(names(&alice_friends, |u| u.name.as_str()), vec!["Bob Smith"]);
    assert_eq!(names(&bob_friends, |u| u.name.as_str()), vec!["Alice Johnson"]);
}

#[tokio::test]
async fn test_friendship_is_idempotent() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();
    graph.create_user("bob", "Bob Smith", 32, "San Francisco").await.unwrap();

    graph.add_friendship("alice", "bob", None).await.unwrap();
    graph.add_friendship("alice", "bob", None).await.unwrap();
    graph.add_friendship("bob", "alice", None).await.unwrap();

    assert_eq!(graph.list_friends("alice").await.unwrap().len(), 1);
    assert_eq!(graph.list_friends("bob").await.unwrap().len(), 1);

    let stats = graph.get_network_statistics("alice").await.unwrap();
    assert_eq!(stats.friend_count, 1);
}

#[tokio::test]
async fn test_friendship_with_unknown_user_is_not_found() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();

    let err = graph.add_friendship("alice", "ghost", None).await.unwrap_err();
    match err {
        SocialError::NotFound { resource, id } => {
            assert_eq!(resource, "user");
            assert_eq!(id, "ghost");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }

    // Nothing was written for the known endpoint either
    assert!(graph.list_friends("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_self_friendship_is_rejected() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();

    let err = graph.add_friendship("alice", "alice", None).await.unwrap_err();
    assert!(err.is_validation());
    assert!(graph.list_friends("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_friendship_with_explicit_timestamp() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();
    graph.create_user("bob", "Bob Smith", 32, "San Francisco").await.unwrap();

    let since = chrono::DateTime::parse_from_rfc3339("2020-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    graph.add_friendship("alice", "bob", Some(since)).await.unwrap();

    assert_eq!(graph.list_friends("alice").await.unwrap().len(), 1);
}

// ==============================================================================
// Interests
// ==============================================================================

#[tokio::test]
async fn test_interest_is_idempotent() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();

    graph.add_interest("alice", "hiking").await.unwrap();
    graph.add_interest("alice", "hiking").await.unwrap();
    graph.add_interest("alice", "cooking").await.unwrap();

    assert_eq!(
        graph.list_interests("alice").await.unwrap(),
        vec!["cooking".to_string(), "hiking".to_string()]
    );
}

#[tokio::test]
async fn test_interest_node_is_shared() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();
    graph.create_user("bob", "Bob Smith", 32, "San Francisco").await.unwrap();

    graph.add_interest("alice", "hiking").await.unwrap();
    graph.add_interest("bob", "hiking").await.unwrap();

    let communities = graph.find_communities(2).await.unwrap();
    assert_eq!(communities.len(), 1);
    assert_eq!(communities[0].interest, "hiking");
    assert_eq!(communities[0].member_count, 2);
}

#[tokio::test]
async fn test_interest_for_unknown_user_is_not_found() {
    let graph = create_test_graph().await;

    let err = graph.add_interest("ghost", "hiking").await.unwrap_err();
    assert!(err.is_not_found());

    // The interest node is only created for a known user
    assert!(graph.find_communities(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_interest_is_rejected() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();

    let err = graph.add_interest("alice", "  ").await.unwrap_err();
    assert!(err.is_validation());
}

// ==============================================================================
// Friends of friends
// ==============================================================================

#[tokio::test]
async fn test_friends_of_friends_sample_network() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let suggestions = graph.find_friends_of_friends("alice").await.unwrap();

    assert_eq!(names(&suggestions, |s| s.name.as_str()), vec!["David Brown", "Eve Davis"]);
    assert!(suggestions.iter().all(|s| s.mutual_friends == 1));
}

#[tokio::test]
async fn test_friends_of_friends_ranks_by_mutual_friends() {
    let graph = create_test_graph().await;
    for (id, name) in [("a", "Ann"), ("b", "Ben"), ("c", "Cid"), ("x", "Xena"), ("y", "Yan")] {
        graph.create_user(id, name, 30, "Town").await.unwrap();
    }
    graph.add_friendship("a", "b", None).await.unwrap();
    graph.add_friendship("a", "c", None).await.unwrap();
    graph.add_friendship("b", "y", None).await.unwrap();
    graph.add_friendship("b", "x", None).await.unwrap();
    graph.add_friendship("c", "x", None).await.unwrap();

    let suggestions = graph.find_friends_of_friends("a").await.unwrap();

    assert_eq!(names(&suggestions, |s| s.user_id.as_str()), vec!["x", "y"]);
    assert_eq!(suggestions[0].mutual_friends, 2);
    assert_eq!(suggestions[1].mutual_friends, 1);
}

#[tokio::test]
async fn test_friends_of_friends_excludes_self_and_friends() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let suggestions = graph.find_friends_of_friends("bob").await.unwrap();
    let ids = names(&suggestions, |s| s.user_id.as_str());

    assert!(!ids.contains(&"bob"));
    for friend in ["alice", "david", "eve"] {
        assert!(!ids.contains(&friend), "{} is a direct friend", friend);
    }
}

#[tokio::test]
async fn test_friends_of_friends_respects_result_limit() {
    let config = ConnectionConfig::memory().with_result_limit(1);
    let graph = SocialGraph::connect(config).await.unwrap();
    seed_network(&graph).await;

    let suggestions = graph.find_friends_of_friends("alice").await.unwrap();
    assert_eq!(names(&suggestions, |s| s.name.as_str()), vec!["David Brown"]);
}

#[tokio::test]
async fn test_friends_of_unknown_user_is_empty() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    assert!(graph.find_friends_of_friends("ghost").await.unwrap().is_empty());
}

// ==============================================================================
// Shortest path
// ==============================================================================

#[tokio::test]
async fn test_shortest_path_sample_network() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let path = graph
        .find_shortest_connection_path("alice", "henry")
        .await
        .unwrap()
        .expect("alice and henry are connected");

    assert_eq!(
        path.names(),
        vec!["Alice Johnson", "Bob Smith", "David Brown", "Henry Moore"]
    );
    assert_eq!(path.degrees(), 3);
}

#[tokio::test]
async fn test_shortest_path_to_direct_friend() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let path = graph
        .find_shortest_connection_path("alice", "bob")
        .await
        .unwrap()
        .expect("alice and bob are friends");

    assert_eq!(path.names(), vec!["Alice Johnson", "Bob Smith"]);
    assert_eq!(path.degrees(), 1);
}

#[tokio::test]
async fn test_shortest_path_to_self() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let path = graph
        .find_shortest_connection_path("alice", "alice")
        .await
        .unwrap()
        .expect("a user reaches themselves");

    assert_eq!(path.names(), vec!["Alice Johnson"]);
    assert_eq!(path.degrees(), 0);
}

#[tokio::test]
async fn test_shortest_path_disconnected_is_none() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;
    graph.create_user("zoe", "Zoe Hermit", 40, "Nowhere").await.unwrap();

    assert!(graph
        .find_shortest_connection_path("alice", "zoe")
        .await
        .unwrap()
        .is_none());
    assert!(graph
        .find_shortest_connection_path("alice", "ghost")
        .await
        .unwrap()
        .is_none());
    assert!(graph
        .find_shortest_connection_path("ghost", "ghost")
        .await
        .unwrap()
        .is_none());
}

// ==============================================================================
// Interest recommendations
// ==============================================================================

#[tokio::test]
async fn test_recommendations_sample_network() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let matches = graph.recommend_friends_by_interests("alice").await.unwrap();

    assert_eq!(
        names(&matches, |m| m.name.as_str()),
        vec!["Eve Davis", "Frank Miller", "Henry Moore"]
    );
    assert!(matches.iter().all(|m| m.shared_interests == 1));
    assert_eq!(matches[0].common_interests, vec!["photography".to_string()]);
    assert_eq!(matches[1].common_interests, vec!["cooking".to_string()]);
    assert_eq!(matches[2].common_interests, vec!["hiking".to_string()]);
}

#[tokio::test]
async fn test_recommendations_rank_by_shared_interests() {
    let graph = create_test_graph().await;
    for (id, name) in [("a", "Ann"), ("b", "Ben"), ("c", "Cid")] {
        graph.create_user(id, name, 30, "Town").await.unwrap();
    }
    for interest in ["chess", "go", "poker"] {
        graph.add_interest("a", interest).await.unwrap();
    }
    graph.add_interest("b", "chess").await.unwrap();
    graph.add_interest("c", "chess").await.unwrap();
    graph.add_interest("c", "poker").await.unwrap();

    let matches = graph.recommend_friends_by_interests("a").await.unwrap();

    assert_eq!(names(&matches, |m| m.user_id.as_str()), vec!["c", "b"]);
    assert_eq!(matches[0].shared_interests, 2);
    assert_eq!(
        matches[0].common_interests,
        vec!["chess".to_string(), "poker".to_string()]
    );
}

#[tokio::test]
async fn test_recommendations_exclude_friends() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let matches = graph.recommend_friends_by_interests("alice").await.unwrap();
    let ids = names(&matches, |m| m.user_id.as_str());

    for excluded in ["alice", "bob", "carol", "grace"] {
        assert!(!ids.contains(&excluded), "{} should not be recommended", excluded);
    }
}

// ==============================================================================
// Communities
// ==============================================================================

#[tokio::test]
async fn test_communities_sample_network() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let communities = graph
        .find_communities(DEFAULT_MIN_COMMUNITY_SIZE)
        .await
        .unwrap();

    assert_eq!(
        names(&communities, |c| c.interest.as_str()),
        vec![
            "cooking",
            "gaming",
            "hiking",
            "music",
            "photography",
            "technology",
            "travel"
        ]
    );
    assert_eq!(communities[0].member_count, 4);
    assert_eq!(
        communities[0].members,
        vec!["Alice Johnson", "Carol White", "Frank Miller", "Grace Wilson"]
    );
    assert!(communities[1..].iter().all(|c| c.member_count == 3));
}

#[tokio::test]
async fn test_communities_threshold() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let large = graph.find_communities(4).await.unwrap();
    assert_eq!(names(&large, |c| c.interest.as_str()), vec!["cooking"]);

    let all = graph.find_communities(1).await.unwrap();
    assert_eq!(all.len(), 8);
    assert_eq!(all.last().map(|c| c.interest.as_str()), Some("yoga"));

    assert!(graph.find_communities(10).await.unwrap().is_empty());
}

// ==============================================================================
// Statistics
// ==============================================================================

#[tokio::test]
async fn test_network_statistics_sample_network() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    let alice = graph.get_network_statistics("alice").await.unwrap();
    assert_eq!(alice.name.as_deref(), Some("Alice Johnson"));
    assert_eq!(alice.friend_count, 3);
    assert_eq!(alice.interest_count, 3);
    assert_eq!(alice.potential_connections, 2);

    let bob = graph.get_network_statistics("bob").await.unwrap();
    assert_eq!(bob.friend_count, 3);
    assert_eq!(bob.potential_connections, 4);

    let frank = graph.get_network_statistics("frank").await.unwrap();
    assert_eq!(frank.friend_count, 2);
    assert_eq!(frank.interest_count, 3);
    assert_eq!(frank.potential_connections, 2);
}

#[tokio::test]
async fn test_potential_connections_match_friends_of_friends() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    for (id, ..) in SAMPLE_USERS {
        let stats = graph.get_network_statistics(id).await.unwrap();
        let suggestions = graph.find_friends_of_friends(id).await.unwrap();
        assert_eq!(
            stats.potential_connections,
            suggestions.len() as u64,
            "mismatch for {}",
            id
        );
    }
}

#[tokio::test]
async fn test_network_statistics_unknown_user() {
    let graph = create_test_graph().await;

    let stats = graph.get_network_statistics("ghost").await.unwrap();
    assert_eq!(stats, NetworkStatistics::empty("ghost"));
}

// ==============================================================================
// Clearing
// ==============================================================================

#[tokio::test]
async fn test_clear_database() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;
    assert_eq!(graph.user_count().await.unwrap(), 8);

    graph.clear_database().await.unwrap();

    assert_eq!(graph.user_count().await.unwrap(), 0);
    assert!(graph.find_communities(0).await.unwrap().is_empty());
    assert!(graph.get_user("alice").await.unwrap().is_none());

    // The schema survives and the graph can be reloaded
    seed_network(&graph).await;
    assert_eq!(graph.user_count().await.unwrap(), 8);
    assert_eq!(graph.list_friends("alice").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_close() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice Johnson", 28, "New York").await.unwrap();
    graph.close();
}

// ==============================================================================
// Small scenarios
// ==============================================================================

#[tokio::test]
async fn test_chain_of_three() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice", 28, "New York").await.unwrap();
    graph.create_user("bob", "Bob", 32, "Boston").await.unwrap();
    graph.create_user("carol", "Carol", 25, "Chicago").await.unwrap();
    graph.add_friendship("alice", "bob", None).await.unwrap();
    graph.add_friendship("bob", "carol", None).await.unwrap();

    let suggestions = graph.find_friends_of_friends("alice").await.unwrap();
    assert_eq!(names(&suggestions, |s| s.name.as_str()), vec!["Carol"]);

    let path = graph
        .find_shortest_connection_path("alice", "carol")
        .await
        .unwrap()
        .expect("alice reaches carol through bob");
    assert_eq!(path.names(), vec!["Alice", "Bob", "Carol"]);
    assert_eq!(path.degrees(), 2);
}

#[tokio::test]
async fn test_disjoint_components_have_no_path() {
    let graph = create_test_graph().await;
    for (id, name) in [("a", "Ann"), ("b", "Ben"), ("c", "Cid"), ("d", "Dee")] {
        graph.create_user(id, name, 30, "Town").await.unwrap();
    }
    graph.add_friendship("a", "b", None).await.unwrap();
    graph.add_friendship("c", "d", None).await.unwrap();

    let path = graph.find_shortest_connection_path("a", "d").await.unwrap();
    assert!(path.is_none());
}

#[tokio::test]
async fn test_two_shared_interests() {
    let graph = create_test_graph().await;
    graph.create_user("alice", "Alice", 28, "New York").await.unwrap();
    graph.create_user("eve", "Eve", 27, "San Francisco").await.unwrap();
    for interest in ["photography", "travel", "hiking"] {
        graph.add_interest("alice", interest).await.unwrap();
    }
    for interest in ["travel", "photography", "yoga"] {
        graph.add_interest("eve", interest).await.unwrap();
    }

    let matches = graph.recommend_friends_by_interests("alice").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].user_id, "eve");
    assert_eq!(matches[0].shared_interests, 2);
    assert_eq!(
        matches[0].common_interests,
        vec!["photography".to_string(), "travel".to_string()]
    );
}

#[tokio::test]
async fn test_statistics_after_clear_are_zero() {
    let graph = create_test_graph().await;
    seed_network(&graph).await;

    graph.clear_database().await.unwrap();

    let stats = graph.get_network_statistics("alice").await.unwrap();
    assert_eq!(stats, NetworkStatistics::empty("alice"));
}

// ==============================================================================
// Path search bounds
// ==============================================================================

/// Link `ids` into a chain, creating each user first
async fn create_chain(graph: &SocialGraph, ids: &[&str]) {
    for id in ids {
        graph.create_user(id, &id.to_uppercase(), 30, "Town").await.unwrap();
    }
    for pair in ids.windows(2) {
        graph.add_friendship(pair[0], pair[1], None).await.unwrap();
    }
}

#[tokio::test]
async fn test_disconnected_path_finishes_within_query_timeout() {
    let config = ConnectionConfig::memory()
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(2));
    let graph = SocialGraph::connect(config).await.unwrap();
    create_chain(&graph, &["c0", "c1", "c2", "c3", "c4", "c5", "c6", "c7"]).await;
    create_chain(&graph, &["island1", "island2"]).await;

    let started = Instant::now();
    let path = graph
        .find_shortest_connection_path("c0", "island2")
        .await
        .expect("an unreachable user is not an error");

    assert!(path.is_none());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_path_prefers_fewest_hops() {
    let graph = create_test_graph().await;
    create_chain(&graph, &["r0", "r1", "r2", "r3", "r4", "r5"]).await;
    graph.add_friendship("r5", "r0", None).await.unwrap();

    let path = graph
        .find_shortest_connection_path("r0", "r4")
        .await
        .unwrap()
        .expect("the ring is connected");

    assert_eq!(path.names(), vec!["R0", "R5", "R4"]);
    assert_eq!(path.degrees(), 2);
}

#[tokio::test]
async fn test_path_beyond_max_depth_is_none() {
    let config = ConnectionConfig::memory().with_max_path_depth(3);
    let graph = SocialGraph::connect(config).await.unwrap();
    create_chain(&graph, &["d0", "d1", "d2", "d3", "d4", "d5"]).await;

    let within = graph
        .find_shortest_connection_path("d0", "d3")
        .await
        .unwrap()
        .expect("three hops fit the cap");
    assert_eq!(within.degrees(), 3);

    let beyond = graph.find_shortest_connection_path("d0", "d5").await.unwrap();
    assert!(beyond.is_none());
}

// ==============================================================================
// Engine errors
// ==============================================================================

#[tokio::test]
async fn test_unreachable_engine_is_connection_error() {
    let config = ConnectionConfig::remote("ws://127.0.0.1:1")
        .with_auth("root".to_string(), "root".to_string())
        .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));

    let err = match SocialGraph::connect(config).await {
        Ok(_) => panic!("nothing listens on port 1"),
        Err(err) => err,
    };
    assert!(err.is_connection(), "expected Connection, got {:?}", err);
}

#[tokio::test]
async fn test_rejected_statement_is_engine_query_error() {
    let session = GraphSession::open(&ConnectionConfig::memory()).await.unwrap();

    let err = session
        .execute(Statement::new("broken", "SELECT FROM WHERE;"))
        .await
        .unwrap_err();
    assert!(err.is_engine_query(), "expected EngineQuery, got {:?}", err);
}
