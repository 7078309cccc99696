//! SurrealQL templates for the social graph.
//!
//! Each façade operation maps to exactly one [`Statement`]: a fixed script
//! plus named parameters. Caller input only ever travels as a parameter,
//! never as script text.

use serde_json::Value;
use social_core::types::User;
use std::collections::BTreeMap;

/// Upsert a user keyed by id.
pub const CREATE_USER: &str = r#"
    UPSERT type::thing('user', $user_id) SET
        user_id = $user_id,
        name = $name,
        age = $age,
        location = $location
    RETURN NONE;
"#;

/// Link two users in both directions, reusing edges that already exist.
/// Returns the ids of the endpoints the engine found.
pub const ADD_FRIENDSHIP: &str = r#"
    LET $a = type::thing('user', $user1_id);
    LET $b = type::thing('user', $user2_id);
    LET $found = SELECT VALUE user_id FROM $a, $b;
    LET $a_rows = SELECT VALUE ->friends_with->user FROM $a;
    LET $b_rows = SELECT VALUE ->friends_with->user FROM $b;
    IF array::len($found) = 2 {
        IF array::flatten($a_rows) CONTAINSNOT $b {
            RELATE $a->friends_with->$b SET friends_since = $since;
        };
        IF array::flatten($b_rows) CONTAINSNOT $a {
            RELATE $b->friends_with->$a SET friends_since = $since;
        };
    };
    RETURN $found;
"#;

/// Tag a user with an interest, creating the interest on first use.
/// Returns the ids of the users the engine found.
pub const ADD_INTEREST: &str = r#"
    LET $u = type::thing('user', $user_id);
    LET $i = type::thing('interest', $interest);
    LET $found = SELECT VALUE user_id FROM $u;
    LET $tagged = SELECT VALUE ->interested_in->interest FROM $u;
    IF array::len($found) = 1 {
        UPSERT $i SET name = $interest RETURN NONE;
        IF array::flatten($tagged) CONTAINSNOT $i {
            RELATE $u->interested_in->$i;
        };
    };
    RETURN $found;
"#;

/// Users two hops away, excluding the subject and direct friends, ranked by
/// how many friends they share with the subject.
pub const FRIENDS_OF_FRIENDS: &str = r#"
    LET $u = type::thing('user', $user_id);
    LET $direct_rows = SELECT VALUE ->friends_with->user FROM $u;
    LET $direct = array::flatten($direct_rows);
    LET $second_rows = SELECT VALUE ->friends_with->user FROM $direct;
    LET $candidates = array::distinct(array::flatten($second_rows));
    SELECT user_id, name, location,
        array::len(array::intersect(->friends_with->user, $direct)) AS mutual_friends
    FROM $candidates
    WHERE id != $u AND $direct CONTAINSNOT id
    ORDER BY mutual_friends DESC, name ASC
    LIMIT $limit;
"#;

/// Minimum-hop friendship route, breadth first over the schema's path
/// functions. The route reads source to target; an empty route means the
/// users are not connected within `$max_depth` hops.
pub const SHORTEST_PATH: &str = r#"
    LET $from = type::thing('user', $user1_id);
    LET $to = type::thing('user', $user2_id);
    LET $found = SELECT VALUE id FROM $from, $to;
    LET $levels = (IF array::len($found) = 2 {
        fn::friend_levels([$from], [$from], $to, $max_depth)
    } ELSE {
        NONE
    });
    LET $route = (IF $levels = NONE {
        []
    } ELSE {
        fn::friend_route($levels, $to, array::len($levels) - 1)
    });
    SELECT user_id, name, location FROM $route;
"#;

/// Non-friends sharing interests with the subject, ranked by overlap.
pub const RECOMMEND_BY_INTERESTS: &str = r#"
    LET $u = type::thing('user', $user_id);
    LET $friend_rows = SELECT VALUE ->friends_with->user FROM $u;
    LET $friends = array::flatten($friend_rows);
    LET $name_rows = SELECT VALUE ->interested_in->interest.name FROM $u;
    LET $mine = array::flatten($name_rows);
    LET $tag_rows = SELECT VALUE ->interested_in->interest FROM $u;
    LET $tags = array::flatten($tag_rows);
    LET $member_rows = SELECT VALUE <-interested_in<-user FROM $tags;
    LET $candidates = array::distinct(array::flatten($member_rows));
    SELECT user_id, name, location,
        array::len(array::intersect(->interested_in->interest.name, $mine)) AS shared_interests,
        array::sort(array::intersect(->interested_in->interest.name, $mine)) AS common_interests
    FROM $candidates
    WHERE id != $u AND $friends CONTAINSNOT id
    ORDER BY shared_interests DESC, name ASC
    LIMIT $limit;
"#;

/// Interests whose member count reaches the threshold, with their members.
pub const COMMUNITIES: &str = r#"
    SELECT name AS interest,
        array::len(<-interested_in<-user) AS member_count,
        array::sort(<-interested_in<-user.name) AS members
    FROM interest
    WHERE array::len(<-interested_in<-user) >= $min_connections
    ORDER BY member_count DESC, interest ASC;
"#;

/// Friend, interest and second-degree counts for one user.
pub const NETWORK_STATISTICS: &str = r#"
    LET $u = type::thing('user', $user_id);
    LET $friend_rows = SELECT VALUE ->friends_with->user FROM $u;
    LET $friends = array::distinct(array::flatten($friend_rows));
    LET $second_rows = SELECT VALUE ->friends_with->user FROM $friends;
    LET $reachable = array::distinct(array::flatten($second_rows));
    LET $potential = array::complement($reachable, array::append($friends, $u));
    LET $interest_rows = SELECT VALUE ->interested_in->interest FROM $u;
    LET $name_rows = SELECT VALUE name FROM $u;
    RETURN {
        user_id: $user_id,
        name: array::first($name_rows),
        friend_count: array::len($friends),
        interest_count: array::len(array::distinct(array::flatten($interest_rows))),
        potential_connections: array::len($potential)
    };
"#;

/// Remove every edge and node of the working graph.
pub const CLEAR_DATABASE: &str = r#"
    DELETE friends_with;
    DELETE interested_in;
    DELETE interest;
    DELETE user;
"#;

pub const GET_USER: &str = r#"
    LET $u = type::thing('user', $user_id);
    SELECT user_id, name, age, location FROM $u;
"#;

pub const LIST_FRIENDS: &str = r#"
    LET $u = type::thing('user', $user_id);
    LET $rows = SELECT VALUE ->friends_with->user FROM $u;
    LET $friends = array::distinct(array::flatten($rows));
    SELECT user_id, name, location FROM $friends ORDER BY name ASC;
"#;

pub const LIST_INTERESTS: &str = r#"
    LET $u = type::thing('user', $user_id);
    LET $rows = SELECT VALUE ->interested_in->interest.name FROM $u;
    RETURN array::sort(array::distinct(array::flatten($rows)));
"#;

pub const USER_COUNT: &str = r#"
    SELECT count() AS total FROM user GROUP ALL;
"#;

/// A query script with its named parameters.
#[derive(Debug, Clone)]
pub struct Statement {
    name: &'static str,
    text: &'static str,
    params: BTreeMap<&'static str, Value>,
}

impl Statement {
    /// Create a statement with no parameters
    pub fn new(name: &'static str, text: &'static str) -> Self {
        Self {
            name,
            text,
            params: BTreeMap::new(),
        }
    }

    /// Bind a named parameter
    pub fn bind(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.params.insert(key, value.into());
        self
    }

    /// Operation label used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn params(&self) -> &BTreeMap<&'static str, Value> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Split into script text and parameters for submission
    pub fn into_parts(self) -> (&'static str, BTreeMap<&'static str, Value>) {
        (self.text, self.params)
    }
}

pub fn create_user(user: &User) -> Statement {
    Statement::new("create_user", CREATE_USER)
        .bind("user_id", user.user_id.as_str())
        .bind("name", user.name.as_str())
        .bind("age", user.age)
        .bind("location", user.location.as_str())
}

pub fn add_friendship(user1_id: &str, user2_id: &str, since: &str) -> Statement {
    Statement::new("add_friendship", ADD_FRIENDSHIP)
        .bind("user1_id", user1_id)
        .bind("user2_id", user2_id)
        .bind("since", since)
}

pub fn add_interest(user_id: &str, interest: &str) -> Statement {
    Statement::new("add_interest", ADD_INTEREST)
        .bind("user_id", user_id)
        .bind("interest", interest)
}

pub fn friends_of_friends(user_id: &str, limit: usize) -> Statement {
    Statement::new("find_friends_of_friends", FRIENDS_OF_FRIENDS)
        .bind("user_id", user_id)
        .bind("limit", limit)
}

pub fn shortest_path(user1_id: &str, user2_id: &str, max_depth: usize) -> Statement {
    Statement::new("find_shortest_connection_path", SHORTEST_PATH)
        .bind("user1_id", user1_id)
        .bind("user2_id", user2_id)
        .bind("max_depth", max_depth)
}

pub fn recommend_by_interests(user_id: &str, limit: usize) -> Statement {
    Statement::new("recommend_friends_by_interests", RECOMMEND_BY_INTERESTS)
        .bind("user_id", user_id)
        .bind("limit", limit)
}

pub fn communities(min_connections: usize) -> Statement {
    Statement::new("find_communities", COMMUNITIES).bind("min_connections", min_connections)
}

pub fn network_statistics(user_id: &str) -> Statement {
    Statement::new("get_network_statistics", NETWORK_STATISTICS).bind("user_id", user_id)
}

pub fn clear_database() -> Statement {
    Statement::new("clear_database", CLEAR_DATABASE)
}

pub fn get_user(user_id: &str) -> Statement {
    Statement::new("get_user", GET_USER).bind("user_id", user_id)
}

pub fn list_friends(user_id: &str) -> Statement {
    Statement::new("list_friends", LIST_FRIENDS).bind("user_id", user_id)
}

pub fn list_interests(user_id: &str) -> Statement {
    Statement::new("list_interests", LIST_INTERESTS).bind("user_id", user_id)
}

pub fn user_count() -> Statement {
    Statement::new("user_count", USER_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTILE: &str = "x'); DELETE user; --";

    fn all_statements(input: &str) -> Vec<Statement> {
        vec![
            create_user(&User::new(input, input, 30, input)),
            add_friendship(input, "bob", "2024-01-01T00:00:00Z"),
            add_interest(input, input),
            friends_of_friends(input, 10),
            shortest_path(input, "bob", 8),
            recommend_by_interests(input, 10),
            communities(3),
            network_statistics(input),
            clear_database(),
            get_user(input),
            list_friends(input),
            list_interests(input),
            user_count(),
        ]
    }

    #[test]
    fn test_input_never_reaches_script_text() {
        for statement in all_statements(HOSTILE) {
            assert!(
                !statement.text().contains(HOSTILE),
                "{} interpolated caller input",
                statement.name()
            );
        }
    }

    #[test]
    fn test_every_param_is_referenced() {
        for statement in all_statements("alice") {
            for key in statement.params().keys() {
                let placeholder = format!("${}", key);
                assert!(
                    statement.text().contains(&placeholder),
                    "{} binds {} but never uses it",
                    statement.name(),
                    key
                );
            }
        }
    }

    #[test]
    fn test_create_user_params() {
        let statement = create_user(&User::new("alice", "Alice Johnson", 28, "New York"));
        assert_eq!(statement.name(), "create_user");
        assert_eq!(statement.param("user_id"), Some(&Value::from("alice")));
        assert_eq!(statement.param("age"), Some(&Value::from(28u32)));
        assert_eq!(statement.params().len(), 4);
    }

    #[test]
    fn test_limits_are_bound() {
        let statement = friends_of_friends("alice", 5);
        assert_eq!(statement.param("limit"), Some(&Value::from(5usize)));

        let statement = communities(2);
        assert_eq!(statement.param("min_connections"), Some(&Value::from(2usize)));
    }

    #[test]
    fn test_path_search_is_depth_bounded() {
        let statement = shortest_path("alice", "henry", 4);
        assert_eq!(statement.param("max_depth"), Some(&Value::from(4usize)));
        assert!(SHORTEST_PATH.contains("fn::friend_levels"));
        assert!(!SHORTEST_PATH.contains("{.."));
    }

    #[test]
    fn test_friendship_is_written_in_both_directions() {
        assert!(ADD_FRIENDSHIP.contains("RELATE $a->friends_with->$b"));
        assert!(ADD_FRIENDSHIP.contains("RELATE $b->friends_with->$a"));
    }

    #[test]
    fn test_into_parts() {
        let (text, params) = get_user("carol").into_parts();
        assert_eq!(text, GET_USER);
        assert_eq!(params.get("user_id"), Some(&Value::from("carol")));
    }
}
