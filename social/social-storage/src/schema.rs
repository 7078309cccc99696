//! Graph schema definitions.

use social_core::error::{Result, SocialError};
use surrealdb::{Connection, Surreal};

/// SurrealQL schema for the social network.
///
/// Every definition is guarded with `IF NOT EXISTS` so the script can run on
/// each session open.
pub const SCHEMA: &str = r#"
-- Nodes
DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE TABLE IF NOT EXISTS interest SCHEMALESS;

DEFINE FIELD IF NOT EXISTS user_id ON user TYPE string;
DEFINE FIELD IF NOT EXISTS name ON user TYPE string;
DEFINE FIELD IF NOT EXISTS age ON user TYPE int;
DEFINE FIELD IF NOT EXISTS location ON user TYPE string;
DEFINE FIELD IF NOT EXISTS created_at ON user TYPE datetime DEFAULT time::now();

DEFINE FIELD IF NOT EXISTS name ON interest TYPE string;

DEFINE INDEX IF NOT EXISTS user_id_unique ON user FIELDS user_id UNIQUE;
DEFINE INDEX IF NOT EXISTS interest_name_unique ON interest FIELDS name UNIQUE;

-- Edges
DEFINE TABLE IF NOT EXISTS friends_with TYPE RELATION IN user OUT user;
DEFINE TABLE IF NOT EXISTS interested_in TYPE RELATION IN user OUT interest;

-- Path search
-- Breadth-first levels from a start frontier until `$to` is reached. Each
-- level holds only users not seen before, so the search ends as soon as the
-- component is exhausted. NONE when `$to` is unreachable within `$depth` hops.
DEFINE FUNCTION IF NOT EXISTS fn::friend_levels($frontier: array, $seen: array, $to: record, $depth: int) {
    LET $levels = (IF $frontier CONTAINS $to {
        [$frontier]
    } ELSE IF array::len($frontier) = 0 OR $depth <= 0 {
        NONE
    } ELSE {
        LET $rows = SELECT VALUE ->friends_with->user FROM $frontier;
        LET $next = array::complement(array::distinct(array::flatten($rows)), $seen);
        LET $rest = fn::friend_levels($next, array::union($seen, $next), $to, $depth - 1);
        IF $rest = NONE { NONE } ELSE { array::prepend($rest, $frontier) }
    });
    RETURN $levels;
};

-- Walk back from `$node` at level `$depth` to the start, picking a friend on
-- each previous level. Returns the route from start to `$node`.
DEFINE FUNCTION IF NOT EXISTS fn::friend_route($levels: array, $node: record, $depth: int) {
    LET $route = (IF $depth <= 0 {
        [$node]
    } ELSE {
        LET $rows = SELECT VALUE ->friends_with->user FROM $node;
        LET $prev = array::first(array::intersect(array::at($levels, $depth - 1), array::flatten($rows)));
        array::append(fn::friend_route($levels, $prev, $depth - 1), $node)
    });
    RETURN $route;
};
"#;

/// Initialize the database schema
pub async fn init_schema<C: Connection>(db: &Surreal<C>) -> Result<()> {
    tracing::info!("Initializing social graph schema");

    db.query(SCHEMA)
        .await
        .and_then(|response| response.check())
        .map_err(|e| SocialError::engine_query(format!("Failed to initialize schema: {}", e)))?;

    tracing::info!("Social graph schema initialized");
    Ok(())
}
