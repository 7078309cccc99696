//! The eight-person sample network used by the demo walkthrough and tests.

/// `(id, name, age, location)`
pub const SAMPLE_USERS: [(&str, &str, u32, &str); 8] = [
    ("alice", "Alice Johnson", 28, "New York"),
    ("bob", "Bob Smith", 32, "San Francisco"),
    ("carol", "Carol White", 25, "New York"),
    ("david", "David Brown", 30, "Boston"),
    ("eve", "Eve Davis", 27, "San Francisco"),
    ("frank", "Frank Miller", 35, "Chicago"),
    ("grace", "Grace Wilson", 29, "New York"),
    ("henry", "Henry Moore", 31, "Boston"),
];

pub const SAMPLE_FRIENDSHIPS: [(&str, &str); 9] = [
    ("alice", "bob"),
    ("alice", "carol"),
    ("alice", "grace"),
    ("bob", "david"),
    ("bob", "eve"),
    ("carol", "grace"),
    ("david", "henry"),
    ("eve", "frank"),
    ("frank", "henry"),
];

pub const SAMPLE_INTERESTS: [(&str, [&str; 3]); 8] = [
    ("alice", ["photography", "hiking", "cooking"]),
    ("bob", ["hiking", "technology", "gaming"]),
    ("carol", ["cooking", "photography", "travel"]),
    ("david", ["technology", "gaming", "music"]),
    ("eve", ["travel", "photography", "yoga"]),
    ("frank", ["music", "cooking", "gaming"]),
    ("grace", ["yoga", "cooking", "travel"]),
    ("henry", ["music", "technology", "hiking"]),
];

/// Number of write operations needed to load the sample network
pub fn sample_write_count() -> usize {
    SAMPLE_USERS.len()
        + SAMPLE_FRIENDSHIPS.len()
        + SAMPLE_INTERESTS.iter().map(|(_, i)| i.len()).sum::<usize>()
}
