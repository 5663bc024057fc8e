//! `SQLite` schema definitions for campboard.
//!
//! Foreign keys are declared without `ON DELETE CASCADE`: the store deletes
//! dependent signups itself, and with `foreign_keys` enabled any delete that
//! would orphan a signup fails instead.

/// SQL statement to create the campers table.
pub const CREATE_CAMPERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS campers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) > 0),
    age INTEGER CHECK (age IS NULL OR age BETWEEN 8 AND 18)
)
";

/// SQL statement to create the activities table.
pub const CREATE_ACTIVITIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    difficulty INTEGER NOT NULL
)
";

/// SQL statement to create the signups table.
pub const CREATE_SIGNUPS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS signups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    time INTEGER CHECK (time IS NULL OR time BETWEEN 0 AND 23),
    camper_id INTEGER NOT NULL REFERENCES campers(id),
    activity_id INTEGER NOT NULL REFERENCES activities(id)
)
";

/// Index for looking up a camper's signups.
pub const CREATE_SIGNUPS_CAMPER_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_signups_camper ON signups(camper_id)
";

/// Index for looking up an activity's signups.
pub const CREATE_SIGNUPS_ACTIVITY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_signups_activity ON signups(activity_id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CAMPERS_TABLE,
    CREATE_ACTIVITIES_TABLE,
    CREATE_SIGNUPS_TABLE,
    CREATE_SIGNUPS_CAMPER_INDEX,
    CREATE_SIGNUPS_ACTIVITY_INDEX,
    CREATE_METADATA_TABLE,
];
