//! Database schema definitions

/// Current schema version, stamped into `PRAGMA user_version`.
/// Must be bumped on any change to the table layout; the upgrade path does
/// not preserve rows.
pub const SCHEMA_VERSION: i32 = 1;

/// SQL to create the movie table.
///
/// Uniqueness on `title` lives here, at the storage layer; it is this
/// constraint that turns a duplicate insert into a conflict.
pub const CREATE_MOVIE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS movie (
    _id INTEGER PRIMARY KEY,
    title TEXT UNIQUE NOT NULL,
    rating INTEGER NOT NULL
)
"#;

/// SQL to drop the movie table during a destructive upgrade
pub const DROP_MOVIE_TABLE: &str = "DROP TABLE IF EXISTS movie";
