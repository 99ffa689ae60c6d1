//! SQLite connection lifecycle and schema evolution

use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::Result;

use super::schema;

/// Owns the connection to the movie database and keeps its schema current.
///
/// The connection is opened once at construction and reused for every read
/// and write; SQLite serializes concurrent writers itself, so no locking is
/// added here. Construct one helper per process and hand it to the provider.
pub struct MovieDbHelper {
    conn: Connection,
}

impl MovieDbHelper {
    /// Open a database file, creating it and bootstrapping the schema on
    /// first-ever access.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let helper = Self { conn };
        helper.ensure_schema()?;
        Ok(helper)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let helper = Self { conn };
        helper.ensure_schema()?;
        Ok(helper)
    }

    /// Connection suitable for queries
    pub fn readable(&self) -> &Connection {
        &self.conn
    }

    /// Connection suitable for mutation. Same handle as [`readable`](Self::readable);
    /// the split exists so call sites state their intent.
    pub fn writable(&self) -> &Connection {
        &self.conn
    }

    /// Bring the stored schema up to [`schema::SCHEMA_VERSION`].
    ///
    /// A fresh database (version 0) gets the table created. Any other
    /// version mismatch drops the table and recreates it; rows are not
    /// migrated.
    fn ensure_schema(&self) -> Result<()> {
        let stored: i32 = self.conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if stored == 0 {
            self.create_schema()?;
        } else if stored != schema::SCHEMA_VERSION {
            info!(
                "upgrading database from version {} to {}, dropping all rows",
                stored,
                schema::SCHEMA_VERSION
            );
            self.conn.execute(schema::DROP_MOVIE_TABLE, [])?;
            self.create_schema()?;
        }

        Ok(())
    }

    fn create_schema(&self) -> Result<()> {
        info!("bootstrapping database version {}", schema::SCHEMA_VERSION);
        self.conn.execute(schema::CREATE_MOVIE_TABLE, [])?;
        self.conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_version(conn: &Connection) -> i32 {
        conn.query_row("PRAGMA user_version", [], |row| row.get(0)).unwrap()
    }

    fn row_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM movie", [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_bootstrap_stamps_version() {
        let helper = MovieDbHelper::open_in_memory().unwrap();
        assert_eq!(stored_version(helper.readable()), schema::SCHEMA_VERSION);
        assert_eq!(row_count(helper.readable()), 0);
    }

    #[test]
    fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tomatillo.db");

        {
            let helper = MovieDbHelper::open(&path).unwrap();
            helper
                .writable()
                .execute("INSERT INTO movie (title, rating) VALUES ('Akira', 3)", [])
                .unwrap();
        }

        let helper = MovieDbHelper::open(&path).unwrap();
        assert_eq!(row_count(helper.readable()), 1);
    }

    #[test]
    fn test_version_mismatch_recreates_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tomatillo.db");

        {
            let helper = MovieDbHelper::open(&path).unwrap();
            helper
                .writable()
                .execute("INSERT INTO movie (title, rating) VALUES ('Ponyo', 1)", [])
                .unwrap();
        }

        // Simulate a database written by a different schema version.
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION + 1).unwrap();
        }

        let helper = MovieDbHelper::open(&path).unwrap();
        assert_eq!(stored_version(helper.readable()), schema::SCHEMA_VERSION);
        assert_eq!(row_count(helper.readable()), 0);
    }
}
