//! # Tomatillo - Movie Rating Data Provider
//!
//! A single-table data-access layer over SQLite with a URI-addressed CRUD
//! surface.
//!
//! Tomatillo provides:
//! - Collection and item addresses (`content://<authority>/movie`,
//!   `content://<authority>/movie/<id>`) parsed into a tagged target
//! - Validation before every write (rating range, immutable title)
//! - Soft conflict handling for duplicate titles, so fixture seeding can be
//!   re-run safely
//! - Schema versioning via `PRAGMA user_version` with destructive upgrades

pub mod config;
pub mod contract;
pub mod provider;
pub mod seed;
pub mod storage;
pub mod ui;
pub mod uri;

// Re-exports for convenient access
pub use contract::{Movie, MovieValues};
pub use provider::{InsertResult, MovieProvider, RowSet};
pub use storage::MovieDbHelper;
pub use uri::MovieUri;

/// Result type alias for Tomatillo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Tomatillo operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported uri: {0}")]
    UnsupportedUri(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
