//! Table, column, and address constants for the movie catalog, plus the
//! record and payload types shared by the provider and its callers.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Scheme prefix for every catalog address
pub const CONTENT_SCHEME: &str = "content";

/// Authority used when no configuration overrides it
pub const DEFAULT_AUTHORITY: &str = "org.tomatillo.provider";

/// Name of the movie table
pub const TABLE_NAME: &str = "movie";

/// Row id column, store-assigned and immutable
pub const COL_ID: &str = "_id";

/// Title column. Unique across the catalog; the natural key.
pub const COL_TITLE: &str = "title";

/// Rating column, an integer between [`RATING_MIN`] and [`RATING_MAX`]
pub const COL_RATING: &str = "rating";

/// Every column in contract order. Queries without a projection use this.
pub const ALL_COLUMNS: &[&str] = &[COL_ID, COL_TITLE, COL_RATING];

pub const RATING_MIN: i64 = 0;
pub const RATING_MAX: i64 = 5;

/// MIME type for the movie collection address
pub fn content_dir_type(authority: &str) -> String {
    format!("vnd.tomatillo.dir/{}/{}", authority, TABLE_NAME)
}

/// MIME type for a single movie item address
pub fn content_item_type(authority: &str) -> String {
    format!("vnd.tomatillo.item/{}/{}", authority, TABLE_NAME)
}

/// A persisted movie row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub rating: i64,
}

/// Column-to-value payload for insert and update.
///
/// The column set is fixed and small, so this is a typed record with optional
/// fields rather than an open string-keyed map; validation is exhaustive over
/// which fields are present. An empty payload (no fields set) is rejected by
/// the provider before any store access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieValues {
    pub title: Option<String>,
    pub rating: Option<i64>,
}

impl MovieValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.rating.is_none()
    }

    /// Check every present field against the data-model invariants.
    ///
    /// Presence of required fields is not checked here: the store enforces
    /// NOT NULL, and the provider reports that violation as a soft conflict.
    pub fn validate(&self) -> Result<()> {
        if let Some(rating) = self.rating {
            if !(RATING_MIN..=RATING_MAX).contains(&rating) {
                return Err(Error::InvalidInput(format!(
                    "rating {} out of range [{}, {}]",
                    rating, RATING_MIN, RATING_MAX
                )));
            }
        }
        Ok(())
    }
}
