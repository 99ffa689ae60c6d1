//! Resource mediator - URI-addressed CRUD over the movie table
//!
//! Every operation takes a parsed [`MovieUri`], validates payloads before any
//! write, and translates the verb into a parameterized statement against the
//! store. Duplicate titles (and other storage constraints) surface as a soft
//! [`InsertResult::Conflict`] rather than an error, so fixture seeding can be
//! re-run safely. A non-existent id is never an error: it shows up as an
//! empty [`RowSet`] or an affected-row count of zero.

use rusqlite::types::Value;
use rusqlite::{ErrorCode, params_from_iter};
use tracing::{debug, info};

use crate::contract::{self, MovieValues};
use crate::storage::MovieDbHelper;
use crate::uri::{MovieUri, Target};
use crate::{Error, Result};

/// Outcome of a single-row insert.
///
/// Validation failures and bad addresses are `Err` variants instead; this
/// type only distinguishes "row accepted" from "row rejected by the store".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    /// Row accepted. The item address carries the store-assigned id.
    Created(MovieUri),
    /// Rejected by a storage constraint: duplicate title, or a required
    /// column missing from the payload. The catalog is unchanged.
    Conflict,
}

/// Materialized result of a [`MovieProvider::query`], bound to the query's
/// column order. Dropping it releases the underlying resources on every exit
/// path.
#[derive(Debug)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Column names in the order the query produced them
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in result order
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Look up a value by row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }
}

/// The CRUD-routing component fronting the movie store.
///
/// Holds the schema manager by value and the authority it answers for;
/// both are wired in by process bootstrap, not by global state.
pub struct MovieProvider {
    helper: MovieDbHelper,
    authority: String,
}

impl MovieProvider {
    pub fn new(helper: MovieDbHelper, authority: impl Into<String>) -> Self {
        Self {
            helper,
            authority: authority.into(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Collection address under this provider's authority
    pub fn collection_uri(&self) -> MovieUri {
        MovieUri::collection(self.authority.clone())
    }

    /// Check the address belongs to this provider and hand back its target.
    fn resolve(&self, uri: &MovieUri) -> Result<Target> {
        if uri.authority != self.authority {
            return Err(Error::UnsupportedUri(format!("unknown authority: {}", uri)));
        }
        Ok(uri.target)
    }

    /// MIME-like type tag for an address, derived purely from its shape
    pub fn get_type(&self, uri: &MovieUri) -> Result<String> {
        match self.resolve(uri)? {
            Target::Collection => Ok(contract::content_dir_type(&self.authority)),
            Target::Item(_) => Ok(contract::content_item_type(&self.authority)),
        }
    }

    /// Query the collection or a single item.
    ///
    /// `projection` of `None` or `&[]` selects [`contract::ALL_COLUMNS`].
    /// For an item address, `_id = <id>` is AND-composed with any caller
    /// selection. `args` bind positionally to `?` placeholders in the
    /// selection fragment.
    pub fn query(
        &self,
        uri: &MovieUri,
        projection: Option<&[&str]>,
        selection: Option<&str>,
        args: &[Value],
        sort: Option<&str>,
    ) -> Result<RowSet> {
        let target = self.resolve(uri)?;

        let columns = match projection {
            Some(p) if !p.is_empty() => p.join(", "),
            _ => contract::ALL_COLUMNS.join(", "),
        };

        let mut params: Vec<Value> = args.to_vec();
        let mut sql = format!("SELECT {} FROM {}", columns, contract::TABLE_NAME);
        sql.push_str(&where_clause(target, selection, &mut params));
        if let Some(sort) = sort {
            if !sort.trim().is_empty() {
                sql.push_str(" ORDER BY ");
                sql.push_str(sort);
            }
        }
        debug!("query: {}", sql);

        let conn = self.helper.readable();
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let mut values = Vec::with_capacity(width);
                for i in 0..width {
                    values.push(row.get::<_, Value>(i)?);
                }
                Ok(values)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(RowSet { columns, rows })
    }

    /// Insert one movie through the collection address.
    ///
    /// An empty payload or an out-of-range rating is an invalid-input error,
    /// raised before the store is touched. A storage constraint violation is
    /// the soft [`InsertResult::Conflict`].
    pub fn insert(&self, uri: &MovieUri, values: &MovieValues) -> Result<InsertResult> {
        validate_payload(values)?;

        match self.resolve(uri)? {
            Target::Collection => self.insert_row(values),
            Target::Item(_) => Err(Error::UnsupportedUri(format!(
                "insert must target the collection: {}",
                uri
            ))),
        }
    }

    /// Insert many movies with per-row conflict handling.
    ///
    /// The whole batch is validated before any row is written; an invalid
    /// rating anywhere aborts the call. Conflicts are then skipped per row so
    /// one duplicate never aborts its siblings. Returns the number of rows
    /// actually accepted.
    pub fn bulk_insert(&self, uri: &MovieUri, values: &[MovieValues]) -> Result<usize> {
        for row in values {
            validate_payload(row)?;
        }

        match self.resolve(uri)? {
            Target::Item(_) => Err(Error::UnsupportedUri(format!(
                "insert must target the collection: {}",
                uri
            ))),
            Target::Collection => {
                let mut accepted = 0;
                for row in values {
                    if let InsertResult::Created(_) = self.insert_row(row)? {
                        accepted += 1;
                    }
                }
                Ok(accepted)
            }
        }
    }

    fn insert_row(&self, values: &MovieValues) -> Result<InsertResult> {
        let mut columns: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(title) = &values.title {
            columns.push(contract::COL_TITLE);
            params.push(Value::Text(title.clone()));
        }
        if let Some(rating) = values.rating {
            columns.push(contract::COL_RATING);
            params.push(Value::Integer(rating));
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            contract::TABLE_NAME,
            columns.join(", "),
            placeholders
        );

        let conn = self.helper.writable();
        match conn.execute(&sql, params_from_iter(params.iter())) {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                Ok(InsertResult::Created(MovieUri::item(self.authority.clone(), id)))
            }
            Err(err) if is_constraint_violation(&err) => {
                info!(
                    "skipping insert of {:?}: {}",
                    values.title.as_deref().unwrap_or("<untitled>"),
                    err
                );
                Ok(InsertResult::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete matching rows and return the affected count.
    ///
    /// Collection form with no selection deletes everything. Item form
    /// deletes by id, AND-composed with any caller selection. Zero affected
    /// rows is a legal outcome, not an error.
    pub fn delete(&self, uri: &MovieUri, selection: Option<&str>, args: &[Value]) -> Result<usize> {
        let target = self.resolve(uri)?;

        let mut params: Vec<Value> = args.to_vec();
        let mut sql = format!("DELETE FROM {}", contract::TABLE_NAME);
        sql.push_str(&where_clause(target, selection, &mut params));
        debug!("delete: {}", sql);

        let affected = self.helper.writable().execute(&sql, params_from_iter(params.iter()))?;
        Ok(affected)
    }

    /// Update matching rows and return the affected count.
    ///
    /// Every present field is validated first: an out-of-range rating or a
    /// present title (titles are immutable) aborts the call before any row is
    /// touched. Item form updates the one row by id, AND-composed with any
    /// caller selection.
    pub fn update(
        &self,
        uri: &MovieUri,
        values: &MovieValues,
        selection: Option<&str>,
        args: &[Value],
    ) -> Result<usize> {
        validate_payload(values)?;
        if values.title.is_some() {
            return Err(Error::InvalidInput("title is immutable".to_string()));
        }

        let target = self.resolve(uri)?;

        let mut params: Vec<Value> = Vec::new();
        let mut assignments: Vec<String> = Vec::new();
        if let Some(rating) = values.rating {
            assignments.push(format!("{} = ?", contract::COL_RATING));
            params.push(Value::Integer(rating));
        }
        params.extend(args.iter().cloned());

        let mut sql = format!("UPDATE {} SET {}", contract::TABLE_NAME, assignments.join(", "));
        sql.push_str(&where_clause(target, selection, &mut params));
        debug!("update: {}", sql);

        let affected = self.helper.writable().execute(&sql, params_from_iter(params.iter()))?;
        Ok(affected)
    }
}

/// Shared payload checks for insert and update: an empty payload is the typed
/// analog of a null value bag, and any present rating must be in range.
fn validate_payload(values: &MovieValues) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidInput("empty payload".to_string()));
    }
    values.validate()
}

/// Compose the WHERE clause for a target plus optional caller selection.
/// The item id binds after the caller's own args so positional `?`
/// placeholders keep their order.
fn where_clause(target: Target, selection: Option<&str>, params: &mut Vec<Value>) -> String {
    let mut clauses: Vec<String> = Vec::new();
    if let Some(sel) = selection {
        if !sel.trim().is_empty() {
            clauses.push(format!("({})", sel));
        }
    }
    if let Target::Item(id) = target {
        clauses.push(format!("{} = ?", contract::COL_ID));
        params.push(Value::Integer(id));
    }

    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
