//! Movie URI - addressable identity for catalog resources
//!
//! Format: `content://<authority>/movie` (the whole collection)
//!         `content://<authority>/movie/<id>` (one movie by row id)
//!
//! Examples:
//! - `content://org.tomatillo.provider/movie`
//! - `content://org.tomatillo.provider/movie/7`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::contract::{CONTENT_SCHEME, TABLE_NAME};
use crate::{Error, Result};

/// What a [`MovieUri`] addresses.
///
/// All provider operations switch over this variant; there is no other
/// path-matching logic anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Every movie in the catalog
    Collection,
    /// One movie, by its store-assigned row id (always non-negative)
    Item(i64),
}

/// A parsed catalog address: authority plus collection-or-item target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieUri {
    /// Authority naming the provider instance this address belongs to
    pub authority: String,
    /// Collection or single-item target
    pub target: Target,
}

impl MovieUri {
    /// Address of the whole movie collection
    pub fn collection(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            target: Target::Collection,
        }
    }

    /// Address of a single movie by id
    pub fn item(authority: impl Into<String>, id: i64) -> Self {
        Self {
            authority: authority.into(),
            target: Target::Item(id),
        }
    }

    /// Parse a URI string into a MovieUri.
    ///
    /// Any shape other than the two documented forms is an unsupported
    /// address: wrong scheme, missing or empty authority, a path that is not
    /// `movie`, or a trailing id segment that is empty, negative, or not all
    /// digits.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(CONTENT_SCHEME)
            .and_then(|r| r.strip_prefix("://"))
            .ok_or_else(|| Error::UnsupportedUri(format!("uri must start with {}://: {}", CONTENT_SCHEME, uri)))?;

        let (authority, path) = rest
            .split_once('/')
            .ok_or_else(|| Error::UnsupportedUri(format!("uri must contain authority/path: {}", uri)))?;

        if authority.is_empty() {
            return Err(Error::UnsupportedUri(format!("empty authority: {}", uri)));
        }

        let target = match path.split_once('/') {
            None if path == TABLE_NAME => Target::Collection,
            Some((table, id_segment)) if table == TABLE_NAME => Target::Item(parse_id(id_segment, uri)?),
            _ => {
                return Err(Error::UnsupportedUri(format!("unknown path: {}", uri)));
            }
        };

        Ok(Self {
            authority: authority.to_string(),
            target,
        })
    }

    /// The item id, if this is an item address
    pub fn id(&self) -> Option<i64> {
        match self.target {
            Target::Collection => None,
            Target::Item(id) => Some(id),
        }
    }

    /// Build the item address for `id` under this address's authority
    pub fn with_id(&self, id: i64) -> Self {
        Self::item(self.authority.clone(), id)
    }

    /// Convert to URI string
    pub fn to_uri_string(&self) -> String {
        match self.target {
            Target::Collection => format!("{}://{}/{}", CONTENT_SCHEME, self.authority, TABLE_NAME),
            Target::Item(id) => format!("{}://{}/{}/{}", CONTENT_SCHEME, self.authority, TABLE_NAME, id),
        }
    }
}

/// Parse a trailing id segment. Digits only, so negative and otherwise
/// malformed ids are rejected at the address level, never passed to the store.
fn parse_id(segment: &str, uri: &str) -> Result<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::UnsupportedUri(format!("malformed id segment: {}", uri)));
    }
    segment
        .parse::<i64>()
        .map_err(|_| Error::UnsupportedUri(format!("id out of range: {}", uri)))
}

impl fmt::Display for MovieUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for MovieUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for MovieUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for MovieUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MovieUri::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_roundtrip() {
        let uri = MovieUri::item("org.tomatillo.provider", 42);
        let uri_str = uri.to_uri_string();
        assert_eq!(uri_str, "content://org.tomatillo.provider/movie/42");

        let parsed = MovieUri::parse(&uri_str).unwrap();
        assert_eq!(parsed, uri);
    }

    #[test]
    fn test_uri_parse_collection() {
        let uri = MovieUri::parse("content://org.tomatillo.provider/movie").unwrap();
        assert_eq!(uri.authority, "org.tomatillo.provider");
        assert_eq!(uri.target, Target::Collection);
        assert_eq!(uri.id(), None);
    }

    #[test]
    fn test_uri_parse_item() {
        let uri = MovieUri::parse("content://org.tomatillo.provider/movie/7").unwrap();
        assert_eq!(uri.target, Target::Item(7));
        assert_eq!(uri.id(), Some(7));
    }

    #[test]
    fn test_invalid_uri() {
        assert!(MovieUri::parse("invalid").is_err());
        assert!(MovieUri::parse("http://org.tomatillo.provider/movie").is_err());
        assert!(MovieUri::parse("content://org.tomatillo.provider").is_err()); // missing path
        assert!(MovieUri::parse("content:///movie").is_err()); // empty authority
        assert!(MovieUri::parse("content://org.tomatillo.provider/shows").is_err());
        assert!(MovieUri::parse("content://org.tomatillo.provider/movie/1/2").is_err());
    }

    #[test]
    fn test_malformed_id_segment() {
        // Negative and non-numeric ids are address errors, not empty results.
        assert!(MovieUri::parse("content://org.tomatillo.provider/movie/-1").is_err());
        assert!(MovieUri::parse("content://org.tomatillo.provider/movie/abc").is_err());
        assert!(MovieUri::parse("content://org.tomatillo.provider/movie/+3").is_err());
        assert!(MovieUri::parse("content://org.tomatillo.provider/movie/").is_err());
    }

    #[test]
    fn test_with_id() {
        let collection = MovieUri::collection("org.tomatillo.provider");
        let item = collection.with_id(9);
        assert_eq!(item, MovieUri::item("org.tomatillo.provider", 9));
    }

    #[test]
    fn test_serde_as_string() {
        let uri = MovieUri::item("org.tomatillo.provider", 3);
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, "\"content://org.tomatillo.provider/movie/3\"");

        let back: MovieUri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri);
    }
}
