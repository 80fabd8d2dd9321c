//! Domain types for sheetsync.
//!
//! A stream maps 1:1 to a remote worksheet of the same name; records are
//! insertion-ordered field maps (`serde_json` with `preserve_order`), so the
//! order fields first appear in drives the order columns are created in.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a record stream (and its worksheet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamName(pub String);

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for StreamName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StreamName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a remote table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(pub String);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TableId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TableId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a remote table column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub String);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Records and batches
// ---------------------------------------------------------------------------

/// One logical entity from a stream: an ordered field-name → value map.
///
/// May omit fields the remote table has (rendered as empty cells) and may
/// introduce fields the table lacks (triggers additive column creation).
pub type Record = serde_json::Map<String, Value>;

/// A bounded list of records processed as one synchronization unit.
pub type Batch = Vec<Record>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn newtype_display() {
        assert_eq!(StreamName::from("users").to_string(), "users");
        assert_eq!(TableId::from("{T-1}").to_string(), "{T-1}");
        assert_eq!(ColumnId::from("c0").to_string(), "c0");
    }

    #[test]
    fn newtype_equality() {
        let a = StreamName::from("x");
        let b = StreamName::from(String::from("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn record_preserves_field_order() {
        let record: Record =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).expect("parse");
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(record["alpha"], json!(2));
    }
}
