//! Inbound JSONL messages.
//!
//! One JSON object per line, discriminated by `type`: `RECORD` carries a
//! record for a stream, `SCHEMA` may declare `key_properties`, `STATE`
//! carries an opaque value the harness echoes back once records are accepted.
//! Unknown fields (e.g. a SCHEMA's JSON-schema body) are ignored.

use serde::Deserialize;
use serde_json::Value;

use sheetsync_core::Record;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Message {
    Record {
        stream: String,
        record: Record,
    },
    Schema {
        stream: String,
        #[serde(default)]
        key_properties: Vec<String>,
    },
    State {
        value: Value,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_message_parses() {
        let msg: Message =
            serde_json::from_str(r#"{"type": "RECORD", "stream": "users", "record": {"id": 1}}"#)
                .expect("parse");
        match msg {
            Message::Record { stream, record } => {
                assert_eq!(stream, "users");
                assert_eq!(record["id"], json!(1));
            }
            other => panic!("expected RECORD, got {other:?}"),
        }
    }

    #[test]
    fn schema_message_ignores_schema_body() {
        let msg: Message = serde_json::from_str(
            r#"{"type": "SCHEMA", "stream": "users",
                "schema": {"properties": {"id": {"type": "integer"}}},
                "key_properties": ["id"]}"#,
        )
        .expect("parse");
        match msg {
            Message::Schema {
                stream,
                key_properties,
            } => {
                assert_eq!(stream, "users");
                assert_eq!(key_properties, vec!["id"]);
            }
            other => panic!("expected SCHEMA, got {other:?}"),
        }
    }

    #[test]
    fn schema_without_key_properties_defaults_empty() {
        let msg: Message =
            serde_json::from_str(r#"{"type": "SCHEMA", "stream": "users"}"#).expect("parse");
        match msg {
            Message::Schema { key_properties, .. } => assert!(key_properties.is_empty()),
            other => panic!("expected SCHEMA, got {other:?}"),
        }
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"type": "ACTIVATE_VERSION", "stream": "users"}"#);
        assert!(result.is_err());
    }
}
