//! Row conversion — records to positionally-aligned value sequences.

use serde_json::Value;

use sheetsync_core::Record;

/// Convert a record into one row, aligned to `columns`.
///
/// Emits the record's value per column in canonical order, an empty string
/// where the record lacks the field. Fields absent from `columns` are dropped;
/// column creation is driven by the reconciler's header, never from here.
pub fn convert_row(columns: &[String], record: &Record) -> Vec<Value> {
    columns
        .iter()
        .map(|column| {
            record
                .get(column)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()))
        })
        .collect()
}

/// Spreadsheet letters for a 1-based column count: 1 → `A`, 26 → `Z`,
/// 27 → `AA`.
pub fn column_letter(count: usize) -> String {
    let mut n = count;
    let mut letters = Vec::new();
    while n > 0 {
        letters.push(b'A' + ((n - 1) % 26) as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|b| *b as char).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(body: &str) -> Record {
        serde_json::from_str(body).expect("record")
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn values_follow_canonical_order() {
        let row = convert_row(
            &cols(&["id", "name"]),
            &record(r#"{"name": "a", "id": 1}"#),
        );
        assert_eq!(row, vec![json!(1), json!("a")]);
    }

    #[test]
    fn missing_field_becomes_empty_string() {
        let row = convert_row(&cols(&["id", "email", "name"]), &record(r#"{"id": 7}"#));
        assert_eq!(row, vec![json!(7), json!(""), json!("")]);
    }

    #[test]
    fn row_length_always_matches_column_count() {
        let columns = cols(&["a", "b", "c", "d"]);
        for body in [r#"{}"#, r#"{"a": 1}"#, r#"{"a": 1, "b": 2, "c": 3, "d": 4}"#] {
            assert_eq!(convert_row(&columns, &record(body)).len(), columns.len());
        }
    }

    #[test]
    fn fields_outside_canonical_columns_are_dropped() {
        let row = convert_row(&cols(&["id"]), &record(r#"{"id": 1, "extra": true}"#));
        assert_eq!(row, vec![json!(1)]);
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(2), "B");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }
}
