//! Row shaping
//!
//! Turns raw API resource records into rows keyed by schema column name.
//! Extraction never fails: absent fields render as null.

use super::registry::{ColumnDef, ColumnType};
use crate::query::Row;
use serde_json::{Map, Value};

/// Extract a value from a record using a dot-notation path.
/// Returns `Value::Null` when any path segment is missing.
pub fn extract_value(record: &Value, path: &str) -> Value {
    if path.is_empty() {
        return Value::Null;
    }

    let mut current = record;
    for part in path.split('.') {
        // Handle array index
        if let Ok(idx) = part.parse::<usize>() {
            current = match current.get(idx) {
                Some(v) => v,
                None => return Value::Null,
            };
        } else {
            current = match current.get(part) {
                Some(v) => v,
                None => return Value::Null,
            };
        }
    }

    current.clone()
}

/// Extract the string form of a field, or "" when absent.
pub fn extract_string(record: &Value, path: &str) -> String {
    match extract_value(record, path) {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render one column value from a record according to its declared type.
pub fn render_column(record: &Value, column: &ColumnDef) -> Value {
    let raw = extract_value(record, &column.api_path);
    if raw.is_null() {
        return Value::Null;
    }

    match column.column_type {
        ColumnType::String => match raw {
            Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        },
        ColumnType::Bool => match raw.as_bool() {
            Some(b) => Value::Bool(b),
            None => Value::Null,
        },
        // The API serializes int64 fields as JSON strings
        ColumnType::Int => match &raw {
            Value::Number(n) => n.as_i64().map(Value::from).unwrap_or(Value::Null),
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            _ => Value::Null,
        },
        ColumnType::Timestamp => render_timestamp(&raw),
        ColumnType::Json => raw,
    }
}

/// Zero-valued timestamps mean "never set" and render as null.
fn render_timestamp(raw: &Value) -> Value {
    let Some(text) = raw.as_str() else {
        return Value::Null;
    };
    if text.is_empty() {
        return Value::Null;
    }

    match chrono::DateTime::parse_from_rfc3339(text) {
        Ok(parsed) if parsed.timestamp() > 0 => Value::String(text.to_string()),
        _ => Value::Null,
    }
}

/// Shape one API record into a row with every schema column present.
/// Context-populated columns (empty `api_path`) start out null and are
/// filled by qualifier injection or the fan-out join.
pub fn shape_row(record: &Value, columns: &[ColumnDef]) -> Row {
    let mut row = Map::with_capacity(columns.len());
    for column in columns {
        row.insert(column.name.clone(), render_column(record, column));
    }
    Value::Object(row)
}

/// Copy a parent-context value into a synthetic join row.
///
/// The parent key always comes from the enclosing iteration context, never
/// from the child API response.
pub fn join_parent(mut row: Row, column: &str, parent_value: &str) -> Row {
    if let Value::Object(map) = &mut row {
        map.insert(
            column.to_string(),
            Value::String(parent_value.to_string()),
        );
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::registry::{ColumnDef, ColumnType};
    use serde_json::json;

    fn column(name: &str, column_type: ColumnType, api_path: &str) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            column_type,
            api_path: api_path.to_string(),
            description: name.to_string(),
        }
    }

    #[test]
    fn nested_paths_extract_through_objects() {
        let record = json!({"name": {"givenName": "Ada", "familyName": "Lovelace"}});
        assert_eq!(
            extract_value(&record, "name.givenName"),
            json!("Ada")
        );
        assert_eq!(extract_value(&record, "name.middleName"), Value::Null);
        assert_eq!(extract_value(&record, ""), Value::Null);
    }

    #[test]
    fn int_columns_accept_string_encoded_numbers() {
        let record = json!({"directMembersCount": "42"});
        let col = column("direct_members_count", ColumnType::Int, "directMembersCount");
        assert_eq!(render_column(&record, &col), json!(42));

        let record = json!({"directMembersCount": "not-a-number"});
        assert_eq!(render_column(&record, &col), Value::Null);
    }

    #[test]
    fn zero_valued_timestamps_render_null() {
        let col = column("last_login_time", ColumnType::Timestamp, "lastLoginTime");

        let record = json!({"lastLoginTime": "1970-01-01T00:00:00.000Z"});
        assert_eq!(render_column(&record, &col), Value::Null);

        let record = json!({"lastLoginTime": ""});
        assert_eq!(render_column(&record, &col), Value::Null);

        let record = json!({"lastLoginTime": "2024-03-01T10:30:00.000Z"});
        assert_eq!(
            render_column(&record, &col),
            json!("2024-03-01T10:30:00.000Z")
        );
    }

    #[test]
    fn shaped_rows_contain_every_schema_column() {
        let columns = vec![
            column("id", ColumnType::String, "id"),
            column("is_admin", ColumnType::Bool, "isAdmin"),
            column("group_key", ColumnType::String, ""),
        ];
        let row = shape_row(&json!({"id": "u1"}), &columns);
        let obj = row.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["id"], json!("u1"));
        assert_eq!(obj["is_admin"], Value::Null);
        assert_eq!(obj["group_key"], Value::Null);
    }

    #[test]
    fn join_parent_overrides_whatever_the_child_carried() {
        let columns = vec![column("group_key", ColumnType::String, "")];
        let row = shape_row(&json!({"group_key": "bogus"}), &columns);
        let joined = join_parent(row, "group_key", "eng@example.com");
        assert_eq!(joined["group_key"], json!("eng@example.com"));
    }
}
