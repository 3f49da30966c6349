//! Read-only formatting of game fields for the table UI.
//!
//! Uses the same parser as the cleanup job so a legacy stringified list
//! renders exactly as it would be stored after normalization.

use serde_json::Value;

use crate::game::{Column, ColumnKind};
use crate::normalize::{inner_content, is_bracketed, parse_bracketed, Bracketed};

/// Placeholder for empty or missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Render any field value as a human-readable string.
///
/// - `null`, `""` and `false` render as [`NOT_AVAILABLE`]; `0` renders as `"0"`.
/// - Lists are joined with `", "`, skipping nulls.
/// - Bracketed strings are parsed first. When the scan finds no tokens in
///   non-blank content, the raw content between the brackets is shown.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => NOT_AVAILABLE.to_string(),
        Value::String(s) if s.is_empty() => NOT_AVAILABLE.to_string(),
        Value::Array(items) => join_items(items),
        Value::String(s) if is_bracketed(s) => match parse_bracketed(s) {
            Bracketed::Strict(items) => join_items(&items),
            Bracketed::NotAList => s.clone(),
            Bracketed::Scanned(tokens) if tokens.is_empty() => {
                let content = inner_content(s);
                if content.trim().is_empty() {
                    NOT_AVAILABLE.to_string()
                } else {
                    content.to_string()
                }
            }
            Bracketed::Scanned(tokens) => tokens.join(", "),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_items(items: &[Value]) -> String {
    let parts: Vec<String> = items
        .iter()
        .filter(|item| !item.is_null())
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}

/// Render one table cell of a serialized game record.
pub fn render_cell(column: &Column, record: &Value) -> String {
    let value = record.get(column.key).unwrap_or(&Value::Null);

    match column.kind {
        ColumnKind::Platforms => {
            let platforms: Vec<&str> = [("windows", "Windows"), ("mac", "Mac"), ("linux", "Linux")]
                .into_iter()
                .filter(|(flag, _)| record.get(flag).and_then(Value::as_bool) == Some(true))
                .map(|(_, label)| label)
                .collect();
            if platforms.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                platforms.join(" | ")
            }
        }
        ColumnKind::Price => match value {
            Value::Null => NOT_AVAILABLE.to_string(),
            other => format!("${}", display_value(other)),
        },
        ColumnKind::Date => match value {
            Value::String(s) if !s.is_empty() => s.clone(),
            _ => NOT_AVAILABLE.to_string(),
        },
        ColumnKind::Text | ColumnKind::Number | ColumnKind::List => display_value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TABLE_COLUMNS;
    use serde_json::json;

    fn column(key: &str) -> &'static Column {
        TABLE_COLUMNS.iter().find(|c| c.key == key).unwrap()
    }

    #[test]
    fn empty_values_render_sentinel() {
        assert_eq!(display_value(&Value::Null), "N/A");
        assert_eq!(display_value(&json!("")), "N/A");
        assert_eq!(display_value(&json!(false)), "N/A");
        assert_eq!(display_value(&json!([])), "N/A");
        assert_eq!(display_value(&json!([null])), "N/A");
        assert_eq!(display_value(&json!("[]")), "N/A");
        assert_eq!(display_value(&json!("[ ]")), "N/A");
    }

    #[test]
    fn zero_is_not_empty() {
        assert_eq!(display_value(&json!(0)), "0");
    }

    #[test]
    fn lists_are_joined() {
        assert_eq!(display_value(&json!(["Action", "RPG"])), "Action, RPG");
        assert_eq!(display_value(&json!(["a", null, 3])), "a, 3");
    }

    #[test]
    fn stringified_lists_are_parsed() {
        assert_eq!(display_value(&json!("['Action', 'RPG']")), "Action, RPG");
        assert_eq!(
            display_value(&json!(r#"['Valve', "Hidden Path, Inc."]"#)),
            "Valve, Hidden Path, Inc."
        );
    }

    #[test]
    fn inconclusive_scan_falls_back_to_raw_content() {
        assert_eq!(display_value(&json!("[ , ]")), " , ");
    }

    #[test]
    fn plain_values() {
        assert_eq!(display_value(&json!("Portal 2")), "Portal 2");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(12)), "12");
    }

    #[test]
    fn platforms_cell() {
        let record = json!({"windows": true, "mac": false, "linux": true});
        assert_eq!(render_cell(column("platforms"), &record), "Windows | Linux");

        let record = json!({"windows": false, "mac": null});
        assert_eq!(render_cell(column("platforms"), &record), "N/A");
    }

    #[test]
    fn price_cell() {
        assert_eq!(render_cell(column("price"), &json!({"price": 9.99})), "$9.99");
        assert_eq!(render_cell(column("price"), &json!({"price": 0})), "$0");
        assert_eq!(render_cell(column("price"), &json!({})), "N/A");
    }

    #[test]
    fn date_cell() {
        let record = json!({"release_date": "2011-04-18"});
        assert_eq!(render_cell(column("release_date"), &record), "2011-04-18");
        assert_eq!(render_cell(column("release_date"), &json!({"release_date": null})), "N/A");
    }

    #[test]
    fn list_cell_uses_display_value() {
        let record = json!({"genres": "['Action', 'Indie']"});
        assert_eq!(render_cell(column("genres"), &record), "Action, Indie");
    }
}
