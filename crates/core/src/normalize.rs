//! List normalizer for legacy catalog data.
//!
//! Older imports stored list-valued fields (genres, tags, developers, ...)
//! as strings that merely look like lists, e.g. `"['Action', 'RPG']"`, with
//! inconsistent quoting and the occasional comma inside a quoted token.
//! [`normalize`] turns any accepted shape into a genuine ordered list.
//!
//! Bracketed strings are parsed in two tiers:
//!
//! 1. **Strict**: every `'` becomes `"` and the result is parsed as JSON. A
//!    JSON array is accepted verbatim, elements untouched.
//! 2. **Scan**: only when the strict parse fails. The brackets are stripped
//!    and the content is split on commas that sit outside a quoted segment.
//!    Quote delimiters are dropped, tokens are trimmed, empty tokens skipped.
//!
//! The two tiers are not symmetric: the strict tier trusts whatever JSON the
//! substitution produces, while the scanner repairs apostrophes and stray
//! quotes. Both paths are kept as-is because their outputs differ
//! observably on real data.

use serde_json::Value;

/// Result of parsing a bracketed string.
#[derive(Debug, Clone, PartialEq)]
pub enum Bracketed {
    /// The quote-substituted string parsed as a JSON array.
    Strict(Vec<Value>),
    /// The quote-substituted string parsed as JSON, but not as an array.
    NotAList,
    /// The strict parse failed; tokens recovered by the manual scan.
    Scanned(Vec<String>),
}

/// Whether the trimmed string starts with `[` and ends with `]`.
pub fn is_bracketed(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']')
}

/// Whether a stored value is a string that was meant to be a list.
///
/// Only the opening bracket is checked; this is the criterion the cleanup
/// job uses to decide which fields to rewrite.
pub fn is_stringified_list(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim_start().starts_with('['))
}

/// Normalize any field value into an ordered list.
///
/// | Input                         | Output                          |
/// |-------------------------------|---------------------------------|
/// | `null`, `""`                  | `[]`                            |
/// | an array                      | the same array                  |
/// | a bracketed string            | parsed (strict, then scan)      |
/// | any other string or value     | a single-element list           |
///
/// Applying `normalize` to its own output returns the same list.
///
/// # Examples
///
/// ```
/// use gamedex_core::normalize::normalize;
/// use serde_json::json;
///
/// assert_eq!(normalize(&json!("['a', 'b']")), vec![json!("a"), json!("b")]);
/// assert_eq!(normalize(&json!("solo")), vec![json!("solo")]);
/// assert!(normalize(&json!("[]")).is_empty());
/// ```
pub fn normalize(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::String(s) if is_bracketed(s) => match parse_bracketed(s) {
            Bracketed::Strict(items) => items,
            Bracketed::NotAList => vec![value.clone()],
            Bracketed::Scanned(tokens) => tokens.into_iter().map(Value::String).collect(),
        },
        other => vec![other.clone()],
    }
}

/// Parse a bracketed string, reporting which tier produced the result.
///
/// The caller is expected to have checked [`is_bracketed`].
pub fn parse_bracketed(raw: &str) -> Bracketed {
    let substituted = raw.replace('\'', "\"");
    match serde_json::from_str::<Value>(&substituted) {
        Ok(Value::Array(items)) => Bracketed::Strict(items),
        Ok(_) => Bracketed::NotAList,
        Err(_) => Bracketed::Scanned(scan_tokens(inner_content(raw))),
    }
}

/// The content between the outer brackets of a trimmed bracketed string.
pub fn inner_content(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed)
}

/// Split list content on commas outside quoted segments.
fn scan_tokens(content: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in content.chars() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), c) if c == open => quote = None,
            (None, ',') => flush_token(&mut current, &mut items),
            _ => current.push(c),
        }
    }
    flush_token(&mut current, &mut items);

    items
}

fn flush_token(current: &mut String, items: &mut Vec<String>) {
    let token = current.trim();
    if !token.is_empty() {
        items.push(token.to_string());
    }
    current.clear();
}
