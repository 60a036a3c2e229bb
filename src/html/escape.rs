//! Escaping for text placed into HTML documents

use serde::Serialize;

/// Escapes text for use in element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serializes `state` as a JavaScript expression safe to inline in `<script>`
///
/// The output is valid JSON. `<`, `>` and `/` are written as unicode escapes
/// so the text can never close the script element, and U+2028 / U+2029 are
/// escaped because older JavaScript engines treat them as line terminators
/// inside string literals.
pub fn serialize_state<T: Serialize + ?Sized>(state: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(state)?;

    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003C"),
            '>' => escaped.push_str("\\u003E"),
            '/' => escaped.push_str("\\u002F"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    Ok(escaped)
}
