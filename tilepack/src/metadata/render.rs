//! Metadata rendering into the three wire formats.

use crate::metadata::MetadataKey;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A metadata mapping assembled fresh for one request.
///
/// Values are `None` when the archive stores an SQL NULL for the key.
/// Keys with no row in the metadata table are simply absent from the map.
pub type MetadataSet = BTreeMap<MetadataKey, Option<String>>;

/// Wire format for a metadata response, selected by query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// Tab-separated `key\tvalue` lines (the default).
    Text,
    /// A single flat JSON object.
    Json,
    /// JSON wrapped in a callback invocation.
    ///
    /// The callback name is validated at render time; an invalid name
    /// silently falls back to the bare JSON object.
    Jsonp(String),
}

/// Get the JavaScript-identifier pattern used to vet callback names.
fn callback_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[$_A-Za-z][$_0-9A-Za-z]*$").unwrap())
}

/// Check whether a JSONP callback name is safe to embed verbatim.
///
/// # Example
///
/// ```
/// use tilepack::metadata::valid_callback_name;
///
/// assert!(valid_callback_name("foo"));
/// assert!(valid_callback_name("_render$2"));
/// assert!(!valid_callback_name("1foo"));
/// assert!(!valid_callback_name("alert(1);x"));
/// ```
pub fn valid_callback_name(name: &str) -> bool {
    callback_pattern().is_match(name)
}

/// Render a metadata mapping in the requested wire format.
///
/// Text mode emits one `key\tvalue` line per entry with embedded tabs and
/// newlines escaped as literal `\t` / `\n` sequences and NULL values
/// rendered as the token `\N`. JSON mode emits a flat object mapping key
/// names to strings (or `null`). JSONP mode wraps that object as
/// `callback(<json>);` when the callback name passes
/// [`valid_callback_name`], and otherwise returns the bare object.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use tilepack::metadata::{render, MetadataKey, RenderMode};
///
/// let mut set = BTreeMap::new();
/// set.insert(MetadataKey::Version, Some("1".to_string()));
///
/// assert_eq!(render(&set, &RenderMode::Text), "version\t1\n");
/// assert_eq!(render(&set, &RenderMode::Json), r#"{"version":"1"}"#);
/// assert_eq!(
///     render(&set, &RenderMode::Jsonp("foo".to_string())),
///     r#"foo({"version":"1"});"#
/// );
/// ```
pub fn render(set: &MetadataSet, mode: &RenderMode) -> String {
    match mode {
        RenderMode::Text => render_text(set),
        RenderMode::Json => render_json(set),
        RenderMode::Jsonp(callback) => {
            let json = render_json(set);
            if valid_callback_name(callback) {
                format!("{}({});", callback, json)
            } else {
                json
            }
        }
    }
}

fn render_text(set: &MetadataSet) -> String {
    let mut out = String::new();
    for (key, value) in set {
        out.push_str(key.name());
        out.push('\t');
        match value {
            Some(v) => out.push_str(&escape_text_value(v)),
            None => out.push_str("\\N"),
        }
        out.push('\n');
    }
    out
}

/// Escape a value for the tab-separated text format.
///
/// Only tabs and newlines are escaped; they would otherwise break the
/// line/field structure of the output.
fn escape_text_value(value: &str) -> String {
    value.replace('\t', "\\t").replace('\n', "\\n")
}

fn render_json(set: &MetadataSet) -> String {
    let mut object = Map::new();
    for (key, value) in set {
        let json_value = match value {
            Some(v) => Value::String(v.clone()),
            None => Value::Null,
        };
        object.insert(key.name().to_string(), json_value);
    }
    Value::Object(object).to_string()
}
