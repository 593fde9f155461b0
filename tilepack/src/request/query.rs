//! Query string parameter lookup.

use std::borrow::Cow;

/// Parsed query parameters of one request.
///
/// Parameters keep their request order; lookups return the first
/// occurrence of a key. A bare key with no `=` parses as an empty value,
/// so `?json` is a present `json` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// # Example
    ///
    /// ```
    /// use tilepack::request::QueryParams;
    ///
    /// let query = QueryParams::parse("c=close&json");
    /// assert_eq!(query.get("c"), Some("close"));
    /// assert!(query.contains("json"));
    /// assert!(!query.contains("callback"));
    /// ```
    pub fn parse(query: &str) -> Self {
        let params = url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value): (Cow<'_, str>, Cow<'_, str>)| {
                (key.into_owned(), value.into_owned())
            })
            .collect();
        Self { params }
    }

    /// An empty parameter set (request had no query string).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the first value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether `key` is present at all, with or without a value.
    pub fn contains(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value_pairs() {
        let query = QueryParams::parse("a=1&b=2");
        assert_eq!(query.get("a"), Some("1"));
        assert_eq!(query.get("b"), Some("2"));
        assert_eq!(query.get("c"), None);
    }

    #[test]
    fn test_bare_key_is_present_with_empty_value() {
        let query = QueryParams::parse("json");
        assert!(query.contains("json"));
        assert_eq!(query.get("json"), Some(""));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let query = QueryParams::parse("c=close&c=open");
        assert_eq!(query.get("c"), Some("close"));
    }

    #[test]
    fn test_percent_decoding_applies_to_values() {
        let query = QueryParams::parse("callback=my%5Fcb");
        assert_eq!(query.get("callback"), Some("my_cb"));
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let query = QueryParams::parse("name=blue+marble");
        assert_eq!(query.get("name"), Some("blue marble"));
    }

    #[test]
    fn test_empty_query_has_no_params() {
        let query = QueryParams::parse("");
        assert!(!query.contains("c"));
        assert_eq!(query, QueryParams::empty());
    }
}
