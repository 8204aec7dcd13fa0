//! Content store trait and error types.

use std::collections::BTreeMap;

use serde_json::Value;

/// Named query parameters.
///
/// Names are given without the leading `$`; values are JSON so strings,
/// numbers and arrays substitute with their proper types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(BTreeMap<String, Value>);

impl QueryParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous value with the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Look up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Iterate parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Error from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Request(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The response could not be interpreted as a query result.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Read-only access to the hosted content store.
///
/// One call is one round trip. Implementations do not retry; that policy
/// belongs to whoever owns the transport.
pub trait ContentStore: Send + Sync {
    /// Run `query` with `params` substituted and return the query result.
    ///
    /// A query that matches nothing yields `Value::Null` (single document) or
    /// an empty array (list), not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached, rejects the
    /// query, or answers with something that is not a query result.
    fn query(&self, query: &str, params: &QueryParams) -> Result<Value, StoreError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_params_replace_same_name() {
        let params = QueryParams::new().with("slug", "a").with("slug", "b");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("slug"), Some(&json!("b")));
    }

    #[test]
    fn test_params_iterate_in_name_order() {
        let params = QueryParams::new()
            .with("chapterSlug", "rise")
            .with("bookSlug", "dune");
        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["bookSlug", "chapterSlug"]);
    }

    #[test]
    fn test_params_keep_json_types() {
        let params = QueryParams::new().with("limit", 10).with("draft", false);
        assert_eq!(params.get("limit"), Some(&json!(10)));
        assert_eq!(params.get("draft"), Some(&json!(false)));
        assert!(!params.is_empty());
    }

    #[test]
    fn test_http_error_display() {
        let err = StoreError::Http {
            status: 403,
            body: "forbidden".to_owned(),
        };
        assert_eq!(err.to_string(), "HTTP error: 403 - forbidden");
    }
}
