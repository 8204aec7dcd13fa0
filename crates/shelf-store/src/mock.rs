//! Mock content store for testing.
//!
//! Provides [`MockStore`] for unit testing without network access.

use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::store::{ContentStore, QueryParams, StoreError};

/// A query issued against a [`MockStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedQuery {
    /// Query text as sent.
    pub query: String,
    /// Parameters as sent.
    pub params: QueryParams,
}

/// Canned outcome for queries containing a fragment.
#[derive(Debug)]
enum Canned {
    Result(Value),
    Failure { status: u16, body: String },
}

/// Mock content store for testing.
///
/// Answers queries from canned responses keyed by a query fragment: the
/// first registered fragment contained in the query text wins. Queries with
/// no match return `Value::Null`, like a store with no matching document.
///
/// # Example
///
/// ```ignore
/// use serde_json::json;
/// use shelf_store::{ContentStore, MockStore, QueryParams};
///
/// let store = MockStore::new()
///     .with_response(r#"_type == "book""#, json!([{"_id": "book-1"}]));
///
/// let books = store.query(r#"*[_type == "book"]"#, &QueryParams::new()).unwrap();
/// assert_eq!(store.queries().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    responses: RwLock<Vec<(String, Canned)>>,
    queries: RwLock<Vec<RecordedQuery>>,
}

impl MockStore {
    /// Create a new mock store with no canned responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `fragment` with `result`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_response(self, fragment: impl Into<String>, result: Value) -> Self {
        self.responses
            .write()
            .unwrap()
            .push((fragment.into(), Canned::Result(result)));
        self
    }

    /// Fail queries containing `fragment` with an HTTP error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(
        self,
        fragment: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.responses.write().unwrap().push((
            fragment.into(),
            Canned::Failure {
                status,
                body: body.into(),
            },
        ));
        self
    }

    /// All queries issued so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ContentStore for MockStore {
    fn query(&self, query: &str, params: &QueryParams) -> Result<Value, StoreError> {
        self.queries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedQuery {
                query: query.to_owned(),
                params: params.clone(),
            });

        let responses = self.responses.read().unwrap_or_else(PoisonError::into_inner);
        match responses
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
        {
            Some((_, Canned::Result(result))) => Ok(result.clone()),
            Some((_, Canned::Failure { status, body })) => Err(StoreError::Http {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(Value::Null),
        }
    }
}
