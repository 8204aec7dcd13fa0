//! Sanity HTTP query API client.
//!
//! Provides a sync HTTP client for the `data/query` endpoint. Queries are sent
//! as GET requests with the query text and each parameter JSON-encoded in the
//! URL, and the `result` member of the response envelope is returned.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;
use ureq::Agent;

use crate::store::{ContentStore, QueryParams, StoreError};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Default query API version.
const DEFAULT_API_VERSION: &str = "2024-01-01";

/// Sanity query API client.
pub struct SanityClient {
    agent: Agent,
    project_id: String,
    dataset: String,
    api_version: String,
    use_cdn: bool,
    token: Option<String>,
}

impl SanityClient {
    /// Create a client for `project_id` / `dataset` using the API CDN and the
    /// default API version.
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            agent: build_agent(Duration::from_secs(DEFAULT_TIMEOUT)),
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            use_cdn: true,
            token: None,
        }
    }

    /// Set the query API version (`YYYY-MM-DD` or `1`).
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Enable or disable the API CDN.
    ///
    /// The CDN is never used for authenticated requests.
    #[must_use]
    pub fn with_cdn(mut self, use_cdn: bool) -> Self {
        self.use_cdn = use_cdn;
        self
    }

    /// Set a read token for private datasets.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the global HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    /// Full URL of the query endpoint.
    fn query_url(&self) -> String {
        let host = if self.use_cdn && self.token.is_none() {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!(
            "https://{}.{host}/v{}/data/query/{}",
            self.project_id,
            self.api_version.trim_start_matches('v'),
            self.dataset
        )
    }
}

impl ContentStore for SanityClient {
    fn query(&self, query: &str, params: &QueryParams) -> Result<Value, StoreError> {
        let url = self.query_url();

        let mut request = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .query("query", query);
        for (name, value) in params.iter() {
            request = request.query(format!("${name}"), value.to_string());
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        debug!(url = %url, params = params.len(), "Querying content store");

        let response = request.call()?;
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(StoreError::Http {
                status,
                body: error_body,
            });
        }

        let text = body_reader.read_to_string()?;
        extract_result(&text)
    }
}

/// Build an agent that reports HTTP error statuses as responses.
fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Pull the `result` member out of a query response envelope.
fn extract_result(body: &str) -> Result<Value, StoreError> {
    let mut envelope: Map<String, Value> = serde_json::from_str(body)
        .map_err(|e| StoreError::Malformed(format!("response is not a JSON object: {e}")))?;

    if let Some(ms) = envelope.get("ms").and_then(Value::as_u64) {
        debug!(ms, "Content store query completed");
    }

    envelope
        .remove("result")
        .ok_or_else(|| StoreError::Malformed("response has no result member".to_owned()))
}
