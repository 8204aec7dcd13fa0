//! Content store client for Shelf.
//!
//! This crate provides a [`ContentStore`] trait that abstracts the hosted
//! content backend. Callers send a declarative query string plus named
//! parameters and receive JSON-shaped documents. This enables:
//!
//! - **Unit testing** without network access
//! - **Backend flexibility** (hosted API, API CDN, recorded fixtures)
//! - **Clean separation** between page fetching logic and HTTP plumbing
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentStore`] trait with a single `query()` method
//! - [`SanityClient`] implementation for the Sanity HTTP query API
//! - [`MockStore`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use shelf_store::{ContentStore, QueryParams, SanityClient};
//!
//! let client = SanityClient::new("abc123", "production");
//! let params = QueryParams::new().with("slug", "dune");
//! let book = client.query(r#"*[_type == "book" && slug.current == $slug][0]"#, &params)?;
//! ```

#[cfg(feature = "mock")]
mod mock;
mod sanity;
mod store;

#[cfg(feature = "mock")]
pub use mock::{MockStore, RecordedQuery};
pub use sanity::SanityClient;
pub use store::{ContentStore, QueryParams, StoreError};
