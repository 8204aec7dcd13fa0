//! HTTP server for the Shelf reading platform.
//!
//! This crate provides a native Rust HTTP server using axum, serving
//! server-rendered HTML pages:
//! - `/` lists published books
//! - `/books/{book}` shows a book and its chapters
//! - `/books/{book}/chapters/{chapter}` is the chapter reader
//! - `/api/clear-cache` drops rendered pages after content changes
//! - `/health` reports liveness and version
//!
//! # Quick Start
//!
//! ```ignore
//! use shelf_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         project_id: "abc123".to_owned(),
//!         dataset: "production".to_owned(),
//!         version: "1.0.0".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (shelf-server)
//!                        │
//!                        ├─► page cache (shelf-cache) ──hit──► HTML
//!                        │
//!                        └─► spawn_blocking
//!                                │
//!                                ├─► Library (shelf-site) ──GROQ──► Sanity (shelf-store)
//!                                │
//!                                └─► PortableTextRenderer (shelf-renderer) ──► maud pages
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod pages;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use shelf_cache::{Cache, MemoryCache, NullCache};
use shelf_config::ConfigError;
use shelf_site::{Library, SanityImageResolver};
use shelf_store::SanityClient;
use state::AppState;

/// Presentation settings shared by all page templates.
#[derive(Clone, Debug)]
pub struct SiteSettings {
    /// Heading of the book list page.
    pub title: String,
    /// Name shown in the footer copyright line.
    pub footer_name: String,
    /// Link to the content studio, shown in the footer when set.
    pub studio_url: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Your Library".to_owned(),
            footer_name: "Book Platform".to_owned(),
            studio_url: None,
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Sanity project id.
    pub project_id: String,
    /// Sanity dataset.
    pub dataset: String,
    /// Sanity query API version.
    pub api_version: String,
    /// Query the API CDN instead of the live API.
    pub use_cdn: bool,
    /// Read token for private datasets.
    pub sanity_token: Option<String>,
    /// Store request timeout in seconds.
    pub timeout_secs: u64,
    /// Keep rendered pages in memory.
    pub cache_enabled: bool,
    /// Secret for `/api/clear-cache` (`None` disables the endpoint).
    pub revalidate_token: Option<String>,
    /// Presentation settings.
    pub site: SiteSettings,
    /// Log render warnings at `warn` level.
    pub verbose: bool,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            project_id: String::new(),
            dataset: "production".to_owned(),
            api_version: "2024-01-01".to_owned(),
            use_cdn: true,
            sanity_token: None,
            timeout_secs: 30,
            cache_enabled: true,
            revalidate_token: None,
            site: SiteSettings::default(),
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let library = build_library(&config);

    let cache: Box<dyn Cache> = if config.cache_enabled {
        Box::new(MemoryCache::new())
    } else {
        Box::new(NullCache)
    };

    let state = Arc::new(AppState::new(
        Arc::new(library),
        cache.as_ref(),
        config.site.clone(),
        config.revalidate_token.clone(),
        config.verbose,
        config.version.clone(),
    ));
    if state.revalidate_token.is_none() {
        tracing::warn!("No revalidate token configured, /api/clear-cache will reject all requests");
    }

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        project_id = %config.project_id,
        dataset = %config.dataset,
        cache = config.cache_enabled,
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the document fetchers for the configured Sanity project.
#[must_use]
pub fn build_library(config: &ServerConfig) -> Library {
    let client = SanityClient::new(&config.project_id, &config.dataset)
        .with_api_version(&config.api_version)
        .with_cdn(config.use_cdn)
        .with_token(config.sanity_token.clone())
        .with_timeout(Duration::from_secs(config.timeout_secs));
    let images = SanityImageResolver::new(&config.project_id, &config.dataset);
    Library::new(Arc::new(client)).with_image_resolver(Arc::new(images))
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Shelf config.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if the `[sanity]` section is missing
/// or invalid.
pub fn server_config_from_config(
    config: &shelf_config::Config,
    version: String,
    verbose: bool,
) -> Result<ServerConfig, ConfigError> {
    let sanity = config.require_sanity()?;

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        project_id: sanity.project_id.clone(),
        dataset: sanity.dataset.clone(),
        api_version: sanity.api_version.clone(),
        use_cdn: sanity.use_cdn,
        sanity_token: sanity.token.clone(),
        timeout_secs: sanity.timeout_secs,
        cache_enabled: config.cache.enabled,
        revalidate_token: config.revalidate.token.clone(),
        site: SiteSettings {
            title: config.site.title.clone(),
            footer_name: config.site.footer_name.clone(),
            studio_url: config.site.studio_url.clone(),
        },
        verbose,
        version,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shelf_config::{Config, SanityConfig};

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let mut config = Config::default();
        config.sanity = Some(SanityConfig {
            dataset: "staging".to_owned(),
            token: Some("read-token".to_owned()),
            ..SanityConfig::new("abc123")
        });
        config.revalidate.token = Some("s3cret".to_owned());
        config.site.studio_url = Some("https://studio.example.com".to_owned());

        let server = server_config_from_config(&config, "1.2.3".to_owned(), true).unwrap();

        assert_eq!(server.project_id, "abc123");
        assert_eq!(server.dataset, "staging");
        assert_eq!(server.sanity_token.as_deref(), Some("read-token"));
        assert_eq!(server.revalidate_token.as_deref(), Some("s3cret"));
        assert_eq!(server.site.title, "Your Library");
        assert_eq!(server.site.studio_url.as_deref(), Some("https://studio.example.com"));
        assert_eq!(server.port, 3000);
        assert_eq!(server.version, "1.2.3");
        assert!(server.verbose);
    }

    #[test]
    fn test_server_config_requires_sanity() {
        let config = Config::default();
        assert!(matches!(
            server_config_from_config(&config, String::new(), false),
            Err(ConfigError::Validation(_))
        ));
    }
}
