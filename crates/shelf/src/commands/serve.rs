//! `shelf serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use shelf_config::{CliSettings, Config};
use shelf_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover shelf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Sanity project ID (overrides config).
    #[arg(long, env = "SANITY_PROJECT_ID")]
    project_id: Option<String>,

    /// Sanity dataset (overrides config).
    #[arg(long, env = "SANITY_DATASET")]
    dataset: Option<String>,

    /// Enable verbose output (show render warnings and request logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable page caching (default: enabled).
    #[arg(long)]
    cache: Option<bool>,

    /// Disable page caching.
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            cache_enabled: self.resolve_cache_enabled(),
            host: self.host,
            port: self.port,
            project_id: self.project_id,
            dataset: self.dataset,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_config(&config, version.to_owned(), self.verbose)?;

        output.highlight(&format!(
            "Starting server on http://{}:{}",
            server_config.host, server_config.port
        ));
        output.info(&format!(
            "Sanity: {}/{} (API {}, CDN {})",
            server_config.project_id,
            server_config.dataset,
            server_config.api_version,
            if server_config.use_cdn { "on" } else { "off" }
        ));
        if server_config.cache_enabled {
            output.info("Page cache: enabled");
        } else {
            output.info("Page cache: disabled");
        }
        if server_config.revalidate_token.is_none() {
            output.info("Cache invalidation: disabled (no revalidate token in config)");
        }

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `cache_enabled` from --cache/--no-cache flags.
    fn resolve_cache_enabled(&self) -> Option<bool> {
        self.no_cache.then_some(false).or(self.cache)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ServeArgs,
    }

    fn parse(args: &[&str]) -> ServeArgs {
        TestCli::try_parse_from(std::iter::once("serve").chain(args.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_resolve_cache_enabled() {
        assert_eq!(parse(&[]).resolve_cache_enabled(), None);
        assert_eq!(parse(&["--no-cache"]).resolve_cache_enabled(), Some(false));
        assert_eq!(parse(&["--cache", "true"]).resolve_cache_enabled(), Some(true));
    }
}
