//! `shelf books` command implementation.

use std::path::PathBuf;

use clap::Args;
use shelf_config::Config;
use shelf_server::{build_library, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the books command.
#[derive(Args)]
pub(crate) struct BooksArgs {
    /// Path to configuration file (default: auto-discover shelf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BooksArgs {
    /// Execute the books command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the store query fails.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let server_config = server_config_from_config(&config, version.to_owned(), false)?;
        let library = build_library(&server_config);

        let books = library.fetch_book_list()?;
        if books.is_empty() {
            output.info("No books found");
            return Ok(());
        }

        for book in &books {
            let author = book
                .author
                .as_ref()
                .map_or_else(String::new, |author| format!("by {}", author.name));
            output.row(&format!("{} ({})", book.title, book.slug), &author);
        }
        output.info(&format!("{} published book(s)", books.len()));

        Ok(())
    }
}
