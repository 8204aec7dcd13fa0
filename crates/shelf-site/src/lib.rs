//! Book and chapter fetching for Shelf.
//!
//! This crate provides:
//! - [`Library`]: Document fetchers for the book list, book and chapter pages
//! - [`ChapterNavigation`]: Previous/next derivation over an ordered chapter list
//! - [`SanityImageResolver`]: Image asset reference to CDN URL resolution
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use shelf_site::{Library, SanityImageResolver};
//! use shelf_store::SanityClient;
//!
//! let store = Arc::new(SanityClient::new("abc123", "production"));
//! let library = Library::new(store)
//!     .with_image_resolver(Arc::new(SanityImageResolver::new("abc123", "production")));
//!
//! let books = library.fetch_book_list()?;
//! if let Some(page) = library.fetch_chapter_page("dune", "intro")? {
//!     println!("{} ({} of {})", page.chapter.title, page.navigation.index + 1, page.navigation.total);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod image;
mod library;
mod models;
mod navigation;
mod queries;

pub use error::SiteError;
pub use image::SanityImageResolver;
pub use library::Library;
pub use models::{Author, Book, BookSummary, Chapter, ChapterPage, ChapterSummary};
pub use navigation::ChapterNavigation;
