//! CLI command implementations.

pub(crate) mod books;
pub(crate) mod serve;

pub(crate) use books::BooksArgs;
pub(crate) use serve::ServeArgs;
