//! Documents as returned by the fetchers.
//!
//! Field names follow the query projections in [`crate::queries`]. Slugs are
//! projected to plain strings.

use serde::{Deserialize, Deserializer};
use shelf_renderer::{ContentNode, ImageSource};

use crate::navigation::ChapterNavigation;

/// Book author.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<ImageSource>,
}

/// Entry of a book's chapter list.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChapterSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    /// Position within the book. Editors may use fractions to slot a
    /// chapter between two others.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: f64,
}

/// Book as shown on the home page.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<ImageSource>,
    #[serde(default)]
    pub author: Option<Author>,
}

/// Book with its ordered chapter list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub cover_image: Option<ImageSource>,
    pub author: Option<Author>,
    /// Chapters ordered by `order` ascending.
    pub chapters: Vec<ChapterSummary>,
}

/// Chapter with its content.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentNode>,
    /// Narration audio URL, resolved by the query.
    #[serde(rename = "audioUrl", default)]
    pub audio_url: Option<String>,
}

/// Everything the chapter reader page shows.
#[derive(Clone, Debug, PartialEq)]
pub struct ChapterPage {
    pub book: Book,
    pub chapter: Chapter,
    pub navigation: ChapterNavigation,
}

/// Book as returned by the book projection, before the chapter list is
/// settled.
#[derive(Debug, Deserialize)]
pub(crate) struct BookRecord {
    #[serde(flatten)]
    pub summary: BookSummary,
    /// Chapters referencing the book, ordered by the store.
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<ChapterSummary>,
    /// The book's own chapter reference array, dereferenced. Dangling
    /// references come back as `null`.
    #[serde(rename = "chapterRefs", default, deserialize_with = "null_as_default")]
    pub chapter_refs: Vec<Option<ChapterSummary>>,
}

impl BookRecord {
    /// Settle the chapter list and build the [`Book`].
    ///
    /// Chapters found by reverse reference are authoritative. The stored
    /// reference array is used only when none reference the book; it is then
    /// cleaned of dangling and duplicate entries and sorted by `order`.
    pub(crate) fn into_book(self) -> Book {
        let chapters = if self.chapters.is_empty() {
            let mut seen = std::collections::HashSet::new();
            let mut hinted: Vec<ChapterSummary> = self
                .chapter_refs
                .into_iter()
                .flatten()
                .filter(|chapter| seen.insert(chapter.id.clone()))
                .collect();
            hinted.sort_by(|a, b| a.order.total_cmp(&b.order));
            hinted
        } else {
            self.chapters
        };

        let summary = self.summary;
        Book {
            id: summary.id,
            title: summary.title,
            slug: summary.slug,
            description: summary.description,
            cover_image: summary.cover_image,
            author: summary.author,
            chapters,
        }
    }
}

/// Result of the composite chapter page query.
#[derive(Debug, Deserialize)]
pub(crate) struct ChapterPageRecord {
    #[serde(default)]
    pub book: Option<BookRecord>,
    /// Every published chapter with the requested slug, in any book.
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Chapter>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
