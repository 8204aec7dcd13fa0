//! Chapter-to-chapter navigation.

use crate::models::ChapterSummary;

/// Position of a chapter within its book, with its neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct ChapterNavigation {
    /// Chapter before the current one, if any.
    pub previous: Option<ChapterSummary>,
    /// Chapter after the current one, if any.
    pub next: Option<ChapterSummary>,
    /// Zero-based position of the current chapter.
    pub index: usize,
    /// Number of chapters in the book.
    pub total: usize,
}

impl ChapterNavigation {
    /// Locate chapter `id` in the ordered `chapters` list.
    ///
    /// Returns `None` if the chapter is not part of the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf_site::{ChapterNavigation, ChapterSummary};
    ///
    /// let chapter = |id: &str, order| ChapterSummary {
    ///     id: id.to_owned(),
    ///     title: id.to_owned(),
    ///     slug: id.to_owned(),
    ///     order,
    /// };
    /// let chapters = vec![chapter("intro", 1.0), chapter("rise", 2.0), chapter("fall", 3.0)];
    ///
    /// let nav = ChapterNavigation::locate(&chapters, "rise").unwrap();
    /// assert_eq!(nav.previous.unwrap().id, "intro");
    /// assert_eq!(nav.next.unwrap().id, "fall");
    /// ```
    pub fn locate(chapters: &[ChapterSummary], id: &str) -> Option<Self> {
        let index = chapters.iter().position(|chapter| chapter.id == id)?;
        let previous = index
            .checked_sub(1)
            .and_then(|i| chapters.get(i))
            .cloned();
        let next = chapters.get(index + 1).cloned();

        Some(Self {
            previous,
            next,
            index,
            total: chapters.len(),
        })
    }

    /// One-based position label, e.g. "Chapter 2 of 3".
    pub fn position_label(&self) -> String {
        format!("Chapter {} of {}", self.index + 1, self.total)
    }
}
