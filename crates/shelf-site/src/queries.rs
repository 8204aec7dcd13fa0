//! GROQ queries used by the fetchers.
//!
//! Every selection excludes the `drafts.` id namespace so unpublished edits
//! never reach readers.

/// All published books, newest first.
pub(crate) const BOOK_LIST: &str = r#"*[_type == "book" && !(_id in path("drafts.**"))] | order(_createdAt desc) {
  _id,
  title,
  "slug": slug.current,
  description,
  "coverImage": coalesce(coverImage.asset->{ _id, url }, coverImage.asset),
  "author": author->{ _id, name, bio, "image": image.asset->{ _id, url } }
}"#;

/// One published book by `$bookSlug`, with both chapter list sources.
pub(crate) const BOOK: &str = r#"*[_type == "book" && slug.current == $bookSlug && !(_id in path("drafts.**"))][0] {
  _id,
  title,
  "slug": slug.current,
  description,
  "coverImage": coalesce(coverImage.asset->{ _id, url }, coverImage.asset),
  "author": author->{ _id, name, bio, "image": image.asset->{ _id, url } },
  "chapters": *[_type == "chapter" && references(^._id) && !(_id in path("drafts.**"))] | order(order asc) {
    _id, title, "slug": slug.current, "order": coalesce(order, 0)
  },
  "chapterRefs": chapters[]->{ _id, title, "slug": slug.current, "order": coalesce(order, 0) }
}"#;

/// Book by `$bookSlug` plus every published chapter with `$chapterSlug`.
///
/// The caller picks the candidate that belongs to the book, so a slug shared
/// across books never resolves to the wrong chapter.
pub(crate) const CHAPTER_PAGE: &str = r#"{
  "book": *[_type == "book" && slug.current == $bookSlug && !(_id in path("drafts.**"))][0] {
    _id,
    title,
    "slug": slug.current,
    description,
    "coverImage": coalesce(coverImage.asset->{ _id, url }, coverImage.asset),
    "author": author->{ _id, name },
    "chapters": *[_type == "chapter" && references(^._id) && !(_id in path("drafts.**"))] | order(order asc) {
      _id, title, "slug": slug.current, "order": coalesce(order, 0)
    },
    "chapterRefs": chapters[]->{ _id, title, "slug": slug.current, "order": coalesce(order, 0) }
  },
  "candidates": *[_type == "chapter" && slug.current == $chapterSlug && !(_id in path("drafts.**"))] {
    _id,
    title,
    "slug": slug.current,
    "order": coalesce(order, 0),
    "content": content[] {
      ...,
      _type == "image" => { "asset": coalesce(asset->{ _id, url }, asset) },
      _type == "audio" => { "url": coalesce(url, asset->url) }
    },
    "audioUrl": audioFile.asset->url
  }
}"#;
