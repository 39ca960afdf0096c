//! Deduplication of recommendation lists merged across extraction calls.
//!
//! Two books are the same when their trimmed, lowercased titles and authors
//! are both equal. Every merge in the workspace goes through [`DedupKey`].

use std::collections::HashSet;

use crate::types::{BookCandidate, EpisodeExtraction};

/// Equality key for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    title: String,
    author: String,
}

impl DedupKey {
    #[must_use]
    pub fn of(book: &BookCandidate) -> Self {
        Self {
            title: book.title.trim().to_lowercase(),
            author: book.author.trim().to_lowercase(),
        }
    }
}

/// Removes duplicates, keeping the first occurrence and the original order.
#[must_use]
pub fn dedup(books: impl IntoIterator<Item = BookCandidate>) -> Vec<BookCandidate> {
    let mut seen = HashSet::new();
    books
        .into_iter()
        .filter(|book| seen.insert(DedupKey::of(book)))
        .collect()
}

/// Flattens several episode extractions into one deduplicated list.
#[must_use]
pub fn merge_recommendations<'a>(
    extractions: impl IntoIterator<Item = &'a EpisodeExtraction>,
) -> Vec<BookCandidate> {
    dedup(
        extractions
            .into_iter()
            .flat_map(|extraction| extraction.result.books.iter().cloned()),
    )
}
