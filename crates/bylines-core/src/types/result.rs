use std::fmt;

use serde::{Deserialize, Serialize};

use super::book::BookCandidate;

/// Which path ultimately produced the books in an [`ExtractionResult`].
///
/// The label always names the final contributor; results are never blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// The heuristic segmenter's output was returned.
    Deterministic,
    /// The fallback parser's output replaced the heuristic output.
    Probabilistic,
    /// No recommendation section was found.
    None,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deterministic => write!(f, "deterministic"),
            Self::Probabilistic => write!(f, "probabilistic"),
            Self::None => write!(f, "none"),
        }
    }
}

/// The output of a single extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Books in source order.
    pub books: Vec<BookCandidate>,

    /// Which path produced `books`.
    pub method: ExtractionMethod,
}

impl ExtractionResult {
    /// The "zero books, method none" outcome.
    #[must_use]
    pub fn none() -> Self {
        Self {
            books: Vec::new(),
            method: ExtractionMethod::None,
        }
    }

    #[must_use]
    pub fn deterministic(books: Vec<BookCandidate>) -> Self {
        Self {
            books,
            method: ExtractionMethod::Deterministic,
        }
    }

    #[must_use]
    pub fn probabilistic(books: Vec<BookCandidate>) -> Self {
        Self {
            books,
            method: ExtractionMethod::Probabilistic,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Returns the books as plain `(title, author)` pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.books.iter().map(BookCandidate::to_pair).collect()
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtractionResult(books={}, method={})", self.books.len(), self.method)
    }
}
