use std::fmt;

use serde::{Deserialize, Serialize};

/// Which extractor produced a [`BookCandidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Produced by the heuristic "Title by Author" segmenter.
    Deterministic,
    /// Produced by the LLM fallback parser.
    Probabilistic,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deterministic => write!(f, "deterministic"),
            Self::Probabilistic => write!(f, "probabilistic"),
        }
    }
}

/// A single recommended book: a (title, author) pair plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCandidate {
    /// Cleaned book title.
    pub title: String,

    /// Author as written in the source text.
    pub author: String,

    /// Which extraction path produced this pair.
    pub provenance: Provenance,

    /// Optional confidence score in `[0.0, 1.0]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl BookCandidate {
    /// Creates a candidate without a confidence score.
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            provenance,
            confidence: None,
        }
    }

    /// Returns `true` if both title and author contain non-whitespace text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.author.trim().is_empty()
    }

    /// Returns the pair as owned `(title, author)` strings.
    #[must_use]
    pub fn to_pair(&self) -> (String, String) {
        (self.title.clone(), self.author.clone())
    }
}

impl fmt::Display for BookCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}
