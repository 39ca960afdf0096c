//! # Validator / Escalation Policy
//!
//! Decides whether the segmenter's output can be returned as-is or whether the
//! fallback parser should take over the whole section.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::BookCandidate;

/// Why a deterministic result was escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    /// A title or author is longer than the configured limit; the boundary
    /// search most likely ran past the end of an author name.
    OversizedField,
    /// A title contains the delimiter (any case), i.e. a multi-"by" title.
    EmbeddedDelimiter,
    /// The segmenter found nothing.
    NoCandidates,
    /// Fewer candidates than the configured minimum.
    TooFewCandidates,
}

impl fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OversizedField => write!(f, "oversized field"),
            Self::EmbeddedDelimiter => write!(f, "embedded delimiter"),
            Self::NoCandidates => write!(f, "no candidates"),
            Self::TooFewCandidates => write!(f, "too few candidates"),
        }
    }
}

/// Validator verdict over a deterministic candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Escalate(EscalationReason),
}

/// Escalation policy over the segmenter's raw output.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    max_field_chars: usize,
    min_book_count: usize,
}

impl Validator {
    /// `min_book_count` of 0 turns the small-result safety net off.
    #[must_use]
    pub fn new(max_field_chars: usize, min_book_count: usize) -> Self {
        Self {
            max_field_chars,
            min_book_count,
        }
    }

    /// Checks the triggers in priority order; the first match wins.
    #[must_use]
    pub fn assess(&self, books: &[BookCandidate]) -> Verdict {
        let oversized = books.iter().any(|book| {
            book.title.chars().count() > self.max_field_chars
                || book.author.chars().count() > self.max_field_chars
        });
        if oversized {
            return Verdict::Escalate(EscalationReason::OversizedField);
        }

        if books.iter().any(|book| book.title.to_lowercase().contains(" by ")) {
            return Verdict::Escalate(EscalationReason::EmbeddedDelimiter);
        }

        if books.is_empty() {
            return Verdict::Escalate(EscalationReason::NoCandidates);
        }

        if books.len() < self.min_book_count {
            return Verdict::Escalate(EscalationReason::TooFewCandidates);
        }

        Verdict::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provenance;

    fn book(title: &str, author: &str) -> BookCandidate {
        BookCandidate::new(title, author, Provenance::Deterministic)
    }

    fn five_books() -> Vec<BookCandidate> {
        vec![
            book("Sapiens", "Yuval Noah Harari"),
            book("Educated", "Tara Westover"),
            book("Evicted", "Matthew Desmond"),
            book("Born a Crime", "Trevor Noah"),
            book("The Overstory", "Richard Powers"),
        ]
    }

    #[test]
    fn five_clean_books_are_accepted() {
        assert_eq!(Validator::new(300, 5).assess(&five_books()), Verdict::Accept);
    }

    #[test]
    fn oversized_field_escalates() {
        let mut books = five_books();
        books[2].author = "x".repeat(301);
        assert_eq!(
            Validator::new(300, 5).assess(&books),
            Verdict::Escalate(EscalationReason::OversizedField)
        );

        books[2].author = "x".repeat(300);
        assert_eq!(Validator::new(300, 5).assess(&books), Verdict::Accept);
    }

    #[test]
    fn length_is_measured_in_characters() {
        let mut books = five_books();
        books[0].title = "é".repeat(300);
        assert_eq!(Validator::new(300, 5).assess(&books), Verdict::Accept);
    }

    #[test]
    fn embedded_delimiter_escalates_in_any_case() {
        let mut books = five_books();
        books[1].title = "Standing By the River".into();
        assert_eq!(
            Validator::new(300, 5).assess(&books),
            Verdict::Escalate(EscalationReason::EmbeddedDelimiter)
        );
    }

    #[test]
    fn oversized_outranks_embedded_delimiter() {
        let mut books = five_books();
        books[0].title = "Standing by the River".into();
        books[4].title = "y".repeat(400);
        assert_eq!(
            Validator::new(300, 5).assess(&books),
            Verdict::Escalate(EscalationReason::OversizedField)
        );
    }

    #[test]
    fn empty_and_small_results_escalate() {
        let v = Validator::new(300, 5);
        assert_eq!(v.assess(&[]), Verdict::Escalate(EscalationReason::NoCandidates));
        assert_eq!(
            v.assess(&five_books()[..4]),
            Verdict::Escalate(EscalationReason::TooFewCandidates)
        );
    }

    #[test]
    fn zero_minimum_disables_the_safety_net_only() {
        let v = Validator::new(300, 0);
        assert_eq!(v.assess(&five_books()[..1]), Verdict::Accept);
        assert_eq!(v.assess(&[]), Verdict::Escalate(EscalationReason::NoCandidates));
    }
}
