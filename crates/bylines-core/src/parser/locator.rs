//! # Section Locator
//!
//! Finds the book-recommendation region of an episode description.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::Result;

/// Sign-off marker; text from its last occurrence onward is boilerplate.
pub const SIGN_OFF_MARKER: &str = "Email us at";

/// Phrases that close the recommendation section.
pub const END_MARKERS: &[&str] = &[
    "Thoughts? Guest suggestions?",
    "You can find the transcript",
    "This episode of",
    "Special thanks to",
    "Unlock full access",
    "Email us at",
    "You can find transcripts",
    "Book recommendations from all our guests",
];

/// A recommendation header variant.
struct HeaderVariant {
    label: &'static str,
    pattern: Regex,
    /// Whether the phrase itself names books.
    book_qualified: bool,
}

/// A located recommendation section.
///
/// `text` is always `&raw[start..end]` of the description it was found in,
/// never rebuilt, and never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationSection<'a> {
    /// Label of the header variant that matched.
    pub header: &'static str,
    /// Byte offset of the header match.
    pub header_offset: usize,
    /// Byte offset where the section body starts.
    pub start: usize,
    /// Byte offset where the section body ends (exclusive).
    pub end: usize,
    /// The section body.
    pub text: &'a str,
}

/// Outcome of looking for a recommendation section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLookup<'a> {
    /// No header variant occurs in the text (or nothing follows it).
    NotFound,
    /// A generic "recommendations" header that does not anchor to books,
    /// e.g. "Podcast Recommendations". The fallback parser should read
    /// `context` (the description minus sign-off boilerplate) directly.
    Ambiguous {
        header: &'static str,
        context: &'a str,
    },
    /// A trustworthy section.
    Found(RecommendationSection<'a>),
}

/// Locates the recommendation section using header variants ranked by specificity.
pub struct SectionLocator {
    headers: Vec<HeaderVariant>,
}

impl SectionLocator {
    /// Constructs a new `SectionLocator` with pre-compiled header patterns.
    ///
    /// # Errors
    ///
    /// Returns `BylinesError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        // Most specific first: a tie at the same offset goes to the earlier entry.
        let table: [(&'static str, &str, bool); 4] = [
            ("Book Recommendations:", r"book\s+recommendations?\s*:", true),
            ("Book Recommendations", r"book\s+recommendations?", true),
            ("Recommendations:", r"recommendations?\s*:", false),
            ("Recommendations", r"recommendations?", false),
        ];

        let headers = table
            .into_iter()
            .map(|(label, pattern, book_qualified)| -> Result<HeaderVariant> {
                Ok(HeaderVariant {
                    label,
                    pattern: RegexBuilder::new(pattern).case_insensitive(true).build()?,
                    book_qualified,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { headers })
    }

    /// Locates the recommendation section in `raw`.
    pub fn locate<'a>(&self, raw: &'a str) -> SectionLookup<'a> {
        let context = truncate_sign_off(raw);

        let best = self
            .headers
            .iter()
            .enumerate()
            .filter_map(|(rank, variant)| {
                variant
                    .pattern
                    .find(context)
                    .map(|m| (m.start(), rank, m.end(), variant))
            })
            .min_by_key(|&(offset, rank, _, _)| (offset, rank));

        let Some((header_offset, _, header_end, variant)) = best else {
            debug!("no recommendation header found");
            return SectionLookup::NotFound;
        };
        debug!(header = variant.label, offset = header_offset, "selected section header");

        if !variant.book_qualified && !anchors_to_books(&context[..header_offset]) {
            debug!(header = variant.label, "generic header does not anchor to books");
            return SectionLookup::Ambiguous {
                header: variant.label,
                context,
            };
        }

        let body = &context[header_end..];
        let body_len = earliest_end_marker(body).unwrap_or(body.len());
        let body = &body[..body_len];

        let trimmed = body.trim_start();
        let start = header_end + (body.len() - trimmed.len());
        let end = start + trimmed.trim_end().len();

        if start >= end {
            debug!(header = variant.label, "recommendation section is empty");
            return SectionLookup::NotFound;
        }

        SectionLookup::Found(RecommendationSection {
            header: variant.label,
            header_offset,
            start,
            end,
            text: &raw[start..end],
        })
    }
}

/// Cuts `raw` at the last sign-off marker, if any.
fn truncate_sign_off(raw: &str) -> &str {
    match raw.rfind(SIGN_OFF_MARKER) {
        Some(pos) => {
            debug!(marker = SIGN_OFF_MARKER, "truncated description at sign-off");
            &raw[..pos]
        }
        None => raw,
    }
}

/// Byte offset of the earliest end marker in `body`.
fn earliest_end_marker(body: &str) -> Option<usize> {
    let found = END_MARKERS
        .iter()
        .filter_map(|marker| body.find(marker).map(|pos| (pos, *marker)))
        .min_by_key(|&(pos, _)| pos);

    found.map(|(pos, marker)| {
        debug!(marker, "truncated recommendations at end marker");
        pos
    })
}

/// A generic header is trusted when it opens a sentence, or when the
/// sentence it continues ends with "book"/"books".
fn anchors_to_books(before: &str) -> bool {
    let before = before.trim_end();
    if before.is_empty() {
        return true;
    }

    let sentence = before
        .rsplit(['.', '!', '?'])
        .next()
        .unwrap_or(before)
        .trim();
    if sentence.is_empty() {
        return true;
    }

    let last_word = sentence
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or(sentence)
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    last_word == "book" || last_word == "books"
}
