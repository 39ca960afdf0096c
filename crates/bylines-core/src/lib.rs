//! # Bylines Core
//!
//! Extracts book recommendations (title, author pairs) from free-text podcast
//! episode descriptions. A heuristic segmenter does the work; a pluggable
//! LLM fallback takes over when validation says the heuristic output cannot
//! be trusted.
//!
//! ## Quick Start
//!
//! ```rust
//! use bylines_core::parser::{SectionLocator, SectionLookup, Segmenter};
//!
//! let locator = SectionLocator::new().unwrap();
//! let raw = "Book Recommendations: Sapiens by Yuval Noah HarariEducated by Tara Westover";
//!
//! let SectionLookup::Found(section) = locator.locate(raw) else { panic!() };
//! let books = Segmenter::new().segment(section.text);
//!
//! assert_eq!(books[0].author, "Yuval Noah Harari");
//! assert_eq!(books[1].title, "Educated");
//! ```
pub mod dedup;
pub mod error;
pub mod parser;
pub mod types;

// Re-export primary API
pub use dedup::{DedupKey, dedup, merge_recommendations};
pub use error::{BylinesError, Result};
pub use parser::{
    BookExtractor, CompletionBackend, EscalationReason, ExtractorConfig, FallbackParser, Prompt,
    PromptFallback, SectionLocator, Segmenter, Validator, clean_title,
};
pub use types::{
    BookCandidate, Episode, EpisodeExtraction, ExtractionMethod, ExtractionResult, Provenance,
};
