//! # Probabilistic Fallback Parser
//!
//! The fallback is a capability: anything that turns raw text into
//! (title, author) pairs. The reference implementation, [`PromptFallback`],
//! sends a constrained extraction prompt to a [`CompletionBackend`] and reads
//! back one `Title by Author` line per book.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::parser::cleaner::clean_title;
use crate::parser::segmenter::DELIMITER;
use crate::types::{BookCandidate, Provenance};

/// Response the model is told to give when nothing qualifies.
pub const NO_BOOKS_SENTINEL: &str = "No books found";

/// Cue that closes the user prompt; models sometimes echo it.
const ANSWER_CUE: &str = "Books found:";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts book recommendations \
from text. Be precise and only extract actual book recommendations from the correct sections. \
Format titles cleanly without leading spaces, dashes, or unnecessary quotes.";

const INSTRUCTIONS: &str = "\
Extract all book recommendations from the following text.

SECTION GUIDELINES:
- ONLY extract from sections that contain \"Book Recommendations\" or \"Recommendations\" (when it's clear they're book-related)
- IGNORE sections labeled: \"Mentioned\", \"Podcast Recommendations\", \"EKS Recommendations\", \"Album Recommendations\", \"Music Recommendations\", \"Acknowledgements\"
- IGNORE recommendations of guests, podcasts, music or anything that is not a book
- IGNORE the production credits section at the end (the part that mentions producers, fact-checkers, music, etc.)
- If the text has multiple recommendation sections, ONLY extract from the book-specific one

FORMAT GUIDELINES:
- Look for patterns like \"Title by Author\" or similar book recommendation formats
- Do NOT ignore books in quotes - extract them normally
- Only extract books that are explicitly mentioned in the text
- Do NOT guess, infer, or add any books that are not clearly present
- If you are not certain a book is mentioned, do NOT include it
- Do NOT hallucinate or invent any book recommendations

OUTPUT FORMAT:
- Format titles cleanly without leading spaces, dashes, or outer quotes
- Do NOT add leading spaces or dashes before titles
- Do NOT enclose titles in quotes unless they are part of the actual title
- Preserve any quotes that are legitimately part of the book title
- If no books are found, respond with \"No books found\"
- If books are found, list each one on a separate line in the format: Title by Author";

/// A two-part chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Builds the book-extraction prompt for `text`.
    #[must_use]
    pub fn book_extraction(text: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: format!("{INSTRUCTIONS}\n\nText to analyze:\n{text}\n\n{ANSWER_CUE}"),
        }
    }
}

/// The text-completion collaborator behind [`PromptFallback`].
///
/// Implementations report a missing credential as
/// [`BylinesError::FallbackUnavailable`](crate::BylinesError::FallbackUnavailable)
/// and network or status failures as
/// [`BylinesError::FallbackTransport`](crate::BylinesError::FallbackTransport).
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}

/// Any source of (title, author) pairs for raw text.
#[async_trait]
pub trait FallbackParser: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Extracts zero or more books from `text`.
    ///
    /// Errors are reported, never fatal: the orchestrator logs them and
    /// treats the call as having found nothing.
    async fn parse(&self, text: &str) -> Result<Vec<BookCandidate>>;
}

/// Prompt-driven fallback over a [`CompletionBackend`].
pub struct PromptFallback<B> {
    backend: B,
}

impl<B: CompletionBackend> PromptFallback<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: CompletionBackend> FallbackParser for PromptFallback<B> {
    fn name(&self) -> &'static str {
        "prompt"
    }

    async fn parse(&self, text: &str) -> Result<Vec<BookCandidate>> {
        let prompt = Prompt::book_extraction(text);
        let response = self.backend.complete(&prompt).await?;
        let books = parse_completion(&response);
        debug!(count = books.len(), "parsed completion");
        Ok(books)
    }
}

/// Strips list decoration a model may add despite instructions: bullets and
/// `1.` / `1)` numbering.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start_matches(['*', '\u{2022}']).trim_start();

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix(['.', ')']) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => line,
    }
}

/// Parses a completion into candidates, one `Title by Author` per line.
///
/// The model has already separated the entries, so each line splits at its
/// last delimiter with no boundary hunting. Authors may start lowercase
/// ("bell hooks") and titles may contain "by". Titles go through the title
/// cleaner.
#[must_use]
pub fn parse_completion(response: &str) -> Vec<BookCandidate> {
    let response = response.trim();
    if response.is_empty()
        || response
            .to_lowercase()
            .contains(&NO_BOOKS_SENTINEL.to_lowercase())
    {
        return Vec::new();
    }

    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(ANSWER_CUE))
        .filter_map(|line| {
            let line = strip_list_marker(line);
            let at = line.rfind(DELIMITER)?;
            let title = clean_title(&line[..at]);
            let author = line[at + DELIMITER.len()..].trim();
            (!title.is_empty() && !author.is_empty())
                .then(|| BookCandidate::new(title, author, Provenance::Probabilistic))
        })
        .collect()
}
