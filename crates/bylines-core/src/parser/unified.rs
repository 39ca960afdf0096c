//! # Hybrid Extractor
//!
//! Composes the pipeline into a single entry point:
//! locate section → segment deterministically → validate → conditionally
//! escalate to the fallback parser → return books plus the method used.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::{BylinesError, Result};
use crate::parser::cleaner::clean_title;
use crate::parser::fallback::FallbackParser;
use crate::parser::locator::{RecommendationSection, SectionLocator, SectionLookup};
use crate::parser::segmenter::{Segmenter, normalize_whitespace};
use crate::parser::validator::{Validator, Verdict};
use crate::types::{BookCandidate, Episode, EpisodeExtraction, ExtractionResult, Provenance};

/// Configuration for the extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Longest title or author (in characters) accepted from the segmenter.
    pub max_field_chars: usize,
    /// Deterministic results with fewer books than this are escalated.
    /// This trades a fallback call for precision on every short episode;
    /// 0 turns it off.
    pub min_book_count: usize,
    /// Upper bound on a single fallback call.
    pub fallback_timeout: Duration,
    /// Whether the fallback parser may be called at all.
    pub enable_fallback: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_field_chars: 300,
            min_book_count: 5,
            fallback_timeout: Duration::from_secs(30),
            enable_fallback: true,
        }
    }
}

impl ExtractorConfig {
    /// Create a new extractor configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the oversized-field threshold.
    pub fn with_max_field_chars(mut self, chars: usize) -> Self {
        self.max_field_chars = chars;
        self
    }

    /// Set the minimum book count below which results are escalated.
    pub fn with_min_book_count(mut self, count: usize) -> Self {
        self.min_book_count = count;
        self
    }

    /// Set the fallback call timeout.
    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = timeout;
        self
    }

    /// Enable or disable the fallback parser.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.enable_fallback = enabled;
        self
    }
}

/// Hybrid book-recommendation extractor.
///
/// Holds no per-call state: one instance can serve many concurrent
/// extractions.
pub struct BookExtractor {
    config: ExtractorConfig,
    locator: SectionLocator,
    segmenter: Segmenter,
    validator: Validator,
    fallback: Option<Arc<dyn FallbackParser>>,
}

impl BookExtractor {
    /// Create a new extractor with the given configuration and no fallback parser.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(Self {
            locator: SectionLocator::new()?,
            segmenter: Segmenter::new(),
            validator: Validator::new(config.max_field_chars, config.min_book_count),
            config,
            fallback: None,
        })
    }

    /// Create a new extractor with default configuration.
    pub fn default() -> Result<Self> {
        Self::new(ExtractorConfig::default())
    }

    /// Attach the fallback parser used on escalation and ambiguous headers.
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackParser>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Check if a fallback parser is attached and enabled.
    pub fn has_fallback(&self) -> bool {
        self.config.enable_fallback && self.fallback.is_some()
    }

    /// Get the extractor configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts book recommendations from a raw episode description.
    ///
    /// Never fails: a missing section yields method `none`, and fallback
    /// errors degrade to whatever the deterministic path produced.
    ///
    /// # Examples
    /// ```
    /// use bylines_core::{BookExtractor, ExtractionMethod};
    ///
    /// # tokio_test_block(async {
    /// let extractor = BookExtractor::default().unwrap();
    /// let result = extractor
    ///     .extract("Book Recommendations: Sapiens by Yuval Noah Harari Educated by Tara Westover")
    ///     .await;
    ///
    /// assert_eq!(result.method, ExtractionMethod::Deterministic);
    /// assert_eq!(result.books[1].author, "Tara Westover");
    /// # });
    /// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
    /// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
    /// # }
    /// ```
    pub async fn extract(&self, raw: &str) -> ExtractionResult {
        match self.locator.locate(raw) {
            SectionLookup::NotFound => ExtractionResult::none(),
            SectionLookup::Ambiguous { header, context } => {
                info!(header, "header does not anchor to books, using fallback parser only");
                let books = self.run_fallback(context).await;
                if books.is_empty() {
                    ExtractionResult::none()
                } else {
                    ExtractionResult::probabilistic(books)
                }
            }
            SectionLookup::Found(section) => self.extract_section(&section).await,
        }
    }

    /// Extracts one episode.
    pub async fn extract_episode(&self, episode: &Episode) -> EpisodeExtraction {
        let result = self.extract(&episode.description).await;
        info!(
            episode = %episode.id,
            books = result.len(),
            method = %result.method,
            "extracted episode"
        );
        EpisodeExtraction {
            episode_id: episode.id.clone(),
            result,
        }
    }

    /// Extracts a batch of episodes concurrently. Output order matches input order.
    pub async fn extract_episodes(&self, episodes: &[Episode]) -> Vec<EpisodeExtraction> {
        join_all(episodes.iter().map(|episode| self.extract_episode(episode))).await
    }

    async fn extract_section(&self, section: &RecommendationSection<'_>) -> ExtractionResult {
        let normalized = normalize_whitespace(section.text);
        let books = self.segmenter.segment(&normalized);
        debug!(count = books.len(), header = section.header, "deterministic pass");

        let reason = match self.validator.assess(&books) {
            Verdict::Accept => return ExtractionResult::deterministic(books),
            Verdict::Escalate(reason) => reason,
        };

        info!(%reason, candidates = books.len(), "escalating to fallback parser");
        let fallback_books = self.run_fallback(section.text).await;
        if fallback_books.is_empty() {
            debug!("fallback found nothing, keeping deterministic result");
            ExtractionResult::deterministic(books)
        } else {
            ExtractionResult::probabilistic(fallback_books)
        }
    }

    /// Runs the fallback under the configured timeout. Every failure
    /// degrades to an empty list.
    async fn run_fallback(&self, text: &str) -> Vec<BookCandidate> {
        let fallback = match &self.fallback {
            Some(fallback) if self.config.enable_fallback => fallback,
            _ => {
                debug!("no fallback parser available");
                return Vec::new();
            }
        };

        let timeout = self.config.fallback_timeout;
        let outcome = tokio::time::timeout(timeout, fallback.parse(text))
            .await
            .unwrap_or(Err(BylinesError::FallbackTimeout(timeout)));

        match outcome {
            Ok(books) => books
                .into_iter()
                .filter_map(|book| {
                    let title = clean_title(&book.title);
                    let author = book.author.trim();
                    (!title.is_empty() && !author.is_empty()).then(|| BookCandidate {
                        title,
                        author: author.to_string(),
                        provenance: Provenance::Probabilistic,
                        confidence: book.confidence,
                    })
                })
                .collect(),
            Err(err) => {
                warn!(fallback = fallback.name(), error = %err, "fallback parser failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::types::ExtractionMethod;

    enum Behaviour {
        Books(Vec<(&'static str, &'static str)>),
        Fail,
        Hang,
    }

    struct StubFallback {
        behaviour: Behaviour,
        calls: AtomicUsize,
        last_text: std::sync::Mutex<Option<String>>,
    }

    impl StubFallback {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                calls: AtomicUsize::new(0),
                last_text: std::sync::Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FallbackParser for StubFallback {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn parse(&self, text: &str) -> Result<Vec<BookCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_text.lock().unwrap() = Some(text.to_string());
            match &self.behaviour {
                Behaviour::Books(books) => Ok(books
                    .iter()
                    .map(|(t, a)| BookCandidate::new(*t, *a, Provenance::Probabilistic))
                    .collect()),
                Behaviour::Fail => Err(BylinesError::FallbackUnavailable("no API key".into())),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    const FIVE_BOOKS: &str = "Book Recommendations: Sapiens by Yuval Noah HarariEducated by Tara \
        WestoverEvicted by Matthew DesmondBorn a Crime by Trevor NoahBeloved by Toni Morrison \
        Thoughts? Guest suggestions? Email us at show@example.com.";

    fn extractor(fallback: Arc<StubFallback>) -> BookExtractor {
        BookExtractor::default().unwrap().with_fallback(fallback)
    }

    fn llm_books() -> Behaviour {
        Behaviour::Books(vec![("Evicted", "Matthew Desmond"), ("- \"Beloved\"", " Toni Morrison ")])
    }

    #[test]
    fn test_extractor_config() {
        let config = ExtractorConfig::new()
            .with_max_field_chars(120)
            .with_min_book_count(3)
            .with_fallback_timeout(Duration::from_secs(5))
            .with_fallback(false);

        assert_eq!(config.max_field_chars, 120);
        assert_eq!(config.min_book_count, 3);
        assert_eq!(config.fallback_timeout, Duration::from_secs(5));
        assert!(!config.enable_fallback);
    }

    #[test]
    fn test_has_fallback() {
        let stub = StubFallback::new(llm_books());
        assert!(!BookExtractor::default().unwrap().has_fallback());
        assert!(extractor(stub.clone()).has_fallback());

        let disabled = BookExtractor::new(ExtractorConfig::new().with_fallback(false))
            .unwrap()
            .with_fallback(stub);
        assert!(!disabled.has_fallback());
    }

    #[tokio::test]
    async fn no_header_yields_none() {
        let stub = StubFallback::new(llm_books());
        let result = extractor(stub.clone())
            .extract("An interview about zoning reform.")
            .await;

        assert_eq!(result, ExtractionResult::none());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn well_formed_section_stays_deterministic() {
        let stub = StubFallback::new(llm_books());
        let result = extractor(stub.clone()).extract(FIVE_BOOKS).await;

        assert_eq!(result.method, ExtractionMethod::Deterministic);
        assert_eq!(result.len(), 5);
        assert_eq!(result.books[1].title, "Educated");
        assert_eq!(result.books[1].author, "Tara Westover");
        assert_eq!(result.books[4].author, "Toni Morrison");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn short_result_escalates_and_fallback_replaces_it() {
        let stub = StubFallback::new(llm_books());
        let raw = "Book Recommendations: Sapiens by Yuval Noah Harari Educated by Tara Westover";
        let result = extractor(stub.clone()).extract(raw).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.method, ExtractionMethod::Probabilistic);
        assert_eq!(
            result.pairs(),
            vec![
                ("Evicted".to_string(), "Matthew Desmond".to_string()),
                ("Beloved".to_string(), "Toni Morrison".to_string()),
            ]
        );
        assert!(result.books.iter().all(|b| b.provenance == Provenance::Probabilistic));
        assert_eq!(
            stub.last_text.lock().unwrap().as_deref(),
            Some("Sapiens by Yuval Noah Harari Educated by Tara Westover")
        );
    }

    #[tokio::test]
    async fn empty_fallback_keeps_deterministic_result() {
        let stub = StubFallback::new(Behaviour::Books(vec![]));
        let raw = "Book Recommendations: Sapiens by Yuval Noah Harari";
        let result = extractor(stub.clone()).extract(raw).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.method, ExtractionMethod::Deterministic);
        assert_eq!(result.pairs(), vec![("Sapiens".into(), "Yuval Noah Harari".into())]);
    }

    #[tokio::test]
    async fn oversized_field_escalates() {
        let stub = StubFallback::new(llm_books());
        let long_author = format!("Yuval {}", "x".repeat(320));
        let raw = format!(
            "Book Recommendations: Sapiens by {long_author}Educated by Tara WestoverEvicted by \
             Matthew DesmondBorn a Crime by Trevor NoahBeloved by Toni Morrison"
        );
        let ex = BookExtractor::new(ExtractorConfig::new().with_min_book_count(0))
            .unwrap()
            .with_fallback(stub.clone());
        let result = ex.extract(&raw).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.method, ExtractionMethod::Probabilistic);
    }

    #[tokio::test]
    async fn embedded_delimiter_escalates() {
        let stub = StubFallback::new(llm_books());
        let ex = BookExtractor::new(ExtractorConfig::new().with_min_book_count(0))
            .unwrap()
            .with_fallback(stub.clone());
        let result = ex
            .extract("Book Recommendations: Standing by the River by Jane Doe")
            .await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.method, ExtractionMethod::Probabilistic);
    }

    #[tokio::test]
    async fn no_candidates_escalates_and_empty_fallback_is_deterministic_empty() {
        let stub = StubFallback::new(Behaviour::Books(vec![]));
        let result = extractor(stub.clone())
            .extract("Book Recommendations: nothing formatted here")
            .await;

        assert_eq!(stub.calls(), 1);
        assert!(result.is_empty());
        assert_eq!(result.method, ExtractionMethod::Deterministic);
    }

    #[tokio::test]
    async fn ambiguous_header_goes_straight_to_fallback() {
        let stub = StubFallback::new(llm_books());
        let raw = "Great talk. Podcast Recommendations: The Daily by The New York Times \
                   Email us at show@example.com";
        let result = extractor(stub.clone()).extract(raw).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.method, ExtractionMethod::Probabilistic);
        let seen = stub.last_text.lock().unwrap().clone().unwrap();
        assert!(seen.starts_with("Great talk."));
        assert!(!seen.contains("Email us at"));
    }

    #[tokio::test]
    async fn ambiguous_header_without_fallback_is_none() {
        let raw = "Great talk. Podcast Recommendations: The Daily by The New York Times";
        let result = BookExtractor::default().unwrap().extract(raw).await;
        assert_eq!(result, ExtractionResult::none());
    }

    #[tokio::test]
    async fn failing_fallback_degrades() {
        let stub = StubFallback::new(Behaviour::Fail);
        let raw = "Book Recommendations: Sapiens by Yuval Noah Harari";
        let result = extractor(stub.clone()).extract(raw).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.method, ExtractionMethod::Deterministic);
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn hanging_fallback_times_out() {
        let stub = StubFallback::new(Behaviour::Hang);
        let ex = BookExtractor::new(
            ExtractorConfig::new().with_fallback_timeout(Duration::from_millis(50)),
        )
        .unwrap()
        .with_fallback(stub.clone());
        let result = ex.extract("Book Recommendations: Sapiens by Yuval Noah Harari").await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(result.method, ExtractionMethod::Deterministic);
        assert_eq!(result.books[0].title, "Sapiens");
    }

    #[tokio::test]
    async fn disabled_fallback_is_never_called() {
        let stub = StubFallback::new(llm_books());
        let ex = BookExtractor::new(ExtractorConfig::new().with_fallback(false))
            .unwrap()
            .with_fallback(stub.clone());
        let result = ex.extract("Book Recommendations: Sapiens by Yuval Noah Harari").await;

        assert_eq!(stub.calls(), 0);
        assert_eq!(result.method, ExtractionMethod::Deterministic);
    }

    #[tokio::test]
    async fn never_panics_on_hostile_input() {
        let stub = StubFallback::new(Behaviour::Fail);
        let ex = extractor(stub);

        let noise: String = (0u32..4096)
            .filter_map(|i| char::from_u32((i * 7919) % 0x2FFF))
            .collect();
        let long = "Book Recommendations: ".to_string() + &"A by B ".repeat(20_000);
        let inputs = [
            String::new(),
            "   ".to_string(),
            "\0\u{1}\u{7f}".to_string(),
            noise.clone(),
            format!("Recommendations:{noise}"),
            format!("book recommendations {noise} by {noise}"),
            long,
            "Book Recommendations: by by by by".to_string(),
            "Recommendations".to_string(),
        ];

        for input in &inputs {
            let result = ex.extract(input).await;
            assert!(result.books.iter().all(BookCandidate::is_complete));
            if result.method == ExtractionMethod::None {
                assert!(result.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn batch_extraction_preserves_order() {
        let ex = BookExtractor::default().unwrap();
        let episodes = vec![
            Episode::new("first", FIVE_BOOKS),
            Episode::new("second", "No recommendations today, sorry."),
            Episode::new("third", "Book Recommendations: Sapiens by Yuval Noah Harari"),
        ];

        let extractions = ex.extract_episodes(&episodes).await;
        let ids: Vec<_> = extractions.iter().map(|e| e.episode_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        assert_eq!(extractions[0].result.len(), 5);
        assert_eq!(extractions[2].result.method, ExtractionMethod::Deterministic);
    }
}
