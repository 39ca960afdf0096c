pub mod cleaner;
pub mod fallback;
pub mod locator;
pub mod segmenter;
pub mod unified;
pub mod validator;

pub use cleaner::clean_title;
pub use fallback::{CompletionBackend, FallbackParser, Prompt, PromptFallback, parse_completion};
pub use locator::{RecommendationSection, SectionLocator, SectionLookup};
pub use segmenter::{Segmenter, find_delimiter, normalize_whitespace};
pub use unified::{BookExtractor, ExtractorConfig};
pub use validator::{EscalationReason, Validator, Verdict};
