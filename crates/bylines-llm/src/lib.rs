//! # Bylines LLM
//!
//! Chat-completions backend for the Bylines probabilistic fallback.
//!
//! Any OpenAI-compatible endpoint works; the base URL and model come from
//! [`OpenAiConfig`], which reads the usual `OPENAI_*` environment variables.
//!
//! ```no_run
//! use std::sync::Arc;
//! use bylines_core::BookExtractor;
//! use bylines_llm::{OpenAiConfig, openai_fallback};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fallback = openai_fallback(OpenAiConfig::from_env())?;
//! let extractor = BookExtractor::default()?.with_fallback(Arc::new(fallback));
//! # let _ = extractor;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod openai;

pub use config::OpenAiConfig;
pub use openai::{OpenAiBackend, openai_fallback};
