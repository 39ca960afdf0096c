//! # Bylines
//!
//! Extracts (title, author) book recommendations from podcast episode
//! descriptions. A deterministic segmenter handles the common
//! `Title by Author` layout; anything it cannot trust is escalated to a
//! prompt-driven LLM fallback.
//!
//! This crate re-exports [`bylines_core`] (parsing pipeline) and
//! [`bylines_llm`] (OpenAI-compatible backend).

pub use bylines_core::*;

/// OpenAI-compatible completion backend.
pub mod llm {
    pub use bylines_llm::*;
}
