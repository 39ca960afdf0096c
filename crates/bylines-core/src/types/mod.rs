pub mod book;
pub mod episode;
pub mod result;

pub use book::{BookCandidate, Provenance};
pub use episode::{Episode, EpisodeExtraction};
pub use result::{ExtractionMethod, ExtractionResult};
