use serde::{Deserialize, Serialize};

use super::result::ExtractionResult;

/// An episode handed over by the episode source: an identifier plus its raw description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub description: String,
}

impl Episode {
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// The extraction outcome for one episode, ready for the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeExtraction {
    pub episode_id: String,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionMethod;

    #[test]
    fn episode_deserializes_from_json_line() {
        let line = r#"{"id":"4rOoJ6Egrf8K2IrywzwOMk","description":"Book Recommendations: Sapiens by Yuval Noah Harari"}"#;
        let episode: Episode = serde_json::from_str(line).unwrap();
        assert_eq!(episode.id, "4rOoJ6Egrf8K2IrywzwOMk");
        assert!(episode.description.starts_with("Book Recommendations"));
    }

    #[test]
    fn extraction_flattens_result_fields() {
        let extraction = EpisodeExtraction {
            episode_id: "ep-1".into(),
            result: ExtractionResult::none(),
        };
        let value = serde_json::to_value(&extraction).unwrap();
        assert_eq!(value["episode_id"], "ep-1");
        assert_eq!(value["method"], "none");
        assert!(value["books"].as_array().unwrap().is_empty());
        assert_eq!(extraction.result.method, ExtractionMethod::None);
    }
}
