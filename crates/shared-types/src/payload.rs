//! Parsing of the chapter payload delivered by the data-fetch collaborator

use std::collections::HashMap;

use thiserror::Error;

use crate::types::Chapter;

/// Errors raised while decoding a chapter payload
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("invalid chapter payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decode a chapter-number → Chapter mapping from its JSON wire form.
///
/// The payload shape is owned by the fetch layer; this core only needs the
/// mapping itself. Chapter ordering is NOT meaningful here — the renderer
/// sorts numerically before assembling the document.
pub fn chapters_from_json(json: &str) -> Result<HashMap<String, Chapter>, PayloadError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_chapter_mapping() {
        let json = r#"{
            "84": {"number": "84", "raw_content": "Capítulo 84\nNotas."},
            "02": {"number": "02", "raw_content": "Capítulo 02"}
        }"#;

        let chapters = chapters_from_json(json).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters["84"].number, "84");
    }

    #[test]
    fn test_rejects_malformed_payload() {
        let err = chapters_from_json("{not json").unwrap_err();
        assert!(matches!(err, PayloadError::Decode(_)));
    }

    #[test]
    fn test_tolerates_missing_optional_fields() {
        let json = r#"{"28": {"number": "28", "raw_content": ""}}"#;
        let chapters = chapters_from_json(json).unwrap();
        assert!(chapters["28"].sections.is_none());
    }
}
