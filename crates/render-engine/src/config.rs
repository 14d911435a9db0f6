//! Renderer configuration

use crate::patterns::{DEFAULT_EXCLUSION_TERMS, DEFAULT_UNIT_TERMS};

/// Tunable rendering behavior.
///
/// The defaults reproduce the production annotation set; callers with their
/// own settings layer can override the term lists or switch link injection
/// off entirely.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RenderOptions {
    /// Wrap classification-code references in smart links
    pub smart_links: bool,
    /// Wrap "Nota N do Capítulo C" references in note-ref elements
    pub note_links: bool,
    /// Phrases wrapped in `highlight-exclusion` spans
    pub exclusion_terms: Vec<String>,
    /// Tokens wrapped in `highlight-unit` spans
    pub unit_terms: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            smart_links: true,
            note_links: true,
            exclusion_terms: DEFAULT_EXCLUSION_TERMS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            unit_terms: DEFAULT_UNIT_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_both_link_passes() {
        let options = RenderOptions::default();
        assert!(options.smart_links);
        assert!(options.note_links);
        assert!(!options.exclusion_terms.is_empty());
        assert!(!options.unit_terms.is_empty());
    }
}
