#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Chapter {
    pub number: String, // Two-digit NCM chapter code, e.g. "84"
    #[serde(default)]
    pub raw_content: String,
    #[serde(default)]
    pub general_notes: Option<String>, // Legacy free-text notes field
    #[serde(default)]
    pub sections: Option<ChapterSections>,
}

/// Structured chapter front-matter, replacing the legacy `general_notes` field
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ChapterSections {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub considerations: Option<String>,
    #[serde(default)]
    pub definitions: Option<String>,
}

impl ChapterSections {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.notes.is_none()
            && self.considerations.is_none()
            && self.definitions.is_none()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub code: String, // Dotted classification code, e.g. "8413.11.00"
    pub description: String,
    #[serde(default)]
    pub anchor_id: Option<String>,
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub rate: Option<String>,
}

/// How well the searched terms co-occur within the document hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    /// All distinct terms found together inside one subposition (or block)
    Alto,
    /// All terms present in a shared chapter, never the same subposition
    Pequeno,
    /// No meaningful co-occurrence, or fewer than 2 distinct terms
    Nenhum,
}

/// Hierarchy level at which the co-occurrence was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityScope {
    Subposition,
    Block,
}

/// Derived on every scan, never persisted
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityState {
    pub level: QualityLevel,
    pub co_occurrence_count: usize,
    pub scope: Option<QualityScope>,
}

impl QualityState {
    pub fn none() -> Self {
        Self {
            level: QualityLevel::Nenhum,
            co_occurrence_count: 0,
            scope: None,
        }
    }
}

impl Default for QualityState {
    fn default() -> Self {
        Self::none()
    }
}

/// Summary of a multi-chapter render pass
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RenderReport {
    pub chapters_rendered: usize,
    pub chapters_failed: usize,
    pub failed_chapters: Vec<String>, // Chapter numbers substituted with error blocks
    pub rendered_at: u64,
}

impl RenderReport {
    pub fn new(chapters_rendered: usize, failed_chapters: Vec<String>) -> Self {
        Self {
            chapters_rendered,
            chapters_failed: failed_chapters.len(),
            failed_chapters,
            rendered_at: chrono::Utc::now().timestamp() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quality_state_defaults_to_nenhum() {
        let state = QualityState::default();
        assert_eq!(state.level, QualityLevel::Nenhum);
        assert_eq!(state.co_occurrence_count, 0);
        assert_eq!(state.scope, None);
    }

    #[test]
    fn test_quality_level_serializes_snake_case() {
        let json = serde_json::to_string(&QualityLevel::Pequeno).unwrap();
        assert_eq!(json, "\"pequeno\"");
    }

    #[test]
    fn test_chapter_roundtrip() {
        let chapter = Chapter {
            number: "84".to_string(),
            raw_content: "Capítulo 84\n84.13 Bombas para líquidos".to_string(),
            general_notes: None,
            sections: Some(ChapterSections {
                title: Some("Reatores nucleares, caldeiras, máquinas".to_string()),
                notes: Some("1. O presente Capítulo não compreende...".to_string()),
                considerations: None,
                definitions: None,
            }),
        };

        let json = serde_json::to_string(&chapter).unwrap();
        let back: Chapter = serde_json::from_str(&json).unwrap();
        assert_eq!(back.number, "84");
        assert!(back.sections.unwrap().notes.is_some());
    }

    #[test]
    fn test_chapter_optional_fields_default() {
        let chapter: Chapter =
            serde_json::from_str(r#"{"number":"02","raw_content":"Capítulo 02"}"#).unwrap();
        assert!(chapter.general_notes.is_none());
        assert!(chapter.sections.is_none());
    }

    #[test]
    fn test_render_report_counts_failures() {
        let report = RenderReport::new(3, vec!["10".to_string()]);
        assert_eq!(report.chapters_failed, 1);
        assert!(report.rendered_at > 0);
    }
}
