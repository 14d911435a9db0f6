//! Structural renderer for NCM tariff-chapter legal notes
//!
//! Turns one chapter's raw text (plus optional structured sections) into
//! annotated markup, and assembles many chapters into a single document with
//! per-chapter fault isolation.

pub mod clean;
pub mod config;
pub mod emphasis;
pub mod escape;
pub mod links;
pub mod notes;
pub mod patterns;
pub mod segments;
pub mod structure;
pub mod term_highlight;

use std::collections::HashMap;

use shared_types::{Chapter, RenderReport};
use thiserror::Error;
use tracing::{debug, error};

pub use config::RenderOptions;
pub use structure::anchor_id;

use term_highlight::TermHighlighter;

/// Errors that can occur while rendering a single chapter
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid chapter number: {0:?}")]
    InvalidChapterNumber(String),
}

/// NotesRenderer entry point
pub struct NotesRenderer {
    options: RenderOptions,
    exclusion: TermHighlighter,
    unit: TermHighlighter,
}

impl NotesRenderer {
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        let exclusion = TermHighlighter::new("highlight-exclusion", &options.exclusion_terms);
        let unit = TermHighlighter::new("highlight-unit", &options.unit_terms);
        Self {
            options,
            exclusion,
            unit,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Run the inline pipeline over one chunk of raw text.
    ///
    /// Escaping comes first; every later pass injects real tags into already
    /// escaped text. Headings that carry their own code pass
    /// `allow_smart_links = false` so a heading is never linked to itself.
    pub(crate) fn render_inline(&self, raw: &str, allow_smart_links: bool) -> String {
        let mut out = escape::escape_text(raw);
        out = emphasis::normalize_emphasis(&out);
        if self.options.note_links {
            out = links::inject_note_refs(&out);
        }
        if self.options.smart_links && allow_smart_links {
            out = links::inject_smart_links(&out);
        }
        out = self.exclusion.apply(&out);
        out = self.unit.apply(&out);
        out
    }

    /// Render one chapter into annotated markup.
    ///
    /// A chapter with nothing to render yields an empty string. An invalid
    /// chapter number is the one failure surfaced to the caller; it is only
    /// caught at the aggregation boundary.
    pub fn render_chapter(&self, chapter: &Chapter) -> Result<String, RenderError> {
        let number = chapter.number.trim();
        if !patterns::RX_CHAPTER_NUMBER.is_match(number) {
            return Err(RenderError::InvalidChapterNumber(chapter.number.clone()));
        }

        let sections = chapter.sections.as_ref().filter(|sections| !sections.is_empty());
        let legacy_notes = chapter
            .general_notes
            .as_deref()
            .filter(|notes| !notes.trim().is_empty());
        if chapter.raw_content.trim().is_empty() && sections.is_none() && legacy_notes.is_none() {
            return Ok(String::new());
        }

        let mut out = String::new();
        out.push_str(&format!(
            "<section class=\"chapter-block\" data-chapter=\"{number}\">\n"
        ));

        if let Some(sections) = sections {
            out.push_str(&notes::render_sections(self, number, sections));
        } else if let Some(legacy) = legacy_notes {
            out.push_str(&notes::render_legacy_notes(self, number, legacy));
        }

        let cleaned = clean::clean_content(&chapter.raw_content);
        if !cleaned.trim().is_empty() {
            out.push_str(&structure::render_body(self, number, &cleaned));
        }

        out.push_str("</section>\n");
        Ok(out)
    }

    /// Assemble a full document from a chapter-number → Chapter mapping.
    pub fn render_full_response(&self, chapters: &HashMap<String, Chapter>) -> String {
        self.render_full_response_with_report(chapters).0
    }

    /// Assemble the document and report how the pass went.
    ///
    /// Chapters are ordered by numeric value ascending. A chapter that fails
    /// to render is replaced by a visible inline error block and logged;
    /// its siblings are unaffected.
    pub fn render_full_response_with_report(
        &self,
        chapters: &HashMap<String, Chapter>,
    ) -> (String, RenderReport) {
        let mut order: Vec<&String> = chapters.keys().collect();
        order.sort_by(|a, b| match (chapter_value(a), chapter_value(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        });

        let mut out = String::new();
        let mut rendered = 0usize;
        let mut failed: Vec<String> = Vec::new();

        for key in order {
            let chapter = &chapters[key];
            if chapter_value(key).is_none() {
                error!(chapter = %key, "chapter key is not numeric");
                out.push_str(&error_block(key));
                failed.push(key.clone());
                continue;
            }
            match self.render_chapter(chapter) {
                Ok(markup) => {
                    rendered += 1;
                    out.push_str(&markup);
                }
                Err(err) => {
                    error!(chapter = %chapter.number, error = %err, "chapter failed to render");
                    out.push_str(&error_block(&chapter.number));
                    failed.push(chapter.number.clone());
                }
            }
        }

        debug!(rendered, failed = failed.len(), "assembled full document");
        (out, RenderReport::new(rendered, failed))
    }
}

impl Default for NotesRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn chapter_value(key: &str) -> Option<u32> {
    key.trim().parse::<u32>().ok()
}

/// Visible inline substitute for a chapter that failed to render
fn error_block(chapter_number: &str) -> String {
    let safe = escape::escape_text(chapter_number);
    format!(
        "<div class=\"render-error\" data-chapter=\"{safe}\"><strong>⚠</strong> Erro ao renderizar o Capítulo {safe}</div>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: &str, content: &str) -> Chapter {
        Chapter {
            number: number.to_string(),
            raw_content: content.to_string(),
            general_notes: None,
            sections: None,
        }
    }

    #[test]
    fn test_empty_chapter_renders_empty() {
        let renderer = NotesRenderer::new();
        let html = renderer.render_chapter(&chapter("84", "   ")).unwrap();
        assert_eq!(html, "");
    }

    #[test]
    fn test_chapter_is_wrapped_in_chapter_block() {
        let renderer = NotesRenderer::new();
        let html = renderer
            .render_chapter(&chapter("84", "Capítulo 84\n84.13 Bombas"))
            .unwrap();
        assert!(html.starts_with("<section class=\"chapter-block\" data-chapter=\"84\">"));
        assert!(html.trim_end().ends_with("</section>"));
    }

    #[test]
    fn test_invalid_chapter_number_is_an_error() {
        let renderer = NotesRenderer::new();
        let err = renderer
            .render_chapter(&chapter("XX", "Capítulo XX"))
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidChapterNumber(_)));
    }

    #[test]
    fn test_raw_text_is_escaped_before_injection() {
        let renderer = NotesRenderer::new();
        let html = renderer
            .render_chapter(&chapter("84", "texto com <script>alert(1)</script> e 38.01"))
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("data-ncm=\"3801\""));
    }

    #[test]
    fn test_chapter_ordering_is_numeric_not_lexicographic() {
        let renderer = NotesRenderer::new();
        let mut chapters = HashMap::new();
        chapters.insert("10".to_string(), chapter("10", "Capítulo 10"));
        chapters.insert("02".to_string(), chapter("02", "Capítulo 02"));

        let html = renderer.render_full_response(&chapters);
        let second = html.find("data-chapter=\"02\"").unwrap();
        let tenth = html.find("data-chapter=\"10\"").unwrap();
        assert!(second < tenth);
    }

    #[test]
    fn test_broken_chapter_is_isolated_from_siblings() {
        let renderer = NotesRenderer::new();
        let mut chapters = HashMap::new();
        chapters.insert("84".to_string(), chapter("84", "Capítulo 84\n84.13 Bombas"));
        chapters.insert("85".to_string(), chapter("XX", "Capítulo 85"));

        let (html, report) = renderer.render_full_response_with_report(&chapters);
        assert!(html.contains("id=\"pos-84-13\""));
        assert!(html.contains("class=\"render-error\""));
        assert!(html.contains("Erro ao renderizar o Capítulo XX"));
        assert_eq!(report.chapters_rendered, 1);
        assert_eq!(report.chapters_failed, 1);
        assert_eq!(report.failed_chapters, vec!["XX".to_string()]);
    }

    #[test]
    fn test_non_numeric_key_becomes_error_block() {
        let renderer = NotesRenderer::new();
        let mut chapters = HashMap::new();
        chapters.insert("abc".to_string(), chapter("84", "Capítulo 84"));

        let html = renderer.render_full_response(&chapters);
        assert!(html.contains("class=\"render-error\""));
        assert!(html.contains("data-chapter=\"abc\""));
    }

    #[test]
    fn test_structured_sections_take_precedence_over_legacy_notes() {
        let renderer = NotesRenderer::new();
        let mut full = chapter("84", "Capítulo 84");
        full.general_notes = Some("nota legada".to_string());
        full.sections = Some(shared_types::ChapterSections {
            notes: Some("nota estruturada".to_string()),
            ..Default::default()
        });

        let html = renderer.render_chapter(&full).unwrap();
        assert!(html.contains("nota estruturada"));
        assert!(!html.contains("nota legada"));
    }

    #[test]
    fn test_legacy_notes_render_when_no_sections() {
        let renderer = NotesRenderer::new();
        let mut legacy = chapter("84", "Capítulo 84");
        legacy.general_notes = Some("aplica-se a Nota 2".to_string());

        let html = renderer.render_chapter(&legacy).unwrap();
        assert!(html.contains("class=\"chapter-notes\""));
        assert!(html.contains("data-note=\"2\""));
    }
}
