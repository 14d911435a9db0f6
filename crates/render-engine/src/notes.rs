//! Chapter front-matter: structured section blocks and the legacy notes block

use shared_types::ChapterSections;

use crate::structure::{render_flow, section_anchor};
use crate::NotesRenderer;

/// Fixed emission order for structured sections
const SECTION_ORDER: &[(&str, &str)] = &[
    ("titulo", "Título"),
    ("notas", "Notas"),
    ("consideracoes", "Considerações Gerais"),
    ("definicoes", "Definições"),
];

/// Emit one anchored block per populated structured section.
pub fn render_sections(
    renderer: &NotesRenderer,
    chapter_number: &str,
    sections: &ChapterSections,
) -> String {
    let mut out = String::new();
    for (kind, label) in SECTION_ORDER {
        let body = match *kind {
            "titulo" => sections.title.as_deref(),
            "notas" => sections.notes.as_deref(),
            "consideracoes" => sections.considerations.as_deref(),
            "definicoes" => sections.definitions.as_deref(),
            _ => None,
        };
        let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
            continue;
        };
        out.push_str(&format!(
            "<div class=\"chapter-section chapter-section-{kind}\" id=\"{}\">\n",
            section_anchor(chapter_number, kind)
        ));
        out.push_str(&format!("<h3 class=\"section-heading\">{label}</h3>\n"));
        out.push_str(&render_flow(renderer, body));
        out.push_str("</div>\n");
    }
    out
}

/// Emit the single anchored block for the legacy free-text notes field.
pub fn render_legacy_notes(renderer: &NotesRenderer, chapter_number: &str, notes: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<div class=\"chapter-notes\" id=\"{}\">\n",
        section_anchor(chapter_number, "notas")
    ));
    out.push_str("<h3 class=\"section-heading\">Notas</h3>\n");
    out.push_str(&render_flow(renderer, notes));
    out.push_str("</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> NotesRenderer {
        NotesRenderer::new()
    }

    fn sections() -> ChapterSections {
        ChapterSections {
            title: Some("Máquinas e aparelhos".to_string()),
            notes: Some("1. O presente Capítulo não compreende as mós.".to_string()),
            considerations: None,
            definitions: Some("Bomba: aparelho para elevar líquidos.".to_string()),
        }
    }

    #[test]
    fn test_emits_populated_sections_in_fixed_order() {
        let html = render_sections(&renderer(), "84", &sections());
        let titulo = html.find("chapter-84-titulo").unwrap();
        let notas = html.find("chapter-84-notas").unwrap();
        let definicoes = html.find("chapter-84-definicoes").unwrap();
        assert!(titulo < notas && notas < definicoes);
        assert!(!html.contains("chapter-84-consideracoes"));
    }

    #[test]
    fn test_section_bodies_receive_inline_annotation() {
        let html = render_sections(&renderer(), "84", &sections());
        assert!(html.contains("highlight-exclusion"));
    }

    #[test]
    fn test_legacy_notes_block_is_anchored() {
        let html = render_legacy_notes(&renderer(), "84", "Nota 1 do Capítulo 84 aplica-se.");
        assert!(html.contains("id=\"chapter-84-notas\""));
        assert!(html.contains("data-note=\"1\""));
    }
}
