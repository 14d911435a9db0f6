//! Renderer output driven through the highlighter end to end

use highlight_engine::{Highlighter, QualityLevel, QualityScope, ScanState};
use render_engine::NotesRenderer;
use shared_types::Chapter;
use std::collections::HashMap;

fn rendered_document() -> String {
    let renderer = NotesRenderer::new();
    let mut chapters = HashMap::new();
    chapters.insert(
        "84".to_string(),
        Chapter {
            number: "84".to_string(),
            raw_content: "Capítulo 84 — Máquinas\n\
84.13 Bombas para líquidos\n\
bombas centrífugas de aço inoxidável\n\
84.14 Compressores de ar\n\
compressores e ventiladores"
                .to_string(),
            general_notes: None,
            sections: None,
        },
    );
    chapters.insert(
        "85".to_string(),
        Chapter {
            number: "85".to_string(),
            raw_content: "Capítulo 85 — Materiais elétricos\n85.17 Aparelhos telefônicos"
                .to_string(),
            general_notes: None,
            sections: None,
        },
    );
    renderer.render_full_response(&chapters)
}

#[test]
fn rendered_markup_survives_a_scan_and_restore_cycle() {
    let markup = rendered_document();
    let mut hl = Highlighter::with_content(&markup);
    let base = hl.markup();

    hl.set_query("bombas centrífugas");
    assert_eq!(hl.state(), ScanState::Annotated);
    assert!(hl.total_match_count() >= 2);

    hl.teardown();
    assert_eq!(hl.markup(), base);
}

#[test]
fn accented_document_text_matches_stripped_query_terms() {
    let mut hl = Highlighter::with_content(&rendered_document());
    hl.set_query("aco centrifugas");

    assert_eq!(hl.matches_for("aco").len(), 1);
    assert_eq!(hl.matches_for("centrifugas").len(), 1);
    assert_eq!(hl.quality().level, QualityLevel::Alto);
    assert_eq!(hl.quality().scope, Some(QualityScope::Subposition));
}

#[test]
fn terms_in_different_positions_score_pequeno() {
    let mut hl = Highlighter::with_content(&rendered_document());
    hl.set_query("bombas ventiladores");

    assert_eq!(hl.quality().level, QualityLevel::Pequeno);
}

#[test]
fn renderer_anchors_drive_subposition_resolution() {
    let markup = rendered_document();
    assert!(markup.contains("id=\"pos-84-13\""));
    assert!(markup.contains("id=\"pos-84-14\""));

    let mut hl = Highlighter::with_content(&markup);
    hl.set_query("compressores ventiladores");
    let quality = hl.quality();
    assert_eq!(quality.level, QualityLevel::Alto);
    assert_eq!(quality.co_occurrence_count, 1);
}

#[test]
fn navigation_walks_markers_inside_rendered_markup() {
    let mut hl = Highlighter::with_content(&rendered_document());
    hl.set_query("bombas compressores");

    let count = hl.matches_for("bombas").len();
    assert!(count >= 2);
    let origin = hl.active_marker().unwrap();
    for _ in 0..count {
        hl.next();
    }
    assert_eq!(hl.active_marker().unwrap(), origin);
}

#[test]
fn smart_links_are_untouched_by_highlighting() {
    let renderer = NotesRenderer::new();
    let chapter = Chapter {
        number: "84".to_string(),
        raw_content: "Capítulo 84\nver a posição 84.14 para bombas".to_string(),
        general_notes: None,
        sections: None,
    };
    let markup = renderer.render_chapter(&chapter).unwrap();
    assert!(markup.contains("data-ncm=\"8414\""));

    let mut hl = Highlighter::with_content(&markup);
    hl.set_query("bombas posição");
    let highlighted = hl.markup();
    assert!(highlighted.contains(r##"<a href="#" class="smart-link" data-ncm="8414">"##));
    assert!(highlighted.contains("data-sh-term=\"bombas\""));
}
