//! Structural detection: headings, anchors and list grouping
//!
//! Heading detection is tiered, most specific shape first, the same way the
//! structural patterns are ordered in `patterns.rs`. Every detected heading
//! receives a generated anchor id; anchor derivation is idempotent so a
//! second pass over already-rendered output cannot double the ids.

use crate::patterns::{
    section_anchor_kind, RX_ANCHOR_SHAPED, RX_CHAPTER_HEADING, RX_LIST_BULLET, RX_LIST_ORDERED,
    RX_POSITION_HEADING, RX_SECTION_HEADING, RX_SUBPOSITION_DOTTED, RX_SUBPOSITION_FULL,
    RX_SUBPOSITION_SHORT,
};
use crate::NotesRenderer;

/// Derive the anchor id for a classification code.
///
/// `"84.13"` becomes `"pos-84-13"`; an input already shaped like an anchor
/// is returned unchanged. Characters other than digits, dots and dashes are
/// stripped before the dash substitution.
pub fn anchor_id(code: &str) -> String {
    let trimmed = code.trim();
    if RX_ANCHOR_SHAPED.is_match(trimmed) {
        return trimmed.to_string();
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let dashed = cleaned.replace('.', "-");
    format!("pos-{}", dashed.trim_matches('-'))
}

/// Anchor id for a chapter section block, e.g. `chapter-84-notas`
pub fn section_anchor(chapter_number: &str, kind: &str) -> String {
    format!("chapter-{chapter_number}-{kind}")
}

fn digits_of(code: &str) -> String {
    code.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Structural classification of one cleaned line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Blank,
    Chapter { number: String, line: &'a str },
    Subposition { code: String, line: &'a str },
    Position { code: String, line: &'a str },
    Section { label: String, line: &'a str },
    OrderedItem { line: &'a str },
    BulletItem { text: String },
    Text { line: &'a str },
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(caps) = RX_CHAPTER_HEADING.captures(trimmed) {
        return LineKind::Chapter {
            number: caps[1].to_string(),
            line: trimmed,
        };
    }
    for subposition in [
        &*RX_SUBPOSITION_FULL,
        &*RX_SUBPOSITION_DOTTED,
        &*RX_SUBPOSITION_SHORT,
    ] {
        if let Some(caps) = subposition.captures(trimmed) {
            return LineKind::Subposition {
                code: caps[1].to_string(),
                line: trimmed,
            };
        }
    }
    if let Some(caps) = RX_POSITION_HEADING.captures(trimmed) {
        return LineKind::Position {
            code: caps[1].to_string(),
            line: trimmed,
        };
    }
    if let Some(caps) = RX_SECTION_HEADING.captures(trimmed) {
        return LineKind::Section {
            label: caps[1].to_string(),
            line: trimmed,
        };
    }
    if RX_LIST_ORDERED.is_match(trimmed) {
        return LineKind::OrderedItem { line: trimmed };
    }
    if let Some(caps) = RX_LIST_BULLET.captures(trimmed) {
        return LineKind::BulletItem {
            text: caps[1].to_string(),
        };
    }
    LineKind::Text { line: trimmed }
}

/// Render cleaned chapter text into headed, listed, paragraphed markup.
pub fn render_body(renderer: &NotesRenderer, chapter_number: &str, text: &str) -> String {
    render_lines(renderer, Some(chapter_number), text)
}

/// Render free-flowing note text: paragraphs and lists only, heading-shaped
/// lines treated as plain text.
pub fn render_flow(renderer: &NotesRenderer, text: &str) -> String {
    render_lines(renderer, None, text)
}

fn render_lines(renderer: &NotesRenderer, chapter_number: Option<&str>, text: &str) -> String {
    let mut out = String::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut ordered: Vec<String> = Vec::new();
    let mut bullets: Vec<String> = Vec::new();

    for line in text.lines() {
        let mut kind = classify_line(line);
        if chapter_number.is_none() {
            kind = demote_headings(kind);
        }
        match kind {
            LineKind::Blank => {
                flush_lists(renderer, &mut out, &mut ordered, &mut bullets);
                flush_paragraph(renderer, &mut out, &mut paragraph);
            }
            LineKind::Chapter { number, line } => {
                flush_all(renderer, &mut out, &mut paragraph, &mut ordered, &mut bullets);
                out.push_str(&format!(
                    "<h2 class=\"chapter-heading\" id=\"chapter-{number}\">{}</h2>\n",
                    renderer.render_inline(line, true)
                ));
            }
            LineKind::Subposition { code, line } => {
                flush_all(renderer, &mut out, &mut paragraph, &mut ordered, &mut bullets);
                out.push_str(&format!(
                    "<h5 class=\"subposition-heading\" id=\"{}\" data-ncm=\"{}\">{}</h5>\n",
                    anchor_id(&code),
                    digits_of(&code),
                    renderer.render_inline(line, false)
                ));
            }
            LineKind::Position { code, line } => {
                flush_all(renderer, &mut out, &mut paragraph, &mut ordered, &mut bullets);
                out.push_str(&format!(
                    "<h4 class=\"position-heading\" id=\"{}\" data-ncm=\"{}\">{}</h4>\n",
                    anchor_id(&code),
                    digits_of(&code),
                    renderer.render_inline(line, false)
                ));
            }
            LineKind::Section { label, line } => {
                flush_all(renderer, &mut out, &mut paragraph, &mut ordered, &mut bullets);
                let id_attr = chapter_number
                    .and_then(|number| {
                        section_anchor_kind(&label)
                            .map(|kind| format!(" id=\"{}\"", section_anchor(number, kind)))
                    })
                    .unwrap_or_default();
                out.push_str(&format!(
                    "<h3 class=\"section-heading\"{id_attr}>{}</h3>\n",
                    renderer.render_inline(line, true)
                ));
            }
            LineKind::OrderedItem { line } => {
                flush_paragraph(renderer, &mut out, &mut paragraph);
                flush_bullets(renderer, &mut out, &mut bullets);
                ordered.push(line.to_string());
            }
            LineKind::BulletItem { text } => {
                flush_paragraph(renderer, &mut out, &mut paragraph);
                flush_ordered(renderer, &mut out, &mut ordered);
                bullets.push(text);
            }
            LineKind::Text { line } => {
                flush_lists(renderer, &mut out, &mut ordered, &mut bullets);
                paragraph.push(line.to_string());
            }
        }
    }
    flush_all(renderer, &mut out, &mut paragraph, &mut ordered, &mut bullets);
    out
}

fn demote_headings(kind: LineKind<'_>) -> LineKind<'_> {
    match kind {
        LineKind::Chapter { line, .. }
        | LineKind::Subposition { line, .. }
        | LineKind::Position { line, .. }
        | LineKind::Section { line, .. } => LineKind::Text { line },
        other => other,
    }
}

fn flush_paragraph(renderer: &NotesRenderer, out: &mut String, buf: &mut Vec<String>) {
    if buf.is_empty() {
        return;
    }
    let text = buf.join(" ");
    buf.clear();
    out.push_str(&format!("<p>{}</p>\n", renderer.render_inline(&text, true)));
}

fn flush_ordered(renderer: &NotesRenderer, out: &mut String, buf: &mut Vec<String>) {
    if buf.is_empty() {
        return;
    }
    out.push_str("<ol class=\"legal-list legal-list-ordered\">\n");
    for item in buf.drain(..) {
        out.push_str(&format!("<li>{}</li>\n", renderer.render_inline(&item, true)));
    }
    out.push_str("</ol>\n");
}

fn flush_bullets(renderer: &NotesRenderer, out: &mut String, buf: &mut Vec<String>) {
    if buf.is_empty() {
        return;
    }
    out.push_str("<ul class=\"legal-list legal-list-bullet\">\n");
    for item in buf.drain(..) {
        out.push_str(&format!("<li>{}</li>\n", renderer.render_inline(&item, true)));
    }
    out.push_str("</ul>\n");
}

fn flush_lists(
    renderer: &NotesRenderer,
    out: &mut String,
    ordered: &mut Vec<String>,
    bullets: &mut Vec<String>,
) {
    flush_ordered(renderer, out, ordered);
    flush_bullets(renderer, out, bullets);
}

fn flush_all(
    renderer: &NotesRenderer,
    out: &mut String,
    paragraph: &mut Vec<String>,
    ordered: &mut Vec<String>,
    bullets: &mut Vec<String>,
) {
    flush_lists(renderer, out, ordered, bullets);
    flush_paragraph(renderer, out, paragraph);
}
