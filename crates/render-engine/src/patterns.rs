//! Regex tables and term lists for structural parsing and inline annotation
//!
//! Patterns are grouped by purpose (cleanup, structural, list, inline) so each
//! group can be unit-tested against match/no-match pairs in isolation.

use lazy_static::lazy_static;
use regex::Regex;

/// Exclusion phrasing that legal notes use to carve items out of a chapter
pub const DEFAULT_EXCLUSION_TERMS: &[&str] = &[
    "exceto",
    "excluem-se",
    "excluídos",
    "não compreende",
    "não abrange",
    "não se classificam",
    "salvo",
];

/// Measurement-unit tokens highlighted inside legal notes
pub const DEFAULT_UNIT_TERMS: &[&str] = &[
    "kg", "mg", "cm", "mm", "m²", "m³", "litro", "litros", "kW", "°C", "vol", "%",
];

lazy_static! {
    // ========================================================================
    // Cleanup patterns
    // ========================================================================

    /// Page markers left over from the official PDF ("Página 12", "Fl. 3")
    pub static ref RX_PAGE_MARKER: Regex =
        Regex::new(r"(?i)^\s*(?:página|pagina|pág\.?|fls?\.?|folha)\s+\d+\s*$").unwrap();

    /// Centered page-number rules like "- 12 -"
    pub static ref RX_PAGE_RULE: Regex = Regex::new(r"^\s*-+\s*\d+\s*-+\s*$").unwrap();

    /// OCR artifacts: a short letters+digits code alone on a line ("AB12")
    pub static ref RX_OCR_ARTIFACT: Regex =
        Regex::new(r"^(?:[A-Z]{1,3}\d{1,4}|\d{1,4}[A-Z]{1,3})$").unwrap();

    /// A bullet glyph with no text after it
    pub static ref RX_ORPHAN_BULLET: Regex = Regex::new(r"^\s*[-–•*]\s*$").unwrap();

    // ========================================================================
    // Structural patterns, most specific first
    // ========================================================================

    /// Chapter heading line: "Capítulo 84" optionally followed by a title
    pub static ref RX_CHAPTER_HEADING: Regex =
        Regex::new(r"(?i)^cap[íi]tulo\s+(\d{1,2})\b\s*(.*)$").unwrap();

    /// Full NCM subposition heading: "8413.11.00 ..."
    pub static ref RX_SUBPOSITION_FULL: Regex =
        Regex::new(r"^(\d{4}\.\d{2}\.\d{2})\s*(.*)$").unwrap();

    /// Dotted subposition heading: "84.13.11 ..."
    pub static ref RX_SUBPOSITION_DOTTED: Regex =
        Regex::new(r"^(\d{2}\.\d{2}\.\d{2})\s*(.*)$").unwrap();

    /// Short subposition heading: "8413.1 ..."
    pub static ref RX_SUBPOSITION_SHORT: Regex =
        Regex::new(r"^(\d{4}\.\d{1,2})\s*(.*)$").unwrap();

    /// Position heading: "84.13 ..."
    pub static ref RX_POSITION_HEADING: Regex =
        Regex::new(r"^(\d{2}\.\d{2})\s*(.*)$").unwrap();

    /// Free-text section headings ("Notas.", "CONSIDERAÇÕES GERAIS")
    pub static ref RX_SECTION_HEADING: Regex = Regex::new(
        r"(?i)^(notas?|considerações\s+gerais|consideracoes\s+gerais|definições|definicoes)\s*[.:]?\s*$"
    )
    .unwrap();

    // ========================================================================
    // List patterns
    // ========================================================================

    /// Ordered list marker: "A) ...", "b) ..."
    pub static ref RX_LIST_ORDERED: Regex = Regex::new(r"^([A-Za-z])\)\s+(.*)$").unwrap();

    /// Unordered list marker: "- ...", "• ..."
    pub static ref RX_LIST_BULLET: Regex = Regex::new(r"^[-–•]\s+(.*)$").unwrap();

    // ========================================================================
    // Inline reference patterns
    // ========================================================================

    /// Double-asterisk bold convention
    pub static ref RX_BOLD: Regex = Regex::new(r"\*\*([^*]+)\*\*").unwrap();

    /// "Nota 4", "Nota 4 do Capítulo 85"
    pub static ref RX_NOTE_REF: Regex =
        Regex::new(r"(?i)\bnotas?\s+(\d+)(?:\s+d[oa]\s+cap[íi]tulo\s+(\d+))?").unwrap();

    /// Classification-code shapes, longest first so the leftmost-first
    /// alternation picks the most specific form at each offset.
    ///
    /// The bare `\d{2}\.\d{2}` arm also accepts decimal numbers with two
    /// digits before the dot ("12.50"). That is inherited behavior kept for
    /// compatibility; it is a known false-positive risk.
    pub static ref RX_SMART_CODE: Regex =
        Regex::new(r"\d{4}\.\d{2}\.\d{2}|\d{4}\.\d{2}|\d{4}\.\d|\d{2}\.\d{2}").unwrap();

    /// An already-derived anchor id; deriving again must be a no-op
    pub static ref RX_ANCHOR_SHAPED: Regex = Regex::new(r"^pos-[\d-]+$").unwrap();

    /// Valid chapter numbers are one or two digits
    pub static ref RX_CHAPTER_NUMBER: Regex = Regex::new(r"^\d{1,2}$").unwrap();
}

/// Map a detected section-heading label to its anchor segment
pub fn section_anchor_kind(label: &str) -> Option<&'static str> {
    let lower = label.to_lowercase();
    if lower.starts_with("nota") {
        Some("notas")
    } else if lower.starts_with("considera") {
        Some("consideracoes")
    } else if lower.starts_with("defini") {
        Some("definicoes")
    } else if lower.starts_with("título") || lower.starts_with("titulo") {
        Some("titulo")
    } else {
        None
    }
}
