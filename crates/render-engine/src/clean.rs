//! Noise removal for raw chapter text

use crate::patterns::{RX_OCR_ARTIFACT, RX_ORPHAN_BULLET, RX_PAGE_MARKER, RX_PAGE_RULE};

/// Strip known noise lines while preserving meaningful text.
///
/// Blank lines survive; they separate paragraphs downstream.
pub fn clean_content(raw: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in raw.lines() {
        let line = line.trim_end_matches(['\u{000C}', '\r']).trim_end();
        let trimmed = line.trim_start();
        if RX_PAGE_MARKER.is_match(trimmed)
            || RX_PAGE_RULE.is_match(trimmed)
            || RX_OCR_ARTIFACT.is_match(trimmed)
            || RX_ORPHAN_BULLET.is_match(line)
        {
            continue;
        }
        kept.push(line);
    }
    kept.join("\n")
}
