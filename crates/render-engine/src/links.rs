//! Inline reference linking: note references and smart classification links
//!
//! Note references run first; the smart-link pass skips any span that is
//! already inside an anchor or a note reference, so the two passes cannot
//! nest or double-wrap each other.

use crate::patterns::{RX_NOTE_REF, RX_SMART_CODE};
use crate::segments::{is_protected, rewrite_text_segments};

/// Wrap "Nota N [do Capítulo C]" references in navigable elements.
pub fn inject_note_refs(input: &str) -> String {
    rewrite_text_segments(input, |text, stack| {
        if is_protected(stack) {
            return text.to_string();
        }
        RX_NOTE_REF
            .replace_all(text, |caps: &regex::Captures| {
                let display = &caps[0];
                let note = &caps[1];
                match caps.get(2) {
                    Some(chapter) => format!(
                        r#"<span class="note-ref" data-note="{note}" data-chapter="{}">{display}</span>"#,
                        chapter.as_str()
                    ),
                    None => format!(
                        r#"<span class="note-ref" data-note="{note}">{display}</span>"#
                    ),
                }
            })
            .into_owned()
    })
}

/// Wrap classification-code references in smart links carrying the
/// digits-only code, preserving the displayed text unchanged.
pub fn inject_smart_links(input: &str) -> String {
    rewrite_text_segments(input, |text, stack| {
        if is_protected(stack) {
            return text.to_string();
        }
        link_codes_in_text(text)
    })
}

fn link_codes_in_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in RX_SMART_CODE.find_iter(text) {
        if !has_clean_boundaries(text, m.start(), m.end()) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        out.push_str(&format!(
            r##"<a href="#" class="smart-link" data-ncm="{digits}">{}</a>"##,
            m.as_str()
        ));
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// A code match must not continue a word or a larger number on either side.
/// The regex crate has no lookaround, so the neighboring characters are
/// checked directly.
fn has_clean_boundaries(text: &str, start: usize, end: usize) -> bool {
    if let Some(prev) = text[..start].chars().next_back() {
        if prev.is_alphanumeric() || prev == '.' {
            return false;
        }
    }
    let mut after = text[end..].chars();
    match after.next() {
        None => true,
        Some(next) => {
            if next.is_alphanumeric() {
                return false;
            }
            // "84.13.11": the trailing ".11" means this is a longer code,
            // not a bare heading reference
            if next == '.' {
                if let Some(following) = after.next() {
                    if following.is_ascii_digit() {
                        return false;
                    }
                }
            }
            true
        }
    }
}
