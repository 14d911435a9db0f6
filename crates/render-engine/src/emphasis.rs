//! Bold-convention normalization

use crate::patterns::RX_BOLD;
use crate::segments::rewrite_text_segments;

/// Convert the `**bold**` convention into `<strong>` tags.
///
/// Works on plain text and on partially-rendered fragments: only text
/// outside existing tags is rewritten.
pub fn normalize_emphasis(input: &str) -> String {
    rewrite_text_segments(input, |text, _| {
        RX_BOLD.replace_all(text, "<strong>$1</strong>").into_owned()
    })
}
