//! Exclusion-phrase and measurement-unit highlighting

use regex::Regex;
use tracing::warn;

use crate::segments::{is_protected, rewrite_text_segments};

/// A compiled highlighter for one category of terms.
///
/// Terms are matched case-insensitively as whole tokens; the wrapping span
/// is only ever injected into text outside existing tags, so a link's
/// visible text or an attribute value can never be split.
#[derive(Debug, Clone)]
pub struct TermHighlighter {
    class: &'static str,
    pattern: Option<Regex>,
}

impl TermHighlighter {
    pub fn new(class: &'static str, terms: &[String]) -> Self {
        Self {
            class,
            pattern: compile_terms(class, terms),
        }
    }

    pub fn apply(&self, input: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return input.to_string();
        };
        rewrite_text_segments(input, |text, stack| {
            if is_protected(stack) {
                return text.to_string();
            }
            pattern
                .replace_all(text, |caps: &regex::Captures| {
                    format!(r#"<span class="{}">{}</span>"#, self.class, &caps[0])
                })
                .into_owned()
        })
    }
}

/// Build one case-insensitive alternation over all terms, longest first so
/// overlapping phrases prefer the most specific form.
fn compile_terms(class: &str, terms: &[String]) -> Option<Regex> {
    let mut sorted: Vec<&String> = terms.iter().filter(|t| !t.trim().is_empty()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    let alternation = sorted
        .iter()
        .map(|term| bounded_term(term))
        .collect::<Vec<_>>()
        .join("|");
    let source = format!("(?i)(?:{alternation})");

    match Regex::new(&source) {
        Ok(rx) => Some(rx),
        Err(err) => {
            warn!(class, error = %err, "discarding unusable term list");
            None
        }
    }
}

/// Word boundaries only apply where the term itself starts or ends with a
/// word character ("%", "°C" have none on that side).
fn bounded_term(term: &str) -> String {
    let escaped = regex::escape(term.trim());
    let first = term.trim().chars().next().map(|c| c.is_alphanumeric());
    let last = term.trim().chars().next_back().map(|c| c.is_alphanumeric());
    format!(
        "{}{}{}",
        if first == Some(true) { r"\b" } else { "" },
        escaped,
        if last == Some(true) { r"\b" } else { "" },
    )
}
