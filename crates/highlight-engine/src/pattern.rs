//! Accent-insensitive term patterns
//!
//! A normalized term like "centrif" must still find the literal "centríf"
//! in the live text, so every letter with accented variants is compiled
//! into a character class covering all of them.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::HighlightError;

/// Base letter → accented variants, lower case
pub const ACCENT_GROUPS: &[(char, &str)] = &[
    ('a', "áàâãäå"),
    ('e', "éèêë"),
    ('i', "íìîï"),
    ('o', "óòôõö"),
    ('u', "úùûü"),
    ('c', "ç"),
    ('n', "ñ"),
];

static VARIANT_TO_BASE: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (base, variants) in ACCENT_GROUPS {
        for variant in variants.chars() {
            map.insert(variant, *base);
            for upper in variant.to_uppercase() {
                map.insert(upper, base.to_ascii_uppercase());
            }
        }
    }
    map
});

static BASE_TO_CLASS: Lazy<HashMap<char, String>> = Lazy::new(|| {
    ACCENT_GROUPS
        .iter()
        .map(|(base, variants)| (*base, format!("[{base}{variants}]")))
        .collect()
});

/// Replace accented letters with their base form, preserving case.
pub fn strip_diacritics(text: &str) -> String {
    text.chars()
        .map(|c| VARIANT_TO_BASE.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Compile one term into a case- and accent-insensitive pattern.
pub fn build_term_pattern(term: &str) -> Result<Regex, HighlightError> {
    if term.trim().is_empty() {
        return Err(HighlightError::EmptyTerm);
    }

    let mut source = String::from("(?i)");
    for ch in term.chars() {
        let base = VARIANT_TO_BASE
            .get(&ch)
            .copied()
            .unwrap_or(ch)
            .to_lowercase()
            .next()
            .unwrap_or(ch);
        match BASE_TO_CLASS.get(&base) {
            Some(class) => source.push_str(class),
            None => source.push_str(&regex::escape(&ch.to_string())),
        }
    }

    Regex::new(&source).map_err(|err| HighlightError::Pattern {
        term: term.to_string(),
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_diacritics_preserves_case() {
        assert_eq!(strip_diacritics("Centrífuga AÇÃO"), "Centrifuga ACAO");
    }

    #[test]
    fn test_pattern_matches_accented_variants() {
        let rx = build_term_pattern("centrif").unwrap();
        assert!(rx.is_match("bombas centrífugas"));
        assert!(rx.is_match("CENTRIFUGA"));
    }

    #[test]
    fn test_pattern_matches_each_vowel_group() {
        for (term, text) in [
            ("aco", "aço"),
            ("pressao", "pressão"),
            ("oleo", "óleo"),
            ("uteis", "úteis"),
            ("nivel", "nível"),
        ] {
            let rx = build_term_pattern(term).unwrap();
            assert!(rx.is_match(text), "{term} should match {text}");
        }
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let rx = build_term_pattern("50%").unwrap();
        assert!(rx.is_match("teor de 50% em peso"));
        assert!(!rx.is_match("teor de 50 em peso"));
    }

    #[test]
    fn test_empty_term_is_rejected() {
        assert!(matches!(
            build_term_pattern("  "),
            Err(HighlightError::EmptyTerm)
        ));
    }
}
