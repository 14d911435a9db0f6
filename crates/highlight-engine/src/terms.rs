//! Search-query normalization

use crate::pattern::strip_diacritics;

/// Break a query into normalized search terms.
///
/// Lower-cased, diacritics stripped, punctuation treated as whitespace.
/// Words of one or two characters are dropped unless the entire query is
/// that short. Duplicates keep only their first appearance.
pub fn normalize_query(query: &str) -> Vec<String> {
    let trimmed = query.trim();
    let keep_short = trimmed.chars().count() <= 2;

    let lowered = trimmed.to_lowercase();
    let stripped = strip_diacritics(&lowered);
    let spaced: String = stripped
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut terms: Vec<String> = Vec::new();
    for word in spaced.split_whitespace() {
        if !keep_short && word.chars().count() <= 2 {
            continue;
        }
        if !terms.iter().any(|t| t == word) {
            terms.push(word.to_string());
        }
    }
    terms
}
