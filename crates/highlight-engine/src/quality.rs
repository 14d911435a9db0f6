//! Co-occurrence quality scoring
//!
//! Every match is attributed to the best available grouping key, tried in
//! order: a dedicated per-position container, the nearest preceding
//! structural `pos-` anchor, and only when no subposition resolves anywhere
//! in the document, the enclosing block element. Chapter containers are the
//! last resort and can only yield the weak level.

use std::collections::{HashMap, HashSet};

use shared_types::{QualityLevel, QualityScope, QualityState};

use crate::scan::TermMatches;
use crate::tree::{Container, NodeId};

const BLOCK_TAGS: &[&str] = &["p", "li", "h1", "h2", "h3", "h4", "h5", "h6", "td", "th"];

pub fn compute(container: &Container, terms: &[String], matches: &[TermMatches]) -> QualityState {
    if terms.len() < 2 {
        return QualityState::none();
    }

    let order = container.document_order();
    let rank: HashMap<NodeId, usize> = order
        .iter()
        .enumerate()
        .map(|(idx, &id)| (id, idx))
        .collect();

    let located: Vec<(&str, NodeId)> = matches
        .iter()
        .flat_map(|tm| tm.matches.iter().map(|m| (tm.term.as_str(), m.node)))
        .collect();
    if located.is_empty() {
        return QualityState::none();
    }

    // Subposition scope
    let mut by_subposition: HashMap<String, HashSet<&str>> = HashMap::new();
    for &(term, node) in &located {
        if let Some(key) = resolve_subposition(container, &order, &rank, node) {
            by_subposition.entry(key).or_default().insert(term);
        }
    }
    if !by_subposition.is_empty() {
        let count = by_subposition
            .values()
            .filter(|found| covers_all(found, terms))
            .count();
        if count > 0 {
            return QualityState {
                level: QualityLevel::Alto,
                co_occurrence_count: count,
                scope: Some(QualityScope::Subposition),
            };
        }
    } else {
        // No subposition anywhere: fall back to block-level grouping
        let mut by_block: HashMap<NodeId, HashSet<&str>> = HashMap::new();
        for &(term, node) in &located {
            if let Some(block) = resolve_block(container, node) {
                by_block.entry(block).or_default().insert(term);
            }
        }
        let count = by_block
            .values()
            .filter(|found| covers_all(found, terms))
            .count();
        if count > 0 {
            return QualityState {
                level: QualityLevel::Alto,
                co_occurrence_count: count,
                scope: Some(QualityScope::Block),
            };
        }
    }

    // Chapter scope
    let mut by_chapter: HashMap<NodeId, HashSet<&str>> = HashMap::new();
    for &(term, node) in &located {
        if let Some(chapter) = resolve_chapter(container, node) {
            by_chapter.entry(chapter).or_default().insert(term);
        }
    }
    if by_chapter.values().any(|found| covers_all(found, terms)) {
        return QualityState {
            level: QualityLevel::Pequeno,
            co_occurrence_count: 0,
            scope: None,
        };
    }

    QualityState::none()
}

fn covers_all(found: &HashSet<&str>, terms: &[String]) -> bool {
    terms.iter().all(|term| found.contains(term.as_str()))
}

/// Nearest enclosing subposition identifier for a match node.
fn resolve_subposition(
    container: &Container,
    order: &[NodeId],
    rank: &HashMap<NodeId, usize>,
    node: NodeId,
) -> Option<String> {
    // A dedicated per-position container wins outright
    for ancestor in container.ancestors(node) {
        if let Some(el) = container.element(ancestor) {
            if el.has_class("position-block") {
                if let Some(key) = el.attr("data-position").or_else(|| el.attr("id")) {
                    return Some(key.to_string());
                }
            }
        }
    }

    // Otherwise: nearest preceding structural anchor within the same chapter
    let scope = resolve_chapter(container, node);
    let position = *rank.get(&node)?;
    for &candidate in order[..position].iter().rev() {
        let Some(el) = container.element(candidate) else {
            continue;
        };
        let Some(id) = el.attr("id") else {
            continue;
        };
        if !id.starts_with("pos-") {
            continue;
        }
        if let Some(scope) = scope {
            if !container.is_descendant_of(candidate, scope) && candidate != scope {
                continue;
            }
        }
        return Some(id.to_string());
    }
    None
}

/// Nearest enclosing block-level element
fn resolve_block(container: &Container, node: NodeId) -> Option<NodeId> {
    container.ancestors(node).into_iter().find(|&ancestor| {
        container
            .element(ancestor)
            .is_some_and(|el| BLOCK_TAGS.contains(&el.tag.as_str()))
    })
}

/// Nearest enclosing chapter container
fn resolve_chapter(container: &Container, node: NodeId) -> Option<NodeId> {
    container.ancestors(node).into_iter().find(|&ancestor| {
        container
            .element(ancestor)
            .is_some_and(|el| el.has_class("chapter-block") || el.attr("data-chapter").is_some())
    })
}
