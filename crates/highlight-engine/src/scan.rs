//! Scan lifecycle: cleanup, marker injection and match bookkeeping
//!
//! A scan only runs when the content-ready flag is set, the query is
//! non-empty and the container has content; anything earlier is deferred.
//! Every scan starts from the single restore operation, so re-scanning is
//! never cumulative and teardown leaves the base render untouched.

use shared_types::QualityState;
use tracing::{debug, warn};

use crate::pattern::{build_term_pattern, strip_diacritics};
use crate::quality;
use crate::terms::normalize_query;
use crate::tree::{Container, NodeId};

pub const MARK_CLASS: &str = "search-highlight search-highlight-partial";
pub const ACTIVE_CLASS: &str = "search-highlight-active";
pub const WRAPPER_CLASS: &str = "search-highlight-wrapper";

/// Tags whose subtrees are never scanned
const SKIP_TAGS: &[&str] = &["script", "style"];

/// One located occurrence of one term, in document order
#[derive(Debug, Clone)]
pub struct MatchInstance {
    pub node: NodeId,
    pub term: String,
    /// 0-based rank among this term's occurrences, in document order
    pub index: usize,
    /// Container generation this match was taken from
    pub generation: u64,
}

/// All occurrences of one term
#[derive(Debug, Clone)]
pub struct TermMatches {
    pub term: String,
    pub matches: Vec<MatchInstance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Annotated,
}

/// Live search highlighter over a rendered container
pub struct Highlighter {
    container: Container,
    query: String,
    content_ready: bool,
    state: ScanState,
    terms: Vec<String>,
    term_matches: Vec<TermMatches>,
    active_term: Option<String>,
    pub(crate) active_index: usize,
    quality: QualityState,
    visible: bool,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
            query: String::new(),
            content_ready: false,
            state: ScanState::Idle,
            terms: Vec::new(),
            term_matches: Vec::new(),
            active_term: None,
            active_index: 0,
            quality: QualityState::none(),
            visible: false,
        }
    }

    /// Place rendered markup into the container, marking it ready.
    pub fn with_content(markup: &str) -> Self {
        let mut highlighter = Self::new();
        highlighter.set_content(markup);
        highlighter.set_content_ready(true);
        highlighter
    }

    /// Replace the container content. Matches into the old tree are
    /// discarded; the ready flag must be raised again by the caller.
    pub fn set_content(&mut self, markup: &str) {
        self.container.set_content(markup);
        self.content_ready = false;
        self.invalidate();
    }

    pub fn set_content_ready(&mut self, ready: bool) {
        self.content_ready = ready;
        self.try_scan();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.try_scan();
    }

    /// Hide the highlight UI without un-marking the tree.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Unwind everything before the component goes away.
    pub fn teardown(&mut self) {
        self.restore_markers();
        self.invalidate();
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub(crate) fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub(crate) fn replace_active_term(&mut self, term: String, index: usize) {
        self.active_term = Some(term);
        self.active_index = index;
    }

    pub fn markup(&self) -> String {
        self.container.serialize()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn quality(&self) -> QualityState {
        self.quality
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn active_term(&self) -> Option<&str> {
        self.active_term.as_deref()
    }

    pub fn matches_for(&self, term: &str) -> &[MatchInstance] {
        self.term_matches
            .iter()
            .find(|tm| tm.term == term)
            .map(|tm| tm.matches.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_match_count(&self) -> usize {
        self.term_matches.iter().map(|tm| tm.matches.len()).sum()
    }

    fn invalidate(&mut self) {
        self.term_matches.clear();
        self.terms.clear();
        self.quality = QualityState::none();
        self.state = ScanState::Idle;
        self.active_index = 0;
    }

    fn try_scan(&mut self) {
        if self.query.trim().is_empty() {
            // No query: drop any markers from a previous one
            self.restore_markers();
            self.invalidate();
            return;
        }
        if !self.content_ready || self.container.is_empty() {
            return;
        }
        self.scan();
    }

    fn scan(&mut self) {
        self.state = ScanState::Scanning;
        self.restore_markers();

        self.terms = normalize_query(&self.query);
        if self.terms.is_empty() {
            self.invalidate();
            return;
        }

        let mut patterns = Vec::new();
        for term in &self.terms {
            match build_term_pattern(term) {
                Ok(rx) => patterns.push((term.clone(), rx)),
                Err(err) => {
                    warn!(term = %term, error = %err, "skipping unusable search term");
                }
            }
        }

        let candidates = self.collect_candidates(&patterns);
        let generation = self.container.generation();

        // Mutate in reverse document order so untouched leaves keep their
        // positions while earlier ones are being replaced.
        let mut found: Vec<(String, NodeId)> = Vec::new();
        for &leaf in candidates.iter().rev() {
            let Some(text) = self.container.text(leaf).map(|t| t.to_string()) else {
                continue;
            };
            let spans = match_spans(&text, &patterns);
            if spans.is_empty() {
                continue;
            }
            let marks = self.wrap_leaf(leaf, &text, &spans);
            // Reverse within the leaf: the final whole-list reversal then
            // restores forward order both across and inside leaves.
            for (term, mark) in marks.into_iter().rev() {
                found.push((term, mark));
            }
        }
        found.reverse();

        self.term_matches = self
            .terms
            .iter()
            .map(|term| TermMatches {
                term: term.clone(),
                matches: found
                    .iter()
                    .filter(|(t, _)| t == term)
                    .enumerate()
                    .map(|(index, (t, node))| MatchInstance {
                        node: *node,
                        term: t.clone(),
                        index,
                        generation,
                    })
                    .collect(),
            })
            .collect();

        self.pick_active_term();
        self.visible = true;
        self.quality = quality::compute(&self.container, &self.terms, &self.term_matches);
        self.state = ScanState::Annotated;
        debug!(
            terms = self.terms.len(),
            matches = self.total_match_count(),
            quality = ?self.quality.level,
            "scan complete"
        );
    }

    fn collect_candidates(&self, patterns: &[(String, regex::Regex)]) -> Vec<NodeId> {
        self.container
            .text_leaves()
            .into_iter()
            .filter(|&leaf| !self.in_skipped_subtree(leaf))
            .filter(|&leaf| {
                let Some(text) = self.container.text(leaf) else {
                    return false;
                };
                let stripped = strip_diacritics(&text.to_lowercase());
                patterns.iter().any(|(term, _)| stripped.contains(term))
            })
            .collect()
    }

    fn in_skipped_subtree(&self, leaf: NodeId) -> bool {
        self.container.ancestors(leaf).iter().any(|&ancestor| {
            self.container.element(ancestor).is_some_and(|el| {
                SKIP_TAGS.contains(&el.tag.as_str())
                    || el.tag == "mark"
                    || el.has_class(WRAPPER_CLASS)
            })
        })
    }

    /// Replace one text leaf with a wrapper holding mark elements around
    /// every matched span. Returns (term, mark id) pairs in forward order.
    fn wrap_leaf(
        &mut self,
        leaf: NodeId,
        text: &str,
        spans: &[(usize, usize, String)],
    ) -> Vec<(String, NodeId)> {
        let wrapper = self.container.create_element(
            "span",
            vec![("class".to_string(), WRAPPER_CLASS.to_string())],
        );
        let mut marks = Vec::new();
        let mut cursor = 0usize;
        for (start, end, term) in spans {
            if *start > cursor {
                let before = self.container.create_text(&text[cursor..*start]);
                self.container.append_child(wrapper, before);
            }
            let mark = self.container.create_element(
                "mark",
                vec![
                    ("data-sh-term".to_string(), term.clone()),
                    ("class".to_string(), MARK_CLASS.to_string()),
                ],
            );
            let inner = self.container.create_text(&text[*start..*end]);
            self.container.append_child(mark, inner);
            self.container.append_child(wrapper, mark);
            marks.push((term.clone(), mark));
            cursor = *end;
        }
        if cursor < text.len() {
            let after = self.container.create_text(&text[cursor..]);
            self.container.append_child(wrapper, after);
        }
        self.container.replace_node(leaf, wrapper);
        marks
    }

    fn pick_active_term(&mut self) {
        let still_valid = self
            .active_term
            .as_ref()
            .is_some_and(|term| !self.matches_for(term).is_empty());
        if !still_valid {
            self.active_term = self
                .terms
                .iter()
                .find(|term| !self.matches_for(term).is_empty())
                .cloned();
        }
        self.active_index = 0;
        if let Some(node) = self.active_node() {
            self.container.add_class(node, ACTIVE_CLASS);
        }
    }

    pub(crate) fn active_node(&self) -> Option<NodeId> {
        let term = self.active_term.as_deref()?;
        self.matches_for(term)
            .get(self.active_index)
            .map(|m| m.node)
    }

    /// Unwind the previous scan: unwrap every marker wrapper back into its
    /// original text and merge the pieces. Idempotent.
    fn restore_markers(&mut self) {
        let wrappers: Vec<NodeId> = self
            .container
            .document_order()
            .into_iter()
            .filter(|&id| {
                self.container
                    .element(id)
                    .is_some_and(|el| el.has_class(WRAPPER_CLASS))
            })
            .collect();
        if wrappers.is_empty() {
            return;
        }
        for wrapper in wrappers {
            let text = self.container.subtree_text(wrapper);
            let replacement = self.container.create_text(&text);
            self.container.replace_node(wrapper, replacement);
        }
        self.container.merge_adjacent_text();
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-overlapping matched spans across all terms, forward order.
fn match_spans(text: &str, patterns: &[(String, regex::Regex)]) -> Vec<(usize, usize, String)> {
    let mut spans: Vec<(usize, usize, String)> = Vec::new();
    for (term, rx) in patterns {
        for m in rx.find_iter(text) {
            spans.push((m.start(), m.end(), term.clone()));
        }
    }
    spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut kept: Vec<(usize, usize, String)> = Vec::new();
    for span in spans {
        if kept.last().map_or(true, |last| span.0 >= last.1) {
            kept.push(span);
        }
    }
    kept
}
