//! Occurrence navigation: cyclic stepping and active-marker movement

use crate::scan::{Highlighter, ACTIVE_CLASS};
use crate::tree::NodeId;

impl Highlighter {
    /// Make `term` the active term if it has at least one match.
    pub fn set_active_term(&mut self, term: &str) -> bool {
        if self.matches_for(term).is_empty() {
            return false;
        }
        let previous = self.active_node();
        self.set_active(term.to_string(), 0, previous);
        true
    }

    /// Advance to the next occurrence of the active term, wrapping around.
    /// Returns the marker to scroll into view.
    pub fn next(&mut self) -> Option<NodeId> {
        self.step(1)
    }

    /// Step back to the previous occurrence, wrapping around.
    pub fn previous(&mut self) -> Option<NodeId> {
        self.step(-1)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The marker currently carrying the active state
    pub fn active_marker(&self) -> Option<NodeId> {
        self.active_node()
    }

    fn step(&mut self, direction: isize) -> Option<NodeId> {
        let term = self.active_term()?.to_string();
        let count = self.matches_for(&term).len();
        if count == 0 {
            return None;
        }
        let previous = self.active_node();
        let next = (self.active_index as isize + direction).rem_euclid(count as isize) as usize;
        self.set_active(term, next, previous);
        self.active_node()
    }

    fn set_active(&mut self, term: String, index: usize, previous: Option<NodeId>) {
        self.replace_active_term(term, index);
        if let Some(old) = previous {
            self.container_mut().remove_class(old, ACTIVE_CLASS);
        }
        if let Some(new) = self.active_node() {
            self.container_mut().add_class(new, ACTIVE_CLASS);
        }
    }
}
