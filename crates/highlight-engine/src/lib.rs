//! Live search highlighting over rendered NCM legal notes
//!
//! Given a container holding the renderer's markup and a query, the
//! highlighter injects match markers, classifies how well the terms
//! co-occur within the document hierarchy, and exposes occurrence
//! navigation. Scans are exclusive: each one fully unwinds the previous
//! scan's markers before injecting new ones.

pub mod navigation;
pub mod pattern;
pub mod quality;
pub mod scan;
pub mod terms;
pub mod tree;

use thiserror::Error;

pub use scan::{Highlighter, MatchInstance, ScanState, TermMatches};
pub use shared_types::{QualityLevel, QualityScope, QualityState};
pub use tree::{Container, NodeId};

/// Errors raised while preparing search terms
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("empty search term")]
    EmptyTerm,

    #[error("invalid pattern for term {term:?}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
}
