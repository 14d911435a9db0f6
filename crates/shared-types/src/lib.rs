pub mod payload;
pub mod types;

pub use payload::{chapters_from_json, PayloadError};
pub use types::{
    Chapter, ChapterSections, Position, QualityLevel, QualityScope, QualityState, RenderReport,
};
