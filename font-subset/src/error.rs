//! Error types produced while planning or emitting a subset font.

use font_types::{GlyphId, Tag};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubsetError {
    #[error("underlying font data: {0}")]
    Read(#[from] font_read::error::ReadError),
    #[error("underlying outline data: {0}")]
    Scale(#[from] font_scale::error::ScaleError),
    #[error("composite glyph cycle detected at {0:?}")]
    CycleDetected(GlyphId),
    #[error("CFF subroutine cycle detected at index {0}")]
    SubroutineCycle(i32),
    #[error("the requested codepoint set maps to no glyphs")]
    EmptyClosure,
    #[error("table {0} could not be subset: {1}")]
    TableError(Tag, String),
}

pub type Result<T> = std::result::Result<T, SubsetError>;
