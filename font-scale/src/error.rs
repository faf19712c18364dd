//! Error types produced while extracting outlines or applying variations.

use font_types::{GlyphId, Tag};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScaleError {
    #[error("underlying font data: {0}")]
    Read(#[from] font_read::error::ReadError),
    #[error("no outline for glyph {0:?}")]
    NoOutline(GlyphId),
    #[error("composite glyph recursion exceeded depth {0}")]
    RecursionTooDeep(u32),
    #[error("composite glyph cycle detected at {0:?}")]
    CycleDetected(GlyphId),
    #[error("axis {0} not present in fvar")]
    UnknownAxis(Tag),
    #[error("font has neither glyf/loca nor CFF/CFF2 outlines")]
    NoOutlineFormat,
    #[error("CFF charstring for glyph {0:?} is truncated or malformed")]
    MalformedCharstring(GlyphId),
}

pub type Result<T> = std::result::Result<T, ScaleError>;
