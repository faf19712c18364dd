//! Errors produced while serializing font tables.

use font_types::Tag;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("glyph {0} has no outline available to serialize")]
    MissingGlyph(u16),
    #[error("{1} glyphs is too many to fit table {0}'s offsets")]
    TooManyGlyphs(Tag, usize),
    #[error("table {0} grew past the maximum size its offset fields can address")]
    TableTooLarge(Tag),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, WriteError>;
