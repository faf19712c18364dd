//! Error types produced while parsing font data.

use font_types::Tag;

/// An error produced while reading font data.
///
/// Every variant that refers to a table carries that table's [`Tag`] so a
/// caller can report which part of the font was at fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("unexpected end of data")]
    UnexpectedEof,
    #[error("read out of bounds")]
    OutOfBounds,
    #[error("first four bytes did not match a known container magic")]
    UnknownContainer,
    #[error("unsupported version for {0}: {1:#x}")]
    UnsupportedVersion(Tag, u32),
    #[error("required table {0} is missing")]
    MissingTable(Tag),
    #[error("invalid font index {0} for a font collection")]
    InvalidFontIndex(u32),
    #[error("table {0} is malformed: {1}")]
    MalformedTable(Tag, String),
    #[error("compression failed for {0:?}: {1}")]
    CompressionError(Option<Tag>, String),
    #[error("WOFF2 transform failed for {0}: {1}")]
    TransformError(Tag, String),
    #[error("cycle detected while resolving {0}")]
    CycleDetected(Tag),
    #[error("exceeded a resource budget: {0}")]
    BudgetExceeded(&'static str),
    #[error("array length is not a multiple of the element size")]
    InvalidArrayLen,
}

impl ReadError {
    pub fn malformed(tag: Tag, reason: impl Into<String>) -> Self {
        ReadError::MalformedTable(tag, reason.into())
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
