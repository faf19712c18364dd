//! Outline extraction and variable-font instancing on top of `font-read`.
//!
//! This mirrors `skrifa`'s role: given a parsed
//! [`font_read::FontRef`] and an optional [`instance::Location`], produce
//! concrete glyph outlines, advances, and font-wide metrics with every
//! applicable `gvar`/`HVAR`/`MVAR` delta folded in.

pub mod charmap;
pub mod error;
pub mod instance;
pub mod iup;
pub mod metrics;
pub mod outline;
pub mod variation;

pub use error::{Result, ScaleError};
