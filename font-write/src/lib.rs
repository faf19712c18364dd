//! Serializing sfnt tables back to bytes.
//!
//! This crate is the write-side counterpart to `font-read`: a `FontWrite`
//! trait and `TableWriter` byte buffer (mirroring `FontRead`/`FontData`),
//! owned "write" representations of the tables subsetting rebuilds, and a
//! `FontBuilder` that assembles a fresh sfnt file from a set of finished
//! table buffers.

pub mod error;
pub mod font_builder;
pub mod tables;
pub mod write;

pub use error::{Result, WriteError};
pub use font_builder::FontBuilder;
pub use write::{dump_table, FontWrite, TableWriter};
