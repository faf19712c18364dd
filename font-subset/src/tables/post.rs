//! `post` always downgrades to version 3.0 when subsetting; see
//! [`font_write::tables::post::PostTable`] for the writer itself.

pub use font_write::tables::post::PostTable;
