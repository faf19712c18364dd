//! Traits for interpreting font data.

use crate::error::Result;
use crate::font_data::FontData;

/// A type that can be read from raw table data without any external state.
pub trait FontRead<'a>: Sized {
    fn read(data: FontData<'a>) -> Result<Self>;
}

/// A type that needs extra arguments (not present in its own bytes) to be
/// read, such as `hmtx` (needs `numberOfHMetrics` and `numGlyphs` from
/// `hhea`/`maxp`) or `loca` (needs `indexToLocFormat` from `head`).
pub trait ReadArgs {
    type Args: Copy;
}

pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self>;
}
