//! The `JSTF` table: https://learn.microsoft.com/en-us/typography/opentype/spec/jstf
//!
//! Justification data (priority lookups for shrinkage/extension). Like
//! `GSUB`/`GPOS`, this layer only locates the per-script justification data;
//! applying it during line layout is out of scope.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"JSTF");

#[derive(Clone, Copy)]
pub struct Jstf<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Jstf<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Jstf { data })
    }
}

impl<'a> Jstf<'a> {
    pub fn scripts(&self) -> Result<Vec<(Tag, JstfScript<'a>)>> {
        super::layout_common::read_tagged_records(self.data)?
            .into_iter()
            .map(|r| {
                let data = self
                    .data
                    .split_off(r.offset as usize)
                    .ok_or(ReadError::OutOfBounds)?;
                Ok((r.tag, JstfScript { data }))
            })
            .collect()
    }
}

/// A `JstfScript` table: the extender glyphs allowed to be inserted for
/// justification, plus per-langsys `JstfLangSys` priority lists (exposed
/// only as raw offsets; priority semantics are a layout-engine concern).
#[derive(Clone, Copy)]
pub struct JstfScript<'a> {
    data: FontData<'a>,
}

impl<'a> JstfScript<'a> {
    pub fn extender_glyphs(&self) -> Result<Vec<font_types::GlyphId>> {
        let offset: u16 = self.data.read_at(0)?;
        if offset == 0 {
            return Ok(Vec::new());
        }
        let data = self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        let count: u16 = data.read_at(0)?;
        let mut cursor = data.cursor();
        cursor.skip(2)?;
        cursor
            .read_array::<u16>(count as usize)
            .map(|v| v.into_iter().map(font_types::GlyphId::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_script_list() {
        let b = 0u16.to_be_bytes();
        let jstf = Jstf::read(FontData::new(&b)).unwrap();
        assert!(jstf.scripts().unwrap().is_empty());
    }
}
