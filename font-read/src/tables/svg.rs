//! The `SVG ` table: https://learn.microsoft.com/en-us/typography/opentype/spec/svg
//!
//! Per-glyph embedded SVG documents (gzip-compressed SVG is *not* expanded
//! here; that's a rendering-pipeline concern, this layer only locates the
//! byte range for a glyph's document).

use font_types::{GlyphId, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"SVG ");

#[derive(Clone, Copy)]
pub struct Svg<'a> {
    data: FontData<'a>,
    svg_document_list_offset: u32,
}

impl<'a> FontRead<'a> for Svg<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Svg {
            svg_document_list_offset: data.read_at(2)?,
            data,
        })
    }
}

impl<'a> Svg<'a> {
    /// The raw (possibly gzip-compressed) SVG document bytes covering
    /// `gid`, if the glyph's ID falls within one of the list's ranges.
    pub fn document_for_glyph(&self, gid: GlyphId) -> Result<Option<&'a [u8]>> {
        let list = self
            .data
            .split_off(self.svg_document_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let count: u16 = list.read_at(0)?;
        let gid = gid.to_u16();
        for i in 0..count {
            let base = 2 + i as usize * 12;
            let start_gid: u16 = list.read_at(base)?;
            let end_gid: u16 = list.read_at(base + 2)?;
            if gid < start_gid || gid > end_gid {
                continue;
            }
            let offset: u32 = list.read_at(base + 4)?;
            let length: u32 = list.read_at(base + 8)?;
            let bytes = list
                .slice(offset as usize..(offset + length) as usize)
                .ok_or(ReadError::OutOfBounds)?;
            return Ok(Some(bytes.as_bytes()));
        }
        Ok(None)
    }
}
