//! The `COLR` table: https://learn.microsoft.com/en-us/typography/opentype/spec/colr
//!
//! Out of this engine's core scope: parsed bounds-checked and its fields
//! exposed, nothing more. Only version 0's base-glyph/layer arrays are exposed;
//! version 1's paint graph is left as an unparsed offset, since consuming
//! it is a renderer concern.

use font_types::{GlyphId, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"COLR");

#[derive(Clone, Copy)]
pub struct Colr<'a> {
    data: FontData<'a>,
    version: u16,
    num_base_glyph_records: u16,
    base_glyph_records_offset: u32,
    layer_records_offset: u32,
    num_layer_records: u16,
}

impl<'a> FontRead<'a> for Colr<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Colr {
            version: data.read_at(0)?,
            num_base_glyph_records: data.read_at(2)?,
            base_glyph_records_offset: data.read_at(4)?,
            layer_records_offset: data.read_at(8)?,
            num_layer_records: data.read_at(12)?,
            data,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseGlyphRecord {
    pub glyph_id: GlyphId,
    pub first_layer_index: u16,
    pub num_layers: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerRecord {
    pub glyph_id: GlyphId,
    pub palette_index: u16,
}

impl<'a> Colr<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    /// This glyph's color layers (version 0 model only; `None` if the
    /// glyph has no color entry, which means "render as a normal outline").
    pub fn base_glyph(&self, gid: GlyphId) -> Result<Option<BaseGlyphRecord>> {
        let base = self
            .data
            .split_off(self.base_glyph_records_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        for i in 0..self.num_base_glyph_records {
            let rec_base = i as usize * 6;
            let glyph_id: u16 = base.read_at(rec_base)?;
            if glyph_id == gid.to_u16() {
                return Ok(Some(BaseGlyphRecord {
                    glyph_id: gid,
                    first_layer_index: base.read_at(rec_base + 2)?,
                    num_layers: base.read_at(rec_base + 4)?,
                }));
            }
        }
        Ok(None)
    }

    pub fn layers(&self, first_layer_index: u16, num_layers: u16) -> Result<Vec<LayerRecord>> {
        let base = self
            .data
            .split_off(self.layer_records_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        (0..num_layers)
            .map(|i| {
                let idx = first_layer_index + i;
                if idx >= self.num_layer_records {
                    return Err(ReadError::OutOfBounds);
                }
                let rec_base = idx as usize * 4;
                Ok(LayerRecord {
                    glyph_id: GlyphId::new(base.read_at(rec_base)?),
                    palette_index: base.read_at(rec_base + 2)?,
                })
            })
            .collect()
    }
}
