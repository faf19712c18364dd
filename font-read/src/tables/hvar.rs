//! The `HVAR` table: https://learn.microsoft.com/en-us/typography/opentype/spec/hvar
//!
//! Per-glyph variation deltas for horizontal advance width, and optionally
//! left/right side bearings, layered on an [`ItemVariationStore`].

use font_types::{GlyphId, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

use super::ivs::{DeltaSetIndexMap, ItemVariationStore};

pub const TAG: Tag = Tag::new(b"HVAR");

#[derive(Clone, Copy)]
pub struct Hvar<'a> {
    data: FontData<'a>,
    item_variation_store_offset: u32,
    advance_width_mapping_offset: u32,
    lsb_mapping_offset: u32,
    rsb_mapping_offset: u32,
}

impl<'a> FontRead<'a> for Hvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Hvar {
            data,
            item_variation_store_offset: data.read_at(4)?,
            advance_width_mapping_offset: data.read_at(8)?,
            lsb_mapping_offset: data.read_at(12)?,
            rsb_mapping_offset: data.read_at(16)?,
        })
    }
}

impl<'a> Hvar<'a> {
    pub fn item_variation_store(&self) -> Result<ItemVariationStore<'a>> {
        let data = self
            .data
            .split_off(self.item_variation_store_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        ItemVariationStore::read(data)
    }

    fn mapping(&self, offset: u32) -> Result<Option<DeltaSetIndexMap<'a>>> {
        if offset == 0 {
            return Ok(None);
        }
        let data = self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(DeltaSetIndexMap::read(data)?))
    }

    /// The `(outer, inner)` delta-set indices for `gid`'s advance width.
    /// Without an explicit mapping, glyph ids map directly onto item
    /// variation data rows (`outer = 0`).
    pub fn advance_width_mapping(&self, gid: GlyphId) -> Result<(u16, u16)> {
        match self.mapping(self.advance_width_mapping_offset)? {
            Some(map) => map.map(gid.to_u32()),
            None => Ok((0, gid.to_u32() as u16)),
        }
    }

    pub fn lsb_mapping(&self, gid: GlyphId) -> Result<Option<(u16, u16)>> {
        self.mapping(self.lsb_mapping_offset)?
            .map(|map| map.map(gid.to_u32()))
            .transpose()
    }

    pub fn rsb_mapping(&self, gid: GlyphId) -> Result<Option<(u16, u16)>> {
        self.mapping(self.rsb_mapping_offset)?
            .map(|map| map.map(gid.to_u32()))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_mapping_uses_glyph_id_as_inner_index() {
        let mut b = vec![0u8; 20];
        b[0..2].copy_from_slice(&1u16.to_be_bytes());
        b[4..8].copy_from_slice(&20u32.to_be_bytes()); // ivs offset, empty store follows
        b.extend_from_slice(&1u16.to_be_bytes()); // ivs format
        b.extend_from_slice(&8u32.to_be_bytes()); // regionListOffset
        b.extend_from_slice(&0u16.to_be_bytes()); // itemVariationDataCount
        b.extend_from_slice(&0u16.to_be_bytes()); // axisCount
        b.extend_from_slice(&0u16.to_be_bytes()); // regionCount
        let hvar = Hvar::read(FontData::new(&b)).unwrap();
        assert_eq!(hvar.advance_width_mapping(GlyphId::new(7)).unwrap(), (0, 7));
        assert!(hvar.lsb_mapping(GlyphId::new(7)).unwrap().is_none());
    }
}
