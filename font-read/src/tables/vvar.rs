//! The `VVAR` table: https://learn.microsoft.com/en-us/typography/opentype/spec/vvar
//!
//! Vertical analogue of `HVAR`: per-glyph deltas for advance height, top/
//! bottom side bearings, and vertical origin, layered on an
//! [`ItemVariationStore`].

use font_types::{GlyphId, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

use super::ivs::{DeltaSetIndexMap, ItemVariationStore};

pub const TAG: Tag = Tag::new(b"VVAR");

#[derive(Clone, Copy)]
pub struct Vvar<'a> {
    data: FontData<'a>,
    item_variation_store_offset: u32,
    advance_height_mapping_offset: u32,
    tsb_mapping_offset: u32,
    bsb_mapping_offset: u32,
    v_org_mapping_offset: u32,
}

impl<'a> FontRead<'a> for Vvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Vvar {
            data,
            item_variation_store_offset: data.read_at(4)?,
            advance_height_mapping_offset: data.read_at(8)?,
            tsb_mapping_offset: data.read_at(12)?,
            bsb_mapping_offset: data.read_at(16)?,
            v_org_mapping_offset: data.read_at(20)?,
        })
    }
}

impl<'a> Vvar<'a> {
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

    pub fn advance_height_mapping(&self, gid: GlyphId) -> Result<(u16, u16)> {
        match self.mapping(self.advance_height_mapping_offset)? {
            Some(map) => map.map(gid.to_u32()),
            None => Ok((0, gid.to_u32() as u16)),
        }
    }

    pub fn tsb_mapping(&self, gid: GlyphId) -> Result<Option<(u16, u16)>> {
        self.mapping(self.tsb_mapping_offset)?
            .map(|map| map.map(gid.to_u32()))
            .transpose()
    }

    pub fn bsb_mapping(&self, gid: GlyphId) -> Result<Option<(u16, u16)>> {
        self.mapping(self.bsb_mapping_offset)?
            .map(|map| map.map(gid.to_u32()))
            .transpose()
    }

    pub fn v_org_mapping(&self, gid: GlyphId) -> Result<Option<(u16, u16)>> {
        self.mapping(self.v_org_mapping_offset)?
            .map(|map| map.map(gid.to_u32()))
            .transpose()
    }
}
