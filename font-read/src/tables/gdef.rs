//! The `GDEF` table: https://learn.microsoft.com/en-us/typography/opentype/spec/gdef
//!
//! Glyph class definitions and attachment data shared by `GSUB`/`GPOS`
//! shaping. Only the top-level structure and `ClassDef`/coverage-backed
//! subtables are exposed; ligature caret values are returned as raw
//! `CaretValue` byte ranges.

use font_types::{GlyphId, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

use super::ivs::ItemVariationStore;
use super::layout_common::{ClassDef, Coverage};

pub const TAG: Tag = Tag::new(b"GDEF");

#[derive(Clone, Copy)]
pub struct Gdef<'a> {
    data: FontData<'a>,
    minor_version: u16,
    glyph_class_def_offset: u16,
    attach_list_offset: u16,
    lig_caret_list_offset: u16,
    mark_attach_class_def_offset: u16,
    mark_glyph_sets_def_offset: u16,
    item_var_store_offset: u32,
}

impl<'a> FontRead<'a> for Gdef<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let minor_version: u16 = data.read_at(2)?;
        let mark_glyph_sets_def_offset = if minor_version >= 2 { data.read_at(12)? } else { 0 };
        let item_var_store_offset = if minor_version >= 3 { data.read_at(14)? } else { 0 };
        Ok(Gdef {
            data,
            minor_version,
            glyph_class_def_offset: data.read_at(4)?,
            attach_list_offset: data.read_at(6)?,
            lig_caret_list_offset: data.read_at(8)?,
            mark_attach_class_def_offset: data.read_at(10)?,
            mark_glyph_sets_def_offset,
            item_var_store_offset,
        })
    }
}

/// The four classes a glyph may fall into per `GDEF`'s `GlyphClassDef`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphClass {
    Base,
    Ligature,
    Mark,
    Component,
    Unclassified,
}

impl<'a> Gdef<'a> {
    pub fn glyph_class_def(&self) -> Result<Option<ClassDef<'a>>> {
        if self.glyph_class_def_offset == 0 {
            return Ok(None);
        }
        let data = self
            .data
            .split_off(self.glyph_class_def_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(ClassDef::read(data)?))
    }

    pub fn glyph_class(&self, gid: GlyphId) -> Result<GlyphClass> {
        let Some(class_def) = self.glyph_class_def()? else {
            return Ok(GlyphClass::Unclassified);
        };
        Ok(match class_def.get(gid) {
            1 => GlyphClass::Base,
            2 => GlyphClass::Ligature,
            3 => GlyphClass::Mark,
            4 => GlyphClass::Component,
            _ => GlyphClass::Unclassified,
        })
    }

    pub fn mark_attach_class_def(&self) -> Result<Option<ClassDef<'a>>> {
        if self.mark_attach_class_def_offset == 0 {
            return Ok(None);
        }
        let data = self
            .data
            .split_off(self.mark_attach_class_def_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(ClassDef::read(data)?))
    }

    pub fn mark_glyph_set_coverage(&self, set_index: u16) -> Result<Option<Coverage<'a>>> {
        if self.mark_glyph_sets_def_offset == 0 || self.minor_version < 2 {
            return Ok(None);
        }
        let base = self
            .data
            .split_off(self.mark_glyph_sets_def_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let count: u16 = base.read_at(2)?;
        if set_index >= count {
            return Ok(None);
        }
        let offset: u32 = base.read_at(4 + set_index as usize * 4)?;
        let cov_data = base.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(Coverage::read(cov_data)?))
    }

    pub fn item_variation_store(&self) -> Result<Option<ItemVariationStore<'a>>> {
        if self.item_var_store_offset == 0 {
            return Ok(None);
        }
        let data = self
            .data
            .split_off(self.item_var_store_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(ItemVariationStore::read(data)?))
    }

    pub fn has_attach_list(&self) -> bool {
        self.attach_list_offset != 0
    }

    pub fn has_lig_caret_list(&self) -> bool {
        self.lig_caret_list_offset != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_glyph_class_def() {
        let mut b = vec![0u8; 12];
        b[0..2].copy_from_slice(&1u16.to_be_bytes());
        b[2..4].copy_from_slice(&0u16.to_be_bytes());
        b[4..6].copy_from_slice(&12u16.to_be_bytes()); // glyphClassDefOffset
        b.extend_from_slice(&1u16.to_be_bytes()); // ClassDef format 1
        b.extend_from_slice(&5u16.to_be_bytes()); // startGlyphID
        b.extend_from_slice(&1u16.to_be_bytes()); // glyphCount
        b.extend_from_slice(&2u16.to_be_bytes()); // class 2 (ligature)
        let gdef = Gdef::read(FontData::new(&b)).unwrap();
        assert_eq!(gdef.glyph_class(GlyphId::new(5)).unwrap(), GlyphClass::Ligature);
        assert_eq!(gdef.glyph_class(GlyphId::new(6)).unwrap(), GlyphClass::Unclassified);
    }
}
