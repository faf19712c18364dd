//! The `GPOS` table: https://learn.microsoft.com/en-us/typography/opentype/spec/gpos
//!
//! Glyph positioning rules. Like [`super::gsub`], this layer locates
//! scripts, features, and lookups and exposes each lookup's raw subtable
//! bytes and [`super::layout_common::ValueRecord`]s; actually applying a
//! positioning rule during shaping is out of scope for this engine.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

use super::layout_common::{read_feature_list, read_script_list, Feature, LookupList, Script};

pub const TAG: Tag = Tag::new(b"GPOS");

/// Lookup type 9, the `GPOS` analogue of `GSUB`'s extension lookup type 7.
pub const LOOKUP_TYPE_EXTENSION: u16 = 9;

#[derive(Clone, Copy)]
pub struct Gpos<'a> {
    data: FontData<'a>,
    minor_version: u16,
    script_list_offset: u16,
    feature_list_offset: u16,
    lookup_list_offset: u16,
    feature_variations_offset: u32,
}

impl<'a> FontRead<'a> for Gpos<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let minor_version: u16 = data.read_at(2)?;
        let feature_variations_offset = if minor_version >= 1 { data.read_at(10)? } else { 0 };
        Ok(Gpos {
            data,
            minor_version,
            script_list_offset: data.read_at(4)?,
            feature_list_offset: data.read_at(6)?,
            lookup_list_offset: data.read_at(8)?,
            feature_variations_offset,
        })
    }
}

impl<'a> Gpos<'a> {
    pub fn scripts(&self) -> Result<Vec<(Tag, Script<'a>)>> {
        let data = self
            .data
            .split_off(self.script_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        read_script_list(data)
    }

    pub fn features(&self) -> Result<Vec<(Tag, Feature<'a>)>> {
        let data = self
            .data
            .split_off(self.feature_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        read_feature_list(data)
    }

    pub fn lookups(&self) -> Result<LookupList<'a>> {
        let data = self
            .data
            .split_off(self.lookup_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        LookupList::read(data)
    }

    /// Whether this is version 1.1 and carries a `FeatureVariations` table
    /// (used to substitute alternate features at specific variable-font
    /// locations). The table itself is not decoded: applying it is a
    /// shaping concern.
    pub fn has_feature_variations(&self) -> bool {
        self.minor_version >= 1 && self.feature_variations_offset != 0
    }
}

/// `GPOS` lookup type 1: single adjustment.
pub const LOOKUP_TYPE_SINGLE_POS: u16 = 1;
/// `GPOS` lookup type 2: pair adjustment.
pub const LOOKUP_TYPE_PAIR_POS: u16 = 2;
/// `GPOS` lookup type 3: cursive attachment.
pub const LOOKUP_TYPE_CURSIVE_POS: u16 = 3;
/// `GPOS` lookup type 4: mark-to-base attachment.
pub const LOOKUP_TYPE_MARK_TO_BASE_POS: u16 = 4;
/// `GPOS` lookup type 5: mark-to-ligature attachment.
pub const LOOKUP_TYPE_MARK_TO_LIG_POS: u16 = 5;
/// `GPOS` lookup type 6: mark-to-mark attachment.
pub const LOOKUP_TYPE_MARK_TO_MARK_POS: u16 = 6;
/// `GPOS` lookup type 7: context positioning.
pub const LOOKUP_TYPE_CONTEXT_POS: u16 = 7;
/// `GPOS` lookup type 8: chained context positioning.
pub const LOOKUP_TYPE_CHAINED_CONTEXT_POS: u16 = 8;

/// An `Anchor` table (formats 1-3; format 3's device/variation offsets are
/// exposed as raw presence rather than resolved).
#[derive(Clone, Copy, Debug)]
pub struct Anchor {
    pub x: i16,
    pub y: i16,
    pub has_device_or_variation: bool,
}

impl Anchor {
    pub fn read(data: FontData<'_>) -> Result<Self> {
        let format: u16 = data.read_at(0)?;
        let x: i16 = data.read_at(2)?;
        let y: i16 = data.read_at(4)?;
        Ok(Anchor {
            x,
            y,
            has_device_or_variation: format == 3,
        })
    }
}

/// A single pair-positioning (format 1) glyph pair and its two value
/// records, resolved via [`super::layout_common::ValueRecord::read`] against
/// the enclosing subtable's `valueFormat1`/`valueFormat2`.
pub struct PairSet<'a> {
    data: FontData<'a>,
    count: u16,
    value_format1: u16,
    value_format2: u16,
}

impl<'a> PairSet<'a> {
    pub fn read(data: FontData<'a>, value_format1: u16, value_format2: u16) -> Result<Self> {
        Ok(PairSet {
            count: data.read_at(0)?,
            data,
            value_format1,
            value_format2,
        })
    }

    pub fn len(&self) -> u16 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `(second_glyph, value1, value2)` for pair record `index`.
    pub fn get(
        &self,
        index: u16,
    ) -> Result<Option<(u16, super::layout_common::ValueRecord, super::layout_common::ValueRecord)>> {
        if index >= self.count {
            return Ok(None);
        }
        let rec1_size = super::layout_common::ValueRecord::size(self.value_format1);
        let rec2_size = super::layout_common::ValueRecord::size(self.value_format2);
        let record_size = 2 + rec1_size + rec2_size;
        let base = 2 + index as usize * record_size;
        let second_glyph: u16 = self.data.read_at(base)?;
        let value1 = super::layout_common::ValueRecord::read(&self.data, base + 2, self.value_format1)?;
        let value2 =
            super::layout_common::ValueRecord::read(&self.data, base + 2 + rec1_size, self.value_format2)?;
        Ok(Some((second_glyph, value1, value2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_gpos() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
        b.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
        b.extend_from_slice(&10u16.to_be_bytes()); // scriptListOffset
        b.extend_from_slice(&12u16.to_be_bytes()); // featureListOffset (empty list)
        b.extend_from_slice(&14u16.to_be_bytes()); // lookupListOffset (empty list)
        // scriptList: count=0
        b.extend_from_slice(&0u16.to_be_bytes());
        // featureList: count=0
        b.extend_from_slice(&0u16.to_be_bytes());
        // lookupList: count=0
        b.extend_from_slice(&0u16.to_be_bytes());
        b
    }

    #[test]
    fn reads_empty_lists() {
        let bytes = minimal_gpos();
        let gpos = Gpos::read(FontData::new(&bytes)).unwrap();
        assert!(gpos.scripts().unwrap().is_empty());
        assert!(gpos.features().unwrap().is_empty());
        assert!(gpos.lookups().unwrap().is_empty());
        assert!(!gpos.has_feature_variations());
    }

    #[test]
    fn pair_set_single_field_value_records() {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes()); // pairValueCount
        b.extend_from_slice(&9u16.to_be_bytes()); // secondGlyph
        b.extend_from_slice(&(-50i16).to_be_bytes()); // value1.xAdvance
        let pair_set = PairSet::read(FontData::new(&b), X_ADVANCE_FORMAT, 0).unwrap();
        let (gid, v1, v2) = pair_set.get(0).unwrap().unwrap();
        assert_eq!(gid, 9);
        assert_eq!(v1.x_advance, -50);
        assert_eq!(v2, Default::default());
    }

    const X_ADVANCE_FORMAT: u16 = super::super::layout_common::X_ADVANCE;
}
