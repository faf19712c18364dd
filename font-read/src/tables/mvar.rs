//! The `MVAR` table: https://learn.microsoft.com/en-us/typography/opentype/spec/mvar
//!
//! Variation deltas for font-wide metrics (e.g. `hhea`'s ascender, `os/2`'s
//! x-height) that aren't per-glyph, keyed by 4-byte value tags.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

use super::ivs::ItemVariationStore;

pub const TAG: Tag = Tag::new(b"MVAR");

#[derive(Clone, Copy)]
pub struct ValueRecord {
    pub value_tag: Tag,
    pub outer_index: u16,
    pub inner_index: u16,
}

#[derive(Clone, Copy)]
pub struct Mvar<'a> {
    data: FontData<'a>,
    value_record_size: u16,
    value_record_count: u16,
    item_variation_store_offset: u32,
}

impl<'a> FontRead<'a> for Mvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Mvar {
            data,
            value_record_size: data.read_at(6)?,
            value_record_count: data.read_at(8)?,
            item_variation_store_offset: data.read_at(10)?,
        })
    }
}

impl<'a> Mvar<'a> {
    pub fn item_variation_store(&self) -> Result<Option<ItemVariationStore<'a>>> {
        if self.item_variation_store_offset == 0 {
            return Ok(None);
        }
        let data = self
            .data
            .split_off(self.item_variation_store_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(ItemVariationStore::read(data)?))
    }

    pub fn value_records(&self) -> Result<Vec<ValueRecord>> {
        let mut out = Vec::with_capacity(self.value_record_count as usize);
        for i in 0..self.value_record_count as usize {
            let base = 14 + i * self.value_record_size as usize;
            out.push(ValueRecord {
                value_tag: Tag::from_be_bytes(self.data.read_at::<u32>(base)?.to_be_bytes()),
                outer_index: self.data.read_at(base + 4)?,
                inner_index: self.data.read_at(base + 6)?,
            });
        }
        Ok(out)
    }

    /// The `(outer, inner)` delta-set indices for `tag`, if `MVAR` varies it.
    pub fn value_mapping(&self, tag: Tag) -> Result<Option<(u16, u16)>> {
        Ok(self
            .value_records()?
            .into_iter()
            .find(|r| r.value_tag == tag)
            .map(|r| (r.outer_index, r.inner_index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut b = vec![0u8; 14];
        b[0..2].copy_from_slice(&1u16.to_be_bytes());
        b[6..8].copy_from_slice(&8u16.to_be_bytes()); // valueRecordSize
        b[8..10].copy_from_slice(&1u16.to_be_bytes()); // valueRecordCount
        b[10..14].copy_from_slice(&0u32.to_be_bytes()); // ivs offset 0 for this test
        b.extend_from_slice(b"xhgt");
        b.extend_from_slice(&0u16.to_be_bytes()); // outerIndex
        b.extend_from_slice(&3u16.to_be_bytes()); // innerIndex
        b
    }

    #[test]
    fn finds_value_record_by_tag() {
        let bytes = sample();
        let mvar = Mvar::read(FontData::new(&bytes)).unwrap();
        assert_eq!(mvar.value_mapping(Tag::new(b"xhgt")).unwrap(), Some((0, 3)));
        assert_eq!(mvar.value_mapping(Tag::new(b"asc ")).unwrap(), None);
    }
}
