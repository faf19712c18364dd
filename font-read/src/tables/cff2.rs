//! The `CFF2` table: https://learn.microsoft.com/en-us/typography/opentype/spec/cff2
//!
//! Structurally close to `CFF `, with three differences this module bakes
//! in: `INDEX`es count with a 4-byte field instead of 2-byte, there's no
//! `Encoding`/`Charset` (glyph order is implicit), and a `vstore` operator
//! points at an [`super::ivs::ItemVariationStore`] that `blend` operators in
//! CharStrings reference. Subsetting does not need to re-evaluate `blend`
//! operands; it preserves them.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;
use crate::tables::cff::Dict;
use crate::tables::ivs::ItemVariationStore;

pub const TAG: Tag = Tag::new(b"CFF2");

/// A CFF2 `INDEX`: `count:u32, offSize:u8, offsets[count+1], data`. Unlike
/// CFF1's `Index`, an empty INDEX is the 4 zero bytes of `count` alone (no
/// offSize byte follows when count is 0).
#[derive(Clone, Copy)]
pub struct Index2<'a> {
    data: FontData<'a>,
    count: u32,
    off_size: u8,
    offsets_start: usize,
    data_start: usize,
}

impl<'a> Index2<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let count: u32 = data.read_at(0)?;
        if count == 0 {
            return Ok(Index2 {
                data,
                count: 0,
                off_size: 0,
                offsets_start: 4,
                data_start: 4,
            });
        }
        let off_size: u8 = data.read_at(4)?;
        if !(1..=4).contains(&off_size) {
            return Err(ReadError::malformed(TAG, "INDEX offSize must be 1..=4"));
        }
        let offsets_start = 5;
        let data_start = offsets_start + (count as usize + 1) * off_size as usize;
        Ok(Index2 {
            data,
            count,
            off_size,
            offsets_start,
            data_start,
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    fn raw_offset(&self, i: usize) -> Result<usize> {
        let pos = self.offsets_start + i * self.off_size as usize;
        let mut value: u32 = 0;
        for k in 0..self.off_size as usize {
            let byte: u8 = self.data.read_at(pos + k)?;
            value = (value << 8) | byte as u32;
        }
        Ok(value as usize)
    }

    pub fn size_in_bytes(&self) -> Result<usize> {
        if self.count == 0 {
            return Ok(4);
        }
        let last = self.raw_offset(self.count as usize)?;
        Ok(self.data_start - 1 + last)
    }

    pub fn get(&self, index: u32) -> Result<&'a [u8]> {
        if index >= self.count {
            return Err(ReadError::OutOfBounds);
        }
        let start = self.raw_offset(index as usize)?;
        let end = self.raw_offset(index as usize + 1)?;
        self.data
            .slice(self.data_start - 1 + start..self.data_start - 1 + end)
            .map(|d| d.as_bytes())
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<&'a [u8]>> + '_ {
        (0..self.count).map(move |i| self.get(i))
    }
}

pub const OP_CHARSTRINGS: u16 = 17;
pub const OP_FDARRAY: u16 = 0x0c24;
pub const OP_FDSELECT: u16 = 0x0c25;
/// `vstore`: a single-byte top-level operator unique to CFF2.
pub const OP_VSTORE: u16 = 24;

#[derive(Clone, Copy)]
pub struct Cff2<'a> {
    data: FontData<'a>,
    pub top_dict: Dict,
}

impl<'a> FontRead<'a> for Cff2<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let header_size: u8 = data.read_at(2)?;
        let top_dict_length: u16 = data.read_at(3)?;
        let top_dict_bytes = data
            .slice(header_size as usize..header_size as usize + top_dict_length as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let top_dict = Dict::parse(top_dict_bytes.as_bytes())?;
        Ok(Cff2 { data, top_dict })
    }
}

impl<'a> Cff2<'a> {
    pub fn char_strings(&self) -> Result<Index2<'a>> {
        let offset = self
            .top_dict
            .get_i32(OP_CHARSTRINGS)
            .ok_or_else(|| ReadError::malformed(TAG, "missing CharStrings operator"))?;
        Index2::read(self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?)
    }

    pub fn num_glyphs(&self) -> Result<u32> {
        self.char_strings().map(|idx| idx.count())
    }

    pub fn fd_array(&self) -> Result<Option<Index2<'a>>> {
        let Some(offset) = self.top_dict.get_i32(OP_FDARRAY) else {
            return Ok(None);
        };
        Ok(Some(Index2::read(
            self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?,
        )?))
    }

    pub fn fd_select(&self) -> Result<Option<super::cff::FdSelect<'a>>> {
        let Some(offset) = self.top_dict.get_i32(OP_FDSELECT) else {
            return Ok(None);
        };
        // `FdSelect`'s byte layout (format 0/3) is identical between CFF1
        // and CFF2, so the CFF1 module's reader is reused directly.
        Ok(Some(super::cff::FdSelect::read(
            self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?,
        )?))
    }

    /// The variation store referenced by `blend` operators in CharStrings.
    pub fn item_variation_store(&self) -> Result<Option<ItemVariationStore<'a>>> {
        let Some(offset) = self.top_dict.get_i32(OP_VSTORE) else {
            return Ok(None);
        };
        let data = self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        // The vstore data is a 2-byte length prefix followed by an
        // ItemVariationStore (mirroring how HVAR/MVAR embed it).
        let len: u16 = data.read_at(0)?;
        let _ = len;
        let store_data = data.split_off(2).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(ItemVariationStore::read(store_data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_index2_is_four_bytes() {
        let bytes = [0u8, 0, 0, 0];
        let idx = Index2::read(FontData::new(&bytes)).unwrap();
        assert_eq!(idx.count(), 0);
        assert_eq!(idx.size_in_bytes().unwrap(), 4);
    }

    #[test]
    fn one_entry_index2() {
        let bytes = [0, 0, 0, 1, 0x01, 0x01, 0x05, b'A', b'B', b'C', b'D'];
        let idx = Index2::read(FontData::new(&bytes)).unwrap();
        assert_eq!(idx.count(), 1);
        assert_eq!(idx.get(0).unwrap(), b"ABCD");
    }
}
