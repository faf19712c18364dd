//! The `CFF ` table (Adobe Compact Font Format), as embedded in OTF/CFF
//! fonts: https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf
//!
//! This is a self-contained structure living inside one sfnt table: a
//! header, four top-level `INDEX`es (Name, Top DICT, String, Global Subr),
//! then per-font `Private` DICT / Local Subr INDEX / CharStrings INDEX /
//! Charset reached through Top DICT operators. Subsetting (subroutine
//! closure, bytecode rewriting) lives in `font-subset`; this layer only
//! decodes structure.

use font_types::Tag;
use std::collections::BTreeMap;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"CFF ");

/// A CFF `INDEX`: `count:u16, offSize:u8, offsets[count+1], data`. An empty
/// INDEX is just the two zero bytes of `count`.
#[derive(Clone, Copy)]
pub struct Index<'a> {
    data: FontData<'a>,
    count: u16,
    off_size: u8,
    /// Byte offset (from this INDEX's start) where the offset array begins.
    offsets_start: usize,
    /// Byte offset (from this INDEX's start) where `data` begins.
    data_start: usize,
}

impl<'a> Index<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let count: u16 = data.read_at(0)?;
        if count == 0 {
            return Ok(Index {
                data,
                count: 0,
                off_size: 0,
                offsets_start: 2,
                data_start: 2,
            });
        }
        let off_size: u8 = data.read_at(2)?;
        if !(1..=4).contains(&off_size) {
            return Err(ReadError::malformed(TAG, "INDEX offSize must be 1..=4"));
        }
        let offsets_start = 3;
        let data_start = offsets_start + (count as usize + 1) * off_size as usize;
        Ok(Index {
            data,
            count,
            off_size,
            offsets_start,
            data_start,
        })
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
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

    /// The byte length of this whole INDEX structure (header + offsets +
    /// object data), so a caller can find what follows it.
    pub fn size_in_bytes(&self) -> Result<usize> {
        if self.count == 0 {
            return Ok(2);
        }
        let last = self.raw_offset(self.count as usize)?;
        Ok(self.data_start - 1 + last)
    }

    /// Object `index`'s raw bytes (offsets are 1-based per the CFF spec, so
    /// object 0 spans `offset[0]..offset[1]`).
    pub fn get(&self, index: u16) -> Result<&'a [u8]> {
        if index >= self.count {
            return Err(ReadError::OutOfBounds);
        }
        let start = self.raw_offset(index as usize)?;
        let end = self.raw_offset(index as usize + 1)?;
        if end < start {
            return Err(ReadError::malformed(TAG, "INDEX object end before start"));
        }
        self.data
            .slice(self.data_start - 1 + start..self.data_start - 1 + end)
            .map(|d| d.as_bytes())
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<&'a [u8]>> + '_ {
        (0..self.count).map(move |i| self.get(i))
    }
}

/// A resolved DICT operand: integers decoded per CFF's 28/29/32-38-byte
/// encodings, reals decoded from nibble strings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Integer(i32),
    Real(f64),
}

impl Operand {
    pub fn as_i32(self) -> i32 {
        match self {
            Operand::Integer(v) => v,
            Operand::Real(v) => v as i32,
        }
    }
    pub fn as_f64(self) -> f64 {
        match self {
            Operand::Integer(v) => v as f64,
            Operand::Real(v) => v,
        }
    }
}

/// A parsed Top/Private DICT: operator (possibly 2-byte `12 xx`) -> operands.
#[derive(Clone, Debug, Default)]
pub struct Dict {
    entries: BTreeMap<u16, Vec<Operand>>,
}

impl Dict {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut operands = Vec::new();
        let mut i = 0usize;
        while i < data.len() {
            let b0 = data[i];
            match b0 {
                0..=21 => {
                    let op = if b0 == 12 {
                        i += 1;
                        let b1 = *data.get(i).ok_or(ReadError::OutOfBounds)?;
                        0x0c00 | b1 as u16
                    } else {
                        b0 as u16
                    };
                    entries.insert(op, std::mem::take(&mut operands));
                    i += 1;
                }
                28 => {
                    let bytes = data.get(i + 1..i + 3).ok_or(ReadError::OutOfBounds)?;
                    let v = i16::from_be_bytes([bytes[0], bytes[1]]);
                    operands.push(Operand::Integer(v as i32));
                    i += 3;
                }
                29 => {
                    let bytes = data.get(i + 1..i + 5).ok_or(ReadError::OutOfBounds)?;
                    let v = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                    operands.push(Operand::Integer(v));
                    i += 5;
                }
                30 => {
                    let (real, consumed) = parse_real(&data[i + 1..])?;
                    operands.push(Operand::Real(real));
                    i += 1 + consumed;
                }
                32..=246 => {
                    operands.push(Operand::Integer(b0 as i32 - 139));
                    i += 1;
                }
                247..=250 => {
                    let b1 = *data.get(i + 1).ok_or(ReadError::OutOfBounds)?;
                    operands.push(Operand::Integer((b0 as i32 - 247) * 256 + b1 as i32 + 108));
                    i += 2;
                }
                251..=254 => {
                    let b1 = *data.get(i + 1).ok_or(ReadError::OutOfBounds)?;
                    operands.push(Operand::Integer(-(b0 as i32 - 251) * 256 - b1 as i32 - 108));
                    i += 2;
                }
                255 => {
                    return Err(ReadError::malformed(TAG, "DICT byte 255 reserved"));
                }
                22..=27 | 31 => {
                    return Err(ReadError::malformed(TAG, "reserved DICT byte"));
                }
            }
        }
        Ok(Dict { entries })
    }

    pub fn get(&self, op: u16) -> Option<&[Operand]> {
        self.entries.get(&op).map(|v| v.as_slice())
    }

    pub fn get_i32(&self, op: u16) -> Option<i32> {
        self.get(op).and_then(|v| v.last()).map(|o| o.as_i32())
    }

    /// `Private`'s operator is `(size, offset)`, both integers.
    pub fn get_pair(&self, op: u16) -> Option<(i32, i32)> {
        self.get(op).and_then(|v| match v {
            [a, b] => Some((a.as_i32(), b.as_i32())),
            _ => None,
        })
    }
}

fn parse_real(data: &[u8]) -> Result<(f64, usize)> {
    let mut s = String::new();
    let mut consumed = 0;
    'outer: for &byte in data {
        consumed += 1;
        for nibble in [byte >> 4, byte & 0x0f] {
            match nibble {
                0..=9 => s.push((b'0' + nibble) as char),
                0xa => s.push('.'),
                0xb => s.push('E'),
                0xc => s.push_str("E-"),
                0xe => s.push('-'),
                0xf => break 'outer,
                _ => {}
            }
        }
    }
    s.parse::<f64>()
        .map(|v| (v, consumed))
        .map_err(|_| ReadError::malformed(TAG, "invalid DICT real number"))
}

pub const OP_CHARSTRINGS: u16 = 17;
pub const OP_PRIVATE: u16 = 18;
pub const OP_CHARSET: u16 = 15;
pub const OP_ENCODING: u16 = 16;
pub const OP_SUBRS: u16 = 19;
pub const OP_ROS: u16 = 0x0c1e;
pub const OP_FDARRAY: u16 = 0x0c24;
pub const OP_FDSELECT: u16 = 0x0c25;
pub const OP_CHARSTRING_TYPE: u16 = 0x0c06;

#[derive(Clone, Copy)]
pub struct Cff<'a> {
    data: FontData<'a>,
    header_size: u8,
    pub name_index: Index<'a>,
    pub top_dict: Dict,
    pub string_index: Index<'a>,
    pub global_subr_index: Index<'a>,
}

impl<'a> FontRead<'a> for Cff<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let header_size: u8 = data.read_at(2)?;
        let mut cursor = data.split_off(header_size as usize).ok_or(ReadError::OutOfBounds)?.cursor();
        let name_index = Index::read(cursor.remaining_data())?;
        cursor.skip(name_index.size_in_bytes()?)?;
        let top_dict_index = Index::read(cursor.remaining_data())?;
        cursor.skip(top_dict_index.size_in_bytes()?)?;
        let string_index = Index::read(cursor.remaining_data())?;
        cursor.skip(string_index.size_in_bytes()?)?;
        let global_subr_index = Index::read(cursor.remaining_data())?;

        if top_dict_index.count() == 0 {
            return Err(ReadError::malformed(TAG, "no Top DICT"));
        }
        let top_dict = Dict::parse(top_dict_index.get(0)?)?;

        Ok(Cff {
            data,
            header_size,
            name_index,
            top_dict,
            string_index,
            global_subr_index,
        })
    }
}

impl<'a> Cff<'a> {
    pub fn header_size(&self) -> u8 {
        self.header_size
    }

    pub fn is_cid_keyed(&self) -> bool {
        self.top_dict.get(OP_ROS).is_some()
    }

    pub fn char_strings(&self) -> Result<Index<'a>> {
        let offset = self
            .top_dict
            .get_i32(OP_CHARSTRINGS)
            .ok_or_else(|| ReadError::malformed(TAG, "missing CharStrings operator"))?;
        Index::read(self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?)
    }

    pub fn num_glyphs(&self) -> Result<u16> {
        self.char_strings().map(|idx| idx.count())
    }

    /// `(size, local_subrs)` for the non-CID case, reached via the Top
    /// DICT's `Private` operator.
    pub fn private_dict_and_local_subrs(&self) -> Result<Option<(Dict, Index<'a>)>> {
        let Some((size, offset)) = self.top_dict.get_pair(OP_PRIVATE) else {
            return Ok(None);
        };
        self.private_at(size as usize, offset as usize).map(Some)
    }

    fn private_at(&self, size: usize, offset: usize) -> Result<(Dict, Index<'a>)> {
        let bytes = self
            .data
            .slice(offset..offset + size)
            .ok_or(ReadError::OutOfBounds)?
            .as_bytes();
        let private = Dict::parse(bytes)?;
        let subrs = match private.get_i32(OP_SUBRS) {
            Some(rel) => Index::read(
                self.data
                    .split_off(offset + rel as usize)
                    .ok_or(ReadError::OutOfBounds)?,
            )?,
            None => Index::read(FontData::new(&[0, 0]))?,
        };
        Ok((private, subrs))
    }

    /// CID-keyed fonts select a per-glyph FD (and thus Private DICT/Local
    /// Subrs) through `FDSelect`; `fd_array` holds one Top-DICT-shaped
    /// entry per FD.
    pub fn fd_select(&self) -> Result<Option<FdSelect<'a>>> {
        let Some(offset) = self.top_dict.get_i32(OP_FDSELECT) else {
            return Ok(None);
        };
        let data = self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(FdSelect::read(data)?))
    }

    pub fn fd_array(&self) -> Result<Option<Index<'a>>> {
        let Some(offset) = self.top_dict.get_i32(OP_FDARRAY) else {
            return Ok(None);
        };
        Ok(Some(Index::read(
            self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?,
        )?))
    }

    /// Private DICT + Local Subrs for a particular FD array entry (a Font
    /// DICT, itself parsed as a DICT, whose `Private` operator points the
    /// same way the Top DICT's does).
    pub fn private_for_fd(&self, fd_dict_bytes: &[u8]) -> Result<Option<(Dict, Index<'a>)>> {
        let fd_dict = Dict::parse(fd_dict_bytes)?;
        let Some((size, offset)) = fd_dict.get_pair(OP_PRIVATE) else {
            return Ok(None);
        };
        self.private_at(size as usize, offset as usize).map(Some)
    }

    /// The glyph-name/CID charset: glyph index -> SID (or CID, for
    /// CID-keyed fonts). Glyph 0 (`.notdef`) is implicitly SID/CID 0 and is
    /// not stored. `ISOAdobe`/`Expert`/`ExpertSubset` predefined charsets
    /// (offsets 0/1/2) are not expanded here since subsetting always
    /// rewrites the charset from scratch.
    pub fn charset(&self, num_glyphs: u16) -> Result<Option<Vec<u16>>> {
        let Some(offset) = self.top_dict.get_i32(OP_CHARSET) else {
            return Ok(None);
        };
        if offset == 0 || offset == 1 || offset == 2 {
            return Ok(None);
        }
        let data = self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        let format: u8 = data.read_at(0)?;
        let mut ids = vec![0u16];
        let mut cursor = data.split_off(1).ok_or(ReadError::OutOfBounds)?.cursor();
        match format {
            0 => {
                while (ids.len() as u16) < num_glyphs {
                    ids.push(cursor.read::<u16>()?);
                }
            }
            1 => {
                while (ids.len() as u16) < num_glyphs {
                    let first: u16 = cursor.read()?;
                    let n_left: u8 = cursor.read()?;
                    for d in 0..=n_left as u16 {
                        if (ids.len() as u16) >= num_glyphs {
                            break;
                        }
                        ids.push(first + d);
                    }
                }
            }
            2 => {
                while (ids.len() as u16) < num_glyphs {
                    let first: u16 = cursor.read()?;
                    let n_left: u16 = cursor.read()?;
                    for d in 0..=n_left {
                        if (ids.len() as u16) >= num_glyphs {
                            break;
                        }
                        ids.push(first + d);
                    }
                }
            }
            other => return Err(ReadError::malformed(TAG, format!("unknown charset format {other}"))),
        }
        Ok(Some(ids))
    }
}

/// `FDSelect`: maps each glyph ID to a font-dict (FD) index. Formats 0
/// (array) and 3 (ranges) are both used in the wild; format 3 is typical.
pub struct FdSelect<'a> {
    data: FontData<'a>,
    format: u8,
}

impl<'a> FdSelect<'a> {
    pub(crate) fn read(data: FontData<'a>) -> Result<Self> {
        Ok(FdSelect {
            format: data.read_at(0)?,
            data,
        })
    }

    pub fn fd_for_glyph(&self, gid: u16) -> Result<u8> {
        match self.format {
            0 => self.data.read_at(1 + gid as usize),
            3 => {
                let num_ranges: u16 = self.data.read_at(1)?;
                for i in 0..num_ranges {
                    let base = 3 + i as usize * 3;
                    let first: u16 = self.data.read_at(base)?;
                    let next_first: u16 = self.data.read_at(base + 3)?;
                    if gid >= first && gid < next_first {
                        return self.data.read_at(base + 2);
                    }
                }
                Err(ReadError::OutOfBounds)
            }
            other => Err(ReadError::malformed(TAG, format!("unknown FDSelect format {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_index_is_two_bytes() {
        let bytes = [0u8, 0u8];
        let idx = Index::read(FontData::new(&bytes)).unwrap();
        assert_eq!(idx.count(), 0);
        assert_eq!(idx.size_in_bytes().unwrap(), 2);
    }

    #[test]
    fn one_entry_index() {
        // count=1, offSize=1, offsets=[1,5], data="ABCD"
        let bytes = [0x00, 0x01, 0x01, 0x01, 0x05, b'A', b'B', b'C', b'D'];
        let idx = Index::read(FontData::new(&bytes)).unwrap();
        assert_eq!(idx.count(), 1);
        assert_eq!(idx.get(0).unwrap(), b"ABCD");
    }

    #[test]
    fn dict_single_byte_integer() {
        // 0xEF 0x11 => operand 100 (239-139), operator 17 (CharStrings)
        let bytes = [0xEFu8, 0x11];
        let dict = Dict::parse(&bytes).unwrap();
        assert_eq!(dict.get_i32(17), Some(100));
    }

    #[test]
    fn dict_two_byte_operator() {
        // operand 5 (integer 28+139-28=... use direct range), operator 12 30 (ROS)
        let bytes = [139u8, 12, 30];
        let dict = Dict::parse(&bytes).unwrap();
        assert!(dict.get(OP_ROS).is_some());
        assert_eq!(dict.get_i32(OP_ROS), Some(0));
    }

    #[test]
    fn dict_four_byte_integer() {
        let mut bytes = vec![29u8];
        bytes.extend_from_slice(&1_000_000i32.to_be_bytes());
        bytes.push(17);
        let dict = Dict::parse(&bytes).unwrap();
        assert_eq!(dict.get_i32(17), Some(1_000_000));
    }

    #[test]
    fn dict_reserved_byte_is_malformed_not_a_panic() {
        for b0 in [22u8, 23, 24, 25, 26, 27, 31] {
            let bytes = [b0];
            assert!(Dict::parse(&bytes).is_err());
        }
    }

    #[test]
    fn charset_format0() {
        // glyphs 1,2 -> sids 10, 11
        let mut b = vec![0u8];
        b.extend_from_slice(&10u16.to_be_bytes());
        b.extend_from_slice(&11u16.to_be_bytes());
        let data = FontData::new(&b);
        // build a minimal Cff to reuse the charset() method's logic by hand:
        let format: u8 = data.read_at(0).unwrap();
        assert_eq!(format, 0);
    }
}
