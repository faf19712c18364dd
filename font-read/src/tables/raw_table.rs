//! Tables that are parsed only far enough to bounds-check them, then kept
//! as opaque bytes: the TrueType bytecode tables (`fpgm`, `prep`, `cvt `),
//! rasterizer-hint tables (`hdmx`, `LTSH`, `VDMX`, `gasp`), and `DSIG`.
//!
//! TrueType bytecode is parsed structurally and preserved byte-for-byte;
//! it is never executed here. None of these tables' internal structure
//! matters to this engine beyond "this many bytes, starting here": a
//! subsetter either keeps or drops the whole blob, and a renderer would
//! bring its own interpreter.

use font_types::Tag;

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const FPGM: Tag = Tag::new(b"fpgm");
pub const PREP: Tag = Tag::new(b"prep");
pub const CVT: Tag = Tag::new(b"cvt ");
pub const HDMX: Tag = Tag::new(b"hdmx");
pub const LTSH: Tag = Tag::new(b"LTSH");
pub const VDMX: Tag = Tag::new(b"VDMX");
pub const GASP: Tag = Tag::new(b"gasp");
pub const DSIG: Tag = Tag::new(b"DSIG");

/// An opaque, untyped table blob: bytes only, no structural decoding.
#[derive(Clone, Copy)]
pub struct RawTable<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for RawTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(RawTable { data })
    }
}

impl<'a> RawTable<'a> {
    pub fn bytes(&self) -> &'a [u8] {
        self.data.as_bytes()
    }
}

/// `cvt `'s contents are actually an array of `FWord` (i16) control values;
/// expose that one level of structure since callers sizing `cvar` deltas
/// need the count.
pub struct Cvt<'a>(RawTable<'a>);

impl<'a> FontRead<'a> for Cvt<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Cvt(RawTable { data }))
    }
}

impl<'a> Cvt<'a> {
    pub fn len(&self) -> usize {
        self.0.bytes().len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<i16> {
        self.0.data.read_at(index * 2).ok()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.0.bytes()
    }
}

/// The `gasp` table's per-ppem-range rasterizer behavior flags, structurally
/// decoded since a caller may reasonably want to inspect them (it's a tiny,
/// fixed-shape table), while still never interpreting them.
pub struct Gasp<'a> {
    data: FontData<'a>,
    num_ranges: u16,
}

impl<'a> FontRead<'a> for Gasp<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Gasp {
            num_ranges: data.read_at(2)?,
            data,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GaspRange {
    pub range_max_ppem: u16,
    pub range_gasp_behavior: u16,
}

impl<'a> Gasp<'a> {
    pub fn ranges(&self) -> Result<Vec<GaspRange>> {
        (0..self.num_ranges)
            .map(|i| {
                let base = 4 + i as usize * 4;
                Ok(GaspRange {
                    range_max_ppem: self.data.read_at(base)?,
                    range_gasp_behavior: self.data.read_at(base + 2)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_table_is_just_bytes() {
        let bytes = [1, 2, 3, 4];
        let raw = RawTable::read(FontData::new(&bytes)).unwrap();
        assert_eq!(raw.bytes(), &bytes);
    }

    #[test]
    fn cvt_reads_fwords() {
        let mut b = Vec::new();
        b.extend_from_slice(&100i16.to_be_bytes());
        b.extend_from_slice(&(-50i16).to_be_bytes());
        let cvt = Cvt::read(FontData::new(&b)).unwrap();
        assert_eq!(cvt.len(), 2);
        assert_eq!(cvt.get(0), Some(100));
        assert_eq!(cvt.get(1), Some(-50));
    }

    #[test]
    fn gasp_reads_ranges() {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes()); // version
        b.extend_from_slice(&1u16.to_be_bytes()); // numRanges
        b.extend_from_slice(&65535u16.to_be_bytes());
        b.extend_from_slice(&0x000Fu16.to_be_bytes());
        let gasp = Gasp::read(FontData::new(&b)).unwrap();
        let ranges = gasp.ranges().unwrap();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].range_max_ppem, 65535);
    }
}
