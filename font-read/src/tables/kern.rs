//! The legacy `kern` table (OpenType's non-`GPOS` kerning table).
//! https://learn.microsoft.com/en-us/typography/opentype/spec/kern
//!
//! Only format 0 (ordered glyph-pair kerning) is implemented; it's the only
//! format seen outside AAT fonts.

use font_types::{GlyphId, Tag};

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"kern");

#[derive(Clone, Copy)]
pub struct Kern<'a> {
    data: FontData<'a>,
    n_tables: u16,
}

impl<'a> FontRead<'a> for Kern<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _version: u16 = data.read_at(0)?;
        let n_tables: u16 = data.read_at(2)?;
        Ok(Kern { data, n_tables })
    }
}

impl<'a> Kern<'a> {
    pub fn subtables(&self) -> Vec<KernSubtable<'a>> {
        let mut out = Vec::new();
        let mut offset = 4usize;
        for _ in 0..self.n_tables {
            let Ok(length): Result<u16> = self.data.read_at(offset + 2) else {
                break;
            };
            let Ok(coverage): Result<u16> = self.data.read_at(offset + 4) else {
                break;
            };
            if let Some(bytes) = self.data.slice(offset..offset + length as usize) {
                out.push(KernSubtable {
                    coverage,
                    data: bytes,
                });
            }
            offset += length as usize;
        }
        out
    }

    /// Horizontal kerning between `left` and `right`, summed across every
    /// format-0 subtable marked horizontal (the common case).
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> i16 {
        self.subtables()
            .iter()
            .filter(|s| s.is_horizontal())
            .filter_map(|s| s.pair_value(left, right))
            .sum()
    }
}

#[derive(Clone, Copy)]
pub struct KernSubtable<'a> {
    coverage: u16,
    data: FontData<'a>,
}

impl<'a> KernSubtable<'a> {
    pub fn is_horizontal(&self) -> bool {
        self.coverage & 0x1 != 0
    }

    pub fn format(&self) -> u8 {
        (self.coverage >> 8) as u8
    }

    pub fn pair_value(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        if self.format() != 0 {
            return None;
        }
        let n_pairs: u16 = self.data.read_at(6).ok()?;
        // Binary search, per format 0's sorted (left, right) key order.
        let key = ((left.to_u16() as u32) << 16) | right.to_u16() as u32;
        let mut lo = 0usize;
        let mut hi = n_pairs as usize;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let base = 14 + mid * 6;
            let pair_left: u16 = self.data.read_at(base).ok()?;
            let pair_right: u16 = self.data.read_at(base + 2).ok()?;
            let pair_key = ((pair_left as u32) << 16) | pair_right as u32;
            match pair_key.cmp(&key) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return self.data.read_at(base + 4).ok(),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format0_table(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
        let mut sub = Vec::new();
        sub.extend_from_slice(&0u16.to_be_bytes()); // format
        sub.extend_from_slice(&(pairs.len() as u16).to_be_bytes());
        sub.extend_from_slice(&0u16.to_be_bytes()); // searchRange
        sub.extend_from_slice(&0u16.to_be_bytes()); // entrySelector
        sub.extend_from_slice(&0u16.to_be_bytes()); // rangeShift
        for &(l, r, v) in pairs {
            sub.extend_from_slice(&l.to_be_bytes());
            sub.extend_from_slice(&r.to_be_bytes());
            sub.extend_from_slice(&v.to_be_bytes());
        }

        let mut b = Vec::new();
        b.extend_from_slice(&0u16.to_be_bytes()); // version
        b.extend_from_slice(&1u16.to_be_bytes()); // nTables
        b.extend_from_slice(&0u16.to_be_bytes()); // subtable version
        b.extend_from_slice(&((6 + sub.len()) as u16).to_be_bytes()); // length
        b.extend_from_slice(&1u16.to_be_bytes()); // coverage: horizontal, format 0
        b.extend_from_slice(&sub);
        b
    }

    #[test]
    fn looks_up_kerning_pair() {
        let bytes = format0_table(&[(10, 20, -50), (30, 40, 25)]);
        let kern = Kern::read(FontData::new(&bytes)).unwrap();
        assert_eq!(kern.kerning(GlyphId::new(10), GlyphId::new(20)), -50);
        assert_eq!(kern.kerning(GlyphId::new(30), GlyphId::new(40)), 25);
        assert_eq!(kern.kerning(GlyphId::new(1), GlyphId::new(2)), 0);
    }
}
