//! The `cmap` table: https://learn.microsoft.com/en-us/typography/opentype/spec/cmap
//!
//! Only the subtable formats seen in the wild for Unicode lookup are
//! implemented: 0 (byte encoding), 4 (segment mapping), 6 (trimmed table),
//! 10 (trimmed array), 12 (segmented coverage) and 13 (many-to-one range
//! mapping, used for last-resort fonts). Subtable selection prefers, in
//! order, `(3, 10)`, `(0, *)`, `(3, 1)`, `(0, 4)`.

use font_types::{GlyphId, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"cmap");

#[derive(Clone, Copy)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    num_tables: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub subtable_offset: u32,
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _version: u16 = data.read_at(0)?;
        let num_tables: u16 = data.read_at(2)?;
        Ok(Cmap { data, num_tables })
    }
}

impl<'a> Cmap<'a> {
    pub fn encoding_records(&self) -> Vec<EncodingRecord> {
        (0..self.num_tables as usize)
            .filter_map(|i| {
                let base = 4 + i * 8;
                Some(EncodingRecord {
                    platform_id: self.data.read_at(base).ok()?,
                    encoding_id: self.data.read_at(base + 2).ok()?,
                    subtable_offset: self.data.read_at(base + 4).ok()?,
                })
            })
            .collect()
    }

    pub fn subtable(&self, record: &EncodingRecord) -> Result<CmapSubtable<'a>> {
        let bytes = self
            .data
            .split_off(record.subtable_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        CmapSubtable::read(bytes)
    }

    /// The best Unicode-lookup subtable, by the preference order documented
    /// on the module.
    pub fn best_unicode_subtable(&self) -> Option<CmapSubtable<'a>> {
        let records = self.encoding_records();
        const PREFERENCE: &[(u16, Option<u16>)] =
            &[(3, Some(10)), (0, None), (3, Some(1)), (0, Some(4))];
        for (platform, encoding) in PREFERENCE {
            if let Some(r) = records.iter().find(|r| {
                r.platform_id == *platform && encoding.map(|e| e == r.encoding_id).unwrap_or(true)
            }) {
                if let Ok(sub) = self.subtable(r) {
                    return Some(sub);
                }
            }
        }
        None
    }

    /// `char` -> `GlyphId`, using [`best_unicode_subtable`].
    pub fn map_codepoint(&self, cp: u32) -> Option<GlyphId> {
        self.best_unicode_subtable()?.map_codepoint(cp)
    }
}

#[derive(Clone, Copy)]
pub enum CmapSubtable<'a> {
    Format0(FontData<'a>),
    Format4(FontData<'a>),
    Format6(FontData<'a>),
    Format10(FontData<'a>),
    Format12(FontData<'a>),
    Format13(FontData<'a>),
}

impl<'a> CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => Ok(CmapSubtable::Format0(data)),
            4 => Ok(CmapSubtable::Format4(data)),
            6 => Ok(CmapSubtable::Format6(data)),
            10 => Ok(CmapSubtable::Format10(data)),
            12 => Ok(CmapSubtable::Format12(data)),
            13 => Ok(CmapSubtable::Format13(data)),
            other => Err(ReadError::UnsupportedVersion(TAG, other as u32)),
        }
    }

    pub fn map_codepoint(&self, cp: u32) -> Option<GlyphId> {
        match self {
            CmapSubtable::Format0(d) => {
                if cp > 255 {
                    return None;
                }
                let gid: u8 = d.read_at(6 + cp as usize).ok()?;
                (gid != 0).then(|| GlyphId::new(gid as u16))
            }
            CmapSubtable::Format4(d) => map_format4(*d, cp),
            CmapSubtable::Format6(d) => {
                let first: u16 = d.read_at(6).ok()?;
                let count: u16 = d.read_at(8).ok()?;
                let cp = cp as u16;
                if cp < first || cp >= first.wrapping_add(count) {
                    return None;
                }
                let idx = (cp - first) as usize;
                let gid: u16 = d.read_at(10 + idx * 2).ok()?;
                (gid != 0).then(|| GlyphId::new(gid))
            }
            CmapSubtable::Format10(d) => {
                let first: u32 = d.read_at(12).ok()?;
                let count: u32 = d.read_at(16).ok()?;
                if cp < first || cp >= first.wrapping_add(count) {
                    return None;
                }
                let idx = (cp - first) as usize;
                let gid: u16 = d.read_at(20 + idx * 2).ok()?;
                (gid != 0).then(|| GlyphId::new(gid))
            }
            CmapSubtable::Format12(d) => map_format12_13(*d, cp, false),
            CmapSubtable::Format13(d) => map_format12_13(*d, cp, true),
        }
    }

    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format0(_) => 0,
            CmapSubtable::Format4(_) => 4,
            CmapSubtable::Format6(_) => 6,
            CmapSubtable::Format10(_) => 10,
            CmapSubtable::Format12(_) => 12,
            CmapSubtable::Format13(_) => 13,
        }
    }
}

fn map_format4(d: FontData<'_>, cp: u32) -> Option<GlyphId> {
    if cp > 0xFFFF {
        return None;
    }
    let cp = cp as u16;
    let seg_count_x2: u16 = d.read_at(6).ok()?;
    let seg_count = (seg_count_x2 / 2) as usize;
    let end_codes_off = 14;
    let start_codes_off = end_codes_off + seg_count * 2 + 2; // +2 to skip reservedPad
    let id_deltas_off = start_codes_off + seg_count * 2;
    let id_range_offsets_off = id_deltas_off + seg_count * 2;

    for seg in 0..seg_count {
        let end_code: u16 = d.read_at(end_codes_off + seg * 2).ok()?;
        if cp > end_code {
            continue;
        }
        let start_code: u16 = d.read_at(start_codes_off + seg * 2).ok()?;
        if cp < start_code {
            return None;
        }
        let id_delta: i16 = d.read_at(id_deltas_off + seg * 2).ok()?;
        let id_range_offset: u16 = d.read_at(id_range_offsets_off + seg * 2).ok()?;
        if id_range_offset == 0 {
            let gid = (cp as i32 + id_delta as i32) as u16;
            return (gid != 0).then(|| GlyphId::new(gid));
        }
        let glyph_id_addr =
            id_range_offsets_off + seg * 2 + id_range_offset as usize + (cp - start_code) as usize * 2;
        let gid: u16 = d.read_at(glyph_id_addr).ok()?;
        if gid == 0 {
            return None;
        }
        let gid = (gid as i32 + id_delta as i32) as u16;
        return (gid != 0).then(|| GlyphId::new(gid));
    }
    None
}

fn map_format12_13(d: FontData<'_>, cp: u32, is_many_to_one: bool) -> Option<GlyphId> {
    let num_groups: u32 = d.read_at(12).ok()?;
    for i in 0..num_groups as usize {
        let base = 16 + i * 12;
        let start_char: u32 = d.read_at(base).ok()?;
        let end_char: u32 = d.read_at(base + 4).ok()?;
        if cp < start_char || cp > end_char {
            continue;
        }
        let start_glyph: u32 = d.read_at(base + 8).ok()?;
        let gid = if is_many_to_one {
            start_glyph
        } else {
            start_glyph + (cp - start_char)
        };
        return u16::try_from(gid).ok().map(GlyphId::new);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format4_identity(pairs: &[(u16, u16)]) -> Vec<u8> {
        // One segment per input pair plus the mandatory terminating 0xFFFF segment.
        let mut segs: Vec<(u16, u16, i16, u16)> = pairs
            .iter()
            .map(|&(c, g)| (c, c, g as i16 - c as i16, 0))
            .collect();
        segs.push((0xFFFF, 0xFFFF, 1, 0));
        let seg_count = segs.len();
        let mut b = Vec::new();
        b.extend_from_slice(&4u16.to_be_bytes()); // format
        b.extend_from_slice(&0u16.to_be_bytes()); // length (unused by reader)
        b.extend_from_slice(&0u16.to_be_bytes()); // language
        b.extend_from_slice(&((seg_count * 2) as u16).to_be_bytes());
        b.extend_from_slice(&0u16.to_be_bytes()); // searchRange
        b.extend_from_slice(&0u16.to_be_bytes()); // entrySelector
        b.extend_from_slice(&0u16.to_be_bytes()); // rangeShift
        for s in &segs {
            b.extend_from_slice(&s.1.to_be_bytes()); // endCode
        }
        b.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
        for s in &segs {
            b.extend_from_slice(&s.0.to_be_bytes()); // startCode
        }
        for s in &segs {
            b.extend_from_slice(&s.2.to_be_bytes()); // idDelta
        }
        for s in &segs {
            b.extend_from_slice(&s.3.to_be_bytes()); // idRangeOffset
        }
        b
    }

    #[test]
    fn format4_maps_codepoints() {
        let bytes = format4_identity(&[(65, 10), (66, 11), (67, 12)]);
        let sub = CmapSubtable::read(FontData::new(&bytes)).unwrap();
        assert_eq!(sub.map_codepoint(65), Some(GlyphId::new(10)));
        assert_eq!(sub.map_codepoint(67), Some(GlyphId::new(12)));
        assert_eq!(sub.map_codepoint(68), None);
    }

    #[test]
    fn format12_maps_ranges() {
        let mut b = Vec::new();
        b.extend_from_slice(&12u16.to_be_bytes());
        b.extend_from_slice(&0u16.to_be_bytes()); // reserved
        b.extend_from_slice(&0u32.to_be_bytes()); // length
        b.extend_from_slice(&0u32.to_be_bytes()); // language
        b.extend_from_slice(&1u32.to_be_bytes()); // numGroups
        b.extend_from_slice(&0x1F600u32.to_be_bytes());
        b.extend_from_slice(&0x1F60Fu32.to_be_bytes());
        b.extend_from_slice(&500u32.to_be_bytes());
        let sub = CmapSubtable::read(FontData::new(&b)).unwrap();
        assert_eq!(sub.map_codepoint(0x1F605), Some(GlyphId::new(505)));
        assert_eq!(sub.map_codepoint(0x1F610), None);
    }

    #[test]
    fn chooses_preferred_subtable() {
        let mut b = Vec::new();
        b.extend_from_slice(&0u16.to_be_bytes());
        b.extend_from_slice(&1u16.to_be_bytes()); // one encoding record
        let sub_offset = 4 + 8u32;
        b.extend_from_slice(&3u16.to_be_bytes()); // platform 3
        b.extend_from_slice(&1u16.to_be_bytes()); // encoding 1 (BMP)
        b.extend_from_slice(&sub_offset.to_be_bytes());
        b.extend_from_slice(&format4_identity(&[(65, 1)]));
        let cmap = Cmap::read(FontData::new(&b)).unwrap();
        assert_eq!(cmap.map_codepoint(65), Some(GlyphId::new(1)));
    }
}
