//! Rewriting `cmap`.
//!
//! Subsetting only needs to emit a Unicode lookup, so this always builds
//! exactly a `(3, 1)` format 4 subtable for the BMP plus, when any mapped
//! codepoint needs it, a `(3, 10)` format 12 subtable covering the full
//! range. Segments are the contiguous runs of `(codepoint, glyph id)` pairs
//! sharing one `idDelta`, the same greedy grouping `fonttools`' cmap
//! compiler uses.

use font_types::GlyphId;

use crate::write::{FontWrite, TableWriter};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CmapTable {
    /// Sorted, deduplicated by codepoint.
    mappings: Vec<(u32, GlyphId)>,
}

impl CmapTable {
    pub fn from_mappings(mut mappings: Vec<(u32, GlyphId)>) -> Self {
        mappings.sort_unstable_by_key(|&(cp, _)| cp);
        mappings.dedup_by_key(|&mut (cp, _)| cp);
        CmapTable { mappings }
    }
}

impl FontWrite for CmapTable {
    fn write_into(&self, writer: &mut TableWriter) {
        let bmp: Vec<(u16, u16)> = self
            .mappings
            .iter()
            .filter(|&&(cp, _)| cp <= 0xFFFF)
            .map(|&(cp, gid)| (cp as u16, gid.to_u16()))
            .collect();
        let has_supplementary = self.mappings.iter().any(|&(cp, _)| cp > 0xFFFF);

        let format4 = compile_format4(&bmp);
        let format12 = has_supplementary.then(|| {
            let all: Vec<(u32, u16)> = self
                .mappings
                .iter()
                .map(|&(cp, gid)| (cp, gid.to_u16()))
                .collect();
            compile_format12(&all)
        });

        let mut records = vec![(3u16, 1u16)];
        let mut subtables = vec![format4];
        if let Some(f12) = format12 {
            records.push((3, 10));
            subtables.push(f12);
        }

        let header_len = 4 + records.len() * 8;
        writer.write_slice(&0u16.to_be_bytes()); // version
        writer.write_slice(&(records.len() as u16).to_be_bytes());

        let mut offset = header_len as u32;
        let mut offsets = Vec::with_capacity(subtables.len());
        for sub in &subtables {
            offsets.push(offset);
            offset += sub.len() as u32;
        }
        for (i, &(platform_id, encoding_id)) in records.iter().enumerate() {
            writer.write_slice(&platform_id.to_be_bytes());
            writer.write_slice(&encoding_id.to_be_bytes());
            writer.write_slice(&offsets[i].to_be_bytes());
        }
        for sub in &subtables {
            writer.write_slice(sub);
        }
    }
}

fn search_params(n: u16) -> (u16, u16, u16) {
    let mut entry_selector = 0u16;
    let mut search_range = 1u16;
    while (search_range as u32) * 2 <= n as u32 {
        search_range *= 2;
        entry_selector += 1;
    }
    search_range = search_range.saturating_mul(2);
    let range_shift = (n as u32 * 2).saturating_sub(search_range as u32) as u16;
    (search_range, entry_selector, range_shift)
}

fn compile_format4(pairs: &[(u16, u16)]) -> Vec<u8> {
    let mut segments: Vec<(u16, u16, i32)> = Vec::new();
    for &(cp, gid) in pairs {
        let delta = gid as i32 - cp as i32;
        let extend = segments
            .last()
            .is_some_and(|&(_, end, seg_delta)| seg_delta == delta && end as u32 + 1 == cp as u32);
        if extend {
            segments.last_mut().unwrap().1 = cp;
        } else {
            segments.push((cp, cp, delta));
        }
    }
    if segments.last().map(|&(_, end, _)| end) != Some(0xFFFF) {
        segments.push((0xFFFF, 0xFFFF, 1));
    }

    let seg_count = segments.len();
    let (search_range, entry_selector, range_shift) = search_params(seg_count as u16);

    let mut out = Vec::with_capacity(16 + seg_count * 8);
    out.extend_from_slice(&4u16.to_be_bytes());
    out.extend_from_slice(&((16 + seg_count * 8) as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // language
    out.extend_from_slice(&((seg_count * 2) as u16).to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());
    for &(_, end, _) in &segments {
        out.extend_from_slice(&end.to_be_bytes());
    }
    out.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
    for &(start, _, _) in &segments {
        out.extend_from_slice(&start.to_be_bytes());
    }
    for &(_, _, delta) in &segments {
        out.extend_from_slice(&(delta as i16).to_be_bytes());
    }
    for _ in &segments {
        out.extend_from_slice(&0u16.to_be_bytes()); // idRangeOffset: always 0, we only use idDelta
    }
    out
}

fn compile_format12(mappings: &[(u32, u16)]) -> Vec<u8> {
    let mut groups: Vec<(u32, u32, u32, i64)> = Vec::new();
    for &(cp, gid) in mappings {
        let delta = gid as i64 - cp as i64;
        let extend = groups
            .last()
            .is_some_and(|&(_, end, _, seg_delta)| seg_delta == delta && end + 1 == cp);
        if extend {
            groups.last_mut().unwrap().1 = cp;
        } else {
            groups.push((cp, cp, gid as u32, delta));
        }
    }

    let mut out = Vec::with_capacity(16 + groups.len() * 12);
    out.extend_from_slice(&12u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(&((16 + groups.len() * 12) as u32).to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // language
    out.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for &(start, end, start_glyph, _) in &groups {
        out.extend_from_slice(&start.to_be_bytes());
        out.extend_from_slice(&end.to_be_bytes());
        out.extend_from_slice(&start_glyph.to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::dump_table;
    use font_read::tables::cmap::{Cmap, EncodingRecord};
    use font_read::read::FontRead;

    #[test]
    fn bmp_only_round_trips_through_the_reader() {
        let table = CmapTable::from_mappings(vec![
            (65, GlyphId::new(1)),
            (66, GlyphId::new(2)),
            (0x4E2D, GlyphId::new(3)), // not contiguous with 65/66 -> forces a new segment
        ]);
        let bytes = dump_table(&table);
        let cmap = Cmap::read(font_read::font_data::FontData::new(&bytes)).unwrap();
        assert_eq!(cmap.map_codepoint(65), Some(GlyphId::new(1)));
        assert_eq!(cmap.map_codepoint(66), Some(GlyphId::new(2)));
        assert_eq!(cmap.map_codepoint(0x4E2D), Some(GlyphId::new(3)));
        assert_eq!(cmap.map_codepoint(67), None);
    }

    #[test]
    fn supplementary_codepoints_get_a_format12_subtable() {
        let table = CmapTable::from_mappings(vec![(0x1F600, GlyphId::new(9))]);
        let bytes = dump_table(&table);
        let cmap = Cmap::read(font_read::font_data::FontData::new(&bytes)).unwrap();
        let records = cmap.encoding_records();
        assert!(records
            .iter()
            .any(|r: &EncodingRecord| r.platform_id == 3 && r.encoding_id == 10));
        assert_eq!(cmap.map_codepoint(0x1F600), Some(GlyphId::new(9)));
    }
}
