//! `ItemVariationStore`, the shared delta-set structure behind `HVAR`,
//! `VVAR`, and `MVAR`.
//! https://learn.microsoft.com/en-us/typography/opentype/spec/otvaroverview#item-variation-store

use crate::error::{ReadError, Result};
use crate::font_data::FontData;

/// One region: for each axis, the `(start, peak, end)` normalized
/// coordinates that bound where this region contributes.
pub type VariationRegion = Vec<(f64, f64, f64)>;

#[derive(Clone, Copy)]
pub struct ItemVariationStore<'a> {
    data: FontData<'a>,
    region_list_offset: u32,
    data_count: u16,
}

impl<'a> ItemVariationStore<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let format: u16 = data.read_at(0)?;
        if format != 1 {
            return Err(ReadError::UnsupportedVersion(
                font_types::Tag::new(b"ivs "),
                format as u32,
            ));
        }
        Ok(ItemVariationStore {
            data,
            region_list_offset: data.read_at(2)?,
            data_count: data.read_at(6)?,
        })
    }

    pub fn region_list(&self) -> Result<Vec<VariationRegion>> {
        let region_data = self
            .data
            .split_off(self.region_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let mut cursor = region_data.cursor();
        let axis_count: u16 = cursor.read()?;
        let region_count: u16 = cursor.read()?;
        let mut out = Vec::with_capacity(region_count as usize);
        for _ in 0..region_count {
            let mut region = Vec::with_capacity(axis_count as usize);
            for _ in 0..axis_count {
                let start = cursor.read_f2dot14()?;
                let peak = cursor.read_f2dot14()?;
                let end = cursor.read_f2dot14()?;
                region.push((start, peak, end));
            }
            out.push(region);
        }
        Ok(out)
    }

    fn data_offset(&self, idx: u16) -> Result<u32> {
        self.data.read_at(8 + idx as usize * 4)
    }

    pub fn data_count(&self) -> u16 {
        self.data_count
    }

    pub fn item_variation_data(&self, idx: u16) -> Result<ItemVariationData<'a>> {
        let offset = self.data_offset(idx)?;
        let data = self
            .data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        ItemVariationData::read(data)
    }
}

#[derive(Clone, Copy)]
pub struct ItemVariationData<'a> {
    data: FontData<'a>,
    item_count: u16,
    word_delta_count: u16,
    region_indexes: FontData<'a>,
    region_index_count: u16,
}

impl<'a> ItemVariationData<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let item_count: u16 = data.read_at(0)?;
        let word_delta_count: u16 = data.read_at(2)?;
        let region_index_count: u16 = data.read_at(4)?;
        let region_indexes = data
            .slice(6..6 + region_index_count as usize * 2)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(ItemVariationData {
            data,
            item_count,
            word_delta_count: word_delta_count & 0x7fff,
            region_indexes,
            region_index_count,
        })
    }

    pub fn region_indexes(&self) -> Result<Vec<u16>> {
        let mut cursor = self.region_indexes.cursor();
        cursor.read_array(self.region_index_count as usize)
    }

    /// The raw per-region deltas for item `inner_index`, in region order.
    pub fn deltas(&self, inner_index: u16) -> Result<Vec<i32>> {
        if inner_index >= self.item_count {
            return Err(ReadError::OutOfBounds);
        }
        let word_count = self.word_delta_count.min(self.region_index_count);
        let long_words = false; // the "long word" bit (0x8000) isn't emitted by any known encoder
        let row_size = if long_words {
            word_count as usize * 4 + (self.region_index_count - word_count) as usize
        } else {
            word_count as usize * 2 + (self.region_index_count - word_count) as usize
        };
        let row_start = 6 + self.region_index_count as usize * 2 + inner_index as usize * row_size;
        let row = self
            .data
            .slice(row_start..row_start + row_size)
            .ok_or(ReadError::OutOfBounds)?;
        let mut cursor = row.cursor();
        let mut out = Vec::with_capacity(self.region_index_count as usize);
        for i in 0..self.region_index_count {
            if i < word_count {
                out.push(cursor.read::<i16>()? as i32);
            } else {
                out.push(cursor.read::<i8>()? as i32);
            }
        }
        Ok(out)
    }
}

/// A `DeltaSetIndexMap`: maps a glyph id (or other index) to an
/// `(outer, inner)` pair identifying a row within one of the store's
/// `ItemVariationData` subtables.
#[derive(Clone, Copy)]
pub struct DeltaSetIndexMap<'a> {
    data: FontData<'a>,
    map_count: u32,
    entries_start: usize,
    entry_size: u8,
    inner_bit_count: u8,
}

impl<'a> DeltaSetIndexMap<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let format: u8 = data.read_at(0)?;
        let entry_format: u8 = data.read_at(1)?;
        let (map_count, entries_start) = if format == 0 {
            (data.read_at::<u16>(2)? as u32, 4)
        } else {
            (data.read_at::<u32>(2)?, 6)
        };
        Ok(DeltaSetIndexMap {
            data,
            map_count,
            entries_start,
            entry_size: ((entry_format >> 4) & 0x3) + 1,
            inner_bit_count: (entry_format & 0xf) + 1,
        })
    }

    pub fn map(&self, index: u32) -> Result<(u16, u16)> {
        // Per spec: an index beyond mapCount - 1 uses the last entry.
        let index = index.min(self.map_count.saturating_sub(1));
        let offset = self.entries_start + index as usize * self.entry_size as usize;
        let bytes = self
            .data
            .slice(offset..offset + self.entry_size as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let mut raw: u32 = 0;
        for b in bytes.as_bytes() {
            raw = (raw << 8) | *b as u32;
        }
        let inner = raw & ((1u32 << self.inner_bit_count) - 1);
        let outer = raw >> self.inner_bit_count;
        Ok((outer as u16, inner as u16))
    }
}

/// Compute a region's interpolation scalar at `coords` (normalized,
/// per-axis, one entry per axis in the region's order).
pub fn region_scalar(region: &VariationRegion, coords: &[f64]) -> f64 {
    let mut scalar = 1.0;
    for (&(start, peak, end), &coord) in region.iter().zip(coords.iter()) {
        if peak == 0.0 {
            continue;
        }
        if coord < start || coord > end {
            return 0.0;
        }
        if coord < peak {
            if peak == start {
                continue;
            }
            scalar *= (coord - start) / (peak - start);
        } else if coord > peak {
            if peak == end {
                continue;
            }
            scalar *= (end - coord) / (end - peak);
        }
    }
    scalar
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_types::F2Dot14;

    #[test]
    fn region_scalar_at_peak_is_one() {
        let region = vec![(-1.0, 1.0, 1.0)];
        assert_eq!(region_scalar(&region, &[1.0]), 1.0);
    }

    #[test]
    fn region_scalar_outside_range_is_zero() {
        let region = vec![(0.0, 1.0, 1.0)];
        assert_eq!(region_scalar(&region, &[-0.5]), 0.0);
    }

    #[test]
    fn delta_set_index_map_decodes_outer_inner() {
        // entryFormat: entrySize=2 bytes, innerBitCount=8
        let entry_format: u8 = (1 << 4) | 7;
        let mut b = vec![0u8, entry_format];
        b.extend_from_slice(&1u16.to_be_bytes()); // mapCount
        b.extend_from_slice(&[0x00, 0x05]); // outer=0, inner=5
        let map = DeltaSetIndexMap::read(FontData::new(&b)).unwrap();
        assert_eq!(map.map(0).unwrap(), (0, 5));
        // out-of-range index clamps to last entry
        assert_eq!(map.map(10).unwrap(), (0, 5));
    }

    #[test]
    fn item_variation_data_reads_mixed_width_deltas() {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes()); // itemCount
        b.extend_from_slice(&1u16.to_be_bytes()); // wordDeltaCount
        b.extend_from_slice(&2u16.to_be_bytes()); // regionIndexCount
        b.extend_from_slice(&0u16.to_be_bytes());
        b.extend_from_slice(&1u16.to_be_bytes());
        b.extend_from_slice(&300i16.to_be_bytes()); // word delta
        b.push((-7i8) as u8); // byte delta
        let ivd = ItemVariationData::read(FontData::new(&b)).unwrap();
        assert_eq!(ivd.region_indexes().unwrap(), vec![0, 1]);
        assert_eq!(ivd.deltas(0).unwrap(), vec![300, -7]);
    }

    #[test]
    fn region_list_round_trip() {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes()); // axisCount
        b.extend_from_slice(&1u16.to_be_bytes()); // regionCount
        for v in [-1.0, 0.0, 1.0] {
            b.extend_from_slice(&F2Dot14::from_f64(v).to_be_bytes());
        }
        let mut store_bytes = Vec::new();
        store_bytes.extend_from_slice(&1u16.to_be_bytes()); // format
        store_bytes.extend_from_slice(&8u32.to_be_bytes()); // regionListOffset
        store_bytes.extend_from_slice(&0u16.to_be_bytes()); // itemVariationDataCount
        store_bytes.extend_from_slice(&b);
        let store = ItemVariationStore::read(FontData::new(&store_bytes)).unwrap();
        let regions = store.region_list().unwrap();
        assert_eq!(regions, vec![vec![(-1.0, 0.0, 1.0)]]);
    }
}
