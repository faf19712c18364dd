//! The `gvar` table: https://learn.microsoft.com/en-us/typography/opentype/spec/gvar
//!
//! Per-glyph tuple variation data for `glyf` outlines. Each glyph's data is
//! a self-contained tuple variation store (see [`super::variation_common`])
//! whose tuples carry deltas for the glyph's on-curve/off-curve points plus
//! its four trailing phantom points.

use font_types::{GlyphId, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

use super::variation_common::{parse_tuple_variation_store, PackedPointNumbers, RawTupleVariation};

pub const TAG: Tag = Tag::new(b"gvar");

#[derive(Clone, Copy)]
pub struct Gvar<'a> {
    data: FontData<'a>,
    axis_count: u16,
    shared_tuple_count: u16,
    shared_tuples_offset: u32,
    glyph_count: u16,
    long_offsets: bool,
    data_array_offset: u32,
}

impl<'a> FontRead<'a> for Gvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _version: u32 = data.read_at(0)?;
        Ok(Gvar {
            data,
            axis_count: data.read_at(4)?,
            shared_tuple_count: data.read_at(6)?,
            shared_tuples_offset: data.read_at(8)?,
            glyph_count: data.read_at(12)?,
            long_offsets: data.read_at::<u16>(14)? & 1 != 0,
            data_array_offset: data.read_at(16)?,
        })
    }
}

impl<'a> Gvar<'a> {
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// The tuples shared across every glyph's variation data, referenced by
    /// index from tuple headers that don't embed their own peak.
    pub fn shared_tuples(&self) -> Result<Vec<Vec<f64>>> {
        let mut cursor = self
            .data
            .split_off(self.shared_tuples_offset as usize)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();
        let mut out = Vec::with_capacity(self.shared_tuple_count as usize);
        for _ in 0..self.shared_tuple_count {
            let tuple: Result<Vec<f64>> = (0..self.axis_count).map(|_| cursor.read_f2dot14()).collect();
            out.push(tuple?);
        }
        Ok(out)
    }

    fn glyph_data_offset(&self, idx: u16) -> Result<u32> {
        let offsets_start = 20usize;
        if self.long_offsets {
            self.data.read_at(offsets_start + idx as usize * 4)
        } else {
            let half: u16 = self.data.read_at(offsets_start + idx as usize * 2)?;
            Ok(half as u32 * 2)
        }
    }

    /// The raw per-glyph variation data blob for `gid`, or `None` for a
    /// glyph with no variation data (empty offset range, the common case
    /// for unvarying glyphs like space).
    pub fn glyph_variation_data(&self, gid: GlyphId) -> Result<Option<GlyphVariationData<'a>>> {
        let gid = gid.to_u32() as u16;
        if gid >= self.glyph_count {
            return Ok(None);
        }
        let start = self.glyph_data_offset(gid)?;
        let end = self.glyph_data_offset(gid + 1)?;
        if end <= start {
            return Ok(None);
        }
        let base = self.data_array_offset as usize;
        let bytes = self
            .data
            .slice(base + start as usize..base + end as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(GlyphVariationData {
            data: bytes,
            axis_count: self.axis_count,
        }))
    }
}

#[derive(Clone, Copy)]
pub struct GlyphVariationData<'a> {
    data: FontData<'a>,
    axis_count: u16,
}

impl<'a> GlyphVariationData<'a> {
    /// Parse this glyph's tuple variation store. Returns the shared point
    /// numbers (if this glyph's tuples share a point list) and the tuples
    /// themselves, in header order.
    pub fn tuples(&self) -> Result<(Option<PackedPointNumbers>, Vec<RawTupleVariation<'a>>)> {
        let mut cursor = self.data.cursor();
        let tuple_variation_count: u16 = cursor.read()?;
        let data_offset: u16 = cursor.read()?;
        parse_tuple_variation_store(
            &mut cursor,
            self.data,
            self.axis_count,
            tuple_variation_count,
            data_offset as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        // One glyph, one tuple with an embedded peak and private "all points"
        // deltas: dx=[10], dy=[-5] for a single-point glyph.
        let mut serialized = Vec::new();
        // variationDataSize placeholder filled below
        let mut per_tuple = Vec::new();
        per_tuple.push(0u8); // packed point numbers: count=0 => All
        per_tuple.extend_from_slice(&[0x00, 10]); // deltas: run of 1 byte value 10
        per_tuple.extend_from_slice(&[0x00, (-5i8) as u8]); // deltas y

        let mut headers = Vec::new();
        headers.extend_from_slice(&(per_tuple.len() as u16).to_be_bytes()); // variationDataSize
        let tuple_index: u16 = 0x8000 | 0x2000; // embedded peak, private points
        headers.extend_from_slice(&tuple_index.to_be_bytes());
        headers.extend_from_slice(&font_types::F2Dot14::from_f64(1.0).to_be_bytes()); // peak axis 0

        let tuple_variation_count: u16 = 1; // no shared points
        let data_offset: u16 = 4 + headers.len() as u16;
        serialized.extend_from_slice(&tuple_variation_count.to_be_bytes());
        serialized.extend_from_slice(&data_offset.to_be_bytes());
        serialized.extend_from_slice(&headers);
        serialized.extend_from_slice(&per_tuple);

        let mut b = Vec::new();
        b.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
        b.extend_from_slice(&1u16.to_be_bytes()); // axisCount
        b.extend_from_slice(&0u16.to_be_bytes()); // sharedTupleCount
        b.extend_from_slice(&20u32.to_be_bytes()); // sharedTuplesOffset (unused)
        b.extend_from_slice(&1u16.to_be_bytes()); // glyphCount
        b.extend_from_slice(&0u16.to_be_bytes()); // flags: short offsets
        b.extend_from_slice(&20u32.to_be_bytes()); // glyphVariationDataArrayOffset
        b.extend_from_slice(&0u16.to_be_bytes()); // offsets[0]
        b.extend_from_slice(&((serialized.len() / 2) as u16).to_be_bytes()); // offsets[1]
        b.extend_from_slice(&serialized);
        b
    }

    #[test]
    fn reads_single_glyph_tuple() {
        let bytes = sample();
        let gvar = Gvar::read(FontData::new(&bytes)).unwrap();
        assert_eq!(gvar.axis_count(), 1);
        let data = gvar.glyph_variation_data(GlyphId::new(0)).unwrap().unwrap();
        let (shared_points, tuples) = data.tuples().unwrap();
        assert!(shared_points.is_none());
        assert_eq!(tuples.len(), 1);
        let deltas = tuples[0].deltas(1, None).unwrap();
        assert_eq!(deltas, vec![(0, 10, -5)]);
    }

    #[test]
    fn missing_glyph_data_is_none() {
        let bytes = sample();
        let gvar = Gvar::read(FontData::new(&bytes)).unwrap();
        assert!(gvar.glyph_variation_data(GlyphId::new(5)).unwrap().is_none());
    }
}
