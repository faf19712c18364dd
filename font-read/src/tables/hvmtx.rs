//! `hmtx`/`vmtx`: the horizontal and vertical metrics tables share one
//! layout (an array of `(advance, bearing)` pairs followed by a trailing
//! bearing-only array), differing only in which axis they describe and
//! which header table (`hhea`/`vhea`) supplies `numberOfLongMetrics`.

use font_types::{BigEndian, GlyphId};

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::{FontReadWithArgs, ReadArgs};

/// `(advance, bearing)`, 4 bytes on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongMetric {
    pub advance: u16,
    pub bearing: i16,
}

#[derive(Clone, Copy)]
pub struct HVmtx<'a> {
    long_metrics: &'a [u8],
    num_long_metrics: u16,
    trailing_bearings: &'a [u8],
}

impl ReadArgs for HVmtx<'_> {
    /// `(numberOfLongMetrics, numGlyphs)`.
    type Args = (u16, u16);
}

impl<'a> FontReadWithArgs<'a> for HVmtx<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self> {
        let (num_long_metrics, num_glyphs) = *args;
        let long_metrics_len = num_long_metrics as usize * 4;
        let long_metrics = data
            .slice(0..long_metrics_len)
            .ok_or(crate::error::ReadError::OutOfBounds)?
            .as_bytes();
        let num_trailing = (num_glyphs as usize).saturating_sub(num_long_metrics as usize);
        let trailing_bearings = data
            .slice(long_metrics_len..long_metrics_len + num_trailing * 2)
            .map(|d| d.as_bytes())
            .unwrap_or(&[]);
        Ok(HVmtx {
            long_metrics,
            num_long_metrics,
            trailing_bearings,
        })
    }
}

impl<'a> HVmtx<'a> {
    pub fn long_metrics(&self) -> Vec<LongMetric> {
        (0..self.num_long_metrics as usize)
            .map(|i| self.long_metric_at(i).unwrap())
            .collect()
    }

    fn long_metric_at(&self, i: usize) -> Option<LongMetric> {
        let bytes = self.long_metrics.get(i * 4..i * 4 + 4)?;
        Some(LongMetric {
            advance: u16::from_be_bytes([bytes[0], bytes[1]]),
            bearing: i16::from_be_bytes([bytes[2], bytes[3]]),
        })
    }

    /// The trailing bearing-only entries, for glyphs beyond `numberOfLongMetrics`.
    pub fn bearings(&self) -> Vec<i16> {
        self.trailing_bearings
            .chunks_exact(2)
            .map(|b| i16::from_be_bytes([b[0], b[1]]))
            .collect()
    }

    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let ix = glyph_id.to_u32() as usize;
        self.long_metric_at(ix)
            .map(|m| m.advance)
            .or_else(|| self.long_metric_at(self.num_long_metrics.checked_sub(1)? as usize).map(|m| m.advance))
    }

    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let ix = glyph_id.to_u32() as usize;
        if let Some(m) = self.long_metric_at(ix) {
            return Some(m.bearing);
        }
        let trailing_ix = ix.checked_sub(self.num_long_metrics as usize)?;
        self.trailing_bearings
            .get(trailing_ix * 2..trailing_ix * 2 + 2)
            .map(|b| i16::from_be_bytes([b[0], b[1]]))
    }
}

/// `side_bearings` exposed as raw `BigEndian<i16>` for callers (e.g. the WOFF2
/// hmtx reconstruction) that want the same shape as the on-disk trailing array.
pub fn trailing_side_bearings_raw(mtx: &HVmtx<'_>) -> Vec<BigEndian<i16>> {
    mtx.bearings().into_iter().map(BigEndian::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&500u16.to_be_bytes());
        b.extend_from_slice(&50i16.to_be_bytes());
        b.extend_from_slice(&600u16.to_be_bytes());
        b.extend_from_slice(&60i16.to_be_bytes());
        b
    }

    #[test]
    fn missing_left_side_bearings() {
        let data = sample();
        let hmtx = HVmtx::read_with_args(FontData::new(&data), &(2, 4)).unwrap();

        assert_eq!(hmtx.advance(GlyphId::new(0)), Some(500));
        assert_eq!(hmtx.side_bearing(GlyphId::new(0)), Some(50));
        assert_eq!(hmtx.advance(GlyphId::new(1)), Some(600));
        assert_eq!(hmtx.side_bearing(GlyphId::new(1)), Some(60));
        assert_eq!(hmtx.advance(GlyphId::new(2)), Some(600));
        assert_eq!(hmtx.side_bearing(GlyphId::new(2)), None);
    }

    #[test]
    fn trailing_bearings() {
        let mut data = sample();
        data.truncate(4);
        data.extend_from_slice(&30i16.to_be_bytes());
        data.extend_from_slice(&111i16.to_be_bytes());
        let hmtx = HVmtx::read_with_args(FontData::new(&data), &(1, 3)).unwrap();
        assert_eq!(hmtx.long_metrics().len(), 1);
        assert_eq!(hmtx.bearings(), vec![30, 111]);
        assert_eq!(hmtx.advance(GlyphId::new(2)), Some(500));
        assert_eq!(hmtx.side_bearing(GlyphId::new(2)), Some(111));
    }
}
