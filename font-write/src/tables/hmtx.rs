//! Rewriting `hmtx`/`vmtx`.
//!
//! Subsetting applies the same trailing-advance-width compaction the
//! format itself exists for: if the tail of the new glyph order shares the
//! last retained advance width, those glyphs are written as bearing-only
//! entries and `numberOfLongMetrics` shrinks to match. Callers write
//! `metrics.len()` back to `hhea`/`vhea`'s `numberOf{H,V}Metrics`.

use font_types::GlyphId;

use crate::write::{FontWrite, TableWriter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongMetric {
    pub advance: u16,
    pub bearing: i16,
}

impl FontWrite for LongMetric {
    fn write_into(&self, writer: &mut TableWriter) {
        self.advance.write_into(writer);
        self.bearing.write_into(writer);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MtxTable {
    pub metrics: Vec<LongMetric>,
    /// Bearing-only entries for glyphs past `metrics` that share its last
    /// advance width (`numGlyphs - numberOfLongMetrics` of them).
    pub trailing_bearings: Vec<i16>,
}

impl MtxTable {
    /// Builds the new metrics array from the original table and an
    /// old-glyph-id-ordered list of glyphs being kept, then truncates any
    /// run of trailing glyphs that share the last advance width into
    /// bearing-only entries.
    pub fn subset(
        original: &font_read::tables::hvmtx::HVmtx<'_>,
        new_to_old: &[GlyphId],
    ) -> Self {
        let mut metrics: Vec<LongMetric> = new_to_old
            .iter()
            .map(|&old_gid| LongMetric {
                advance: original.advance(old_gid).unwrap_or(0),
                bearing: original.side_bearing(old_gid).unwrap_or(0),
            })
            .collect();

        let mut split = metrics.len();
        if split > 1 {
            let last_advance = metrics[split - 1].advance;
            while split > 1 && metrics[split - 2].advance == last_advance {
                split -= 1;
            }
        }
        let trailing_bearings = metrics.split_off(split).into_iter().map(|m| m.bearing).collect();
        MtxTable { metrics, trailing_bearings }
    }
}

impl FontWrite for MtxTable {
    fn write_into(&self, writer: &mut TableWriter) {
        self.metrics.write_into(writer);
        self.trailing_bearings.write_into(writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::dump_table;

    #[test]
    fn writes_four_bytes_per_metric_with_no_trailing_run() {
        let table = MtxTable {
            metrics: vec![
                LongMetric {
                    advance: 500,
                    bearing: 10,
                },
                LongMetric {
                    advance: 600,
                    bearing: -5,
                },
            ],
            trailing_bearings: vec![],
        };
        assert_eq!(dump_table(&table).len(), 8);
    }

    #[test]
    fn trailing_bearings_write_as_two_bytes_each() {
        let table = MtxTable {
            metrics: vec![LongMetric {
                advance: 500,
                bearing: 10,
            }],
            trailing_bearings: vec![3, -4],
        };
        let bytes = dump_table(&table);
        assert_eq!(bytes.len(), 4 + 4);
        assert_eq!(&bytes[4..6], &3i16.to_be_bytes());
        assert_eq!(&bytes[6..8], &(-4i16).to_be_bytes());
    }

    #[test]
    fn subset_compacts_shared_trailing_advance() {
        // Four glyphs, numberOfLongMetrics = 4 (no compaction in the
        // source table itself): (100,0) (200,1) (300,2) (300,3) — the
        // last two share advance 300, so the subset should compact them.
        use font_read::font_data::FontData;
        use font_read::read::FontReadWithArgs;
        use font_read::tables::hvmtx::HVmtx;

        let mut bytes = Vec::new();
        for (advance, bearing) in [(100u16, 0i16), (200, 1), (300, 2), (300, 3)] {
            bytes.extend_from_slice(&advance.to_be_bytes());
            bytes.extend_from_slice(&bearing.to_be_bytes());
        }
        let hvmtx = HVmtx::read_with_args(FontData::new(&bytes), &(4, 4)).unwrap();
        let new_to_old: Vec<GlyphId> = (0u16..4).map(GlyphId::new).collect();
        let mtx = MtxTable::subset(&hvmtx, &new_to_old);
        assert_eq!(mtx.metrics.len(), 3);
        assert_eq!(mtx.trailing_bearings, vec![3]);
    }
}
