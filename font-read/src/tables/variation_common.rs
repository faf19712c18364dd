//! Shared decoding for the tuple-variation-store structures used by
//! `gvar` and `cvar`: packed point numbers, packed deltas, and tuple
//! variation headers (peak/intermediate tuples, shared vs. private point
//! numbers). See the OpenType `gvar` spec's "Tuple Variation Store" section;
//! `cvar` reuses the identical byte layout for a single "glyph".

use crate::error::Result;
use crate::font_data::{Cursor, FontData};

pub const TUPLE_INDEX_EMBEDDED_PEAK: u16 = 0x8000;
pub const TUPLE_INDEX_INTERMEDIATE_REGION: u16 = 0x4000;
pub const TUPLE_INDEX_PRIVATE_POINT_NUMBERS: u16 = 0x2000;
pub const TUPLE_INDEX_MASK: u16 = 0x0FFF;

pub const TUPLE_COUNT_SHARED_POINT_NUMBERS: u16 = 0x8000;
pub const TUPLE_COUNT_MASK: u16 = 0x0FFF;

/// The point numbers a tuple variation's deltas apply to: either an explicit
/// sorted list, or "every point in the glyph", which the caller resolves
/// once it knows the glyph's total point count (including phantom points).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackedPointNumbers {
    All,
    Explicit(Vec<u16>),
}

impl PackedPointNumbers {
    pub fn resolve(&self, total_points: usize) -> Vec<u16> {
        match self {
            PackedPointNumbers::All => (0..total_points as u16).collect(),
            PackedPointNumbers::Explicit(v) => v.clone(),
        }
    }
}

/// Read one "packed point number" run: a count followed by delta-encoded
/// point indices, grouped into runs whose control byte gives a run length
/// and whether this run's deltas are bytes or words.
pub fn read_packed_point_numbers(cursor: &mut Cursor<'_>) -> Result<PackedPointNumbers> {
    let first: u8 = cursor.read()?;
    let count = if first == 0 {
        return Ok(PackedPointNumbers::All);
    } else if first & 0x80 != 0 {
        let second: u8 = cursor.read()?;
        (((first & 0x7f) as u16) << 8) | second as u16
    } else {
        first as u16
    };

    let mut points = Vec::with_capacity(count as usize);
    let mut current = 0u16;
    while points.len() < count as usize {
        let control: u8 = cursor.read()?;
        let run_len = (control & 0x7f) as usize + 1;
        let are_words = control & 0x80 != 0;
        for _ in 0..run_len {
            if points.len() >= count as usize {
                break;
            }
            let delta: u16 = if are_words { cursor.read()? } else { cursor.read::<u8>()? as u16 };
            current = current.wrapping_add(delta);
            points.push(current);
        }
    }
    Ok(PackedPointNumbers::Explicit(points))
}

/// Read `count` packed deltas: runs of all-zero, all-word, or all-byte
/// values, selected by the run's control byte.
pub fn read_packed_deltas(cursor: &mut Cursor<'_>, count: usize) -> Result<Vec<i32>> {
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let control: u8 = cursor.read()?;
        let run_len = (control & 0x3f) as usize + 1;
        if control & 0x80 != 0 {
            for _ in 0..run_len {
                if out.len() >= count {
                    break;
                }
                out.push(0);
            }
        } else if control & 0x40 != 0 {
            for _ in 0..run_len {
                if out.len() >= count {
                    break;
                }
                out.push(cursor.read::<i16>()? as i32);
            }
        } else {
            for _ in 0..run_len {
                if out.len() >= count {
                    break;
                }
                out.push(cursor.read::<i8>()? as i32);
            }
        }
    }
    Ok(out)
}

#[derive(Clone, Debug)]
pub struct TupleVariationHeader {
    pub variation_data_size: u16,
    pub peak: Option<Vec<f64>>,
    pub shared_tuple_index: Option<u16>,
    pub intermediate: Option<(Vec<f64>, Vec<f64>)>,
    pub has_private_points: bool,
}

fn read_tuple(cursor: &mut Cursor<'_>, axis_count: u16) -> Result<Vec<f64>> {
    (0..axis_count).map(|_| cursor.read_f2dot14()).collect()
}

pub fn read_tuple_variation_headers(
    cursor: &mut Cursor<'_>,
    axis_count: u16,
    count: u16,
) -> Result<Vec<TupleVariationHeader>> {
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let variation_data_size: u16 = cursor.read()?;
        let tuple_index: u16 = cursor.read()?;
        let peak = if tuple_index & TUPLE_INDEX_EMBEDDED_PEAK != 0 {
            Some(read_tuple(cursor, axis_count)?)
        } else {
            None
        };
        let intermediate = if tuple_index & TUPLE_INDEX_INTERMEDIATE_REGION != 0 {
            Some((read_tuple(cursor, axis_count)?, read_tuple(cursor, axis_count)?))
        } else {
            None
        };
        out.push(TupleVariationHeader {
            variation_data_size,
            peak,
            shared_tuple_index: (tuple_index & TUPLE_INDEX_EMBEDDED_PEAK == 0)
                .then_some(tuple_index & TUPLE_INDEX_MASK),
            intermediate,
            has_private_points: tuple_index & TUPLE_INDEX_PRIVATE_POINT_NUMBERS != 0,
        });
    }
    Ok(out)
}

/// One tuple variation with its header resolved and its private serialized
/// data (private point numbers, if any, followed by packed X then Y deltas)
/// sliced out but not yet decoded (decoding needs the glyph's total point
/// count, which this layer doesn't have).
#[derive(Clone)]
pub struct RawTupleVariation<'a> {
    pub header: TupleVariationHeader,
    data: FontData<'a>,
}

impl<'a> RawTupleVariation<'a> {
    pub fn peak(&self, shared_tuples: &[Vec<f64>]) -> Vec<f64> {
        self.header.peak.clone().unwrap_or_else(|| {
            self.header
                .shared_tuple_index
                .and_then(|i| shared_tuples.get(i as usize).cloned())
                .unwrap_or_default()
        })
    }

    /// Decode this tuple's `(point_index, dx, dy)` triples. `total_points`
    /// is the glyph's point count including the four phantom points;
    /// `shared_points`, if this tuple has no private points of its own, is
    /// the store-level shared point list.
    pub fn deltas(
        &self,
        total_points: usize,
        shared_points: Option<&PackedPointNumbers>,
    ) -> Result<Vec<(u16, i32, i32)>> {
        let mut cursor = self.data.cursor();
        let points = if self.header.has_private_points {
            read_packed_point_numbers(&mut cursor)?
        } else {
            shared_points.cloned().unwrap_or(PackedPointNumbers::All)
        };
        let resolved = points.resolve(total_points);
        let xs = read_packed_deltas(&mut cursor, resolved.len())?;
        let ys = read_packed_deltas(&mut cursor, resolved.len())?;
        Ok(resolved
            .into_iter()
            .zip(xs.into_iter().zip(ys))
            .map(|(pt, (x, y))| (pt, x, y))
            .collect())
    }
}

/// Parse a tuple variation store's headers and per-tuple serialized data.
///
/// `cursor` must be positioned at the start of the `tupleVariationHeaders`
/// array; `table_data` is the whole enclosing table (`gvar`'s per-glyph
/// blob, or the whole `cvar` table), and `serialized_data_offset` is
/// relative to it. Returns the store's shared point numbers (if the
/// `TUPLES_SHARE_POINT_NUMBERS` flag is set) and one [`RawTupleVariation`]
/// per header, in header order.
pub fn parse_tuple_variation_store<'a>(
    cursor: &mut Cursor<'a>,
    table_data: FontData<'a>,
    axis_count: u16,
    count_field: u16,
    serialized_data_offset: usize,
) -> Result<(Option<PackedPointNumbers>, Vec<RawTupleVariation<'a>>)> {
    let has_shared_points = count_field & TUPLE_COUNT_SHARED_POINT_NUMBERS != 0;
    let count = count_field & TUPLE_COUNT_MASK;
    let headers = read_tuple_variation_headers(cursor, axis_count, count)?;

    let mut serialized = table_data
        .split_off(serialized_data_offset)
        .ok_or(crate::error::ReadError::OutOfBounds)?
        .cursor();
    let shared_points = if has_shared_points {
        Some(read_packed_point_numbers(&mut serialized)?)
    } else {
        None
    };

    let mut tuples = Vec::with_capacity(headers.len());
    for header in headers {
        let data = serialized.slice(header.variation_data_size as usize)?;
        tuples.push(RawTupleVariation { header, data });
    }
    Ok((shared_points, tuples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_point_numbers_all() {
        let bytes = [0u8];
        let mut cursor = FontData::new(&bytes).cursor();
        assert_eq!(read_packed_point_numbers(&mut cursor).unwrap(), PackedPointNumbers::All);
    }

    #[test]
    fn packed_point_numbers_explicit_bytes() {
        // count=3, one run of 3 byte-deltas: 1, 2, 2 -> points 1, 3, 5
        let bytes = [3u8, 0x02, 1, 2, 2];
        let mut cursor = FontData::new(&bytes).cursor();
        let points = read_packed_point_numbers(&mut cursor).unwrap();
        assert_eq!(points, PackedPointNumbers::Explicit(vec![1, 3, 5]));
    }

    #[test]
    fn packed_deltas_zero_run_then_bytes() {
        // zero run of 2 (control 0x81), then byte run of 1 value (control 0x00, value 5)
        let bytes = [0x81u8, 0x00, 5];
        let mut cursor = FontData::new(&bytes).cursor();
        let deltas = read_packed_deltas(&mut cursor, 3).unwrap();
        assert_eq!(deltas, vec![0, 0, 5]);
    }

    #[test]
    fn packed_deltas_word_run() {
        let bytes = [0x41u8, 0x01, 0x00]; // words run of 2, one i16 value 256
        let mut cursor = FontData::new(&bytes).cursor();
        let deltas = read_packed_deltas(&mut cursor, 1).unwrap();
        assert_eq!(deltas, vec![256]);
    }
}
