//! The `cvar` table: https://learn.microsoft.com/en-us/typography/opentype/spec/cvar
//!
//! A single tuple variation store (the same layout `gvar` uses per glyph)
//! whose "points" are indices into the `cvt ` table rather than glyph
//! outline points.

use font_types::Tag;

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

use super::variation_common::{parse_tuple_variation_store, PackedPointNumbers, RawTupleVariation};

pub const TAG: Tag = Tag::new(b"cvar");

#[derive(Clone, Copy)]
pub struct Cvar<'a> {
    data: FontData<'a>,
    axis_count: u16,
}

impl<'a> Cvar<'a> {
    /// `cvar` carries no axis count of its own; the caller supplies `fvar`'s.
    pub fn read(data: FontData<'a>, axis_count: u16) -> Result<Self> {
        let _version: u32 = data.read_at(0)?;
        Ok(Cvar { data, axis_count })
    }

    pub fn tuples(&self) -> Result<(Option<PackedPointNumbers>, Vec<RawTupleVariation<'a>>)> {
        let mut cursor = self.data.split_off(4).ok_or(crate::error::ReadError::OutOfBounds)?.cursor();
        let tuple_variation_count: u16 = cursor.read()?;
        let data_offset: u16 = cursor.read()?;
        parse_tuple_variation_store(
            &mut cursor,
            self.data.split_off(4).unwrap(),
            self.axis_count,
            tuple_variation_count,
            data_offset as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_types::F2Dot14;

    #[test]
    fn reads_cvt_delta_tuple() {
        let mut per_tuple = Vec::new();
        per_tuple.push(2u8); // explicit point count = 2
        per_tuple.extend_from_slice(&[0x01, 0, 1]); // byte run len 2: deltas 0,1 -> points 0,1
        per_tuple.extend_from_slice(&[0x01, 10, 0xf6]); // x deltas: byte run len 2: 10, -10
        per_tuple.extend_from_slice(&[0x81]); // y deltas: zero run len 2

        let mut headers = Vec::new();
        headers.extend_from_slice(&(per_tuple.len() as u16).to_be_bytes());
        let tuple_index: u16 = 0x8000 | 0x2000;
        headers.extend_from_slice(&tuple_index.to_be_bytes());
        headers.extend_from_slice(&F2Dot14::from_f64(1.0).to_be_bytes());

        let mut body = Vec::new();
        body.extend_from_slice(&1u16.to_be_bytes()); // tupleVariationCount
        body.extend_from_slice(&(4 + headers.len() as u16).to_be_bytes()); // dataOffset
        body.extend_from_slice(&headers);
        body.extend_from_slice(&per_tuple);

        let mut b = Vec::new();
        b.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        b.extend_from_slice(&body);

        let cvar = Cvar::read(FontData::new(&b), 1).unwrap();
        let (shared, tuples) = cvar.tuples().unwrap();
        assert!(shared.is_none());
        assert_eq!(tuples.len(), 1);
        let deltas = tuples[0].deltas(2, None).unwrap();
        assert_eq!(deltas, vec![(0, 10, 0), (1, -10, 0)]);
    }
}
