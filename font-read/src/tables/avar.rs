//! The `avar` table: https://learn.microsoft.com/en-us/typography/opentype/spec/avar
//!
//! Maps user-space normalized coordinates (linear interpolation between
//! `fvar` min/default/max) onto the piecewise-linear "design-space" axis
//! used by `gvar`/`cvar` tuple matching.

use font_types::Tag;

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"avar");

#[derive(Clone, Copy)]
pub struct Avar<'a> {
    data: FontData<'a>,
    axis_count: u16,
}

impl<'a> FontRead<'a> for Avar<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _major: u16 = data.read_at(0)?;
        let axis_count: u16 = data.read_at(4)?;
        Ok(Avar { data, axis_count })
    }
}

/// One `(fromCoordinate, toCoordinate)` pivot point of an axis's segment map.
pub type AxisValueMapPoint = (f64, f64);

impl<'a> Avar<'a> {
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    /// The segment maps, one per axis, each a sorted list of pivot points
    /// through which to piecewise-linearly interpolate a normalized
    /// coordinate.
    pub fn segment_maps(&self) -> Result<Vec<Vec<AxisValueMapPoint>>> {
        let mut cursor = self.data.split_off(6).unwrap_or(FontData::new(&[])).cursor();
        let mut out = Vec::with_capacity(self.axis_count as usize);
        for _ in 0..self.axis_count {
            let position_map_count: u16 = cursor.read()?;
            let mut points = Vec::with_capacity(position_map_count as usize);
            for _ in 0..position_map_count {
                let from = cursor.read_f2dot14()?;
                let to = cursor.read_f2dot14()?;
                points.push((from, to));
            }
            out.push(points);
        }
        Ok(out)
    }
}

/// Apply one axis's segment map to a normalized coordinate, piecewise
/// linearly interpolating between the bracketing pivot points. Coordinates
/// outside `[-1, 1]` or an empty map pass through unchanged.
pub fn apply_segment_map(map: &[AxisValueMapPoint], coord: f64) -> f64 {
    if map.is_empty() {
        return coord;
    }
    if coord <= map[0].0 {
        return map[0].1 + (coord - map[0].0);
    }
    if coord >= map[map.len() - 1].0 {
        let last = map[map.len() - 1];
        return last.1 + (coord - last.0);
    }
    for w in map.windows(2) {
        let (from0, to0) = w[0];
        let (from1, to1) = w[1];
        if coord >= from0 && coord <= from1 {
            if (from1 - from0).abs() < f64::EPSILON {
                return to0;
            }
            let t = (coord - from0) / (from1 - from0);
            return to0 + t * (to1 - to0);
        }
    }
    coord
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_types::F2Dot14;

    fn sample() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
        b.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
        b.extend_from_slice(&0u16.to_be_bytes()); // reserved
        b.extend_from_slice(&1u16.to_be_bytes()); // axisCount
        b.extend_from_slice(&3u16.to_be_bytes()); // positionMapCount
        for (from, to) in [(-1.0, -1.0), (0.0, 0.2), (1.0, 1.0)] {
            b.extend_from_slice(&F2Dot14::from_f64(from).to_be_bytes());
            b.extend_from_slice(&F2Dot14::from_f64(to).to_be_bytes());
        }
        b
    }

    #[test]
    fn maps_default_and_extremes() {
        let bytes = sample();
        let avar = Avar::read(FontData::new(&bytes)).unwrap();
        let maps = avar.segment_maps().unwrap();
        assert_eq!(maps.len(), 1);
        assert_eq!(apply_segment_map(&maps[0], -1.0), -1.0);
        assert_eq!(apply_segment_map(&maps[0], 1.0), 1.0);
        assert!((apply_segment_map(&maps[0], 0.0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn interpolates_between_pivots() {
        let bytes = sample();
        let avar = Avar::read(FontData::new(&bytes)).unwrap();
        let maps = avar.segment_maps().unwrap();
        // halfway between 0.0->0.2 and 1.0->1.0 pivots
        let v = apply_segment_map(&maps[0], 0.5);
        assert!((v - 0.6).abs() < 1e-6);
    }
}
