//! A variable-font instance location: a normalized coordinate per axis,
//! derived from either user-space axis values (through `fvar`'s
//! min/default/max and `avar`'s piecewise remap) or a named instance.
//!
//! Mirrors the shape of `skrifa::instance::Location`/`LocationRef`, but
//! built directly on `font-read`'s table accessors rather than a separate
//! metadata-provider trait.

use font_types::Tag;

use font_read::tables::avar::{apply_segment_map, AxisValueMapPoint};
use font_read::tables::fvar::VariationAxisRecord;
use font_read::FontRef;

use crate::error::{Result, ScaleError};

/// A normalized design-space location: one `[-1, 1]` coordinate per axis
/// the font's `fvar` declares, in `fvar`'s axis order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Location {
    coords: Vec<f64>,
}

impl Location {
    /// The default instance: every axis at its default value (coordinate 0).
    pub fn default_for(font: &FontRef<'_>) -> Result<Self> {
        let axis_count = font.fvar().map(|f| f.axis_count()).unwrap_or(0);
        Ok(Location {
            coords: vec![0.0; axis_count as usize],
        })
    }

    /// Build from a set of user-space `(axis_tag, value)` pairs. Axes the
    /// font declares but the caller doesn't mention stay at their default
    /// (coordinate 0); axis tags the font doesn't declare are ignored.
    pub fn from_user_coords(font: &FontRef<'_>, user: &[(Tag, f64)]) -> Result<Self> {
        let fvar = font.fvar()?;
        let axes = fvar.axes();
        let avar_maps = font
            .avar()
            .ok()
            .and_then(|avar| avar.segment_maps().ok());

        let mut coords = Vec::with_capacity(axes.len());
        for (i, axis) in axes.iter().enumerate() {
            let user_value = user
                .iter()
                .find(|(tag, _)| *tag == axis.axis_tag)
                .map(|(_, v)| *v)
                .unwrap_or(axis.default_value);
            let normalized = normalize_axis(axis, user_value);
            let normalized = match &avar_maps {
                Some(maps) => apply_segment_map(maps.get(i).map(Vec::as_slice).unwrap_or(&[]), normalized),
                None => normalized,
            };
            coords.push(normalized);
        }
        Ok(Location { coords })
    }

    /// Build from one of `fvar`'s named instances, by its `subfamily_name_id`.
    pub fn from_named_instance(font: &FontRef<'_>, name_id: u16) -> Result<Option<Self>> {
        let fvar = font.fvar()?;
        let axes = fvar.axes();
        let Some((_, user_coords, _)) = fvar
            .instances()?
            .into_iter()
            .find(|(id, ..)| *id == name_id)
        else {
            return Ok(None);
        };
        let user: Vec<(Tag, f64)> = axes
            .iter()
            .zip(user_coords)
            .map(|(axis, v)| (axis.axis_tag, v))
            .collect();
        Self::from_user_coords(font, &user).map(Some)
    }

    /// Normalized coordinates in `fvar` axis order.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Whether every axis sits at its default (coordinate exactly 0), in
    /// which case no variation data needs to be applied at all.
    pub fn is_default(&self) -> bool {
        self.coords.iter().all(|&c| c == 0.0)
    }

    /// The normalized coordinate for `axis_tag`, or an error if the font
    /// has no such axis.
    pub fn coord_for(&self, font: &FontRef<'_>, axis_tag: Tag) -> Result<f64> {
        let axes = font.fvar()?.axes();
        let idx = axes
            .iter()
            .position(|a| a.axis_tag == axis_tag)
            .ok_or(ScaleError::UnknownAxis(axis_tag))?;
        Ok(self.coords.get(idx).copied().unwrap_or(0.0))
    }
}

/// Normalize one axis's user-space value to `[-1, 1]` per `fvar`'s
/// min/default/max, before any `avar` remap.
fn normalize_axis(axis: &VariationAxisRecord, user_value: f64) -> f64 {
    if user_value == axis.default_value {
        0.0
    } else if user_value < axis.default_value {
        let denom = axis.default_value - axis.min_value;
        if denom == 0.0 {
            0.0
        } else {
            ((user_value - axis.default_value) / denom).max(-1.0)
        }
    } else {
        let denom = axis.max_value - axis.default_value;
        if denom == 0.0 {
            0.0
        } else {
            ((user_value - axis.default_value) / denom).min(1.0)
        }
    }
}

/// Apply an axis's `avar` segment map to an already fvar-normalized
/// coordinate. Exposed for callers that have normalized coordinates from
/// elsewhere (e.g. a cached [`Location`]) and just need the remap.
pub fn apply_avar(map: &[AxisValueMapPoint], coord: f64) -> f64 {
    apply_segment_map(map, coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(min: f64, default: f64, max: f64) -> VariationAxisRecord {
        VariationAxisRecord {
            axis_tag: Tag::new(b"wght"),
            min_value: min,
            default_value: default,
            max_value: max,
            flags: 0,
            axis_name_id: 0,
        }
    }

    #[test]
    fn default_value_normalizes_to_zero() {
        assert_eq!(normalize_axis(&axis(100.0, 400.0, 900.0), 400.0), 0.0);
    }

    #[test]
    fn below_default_normalizes_negative() {
        assert_eq!(normalize_axis(&axis(100.0, 400.0, 900.0), 100.0), -1.0);
        assert_eq!(normalize_axis(&axis(100.0, 400.0, 900.0), 250.0), -0.5);
    }

    #[test]
    fn above_default_normalizes_positive() {
        assert_eq!(normalize_axis(&axis(100.0, 400.0, 900.0), 900.0), 1.0);
        assert_eq!(normalize_axis(&axis(100.0, 400.0, 900.0), 650.0), 0.5);
    }
}
