//! Tuple-variation scalar computation and per-glyph `gvar` delta
//! accumulation.
//!
//! The scalar math is shared with `HVAR`/`MVAR`/`VVAR` via
//! [`font_read::tables::ivs::region_scalar`]: a `gvar` tuple with no
//! intermediate region is equivalent to an `ItemVariationStore` region
//! whose `(start, peak, end)` is `(min(0, peak), peak, max(0, peak))` per
//! axis, so there is no need for a second scalar formula.

use font_read::tables::ivs::region_scalar;
use font_read::tables::variation_common::{PackedPointNumbers, RawTupleVariation, TupleVariationHeader};

use crate::error::Result;
use crate::iup::iup_glyph;

/// The interpolation scalar (`[0, 1]`) a tuple contributes at `coords`.
pub fn tuple_scalar(header: &TupleVariationHeader, shared_tuples: &[Vec<f64>], coords: &[f64]) -> f64 {
    let peak = header
        .peak
        .clone()
        .unwrap_or_else(|| {
            header
                .shared_tuple_index
                .and_then(|i| shared_tuples.get(i as usize).cloned())
                .unwrap_or_default()
        });
    let region: Vec<(f64, f64, f64)> = match &header.intermediate {
        Some((start, end)) => peak
            .iter()
            .zip(start.iter())
            .zip(end.iter())
            .map(|((&p, &s), &e)| (s, p, e))
            .collect(),
        None => peak.iter().map(|&p| (p.min(0.0), p, p.max(0.0))).collect(),
    };
    region_scalar(&region, coords)
}

/// Sum every tuple's contribution into a per-point `(dx, dy)` delta for a
/// glyph's on-curve/off-curve outline points plus its four phantom points.
///
/// `contour_ends` is glyf's `endPtsOfContours` (point count `== num_outline_points`).
/// `original_points` holds only the outline points (not phantom); phantom
/// point deltas are taken directly from whichever tuples reference them and
/// are never IUP-inferred (see `iup` module docs).
#[allow(clippy::too_many_arguments)]
pub fn accumulate_glyph_deltas(
    tuples: &[RawTupleVariation<'_>],
    shared_points: Option<&PackedPointNumbers>,
    shared_tuples: &[Vec<f64>],
    coords: &[f64],
    original_points: &[(i32, i32)],
    contour_ends: &[u16],
) -> Result<Vec<(f64, f64)>> {
    const NUM_PHANTOM: usize = 4;
    let num_outline_points = original_points.len();
    let total_points = num_outline_points + NUM_PHANTOM;
    let mut total = vec![(0.0f64, 0.0f64); total_points];

    for tuple in tuples {
        let scalar = tuple_scalar(&tuple.header, shared_tuples, coords);
        if scalar == 0.0 {
            continue;
        }
        let raw = tuple.deltas(total_points, shared_points)?;
        if raw.len() == total_points {
            // Fast path: every point (including phantom) has an explicit delta.
            for (pt, dx, dy) in raw {
                let pt = pt as usize;
                total[pt].0 += dx as f64 * scalar;
                total[pt].1 += dy as f64 * scalar;
            }
            continue;
        }

        let mut opt_deltas: Vec<Option<(f64, f64)>> = vec![None; num_outline_points];
        let mut phantom_deltas = [(0.0f64, 0.0f64); NUM_PHANTOM];
        for (pt, dx, dy) in raw {
            let pt = pt as usize;
            if pt < num_outline_points {
                opt_deltas[pt] = Some((dx as f64, dy as f64));
            } else if let Some(idx) = pt.checked_sub(num_outline_points) {
                if idx < NUM_PHANTOM {
                    phantom_deltas[idx] = (dx as f64, dy as f64);
                }
            }
        }
        iup_glyph(original_points, contour_ends, &mut opt_deltas);
        for (i, d) in opt_deltas.into_iter().enumerate() {
            let (dx, dy) = d.unwrap_or((0.0, 0.0));
            total[i].0 += dx * scalar;
            total[i].1 += dy * scalar;
        }
        for (i, (dx, dy)) in phantom_deltas.into_iter().enumerate() {
            total[num_outline_points + i].0 += dx * scalar;
            total[num_outline_points + i].1 += dy * scalar;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_no_intermediate(peak: Vec<f64>) -> TupleVariationHeader {
        TupleVariationHeader {
            variation_data_size: 0,
            peak: Some(peak),
            shared_tuple_index: None,
            intermediate: None,
            has_private_points: false,
        }
    }

    #[test]
    fn scalar_is_one_at_peak() {
        let header = header_no_intermediate(vec![1.0]);
        assert_eq!(tuple_scalar(&header, &[], &[1.0]), 1.0);
    }

    #[test]
    fn scalar_is_zero_beyond_peak() {
        let header = header_no_intermediate(vec![1.0]);
        assert_eq!(tuple_scalar(&header, &[], &[-1.0]), 0.0);
    }

    #[test]
    fn scalar_interpolates_toward_peak() {
        let header = header_no_intermediate(vec![1.0]);
        assert_eq!(tuple_scalar(&header, &[], &[0.5]), 0.5);
    }

    #[test]
    fn scalar_with_intermediate_region() {
        let header = TupleVariationHeader {
            variation_data_size: 0,
            peak: Some(vec![1.0]),
            shared_tuple_index: None,
            intermediate: Some((vec![0.0], vec![2.0])),
            has_private_points: false,
        };
        assert_eq!(tuple_scalar(&header, &[], &[0.0]), 0.0);
        assert_eq!(tuple_scalar(&header, &[], &[2.0]), 0.0);
        assert_eq!(tuple_scalar(&header, &[], &[1.0]), 1.0);
    }
}
