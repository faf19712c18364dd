//! Simple/composite `glyf` outline extraction, with `gvar` deltas applied
//! and composites flattened into a single absolute-coordinate outline.

use font_read::tables::glyf::{Anchor, Component, Glyph};
use font_read::FontRef;
use font_types::GlyphId;

use crate::error::{Result, ScaleError};
use crate::instance::Location;
use crate::variation::accumulate_glyph_deltas;

use super::{quadratic_contour_to_segments, OutlineGlyph};

/// Composite glyphs nest at most this deep; beyond it we assume a cycle or
/// a malformed font rather than looping forever.
const MAX_COMPONENT_DEPTH: u32 = 32;

/// This glyph's four phantom points (left/right side bearing, top/bottom
/// side bearing), in `glyf`'s point order: left, right, top, bottom.
/// Vertical phantom points are zeroed when the font has no `vmtx`.
fn phantom_points(font: &FontRef<'_>, gid: GlyphId, x_min: i32, y_max: i32) -> Result<[(f64, f64); 4]> {
    let advance_width = font.hmtx()?.advance(gid).unwrap_or(0) as f64;
    let lsb = font.hmtx()?.side_bearing(gid).unwrap_or(x_min as i16) as f64;
    let left_x = x_min as f64 - lsb;
    let right_x = left_x + advance_width;
    let (top_y, bottom_y) = match font.vmtx() {
        Ok(vmtx) => {
            let advance_height = vmtx.advance(gid).unwrap_or(0) as f64;
            let tsb = vmtx.side_bearing(gid).unwrap_or(0) as f64;
            let top = y_max as f64 + tsb;
            (top, top - advance_height)
        }
        Err(_) => (0.0, 0.0),
    };
    Ok([(left_x, 0.0), (right_x, 0.0), (0.0, top_y), (0.0, bottom_y)])
}

struct FlattenedPoint {
    x: f64,
    y: f64,
    on_curve: bool,
}

fn flatten(
    font: &FontRef<'_>,
    gid: GlyphId,
    location: Option<&Location>,
    depth: u32,
    visited: &mut Vec<u16>,
) -> Result<(Vec<FlattenedPoint>, Vec<u16>, f64)> {
    if depth > MAX_COMPONENT_DEPTH {
        return Err(ScaleError::RecursionTooDeep(MAX_COMPONENT_DEPTH));
    }
    if visited.contains(&gid.to_u16()) {
        return Err(ScaleError::CycleDetected(gid));
    }
    visited.push(gid.to_u16());

    let loca = font.loca()?;
    let glyf = font.glyf()?;
    let advance_width = font.hmtx()?.advance(gid).unwrap_or(0) as f64;

    let Some(glyph) = glyf.glyph(&loca, gid)? else {
        visited.pop();
        return Ok((Vec::new(), Vec::new(), advance_width));
    };

    match &glyph {
        Glyph::Simple(simple) => {
            let raw_points = simple.points()?;
            let contour_ends = simple.end_pts_of_contours();
            let original: Vec<(i32, i32)> = raw_points.iter().map(|p| (p.x, p.y)).collect();
            let phantom = phantom_points(font, gid, glyph.x_min() as i32, glyph.y_max() as i32)?;

            let deltas = match (location, font.gvar()) {
                (Some(loc), Ok(gvar)) if !loc.is_default() => {
                    apply_gvar(&gvar, gid, &original, &contour_ends, loc.coords())?
                }
                _ => vec![(0.0, 0.0); original.len() + 4],
            };

            let points: Vec<FlattenedPoint> = raw_points
                .iter()
                .zip(deltas.iter())
                .map(|(p, &(dx, dy))| FlattenedPoint {
                    x: p.x as f64 + dx,
                    y: p.y as f64 + dy,
                    on_curve: p.on_curve,
                })
                .collect();

            let phantom_deltas = &deltas[original.len()..];
            let left_x = phantom[0].0 + phantom_deltas[0].0;
            let right_x = phantom[1].0 + phantom_deltas[1].0;
            let varied_advance = right_x - left_x;

            visited.pop();
            Ok((points, contour_ends, varied_advance))
        }
        Glyph::Composite(composite) => {
            let components = composite.components()?;
            let original_anchors: Vec<(i32, i32)> = components
                .iter()
                .map(|c| match c.anchor {
                    Anchor::Offset { dx, dy } => (dx, dy),
                    Anchor::Point { .. } => (0, 0),
                })
                .collect();

            let anchor_deltas = match (location, font.gvar()) {
                (Some(loc), Ok(gvar)) if !loc.is_default() => {
                    let contour_ends = if original_anchors.is_empty() {
                        Vec::new()
                    } else {
                        vec![(original_anchors.len() - 1) as u16]
                    };
                    apply_gvar(&gvar, gid, &original_anchors, &contour_ends, loc.coords())?
                }
                _ => vec![(0.0, 0.0); original_anchors.len() + 4],
            };

            let mut all_points = Vec::new();
            let mut all_ends = Vec::new();
            for (i, component) in components.iter().enumerate() {
                let (child_points, child_ends, _child_advance) =
                    flatten(font, component.glyph_id, location, depth + 1, visited)?;
                let (dx, dy) = match component.anchor {
                    Anchor::Offset { dx, dy } => {
                        let (delta_x, delta_y) = anchor_deltas.get(i).copied().unwrap_or((0.0, 0.0));
                        (dx as f64 + delta_x, dy as f64 + delta_y)
                    }
                    Anchor::Point { base, component: comp_pt } => {
                        resolve_point_match(&all_points, base, &child_points, comp_pt)
                    }
                };
                let base_index = all_points.len();
                for p in &child_points {
                    let (x, y) = apply_transform(component, p.x, p.y);
                    all_points.push(FlattenedPoint { x: x + dx, y: y + dy, on_curve: p.on_curve });
                }
                for end in child_ends {
                    all_ends.push(end + base_index as u16);
                }
            }
            visited.pop();
            Ok((all_points, all_ends, advance_width))
        }
    }
}

fn apply_transform(component: &Component, x: f64, y: f64) -> (f64, f64) {
    let [xx, xy, yx, yy] = component.transform;
    (x * xx + y * yx, x * xy + y * yy)
}

/// Resolve a point-matching anchor: `base` indexes the already-flattened
/// parent outline, `component_pt` indexes the not-yet-transformed child.
fn resolve_point_match(
    parent_points: &[FlattenedPoint],
    base: u16,
    child_points: &[FlattenedPoint],
    component_pt: u16,
) -> (f64, f64) {
    let Some(parent) = parent_points.get(base as usize) else {
        return (0.0, 0.0);
    };
    let Some(child) = child_points.get(component_pt as usize) else {
        return (0.0, 0.0);
    };
    (parent.x - child.x, parent.y - child.y)
}

fn apply_gvar(
    gvar: &font_read::tables::gvar::Gvar<'_>,
    gid: GlyphId,
    original_points: &[(i32, i32)],
    contour_ends: &[u16],
    coords: &[f64],
) -> Result<Vec<(f64, f64)>> {
    let Some(variation_data) = gvar.glyph_variation_data(gid)? else {
        return Ok(vec![(0.0, 0.0); original_points.len() + 4]);
    };
    let (shared_points, tuples) = variation_data.tuples()?;
    let shared_tuples = gvar.shared_tuples()?;
    Ok(accumulate_glyph_deltas(
        &tuples,
        shared_points.as_ref(),
        &shared_tuples,
        coords,
        original_points,
        contour_ends,
    )?)
}

/// Extract `gid`'s outline from `glyf`/`loca`, applying `gvar` deltas for
/// `location` (if given and non-default) and flattening composite
/// components into one absolute-coordinate point list.
pub fn outline(font: &FontRef<'_>, gid: GlyphId, location: Option<&Location>) -> Result<OutlineGlyph> {
    let mut visited = Vec::new();
    let (points, contour_ends, _advance) = flatten(font, gid, location, 0, &mut visited)?;

    let mut segments = Vec::new();
    let mut start = 0usize;
    for &end in &contour_ends {
        let end = end as usize;
        let contour: Vec<(f64, f64, bool)> = points[start..=end]
            .iter()
            .map(|p| (p.x, p.y, p.on_curve))
            .collect();
        segments.extend(quadratic_contour_to_segments(&contour));
        start = end + 1;
    }
    Ok(OutlineGlyph::new(segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_applies_2x2_matrix() {
        let component = Component {
            glyph_id: GlyphId::new(0),
            anchor: Anchor::Offset { dx: 0, dy: 0 },
            transform: [2.0, 0.0, 0.0, 0.5],
            flags: 0,
        };
        assert_eq!(apply_transform(&component, 10.0, 10.0), (20.0, 5.0));
    }

    #[test]
    fn point_match_computes_offset_from_parent() {
        let parent = vec![FlattenedPoint { x: 100.0, y: 50.0, on_curve: true }];
        let child = vec![FlattenedPoint { x: 10.0, y: 5.0, on_curve: true }];
        assert_eq!(resolve_point_match(&parent, 0, &child, 0), (90.0, 45.0));
    }
}
