//! Glyph outline extraction: simple/composite `glyf` decoding (with `gvar`
//! deltas applied) and CFF Type-2 charstring interpretation, both reduced
//! to the same path-segment representation for SVG emission.

pub mod cff;
pub mod glyf;

use font_read::FontRef;
use font_types::GlyphId;

use crate::error::{Result, ScaleError};
use crate::instance::Location;

/// One drawing command of an outline's path, in font design units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { cx: f64, cy: f64, x: f64, y: f64 },
    CurveTo { c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64 },
    Close,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<BoundingBox> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let mut bbox = BoundingBox { x_min: x, y_min: y, x_max: x, y_max: y };
        for (x, y) in iter {
            bbox.x_min = bbox.x_min.min(x);
            bbox.y_min = bbox.y_min.min(y);
            bbox.x_max = bbox.x_max.max(x);
            bbox.y_max = bbox.y_max.max(y);
        }
        Some(bbox)
    }
}

/// A fully resolved glyph outline: design-unit path segments plus its
/// (possibly variation-instanced) bounding box and advance width.
#[derive(Clone, Debug, Default)]
pub struct OutlineGlyph {
    segments: Vec<PathSegment>,
    bbox: BoundingBox,
}

impl OutlineGlyph {
    fn new(segments: Vec<PathSegment>) -> Self {
        let bbox = BoundingBox::from_points(segments.iter().flat_map(segment_endpoints)).unwrap_or_default();
        OutlineGlyph { segments, bbox }
    }

    pub fn path_segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Render as an SVG `d` attribute value. The Y axis is flipped (SVG is
    /// Y-down; font design space is Y-up).
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo { x, y } => out.push_str(&format!("M{} {} ", fmt(x), fmt(-y))),
                PathSegment::LineTo { x, y } => out.push_str(&format!("L{} {} ", fmt(x), fmt(-y))),
                PathSegment::QuadTo { cx, cy, x, y } => {
                    out.push_str(&format!("Q{} {} {} {} ", fmt(cx), fmt(-cy), fmt(x), fmt(-y)))
                }
                PathSegment::CurveTo { c1x, c1y, c2x, c2y, x, y } => out.push_str(&format!(
                    "C{} {} {} {} {} {} ",
                    fmt(c1x),
                    fmt(-c1y),
                    fmt(c2x),
                    fmt(-c2y),
                    fmt(x),
                    fmt(-y)
                )),
                PathSegment::Close => out.push_str("Z "),
            }
        }
        out.trim_end().to_string()
    }
}

fn fmt(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn segment_endpoints(seg: &PathSegment) -> Vec<(f64, f64)> {
    match *seg {
        PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => vec![(x, y)],
        PathSegment::QuadTo { cx, cy, x, y } => vec![(cx, cy), (x, y)],
        PathSegment::CurveTo { c1x, c1y, c2x, c2y, x, y } => vec![(c1x, c1y), (c2x, c2y), (x, y)],
        PathSegment::Close => vec![],
    }
}

/// Emit a quadratic B-spline contour's path segments: rotate to start at
/// the first on-curve point (synthesizing a start point
/// as the midpoint of two consecutive off-curve points if there is none),
/// then walk emitting `L` for on-curve points and `Q` for off-curve points
/// (with an implied on-curve midpoint between two consecutive off-curve
/// points), closing the contour.
pub(crate) fn quadratic_contour_to_segments(points: &[(f64, f64, bool)]) -> Vec<PathSegment> {
    if points.is_empty() {
        return Vec::new();
    }
    let start_idx = points.iter().position(|p| p.2);
    let (rotated, start) = match start_idx {
        Some(i) => {
            let mut rotated = points[i..].to_vec();
            rotated.extend_from_slice(&points[..i]);
            let start = (rotated[0].0, rotated[0].1);
            (rotated, start)
        }
        None => {
            // All-off-curve contour (e.g. a circle built from conics only):
            // the implied start point is the midpoint of the last and first points.
            let (lx, ly, _) = points[points.len() - 1];
            let (fx, fy, _) = points[0];
            let start = ((lx + fx) / 2.0, (ly + fy) / 2.0);
            (points.to_vec(), start)
        }
    };

    let mut segments = vec![PathSegment::MoveTo { x: start.0, y: start.1 }];
    let mut i = if start_idx.is_some() { 1 } else { 0 };
    let n = rotated.len();
    let mut visited = 0;
    while visited < n {
        let (x, y, on_curve) = rotated[i % n];
        if on_curve {
            segments.push(PathSegment::LineTo { x, y });
        } else {
            let (nx, ny, n_on) = rotated[(i + 1) % n];
            let (ex, ey) = if n_on {
                (nx, ny)
            } else {
                ((x + nx) / 2.0, (y + ny) / 2.0)
            };
            segments.push(PathSegment::QuadTo { cx: x, cy: y, x: ex, y: ey });
            if !n_on {
                // The synthesized midpoint consumed this step only; advance
                // one position so the next off-curve point is handled too.
            }
        }
        i += 1;
        visited += 1;
    }
    segments.push(PathSegment::Close);
    segments
}

/// Extract `gid`'s outline, dispatching on whether the font is CFF- or
/// glyf-flavored, optionally instanced at `location`.
pub fn outline_glyph(font: &FontRef<'_>, gid: GlyphId, location: Option<&Location>) -> Result<OutlineGlyph> {
    if font.is_cff() {
        cff::outline(font, gid)
    } else if font.has_table(font_read::tables::glyf::TAG) {
        glyf::outline(font, gid, location)
    } else {
        Err(ScaleError::NoOutlineFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_on_curve_triangle_emits_lines() {
        let points = vec![(0.0, 0.0, true), (10.0, 0.0, true), (10.0, 10.0, true)];
        let segments = quadratic_contour_to_segments(&points);
        assert_eq!(
            segments,
            vec![
                PathSegment::MoveTo { x: 0.0, y: 0.0 },
                PathSegment::LineTo { x: 10.0, y: 0.0 },
                PathSegment::LineTo { x: 10.0, y: 10.0 },
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn consecutive_off_curve_points_get_implied_midpoint() {
        let points = vec![(0.0, 0.0, true), (10.0, 10.0, false), (20.0, 0.0, false)];
        let segments = quadratic_contour_to_segments(&points);
        assert_eq!(segments[0], PathSegment::MoveTo { x: 0.0, y: 0.0 });
        match segments[1] {
            PathSegment::QuadTo { cx, cy, x, y } => {
                assert_eq!((cx, cy), (10.0, 10.0));
                assert_eq!((x, y), (15.0, 5.0));
            }
            other => panic!("expected QuadTo, got {other:?}"),
        }
    }

    #[test]
    fn bounding_box_covers_control_points() {
        let glyph = OutlineGlyph::new(vec![
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::QuadTo { cx: 5.0, cy: 20.0, x: 10.0, y: 0.0 },
            PathSegment::Close,
        ]);
        let bbox = glyph.bounding_box();
        assert_eq!(bbox.y_max, 20.0);
    }
}
