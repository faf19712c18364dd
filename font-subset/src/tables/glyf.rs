//! Rewriting `glyf`/`loca`: simple glyphs copy through untouched, composite
//! glyphs get their component ids renumbered through the subset's
//! old-to-new map.

use font_read::tables::glyf::{Anchor, Glyph, COMPONENT_ARG_1_AND_2_ARE_WORDS, COMPONENT_ARGS_ARE_XY_VALUES, COMPONENT_MORE_COMPONENTS, COMPONENT_WE_HAVE_AN_X_AND_Y_SCALE, COMPONENT_WE_HAVE_A_SCALE, COMPONENT_WE_HAVE_A_TWO_BY_TWO};
use font_read::FontRef;
use font_types::{F2Dot14, GlyphId};
use font_write::tables::glyf::{compile_glyf_loca, GlyfLoca};

use crate::error::Result;
use crate::plan::SubsetPlan;

/// Builds the new `glyf`/`loca` pair in new-glyph-id order.
pub fn subset_glyf_loca(font: &FontRef<'_>, plan: &SubsetPlan) -> Result<GlyfLoca> {
    let loca = font.loca()?;
    let glyf = font.glyf()?;

    let mut glyphs = Vec::with_capacity(plan.new_to_old().len());
    for &old_gid in plan.new_to_old() {
        let bytes = match glyf.glyph(&loca, old_gid)? {
            None => Vec::new(),
            Some(glyph @ Glyph::Simple(_)) => glyph.raw_data().to_vec(),
            Some(Glyph::Composite(composite)) => {
                rewrite_composite(&composite, old_gid, plan)?
            }
        };
        glyphs.push(bytes);
    }

    Ok(compile_glyf_loca(&glyphs))
}

fn rewrite_composite(
    composite: &font_read::tables::glyf::CompositeGlyph<'_>,
    old_gid: GlyphId,
    plan: &SubsetPlan,
) -> Result<Vec<u8>> {
    let header = &Glyph::Composite(*composite).raw_data()[..10];
    let mut out = header.to_vec();

    let components = composite.components()?;
    let n = components.len();
    for (i, component) in components.iter().enumerate() {
        let new_gid = plan.remap(component.glyph_id).ok_or_else(|| {
            crate::error::SubsetError::TableError(
                font_types::Tag::new(b"glyf"),
                format!(
                    "composite glyph {old_gid:?} references component {:?} outside the subset closure",
                    component.glyph_id
                ),
            )
        })?;

        let mut flags = component.flags;
        if i + 1 < n {
            flags |= COMPONENT_MORE_COMPONENTS;
        } else {
            flags &= !COMPONENT_MORE_COMPONENTS;
        }

        out.extend_from_slice(&flags.to_be_bytes());
        out.extend_from_slice(&new_gid.to_u16().to_be_bytes());

        let words = flags & COMPONENT_ARG_1_AND_2_ARE_WORDS != 0;
        let xy = flags & COMPONENT_ARGS_ARE_XY_VALUES != 0;
        let (a, b): (i32, i32) = match component.anchor {
            Anchor::Offset { dx, dy } => (dx, dy),
            Anchor::Point { base, component } => (base as i32, component as i32),
        };
        debug_assert!(xy || matches!(component.anchor, Anchor::Point { .. }));
        if words {
            out.extend_from_slice(&(a as i16).to_be_bytes());
            out.extend_from_slice(&(b as i16).to_be_bytes());
        } else {
            out.push(a as i8 as u8);
            out.push(b as i8 as u8);
        }

        if flags & COMPONENT_WE_HAVE_A_SCALE != 0 {
            out.extend_from_slice(&F2Dot14::from_f64(component.transform[0]).to_be_bytes());
        } else if flags & COMPONENT_WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            out.extend_from_slice(&F2Dot14::from_f64(component.transform[0]).to_be_bytes());
            out.extend_from_slice(&F2Dot14::from_f64(component.transform[3]).to_be_bytes());
        } else if flags & COMPONENT_WE_HAVE_A_TWO_BY_TWO != 0 {
            for v in component.transform {
                out.extend_from_slice(&F2Dot14::from_f64(v).to_be_bytes());
            }
        }
    }

    let instructions = composite.instructions()?;
    if !instructions.is_empty() {
        out.extend_from_slice(&(instructions.len() as u16).to_be_bytes());
        out.extend_from_slice(instructions);
    }

    Ok(out)
}
