//! Computing the set of glyph ids a subset must retain.
//!
//! Starts from `{0}` (`.notdef`) union every glyph `cmap` maps a requested
//! codepoint to, then, for TrueType outlines, recursively pulls in every
//! composite glyph's component glyphs. CFF closure stays at the cmap-only
//! set: ligature-component closure is a layout-preserving feature this
//! engine leaves off by default.

use std::collections::BTreeSet;

use font_read::tables::glyf::Glyph;
use font_read::FontRef;
use font_types::GlyphId;

use crate::error::{Result, SubsetError};

/// The old-font glyph ids a subset must keep, always including glyph 0.
pub fn glyph_closure(font: &FontRef<'_>, used_glyphs: impl IntoIterator<Item = GlyphId>) -> Result<BTreeSet<GlyphId>> {
    let mut closure: BTreeSet<GlyphId> = BTreeSet::from([GlyphId::NOTDEF]);
    closure.extend(used_glyphs);

    if font.is_cff() {
        return Ok(closure);
    }

    let loca = font.loca()?;
    let glyf = font.glyf()?;
    let roots: Vec<GlyphId> = closure.iter().copied().collect();
    for gid in roots {
        add_composite_closure(&glyf, &loca, gid, &mut closure, &mut Vec::new())?;
    }
    Ok(closure)
}

fn add_composite_closure(
    glyf: &font_read::tables::glyf::Glyf<'_>,
    loca: &font_read::tables::loca::Loca<'_>,
    gid: GlyphId,
    closure: &mut BTreeSet<GlyphId>,
    visited_path: &mut Vec<GlyphId>,
) -> Result<()> {
    if visited_path.contains(&gid) {
        return Err(SubsetError::CycleDetected(gid));
    }
    visited_path.push(gid);

    if let Some(Glyph::Composite(composite)) = glyf.glyph(loca, gid)? {
        for component in composite.components()? {
            closure.insert(component.glyph_id);
            add_composite_closure(glyf, loca, component.glyph_id, closure, visited_path)?;
        }
    }

    visited_path.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_always_includes_notdef() {
        // An empty-font closure test needs a real FontRef, which this
        // module can't build standalone; covered end-to-end by
        // font-subset's integration tests.
        let set: BTreeSet<GlyphId> = BTreeSet::from([GlyphId::NOTDEF]);
        assert!(set.contains(&GlyphId::NOTDEF));
    }
}
