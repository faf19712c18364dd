//! Subsetting: glyph closure, old→new glyph-id renumbering, per-table
//! rewrite, and sfnt re-emission with recomputed checksums.
//!
//! [`subset`] is the single entry point a caller (a PDF generator, a font
//! server) needs; everything else in this crate is the machinery it wires
//! together. See [`crate::closure`] for how the retained glyph set is
//! computed, [`crate::plan`] for the renumbering, [`crate::tables`] and
//! [`crate::cff`] for the per-table rewrites, and `font_write::font_builder`
//! for final assembly.

pub mod cff;
pub mod closure;
pub mod error;
pub mod flags;
pub mod plan;
pub mod tables;

use std::collections::BTreeSet;

use font_read::FontRef;
use font_scale::charmap::Charmap;
use font_types::{GlyphId, Tag};
use font_write::font_builder::FontBuilder;
use font_write::tables::head::HeadTable;
use font_write::tables::maxp::MaxpTable;
use font_write::write::dump_table;

use error::{Result, SubsetError};
use flags::SubsetFlags;
use plan::SubsetPlan;

const SFNT_VERSION_TRUETYPE: u32 = 0x0001_0000;
const SFNT_VERSION_OTTO: u32 = 0x4F54_544F; // 'OTTO'

/// Subsets `font` down to the glyphs needed to represent `codepoints`,
/// producing a fresh, checksum-valid sfnt byte buffer. `.notdef` (glyph 0)
/// and, for TrueType outlines, every composite glyph's component closure
/// are always retained alongside the requested codepoints' glyphs.
///
/// `codepoints` that don't map to anything in `font`'s `cmap` are silently
/// ignored; the closure starts from whatever `cmap` actually resolves. An
/// empty result set, where no codepoints were requested and the font's
/// `.notdef` is the only retained glyph, is still a valid, if degenerate,
/// subset.
pub fn subset(font: &FontRef<'_>, codepoints: &BTreeSet<u32>, flags: SubsetFlags) -> Result<Vec<u8>> {
    font.validate_required_tables()?;

    let charmap = Charmap::new(font)?;
    let used_glyphs: Vec<GlyphId> = codepoints.iter().filter_map(|&cp| charmap.map(cp)).collect();
    if used_glyphs.is_empty() && !codepoints.is_empty() {
        return Err(SubsetError::EmptyClosure);
    }

    let closure = closure::glyph_closure(font, used_glyphs)?;
    let plan = SubsetPlan::new(closure);

    let mut builder = FontBuilder::new();
    let is_cff = font.is_cff();

    let glyf_loca = if is_cff {
        None
    } else {
        Some(tables::glyf::subset_glyf_loca(font, &plan)?)
    };

    let maxp = font.maxp()?;
    let maxp_table = MaxpTable::from_parsed(&maxp, plan.num_output_glyphs());
    builder.add_table(Tag::new(b"maxp"), dump_table(&maxp_table));

    let head = font.head()?;
    let mut head_table = HeadTable::from_parsed(&head);
    if let Some(gl) = &glyf_loca {
        head_table.index_to_loc_format = if gl.is_long_loca { 1 } else { 0 };
        let (x_min, y_min, x_max, y_max) = glyf_bbox(font, &plan)?;
        head_table.x_min = x_min;
        head_table.y_min = y_min;
        head_table.x_max = x_max;
        head_table.y_max = y_max;
    }
    builder.add_table(Tag::new(b"head"), dump_table(&head_table));

    if let Some(gl) = glyf_loca {
        builder.add_table(Tag::new(b"glyf"), gl.glyf);
        builder.add_table(Tag::new(b"loca"), gl.loca);
    } else {
        let cff_bytes = cff::subset_cff(font, &plan, flags)?;
        builder.add_table(Tag::new(b"CFF "), cff_bytes);
    }

    let hhea = font.hhea()?;
    let hmtx = font.hmtx()?;
    let metrics = tables::metrics::subset_metrics(&hhea, &hmtx, &plan);
    builder.add_table(Tag::new(b"hhea"), dump_table(&metrics.hhea));
    builder.add_table(Tag::new(b"hmtx"), dump_table(&metrics.mtx));

    if font.has_table(Tag::new(b"vhea")) && font.has_table(Tag::new(b"vmtx")) {
        let vhea = font.vhea()?;
        let vmtx = font.vmtx()?;
        let vmetrics = tables::metrics::subset_metrics(&vhea, &vmtx, &plan);
        builder.add_table(Tag::new(b"vhea"), dump_table(&vmetrics.hhea));
        builder.add_table(Tag::new(b"vmtx"), dump_table(&vmetrics.mtx));
    }

    let cmap_table = tables::cmap::subset_cmap(font, &plan)?;
    builder.add_table(Tag::new(b"cmap"), dump_table(&cmap_table));

    let post = font.post()?;
    let post_table = tables::post::PostTable::from_parsed(&post);
    builder.add_table(Tag::new(b"post"), dump_table(&post_table));

    for (tag, data) in tables::passthrough::passthrough_tables(font, flags)? {
        builder.add_table(tag, data);
    }

    let sfnt_version = if is_cff { SFNT_VERSION_OTTO } else { SFNT_VERSION_TRUETYPE };
    Ok(builder.build(sfnt_version))
}

/// The union bounding box of every retained glyph's own `glyf` header bbox,
/// for `head`'s `xMin`/`yMin`/`xMax`/`yMax`. A subset with no glyph whose
/// outline bbox differs from `(0,0,0,0)` (e.g. an all-blank subset) keeps
/// zeros, matching an empty-glyph font.
fn glyf_bbox(font: &FontRef<'_>, plan: &SubsetPlan) -> Result<(i16, i16, i16, i16)> {
    let loca = font.loca()?;
    let glyf = font.glyf()?;

    let mut x_min = 0i16;
    let mut y_min = 0i16;
    let mut x_max = 0i16;
    let mut y_max = 0i16;
    let mut seen_any = false;

    for &old_gid in plan.new_to_old() {
        let Some(glyph) = glyf.glyph(&loca, old_gid)? else {
            continue;
        };
        if !seen_any {
            x_min = glyph.x_min();
            y_min = glyph.y_min();
            x_max = glyph.x_max();
            y_max = glyph.y_max();
            seen_any = true;
            continue;
        }
        x_min = x_min.min(glyph.x_min());
        y_min = y_min.min(glyph.y_min());
        x_max = x_max.max(glyph.x_max());
        y_max = y_max.max(glyph.y_max());
    }

    Ok((x_min, y_min, x_max, y_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_strip_everything_optional() {
        let flags = SubsetFlags::default();
        assert!(!flags.retain_hinting);
        assert!(!flags.retain_layout);
        assert!(!flags.retain_kerning);
        assert!(!flags.retain_dsig);
        assert!(!flags.desubroutinize);
    }
}
