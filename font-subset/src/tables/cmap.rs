//! Rewriting `cmap` to the retained glyph set.

use font_read::FontRef;
use font_types::GlyphId;
use font_scale::charmap::Charmap;
use font_write::tables::cmap::CmapTable;

use crate::error::Result;
use crate::plan::SubsetPlan;

/// Every `(codepoint, new_glyph_id)` pair whose old glyph survived the
/// subset, ready for [`CmapTable::from_mappings`].
pub fn subset_cmap(font: &FontRef<'_>, plan: &SubsetPlan) -> Result<CmapTable> {
    let charmap = Charmap::new(font)?;
    let mappings: Vec<(u32, GlyphId)> = charmap
        .all_mappings()
        .into_iter()
        .filter_map(|(cp, old_gid)| plan.remap(old_gid).map(|new_gid| (cp, new_gid)))
        .collect();
    Ok(CmapTable::from_mappings(mappings))
}
