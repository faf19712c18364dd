//! The old→new glyph-id renumbering every per-table rewrite shares.

use std::collections::BTreeMap;

use font_types::GlyphId;

/// Deterministic glyph renumbering: the retained old glyph ids sorted
/// ascending, assigned new ids `0, 1, 2, …` in that order. Glyph `0`
/// (`.notdef`) is always retained and always sorts first, so it keeps new
/// id `0`.
pub struct SubsetPlan {
    /// `new_to_old[new_gid] == old_gid`.
    new_to_old: Vec<GlyphId>,
    old_to_new: BTreeMap<GlyphId, GlyphId>,
}

impl SubsetPlan {
    pub fn new(used_old_gids: impl IntoIterator<Item = GlyphId>) -> Self {
        let mut new_to_old: Vec<GlyphId> = used_old_gids.into_iter().collect();
        new_to_old.sort_unstable();
        new_to_old.dedup();

        let old_to_new = new_to_old
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, GlyphId::new(new as u16)))
            .collect();

        SubsetPlan { new_to_old, old_to_new }
    }

    pub fn num_output_glyphs(&self) -> u16 {
        self.new_to_old.len() as u16
    }

    /// Glyph ids in new-id order, i.e. `new_to_old()[i]` is the old id of
    /// new glyph `i`.
    pub fn new_to_old(&self) -> &[GlyphId] {
        &self.new_to_old
    }

    /// `old_gid`'s new id, if it was retained.
    pub fn remap(&self, old_gid: GlyphId) -> Option<GlyphId> {
        self.old_to_new.get(&old_gid).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notdef_stays_at_zero() {
        let plan = SubsetPlan::new([GlyphId::new(5), GlyphId::new(0), GlyphId::new(2)]);
        assert_eq!(plan.new_to_old(), &[GlyphId::new(0), GlyphId::new(2), GlyphId::new(5)]);
        assert_eq!(plan.remap(GlyphId::new(0)), Some(GlyphId::new(0)));
        assert_eq!(plan.remap(GlyphId::new(2)), Some(GlyphId::new(1)));
        assert_eq!(plan.remap(GlyphId::new(5)), Some(GlyphId::new(2)));
        assert_eq!(plan.remap(GlyphId::new(3)), None);
    }

    #[test]
    fn duplicate_glyph_ids_are_deduplicated() {
        let plan = SubsetPlan::new([GlyphId::new(1), GlyphId::new(1), GlyphId::new(0)]);
        assert_eq!(plan.num_output_glyphs(), 2);
    }
}
