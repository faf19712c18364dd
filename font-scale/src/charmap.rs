//! Codepoint → glyph lookup, thin sugar over `cmap`'s best Unicode subtable.

use font_types::GlyphId;
use font_read::FontRef;

use crate::error::Result;

pub struct Charmap<'a> {
    cmap: Option<font_read::tables::cmap::Cmap<'a>>,
}

impl<'a> Charmap<'a> {
    pub fn new(font: &FontRef<'a>) -> Result<Self> {
        let cmap = match font.cmap() {
            Ok(cmap) => Some(cmap),
            Err(font_read::error::ReadError::MissingTable(_)) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Charmap { cmap })
    }

    /// The glyph mapped to `codepoint`, or `None` if the font has no
    /// `cmap` or the codepoint is unmapped.
    pub fn map(&self, codepoint: u32) -> Option<GlyphId> {
        self.cmap.as_ref()?.map_codepoint(codepoint)
    }

    /// Every `(codepoint, glyph)` pair this charmap's subtable covers,
    /// sorted by codepoint. Used by the subsetter to build the closure's
    /// cmap-reachable glyph set and to rebuild a subset `cmap`.
    pub fn all_mappings(&self) -> Vec<(u32, GlyphId)> {
        let Some(cmap) = &self.cmap else {
            return Vec::new();
        };
        let Some(sub) = cmap.best_unicode_subtable() else {
            return Vec::new();
        };
        // format-agnostic brute scan over the Unicode range is wasteful for
        // format 12/13; cheaper to read format 4's segments directly when
        // that's what we have, but correctness matters more here than
        // micro-optimizing a subsetter-only helper.
        use font_read::tables::cmap::CmapSubtable;
        match sub {
            CmapSubtable::Format4(_) | CmapSubtable::Format0(_) | CmapSubtable::Format6(_) => {
                (0u32..=0xFFFF)
                    .filter_map(|cp| sub.map_codepoint(cp).map(|gid| (cp, gid)))
                    .collect()
            }
            CmapSubtable::Format10(_) | CmapSubtable::Format12(_) | CmapSubtable::Format13(_) => {
                (0u32..=0x10FFFF)
                    .filter_map(|cp| sub.map_codepoint(cp).map(|gid| (cp, gid)))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cmap_maps_nothing() {
        let charmap = Charmap { cmap: None };
        assert_eq!(charmap.map(65), None);
        assert!(charmap.all_mappings().is_empty());
    }
}
