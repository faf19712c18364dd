//! Assembling `glyf` and `loca` from already-renumbered per-glyph bytes.
//!
//! Renumbering composite components' glyph ids to the subset's new glyph
//! order is the subsetter's job (it owns the old-to-new map); this module
//! only concatenates the resulting byte blobs, pads them to the required
//! 2-byte alignment, and picks `loca`'s short/long format.

use font_types::Tag;

pub const GLYF_TAG: Tag = Tag::new(b"glyf");
pub const LOCA_TAG: Tag = Tag::new(b"loca");

/// The largest byte offset `loca`'s short format can represent: entries
/// store `offset / 2` in a `u16`, so the largest representable offset is
/// `0xFFFF * 2`.
const MAX_SHORT_LOCA_OFFSET: u32 = 0xFFFF * 2;

/// `glyf` bytes, `loca` bytes, and whether `loca` ended up in long format
/// (for `head.indexToLocFormat`).
pub struct GlyfLoca {
    pub glyf: Vec<u8>,
    pub loca: Vec<u8>,
    pub is_long_loca: bool,
}

/// `glyphs[i]` is the complete, already-renumbered outline bytes for new
/// glyph id `i` (empty for a glyph with no outline, e.g. space or `.notdef`
/// with a blank shape).
pub fn compile_glyf_loca(glyphs: &[Vec<u8>]) -> GlyfLoca {
    let mut glyf = Vec::new();
    let mut offsets = Vec::with_capacity(glyphs.len() + 1);
    offsets.push(0u32);
    for glyph in glyphs {
        glyf.extend_from_slice(glyph);
        if glyf.len() % 2 != 0 {
            glyf.push(0);
        }
        offsets.push(glyf.len() as u32);
    }

    let is_long_loca = offsets.last().copied().unwrap_or(0) > MAX_SHORT_LOCA_OFFSET;
    let mut loca = Vec::with_capacity(offsets.len() * if is_long_loca { 4 } else { 2 });
    for offset in &offsets {
        if is_long_loca {
            loca.extend_from_slice(&offset.to_be_bytes());
        } else {
            loca.extend_from_slice(&((*offset / 2) as u16).to_be_bytes());
        }
    }

    GlyfLoca {
        glyf,
        loca,
        is_long_loca,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_glyphs_still_produce_a_loca_entry_per_glyph_plus_one() {
        let result = compile_glyf_loca(&[Vec::new(), Vec::new()]);
        assert!(result.glyf.is_empty());
        assert!(!result.is_long_loca);
        // Short format: 3 entries * 2 bytes.
        assert_eq!(result.loca.len(), 6);
        assert_eq!(result.loca, vec![0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn odd_length_glyph_is_padded() {
        let result = compile_glyf_loca(&[vec![1, 2, 3], vec![4]]);
        // first glyph padded from 3 to 4 bytes, second from 1 to 2.
        assert_eq!(result.glyf.len(), 6);
        assert_eq!(result.loca, vec![0, 0, 0, 2, 0, 3]);
    }

    #[test]
    fn picks_long_format_past_the_short_offset_limit() {
        let big_glyph = vec![0u8; MAX_SHORT_LOCA_OFFSET as usize + 2];
        let result = compile_glyf_loca(&[big_glyph, vec![1, 2]]);
        assert!(result.is_long_loca);
        assert_eq!(result.loca.len(), 3 * 4);
    }
}
