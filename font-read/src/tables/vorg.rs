//! `VORG`: vertical origin overrides for CFF-flavored fonts.
//! https://learn.microsoft.com/en-us/typography/opentype/spec/vorg

use font_types::{GlyphId, Tag};

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"VORG");

#[derive(Clone, Copy)]
pub struct Vorg<'a> {
    data: FontData<'a>,
    num_rec: u16,
}

impl<'a> FontRead<'a> for Vorg<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let num_rec: u16 = data.read_at(4)?;
        Ok(Vorg { data, num_rec })
    }
}

impl<'a> Vorg<'a> {
    pub fn major_version(&self) -> u16 {
        self.data.read_at(0).unwrap_or(1)
    }
    pub fn default_vert_origin_y(&self) -> i16 {
        self.data.read_at(2).unwrap_or(0)
    }

    /// The vertical origin for `gid`, falling back to `default_vert_origin_y`.
    pub fn vert_origin_y(&self, gid: GlyphId) -> i16 {
        for i in 0..self.num_rec as usize {
            let base = 6 + i * 4;
            let rec_gid: u16 = self.data.read_at(base).unwrap_or(u16::MAX);
            if rec_gid == gid.to_u16() {
                return self.data.read_at(base + 2).unwrap_or(self.default_vert_origin_y());
            }
            if rec_gid > gid.to_u16() {
                break;
            }
        }
        self.default_vert_origin_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default() {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes());
        b.extend_from_slice(&900i16.to_be_bytes());
        b.extend_from_slice(&1u16.to_be_bytes());
        b.extend_from_slice(&5u16.to_be_bytes());
        b.extend_from_slice(&850i16.to_be_bytes());
        let vorg = Vorg::read(FontData::new(&b)).unwrap();
        assert_eq!(vorg.vert_origin_y(GlyphId::new(5)), 850);
        assert_eq!(vorg.vert_origin_y(GlyphId::new(6)), 900);
    }
}
