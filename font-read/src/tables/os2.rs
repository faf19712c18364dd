//! The `OS/2` table: https://learn.microsoft.com/en-us/typography/opentype/spec/os2
//!
//! Fields were added across versions 0-5; every accessor past `version 0`'s
//! fixed set returns `Option`/a default rather than erroring, since readers
//! must tolerate whichever version a font declares.

use font_types::Tag;

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"OS/2");

#[derive(Clone, Copy)]
pub struct Os2<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Os2<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _: u16 = data.read_at(0)?;
        Ok(Os2 { data })
    }
}

impl<'a> Os2<'a> {
    pub fn version(&self) -> u16 {
        self.data.read_at(0).unwrap_or(0)
    }
    pub fn x_avg_char_width(&self) -> i16 {
        self.data.read_at(2).unwrap_or(0)
    }
    pub fn us_weight_class(&self) -> u16 {
        self.data.read_at(4).unwrap_or(400)
    }
    pub fn us_width_class(&self) -> u16 {
        self.data.read_at(6).unwrap_or(5)
    }
    pub fn fs_type(&self) -> u16 {
        self.data.read_at(8).unwrap_or(0)
    }
    pub fn y_subscript_x_size(&self) -> i16 {
        self.data.read_at(10).unwrap_or(0)
    }
    pub fn y_superscript_x_size(&self) -> i16 {
        self.data.read_at(18).unwrap_or(0)
    }
    pub fn y_strikeout_size(&self) -> i16 {
        self.data.read_at(26).unwrap_or(0)
    }
    pub fn y_strikeout_position(&self) -> i16 {
        self.data.read_at(28).unwrap_or(0)
    }
    pub fn s_family_class(&self) -> i16 {
        self.data.read_at(30).unwrap_or(0)
    }
    pub fn panose(&self) -> [u8; 10] {
        let mut out = [0u8; 10];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = self.data.read_at(32 + i).unwrap_or(0);
        }
        out
    }
    pub fn ul_unicode_range1(&self) -> u32 {
        self.data.read_at(42).unwrap_or(0)
    }
    pub fn ul_unicode_range2(&self) -> u32 {
        self.data.read_at(46).unwrap_or(0)
    }
    pub fn ul_unicode_range3(&self) -> u32 {
        self.data.read_at(50).unwrap_or(0)
    }
    pub fn ul_unicode_range4(&self) -> u32 {
        self.data.read_at(54).unwrap_or(0)
    }
    pub fn ach_vend_id(&self) -> Tag {
        self.data
            .read_at::<u32>(58)
            .map(|v| Tag::from_be_bytes(v.to_be_bytes()))
            .unwrap_or(Tag::new(b"NONE"))
    }
    pub fn fs_selection(&self) -> u16 {
        self.data.read_at(62).unwrap_or(0)
    }
    pub fn us_first_char_index(&self) -> u16 {
        self.data.read_at(64).unwrap_or(0)
    }
    pub fn us_last_char_index(&self) -> u16 {
        self.data.read_at(66).unwrap_or(0)
    }
    pub fn s_typo_ascender(&self) -> i16 {
        self.data.read_at(68).unwrap_or(0)
    }
    pub fn s_typo_descender(&self) -> i16 {
        self.data.read_at(70).unwrap_or(0)
    }
    pub fn s_typo_line_gap(&self) -> i16 {
        self.data.read_at(72).unwrap_or(0)
    }
    pub fn us_win_ascent(&self) -> u16 {
        self.data.read_at(74).unwrap_or(0)
    }
    pub fn us_win_descent(&self) -> u16 {
        self.data.read_at(76).unwrap_or(0)
    }
    /// `None` before version 1.
    pub fn ul_code_page_range1(&self) -> Option<u32> {
        self.data.read_at(78).ok()
    }
    pub fn ul_code_page_range2(&self) -> Option<u32> {
        self.data.read_at(82).ok()
    }
    /// `None` before version 2.
    pub fn sx_height(&self) -> Option<i16> {
        self.data.read_at(86).ok()
    }
    pub fn s_cap_height(&self) -> Option<i16> {
        self.data.read_at(88).ok()
    }
    pub fn us_default_char(&self) -> Option<u16> {
        self.data.read_at(90).ok()
    }
    pub fn us_break_char(&self) -> Option<u16> {
        self.data.read_at(92).ok()
    }
    pub fn us_max_context(&self) -> Option<u16> {
        self.data.read_at(94).ok()
    }
    /// `None` before version 5.
    pub fn us_lower_optical_point_size(&self) -> Option<u16> {
        self.data.read_at(96).ok()
    }
    pub fn us_upper_optical_point_size(&self) -> Option<u16> {
        self.data.read_at(98).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_version_0_fields() {
        let mut b = vec![0u8; 78];
        b[0..2].copy_from_slice(&0u16.to_be_bytes());
        b[4..6].copy_from_slice(&700u16.to_be_bytes());
        let os2 = Os2::read(FontData::new(&b)).unwrap();
        assert_eq!(os2.us_weight_class(), 700);
        assert!(os2.sx_height().is_none());
    }
}
