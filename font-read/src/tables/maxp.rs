//! The `maxp` table: https://learn.microsoft.com/en-us/typography/opentype/spec/maxp
//!
//! Version 0.5 (CFF-flavored fonts) carries only `numGlyphs`; version 1.0
//! (TrueType-flavored fonts) adds the full set of profiling fields.

use font_types::Tag;

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"maxp");

#[derive(Clone, Copy)]
pub struct Maxp<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Maxp<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _: u16 = data.read_at(4)?;
        Ok(Maxp { data })
    }
}

impl<'a> Maxp<'a> {
    pub fn version(&self) -> f64 {
        self.data
            .read_at::<font_types::Fixed>(0)
            .map(font_types::Fixed::to_f64)
            .unwrap_or(0.5)
    }
    pub fn num_glyphs(&self) -> u16 {
        self.data.read_at(4).unwrap_or(0)
    }
    /// Fields below are only present in version 1.0 (`0x00010000`) fonts.
    pub fn max_points(&self) -> Option<u16> {
        self.data.read_at(6).ok()
    }
    pub fn max_contours(&self) -> Option<u16> {
        self.data.read_at(8).ok()
    }
    pub fn max_composite_points(&self) -> Option<u16> {
        self.data.read_at(10).ok()
    }
    pub fn max_composite_contours(&self) -> Option<u16> {
        self.data.read_at(12).ok()
    }
    pub fn max_zones(&self) -> Option<u16> {
        self.data.read_at(14).ok()
    }
    pub fn max_twilight_points(&self) -> Option<u16> {
        self.data.read_at(16).ok()
    }
    pub fn max_storage(&self) -> Option<u16> {
        self.data.read_at(18).ok()
    }
    pub fn max_function_defs(&self) -> Option<u16> {
        self.data.read_at(20).ok()
    }
    pub fn max_instruction_defs(&self) -> Option<u16> {
        self.data.read_at(22).ok()
    }
    pub fn max_stack_elements(&self) -> Option<u16> {
        self.data.read_at(24).ok()
    }
    pub fn max_size_of_instructions(&self) -> Option<u16> {
        self.data.read_at(26).ok()
    }
    pub fn max_component_elements(&self) -> Option<u16> {
        self.data.read_at(28).ok()
    }
    pub fn max_component_depth(&self) -> Option<u16> {
        self.data.read_at(30).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_version_0_5() {
        let mut b = vec![0u8; 6];
        b[0..4].copy_from_slice(&0x0000_5000u32.to_be_bytes());
        b[4..6].copy_from_slice(&42u16.to_be_bytes());
        let maxp = Maxp::read(FontData::new(&b)).unwrap();
        assert_eq!(maxp.num_glyphs(), 42);
        assert!(maxp.max_points().is_none());
    }

    #[test]
    fn reads_version_1_0() {
        let mut b = vec![0u8; 32];
        b[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        b[4..6].copy_from_slice(&7u16.to_be_bytes());
        b[6..8].copy_from_slice(&500u16.to_be_bytes());
        let maxp = Maxp::read(FontData::new(&b)).unwrap();
        assert_eq!(maxp.num_glyphs(), 7);
        assert_eq!(maxp.max_points(), Some(500));
    }
}
