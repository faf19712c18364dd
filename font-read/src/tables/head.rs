//! The `head` table: https://learn.microsoft.com/en-us/typography/opentype/spec/head

use font_types::{LongDateTime, Tag};

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"head");

#[derive(Clone, Copy)]
pub struct Head<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Head<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        // fixed 54-byte table; validate it's long enough up front.
        let _: u32 = data.read_at(50)?;
        Ok(Head { data })
    }
}

impl<'a> Head<'a> {
    pub fn major_version(&self) -> u16 {
        self.data.read_at(0).unwrap_or(1)
    }
    pub fn minor_version(&self) -> u16 {
        self.data.read_at(2).unwrap_or(0)
    }
    pub fn font_revision(&self) -> f64 {
        self.data
            .read_at::<font_types::Fixed>(4)
            .map(font_types::Fixed::to_f64)
            .unwrap_or(0.0)
    }
    pub fn check_sum_adjustment(&self) -> u32 {
        self.data.read_at(8).unwrap_or(0)
    }
    pub fn magic_number(&self) -> u32 {
        self.data.read_at(12).unwrap_or(0)
    }
    pub fn flags(&self) -> u16 {
        self.data.read_at(16).unwrap_or(0)
    }
    pub fn units_per_em(&self) -> u16 {
        self.data.read_at(18).unwrap_or(1000)
    }
    pub fn created(&self) -> LongDateTime {
        self.data.read_at(20).unwrap_or(LongDateTime::new(0))
    }
    pub fn modified(&self) -> LongDateTime {
        self.data.read_at(28).unwrap_or(LongDateTime::new(0))
    }
    pub fn x_min(&self) -> i16 {
        self.data.read_at(36).unwrap_or(0)
    }
    pub fn y_min(&self) -> i16 {
        self.data.read_at(38).unwrap_or(0)
    }
    pub fn x_max(&self) -> i16 {
        self.data.read_at(40).unwrap_or(0)
    }
    pub fn y_max(&self) -> i16 {
        self.data.read_at(42).unwrap_or(0)
    }
    pub fn mac_style(&self) -> u16 {
        self.data.read_at(44).unwrap_or(0)
    }
    pub fn lowest_rec_ppem(&self) -> u16 {
        self.data.read_at(46).unwrap_or(0)
    }
    pub fn font_direction_hint(&self) -> i16 {
        self.data.read_at(48).unwrap_or(2)
    }
    /// `0` ⇒ `loca` is `u16` offsets (halved); `1` ⇒ `u32` offsets.
    pub fn index_to_loc_format(&self) -> i16 {
        self.data.read_at(50).unwrap_or(0)
    }
    pub fn glyph_data_format(&self) -> i16 {
        self.data.read_at(52).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut b = vec![0u8; 54];
        b[0..2].copy_from_slice(&1u16.to_be_bytes());
        b[18..20].copy_from_slice(&2048u16.to_be_bytes());
        b[50..52].copy_from_slice(&1i16.to_be_bytes());
        b
    }

    #[test]
    fn reads_fixed_fields() {
        let bytes = sample();
        let head = Head::read(FontData::new(&bytes)).unwrap();
        assert_eq!(head.units_per_em(), 2048);
        assert_eq!(head.index_to_loc_format(), 1);
    }

    #[test]
    fn rejects_truncated_table() {
        assert!(Head::read(FontData::new(&[0u8; 10])).is_err());
    }
}
