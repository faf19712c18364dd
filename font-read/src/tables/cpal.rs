//! The `CPAL` table: https://learn.microsoft.com/en-us/typography/opentype/spec/cpal
//!
//! Color palettes referenced by `COLR`. Bounds-checked field exposure only.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"CPAL");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ColorRecord {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub alpha: u8,
}

#[derive(Clone, Copy)]
pub struct Cpal<'a> {
    data: FontData<'a>,
    num_palette_entries: u16,
    num_palettes: u16,
    color_records_offset: u32,
}

impl<'a> FontRead<'a> for Cpal<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Cpal {
            num_palette_entries: data.read_at(2)?,
            num_palettes: data.read_at(4)?,
            color_records_offset: data.read_at(8)?,
            data,
        })
    }
}

impl<'a> Cpal<'a> {
    pub fn num_palettes(&self) -> u16 {
        self.num_palettes
    }

    pub fn num_palette_entries(&self) -> u16 {
        self.num_palette_entries
    }

    /// The `palette_index`th palette's colors, `CPAL`'s `firstColorIndex`
    /// array entry for that palette giving the starting offset into the
    /// shared color-records array.
    pub fn palette(&self, palette_index: u16) -> Result<Vec<ColorRecord>> {
        if palette_index >= self.num_palettes {
            return Err(ReadError::OutOfBounds);
        }
        let first_index: u16 = self.data.read_at(12 + palette_index as usize * 2)?;
        let records = self
            .data
            .split_off(self.color_records_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        (0..self.num_palette_entries)
            .map(|i| {
                let base = (first_index + i) as usize * 4;
                Ok(ColorRecord {
                    blue: records.read_at(base)?,
                    green: records.read_at(base + 1)?,
                    red: records.read_at(base + 2)?,
                    alpha: records.read_at(base + 3)?,
                })
            })
            .collect()
    }
}
