//! The `STAT` table: https://learn.microsoft.com/en-us/typography/opentype/spec/stat
//!
//! Describes the style-attribute axes a variable (or static) font exposes
//! for naming purposes, distinct from `fvar`'s user-tunable axes.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"STAT");

#[derive(Clone, Copy)]
pub struct Stat<'a> {
    data: FontData<'a>,
    design_axis_size: u16,
    design_axis_count: u16,
    design_axes_offset: u32,
    axis_value_count: u16,
    offset_to_axis_value_offsets: u32,
}

impl<'a> FontRead<'a> for Stat<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Stat {
            data,
            design_axis_size: data.read_at(4)?,
            design_axis_count: data.read_at(6)?,
            design_axes_offset: data.read_at(8)?,
            axis_value_count: data.read_at(12)?,
            offset_to_axis_value_offsets: data.read_at(14)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisRecord {
    pub axis_tag: Tag,
    pub axis_name_id: u16,
    pub axis_ordering: u16,
}

impl<'a> Stat<'a> {
    pub fn design_axes(&self) -> Result<Vec<AxisRecord>> {
        let mut out = Vec::with_capacity(self.design_axis_count as usize);
        for i in 0..self.design_axis_count as usize {
            let base = self.design_axes_offset as usize + i * self.design_axis_size as usize;
            out.push(AxisRecord {
                axis_tag: Tag::from_be_bytes(self.data.read_at::<u32>(base)?.to_be_bytes()),
                axis_name_id: self.data.read_at(base + 4)?,
                axis_ordering: self.data.read_at(base + 6)?,
            });
        }
        Ok(out)
    }

    /// Each axis value table's format, byte offset (relative to this table),
    /// and raw bytes, left undecoded (formats 1-4 vary in shape and are
    /// consumed directly by name-table construction, not outline scaling).
    pub fn axis_value_offsets(&self) -> Result<Vec<u32>> {
        let mut cursor = self
            .data
            .split_off(self.offset_to_axis_value_offsets as usize)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();
        let mut out = Vec::with_capacity(self.axis_value_count as usize);
        for _ in 0..self.axis_value_count {
            let rel: u16 = cursor.read()?;
            out.push(self.offset_to_axis_value_offsets + rel as u32);
        }
        Ok(out)
    }

    pub fn axis_value_format(&self, absolute_offset: u32) -> Result<u16> {
        self.data.read_at(absolute_offset as usize)
    }

    pub fn elided_fallback_name_id(&self) -> Option<u16> {
        self.data.read_at(16).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_single_design_axis() {
        let mut b = vec![0u8; 20];
        b[0..4].copy_from_slice(&0x0001_0002u32.to_be_bytes());
        b[4..6].copy_from_slice(&8u16.to_be_bytes()); // designAxisSize
        b[6..8].copy_from_slice(&1u16.to_be_bytes()); // designAxisCount
        b[8..12].copy_from_slice(&20u32.to_be_bytes()); // designAxesOffset
        b.extend_from_slice(b"wght");
        b.extend_from_slice(&256u16.to_be_bytes());
        b.extend_from_slice(&0u16.to_be_bytes());
        let stat = Stat::read(FontData::new(&b)).unwrap();
        let axes = stat.design_axes().unwrap();
        assert_eq!(axes.len(), 1);
        assert_eq!(axes[0].axis_tag, Tag::new(b"wght"));
    }
}
