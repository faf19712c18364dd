//! The `BASE` table: https://learn.microsoft.com/en-us/typography/opentype/spec/base
//!
//! Baseline positions per script/language, exposed structurally; the core
//! never needs to choose a baseline itself (that's a layout-engine concern).

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"BASE");

#[derive(Clone, Copy)]
pub struct Base<'a> {
    data: FontData<'a>,
    horiz_axis_offset: u16,
    vert_axis_offset: u16,
}

impl<'a> FontRead<'a> for Base<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Base {
            horiz_axis_offset: data.read_at(4)?,
            vert_axis_offset: data.read_at(6)?,
            data,
        })
    }
}

impl<'a> Base<'a> {
    pub fn horiz_axis(&self) -> Result<Option<BaseAxis<'a>>> {
        self.axis(self.horiz_axis_offset)
    }

    pub fn vert_axis(&self) -> Result<Option<BaseAxis<'a>>> {
        self.axis(self.vert_axis_offset)
    }

    fn axis(&self, offset: u16) -> Result<Option<BaseAxis<'a>>> {
        if offset == 0 {
            return Ok(None);
        }
        let data = self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(BaseAxis::read(data)?))
    }
}

/// A `BaseTagList` + `BaseScriptList` pair for one writing direction.
#[derive(Clone, Copy)]
pub struct BaseAxis<'a> {
    data: FontData<'a>,
    base_tag_list_offset: u16,
    base_script_list_offset: u16,
}

impl<'a> BaseAxis<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(BaseAxis {
            base_tag_list_offset: data.read_at(0)?,
            base_script_list_offset: data.read_at(2)?,
            data,
        })
    }

    /// The baseline tags this axis assigns coordinates for, in the order
    /// that `BaseScript` coordinate arrays are indexed.
    pub fn baseline_tags(&self) -> Result<Vec<Tag>> {
        if self.base_tag_list_offset == 0 {
            return Ok(Vec::new());
        }
        let data = self
            .data
            .split_off(self.base_tag_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let count: u16 = data.read_at(0)?;
        let mut cursor = data.cursor();
        cursor.skip(2)?;
        (0..count).map(|_| cursor.read_tag()).collect()
    }

    pub fn scripts(&self) -> Result<Vec<(Tag, BaseScript<'a>)>> {
        if self.base_script_list_offset == 0 {
            return Ok(Vec::new());
        }
        let data = self
            .data
            .split_off(self.base_script_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        super::layout_common::read_tagged_records(data)?
            .into_iter()
            .map(|r| {
                let script_data = data.split_off(r.offset as usize).ok_or(ReadError::OutOfBounds)?;
                Ok((r.tag, BaseScript::read(script_data)?))
            })
            .collect()
    }
}

/// A `BaseScript` table: its default baseline and per-baseline min/max
/// extents (`BaseValues`/`MinMax`, exposed only as coordinates here).
#[derive(Clone, Copy)]
pub struct BaseScript<'a> {
    data: FontData<'a>,
    base_values_offset: u16,
}

impl<'a> BaseScript<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(BaseScript {
            base_values_offset: data.read_at(0)?,
            data,
        })
    }

    /// `(default_baseline_index, coordinates)`, one coordinate per tag in
    /// the enclosing axis's [`BaseAxis::baseline_tags`].
    pub fn base_values(&self) -> Result<Option<(u16, Vec<i16>)>> {
        if self.base_values_offset == 0 {
            return Ok(None);
        }
        let data = self
            .data
            .split_off(self.base_values_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let default_index: u16 = data.read_at(0)?;
        let count: u16 = data.read_at(2)?;
        let mut coords = Vec::with_capacity(count as usize);
        for i in 0..count {
            let coord_offset: u16 = data.read_at(4 + i as usize * 2)?;
            let coord_data = data.split_off(coord_offset as usize).ok_or(ReadError::OutOfBounds)?;
            let coord: i16 = coord_data.read_at(2)?;
            coords.push(coord);
        }
        Ok(Some((default_index, coords)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_axes_is_none() {
        let mut b = vec![0u8; 8];
        b[0..2].copy_from_slice(&1u16.to_be_bytes());
        let base = Base::read(FontData::new(&b)).unwrap();
        assert!(base.horiz_axis().unwrap().is_none());
        assert!(base.vert_axis().unwrap().is_none());
    }
}
