//! The `fvar` table: https://learn.microsoft.com/en-us/typography/opentype/spec/fvar

use font_types::{Fixed, Tag};

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"fvar");

#[derive(Clone, Copy)]
pub struct Fvar<'a> {
    data: FontData<'a>,
    axes_array_offset: u16,
    axis_count: u16,
    axis_size: u16,
    instance_count: u16,
    instance_size: u16,
}

impl<'a> FontRead<'a> for Fvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _version: u32 = data.read_at(0)?;
        Ok(Fvar {
            data,
            axes_array_offset: data.read_at(4)?,
            axis_count: data.read_at(8)?,
            axis_size: data.read_at(10)?,
            instance_count: data.read_at(12)?,
            instance_size: data.read_at(14)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariationAxisRecord {
    pub axis_tag: Tag,
    pub min_value: f64,
    pub default_value: f64,
    pub max_value: f64,
    pub flags: u16,
    pub axis_name_id: u16,
}

impl<'a> Fvar<'a> {
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn axes(&self) -> Vec<VariationAxisRecord> {
        (0..self.axis_count as usize)
            .filter_map(|i| {
                let base = self.axes_array_offset as usize + i * self.axis_size as usize;
                Some(VariationAxisRecord {
                    axis_tag: self.data.read_at::<u32>(base).ok().map(|v| Tag::from_be_bytes(v.to_be_bytes()))?,
                    min_value: self.data.read_at::<Fixed>(base + 4).ok()?.to_f64(),
                    default_value: self.data.read_at::<Fixed>(base + 8).ok()?.to_f64(),
                    max_value: self.data.read_at::<Fixed>(base + 12).ok()?.to_f64(),
                    flags: self.data.read_at(base + 16).ok()?,
                    axis_name_id: self.data.read_at(base + 18).ok()?,
                })
            })
            .collect()
    }

    /// The named instances, each as (subfamily_name_id, coords, optional
    /// postscript_name_id).
    pub fn instances(&self) -> Result<Vec<(u16, Vec<f64>, Option<u16>)>> {
        let instances_offset =
            self.axes_array_offset as usize + self.axis_count as usize * self.axis_size as usize;
        let has_ps_name = self.instance_size as usize
            >= 4 + self.axis_count as usize * 4 + 2;
        let mut out = Vec::with_capacity(self.instance_count as usize);
        for i in 0..self.instance_count as usize {
            let base = instances_offset + i * self.instance_size as usize;
            let subfamily_name_id: u16 = self.data.read_at(base)?;
            let _flags: u16 = self.data.read_at(base + 2)?;
            let mut coords = Vec::with_capacity(self.axis_count as usize);
            for a in 0..self.axis_count as usize {
                let v: Fixed = self.data.read_at(base + 4 + a * 4)?;
                coords.push(v.to_f64());
            }
            let ps_name_id = if has_ps_name {
                self.data
                    .read_at(base + 4 + self.axis_count as usize * 4)
                    .ok()
            } else {
                None
            };
            out.push((subfamily_name_id, coords, ps_name_id));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        b.extend_from_slice(&16u16.to_be_bytes()); // axesArrayOffset
        b.extend_from_slice(&0u16.to_be_bytes()); // reserved
        b.extend_from_slice(&1u16.to_be_bytes()); // axisCount
        b.extend_from_slice(&20u16.to_be_bytes()); // axisSize
        b.extend_from_slice(&0u16.to_be_bytes()); // instanceCount
        b.extend_from_slice(&6u16.to_be_bytes()); // instanceSize
        // one axis: wght 100..900, default 400
        b.extend_from_slice(b"wght");
        b.extend_from_slice(&Fixed::from_f64(100.0).to_be_bytes());
        b.extend_from_slice(&Fixed::from_f64(400.0).to_be_bytes());
        b.extend_from_slice(&Fixed::from_f64(900.0).to_be_bytes());
        b.extend_from_slice(&0u16.to_be_bytes());
        b.extend_from_slice(&256u16.to_be_bytes());
        b
    }

    #[test]
    fn reads_single_axis() {
        let bytes = sample();
        let fvar = Fvar::read(FontData::new(&bytes)).unwrap();
        let axes = fvar.axes();
        assert_eq!(axes.len(), 1);
        assert_eq!(axes[0].axis_tag, Tag::new(b"wght"));
        assert_eq!(axes[0].default_value, 400.0);
    }
}
