//! `hhea`/`vhea`: the horizontal and vertical header tables share one
//! layout, differing only in which axis their metrics describe.

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

#[derive(Clone, Copy)]
pub struct HVhea<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for HVhea<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _: u16 = data.read_at(34)?;
        Ok(HVhea { data })
    }
}

impl<'a> HVhea<'a> {
    pub fn version(&self) -> f64 {
        self.data
            .read_at::<font_types::Fixed>(0)
            .map(font_types::Fixed::to_f64)
            .unwrap_or(1.0)
    }
    pub fn ascender(&self) -> i16 {
        self.data.read_at(4).unwrap_or(0)
    }
    pub fn descender(&self) -> i16 {
        self.data.read_at(6).unwrap_or(0)
    }
    pub fn line_gap(&self) -> i16 {
        self.data.read_at(8).unwrap_or(0)
    }
    pub fn advance_max(&self) -> u16 {
        self.data.read_at(10).unwrap_or(0)
    }
    pub fn min_first_side_bearing(&self) -> i16 {
        self.data.read_at(12).unwrap_or(0)
    }
    pub fn min_second_side_bearing(&self) -> i16 {
        self.data.read_at(14).unwrap_or(0)
    }
    pub fn max_extent(&self) -> i16 {
        self.data.read_at(16).unwrap_or(0)
    }
    pub fn caret_slope_rise(&self) -> i16 {
        self.data.read_at(18).unwrap_or(1)
    }
    pub fn caret_slope_run(&self) -> i16 {
        self.data.read_at(20).unwrap_or(0)
    }
    pub fn caret_offset(&self) -> i16 {
        self.data.read_at(22).unwrap_or(0)
    }
    /// `numberOfHMetrics` (or `numberOfVMetrics`): the count of metrics
    /// entries in `hmtx`/`vmtx` before it falls back to a trailing lsb-only
    /// list.
    pub fn number_of_long_metrics(&self) -> u16 {
        self.data.read_at(34).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_number_of_long_metrics() {
        let mut b = vec![0u8; 36];
        b[34..36].copy_from_slice(&5u16.to_be_bytes());
        let hhea = HVhea::read(FontData::new(&b)).unwrap();
        assert_eq!(hhea.number_of_long_metrics(), 5);
    }
}
