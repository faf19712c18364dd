//! The `loca` table: https://learn.microsoft.com/en-us/typography/opentype/spec/loca

use font_types::{Offset32, Tag};

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::{FontReadWithArgs, ReadArgs};

pub const TAG: Tag = Tag::new(b"loca");

/// Short-format entries store `offset / 2`; long-format entries store the
/// offset directly.
#[derive(Clone, Copy)]
pub enum Loca<'a> {
    Short(FontData<'a>),
    Long(FontData<'a>),
}

impl ReadArgs for Loca<'_> {
    type Args = bool;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self> {
        if *args {
            Ok(Loca::Long(data))
        } else {
            Ok(Loca::Short(data))
        }
    }
}

impl<'a> Loca<'a> {
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(d) => d.len() / 2,
            Loca::Long(d) => d.len() / 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<Offset32> {
        match self {
            Loca::Short(d) => {
                let v: u16 = d.read_at(idx * 2).ok()?;
                Some(Offset32::new(v as u32 * 2))
            }
            Loca::Long(d) => {
                let v: u32 = d.read_at(idx * 4).ok()?;
                Some(Offset32::new(v))
            }
        }
    }

    /// The byte range of glyph `gid` within `glyf`, or `None` for an empty
    /// glyph (`loca[gid] == loca[gid + 1]`) or an out-of-range id.
    pub fn glyph_range(&self, gid: u16) -> Result<Option<std::ops::Range<usize>>> {
        let start = self.get(gid as usize).ok_or(ReadError::OutOfBounds)?.to_u32() as usize;
        let end = self
            .get(gid as usize + 1)
            .ok_or(ReadError::OutOfBounds)?
            .to_u32() as usize;
        if end < start {
            return Err(ReadError::malformed(TAG, "decreasing loca offsets"));
        }
        Ok((end > start).then_some(start..end))
    }

    pub fn iter(&self) -> impl Iterator<Item = Offset32> + '_ {
        (0..self.len()).map_while(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_format_doubles_offsets() {
        let bytes = [0u16.to_be_bytes(), 10u16.to_be_bytes(), 10u16.to_be_bytes()].concat();
        let loca = Loca::read_with_args(FontData::new(&bytes), &false).unwrap();
        assert_eq!(loca.get(0), Some(Offset32::new(0)));
        assert_eq!(loca.get(1), Some(Offset32::new(20)));
        assert_eq!(loca.glyph_range(0).unwrap(), Some(0..20));
        assert_eq!(loca.glyph_range(1).unwrap(), None);
    }

    #[test]
    fn long_format() {
        let bytes = [100u32.to_be_bytes(), 200u32.to_be_bytes()].concat();
        let loca = Loca::read_with_args(FontData::new(&bytes), &true).unwrap();
        assert_eq!(loca.get(0), Some(Offset32::new(100)));
        assert_eq!(loca.get(1), Some(Offset32::new(200)));
    }
}
