//! TrueType/OpenType Collection (`ttcf`) headers.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;

/// A parsed TTC/OTC header: a list of absolute byte offsets, one per font
/// in the collection, each pointing at a normal sfnt directory sharing the
/// same backing buffer.
#[derive(Clone, Debug)]
pub struct TtcHeader {
    pub major_version: u16,
    pub minor_version: u16,
    pub offsets: Vec<u32>,
    pub dsig: Option<(u32, u32, u32)>,
}

fn ttc_tag() -> Tag {
    Tag::new(b"ttcf")
}

impl TtcHeader {
    pub fn parse(data: FontData) -> Result<Self> {
        let mut cursor = data.cursor();
        let tag_bytes: [u8; 4] = cursor.read_tag()?.to_be_bytes();
        if &tag_bytes != b"ttcf" {
            return Err(ReadError::malformed(ttc_tag(), "missing 'ttcf' signature"));
        }
        let major_version: u16 = cursor.read()?;
        let minor_version: u16 = cursor.read()?;
        if major_version != 1 && major_version != 2 {
            return Err(ReadError::UnsupportedVersion(
                ttc_tag(),
                ((major_version as u32) << 16) | minor_version as u32,
            ));
        }
        let num_fonts: u32 = cursor.read()?;
        let offsets = cursor.read_array::<u32>(num_fonts as usize)?;
        if offsets.is_empty() {
            return Err(ReadError::malformed(ttc_tag(), "collection has zero fonts"));
        }
        let dsig = if major_version >= 2 && cursor.remaining() >= 12 {
            let dsig_tag: u32 = cursor.read()?;
            let dsig_length: u32 = cursor.read()?;
            let dsig_offset: u32 = cursor.read()?;
            Some((dsig_tag, dsig_length, dsig_offset))
        } else {
            None
        };
        Ok(TtcHeader {
            major_version,
            minor_version,
            offsets,
            dsig,
        })
    }

    pub fn num_fonts(&self) -> usize {
        self.offsets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header(num_fonts: u32, offsets: &[u32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"ttcf");
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&num_fonts.to_be_bytes());
        for o in offsets {
            bytes.extend_from_slice(&o.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn parses_offsets() {
        let bytes = sample_header(2, &[12, 200]);
        let header = TtcHeader::parse(FontData::new(&bytes)).unwrap();
        assert_eq!(header.offsets, vec![12, 200]);
        assert_eq!(header.num_fonts(), 2);
    }

    #[test]
    fn rejects_zero_fonts() {
        let bytes = sample_header(0, &[]);
        assert!(TtcHeader::parse(FontData::new(&bytes)).is_err());
    }
}
