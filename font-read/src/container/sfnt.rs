//! The sfnt table directory: the format shared by TTF, OTF, and the
//! canonical buffer produced after reversing a WOFF/WOFF2/TTC container.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;

pub const SFNT_VERSION_TRUETYPE: u32 = 0x0001_0000;
pub const SFNT_VERSION_OTTO: u32 = u32::from_be_bytes(*b"OTTO");
pub const SFNT_VERSION_TRUE: u32 = u32::from_be_bytes(*b"true");
pub const SFNT_VERSION_TYP1: u32 = u32::from_be_bytes(*b"typ1");
pub const SFNT_VERSION_TTCF: u32 = u32::from_be_bytes(*b"ttcf");

fn head_tag() -> Tag {
    Tag::new(b"head")
}

/// One entry of the sfnt table directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// The parsed table directory of one sfnt-format font.
///
/// `base_offset` is the byte offset, within the font's backing buffer, at
/// which this sfnt begins (nonzero for the Nth font of a TTC).
#[derive(Clone, Debug)]
pub struct TableDirectory {
    pub sfnt_version: u32,
    pub base_offset: u32,
    pub records: Vec<TableRecord>,
}

impl TableDirectory {
    /// Parse the 12-byte sfnt header and `numTables` directory entries,
    /// starting at `base_offset` within `data`.
    pub fn parse(data: FontData, base_offset: u32) -> Result<Self> {
        let sfnt = data
            .split_off(base_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let mut cursor = sfnt.cursor();
        let sfnt_version: u32 = cursor.read()?;
        match sfnt_version {
            SFNT_VERSION_TRUETYPE | SFNT_VERSION_OTTO | SFNT_VERSION_TRUE | SFNT_VERSION_TYP1 => {}
            other => return Err(ReadError::UnsupportedVersion(head_tag(), other)),
        }
        let num_tables: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift: informational, not re-validated.
        cursor.skip(6)?;

        let mut records = Vec::with_capacity(num_tables as usize);
        let mut prev_tag: Option<Tag> = None;
        for _ in 0..num_tables {
            let tag = cursor.read_tag()?;
            let checksum: u32 = cursor.read()?;
            let offset: u32 = cursor.read()?;
            let length: u32 = cursor.read()?;
            if let Some(prev) = prev_tag {
                if tag.to_be_bytes() < prev.to_be_bytes() {
                    return Err(ReadError::malformed(
                        Tag::new(b"sfnt"),
                        "table directory is not sorted by tag",
                    ));
                }
            }
            prev_tag = Some(tag);
            records.push(TableRecord {
                tag,
                checksum,
                offset,
                length,
            });
        }
        Ok(TableDirectory {
            sfnt_version,
            base_offset,
            records,
        })
    }

    pub fn find(&self, tag: Tag) -> Option<TableRecord> {
        self.records.iter().find(|r| r.tag == tag).copied()
    }

    pub fn is_cff(&self) -> bool {
        self.sfnt_version == SFNT_VERSION_OTTO
    }
}

/// Compute `searchRange`/`entrySelector`/`rangeShift` for `num_tables` entries,
/// as required by the sfnt header.
pub fn directory_search_params(num_tables: u16) -> (u16, u16, u16) {
    let mut entry_selector = 0u16;
    let mut search_range = 1u16;
    while (search_range as u32) * 2 <= num_tables as u32 {
        search_range *= 2;
        entry_selector += 1;
    }
    search_range = search_range.saturating_mul(16);
    let range_shift = (num_tables as u32 * 16).saturating_sub(search_range as u32) as u16;
    (search_range, entry_selector, range_shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_match_spec_examples() {
        // 4 tables: largest power-of-two <= 4 is 4, so searchRange = 4*16=64, entrySelector=2
        assert_eq!(directory_search_params(4), (64, 2, 0));
        // 5 tables: largest power-of-two <= 5 is 4
        assert_eq!(directory_search_params(5), (64, 2, 80 - 64));
    }
}
