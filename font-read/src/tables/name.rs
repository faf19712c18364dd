//! The `name` table: https://learn.microsoft.com/en-us/typography/opentype/spec/name

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"name");

#[derive(Clone, Copy)]
pub struct Name<'a> {
    data: FontData<'a>,
    count: u16,
    string_offset: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub length: u16,
    pub offset: u16,
}

impl<'a> FontRead<'a> for Name<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _version: u16 = data.read_at(0)?;
        let count: u16 = data.read_at(2)?;
        let string_offset: u16 = data.read_at(4)?;
        Ok(Name {
            data,
            count,
            string_offset,
        })
    }
}

impl<'a> Name<'a> {
    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn name_records(&self) -> Vec<NameRecord> {
        (0..self.count as usize)
            .filter_map(|i| {
                let base = 6 + i * 12;
                Some(NameRecord {
                    platform_id: self.data.read_at(base).ok()?,
                    encoding_id: self.data.read_at(base + 2).ok()?,
                    language_id: self.data.read_at(base + 4).ok()?,
                    name_id: self.data.read_at(base + 6).ok()?,
                    length: self.data.read_at(base + 8).ok()?,
                    offset: self.data.read_at(base + 10).ok()?,
                })
            })
            .collect()
    }

    fn raw_string_bytes(&self, record: &NameRecord) -> Result<&'a [u8]> {
        let start = self.string_offset as usize + record.offset as usize;
        self.data
            .slice(start..start + record.length as usize)
            .map(|d| d.as_bytes())
            .ok_or(ReadError::OutOfBounds)
    }

    /// Decode a record's string, treating platform 3 (Windows) and platform 0
    /// (Unicode) as UTF-16BE and platform 1 (Macintosh) as Mac Roman ASCII
    /// subset (non-ASCII bytes become `U+FFFD`).
    pub fn resolve_string(&self, record: &NameRecord) -> Result<String> {
        let bytes = self.raw_string_bytes(record)?;
        match record.platform_id {
            0 | 3 => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                Ok(String::from_utf16_lossy(&units))
            }
            _ => Ok(bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
                .collect()),
        }
    }

    /// The first English (platform 3/1 conventions) string for `name_id`,
    /// falling back to the first record with that id in any language.
    pub fn get_by_id(&self, name_id: u16) -> Option<String> {
        let records = self.name_records();
        let preferred = records.iter().find(|r| {
            r.name_id == name_id && r.platform_id == 3 && matches!(r.language_id, 0x0409)
        });
        let mac = records
            .iter()
            .find(|r| r.name_id == name_id && r.platform_id == 1 && r.language_id == 0);
        let any = records.iter().find(|r| r.name_id == name_id);
        preferred
            .or(mac)
            .or(any)
            .and_then(|r| self.resolve_string(r).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_windows_utf16_name() {
        let mut b = Vec::new();
        b.extend_from_slice(&0u16.to_be_bytes()); // version
        b.extend_from_slice(&1u16.to_be_bytes()); // count
        b.extend_from_slice(&18u16.to_be_bytes()); // stringOffset
        b.extend_from_slice(&3u16.to_be_bytes()); // platform
        b.extend_from_slice(&1u16.to_be_bytes()); // encoding
        b.extend_from_slice(&0x0409u16.to_be_bytes()); // language
        b.extend_from_slice(&4u16.to_be_bytes()); // nameId (Full font name)
        b.extend_from_slice(&6u16.to_be_bytes()); // length
        b.extend_from_slice(&0u16.to_be_bytes()); // offset
        b.extend_from_slice("Abc".encode_utf16().flat_map(|c| c.to_be_bytes()).collect::<Vec<_>>().as_slice());
        let name = Name::read(FontData::new(&b)).unwrap();
        assert_eq!(name.get_by_id(4), Some("Abc".to_string()));
    }
}
