//! Assembling a set of already-serialized tables into an sfnt file.

use std::collections::BTreeMap;

use font_read::container::sfnt::directory_search_params;
use font_types::Tag;

const TABLE_RECORD_LEN: usize = 16;
const SFNT_HEADER_LEN: usize = 12;
const HEAD_TAG: Tag = Tag::new(b"head");

/// `0xB1B0AFBA` minus the checksum of the whole file (with `head`'s own
/// `checkSumAdjustment` field zeroed) gives the value that field should
/// hold, per the sfnt spec.
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// Builds a font from a set of complete table byte buffers, computing the
/// table directory, per-table checksums, 4-byte padding between tables,
/// and (if `head` is present) `head.checkSumAdjustment`.
#[derive(Debug, Clone, Default)]
pub struct FontBuilder {
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl FontBuilder {
    pub fn new() -> Self {
        FontBuilder::default()
    }

    pub fn add_table(&mut self, tag: Tag, data: Vec<u8>) -> &mut Self {
        self.tables.insert(tag, data);
        self
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Assembles the final sfnt file. `sfnt_version` is `0x00010000` for a
    /// TrueType-outline font or `OTTO` for a CFF-outline one.
    pub fn build(&self, sfnt_version: u32) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let (search_range, entry_selector, range_shift) = directory_search_params(num_tables);
        let header_len = SFNT_HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN;

        let mut position = header_len as u32;
        let mut records = Vec::with_capacity(self.tables.len());
        for (tag, data) in &self.tables {
            let offset = position;
            let length = data.len() as u32;
            let checksum = table_checksum(data);
            position += length + padding_len(data.len()) as u32;
            records.push((*tag, checksum, offset, length));
        }

        let mut out = Vec::with_capacity(position as usize);
        out.extend_from_slice(&sfnt_version.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());
        for (tag, checksum, offset, length) in &records {
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&checksum.to_be_bytes());
            out.extend_from_slice(&offset.to_be_bytes());
            out.extend_from_slice(&length.to_be_bytes());
        }

        let head_offset = records
            .iter()
            .find(|(tag, ..)| *tag == HEAD_TAG)
            .map(|(_, _, offset, _)| *offset as usize);

        for data in self.tables.values() {
            out.extend_from_slice(data);
            out.resize(out.len() + padding_len(data.len()), 0);
        }

        if let Some(head_offset) = head_offset {
            // checkSumAdjustment is the 3rd u32 field of `head`.
            let field = head_offset + 8;
            out[field..field + 4].copy_from_slice(&[0, 0, 0, 0]);
            let file_checksum = table_checksum(&out);
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(file_checksum);
            out[field..field + 4].copy_from_slice(&adjustment.to_be_bytes());
        }

        out
    }
}

fn table_checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut chunks = data.chunks_exact(4);
    for quad in &mut chunks {
        let array: [u8; 4] = quad.try_into().unwrap();
        sum = sum.wrapping_add(u32::from_be_bytes(array));
    }
    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let mut buf = [0u8; 4];
        buf[..remainder.len()].copy_from_slice(remainder);
        sum = sum.wrapping_add(u32::from_be_bytes(buf));
    }
    sum
}

fn padding_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_of_zero_bytes_is_zero() {
        assert_eq!(table_checksum(&[]), 0);
    }

    #[test]
    fn padding_rounds_up_to_four() {
        assert_eq!(padding_len(0), 0);
        assert_eq!(padding_len(1), 3);
        assert_eq!(padding_len(4), 0);
        assert_eq!(padding_len(5), 3);
    }

    #[test]
    fn builds_directory_sorted_by_tag_with_correct_offsets() {
        let mut builder = FontBuilder::new();
        builder.add_table(Tag::new(b"head"), vec![0u8; 54]);
        builder.add_table(Tag::new(b"zzzz"), vec![1, 2, 3]);
        builder.add_table(Tag::new(b"aaaa"), vec![4, 5]);
        let bytes = builder.build(0x0001_0000);

        let num_tables = u16::from_be_bytes([bytes[4], bytes[5]]);
        assert_eq!(num_tables, 3);
        // BTreeMap iterates in tag order: "aaaa" < "head" < "zzzz".
        let first_tag = &bytes[12..16];
        assert_eq!(first_tag, b"aaaa");
    }
}
