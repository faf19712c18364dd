//! WOFF1 → sfnt: per-table zlib decompression and canonical re-assembly.

use font_types::checksum::{table_checksum, CHECKSUM_MAGIC};
use font_types::Tag;
use std::io::Read;

use super::sfnt::directory_search_params;
use crate::error::{ReadError, Result};
use crate::font_data::FontData;

const WOFF1_HEADER_LEN: usize = 44;
const TABLE_ENTRY_LEN: usize = 20;

fn woff_tag() -> Tag {
    Tag::new(b"wOFF")
}

fn head_tag() -> Tag {
    Tag::new(b"head")
}

struct Woff1TableEntry {
    tag: Tag,
    offset: u32,
    comp_length: u32,
    orig_length: u32,
}

/// Decompress a WOFF1 buffer into a canonical, checksum-valid sfnt buffer.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    let data = FontData::new(bytes);
    let mut cursor = data.cursor();
    let signature: u32 = cursor.read()?;
    if signature != u32::from_be_bytes(*b"wOFF") {
        return Err(ReadError::malformed(woff_tag(), "bad signature"));
    }
    let flavor: u32 = cursor.read()?;
    let _length: u32 = cursor.read()?;
    let num_tables: u16 = cursor.read()?;
    let _reserved: u16 = cursor.read()?;
    let _total_sfnt_size: u32 = cursor.read()?;
    let _major_version: u16 = cursor.read()?;
    let _minor_version: u16 = cursor.read()?;
    let _meta_offset: u32 = cursor.read()?;
    let _meta_length: u32 = cursor.read()?;
    let _meta_orig_length: u32 = cursor.read()?;
    let _priv_offset: u32 = cursor.read()?;
    let _priv_length: u32 = cursor.read()?;
    debug_assert_eq!(cursor.pos(), WOFF1_HEADER_LEN);

    let mut entries = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let tag = cursor.read_tag()?;
        let offset: u32 = cursor.read()?;
        let comp_length: u32 = cursor.read()?;
        let orig_length: u32 = cursor.read()?;
        let _orig_checksum: u32 = cursor.read()?;
        debug_assert_eq!(TABLE_ENTRY_LEN, 20);
        if comp_length > orig_length {
            return Err(ReadError::malformed(
                tag,
                "compLength exceeds origLength",
            ));
        }
        entries.push(Woff1TableEntry {
            tag,
            offset,
            comp_length,
            orig_length,
        });
    }

    let mut tables: Vec<(Tag, Vec<u8>)> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let start = entry.offset as usize;
        let end = start
            .checked_add(entry.comp_length as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let raw = bytes.get(start..end).ok_or(ReadError::OutOfBounds)?;
        let table_bytes = if entry.comp_length < entry.orig_length {
            let mut out = Vec::with_capacity(entry.orig_length as usize);
            let mut decoder = flate2::read::ZlibDecoder::new(raw);
            decoder
                .read_to_end(&mut out)
                .map_err(|e| ReadError::CompressionError(Some(entry.tag), e.to_string()))?;
            if out.len() != entry.orig_length as usize {
                return Err(ReadError::CompressionError(
                    Some(entry.tag),
                    format!(
                        "decompressed length {} != origLength {}",
                        out.len(),
                        entry.orig_length
                    ),
                ));
            }
            out
        } else {
            raw.to_vec()
        };
        tables.push((entry.tag, table_bytes));
    }

    Ok(assemble_sfnt(flavor, tables))
}

/// Build a canonical, checksum-complete sfnt buffer from (tag, data) pairs,
/// sorting by tag and padding each table to a 4-byte boundary, the shape
/// both WOFF1 and WOFF2 decoding need to produce.
pub(crate) fn assemble_sfnt(sfnt_version: u32, mut tables: Vec<(Tag, Vec<u8>)>) -> Vec<u8> {
    tables.sort_by_key(|(tag, _)| tag.to_be_bytes());
    let num_tables = tables.len() as u16;
    let (search_range, entry_selector, range_shift) = directory_search_params(num_tables);

    let header_len = 12;
    let dir_len = tables.len() * 16;
    let mut data_offset = header_len + dir_len;
    let mut directory = Vec::with_capacity(tables.len());
    let mut table_data = Vec::new();
    for (tag, bytes) in &tables {
        let checksum = table_checksum(bytes);
        let offset = data_offset;
        directory.push((*tag, checksum, offset as u32, bytes.len() as u32));
        table_data.extend_from_slice(bytes);
        let padding = (4 - (bytes.len() % 4)) % 4;
        table_data.extend(std::iter::repeat(0u8).take(padding));
        data_offset += bytes.len() + padding;
    }

    let mut out = Vec::with_capacity(data_offset);
    out.extend_from_slice(&sfnt_version.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());
    for (tag, checksum, offset, length) in &directory {
        out.extend_from_slice(&tag.to_be_bytes());
        out.extend_from_slice(&checksum.to_be_bytes());
        out.extend_from_slice(&offset.to_be_bytes());
        out.extend_from_slice(&length.to_be_bytes());
    }
    out.extend_from_slice(&table_data);

    finalize_checksum_adjustment(&mut out, &directory);
    out
}

/// Overwrite `head.checkSumAdjustment` (the `u32` at byte offset 8 of the
/// `head` table) with `0xB1B0AFBA - sum(whole file as u32 words)`, computed
/// with that field treated as zero.
fn finalize_checksum_adjustment(out: &mut [u8], directory: &[(Tag, u32, u32, u32)]) {
    let head = head_tag();
    let Some((_, _, offset, _)) = directory.iter().find(|(t, _, _, _)| *t == head).copied()
    else {
        return;
    };
    let adjustment_offset = offset as usize + 8;
    if adjustment_offset + 4 > out.len() {
        return;
    }
    out[adjustment_offset..adjustment_offset + 4].copy_from_slice(&[0, 0, 0, 0]);
    let file_sum = table_checksum(out);
    let adjustment = CHECKSUM_MAGIC.wrapping_sub(file_sum);
    out[adjustment_offset..adjustment_offset + 4].copy_from_slice(&adjustment.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembled_sfnt_is_tag_sorted() {
        let tables = vec![
            (Tag::new(b"glyf"), vec![1, 2, 3]),
            (Tag::new(b"cmap"), vec![4, 5]),
        ];
        let sfnt = assemble_sfnt(0x0001_0000, tables);
        // first directory entry (at byte 12) should be 'cmap', the lexically first tag
        assert_eq!(&sfnt[12..16], b"cmap");
    }
}
