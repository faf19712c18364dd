//! WOFF2 → sfnt: variable-length directory, Brotli decompression, and
//! reversal of the glyf+loca joint transform and the hmtx transform.
//!
//! The transform-version polarity here is table-dependent: for `glyf`/`loca`
//! a version of `0` means "transformed", while for every other table a
//! nonzero version means "transformed". This is easy to misread from the
//! W3C prose (which describes the bit layout once and lets context imply the
//! rest) but is load-bearing: getting it backwards silently passes through
//! transformed glyf data as if it were already a standard glyf table.

use std::io::Read;

use font_types::Tag;

use super::woff1::assemble_sfnt;
use crate::error::{ReadError, Result};
use crate::font_data::FontData;

const WOFF2_HEADER_LEN: usize = 48;
const NUM_SUB_STREAMS: usize = 7;

fn woff2_tag() -> Tag {
    Tag::new(b"wOF2")
}
fn glyf_tag() -> Tag {
    Tag::new(b"glyf")
}
fn loca_tag() -> Tag {
    Tag::new(b"loca")
}
fn hmtx_tag() -> Tag {
    Tag::new(b"hmtx")
}
fn hhea_tag() -> Tag {
    Tag::new(b"hhea")
}
fn maxp_tag() -> Tag {
    Tag::new(b"maxp")
}

#[rustfmt::skip]
const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post",
    b"cvt ", b"fpgm", b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT",
    b"EBLC", b"gasp", b"hdmx", b"kern", b"LTSH", b"PCLT", b"VDMX", b"vhea",
    b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC", b"JSTF", b"MATH",
    b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar",
    b"gvar", b"hsty", b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop",
    b"trak", b"Zapf", b"Silf", b"Glat", b"Gloc", b"Feat", b"Sill",
];

struct TableEntry {
    tag: Tag,
    transformed: bool,
    stream_length: u32,
}

/// Decompress a WOFF2 buffer into a canonical, checksum-valid sfnt buffer.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < WOFF2_HEADER_LEN {
        return Err(ReadError::malformed(
            woff2_tag(),
            "file shorter than the 48-byte WOFF2 header",
        ));
    }
    let data = FontData::new(bytes);
    let mut cursor = data.cursor();

    let signature: u32 = cursor.read()?;
    if signature != u32::from_be_bytes(*b"wOF2") {
        return Err(ReadError::malformed(woff2_tag(), "bad signature"));
    }
    let flavor: u32 = cursor.read()?;
    if flavor == u32::from_be_bytes(*b"ttcf") {
        return Err(ReadError::malformed(
            woff2_tag(),
            "WOFF2 font collections are not supported",
        ));
    }
    let reported_length: u32 = cursor.read()?;
    if reported_length as usize != bytes.len() {
        return Err(ReadError::malformed(
            woff2_tag(),
            "header length field does not match buffer size",
        ));
    }
    let num_tables: u16 = cursor.read()?;
    if num_tables == 0 {
        return Err(ReadError::malformed(woff2_tag(), "zero tables"));
    }
    cursor.skip(2)?; // reserved
    let _total_sfnt_size: u32 = cursor.read()?;
    let total_compressed_size: u32 = cursor.read()?;
    cursor.skip(4)?; // major/minor version
    let meta_offset: u32 = cursor.read()?;
    let meta_length: u32 = cursor.read()?;
    let _meta_orig_length: u32 = cursor.read()?;
    let priv_offset: u32 = cursor.read()?;
    let priv_length: u32 = cursor.read()?;
    debug_assert_eq!(cursor.pos(), WOFF2_HEADER_LEN);
    if meta_offset != 0 && (meta_offset as usize >= bytes.len()
        || bytes.len() - meta_offset as usize < meta_length as usize)
    {
        return Err(ReadError::malformed(woff2_tag(), "metadata block out of bounds"));
    }
    if priv_offset != 0 && (priv_offset as usize >= bytes.len()
        || bytes.len() - priv_offset as usize < priv_length as usize)
    {
        return Err(ReadError::malformed(woff2_tag(), "private block out of bounds"));
    }

    let mut entries = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let flag_byte: u8 = cursor.read()?;
        let tag_index = flag_byte & 0x3f;
        let tag = if tag_index == 0x3f {
            cursor.read_tag()?
        } else {
            Tag::from_be_bytes(*KNOWN_TAGS[tag_index as usize])
        };
        let xform_version = (flag_byte >> 6) & 0x03;
        let is_glyf_or_loca = tag == glyf_tag() || tag == loca_tag();
        let transformed = if is_glyf_or_loca {
            xform_version == 0
        } else {
            xform_version != 0
        };
        let orig_length = cursor.read_uint_base_128()?;
        let stream_length = if transformed {
            let transform_length = cursor.read_uint_base_128()?;
            if tag == loca_tag() && transform_length != 0 {
                return Err(ReadError::TransformError(
                    loca_tag(),
                    "a transformed loca table must carry no stream data of its own".into(),
                ));
            }
            transform_length
        } else {
            orig_length
        };
        entries.push(TableEntry {
            tag,
            transformed,
            stream_length,
        });
    }

    let glyf_transformed = entries.iter().find(|e| e.tag == glyf_tag()).map(|e| e.transformed);
    let loca_transformed = entries.iter().find(|e| e.tag == loca_tag()).map(|e| e.transformed);
    match (glyf_transformed, loca_transformed) {
        (Some(g), Some(l)) if g != l => {
            return Err(ReadError::TransformError(
                glyf_tag(),
                "glyf and loca must either both be transformed or both be untransformed".into(),
            ));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ReadError::TransformError(
                glyf_tag(),
                "glyf and loca must appear together".into(),
            ));
        }
        _ => {}
    }

    let compressed = cursor.slice(total_compressed_size as usize)?;
    let mut decompressed = Vec::new();
    brotli_decompressor::Decompressor::new(compressed.as_bytes(), 4096)
        .read_to_end(&mut decompressed)
        .map_err(|e| ReadError::CompressionError(None, e.to_string()))?;

    let mut chunks: Vec<(Tag, Vec<u8>)> = Vec::with_capacity(entries.len());
    let mut offset = 0usize;
    for entry in &entries {
        let len = entry.stream_length as usize;
        let end = offset.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let chunk = decompressed.get(offset..end).ok_or_else(|| {
            ReadError::malformed(entry.tag, "decompressed stream shorter than declared length")
        })?;
        chunks.push((entry.tag, chunk.to_vec()));
        offset = end;
    }
    if offset != decompressed.len() {
        log::debug!(
            "woff2: {} trailing decompressed bytes unaccounted for by the table directory",
            decompressed.len() - offset
        );
    }

    // `maxp.numGlyphs` and `hhea.numberOfHMetrics` are needed to reverse a
    // transformed `hmtx`, and neither table is itself ever transformed.
    let num_glyphs = chunks
        .iter()
        .find(|(t, _)| *t == maxp_tag())
        .and_then(|(_, b)| b.get(4..6))
        .map(|b| u16::from_be_bytes([b[0], b[1]]));
    let num_h_metrics = chunks
        .iter()
        .find(|(t, _)| *t == hhea_tag())
        .and_then(|(_, b)| b.get(34..36))
        .map(|b| u16::from_be_bytes([b[0], b[1]]));

    let mut glyf_reconstruction: Option<GlyfAndLoca> = None;
    let mut tables: Vec<(Tag, Vec<u8>)> = Vec::with_capacity(entries.len());

    for (entry, (tag, chunk)) in entries.iter().zip(chunks.iter()) {
        if *tag == loca_tag() {
            // Produced alongside glyf below.
            continue;
        }
        if *tag == glyf_tag() && entry.transformed {
            let reconstructed = reconstruct_glyf_and_loca(chunk)?;
            tables.push((glyf_tag(), reconstructed.glyf.clone()));
            tables.push((loca_tag(), reconstructed.loca.clone()));
            glyf_reconstruction = Some(reconstructed);
            continue;
        }
        if *tag == hmtx_tag() && entry.transformed {
            let num_glyphs = num_glyphs
                .ok_or_else(|| ReadError::malformed(maxp_tag(), "missing or truncated maxp"))?;
            let num_h_metrics = num_h_metrics
                .ok_or_else(|| ReadError::malformed(hhea_tag(), "missing or truncated hhea"))?;
            let x_mins = glyf_reconstruction.as_ref().map(|g| g.x_mins.as_slice()).ok_or_else(|| {
                ReadError::TransformError(
                    hmtx_tag(),
                    "a transformed hmtx requires a glyf table to derive xMin from".into(),
                )
            })?;
            let hmtx = reconstruct_hmtx(chunk, num_glyphs, num_h_metrics, x_mins)?;
            tables.push((hmtx_tag(), hmtx));
            continue;
        }
        tables.push((*tag, chunk.clone()));
    }

    Ok(assemble_sfnt(flavor, tables))
}

struct GlyfAndLoca {
    glyf: Vec<u8>,
    loca: Vec<u8>,
    /// `xMin` of every glyph's bounding box, indexed by glyph ID. Empty
    /// glyphs (no bbox) contribute `0`, matching the convention used when
    /// deriving their (likewise zero-width) hmtx entry.
    x_mins: Vec<i16>,
}

struct Point {
    x: i32,
    y: i32,
    on_curve: bool,
}

/// Reverse the joint glyf+loca transform described in the WOFF2 spec's
/// "Transformed glyf Table" section.
fn reconstruct_glyf_and_loca<'a>(data: &'a [u8]) -> Result<GlyfAndLoca> {
    let fd = FontData::new(data);
    let mut header = fd.cursor();
    let _reserved: u16 = header.read()?;
    let option_flags: u16 = header.read()?;
    let has_overlap_bitmap = option_flags & 1 != 0;
    let num_glyphs: u16 = header.read()?;
    let index_format: u16 = header.read()?;

    let mut sizes = [0u32; NUM_SUB_STREAMS];
    for s in sizes.iter_mut() {
        *s = header.read()?;
    }
    let mut offset = header.pos();
    let mut substream = |len: u32| -> Result<&'a [u8]> {
        let len = len as usize;
        let end = offset.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let slice = data.get(offset..end).ok_or(ReadError::OutOfBounds)?;
        offset = end;
        Ok(slice)
    };
    let mut n_contour_stream = FontData::new(substream(sizes[0])?).cursor();
    let mut n_points_stream = FontData::new(substream(sizes[1])?).cursor();
    let flag_stream_all = substream(sizes[2])?;
    let mut glyph_stream = FontData::new(substream(sizes[3])?).cursor();
    let mut composite_stream = FontData::new(substream(sizes[4])?).cursor();
    let bbox_and_stream = substream(sizes[5])?;
    let mut instruction_stream = FontData::new(substream(sizes[6])?).cursor();

    let bitmap_length = ((num_glyphs as usize + 31) >> 5) << 2;
    if bitmap_length > bbox_and_stream.len() {
        return Err(ReadError::malformed(glyf_tag(), "bboxBitmap longer than its stream"));
    }
    let (bbox_bitmap, bbox_data) = bbox_and_stream.split_at(bitmap_length);
    let mut bbox_stream = FontData::new(bbox_data).cursor();

    let overlap_bitmap = if has_overlap_bitmap {
        let len = (num_glyphs as usize + 7) >> 3;
        Some(substream(len as u32)?)
    } else {
        None
    };

    let mut flag_pos = 0usize;
    let mut glyf_table = Vec::with_capacity(num_glyphs as usize * 16);
    let mut loca_values = Vec::with_capacity(num_glyphs as usize + 1);
    let mut x_mins = Vec::with_capacity(num_glyphs as usize);

    for gid in 0..num_glyphs as usize {
        loca_values.push(glyf_table.len() as u32);
        let n_contours: i16 = n_contour_stream.read()?;
        let has_bbox = (bbox_bitmap[gid >> 3] & (0x80 >> (gid & 7))) != 0;
        let mut glyph_buf = Vec::new();

        let x_min = if n_contours < 0 {
            if !has_bbox {
                return Err(ReadError::malformed(
                    glyf_tag(),
                    "composite glyph is missing its required bbox",
                ));
            }
            parse_composite_glyph(
                &mut composite_stream,
                &mut glyph_stream,
                &mut instruction_stream,
                &mut bbox_stream,
                &mut glyph_buf,
            )?
        } else if n_contours > 0 {
            let has_overlap = overlap_bitmap
                .is_some_and(|bitmap| (bitmap[gid >> 3] & (0x80 >> (gid & 7))) != 0);
            let flag_byte_count = parse_simple_glyph(
                n_contours,
                has_bbox,
                has_overlap,
                &mut n_points_stream,
                flag_stream_all,
                flag_pos,
                &mut glyph_stream,
                &mut instruction_stream,
                &mut bbox_stream,
                &mut glyph_buf,
            )?;
            flag_pos += flag_byte_count;
            i16::from_be_bytes([glyph_buf[2], glyph_buf[3]])
        } else {
            if has_bbox {
                return Err(ReadError::malformed(glyf_tag(), "empty glyph has a bbox"));
            }
            glyph_buf.extend_from_slice(&0i16.to_be_bytes());
            0
        };
        x_mins.push(x_min);

        glyf_table.extend_from_slice(&glyph_buf);
        let padding = (4 - (glyf_table.len() % 4)) % 4;
        glyf_table.resize(glyf_table.len() + padding, 0);
    }
    loca_values.push(glyf_table.len() as u32);

    let loca = build_loca(&loca_values, index_format);

    Ok(GlyfAndLoca {
        glyf: glyf_table,
        loca,
        x_mins,
    })
}

fn build_loca(values: &[u32], index_format: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * if index_format != 0 { 4 } else { 2 });
    for &v in values {
        if index_format != 0 {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&((v >> 1) as u16).to_be_bytes());
        }
    }
    out
}

const FLAG_ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
const FLAG_WE_HAVE_A_SCALE: u16 = 1 << 3;
const FLAG_MORE_COMPONENTS: u16 = 1 << 5;
const FLAG_WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
const FLAG_WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;
const FLAG_WE_HAVE_INSTRUCTIONS: u16 = 1 << 8;

/// Parses one composite glyph record, appending it to `glyph_buf`, and
/// returns its `xMin`.
fn parse_composite_glyph(
    composite_stream: &mut crate::font_data::Cursor<'_>,
    glyph_stream: &mut crate::font_data::Cursor<'_>,
    instruction_stream: &mut crate::font_data::Cursor<'_>,
    bbox_stream: &mut crate::font_data::Cursor<'_>,
    glyph_buf: &mut Vec<u8>,
) -> Result<i16> {
    glyph_buf.extend_from_slice(&(-1i16).to_be_bytes());
    let bbox: [u8; 8] = {
        let mut b = [0u8; 8];
        for byte in b.iter_mut() {
            *byte = bbox_stream.read()?;
        }
        b
    };
    glyph_buf.extend_from_slice(&bbox);
    let x_min = i16::from_be_bytes([bbox[0], bbox[1]]);

    let mut have_instructions = false;
    loop {
        let flags: u16 = composite_stream.read()?;
        have_instructions |= flags & FLAG_WE_HAVE_INSTRUCTIONS != 0;
        glyph_buf.extend_from_slice(&flags.to_be_bytes());

        let arg_bytes = if flags & FLAG_ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        // glyph index (2 bytes) + args
        for _ in 0..(2 + arg_bytes) {
            let b: u8 = composite_stream.read()?;
            glyph_buf.push(b);
        }
        let transform_bytes = if flags & FLAG_WE_HAVE_A_SCALE != 0 {
            2
        } else if flags & FLAG_WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            4
        } else if flags & FLAG_WE_HAVE_A_TWO_BY_TWO != 0 {
            8
        } else {
            0
        };
        for _ in 0..transform_bytes {
            let b: u8 = composite_stream.read()?;
            glyph_buf.push(b);
        }
        if flags & FLAG_MORE_COMPONENTS == 0 {
            break;
        }
    }

    if have_instructions {
        let instruction_size = glyph_stream.read_255_u16()?;
        glyph_buf.extend_from_slice(&instruction_size.to_be_bytes());
        for _ in 0..instruction_size {
            let b: u8 = instruction_stream.read()?;
            glyph_buf.push(b);
        }
    }
    Ok(x_min)
}

#[allow(clippy::too_many_arguments)]
fn parse_simple_glyph(
    n_contours: i16,
    has_bbox: bool,
    has_overlap: bool,
    n_points_stream: &mut crate::font_data::Cursor<'_>,
    flag_stream_all: &[u8],
    flag_pos: usize,
    glyph_stream: &mut crate::font_data::Cursor<'_>,
    instruction_stream: &mut crate::font_data::Cursor<'_>,
    bbox_stream: &mut crate::font_data::Cursor<'_>,
    glyph_buf: &mut Vec<u8>,
) -> Result<usize> {
    let n_contours = n_contours as usize;
    let mut contour_end_points = Vec::with_capacity(n_contours);
    let mut total_points: u32 = 0;
    for _ in 0..n_contours {
        let n = n_points_stream.read_255_u16()?;
        total_points = total_points
            .checked_add(n as u32)
            .ok_or_else(|| ReadError::malformed(glyf_tag(), "point count overflow"))?;
        contour_end_points.push(total_points);
    }
    let flag_len = total_points as usize;
    let flags = flag_stream_all
        .get(flag_pos..flag_pos + flag_len)
        .ok_or_else(|| ReadError::malformed(glyf_tag(), "flag stream shorter than point count"))?;

    let points = decode_triplets(flags, glyph_stream)?;
    let instruction_size = glyph_stream.read_255_u16()?;
    if total_points >= (1 << 27) || instruction_size as u32 >= (1 << 30) {
        return Err(ReadError::malformed(glyf_tag(), "implausible point/instruction count"));
    }

    glyph_buf.extend_from_slice(&(n_contours as i16).to_be_bytes());
    if has_bbox {
        for _ in 0..8 {
            let b: u8 = bbox_stream.read()?;
            glyph_buf.push(b);
        }
    } else {
        write_bbox(&points, glyph_buf);
    }

    let mut end_point: i64 = -1;
    for &cumulative in &contour_end_points {
        end_point = cumulative as i64 - 1;
        if end_point >= 65536 {
            return Err(ReadError::malformed(glyf_tag(), "contour end point out of range"));
        }
        glyph_buf.extend_from_slice(&(end_point as u16).to_be_bytes());
    }

    glyph_buf.extend_from_slice(&instruction_size.to_be_bytes());
    for _ in 0..instruction_size {
        let b: u8 = instruction_stream.read()?;
        glyph_buf.push(b);
    }

    write_glyph_points(&points, has_overlap, glyph_buf);
    Ok(flag_len)
}

/// Decode the point-delta triplet stream. Flag low 7 bits select one of a
/// handful of 1-4 byte encodings for `(dx, dy)`; the flag's top bit marks an
/// off-curve point.
fn decode_triplets(flags: &[u8], data: &mut crate::font_data::Cursor<'_>) -> Result<Vec<Point>> {
    fn with_sign(flag: i32, base: i32) -> i32 {
        if flag & 1 != 0 {
            base
        } else {
            -base
        }
    }

    let mut points = Vec::with_capacity(flags.len());
    let mut x = 0i32;
    let mut y = 0i32;
    for &raw_flag in flags {
        let on_curve = raw_flag >> 7 == 0;
        let flag = (raw_flag & 0x7f) as i32;
        let (dx, dy) = if flag < 10 {
            let b0: u8 = data.read()?;
            (0, with_sign(flag, ((flag & 14) << 7) + b0 as i32))
        } else if flag < 20 {
            let b0: u8 = data.read()?;
            (with_sign(flag, (((flag - 10) & 14) << 7) + b0 as i32), 0)
        } else if flag < 84 {
            let b0 = flag - 20;
            let b1: u8 = data.read()?;
            let b1 = b1 as i32;
            (
                with_sign(flag, 1 + (b0 & 0x30) + (b1 >> 4)),
                with_sign(flag >> 1, 1 + ((b0 & 0x0c) << 2) + (b1 & 0x0f)),
            )
        } else if flag < 120 {
            let b0 = flag - 84;
            let b1: u8 = data.read()?;
            let b2: u8 = data.read()?;
            (
                with_sign(flag, 1 + ((b0 / 12) << 8) + b1 as i32),
                with_sign(flag >> 1, 1 + (((b0 % 12) >> 2) << 8) + b2 as i32),
            )
        } else if flag < 124 {
            let b1: u8 = data.read()?;
            let b2: u8 = data.read()?;
            (
                with_sign(flag, ((b1 as i32) << 4) + (b2 as i32 >> 4)),
                with_sign(flag >> 1, ((b2 as i32 & 0x0f) << 8) + data.read::<u8>()? as i32),
            )
        } else {
            let b1: u8 = data.read()?;
            let b2: u8 = data.read()?;
            let b3: u8 = data.read()?;
            let b4: u8 = data.read()?;
            (
                with_sign(flag, ((b1 as i32) << 8) + b2 as i32),
                with_sign(flag >> 1, ((b3 as i32) << 8) + b4 as i32),
            )
        };
        x = x
            .checked_add(dx)
            .ok_or_else(|| ReadError::malformed(glyf_tag(), "point coordinate overflow"))?;
        y = y
            .checked_add(dy)
            .ok_or_else(|| ReadError::malformed(glyf_tag(), "point coordinate overflow"))?;
        points.push(Point { x, y, on_curve });
    }
    Ok(points)
}

const GLYF_ON_CURVE: u8 = 1 << 0;
const GLYF_X_SHORT: u8 = 1 << 1;
const GLYF_Y_SHORT: u8 = 1 << 2;
const GLYF_REPEAT: u8 = 1 << 3;
const GLYF_THIS_X_IS_SAME: u8 = 1 << 4;
const GLYF_THIS_Y_IS_SAME: u8 = 1 << 5;
const OVERLAP_SIMPLE: u8 = 1 << 6;

fn write_bbox(points: &[Point], dst: &mut Vec<u8>) {
    let (mut x_min, mut y_min, mut x_max, mut y_max) = (0i32, 0i32, 0i32, 0i32);
    if let Some(first) = points.first() {
        x_min = first.x;
        x_max = first.x;
        y_min = first.y;
        y_max = first.y;
    }
    for p in points.iter().skip(1) {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    for v in [x_min, y_min, x_max, y_max] {
        dst.extend_from_slice(&(v as i16).to_be_bytes());
    }
}

fn write_glyph_points(points: &[Point], has_overlap: bool, dst: &mut Vec<u8>) {
    let mut last_flag: u8 = 0xff;
    let mut repeat_count: u8 = 0;
    let mut last_x = 0i32;
    let mut last_y = 0i32;
    let mut flags = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let mut flag = 0u8;
        if point.on_curve {
            flag |= GLYF_ON_CURVE;
        }
        if has_overlap && i == 0 {
            flag |= OVERLAP_SIMPLE;
        }
        let dx = point.x - last_x;
        if dx == 0 {
            flag |= GLYF_THIS_X_IS_SAME;
        } else if (-255..255).contains(&dx) {
            flag |= GLYF_X_SHORT;
            if dx > 0 {
                flag |= GLYF_THIS_X_IS_SAME;
            }
        }
        let dy = point.y - last_y;
        if dy == 0 {
            flag |= GLYF_THIS_Y_IS_SAME;
        } else if (-255..255).contains(&dy) {
            flag |= GLYF_Y_SHORT;
            if dy > 0 {
                flag |= GLYF_THIS_Y_IS_SAME;
            }
        }

        if flag == last_flag && repeat_count < 255 {
            repeat_count += 1;
        } else {
            if i > 0 {
                if repeat_count > 0 {
                    flags.push(last_flag | GLYF_REPEAT);
                    flags.push(repeat_count);
                } else {
                    flags.push(last_flag);
                }
            }
            repeat_count = 0;
        }
        last_flag = flag;
        last_x = point.x;
        last_y = point.y;
    }
    if !points.is_empty() {
        if repeat_count > 0 {
            flags.push(last_flag | GLYF_REPEAT);
            flags.push(repeat_count);
        } else {
            flags.push(last_flag);
        }
    }
    dst.extend_from_slice(&flags);

    let mut last_x = 0i32;
    for point in points {
        let dx = point.x - last_x;
        if dx == 0 {
            // nothing
        } else if (-255..255).contains(&dx) {
            dst.push(dx.unsigned_abs() as u8);
        } else {
            dst.extend_from_slice(&(dx as i16).to_be_bytes());
        }
        last_x += dx;
    }
    let mut last_y = 0i32;
    for point in points {
        let dy = point.y - last_y;
        if dy == 0 {
            // nothing
        } else if (-255..255).contains(&dy) {
            dst.push(dy.unsigned_abs() as u8);
        } else {
            dst.extend_from_slice(&(dy as i16).to_be_bytes());
        }
        last_y += dy;
    }
}

/// Reverse the hmtx transform (WOFF2 spec's "Transformed hmtx Table"),
/// rebuilding `longHorMetric[numHMetrics]` followed by the trailing `lsb`s.
fn reconstruct_hmtx(data: &[u8], num_glyphs: u16, num_h_metrics: u16, x_mins: &[i16]) -> Result<Vec<u8>> {
    if num_h_metrics == 0 || num_h_metrics > num_glyphs {
        return Err(ReadError::malformed(hmtx_tag(), "invalid numberOfHMetrics"));
    }
    if x_mins.len() != num_glyphs as usize {
        return Err(ReadError::malformed(
            hmtx_tag(),
            "xMin count from glyf does not match maxp.numGlyphs",
        ));
    }
    let mut cursor = FontData::new(data).cursor();
    let flags: u8 = cursor.read()?;
    if flags & 0xfc != 0 {
        return Err(ReadError::malformed(hmtx_tag(), "reserved hmtx flag bits must be zero"));
    }
    let proportional_lsbs_omitted = flags & 1 != 0;
    let monospace_lsbs_omitted = flags & 2 != 0;
    if proportional_lsbs_omitted && monospace_lsbs_omitted {
        return Err(ReadError::malformed(
            hmtx_tag(),
            "hmtx transform with both lsb groups omitted carries no new information",
        ));
    }

    let mut advance_widths = Vec::with_capacity(num_h_metrics as usize);
    for _ in 0..num_h_metrics {
        advance_widths.push(cursor.read::<u16>()?);
    }

    let mut lsbs = Vec::with_capacity(num_glyphs as usize);
    for gid in 0..num_h_metrics {
        let lsb = if proportional_lsbs_omitted {
            x_mins[gid as usize]
        } else {
            cursor.read::<i16>()?
        };
        lsbs.push(lsb);
    }
    for gid in num_h_metrics..num_glyphs {
        let lsb = if monospace_lsbs_omitted {
            x_mins[gid as usize]
        } else {
            cursor.read::<i16>()?
        };
        lsbs.push(lsb);
    }

    let mut out = Vec::with_capacity(2 * num_glyphs as usize + 2 * num_h_metrics as usize);
    for gid in 0..num_glyphs as usize {
        if gid < num_h_metrics as usize {
            out.extend_from_slice(&advance_widths[gid].to_be_bytes());
        }
        out.extend_from_slice(&lsbs[gid].to_be_bytes());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_are_sorted_consistently_with_the_woff2_spec() {
        assert_eq!(KNOWN_TAGS[0], b"cmap");
        assert_eq!(KNOWN_TAGS[10], b"glyf");
        assert_eq!(KNOWN_TAGS[11], b"loca");
        assert_eq!(KNOWN_TAGS[62], b"Sill");
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(decode(&[0u8; 10]).is_err());
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = vec![0u8; WOFF2_HEADER_LEN];
        bytes[0..4].copy_from_slice(b"wOFF");
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn hmtx_reconstruction_matches_reference_shape() {
        // flags = 0b01: proportional lsbs omitted (derive from xMin), monospace kept.
        let mut data = vec![0b01u8];
        data.extend_from_slice(&500u16.to_be_bytes()); // advanceWidths[0]
        // num_h_metrics = 1, num_glyphs = 2: one trailing monospace lsb, not omitted.
        data.extend_from_slice(&7i16.to_be_bytes());
        let x_mins = [12i16, 0];
        let hmtx = reconstruct_hmtx(&data, 2, 1, &x_mins).unwrap();
        // advanceWidth[0], lsb[0]=xMin[0], lsb[1]
        assert_eq!(&hmtx[0..2], &500u16.to_be_bytes());
        assert_eq!(&hmtx[2..4], &12i16.to_be_bytes());
        assert_eq!(&hmtx[4..6], &7i16.to_be_bytes());
    }

    #[test]
    fn hmtx_rejects_both_lsb_groups_omitted() {
        let data = vec![0b11u8, 0, 1];
        assert!(reconstruct_hmtx(&data, 1, 1, &[0]).is_err());
    }
}
