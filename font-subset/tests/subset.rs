//! End-to-end subsetting scenarios over a small hand-built TrueType font:
//! three glyphs (`.notdef`, `A`, `B`), each a one-contour triangle, with a
//! `cmap` mapping `'A'` and `'B'` to glyphs 1 and 2.
//!
//! Exercises subsetting's metrics-preservation property at a scale that
//! doesn't need a vendored real font file.

use std::collections::BTreeSet;

use font_read::FontRef;
use font_subset::flags::SubsetFlags;
use font_types::{GlyphId, Tag};
use font_write::font_builder::FontBuilder;
use font_write::tables::cmap::CmapTable;
use font_write::tables::glyf::compile_glyf_loca;
use font_write::tables::head::HeadTable;
use font_write::tables::hhea::HheaTable;
use font_write::tables::hmtx::{LongMetric, MtxTable};
use font_write::tables::maxp::MaxpTable;
use font_write::tables::post::PostTable;
use font_write::write::dump_table;

const UNITS_PER_EM: u16 = 1000;
const ASCENDER: i16 = 800;
const DESCENDER: i16 = -200;

/// A simple glyph with a single on-curve-only triangle contour. `points`
/// are absolute coordinates; deltas and the bbox are computed here.
fn simple_triangle(points: [(i16, i16); 3]) -> Vec<u8> {
    let x_min = points.iter().map(|p| p.0).min().unwrap();
    let y_min = points.iter().map(|p| p.1).min().unwrap();
    let x_max = points.iter().map(|p| p.0).max().unwrap();
    let y_max = points.iter().map(|p| p.1).max().unwrap();

    let mut out = Vec::new();
    out.extend_from_slice(&1i16.to_be_bytes()); // numberOfContours
    out.extend_from_slice(&x_min.to_be_bytes());
    out.extend_from_slice(&y_min.to_be_bytes());
    out.extend_from_slice(&x_max.to_be_bytes());
    out.extend_from_slice(&y_max.to_be_bytes());
    out.extend_from_slice(&2u16.to_be_bytes()); // endPtsOfContours[0] (3 points)
    out.extend_from_slice(&0u16.to_be_bytes()); // instructionLength

    // All points on-curve; neither X_SHORT/Y_SHORT nor SAME_OR_POSITIVE set,
    // so coordinates below are read back as plain i16 deltas.
    const ON_CURVE: u8 = 0x01;
    for _ in 0..3 {
        out.push(ON_CURVE);
    }

    let mut prev = (0i16, 0i16);
    for &(x, y) in &points {
        out.extend_from_slice(&(x - prev.0).to_be_bytes());
        prev = (x, y);
    }
    let mut prev_y = 0i16;
    for &(_, y) in &points {
        out.extend_from_slice(&(y - prev_y).to_be_bytes());
        prev_y = y;
    }
    out
}

/// Builds a 3-glyph TrueType font: `.notdef` (empty), `A` (gid 1), `B`
/// (gid 2), each a triangle at a different position so their bboxes
/// differ, and a `cmap` mapping both letters to their glyphs.
fn build_test_font() -> Vec<u8> {
    let glyphs = vec![
        Vec::new(), // .notdef: empty
        simple_triangle([(0, 0), (400, 0), (200, 600)]), // 'A'
        simple_triangle([(50, 50), (450, 50), (250, 650)]), // 'B'
    ];
    let glyf_loca = compile_glyf_loca(&glyphs);

    let mut builder = FontBuilder::new();

    let head = HeadTable {
        major_version: 1,
        minor_version: 0,
        font_revision: 1.0,
        magic_number: 0x5F0F3CF5,
        flags: 0,
        units_per_em: UNITS_PER_EM,
        created: font_types::LongDateTime::new(0),
        modified: font_types::LongDateTime::new(0),
        x_min: 0,
        y_min: 0,
        x_max: 450,
        y_max: 650,
        mac_style: 0,
        lowest_rec_ppem: 6,
        font_direction_hint: 2,
        index_to_loc_format: if glyf_loca.is_long_loca { 1 } else { 0 },
        glyph_data_format: 0,
    };
    builder.add_table(Tag::new(b"head"), dump_table(&head));

    let hhea = HheaTable {
        version: 1.0,
        ascender: ASCENDER,
        descender: DESCENDER,
        line_gap: 0,
        advance_max: 500,
        min_first_side_bearing: 0,
        min_second_side_bearing: 0,
        max_extent: 650,
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        metric_data_format: 0,
        number_of_long_metrics: 3,
    };
    builder.add_table(Tag::new(b"hhea"), dump_table(&hhea));

    let maxp = MaxpTable::Version10 {
        num_glyphs: 3,
        max_points: 3,
        max_contours: 1,
        max_composite_points: 0,
        max_composite_contours: 0,
        max_zones: 1,
        max_twilight_points: 0,
        max_storage: 0,
        max_function_defs: 0,
        max_instruction_defs: 0,
        max_stack_elements: 0,
        max_size_of_instructions: 0,
        max_component_elements: 0,
        max_component_depth: 0,
    };
    builder.add_table(Tag::new(b"maxp"), dump_table(&maxp));

    let hmtx = MtxTable {
        metrics: vec![
            LongMetric { advance: 0, bearing: 0 },
            LongMetric { advance: 450, bearing: 0 },
            LongMetric { advance: 500, bearing: 50 },
        ],
        trailing_bearings: vec![],
    };
    builder.add_table(Tag::new(b"hmtx"), dump_table(&hmtx));

    let cmap = CmapTable::from_mappings(vec![
        ('A' as u32, GlyphId::new(1)),
        ('B' as u32, GlyphId::new(2)),
    ]);
    builder.add_table(Tag::new(b"cmap"), dump_table(&cmap));

    builder.add_table(Tag::new(b"glyf"), glyf_loca.glyf);
    builder.add_table(Tag::new(b"loca"), glyf_loca.loca);

    builder.add_table(Tag::new(b"name"), vec![0, 0, 0, 0, 0, 6]); // version 0, count 0, stringOffset 6

    let post = PostTable {
        italic_angle: 0.0,
        underline_position: -100,
        underline_thickness: 50,
        is_fixed_pitch: false,
    };
    builder.add_table(Tag::new(b"post"), dump_table(&post));

    builder.build(0x0001_0000)
}

#[test]
fn subset_to_one_letter_preserves_metrics_and_shrinks() {
    let original_bytes = build_test_font();
    let original = FontRef::new(&original_bytes).unwrap();
    assert_eq!(original.maxp().unwrap().num_glyphs(), 3);

    let codepoints = BTreeSet::from(['A' as u32]);
    let subset_bytes = font_subset::subset(&original, &codepoints, SubsetFlags::default()).unwrap();

    let subset = FontRef::new(&subset_bytes).unwrap();
    subset.validate_required_tables().unwrap();

    // .notdef + 'A' only: 'B' is dropped.
    assert_eq!(subset.maxp().unwrap().num_glyphs(), 2);
    assert_eq!(subset.head().unwrap().units_per_em(), UNITS_PER_EM);
    assert_eq!(subset.hhea().unwrap().ascender(), ASCENDER);
    assert_eq!(subset.hhea().unwrap().descender(), DESCENDER);

    let charmap = font_scale::charmap::Charmap::new(&subset).unwrap();
    let gid = charmap.map('A' as u32).expect("'A' must still resolve");
    assert_ne!(gid, GlyphId::NOTDEF);
    assert!(charmap.map('B' as u32).is_none());

    assert!(subset_bytes.len() < original_bytes.len());

    // head's bbox is recomputed from only the retained glyph ('A'), not
    // the dropped 'B' triangle's (50,50)-(450,650) box.
    let head = subset.head().unwrap();
    assert_eq!((head.x_min(), head.y_min(), head.x_max(), head.y_max()), (0, 0, 400, 600));
}

#[test]
fn subset_checksum_adjustment_is_consistent() {
    let original_bytes = build_test_font();
    let original = FontRef::new(&original_bytes).unwrap();
    let codepoints = BTreeSet::from(['A' as u32, 'B' as u32]);
    let subset_bytes = font_subset::subset(&original, &codepoints, SubsetFlags::default()).unwrap();

    // Recompute the whole-file checksum with checkSumAdjustment zeroed and
    // confirm it round-trips to the magic constant.
    let head_record = FontRef::new(&subset_bytes)
        .unwrap()
        .table_directory()
        .find(Tag::new(b"head"))
        .unwrap();
    let adjustment_offset = head_record.offset as usize + 8;
    let mut zeroed = subset_bytes.clone();
    zeroed[adjustment_offset..adjustment_offset + 4].copy_from_slice(&[0, 0, 0, 0]);

    let mut sum = 0u32;
    let mut chunks = zeroed.chunks_exact(4);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes(chunk.try_into().unwrap()));
    }
    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let mut buf = [0u8; 4];
        buf[..remainder.len()].copy_from_slice(remainder);
        sum = sum.wrapping_add(u32::from_be_bytes(buf));
    }

    let adjustment = u32::from_be_bytes(subset_bytes[adjustment_offset..adjustment_offset + 4].try_into().unwrap());
    assert_eq!(0xB1B0_AFBAu32.wrapping_sub(sum), adjustment);
}

#[test]
fn subsetting_to_no_codepoints_keeps_only_notdef() {
    let original_bytes = build_test_font();
    let original = FontRef::new(&original_bytes).unwrap();
    let subset_bytes = font_subset::subset(&original, &BTreeSet::new(), SubsetFlags::default()).unwrap();
    let subset = FontRef::new(&subset_bytes).unwrap();
    assert_eq!(subset.maxp().unwrap().num_glyphs(), 1);
}
