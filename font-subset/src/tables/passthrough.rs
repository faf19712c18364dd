//! Tables subsetting never rewrites: either copied through byte-for-byte
//! (`name`, `OS/2`, `STAT`, `CPAL`/`COLR`, `SVG`...) or kept only when a
//! [`crate::flags::SubsetFlags`] bit asks for them (hinting bytecode,
//! layout, kerning, `DSIG`).

use font_read::FontRef;
use font_types::Tag;

use crate::error::Result;
use crate::flags::SubsetFlags;

/// Tables this crate has dedicated rewrite logic for; everything else is
/// either copied verbatim or dropped.
fn is_rewritten(tag: Tag) -> bool {
    const REWRITTEN: [&[u8; 4]; 8] = [
        b"glyf", b"loca", b"cmap", b"hmtx", b"vmtx", b"hhea", b"vhea", b"maxp",
    ];
    REWRITTEN.iter().any(|t| Tag::new(*t) == tag) || tag == Tag::new(b"head") || tag == Tag::new(b"post") || tag == Tag::new(b"CFF ") || tag == Tag::new(b"CFF2")
}

const HINTING_TABLES: [&[u8; 4]; 6] = [b"fpgm", b"prep", b"cvt ", b"hdmx", b"LTSH", b"VDMX"];
const LAYOUT_TABLES: [&[u8; 4]; 5] = [b"GSUB", b"GPOS", b"GDEF", b"BASE", b"JSTF"];

/// Every table in `font` that should be copied through unchanged into the
/// subset, filtered by `flags`.
pub fn passthrough_tables(font: &FontRef<'_>, flags: SubsetFlags) -> Result<Vec<(Tag, Vec<u8>)>> {
    let mut out = Vec::new();
    for record in &font.table_directory().records {
        let tag = record.tag;
        if is_rewritten(tag) {
            continue;
        }
        if HINTING_TABLES.iter().any(|t| Tag::new(*t) == tag) && !flags.retain_hinting {
            continue;
        }
        if tag == Tag::new(b"gasp") && !flags.retain_hinting {
            continue;
        }
        if LAYOUT_TABLES.iter().any(|t| Tag::new(*t) == tag) && !flags.retain_layout {
            continue;
        }
        if tag == Tag::new(b"kern") && !flags.retain_kerning {
            continue;
        }
        if tag == Tag::new(b"DSIG") && !flags.retain_dsig {
            continue;
        }
        out.push((tag, font.table_data(tag)?.as_bytes().to_vec()));
    }
    Ok(out)
}
