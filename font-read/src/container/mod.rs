//! Normalizing TTF/OTF/WOFF/WOFF2/TTC containers into a canonical sfnt
//! byte buffer plus table directory.

pub mod sfnt;
mod ttc;
mod woff1;
mod woff2;

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use sfnt::{TableDirectory, SFNT_VERSION_TTCF};

pub use ttc::TtcHeader;

/// The container format detected from a font buffer's first four bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Sfnt,
    Woff1,
    Woff2,
    Ttc,
}

const WOFF1_TAG: u32 = u32::from_be_bytes(*b"wOFF");
const WOFF2_TAG: u32 = u32::from_be_bytes(*b"wOF2");

/// Detect the container format from a buffer's leading magic bytes.
pub fn sniff(bytes: &[u8]) -> Result<ContainerKind> {
    let data = FontData::new(bytes);
    let magic: u32 = data.read_at(0)?;
    match magic {
        sfnt::SFNT_VERSION_TRUETYPE
        | sfnt::SFNT_VERSION_OTTO
        | sfnt::SFNT_VERSION_TRUE
        | sfnt::SFNT_VERSION_TYP1 => Ok(ContainerKind::Sfnt),
        SFNT_VERSION_TTCF => Ok(ContainerKind::Ttc),
        WOFF1_TAG => Ok(ContainerKind::Woff1),
        WOFF2_TAG => Ok(ContainerKind::Woff2),
        _ => Err(ReadError::UnknownContainer),
    }
}

/// The backing bytes for an opened font: either the original buffer
/// (TTF/OTF/TTC, which are read in place) or a freshly decompressed sfnt
/// (WOFF1/WOFF2, which must be materialized).
pub enum FontSource<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl FontSource<'_> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FontSource::Borrowed(b) => b,
            FontSource::Owned(v) => v,
        }
    }
}

/// Normalize `bytes` (any supported container) into a canonical sfnt
/// [`FontSource`] plus the [`TableDirectory`] for font number `font_index`
/// (always `0` except for TTC/OTC).
pub fn open(bytes: &[u8], font_index: u32) -> Result<(FontSource<'_>, TableDirectory)> {
    match sniff(bytes)? {
        ContainerKind::Sfnt => {
            if font_index != 0 {
                return Err(ReadError::InvalidFontIndex(font_index));
            }
            let dir = TableDirectory::parse(FontData::new(bytes), 0)?;
            Ok((FontSource::Borrowed(bytes), dir))
        }
        ContainerKind::Ttc => {
            let header = ttc::TtcHeader::parse(FontData::new(bytes))?;
            let base = *header
                .offsets
                .get(font_index as usize)
                .ok_or(ReadError::InvalidFontIndex(font_index))?;
            let dir = TableDirectory::parse(FontData::new(bytes), base)?;
            Ok((FontSource::Borrowed(bytes), dir))
        }
        ContainerKind::Woff1 => {
            if font_index != 0 {
                return Err(ReadError::InvalidFontIndex(font_index));
            }
            let sfnt_bytes = woff1::decode(bytes)?;
            let dir = TableDirectory::parse(FontData::new(&sfnt_bytes), 0)?;
            Ok((FontSource::Owned(sfnt_bytes), dir))
        }
        ContainerKind::Woff2 => {
            if font_index != 0 {
                return Err(ReadError::InvalidFontIndex(font_index));
            }
            let sfnt_bytes = woff2::decode(bytes)?;
            let dir = TableDirectory::parse(FontData::new(&sfnt_bytes), 0)?;
            Ok((FontSource::Owned(sfnt_bytes), dir))
        }
    }
}

pub(crate) fn tag(s: &[u8; 4]) -> Tag {
    Tag::from_be_bytes(*s)
}
