//! Lazy, bounds-checked parsing of TrueType/OpenType fonts.
//!
//! [`FontRef`] normalizes any supported container (bare sfnt, WOFF, WOFF2,
//! or a font in a TTC/OTC collection) into a canonical table directory and
//! hands out typed, per-table views on demand. Nothing is parsed, copied,
//! or validated beyond what a given accessor touches.

pub mod container;
pub mod error;
pub mod font_data;
pub mod read;
pub mod tables;

use font_types::{GlyphId, Tag};

use container::sfnt::TableDirectory;
use container::FontSource;
use error::{ReadError, Result};
use font_data::FontData;
use read::{FontRead, FontReadWithArgs};

/// A parsed font: a normalized table directory plus the bytes it indexes
/// into. Table accessors are cheap and re-parse their table's header on
/// every call; callers that need a table repeatedly should hold onto the
/// returned value rather than re-invoking the accessor.
pub struct FontRef<'a> {
    source: FontSource<'a>,
    directory: TableDirectory,
}

impl<'a> FontRef<'a> {
    /// Opens the first (or only) font in `bytes`.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        Self::new_with_index(bytes, 0)
    }

    /// Opens the `font_index`th font of a TTC/OTC collection (`0` for any
    /// other container).
    pub fn new_with_index(bytes: &'a [u8], font_index: u32) -> Result<Self> {
        let (source, directory) = container::open(bytes, font_index)?;
        Ok(FontRef { source, directory })
    }

    pub fn table_directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn has_table(&self, tag: Tag) -> bool {
        self.directory.find(tag).is_some()
    }

    /// The raw bytes of the table tagged `tag`, or an error if the font
    /// has no such table.
    pub fn table_data(&self, tag: Tag) -> Result<FontData<'_>> {
        let record = self.directory.find(tag).ok_or(ReadError::MissingTable(tag))?;
        let start = record.offset as usize;
        let end = start
            .checked_add(record.length as usize)
            .ok_or(ReadError::OutOfBounds)?;
        FontData::new(self.source.as_bytes())
            .slice(start..end)
            .ok_or(ReadError::OutOfBounds)
    }

    fn read_table<T: FontRead<'_>>(&self, tag: Tag) -> Result<T> {
        T::read(self.table_data(tag)?)
    }

    /// Whether this font's outlines live in `glyf`/`loca` (as opposed to
    /// `CFF `/`CFF2`).
    pub fn is_cff(&self) -> bool {
        self.directory.is_cff()
    }

    /// Checks that every table required by [`Self::is_cff`]'s outline
    /// format, plus the tables every font must carry, is present.
    pub fn validate_required_tables(&self) -> Result<()> {
        const ALWAYS_REQUIRED: &[Tag] = &[
            tables::head::TAG,
            tables::hhea::TAG,
            tables::maxp::TAG,
            tables::hmtx::TAG,
            tables::cmap::TAG,
            tables::name::TAG,
            tables::post::TAG,
        ];
        for tag in ALWAYS_REQUIRED {
            if !self.has_table(*tag) {
                return Err(ReadError::MissingTable(*tag));
            }
        }
        if self.is_cff() {
            if !self.has_table(tables::cff::TAG) && !self.has_table(tables::cff2::TAG) {
                return Err(ReadError::MissingTable(tables::cff::TAG));
            }
        } else {
            for tag in [tables::glyf::TAG, tables::loca::TAG] {
                if !self.has_table(tag) {
                    return Err(ReadError::MissingTable(tag));
                }
            }
        }
        Ok(())
    }

    pub fn head(&self) -> Result<tables::head::Head<'_>> {
        self.read_table(tables::head::TAG)
    }

    pub fn hhea(&self) -> Result<tables::hhea::Hhea<'_>> {
        self.read_table(tables::hhea::TAG)
    }

    pub fn vhea(&self) -> Result<tables::vhea::Vhea<'_>> {
        self.read_table(tables::vhea::TAG)
    }

    pub fn maxp(&self) -> Result<tables::maxp::Maxp<'_>> {
        self.read_table(tables::maxp::TAG)
    }

    pub fn hmtx(&self) -> Result<tables::hmtx::Hmtx<'_>> {
        let hhea = self.hhea()?;
        let maxp = self.maxp()?;
        tables::hmtx::Hmtx::read_with_args(
            self.table_data(tables::hmtx::TAG)?,
            &(hhea.number_of_long_metrics(), maxp.num_glyphs()),
        )
    }

    pub fn vmtx(&self) -> Result<tables::vmtx::Vmtx<'_>> {
        let vhea = self.vhea()?;
        let maxp = self.maxp()?;
        tables::vmtx::Vmtx::read_with_args(
            self.table_data(tables::vmtx::TAG)?,
            &(vhea.number_of_long_metrics(), maxp.num_glyphs()),
        )
    }

    pub fn loca(&self) -> Result<tables::loca::Loca<'_>> {
        let head = self.head()?;
        tables::loca::Loca::read_with_args(
            self.table_data(tables::loca::TAG)?,
            &(head.index_to_loc_format() != 0),
        )
    }

    pub fn glyf(&self) -> Result<tables::glyf::Glyf<'_>> {
        self.read_table(tables::glyf::TAG)
    }

    pub fn cmap(&self) -> Result<tables::cmap::Cmap<'_>> {
        self.read_table(tables::cmap::TAG)
    }

    pub fn name(&self) -> Result<tables::name::Name<'_>> {
        self.read_table(tables::name::TAG)
    }

    pub fn post(&self) -> Result<tables::post::Post<'_>> {
        self.read_table(tables::post::TAG)
    }

    pub fn os2(&self) -> Result<tables::os2::Os2<'_>> {
        self.read_table(tables::os2::TAG)
    }

    pub fn kern(&self) -> Result<tables::kern::Kern<'_>> {
        self.read_table(tables::kern::TAG)
    }

    pub fn vorg(&self) -> Result<tables::vorg::Vorg<'_>> {
        self.read_table(tables::vorg::TAG)
    }

    pub fn fvar(&self) -> Result<tables::fvar::Fvar<'_>> {
        self.read_table(tables::fvar::TAG)
    }

    pub fn avar(&self) -> Result<tables::avar::Avar<'_>> {
        self.read_table(tables::avar::TAG)
    }

    pub fn gvar(&self) -> Result<tables::gvar::Gvar<'_>> {
        self.read_table(tables::gvar::TAG)
    }

    pub fn cvar(&self) -> Result<tables::cvar::Cvar<'_>> {
        let axis_count = self.fvar()?.axis_count();
        tables::cvar::Cvar::read(self.table_data(tables::cvar::TAG)?, axis_count)
    }

    pub fn stat(&self) -> Result<tables::stat::Stat<'_>> {
        self.read_table(tables::stat::TAG)
    }

    pub fn hvar(&self) -> Result<tables::hvar::Hvar<'_>> {
        self.read_table(tables::hvar::TAG)
    }

    pub fn vvar(&self) -> Result<tables::vvar::Vvar<'_>> {
        self.read_table(tables::vvar::TAG)
    }

    pub fn mvar(&self) -> Result<tables::mvar::Mvar<'_>> {
        self.read_table(tables::mvar::TAG)
    }

    pub fn gdef(&self) -> Result<tables::gdef::Gdef<'_>> {
        self.read_table(tables::gdef::TAG)
    }

    pub fn gsub(&self) -> Result<tables::gsub::Gsub<'_>> {
        self.read_table(tables::gsub::TAG)
    }

    pub fn gpos(&self) -> Result<tables::gpos::Gpos<'_>> {
        self.read_table(tables::gpos::TAG)
    }

    pub fn base(&self) -> Result<tables::base::Base<'_>> {
        self.read_table(tables::base::TAG)
    }

    pub fn jstf(&self) -> Result<tables::jstf::Jstf<'_>> {
        self.read_table(tables::jstf::TAG)
    }

    pub fn cff(&self) -> Result<tables::cff::Cff<'_>> {
        self.read_table(tables::cff::TAG)
    }

    pub fn cff2(&self) -> Result<tables::cff2::Cff2<'_>> {
        self.read_table(tables::cff2::TAG)
    }

    pub fn colr(&self) -> Result<tables::colr::Colr<'_>> {
        self.read_table(tables::colr::TAG)
    }

    pub fn cpal(&self) -> Result<tables::cpal::Cpal<'_>> {
        self.read_table(tables::cpal::TAG)
    }

    pub fn svg(&self) -> Result<tables::svg::Svg<'_>> {
        self.read_table(tables::svg::TAG)
    }

    /// Whether `gid` is covered by an embedded `SVG ` document, `COLR`
    /// color layers, or neither (monochrome outline only).
    pub fn has_color_glyph(&self, gid: GlyphId) -> Result<bool> {
        if self.has_table(tables::svg::TAG) && self.svg()?.document_for_glyph(gid)?.is_some() {
            return Ok(true);
        }
        if self.has_table(tables::colr::TAG) && self.colr()?.base_glyph(gid)?.is_some() {
            return Ok(true);
        }
        Ok(false)
    }

    pub fn fpgm(&self) -> Result<tables::raw_table::RawTable<'_>> {
        self.read_table(tables::raw_table::FPGM)
    }

    pub fn prep(&self) -> Result<tables::raw_table::RawTable<'_>> {
        self.read_table(tables::raw_table::PREP)
    }

    pub fn cvt(&self) -> Result<tables::raw_table::Cvt<'_>> {
        self.read_table(tables::raw_table::CVT)
    }

    pub fn hdmx(&self) -> Result<tables::raw_table::RawTable<'_>> {
        self.read_table(tables::raw_table::HDMX)
    }

    pub fn ltsh(&self) -> Result<tables::raw_table::RawTable<'_>> {
        self.read_table(tables::raw_table::LTSH)
    }

    pub fn vdmx(&self) -> Result<tables::raw_table::RawTable<'_>> {
        self.read_table(tables::raw_table::VDMX)
    }

    pub fn gasp(&self) -> Result<tables::raw_table::Gasp<'_>> {
        self.read_table(tables::raw_table::GASP)
    }

    pub fn dsig(&self) -> Result<tables::raw_table::RawTable<'_>> {
        self.read_table(tables::raw_table::DSIG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_sfnt() -> Vec<u8> {
        // sfnt header + a single zero-length 'head' directory entry. Enough
        // to exercise directory parsing and the missing-table error path
        // without a real table present.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // sfntVersion
        bytes.extend_from_slice(&1u16.to_be_bytes()); // numTables
        bytes.extend_from_slice(&[0u8; 6]); // searchRange/entrySelector/rangeShift
        bytes.extend_from_slice(b"head");
        bytes.extend_from_slice(&0u32.to_be_bytes()); // checksum
        bytes.extend_from_slice(&(bytes.len() as u32 + 8).to_be_bytes()); // offset (after this record)
        bytes.extend_from_slice(&0u32.to_be_bytes()); // length
        bytes
    }

    #[test]
    fn missing_table_reports_its_tag() {
        let bytes = minimal_sfnt();
        let font = FontRef::new(&bytes).unwrap();
        assert!(font.has_table(Tag::new(b"head")));
        assert!(!font.has_table(Tag::new(b"hhea")));
        match font.hhea() {
            Err(ReadError::MissingTable(tag)) => assert_eq!(tag, Tag::new(b"hhea")),
            other => panic!("expected MissingTable(hhea), got {other:?}"),
        }
    }

    #[test]
    fn validate_required_tables_fails_on_minimal_font() {
        let bytes = minimal_sfnt();
        let font = FontRef::new(&bytes).unwrap();
        assert!(font.validate_required_tables().is_err());
    }
}
