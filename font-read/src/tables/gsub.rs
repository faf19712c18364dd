//! The `GSUB` table: https://learn.microsoft.com/en-us/typography/opentype/spec/gsub
//!
//! Glyph substitution rules. This layer locates scripts, features, and
//! lookups and exposes each lookup's raw subtable bytes; actually applying
//! a substitution (running a lookup's subtable format against a glyph
//! buffer) is a shaping concern outside this engine's scope.

use font_types::Tag;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;
use crate::read::FontRead;

use super::layout_common::{read_feature_list, read_script_list, Feature, LookupList, Script};

pub const TAG: Tag = Tag::new(b"GSUB");

/// Lookup type 7, whose subtables are a thin `(extensionLookupType, offset)`
/// indirection to a same-shaped subtable of the wrapped type.
pub const LOOKUP_TYPE_EXTENSION: u16 = 7;

#[derive(Clone, Copy)]
pub struct Gsub<'a> {
    data: FontData<'a>,
    script_list_offset: u16,
    feature_list_offset: u16,
    lookup_list_offset: u16,
}

impl<'a> FontRead<'a> for Gsub<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Gsub {
            data,
            script_list_offset: data.read_at(4)?,
            feature_list_offset: data.read_at(6)?,
            lookup_list_offset: data.read_at(8)?,
        })
    }
}

impl<'a> Gsub<'a> {
    pub fn scripts(&self) -> Result<Vec<(Tag, Script<'a>)>> {
        let data = self
            .data
            .split_off(self.script_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        read_script_list(data)
    }

    pub fn features(&self) -> Result<Vec<(Tag, Feature<'a>)>> {
        let data = self
            .data
            .split_off(self.feature_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        read_feature_list(data)
    }

    pub fn lookups(&self) -> Result<LookupList<'a>> {
        let data = self
            .data
            .split_off(self.lookup_list_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        LookupList::read(data)
    }
}
