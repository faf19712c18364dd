//! Structures shared by `GDEF`, `GSUB`, `GPOS`, `BASE`, and `JSTF`: glyph
//! coverage and class definitions, the script/feature/lookup list skeleton,
//! and the `ValueRecord` bitfield used throughout `GPOS`.
//!
//! Lookup *subtables* are exposed as raw, bounds-checked byte ranges rather
//! than decoded format-by-format: applying `GSUB`/`GPOS` rules is a shaping
//! concern external to this engine, which only needs to locate and hand off
//! the right lookups for a script/language/feature combination.

use font_types::GlyphId;

use crate::error::{ReadError, Result};
use crate::font_data::FontData;

/// `Coverage` table formats 1 (glyph list) and 2 (glyph ranges).
#[derive(Clone, Copy)]
pub enum Coverage<'a> {
    Format1 { glyphs: FontData<'a>, count: u16 },
    Format2 { ranges: FontData<'a>, count: u16 },
}

impl<'a> Coverage<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => {
                let count: u16 = data.read_at(2)?;
                Ok(Coverage::Format1 {
                    glyphs: data.split_off(4).ok_or(ReadError::OutOfBounds)?,
                    count,
                })
            }
            2 => {
                let count: u16 = data.read_at(2)?;
                Ok(Coverage::Format2 {
                    ranges: data.split_off(4).ok_or(ReadError::OutOfBounds)?,
                    count,
                })
            }
            other => Err(ReadError::malformed(
                font_types::Tag::new(b"cov "),
                format!("unknown Coverage format {other}"),
            )),
        }
    }

    /// The coverage index of `gid`, if covered (its position within the
    /// table's implied glyph ordering, used to index parallel value arrays).
    pub fn index(&self, gid: GlyphId) -> Option<u16> {
        match self {
            Coverage::Format1 { glyphs, count } => (0..*count)
                .find(|&i| glyphs.read_at::<u16>(i as usize * 2).ok() == Some(gid.to_u16())),
            Coverage::Format2 { ranges, count } => {
                for i in 0..*count {
                    let base = i as usize * 6;
                    let start: u16 = ranges.read_at(base).ok()?;
                    let end: u16 = ranges.read_at(base + 2).ok()?;
                    let start_index: u16 = ranges.read_at(base + 4).ok()?;
                    if gid.to_u16() >= start && gid.to_u16() <= end {
                        return Some(start_index + (gid.to_u16() - start));
                    }
                }
                None
            }
        }
    }

    pub fn glyphs(&self) -> Vec<GlyphId> {
        match self {
            Coverage::Format1 { glyphs, count } => (0..*count)
                .filter_map(|i| glyphs.read_at::<u16>(i as usize * 2).ok())
                .map(GlyphId::new)
                .collect(),
            Coverage::Format2 { ranges, count } => {
                let mut out = Vec::new();
                for i in 0..*count {
                    let base = i as usize * 6;
                    let Ok(start) = ranges.read_at::<u16>(base) else { break };
                    let Ok(end) = ranges.read_at::<u16>(base + 2) else { break };
                    out.extend((start..=end).map(GlyphId::new));
                }
                out
            }
        }
    }
}

/// `ClassDef` table formats 1 (contiguous glyph range) and 2 (glyph ranges).
#[derive(Clone, Copy)]
pub enum ClassDef<'a> {
    Format1 { start: u16, classes: FontData<'a>, count: u16 },
    Format2 { ranges: FontData<'a>, count: u16 },
}

impl<'a> ClassDef<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => {
                let start: u16 = data.read_at(2)?;
                let count: u16 = data.read_at(4)?;
                Ok(ClassDef::Format1 {
                    start,
                    classes: data.split_off(6).ok_or(ReadError::OutOfBounds)?,
                    count,
                })
            }
            2 => {
                let count: u16 = data.read_at(2)?;
                Ok(ClassDef::Format2 {
                    ranges: data.split_off(4).ok_or(ReadError::OutOfBounds)?,
                    count,
                })
            }
            other => Err(ReadError::malformed(
                font_types::Tag::new(b"cls "),
                format!("unknown ClassDef format {other}"),
            )),
        }
    }

    pub fn get(&self, gid: GlyphId) -> u16 {
        match self {
            ClassDef::Format1 { start, classes, count } => {
                let gid = gid.to_u16();
                if gid < *start || gid - start >= *count {
                    return 0;
                }
                classes.read_at(((gid - start) as usize) * 2).unwrap_or(0)
            }
            ClassDef::Format2 { ranges, count } => {
                for i in 0..*count {
                    let base = i as usize * 6;
                    let Ok(rstart) = ranges.read_at::<u16>(base) else { break };
                    let Ok(rend) = ranges.read_at::<u16>(base + 2) else { break };
                    if gid.to_u16() >= rstart && gid.to_u16() <= rend {
                        return ranges.read_at(base + 4).unwrap_or(0);
                    }
                }
                0
            }
        }
    }
}

pub const X_PLACEMENT: u16 = 0x0001;
pub const Y_PLACEMENT: u16 = 0x0002;
pub const X_ADVANCE: u16 = 0x0004;
pub const Y_ADVANCE: u16 = 0x0008;
pub const X_PLACEMENT_DEVICE: u16 = 0x0010;
pub const Y_PLACEMENT_DEVICE: u16 = 0x0020;
pub const X_ADVANCE_DEVICE: u16 = 0x0040;
pub const Y_ADVANCE_DEVICE: u16 = 0x0080;

/// A `GPOS` `ValueRecord`, whose on-wire size is whichever of the eight
/// optional fields `value_format`'s bits select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueRecord {
    pub x_placement: i16,
    pub y_placement: i16,
    pub x_advance: i16,
    pub y_advance: i16,
}

impl ValueRecord {
    pub fn size(value_format: u16) -> usize {
        (value_format.count_ones() as usize) * 2
    }

    pub fn read(data: &FontData<'_>, offset: usize, value_format: u16) -> Result<Self> {
        let mut record = ValueRecord::default();
        let mut cursor = data.split_off(offset).ok_or(ReadError::OutOfBounds)?.cursor();
        if value_format & X_PLACEMENT != 0 {
            record.x_placement = cursor.read()?;
        }
        if value_format & Y_PLACEMENT != 0 {
            record.y_placement = cursor.read()?;
        }
        if value_format & X_ADVANCE != 0 {
            record.x_advance = cursor.read()?;
        }
        if value_format & Y_ADVANCE != 0 {
            record.y_advance = cursor.read()?;
        }
        for flag in [X_PLACEMENT_DEVICE, Y_PLACEMENT_DEVICE, X_ADVANCE_DEVICE, Y_ADVANCE_DEVICE] {
            if value_format & flag != 0 {
                let _device_offset: u16 = cursor.read()?;
            }
        }
        Ok(record)
    }
}

/// One entry of a `ScriptList`/`FeatureList`/generic tagged-record array:
/// a 4-byte tag plus an offset to the tag's table, relative to the list's
/// own start.
#[derive(Clone, Copy, Debug)]
pub struct TaggedRecord {
    pub tag: font_types::Tag,
    pub offset: u16,
}

/// Read a `ScriptList`/`FeatureList`-shaped table: `count` (u16) followed by
/// `count` `(tag, offset)` records.
pub fn read_tagged_records(data: FontData<'_>) -> Result<Vec<TaggedRecord>> {
    let mut cursor = data.cursor();
    let count: u16 = cursor.read()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(TaggedRecord {
            tag: cursor.read_tag()?,
            offset: cursor.read()?,
        });
    }
    Ok(out)
}

/// A `LookupList`: an array of offsets (relative to the list's own start)
/// to `Lookup` tables.
pub struct LookupList<'a> {
    data: FontData<'a>,
    count: u16,
}

impl<'a> LookupList<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let count: u16 = data.read_at(0)?;
        Ok(LookupList { data, count })
    }

    pub fn len(&self) -> u16 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: u16) -> Result<Option<Lookup<'a>>> {
        if index >= self.count {
            return Ok(None);
        }
        let offset: u16 = self.data.read_at(2 + index as usize * 2)?;
        let lookup_data = self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(Lookup::read(lookup_data)?))
    }
}

/// One `Lookup` table: a type, flags, and its subtables' raw byte ranges.
/// Extension lookups (`GSUB` type 7, `GPOS` type 9) point each subtable
/// offset at an `Extension...Format1` wrapper one level deeper; the caller
/// is expected to know which table it's reading and unwrap that itself.
pub struct Lookup<'a> {
    pub lookup_type: u16,
    pub lookup_flag: u16,
    data: FontData<'a>,
    subtable_count: u16,
}

impl<'a> Lookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        Ok(Lookup {
            lookup_type: data.read_at(0)?,
            lookup_flag: data.read_at(2)?,
            subtable_count: data.read_at(4)?,
            data,
        })
    }

    pub fn subtable_count(&self) -> u16 {
        self.subtable_count
    }

    /// The raw bytes of subtable `index`, un-dispatched.
    pub fn subtable_data(&self, index: u16) -> Result<FontData<'a>> {
        if index >= self.subtable_count {
            return Err(ReadError::OutOfBounds);
        }
        let offset: u16 = self.data.read_at(6 + index as usize * 2)?;
        self.data.split_off(offset as usize).ok_or(ReadError::OutOfBounds)
    }
}

/// A `LangSys` table: the feature indices active for one script/language
/// combination, plus its required feature if any.
pub struct LangSys<'a> {
    data: FontData<'a>,
}

impl<'a> LangSys<'a> {
    pub fn required_feature_index(&self) -> Result<Option<u16>> {
        let v: u16 = self.data.read_at(2)?;
        Ok((v != 0xFFFF).then_some(v))
    }

    pub fn feature_indices(&self) -> Result<Vec<u16>> {
        let count: u16 = self.data.read_at(4)?;
        let mut cursor = self.data.cursor();
        cursor.skip(6)?;
        cursor.read_array(count as usize)
    }
}

/// A `Script` table: its default `LangSys`, if any, and its named ones.
pub struct Script<'a> {
    data: FontData<'a>,
    default_lang_sys_offset: u16,
    lang_sys_records: Vec<TaggedRecord>,
}

impl<'a> Script<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self> {
        let default_lang_sys_offset: u16 = data.read_at(0)?;
        let count: u16 = data.read_at(2)?;
        let mut cursor = data.cursor();
        cursor.skip(4)?;
        let mut lang_sys_records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            lang_sys_records.push(TaggedRecord {
                tag: cursor.read_tag()?,
                offset: cursor.read()?,
            });
        }
        Ok(Script {
            data,
            default_lang_sys_offset,
            lang_sys_records,
        })
    }

    pub fn default_lang_sys(&self) -> Result<Option<LangSys<'a>>> {
        if self.default_lang_sys_offset == 0 {
            return Ok(None);
        }
        let data = self
            .data
            .split_off(self.default_lang_sys_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(LangSys { data }))
    }

    pub fn lang_sys_records(&self) -> &[TaggedRecord] {
        &self.lang_sys_records
    }

    pub fn lang_sys(&self, tag: font_types::Tag) -> Result<Option<LangSys<'a>>> {
        let Some(record) = self.lang_sys_records.iter().find(|r| r.tag == tag) else {
            return Ok(None);
        };
        let data = self
            .data
            .split_off(record.offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Some(LangSys { data }))
    }
}

/// A `Feature` table: the lookup indices it activates.
pub struct Feature<'a> {
    data: FontData<'a>,
}

impl<'a> Feature<'a> {
    pub fn read(data: FontData<'a>) -> Self {
        Feature { data }
    }

    pub fn lookup_list_indices(&self) -> Result<Vec<u16>> {
        let count: u16 = self.data.read_at(2)?;
        let mut cursor = self.data.cursor();
        cursor.skip(4)?;
        cursor.read_array(count as usize)
    }
}

/// Resolve a `ScriptList`-shaped table (as returned by [`read_tagged_records`])
/// into `(tag, Script)` pairs.
pub fn read_script_list<'a>(data: FontData<'a>) -> Result<Vec<(font_types::Tag, Script<'a>)>> {
    read_tagged_records(data)
        .and_then(|records| {
            records
                .into_iter()
                .map(|r| {
                    let script_data = data.split_off(r.offset as usize).ok_or(ReadError::OutOfBounds)?;
                    Ok((r.tag, Script::read(script_data)?))
                })
                .collect()
        })
}

/// Resolve a `FeatureList`-shaped table into `(tag, Feature)` pairs.
pub fn read_feature_list<'a>(data: FontData<'a>) -> Result<Vec<(font_types::Tag, Feature<'a>)>> {
    read_tagged_records(data).map(|records| {
        records
            .into_iter()
            .filter_map(|r| {
                let feature_data = data.split_off(r.offset as usize)?;
                Some((r.tag, Feature::read(feature_data)))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_format1_lookup() {
        let mut b = Vec::new();
        b.extend_from_slice(&1u16.to_be_bytes());
        b.extend_from_slice(&2u16.to_be_bytes());
        b.extend_from_slice(&10u16.to_be_bytes());
        b.extend_from_slice(&20u16.to_be_bytes());
        let cov = Coverage::read(FontData::new(&b)).unwrap();
        assert_eq!(cov.index(GlyphId::new(20)), Some(1));
        assert_eq!(cov.index(GlyphId::new(5)), None);
    }

    #[test]
    fn coverage_format2_ranges() {
        let mut b = Vec::new();
        b.extend_from_slice(&2u16.to_be_bytes());
        b.extend_from_slice(&1u16.to_be_bytes());
        b.extend_from_slice(&10u16.to_be_bytes()); // start
        b.extend_from_slice(&15u16.to_be_bytes()); // end
        b.extend_from_slice(&0u16.to_be_bytes()); // startCoverageIndex
        let cov = Coverage::read(FontData::new(&b)).unwrap();
        assert_eq!(cov.index(GlyphId::new(12)), Some(2));
        assert_eq!(cov.glyphs().len(), 6);
    }

    #[test]
    fn class_def_format2() {
        let mut b = Vec::new();
        b.extend_from_slice(&2u16.to_be_bytes());
        b.extend_from_slice(&1u16.to_be_bytes());
        b.extend_from_slice(&10u16.to_be_bytes());
        b.extend_from_slice(&20u16.to_be_bytes());
        b.extend_from_slice(&3u16.to_be_bytes());
        let cls = ClassDef::read(FontData::new(&b)).unwrap();
        assert_eq!(cls.get(GlyphId::new(15)), 3);
        assert_eq!(cls.get(GlyphId::new(5)), 0);
    }

    #[test]
    fn value_record_size_from_format() {
        assert_eq!(ValueRecord::size(X_ADVANCE), 2);
        assert_eq!(ValueRecord::size(X_PLACEMENT | Y_PLACEMENT | X_ADVANCE), 6);
    }
}
