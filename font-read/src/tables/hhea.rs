//! The `hhea` table: https://learn.microsoft.com/en-us/typography/opentype/spec/hhea

use font_types::Tag;

pub const TAG: Tag = Tag::new(b"hhea");

pub use super::hvhea::HVhea as Hhea;
