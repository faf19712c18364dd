//! The `vhea` table: https://learn.microsoft.com/en-us/typography/opentype/spec/vhea

use font_types::Tag;

pub const TAG: Tag = Tag::new(b"vhea");

pub use super::hvhea::HVhea as Vhea;
