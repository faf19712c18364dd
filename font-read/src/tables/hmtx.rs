//! The `hmtx` table: https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx

use font_types::Tag;

pub const TAG: Tag = Tag::new(b"hmtx");

pub use super::hvmtx::HVmtx as Hmtx;
