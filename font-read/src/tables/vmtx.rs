//! The `vmtx` table: https://learn.microsoft.com/en-us/typography/opentype/spec/vmtx

use font_types::Tag;

pub const TAG: Tag = Tag::new(b"vmtx");

pub use super::hvmtx::HVmtx as Vmtx;
