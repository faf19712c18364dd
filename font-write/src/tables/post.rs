//! Writing `post`.
//!
//! Subsetting always downgrades to version 3.0: it carries none of the
//! original glyph names, which is fine since nothing downstream of a subset
//! (shaping, rasterizing) needs them, and it's smaller than re-emitting a
//! version 2.0 name array for a renumbered glyph set.

use font_read::tables::post::Post;

use crate::write::{FontWrite, TableWriter};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostTable {
    pub italic_angle: f64,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: bool,
}

impl PostTable {
    pub fn from_parsed(post: &Post<'_>) -> Self {
        PostTable {
            italic_angle: post.italic_angle(),
            underline_position: post.underline_position(),
            underline_thickness: post.underline_thickness(),
            is_fixed_pitch: post.is_fixed_pitch(),
        }
    }
}

impl FontWrite for PostTable {
    fn write_into(&self, writer: &mut TableWriter) {
        font_types::Fixed::from_f64(3.0).write_into(writer);
        font_types::Fixed::from_f64(self.italic_angle).write_into(writer);
        self.underline_position.write_into(writer);
        self.underline_thickness.write_into(writer);
        (self.is_fixed_pitch as u32).write_into(writer);
        writer.write_slice(&[0u8; 16]); // min/maxMemType42, min/maxMemType1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::dump_table;

    #[test]
    fn version_3_is_32_bytes() {
        let post = PostTable {
            italic_angle: 0.0,
            underline_position: -100,
            underline_thickness: 50,
            is_fixed_pitch: false,
        };
        assert_eq!(dump_table(&post).len(), 32);
    }
}
