//! Rewriting `head` for a subsetted font.
//!
//! Every field is carried over unchanged from the source font except the
//! four that subsetting can actually invalidate: `checkSumAdjustment` (left
//! `0` here; [`crate::font_builder::FontBuilder`] computes the real value
//! once the whole file exists), the glyph bounding box
//! (`xMin`/`yMin`/`xMax`/`yMax`), and `indexToLocFormat` (chosen by whichever
//! `loca` format the rebuilt `glyf` table ends up needing).

use font_read::tables::head::Head;
use font_types::LongDateTime;

use crate::write::{FontWrite, TableWriter};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadTable {
    pub major_version: u16,
    pub minor_version: u16,
    pub font_revision: f64,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl HeadTable {
    pub fn from_parsed(head: &Head<'_>) -> Self {
        HeadTable {
            major_version: head.major_version(),
            minor_version: head.minor_version(),
            font_revision: head.font_revision(),
            magic_number: head.magic_number(),
            flags: head.flags(),
            units_per_em: head.units_per_em(),
            created: head.created(),
            modified: head.modified(),
            x_min: head.x_min(),
            y_min: head.y_min(),
            x_max: head.x_max(),
            y_max: head.y_max(),
            mac_style: head.mac_style(),
            lowest_rec_ppem: head.lowest_rec_ppem(),
            font_direction_hint: head.font_direction_hint(),
            index_to_loc_format: head.index_to_loc_format(),
            glyph_data_format: head.glyph_data_format(),
        }
    }
}

impl FontWrite for HeadTable {
    fn write_into(&self, writer: &mut TableWriter) {
        self.major_version.write_into(writer);
        self.minor_version.write_into(writer);
        font_types::Fixed::from_f64(self.font_revision).write_into(writer);
        0u32.write_into(writer); // checkSumAdjustment, patched by FontBuilder
        self.magic_number.write_into(writer);
        self.flags.write_into(writer);
        self.units_per_em.write_into(writer);
        self.created.write_into(writer);
        self.modified.write_into(writer);
        self.x_min.write_into(writer);
        self.y_min.write_into(writer);
        self.x_max.write_into(writer);
        self.y_max.write_into(writer);
        self.mac_style.write_into(writer);
        self.lowest_rec_ppem.write_into(writer);
        self.font_direction_hint.write_into(writer);
        self.index_to_loc_format.write_into(writer);
        self.glyph_data_format.write_into(writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::dump_table;

    #[test]
    fn writes_54_bytes() {
        let head = HeadTable {
            major_version: 1,
            minor_version: 0,
            font_revision: 1.0,
            magic_number: 0x5F0F3CF5,
            flags: 0,
            units_per_em: 1000,
            created: LongDateTime::new(0),
            modified: LongDateTime::new(0),
            x_min: -100,
            y_min: -50,
            x_max: 900,
            y_max: 950,
            mac_style: 0,
            lowest_rec_ppem: 6,
            font_direction_hint: 2,
            index_to_loc_format: 0,
            glyph_data_format: 0,
        };
        assert_eq!(dump_table(&head).len(), 54);
    }
}
