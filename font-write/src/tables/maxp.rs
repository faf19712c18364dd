//! Rewriting `maxp`. Only `numGlyphs` changes; the profiling maxima
//! (version 1.0 only) are upper bounds computed against the *original*
//! glyph set and remain valid (if conservative) for any subset of it.

use font_read::tables::maxp::Maxp;
use font_types::Fixed;

use crate::write::{FontWrite, TableWriter};

#[derive(Clone, Debug, PartialEq)]
pub enum MaxpTable {
    Version05 {
        num_glyphs: u16,
    },
    Version10 {
        num_glyphs: u16,
        max_points: u16,
        max_contours: u16,
        max_composite_points: u16,
        max_composite_contours: u16,
        max_zones: u16,
        max_twilight_points: u16,
        max_storage: u16,
        max_function_defs: u16,
        max_instruction_defs: u16,
        max_stack_elements: u16,
        max_size_of_instructions: u16,
        max_component_elements: u16,
        max_component_depth: u16,
    },
}

impl MaxpTable {
    pub fn from_parsed(maxp: &Maxp<'_>, new_num_glyphs: u16) -> Self {
        match maxp.max_points() {
            None => MaxpTable::Version05 {
                num_glyphs: new_num_glyphs,
            },
            Some(max_points) => MaxpTable::Version10 {
                num_glyphs: new_num_glyphs,
                max_points,
                max_contours: maxp.max_contours().unwrap_or(0),
                max_composite_points: maxp.max_composite_points().unwrap_or(0),
                max_composite_contours: maxp.max_composite_contours().unwrap_or(0),
                max_zones: maxp.max_zones().unwrap_or(1),
                max_twilight_points: maxp.max_twilight_points().unwrap_or(0),
                max_storage: maxp.max_storage().unwrap_or(0),
                max_function_defs: maxp.max_function_defs().unwrap_or(0),
                max_instruction_defs: maxp.max_instruction_defs().unwrap_or(0),
                max_stack_elements: maxp.max_stack_elements().unwrap_or(0),
                max_size_of_instructions: maxp.max_size_of_instructions().unwrap_or(0),
                max_component_elements: maxp.max_component_elements().unwrap_or(0),
                max_component_depth: maxp.max_component_depth().unwrap_or(0),
            },
        }
    }

    pub fn num_glyphs(&self) -> u16 {
        match self {
            MaxpTable::Version05 { num_glyphs } => *num_glyphs,
            MaxpTable::Version10 { num_glyphs, .. } => *num_glyphs,
        }
    }
}

impl FontWrite for MaxpTable {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            MaxpTable::Version05 { num_glyphs } => {
                Fixed::from_f64(0.5).write_into(writer);
                num_glyphs.write_into(writer);
            }
            MaxpTable::Version10 {
                num_glyphs,
                max_points,
                max_contours,
                max_composite_points,
                max_composite_contours,
                max_zones,
                max_twilight_points,
                max_storage,
                max_function_defs,
                max_instruction_defs,
                max_stack_elements,
                max_size_of_instructions,
                max_component_elements,
                max_component_depth,
            } => {
                Fixed::from_f64(1.0).write_into(writer);
                num_glyphs.write_into(writer);
                max_points.write_into(writer);
                max_contours.write_into(writer);
                max_composite_points.write_into(writer);
                max_composite_contours.write_into(writer);
                max_zones.write_into(writer);
                max_twilight_points.write_into(writer);
                max_storage.write_into(writer);
                max_function_defs.write_into(writer);
                max_instruction_defs.write_into(writer);
                max_stack_elements.write_into(writer);
                max_size_of_instructions.write_into(writer);
                max_component_elements.write_into(writer);
                max_component_depth.write_into(writer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::dump_table;

    #[test]
    fn version_05_is_six_bytes() {
        let maxp = MaxpTable::Version05 { num_glyphs: 10 };
        assert_eq!(dump_table(&maxp).len(), 6);
    }

    #[test]
    fn version_10_is_32_bytes() {
        let maxp = MaxpTable::Version10 {
            num_glyphs: 10,
            max_points: 0,
            max_contours: 0,
            max_composite_points: 0,
            max_composite_contours: 0,
            max_zones: 1,
            max_twilight_points: 0,
            max_storage: 0,
            max_function_defs: 0,
            max_instruction_defs: 0,
            max_stack_elements: 0,
            max_size_of_instructions: 0,
            max_component_elements: 0,
            max_component_depth: 0,
        };
        assert_eq!(dump_table(&maxp).len(), 32);
    }
}
