//! Building CFF Top/Private/Font DICTs for the subsetted font.
//!
//! Offset operands (`CharStrings`, `Private`, `charset`, `FDArray`,
//! `FDSelect`) are always written with DICT's 5-byte `29`-prefixed integer
//! form, even for small values. That fixes every offset operand's encoded
//! size before its true value is known, so the dict's total byte length
//! (and therefore every other offset computed from it) doesn't shift once
//! the real offsets are filled in -- no fixed-point offset resolution
//! needed.

use std::collections::BTreeMap;

use font_read::tables::cff::Operand;

#[derive(Clone, Debug, Default)]
pub struct DictBuilder {
    entries: BTreeMap<u16, Vec<Operand>>,
}

impl DictBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every entry of `source` through unchanged.
    pub fn copy_from(mut self, source: &font_read::tables::cff::Dict, skip: &[u16]) -> Self {
        for &op in ALL_KNOWN_OPS {
            if skip.contains(&op) {
                continue;
            }
            if let Some(operands) = source.get(op) {
                self.entries.insert(op, operands.to_vec());
            }
        }
        self
    }

    pub fn set_int(mut self, op: u16, value: i32) -> Self {
        self.entries.insert(op, vec![Operand::Integer(value)]);
        self
    }

    pub fn set_pair(mut self, op: u16, a: i32, b: i32) -> Self {
        self.entries
            .insert(op, vec![Operand::Integer(a), Operand::Integer(b)]);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (&op, operands) in &self.entries {
            for &operand in operands {
                encode_operand(operand, &mut out);
            }
            encode_operator(op, &mut out);
        }
        out
    }
}

fn encode_operand(operand: Operand, out: &mut Vec<u8>) {
    match operand {
        Operand::Integer(v) => {
            out.push(29);
            out.extend_from_slice(&v.to_be_bytes());
        }
        Operand::Real(v) => encode_real(v, out),
    }
}

fn encode_real(v: f64, out: &mut Vec<u8>) {
    out.push(30);
    let mut s = format!("{v}");
    if !s.contains('.') && !s.contains('E') && !s.contains('e') {
        s.push_str(".0");
    }
    let mut nibbles = Vec::new();
    for ch in s.chars() {
        nibbles.push(match ch {
            '0'..='9' => ch as u8 - b'0',
            '.' => 0xa,
            'E' | 'e' => {
                if s.contains("E-") || s.contains("e-") {
                    continue;
                }
                0xb
            }
            '-' => 0xe,
            _ => continue,
        });
    }
    nibbles.push(0xf);
    if nibbles.len() % 2 != 0 {
        nibbles.push(0xf);
    }
    for pair in nibbles.chunks(2) {
        out.push((pair[0] << 4) | pair[1]);
    }
}

fn encode_operator(op: u16, out: &mut Vec<u8>) {
    if op & 0x0c00 != 0 {
        out.push(12);
        out.push((op & 0xff) as u8);
    } else {
        out.push(op as u8);
    }
}

/// Every Top/Private/Font DICT operator `copy_from` might carry through.
/// `Charset`/`Encoding`/`CharStrings`/`Private`/`Subrs`/`ROS`/`FDArray`/
/// `FDSelect` are excluded here -- subsetting always sets those itself.
const ALL_KNOWN_OPS: &[u16] = &[
    0,      // version
    1,      // Notice
    2,      // FullName
    3,      // FamilyName
    4,      // Weight
    0x0c00, // Copyright
    0x0c01, // isFixedPitch
    0x0c02, // ItalicAngle
    0x0c03, // UnderlinePosition
    0x0c04, // UnderlineThickness
    0x0c05, // PaintType
    0x0c06, // CharstringType
    0x0c07, // FontMatrix
    0x0c08, // StrokeWidth
    0x0c14, // SyntheticBase
    0x0c15, // PostScript
    0x0c16, // BaseFontName
    0x0c17, // BaseFontBlend
    0x0c1f, // CIDFontVersion
    0x0c20, // CIDFontRevision
    0x0c21, // CIDFontType
    0x0c22, // CIDCount
    13,     // UniqueID
    14,     // XUID
    // Private DICT operators:
    20, // defaultWidthX
    21, // nominalWidthX
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_operands_are_always_five_bytes() {
        let dict = DictBuilder::new().set_int(17, 0).build();
        assert_eq!(dict.len(), 6); // 5-byte integer + 1-byte operator
        let dict = DictBuilder::new().set_int(17, 1_000_000).build();
        assert_eq!(dict.len(), 6);
    }

    #[test]
    fn two_byte_operator_roundtrips() {
        let dict = DictBuilder::new().set_pair(18, 100, 200).build();
        let parsed = font_read::tables::cff::Dict::parse(&dict).unwrap();
        assert_eq!(parsed.get_pair(18), Some((100, 200)));
    }
}
