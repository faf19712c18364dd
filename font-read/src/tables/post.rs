//! The `post` table: https://learn.microsoft.com/en-us/typography/opentype/spec/post

use font_types::{GlyphId, Tag};

use crate::error::Result;
use crate::font_data::FontData;
use crate::read::FontRead;

pub const TAG: Tag = Tag::new(b"post");

/// The 258 names every version-2.0 `post` table may reference by index
/// before falling back to its own string table.
pub const MAC_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis",
    "ntilde", "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave",
    "ucircumflex", "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet",
    "paragraph", "germandbls", "registered", "copyright", "trademark", "acute", "dieresis",
    "notequal", "AE", "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu",
    "partialdiff", "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine",
    "Omega", "ae", "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin",
    "approxequal", "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace",
    "Agrave", "Atilde", "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright",
    "quoteleft", "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction",
    "currency", "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered",
    "quotesinglbase", "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute",
    "Edieresis", "Egrave", "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex",
    "apple", "Ograve", "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde",
    "macron", "breve", "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron",
    "Lslash", "lslash", "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth",
    "Yacute", "yacute", "Thorn", "thorn", "minus", "multiply", "onesuperior", "twosuperior",
    "threesuperior", "onehalf", "onequarter", "threequarters", "franc", "Gbreve", "gbreve",
    "Idotaccent", "Scedilla", "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];

#[derive(Clone, Copy)]
pub struct Post<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Post<'a> {
    fn read(data: FontData<'a>) -> Result<Self> {
        let _: i16 = data.read_at(30)?;
        Ok(Post { data })
    }
}

impl<'a> Post<'a> {
    pub fn version(&self) -> f64 {
        self.data
            .read_at::<font_types::Fixed>(0)
            .map(font_types::Fixed::to_f64)
            .unwrap_or(3.0)
    }
    pub fn italic_angle(&self) -> f64 {
        self.data
            .read_at::<font_types::Fixed>(4)
            .map(font_types::Fixed::to_f64)
            .unwrap_or(0.0)
    }
    pub fn underline_position(&self) -> i16 {
        self.data.read_at(8).unwrap_or(0)
    }
    pub fn underline_thickness(&self) -> i16 {
        self.data.read_at(10).unwrap_or(0)
    }
    pub fn is_fixed_pitch(&self) -> bool {
        self.data.read_at::<u32>(12).unwrap_or(0) != 0
    }

    fn v2_glyph_name_indices(&self) -> Option<Vec<u16>> {
        if self.version() != 2.0 {
            return None;
        }
        let num_glyphs: u16 = self.data.read_at(32).ok()?;
        Some(
            (0..num_glyphs as usize)
                .filter_map(|i| self.data.read_at(34 + i * 2).ok())
                .collect(),
        )
    }

    fn v2_pascal_strings(&self, after: usize) -> Vec<String> {
        let Some(mut cursor) = self.data.split_off(after).map(|d| d.cursor()) else {
            return Vec::new();
        };
        let mut names = Vec::new();
        while !cursor.is_empty() {
            let Ok(len): Result<u8> = cursor.read() else {
                break;
            };
            let Ok(bytes) = cursor.slice(len as usize) else {
                break;
            };
            names.push(String::from_utf8_lossy(bytes.as_bytes()).into_owned());
        }
        names
    }

    /// The PostScript name for `gid`, if this table carries names (version
    /// 2.0) and the index is in range.
    pub fn glyph_name(&self, gid: GlyphId) -> Option<String> {
        let indices = self.v2_glyph_name_indices()?;
        let num_glyphs = indices.len();
        let index = *indices.get(gid.to_u32() as usize)?;
        if (index as usize) < 258 {
            return Some(MAC_GLYPH_NAMES[index as usize].to_string());
        }
        let pascal_start = 34 + num_glyphs * 2;
        let custom_names = self.v2_pascal_strings(pascal_start);
        custom_names.get(index as usize - 258).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_uses_mac_glyph_order() {
        let mut b = vec![0u8; 32];
        b[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        let post = Post::read(FontData::new(&b)).unwrap();
        assert_eq!(post.version(), 1.0);
    }

    #[test]
    fn v2_resolves_custom_names() {
        let mut b = vec![0u8; 32];
        b[0..4].copy_from_slice(&0x0002_0000u32.to_be_bytes());
        b.extend_from_slice(&1u16.to_be_bytes()); // numberOfGlyphs
        b.extend_from_slice(&258u16.to_be_bytes()); // index 258 -> first custom name
        b.push(5);
        b.extend_from_slice(b"hello");
        let post = Post::read(FontData::new(&b)).unwrap();
        assert_eq!(post.glyph_name(GlyphId::new(0)), Some("hello".to_string()));
    }
}
