//! CFF Type-2 charstring interpretation into path segments.
//!
//! Type-2 charstrings are a small stack-based bytecode: operators push or
//! consume numbers from an operand stack, with `rlineto`/`rrcurveto`-family
//! operators emitting path segments and `callsubr`/`callgsubr` transferring
//! control into (biased) local/global subroutines. This only implements the
//! drawing and control-flow operators; hinting operators (`hstem`, `vstem`,
//! `hintmask`, …) are recognized just enough to consume their operands and
//! are otherwise no-ops: hints are preserved in the byte stream a renderer
//! sees but never executed here.

use font_read::tables::cff::{Cff, Index};
use font_read::FontRef;
use font_types::GlyphId;

use crate::error::{Result, ScaleError};

use super::{OutlineGlyph, PathSegment};

/// Matches the bias formula in the Type-2 charstring spec (section 4.7):
/// subroutine call sites add this to encode shorter indices for small
/// subroutine sets.
fn bias(count: usize) -> i32 {
    if count < 1240 {
        107
    } else if count < 33900 {
        1131
    } else {
        32768
    }
}

/// Bounded recursion depth for subroutine calls, mirroring `font-scale`'s
/// composite-glyph depth bound.
const MAX_SUBR_DEPTH: u32 = 64;

struct Interpreter<'a> {
    global_subrs: Index<'a>,
    local_subrs: Index<'a>,
    global_bias: i32,
    local_bias: i32,
    stack: Vec<f64>,
    x: f64,
    y: f64,
    segments: Vec<PathSegment>,
    open: bool,
    n_stems: u32,
    width_parsed: bool,
    gid: GlyphId,
}

impl<'a> Interpreter<'a> {
    fn new(global_subrs: Index<'a>, local_subrs: Index<'a>, gid: GlyphId) -> Self {
        Interpreter {
            global_bias: bias(global_subrs.count() as usize),
            local_bias: bias(local_subrs.count() as usize),
            global_subrs,
            local_subrs,
            stack: Vec::new(),
            x: 0.0,
            y: 0.0,
            segments: Vec::new(),
            open: false,
            n_stems: 0,
            width_parsed: false,
            gid,
        }
    }

    fn move_to(&mut self, dx: f64, dy: f64) {
        if self.open {
            self.segments.push(PathSegment::Close);
        }
        self.x += dx;
        self.y += dy;
        self.segments.push(PathSegment::MoveTo { x: self.x, y: self.y });
        self.open = true;
    }

    fn line_to(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        self.segments.push(PathSegment::LineTo { x: self.x, y: self.y });
    }

    fn curve_to(&mut self, dx1: f64, dy1: f64, dx2: f64, dy2: f64, dx3: f64, dy3: f64) {
        let c1x = self.x + dx1;
        let c1y = self.y + dy1;
        let c2x = c1x + dx2;
        let c2y = c1y + dy2;
        self.x = c2x + dx3;
        self.y = c2y + dy3;
        self.segments.push(PathSegment::CurveTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x: self.x,
            y: self.y,
        });
    }

    /// The first operand of `hstem`/`vstem`/a `moveto` carries the glyph's
    /// width (offset from the font's nominal width) when there's an extra,
    /// odd-one-out operand. Consumed once, at the first stack-clearing
    /// operator, then discarded (advance widths come from `hmtx`).
    fn take_width_if_present(&mut self, expected_args: usize) {
        if self.width_parsed {
            return;
        }
        self.width_parsed = true;
        if self.stack.len() > expected_args {
            self.stack.remove(0);
        }
    }

    fn count_stems(&mut self) {
        self.take_width_if_present(if self.stack.len() % 2 == 0 { 0 } else { 1 });
        self.n_stems += (self.stack.len() / 2) as u32;
        self.stack.clear();
    }

    fn run(&mut self, charstring: &[u8], depth: u32) -> Result<()> {
        if depth > MAX_SUBR_DEPTH {
            return Err(ScaleError::RecursionTooDeep(MAX_SUBR_DEPTH));
        }
        let mut i = 0usize;
        while i < charstring.len() {
            let b0 = charstring[i];
            i += 1;
            match b0 {
                1 | 3 | 18 | 23 => {
                    // hstem, vstem, hstemhm, vstemhm
                    self.count_stems();
                }
                19 | 20 => {
                    // hintmask, cntrmask: consume any implicit vstem args, then skip the mask bytes.
                    self.count_stems();
                    let mask_bytes = (self.n_stems as usize).div_ceil(8).max(1);
                    i += mask_bytes;
                }
                21 => {
                    // rmoveto
                    self.take_width_if_present(2);
                    let dy = self.stack.pop().unwrap_or(0.0);
                    let dx = self.stack.pop().unwrap_or(0.0);
                    self.move_to(dx, dy);
                    self.stack.clear();
                }
                22 => {
                    // hmoveto
                    self.take_width_if_present(1);
                    let dx = self.stack.pop().unwrap_or(0.0);
                    self.move_to(dx, 0.0);
                    self.stack.clear();
                }
                4 => {
                    // vmoveto
                    self.take_width_if_present(1);
                    let dy = self.stack.pop().unwrap_or(0.0);
                    self.move_to(0.0, dy);
                    self.stack.clear();
                }
                5 => {
                    // rlineto: pairs of (dx, dy) until the stack is empty.
                    let args = std::mem::take(&mut self.stack);
                    for pair in args.chunks_exact(2) {
                        self.line_to(pair[0], pair[1]);
                    }
                }
                6 => {
                    // hlineto: alternating horizontal/vertical lines.
                    let args = std::mem::take(&mut self.stack);
                    for (idx, &v) in args.iter().enumerate() {
                        if idx % 2 == 0 {
                            self.line_to(v, 0.0);
                        } else {
                            self.line_to(0.0, v);
                        }
                    }
                }
                7 => {
                    // vlineto: alternating vertical/horizontal lines.
                    let args = std::mem::take(&mut self.stack);
                    for (idx, &v) in args.iter().enumerate() {
                        if idx % 2 == 0 {
                            self.line_to(0.0, v);
                        } else {
                            self.line_to(v, 0.0);
                        }
                    }
                }
                8 => {
                    // rrcurveto: groups of 6 args.
                    let args = std::mem::take(&mut self.stack);
                    for six in args.chunks_exact(6) {
                        self.curve_to(six[0], six[1], six[2], six[3], six[4], six[5]);
                    }
                }
                24 => {
                    // rcurveline: rrcurveto* then one rlineto.
                    let args = std::mem::take(&mut self.stack);
                    let curve_len = (args.len() - 2) / 6 * 6;
                    for six in args[..curve_len].chunks_exact(6) {
                        self.curve_to(six[0], six[1], six[2], six[3], six[4], six[5]);
                    }
                    let tail = &args[curve_len..];
                    if tail.len() == 2 {
                        self.line_to(tail[0], tail[1]);
                    }
                }
                25 => {
                    // rlinecurve: rlineto* then one rrcurveto.
                    let args = std::mem::take(&mut self.stack);
                    let line_len = args.len().saturating_sub(6) / 2 * 2;
                    for pair in args[..line_len].chunks_exact(2) {
                        self.line_to(pair[0], pair[1]);
                    }
                    let tail = &args[line_len..];
                    if tail.len() == 6 {
                        self.curve_to(tail[0], tail[1], tail[2], tail[3], tail[4], tail[5]);
                    }
                }
                26 => {
                    // vvcurveto: optional leading dx1, then groups of 4 (dya,dxb,dyb,dyc).
                    let mut args = std::mem::take(&mut self.stack);
                    let mut dx1 = 0.0;
                    if args.len() % 4 == 1 {
                        dx1 = args.remove(0);
                    }
                    for (idx, four) in args.chunks_exact(4).enumerate() {
                        let dx_first = if idx == 0 { dx1 } else { 0.0 };
                        self.curve_to(dx_first, four[0], four[1], four[2], 0.0, four[3]);
                    }
                }
                27 => {
                    // hhcurveto: optional leading dy1, then groups of 4 (dxa,dxb,dyb,dxc).
                    let mut args = std::mem::take(&mut self.stack);
                    let mut dy1 = 0.0;
                    if args.len() % 4 == 1 {
                        dy1 = args.remove(0);
                    }
                    for (idx, four) in args.chunks_exact(4).enumerate() {
                        let dy_first = if idx == 0 { dy1 } else { 0.0 };
                        self.curve_to(four[0], dy_first, four[1], four[2], four[3], 0.0);
                    }
                }
                30 | 31 => {
                    // vhcurveto (30) / hvcurveto (31): alternating curve orientation.
                    let args = std::mem::take(&mut self.stack);
                    let mut starts_horizontal = b0 == 31;
                    let mut idx = 0;
                    while idx + 4 <= args.len() {
                        let remaining_after = args.len() - idx - 4;
                        let last_extra = remaining_after == 1;
                        let four = &args[idx..idx + 4];
                        if starts_horizontal {
                            let dx3 = if last_extra { args[idx + 4] } else { 0.0 };
                            self.curve_to(four[0], 0.0, four[1], four[2], dx3, four[3]);
                        } else {
                            let dy3 = if last_extra { args[idx + 4] } else { 0.0 };
                            self.curve_to(0.0, four[0], four[1], four[2], four[3], dy3);
                        }
                        starts_horizontal = !starts_horizontal;
                        idx += 4;
                    }
                }
                10 => {
                    // callsubr
                    let Some(raw_index) = self.stack.pop() else { continue };
                    let idx = raw_index as i32 + self.local_bias;
                    if idx >= 0 {
                        if let Ok(sub) = self.local_subrs.get(idx as u16) {
                            self.run(sub, depth + 1)?;
                        }
                    }
                }
                29 => {
                    // callgsubr
                    let Some(raw_index) = self.stack.pop() else { continue };
                    let idx = raw_index as i32 + self.global_bias;
                    if idx >= 0 {
                        if let Ok(sub) = self.global_subrs.get(idx as u16) {
                            self.run(sub, depth + 1)?;
                        }
                    }
                }
                11 => return Ok(()), // return
                14 => {
                    // endchar: optionally preceded by seac-style 4 args (adx ady bchar achar), unsupported here.
                    self.take_width_if_present(0);
                    if self.open {
                        self.segments.push(PathSegment::Close);
                        self.open = false;
                    }
                    self.stack.clear();
                    return Ok(());
                }
                28 => {
                    let b1 = *charstring.get(i).ok_or(ScaleError::MalformedCharstring(self.gid))?;
                    let b2 = *charstring.get(i + 1).ok_or(ScaleError::MalformedCharstring(self.gid))?;
                    self.stack.push(i16::from_be_bytes([b1, b2]) as f64);
                    i += 2;
                }
                32..=246 => self.stack.push(b0 as f64 - 139.0),
                247..=250 => {
                    let b1 = *charstring.get(i).ok_or(ScaleError::MalformedCharstring(self.gid))?;
                    self.stack.push((b0 as f64 - 247.0) * 256.0 + b1 as f64 + 108.0);
                    i += 1;
                }
                251..=254 => {
                    let b1 = *charstring.get(i).ok_or(ScaleError::MalformedCharstring(self.gid))?;
                    self.stack.push(-(b0 as f64 - 251.0) * 256.0 - b1 as f64 - 108.0);
                    i += 1;
                }
                255 => {
                    let bytes = charstring.get(i..i + 4).ok_or(ScaleError::MalformedCharstring(self.gid))?;
                    let v = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                    self.stack.push(v as f64 / 65536.0);
                    i += 4;
                }
                12 => {
                    // Two-byte escape operators (flex variants, arithmetic):
                    // none affect the drawing model we expose, so just clear
                    // operands and move on.
                    i += 1;
                    self.stack.clear();
                }
                _ => {
                    self.stack.clear();
                }
            }
        }
        Ok(())
    }
}

fn local_subrs_for_glyph<'a>(cff: &Cff<'a>, gid: GlyphId) -> Result<Index<'a>> {
    if let Some(fd_select) = cff.fd_select()? {
        let fd_array = cff
            .fd_array()?
            .ok_or_else(|| ScaleError::Read(font_read::error::ReadError::malformed(
                font_read::tables::cff::TAG,
                "FDSelect present without FDArray",
            )))?;
        let fd_index = fd_select.fd_for_glyph(gid.to_u16())?;
        let fd_dict_bytes = fd_array.get(fd_index as u16)?;
        return Ok(cff
            .private_for_fd(fd_dict_bytes)?
            .map(|(_, subrs)| subrs)
            .unwrap_or_else(|| empty_index()));
    }
    Ok(cff
        .private_dict_and_local_subrs()?
        .map(|(_, subrs)| subrs)
        .unwrap_or_else(|| empty_index()))
}

fn empty_index<'a>() -> Index<'a> {
    Index::read(font_read::font_data::FontData::new(&[0, 0])).expect("empty INDEX is always valid")
}

/// Interpret `gid`'s Type-2 charstring into an [`OutlineGlyph`]. `CFF2`
/// (variable CFF) isn't handled here; only `CFF ` is, which covers every
/// static-instance OTF/CFF font.
pub fn outline(font: &FontRef<'_>, gid: GlyphId) -> Result<OutlineGlyph> {
    let cff = font.cff().map_err(ScaleError::Read)?;
    let char_strings = cff.char_strings().map_err(ScaleError::Read)?;
    let charstring = char_strings
        .get(gid.to_u16())
        .map_err(ScaleError::Read)?;
    let local_subrs = local_subrs_for_glyph(&cff, gid)?;

    let mut interp = Interpreter::new(cff.global_subr_index, local_subrs, gid);
    interp.run(charstring, 0)?;
    if interp.open {
        interp.segments.push(PathSegment::Close);
    }
    Ok(OutlineGlyph::new(interp.segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_charstring(bytes: &[u8]) -> Vec<PathSegment> {
        let empty = empty_index();
        let mut interp = Interpreter::new(empty, empty_index(), GlyphId::new(0));
        interp.run(bytes, 0).unwrap();
        if interp.open {
            interp.segments.push(PathSegment::Close);
        }
        interp.segments
    }

    #[test]
    fn rmoveto_then_endchar_draws_nothing_but_moves() {
        // 10 20 rmoveto (21), endchar (14)
        let bytes = [139 + 10, 139 + 20, 21, 14];
        let segs = run_charstring(&bytes);
        assert_eq!(segs[0], PathSegment::MoveTo { x: 10.0, y: 20.0 });
    }

    #[test]
    fn rlineto_accumulates_absolute_position() {
        // 0 0 rmoveto, 10 0 5 5 rlineto, endchar
        let bytes = [139, 139, 21, 139 + 10, 139, 139 + 5, 139 + 5, 5, 14];
        let segs = run_charstring(&bytes);
        assert_eq!(segs[1], PathSegment::LineTo { x: 10.0, y: 0.0 });
        assert_eq!(segs[2], PathSegment::LineTo { x: 15.0, y: 5.0 });
    }

    #[test]
    fn rrcurveto_emits_cubic_segment() {
        // 0 0 rmoveto, 1 2 3 4 5 6 rrcurveto, endchar
        let bytes = [
            139, 139, 21, 139 + 1, 139 + 2, 139 + 3, 139 + 4, 139 + 5, 139 + 6, 8, 14,
        ];
        let segs = run_charstring(&bytes);
        match segs[1] {
            PathSegment::CurveTo { c1x, c1y, c2x, c2y, x, y } => {
                assert_eq!((c1x, c1y), (1.0, 2.0));
                assert_eq!((c2x, c2y), (4.0, 6.0));
                assert_eq!((x, y), (9.0, 12.0));
            }
            other => panic!("expected CurveTo, got {other:?}"),
        }
    }

    #[test]
    fn bias_matches_spec_thresholds() {
        assert_eq!(bias(0), 107);
        assert_eq!(bias(1239), 107);
        assert_eq!(bias(1240), 1131);
        assert_eq!(bias(33899), 1131);
        assert_eq!(bias(33900), 32768);
    }
}
