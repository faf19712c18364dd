//! Renumbering a subroutine INDEX down to its used entries, and rewriting
//! charstring bytes to call through the new numbering (or, in
//! `desubroutinize` mode, inlining every call instead).

use std::collections::{BTreeMap, BTreeSet};

use font_read::tables::cff::Index;
use font_types::Tag;

use super::charstring::{bias, decode_number, encode_number};
use crate::error::{Result, SubsetError};

const MAX_SUBR_DEPTH: u32 = 64;

/// `new_to_old[i]` is the raw (unbiased) index into `original` that new
/// subroutine `i` was copied from; `old_to_new` is its inverse.
pub fn renumber(used: &BTreeSet<u16>) -> (Vec<u16>, BTreeMap<u16, u16>) {
    let new_to_old: Vec<u16> = used.iter().copied().collect();
    let old_to_new = new_to_old.iter().enumerate().map(|(new, &old)| (old, new as u16)).collect();
    (new_to_old, old_to_new)
}

pub fn subr_bytes(original: &Index<'_>, new_to_old: &[u16]) -> Result<Vec<Vec<u8>>> {
    new_to_old.iter().map(|&old| original.get(old).map(<[u8]>::to_vec).map_err(Into::into)).collect()
}

/// Rewrites `data`'s `callsubr`/`callgsubr` operands from the old
/// subroutine numbering to the new one. Everything else is copied through
/// unchanged.
#[allow(clippy::too_many_arguments)]
pub fn remap(
    data: &[u8],
    old_global_count: usize,
    old_local_count: usize,
    new_global_count: usize,
    new_local_count: usize,
    global_map: &BTreeMap<u16, u16>,
    local_map: &BTreeMap<u16, u16>,
) -> Result<Vec<u8>> {
    let old_global_bias = bias(old_global_count);
    let old_local_bias = bias(old_local_count);
    let new_global_bias = bias(new_global_count);
    let new_local_bias = bias(new_local_count);

    let mut out = Vec::with_capacity(data.len());
    let mut operand_count = 0usize;
    let mut n_stems = 0usize;
    let mut i = 0usize;

    while i < data.len() {
        if let Some((value, len)) = decode_number(data, i) {
            let next_op = data.get(i + len).copied();
            if matches!(next_op, Some(10) | Some(29)) {
                let is_local = next_op == Some(10);
                let (old_bias, old_count, map, new_bias) = if is_local {
                    (old_local_bias, old_local_count, local_map, new_local_bias)
                } else {
                    (old_global_bias, old_global_count, global_map, new_global_bias)
                };
                let raw = (value + old_bias).max(0) as u16;
                let new_raw = if (raw as usize) < old_count {
                    *map.get(&raw).unwrap_or(&raw)
                } else {
                    raw
                };
                out.extend(encode_number(new_raw as i32 - new_bias));
            } else {
                out.extend_from_slice(&data[i..i + len]);
            }
            operand_count += 1;
            i += len;
            continue;
        }

        let op = data[i];
        match op {
            1 | 3 | 18 | 23 => {
                n_stems += operand_count / 2;
                operand_count = 0;
                out.push(op);
                i += 1;
            }
            19 | 20 => {
                n_stems += operand_count / 2;
                operand_count = 0;
                out.push(op);
                let mask_bytes = n_stems.div_ceil(8).max(1);
                let bytes = data.get(i + 1..i + 1 + mask_bytes).ok_or(font_read::error::ReadError::OutOfBounds)?;
                out.extend_from_slice(bytes);
                i += 1 + mask_bytes;
            }
            12 => {
                out.push(op);
                out.push(*data.get(i + 1).ok_or(font_read::error::ReadError::OutOfBounds)?);
                operand_count = 0;
                i += 2;
            }
            _ => {
                out.push(op);
                operand_count = 0;
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Fully expands every `callsubr`/`callgsubr` in `data`, recursively, into
/// the plain drawing-operator stream that results. Used when
/// [`crate::flags::SubsetFlags::desubroutinize`] is set.
pub fn inline(data: &[u8], global_subrs: &Index<'_>, local_subrs: &Index<'_>, depth: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut stack = Vec::new();
    let mut n_stems = 0usize;
    inline_into(data, global_subrs, local_subrs, depth, &mut stack, &mut n_stems, &mut out)?;
    Ok(out)
}

fn flush(stack: &mut Vec<i32>, out: &mut Vec<u8>) {
    for v in stack.drain(..) {
        out.extend(encode_number(v));
    }
}

/// Returns `true` once `endchar` has been emitted, so callers at every
/// recursion depth stop walking their remaining bytes too.
fn inline_into(
    data: &[u8],
    global_subrs: &Index<'_>,
    local_subrs: &Index<'_>,
    depth: u32,
    stack: &mut Vec<i32>,
    n_stems: &mut usize,
    out: &mut Vec<u8>,
) -> Result<bool> {
    if depth > MAX_SUBR_DEPTH {
        return Err(SubsetError::SubroutineCycle(depth as i32));
    }
    let global_bias = bias(global_subrs.count() as usize);
    let local_bias = bias(local_subrs.count() as usize);

    let mut i = 0usize;
    while i < data.len() {
        if let Some((value, len)) = decode_number(data, i) {
            stack.push(value);
            i += len;
            continue;
        }

        let op = data[i];
        match op {
            10 | 29 => {
                let idx = stack.pop().ok_or_else(|| malformed("subroutine call with empty stack"))?;
                let (subrs, call_bias) = if op == 10 { (local_subrs, local_bias) } else { (global_subrs, global_bias) };
                let raw = (idx + call_bias).max(0) as u16;
                let subr = subrs.get(raw)?;
                if inline_into(subr, global_subrs, local_subrs, depth + 1, stack, n_stems, out)? {
                    return Ok(true);
                }
                i += 1;
            }
            11 => return Ok(false),
            14 => {
                flush(stack, out);
                out.push(op);
                return Ok(true);
            }
            1 | 3 | 18 | 23 => {
                *n_stems += stack.len() / 2;
                flush(stack, out);
                out.push(op);
                i += 1;
            }
            19 | 20 => {
                *n_stems += stack.len() / 2;
                flush(stack, out);
                out.push(op);
                let mask_bytes = (*n_stems).div_ceil(8).max(1);
                let bytes = data.get(i + 1..i + 1 + mask_bytes).ok_or(font_read::error::ReadError::OutOfBounds)?;
                out.extend_from_slice(bytes);
                i += 1 + mask_bytes;
            }
            12 => {
                flush(stack, out);
                out.push(op);
                out.push(*data.get(i + 1).ok_or(font_read::error::ReadError::OutOfBounds)?);
                i += 2;
            }
            _ => {
                flush(stack, out);
                out.push(op);
                i += 1;
            }
        }
    }
    Ok(false)
}

fn malformed(reason: &str) -> SubsetError {
    SubsetError::TableError(Tag::new(b"CFF "), reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_read::font_data::FontData;

    fn empty_index() -> Index<'static> {
        Index::read(FontData::new(&[0, 0])).unwrap()
    }

    #[test]
    fn renumber_assigns_sequential_new_ids() {
        let used = BTreeSet::from([5u16, 1, 9]);
        let (new_to_old, old_to_new) = renumber(&used);
        assert_eq!(new_to_old, vec![1, 5, 9]);
        assert_eq!(old_to_new[&5], 1);
    }

    #[test]
    fn inline_expands_a_trivial_subr_call() {
        // subr 0: "100 hmoveto return" (op 22=hmoveto)
        let mut subr_bytes = encode_number(100);
        subr_bytes.push(22);
        subr_bytes.push(11);
        let mut index_bytes = vec![0u8, 1, 1, 1, 1 + subr_bytes.len() as u8];
        index_bytes.extend_from_slice(&subr_bytes);
        let locals = Index::read(FontData::new(Box::leak(index_bytes.into_boxed_slice()))).unwrap();
        let globals = empty_index();

        // bias(1) = 107, so operand is -107, then callsubr(10), then endchar(14)
        let mut charstring = encode_number(-107);
        charstring.push(10);
        charstring.push(14);

        let result = inline(&charstring, &globals, &locals, 0).unwrap();
        // expect: 100 hmoveto endchar
        let mut expected = encode_number(100);
        expected.push(22);
        expected.push(14);
        assert_eq!(result, expected);
    }
}
