//! Walking retained glyphs' charstrings to find which Local/Global Subrs
//! they (transitively) call.

use std::collections::BTreeSet;

use font_read::tables::cff::Index;

use super::charstring::{bias, decode_number};
use crate::error::{Result, SubsetError};

const MAX_SUBR_DEPTH: u32 = 64;

#[derive(Default)]
pub struct SubrClosure {
    pub used_global: BTreeSet<u16>,
    pub used_local: BTreeSet<u16>,
}

/// Adds every Local/Global Subr index `charstring` reaches (directly or
/// through nested subroutine calls) to `closure`.
pub fn collect(
    charstring: &[u8],
    global_subrs: &Index<'_>,
    local_subrs: &Index<'_>,
    closure: &mut SubrClosure,
) -> Result<()> {
    walk(charstring, global_subrs, local_subrs, 0, &mut Vec::new(), closure)
}

#[allow(clippy::too_many_arguments)]
fn walk(
    data: &[u8],
    global_subrs: &Index<'_>,
    local_subrs: &Index<'_>,
    depth: u32,
    operands: &mut Vec<i32>,
    closure: &mut SubrClosure,
) -> Result<()> {
    if depth > MAX_SUBR_DEPTH {
        return Err(SubsetError::SubroutineCycle(0));
    }

    let global_bias = bias(global_subrs.count() as usize);
    let local_bias = bias(local_subrs.count() as usize);

    let mut i = 0usize;
    while i < data.len() {
        if let Some((value, len)) = decode_number(data, i) {
            operands.push(value);
            i += len;
            continue;
        }

        let op = data[i];
        match op {
            1 | 3 | 18 | 23 => {
                operands.clear();
                i += 1;
            }
            19 | 20 => {
                let mask_bytes = (operands.len() / 2).div_ceil(8).max(1);
                operands.clear();
                i += 1 + mask_bytes;
            }
            10 => {
                let idx = operands
                    .pop()
                    .ok_or_else(|| SubsetError::TableError(font_types::Tag::new(b"CFF "), "callsubr with empty stack".into()))?;
                let raw_index = (idx + local_bias).max(0) as u16;
                if raw_index < local_subrs.count() && closure.used_local.insert(raw_index) {
                    let subr = local_subrs.get(raw_index)?;
                    walk(subr, global_subrs, local_subrs, depth + 1, &mut Vec::new(), closure)?;
                }
                i += 1;
            }
            29 => {
                let idx = operands
                    .pop()
                    .ok_or_else(|| SubsetError::TableError(font_types::Tag::new(b"CFF "), "callgsubr with empty stack".into()))?;
                let raw_index = (idx + global_bias).max(0) as u16;
                if raw_index < global_subrs.count() && closure.used_global.insert(raw_index) {
                    let subr = global_subrs.get(raw_index)?;
                    walk(subr, global_subrs, local_subrs, depth + 1, &mut Vec::new(), closure)?;
                }
                i += 1;
            }
            11 | 14 => return Ok(()),
            12 => {
                operands.clear();
                i += 2;
            }
            _ => {
                operands.clear();
                i += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_read::font_data::FontData;

    fn index_of(objects: &[&[u8]]) -> Index<'static> {
        let mut bytes = vec![];
        bytes.extend_from_slice(&(objects.len() as u16).to_be_bytes());
        bytes.push(1); // off_size
        let mut offset = 1u8;
        bytes.push(offset);
        for obj in objects {
            offset += obj.len() as u8;
            bytes.push(offset);
        }
        for obj in objects {
            bytes.extend_from_slice(obj);
        }
        Index::read(FontData::new(Box::leak(bytes.into_boxed_slice()))).unwrap()
    }

    #[test]
    fn direct_callsubr_is_collected() {
        let globals = index_of(&[]);
        let locals = index_of(&[&[11]]); // subr 0: just `return`
        // bias(1) = 107, so subr 0 is called with operand -107
        let charstring = encode_call(-107, 10);
        let mut closure = SubrClosure::default();
        collect(&charstring, &globals, &locals, &mut closure).unwrap();
        assert!(closure.used_local.contains(&0));
    }

    fn encode_call(biased_index: i32, op: u8) -> Vec<u8> {
        let mut out = super::super::charstring::encode_number(biased_index);
        out.push(op);
        out
    }
}
