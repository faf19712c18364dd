//! Subsetting the `CFF ` table: glyph renumbering, Charset rewriting, and
//! subroutine closure + renumbering (or, with
//! [`crate::flags::SubsetFlags::desubroutinize`], full inlining).
//!
//! CFF2 (variable CFF, used by variable-font CFF outlines) is out of scope
//! here, matching `font-scale`'s outline interpreter: only the static
//! `CFF ` table is subset.

mod charstring;
mod closure;
mod dict;
mod rewrite;

use std::collections::BTreeMap;

use font_read::tables::cff::{Cff, Dict, Index, OP_CHARSET, OP_CHARSTRINGS, OP_FDARRAY, OP_FDSELECT, OP_PRIVATE, OP_ROS};
use font_read::FontRef;
use font_types::Tag;

use crate::error::{Result, SubsetError};
use crate::flags::SubsetFlags;
use crate::plan::SubsetPlan;

use closure::SubrClosure;
use dict::DictBuilder;

const TAG: Tag = Tag::new(b"CFF ");
const PRIVATE_SUBRS_OP: u16 = 19;

pub fn subset_cff(font: &FontRef<'_>, plan: &SubsetPlan, flags: SubsetFlags) -> Result<Vec<u8>> {
    let cff = font.cff()?;
    if cff.is_cid_keyed() {
        subset_cid_keyed(&cff, plan, flags)
    } else {
        subset_simple(&cff, plan, flags)
    }
}

/// One Private DICT's worth of retained-subroutine state: the new Local
/// Subr bytes and the old-to-new index map used to rewrite calls into it.
struct LocalSubrSet {
    bytes: Vec<Vec<u8>>,
    old_to_new: BTreeMap<u16, u16>,
    old_count: usize,
}

fn build_local_subr_set(original: &Index<'_>, closure: &SubrClosure) -> Result<LocalSubrSet> {
    let (new_to_old, old_to_new) = rewrite::renumber(&closure.used_local);
    let bytes = rewrite::subr_bytes(original, &new_to_old)?;
    Ok(LocalSubrSet { bytes, old_to_new, old_count: original.count() as usize })
}

fn subset_simple(cff: &Cff<'_>, plan: &SubsetPlan, flags: SubsetFlags) -> Result<Vec<u8>> {
    let char_strings = cff.char_strings()?;
    let empty_private = Dict::default();
    let (private_dict, local_subrs) = match cff.private_dict_and_local_subrs()? {
        Some((dict, subrs)) => (dict, subrs),
        None => (empty_private, empty_index()),
    };
    let global_subrs = cff.global_subr_index;

    let old_charstrings: Vec<&[u8]> = plan
        .new_to_old()
        .iter()
        .map(|&gid| char_strings.get(gid.to_u16()))
        .collect::<std::result::Result<_, _>>()?;

    let mut subr_closure = SubrClosure::default();
    if !flags.desubroutinize {
        for cs in &old_charstrings {
            closure::collect(cs, &global_subrs, &local_subrs, &mut subr_closure)?;
        }
    }

    let (new_global_to_old, global_map) = rewrite::renumber(&subr_closure.used_global);
    let new_global_subrs = rewrite::subr_bytes(&global_subrs, &new_global_to_old)?;
    let locals = build_local_subr_set(&local_subrs, &subr_closure)?;

    let new_charstrings: Vec<Vec<u8>> = old_charstrings
        .iter()
        .map(|cs| {
            if flags.desubroutinize {
                rewrite::inline(cs, &global_subrs, &local_subrs, 0)
            } else {
                rewrite::remap(
                    cs,
                    global_subrs.count() as usize,
                    locals.old_count,
                    new_global_subrs.len(),
                    locals.bytes.len(),
                    &global_map,
                    &locals.old_to_new,
                )
            }
        })
        .collect::<Result<_>>()?;
    let new_local_subrs = if flags.desubroutinize { Vec::new() } else { remap_subrs(&locals, &global_subrs, &new_global_subrs, &global_map)? };

    let charset = new_charset(cff, plan)?;
    let private_bytes = build_private_dict(&private_dict, &new_local_subrs);

    let mut out = Vec::new();
    write_header(&mut out);
    write_name_index(&mut out);

    let skip = [OP_CHARSET, OP_CHARSTRINGS, OP_PRIVATE, OP_ROS, OP_FDARRAY, OP_FDSELECT];
    let top_dict_template = DictBuilder::new()
        .copy_from(&cff.top_dict, &skip)
        .set_int(OP_CHARSET, 0)
        .set_int(OP_CHARSTRINGS, 0)
        .set_pair(OP_PRIVATE, private_bytes.len() as i32, 0)
        .build();

    let header_and_name_len = out.len();
    let top_dict_index_len = index_size(&[top_dict_template.len()]);
    let string_index_len = cff.string_index.size_in_bytes()?;
    let global_subr_index_len = index_size(&new_global_subrs.iter().map(Vec::len).collect::<Vec<_>>());

    let charset_offset = header_and_name_len + top_dict_index_len + string_index_len + global_subr_index_len;
    let charstrings_offset = charset_offset + charset.len();
    let charstrings_index_len = index_size(&new_charstrings.iter().map(Vec::len).collect::<Vec<_>>());
    let private_offset = charstrings_offset + charstrings_index_len;

    let top_dict = DictBuilder::new()
        .copy_from(&cff.top_dict, &skip)
        .set_int(OP_CHARSET, charset_offset as i32)
        .set_int(OP_CHARSTRINGS, charstrings_offset as i32)
        .set_pair(OP_PRIVATE, private_bytes.len() as i32, private_offset as i32)
        .build();
    debug_assert_eq!(top_dict.len(), top_dict_template.len());

    write_index(&mut out, &[&top_dict]);
    write_index_from(&mut out, &cff.string_index)?;
    write_index(&mut out, &new_global_subrs.iter().map(Vec::as_slice).collect::<Vec<_>>());
    out.extend_from_slice(&charset);
    write_index(&mut out, &new_charstrings.iter().map(Vec::as_slice).collect::<Vec<_>>());
    out.extend_from_slice(&private_bytes);

    Ok(out)
}

/// Local subrs can call other local subrs and global subrs, so the
/// retained set's own bytecode needs the same call-site rewrite the
/// charstrings get.
fn remap_subrs(
    locals: &LocalSubrSet,
    global_subrs: &Index<'_>,
    new_global_subrs: &[Vec<u8>],
    global_map: &BTreeMap<u16, u16>,
) -> Result<Vec<Vec<u8>>> {
    locals
        .bytes
        .iter()
        .map(|subr| {
            rewrite::remap(
                subr,
                global_subrs.count() as usize,
                locals.old_count,
                new_global_subrs.len(),
                locals.bytes.len(),
                global_map,
                &locals.old_to_new,
            )
        })
        .collect()
}

fn subset_cid_keyed(cff: &Cff<'_>, plan: &SubsetPlan, flags: SubsetFlags) -> Result<Vec<u8>> {
    let char_strings = cff.char_strings()?;
    let global_subrs = cff.global_subr_index;
    let fd_select = cff.fd_select()?.ok_or_else(|| SubsetError::TableError(TAG, "CID-keyed font missing FDSelect".into()))?;
    let fd_array = cff.fd_array()?.ok_or_else(|| SubsetError::TableError(TAG, "CID-keyed font missing FDArray".into()))?;

    let old_fds: Vec<u8> = plan
        .new_to_old()
        .iter()
        .map(|&gid| fd_select.fd_for_glyph(gid.to_u16()))
        .collect::<std::result::Result<_, _>>()?;
    let old_charstrings: Vec<&[u8]> = plan
        .new_to_old()
        .iter()
        .map(|&gid| char_strings.get(gid.to_u16()))
        .collect::<std::result::Result<_, _>>()?;

    // Per-FD (old index) local subrs and subroutine closures.
    let mut fd_local_subrs: BTreeMap<u8, Index<'_>> = BTreeMap::new();
    let mut fd_closures: BTreeMap<u8, SubrClosure> = BTreeMap::new();
    for (&fd, cs) in old_fds.iter().zip(old_charstrings.iter()) {
        let locals = fd_local_subrs.entry(fd).or_insert_with(|| private_subrs_for_fd(cff, &fd_array, fd));
        let closure = fd_closures.entry(fd).or_default();
        if !flags.desubroutinize {
            closure::collect(cs, &global_subrs, locals, closure)?;
        }
    }

    let mut used_global = std::collections::BTreeSet::new();
    for closure in fd_closures.values() {
        used_global.extend(closure.used_local.iter().copied().filter(|_| false)); // no-op, kept for clarity of intent below
        used_global.extend(closure.used_global.iter().copied());
    }
    let (new_global_to_old, global_map) = rewrite::renumber(&used_global);
    let new_global_subrs = rewrite::subr_bytes(&global_subrs, &new_global_to_old)?;

    let mut local_sets: BTreeMap<u8, LocalSubrSet> = BTreeMap::new();
    for (&fd, locals) in &fd_local_subrs {
        let closure = fd_closures.entry(fd).or_default();
        local_sets.insert(fd, build_local_subr_set(locals, closure)?);
    }

    let new_charstrings: Vec<Vec<u8>> = old_fds
        .iter()
        .zip(old_charstrings.iter())
        .map(|(&fd, cs)| {
            let locals_idx = &fd_local_subrs[&fd];
            if flags.desubroutinize {
                rewrite::inline(cs, &global_subrs, locals_idx, 0)
            } else {
                let set = &local_sets[&fd];
                rewrite::remap(
                    cs,
                    global_subrs.count() as usize,
                    set.old_count,
                    new_global_subrs.len(),
                    set.bytes.len(),
                    &global_map,
                    &set.old_to_new,
                )
            }
        })
        .collect::<Result<_>>()?;

    let new_local_subrs_by_fd: BTreeMap<u8, Vec<Vec<u8>>> = if flags.desubroutinize {
        BTreeMap::new()
    } else {
        local_sets
            .iter()
            .map(|(&fd, set)| Ok((fd, remap_subrs(set, &global_subrs, &new_global_subrs, &global_map)?)))
            .collect::<Result<_>>()?
    };

    let charset = new_charset(cff, plan)?;

    // Renumber FDs by order of first appearance among retained glyphs and
    // emit a format-0 FDSelect (one byte per glyph).
    let mut old_fd_order: Vec<u8> = Vec::new();
    for &fd in &old_fds {
        if !old_fd_order.contains(&fd) {
            old_fd_order.push(fd);
        }
    }
    let new_fd_of: BTreeMap<u8, u8> = old_fd_order.iter().enumerate().map(|(i, &fd)| (fd, i as u8)).collect();
    let new_fd_select: Vec<u8> = old_fds.iter().map(|fd| new_fd_of[fd]).collect();

    let fd_private_bytes: Vec<Vec<u8>> = old_fd_order
        .iter()
        .map(|&fd| {
            let fd_dict_bytes = fd_array.get(fd as u16).unwrap_or(&[]);
            let private = cff.private_for_fd(fd_dict_bytes).ok().flatten();
            let new_locals = new_local_subrs_by_fd.get(&fd).cloned().unwrap_or_default();
            match private {
                Some((dict, _)) => build_private_dict(&dict, &new_locals),
                None => Vec::new(),
            }
        })
        .collect();

    let mut out = Vec::new();
    write_header(&mut out);
    write_name_index(&mut out);

    let skip = [OP_CHARSET, OP_CHARSTRINGS, OP_PRIVATE, OP_FDARRAY, OP_FDSELECT];
    let top_dict_template = DictBuilder::new()
        .copy_from(&cff.top_dict, &skip)
        .set_int(OP_CHARSET, 0)
        .set_int(OP_CHARSTRINGS, 0)
        .set_int(OP_FDARRAY, 0)
        .set_int(OP_FDSELECT, 0)
        .build();

    let header_and_name_len = out.len();
    let top_dict_index_len = index_size(&[top_dict_template.len()]);
    let string_index_len = cff.string_index.size_in_bytes()?;
    let global_subr_index_len = index_size(&new_global_subrs.iter().map(Vec::len).collect::<Vec<_>>());

    let charset_offset = header_and_name_len + top_dict_index_len + string_index_len + global_subr_index_len;
    let charstrings_offset = charset_offset + charset.len();
    let charstrings_index_len = index_size(&new_charstrings.iter().map(Vec::len).collect::<Vec<_>>());
    let fdselect_offset = charstrings_offset + charstrings_index_len;
    let fdselect_len = 1 + new_fd_select.len();
    let fdarray_offset = fdselect_offset + fdselect_len;

    let placeholder_fd_dicts: Vec<Vec<u8>> = fd_private_bytes
        .iter()
        .map(|p| DictBuilder::new().set_pair(OP_PRIVATE, p.len() as i32, 0).build())
        .collect();
    let fdarray_index_len = index_size(&placeholder_fd_dicts.iter().map(Vec::len).collect::<Vec<_>>());

    let mut private_offset = fdarray_offset + fdarray_index_len;
    let mut fd_dicts_final = Vec::with_capacity(fd_private_bytes.len());
    for private_bytes in &fd_private_bytes {
        let dict = DictBuilder::new().set_pair(OP_PRIVATE, private_bytes.len() as i32, private_offset as i32).build();
        private_offset += private_bytes.len();
        fd_dicts_final.push(dict);
    }

    let top_dict = DictBuilder::new()
        .copy_from(&cff.top_dict, &skip)
        .set_int(OP_CHARSET, charset_offset as i32)
        .set_int(OP_CHARSTRINGS, charstrings_offset as i32)
        .set_int(OP_FDARRAY, fdarray_offset as i32)
        .set_int(OP_FDSELECT, fdselect_offset as i32)
        .build();
    debug_assert_eq!(top_dict.len(), top_dict_template.len());

    write_index(&mut out, &[&top_dict]);
    write_index_from(&mut out, &cff.string_index)?;
    write_index(&mut out, &new_global_subrs.iter().map(Vec::as_slice).collect::<Vec<_>>());
    out.extend_from_slice(&charset);
    write_index(&mut out, &new_charstrings.iter().map(Vec::as_slice).collect::<Vec<_>>());
    out.push(0); // FDSelect format 0
    out.extend_from_slice(&new_fd_select);
    write_index(&mut out, &fd_dicts_final.iter().map(Vec::as_slice).collect::<Vec<_>>());
    for private_bytes in &fd_private_bytes {
        out.extend_from_slice(private_bytes);
    }

    Ok(out)
}

fn private_subrs_for_fd<'a>(cff: &Cff<'a>, fd_array: &Index<'a>, fd: u8) -> Index<'a> {
    fd_array
        .get(fd as u16)
        .ok()
        .and_then(|fd_dict_bytes| cff.private_for_fd(fd_dict_bytes).ok().flatten())
        .map(|(_, subrs)| subrs)
        .unwrap_or_else(empty_index)
}

/// Builds a Private DICT's bytes, followed immediately by its Local Subr
/// INDEX when it has one (`Subrs`'s offset is relative to the dict's own
/// start, so it always equals the dict's length).
fn build_private_dict(original: &Dict, new_local_subrs: &[Vec<u8>]) -> Vec<u8> {
    let without_subrs = DictBuilder::new().copy_from(original, &[PRIVATE_SUBRS_OP]);
    if new_local_subrs.is_empty() {
        return without_subrs.build();
    }
    let dict_len = without_subrs.clone().set_int(PRIVATE_SUBRS_OP, 0).build().len();
    let mut out = without_subrs.set_int(PRIVATE_SUBRS_OP, dict_len as i32).build();
    debug_assert_eq!(out.len(), dict_len);
    out.extend_from_slice(&encode_index(&new_local_subrs.iter().map(Vec::as_slice).collect::<Vec<_>>()));
    out
}

fn new_charset(cff: &Cff<'_>, plan: &SubsetPlan) -> Result<Vec<u8>> {
    let num_old_glyphs = cff.num_glyphs()?;
    let old_charset = cff.charset(num_old_glyphs)?;
    let sids: Vec<u16> = plan
        .new_to_old()
        .iter()
        .skip(1) // glyph 0 (.notdef) is implicit, never stored
        .map(|&gid| old_charset.as_ref().and_then(|c| c.get(gid.to_u16() as usize)).copied().unwrap_or(0))
        .collect();
    let mut out = vec![0u8]; // format 0
    for sid in sids {
        out.extend_from_slice(&sid.to_be_bytes());
    }
    Ok(out)
}

fn empty_index<'a>() -> Index<'a> {
    Index::read(font_read::font_data::FontData::new(&[0, 0])).expect("static empty INDEX bytes are valid")
}

fn write_header(out: &mut Vec<u8>) {
    out.extend_from_slice(&[1, 0, 4, 4]); // major, minor, hdrSize, offSize
}

fn write_name_index(out: &mut Vec<u8>) {
    write_index(out, &[b"subset"]);
}

fn index_size(object_lens: &[usize]) -> usize {
    if object_lens.is_empty() {
        return 2;
    }
    let total: usize = object_lens.iter().sum();
    let off_size = off_size_for(total + 1);
    3 + (object_lens.len() + 1) * off_size + total
}

fn off_size_for(max_offset: usize) -> usize {
    match max_offset {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}

fn encode_index(objects: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    write_index(&mut out, objects);
    out
}

fn write_index(out: &mut Vec<u8>, objects: &[&[u8]]) {
    out.extend_from_slice(&(objects.len() as u16).to_be_bytes());
    if objects.is_empty() {
        return;
    }
    let total: usize = objects.iter().map(|o| o.len()).sum();
    let off_size = off_size_for(total + 1);
    out.push(off_size as u8);
    let write_offset = |out: &mut Vec<u8>, value: usize| {
        let bytes = (value as u32).to_be_bytes();
        out.extend_from_slice(&bytes[4 - off_size..]);
    };
    let mut offset = 1usize;
    write_offset(out, offset);
    for obj in objects {
        offset += obj.len();
        write_offset(out, offset);
    }
    for obj in objects {
        out.extend_from_slice(obj);
    }
}

fn write_index_from(out: &mut Vec<u8>, idx: &Index<'_>) -> Result<()> {
    let objects: Vec<&[u8]> = idx.iter().collect::<std::result::Result<_, _>>()?;
    write_index(out, &objects);
    Ok(())
}
