/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The pieces of BV record decoding shared between the sequential and the
//! random-access iterators: block lists, interval expansion, residuals,
//! and the final merge.
//!
//! A record is, in stream order: out-degree; reference (when the window
//! is enabled); block count and blocks (when the reference is non-zero);
//! intervals (when interval coding is enabled and successors remain);
//! residuals (whatever is still missing). The successors come out of
//! three sorted sources — the ones copied from the referenced list, the
//! interval expansion, and the residuals — merged at the end.

use super::codecs::DynCodesReader;
use crate::error::corrupt;
use crate::utils::nat2int;
use crate::Result;

/// Read the block count and the block lengths, debiasing them: the first
/// block length is stored as is (and may be zero), the following ones are
/// stored decremented.
pub(crate) fn read_block_list(
    reader: &mut DynCodesReader,
    blocks: &mut Vec<u64>,
) -> Result<()> {
    blocks.clear();
    let block_count = reader.read_block_count()?;
    if block_count == 0 {
        return Ok(());
    }
    blocks.reserve(block_count as usize);
    blocks.push(reader.read_block()?);
    for _ in 1..block_count {
        blocks.push(reader.read_block()? + 1);
    }
    Ok(())
}

/// Copy from `reference` the runs selected by `blocks`: runs alternate
/// copied/skipped starting with a copied one, and the run after the last
/// explicit block extends to the end of the list (copied when the block
/// count is even, skipped when odd). An empty block list copies
/// everything.
pub(crate) fn apply_blocks(
    reference: &[u64],
    blocks: &[u64],
    out: &mut Vec<u64>,
) -> Result<()> {
    if blocks.is_empty() {
        out.extend_from_slice(reference);
        return Ok(());
    }
    let mut start = 0usize;
    for (i, &len) in blocks.iter().enumerate() {
        let end = start + len as usize;
        if end > reference.len() {
            return Err(corrupt("copy blocks overrun the referenced list"));
        }
        if i % 2 == 0 {
            out.extend_from_slice(&reference[start..end]);
        }
        start = end;
    }
    if blocks.len() % 2 == 0 {
        out.extend_from_slice(&reference[start..]);
    }
    Ok(())
}

/// Read the interval section of `node`'s record and expand it.
pub(crate) fn read_intervals(
    reader: &mut DynCodesReader,
    node: u64,
    min_interval_length: usize,
    out: &mut Vec<u64>,
) -> Result<()> {
    let interval_count = reader.read_interval_count()?;
    if interval_count == 0 {
        return Ok(());
    }
    let left = node as i64 + nat2int(reader.read_interval_start()?);
    if left < 0 {
        return Err(corrupt("negative interval start"));
    }
    let mut start = left as u64;
    let mut len = reader.read_interval_len()? + min_interval_length as u64;
    out.extend(start..start + len);
    start += len;
    for _ in 1..interval_count {
        start += reader.read_interval_start()? + 1;
        len = reader.read_interval_len()? + min_interval_length as u64;
        out.extend(start..start + len);
        start += len;
    }
    Ok(())
}

/// Read `count` residuals of `node`'s record: the first is coded as a
/// signed offset from `node`, the rest as decremented gaps.
pub(crate) fn read_residuals(
    reader: &mut DynCodesReader,
    node: u64,
    count: u64,
    out: &mut Vec<u64>,
) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    out.reserve(count as usize);
    let first = node as i64 + nat2int(reader.read_residual()?);
    if first < 0 {
        return Err(corrupt("negative residual"));
    }
    let mut prev = first as u64;
    out.push(prev);
    for _ in 1..count {
        prev += reader.read_residual()? + 1;
        out.push(prev);
    }
    Ok(())
}

/// Three-way merge of the sorted sublists into `out`, checking the result
/// is exactly `degree` strictly increasing node ids below `num_nodes`.
/// Anything else means the stream is corrupt.
pub(crate) fn merge_successors(
    copied: &[u64],
    intervals: &[u64],
    residuals: &[u64],
    degree: u64,
    num_nodes: u64,
    out: &mut Vec<u64>,
) -> Result<()> {
    if (copied.len() + intervals.len() + residuals.len()) as u64 != degree {
        return Err(corrupt("successor count does not match the out-degree"));
    }
    out.reserve(degree as usize);
    let (mut i, mut j, mut k) = (0, 0, 0);
    let mut last = None;
    for _ in 0..degree {
        let a = copied.get(i).copied().unwrap_or(u64::MAX);
        let b = intervals.get(j).copied().unwrap_or(u64::MAX);
        let c = residuals.get(k).copied().unwrap_or(u64::MAX);
        let min = a.min(b).min(c);
        if min == a {
            i += 1;
        } else if min == b {
            j += 1;
        } else {
            k += 1;
        }
        if last.is_some_and(|l| l >= min) {
            return Err(corrupt("successor list not strictly increasing"));
        }
        last = Some(min);
        out.push(min);
    }
    if last.is_some_and(|l| l >= num_nodes) {
        return Err(corrupt("successor beyond the node count"));
    }
    Ok(())
}
