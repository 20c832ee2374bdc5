/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Loading of per-node bit offsets, either from the `<base>.offsets`
//! companion file (coded deltas whose prefix sums are the offsets) or,
//! when that file is missing, by a sequential scan of the graph itself.

use super::codecs::read_code;
use super::sequential::SequentialIter;
use crate::codes::{BufferedBitReader, MemWordReader};
use crate::ef::{EliasFanoBuilder, EliasFanoList};
use crate::properties::Properties;
use crate::Result;
use std::path::Path;

/// Feed every node's bit offset, in node order, to `sink`.
fn scan_offsets(
    offsets_path: &Path,
    graph_data: Option<&[u8]>,
    props: &Properties,
    mut sink: impl FnMut(u64) -> Result<()>,
) -> Result<()> {
    match std::fs::read(offsets_path) {
        Ok(bytes) => {
            log::info!("reading offsets from {}", offsets_path.display());
            let mut reader = BufferedBitReader::new(MemWordReader::new(&bytes));
            let mut offset = 0u64;
            for _ in 0..props.nodes {
                offset += read_code(&mut reader, props.flags.offsets)?;
                sink(offset)?;
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // no offsets file: rebuild them by decoding the whole graph
            log::info!(
                "{} not found, computing offsets from the graph",
                offsets_path.display()
            );
            let data = graph_data.ok_or(e)?;
            let mut iter = SequentialIter::new(data, props)?;
            while iter.valid() {
                sink(iter.tell())?;
                iter.next_successors()?;
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the offsets as a dense 64-bit array.
pub(crate) fn load_dense(
    offsets_path: &Path,
    graph_data: Option<&[u8]>,
    props: &Properties,
) -> Result<Vec<u64>> {
    let mut offsets = Vec::with_capacity(props.nodes as usize);
    scan_offsets(offsets_path, graph_data, props, |offset| {
        offsets.push(offset);
        Ok(())
    })?;
    Ok(offsets)
}

/// The upper bound used when sizing the Elias–Fano list over the
/// offsets: the compressor's bits-per-link estimate, or the graph bit
/// length when the properties do not carry one.
pub(crate) fn ef_upper_bound(props: &Properties, graph_bits: u64) -> u64 {
    let estimate = (props.bits_per_link * props.arcs as f64) as u64;
    if estimate > 0 {
        estimate
    } else {
        graph_bits
    }
}

/// Load the offsets as an Elias–Fano list.
pub(crate) fn load_elias_fano(
    offsets_path: &Path,
    graph_data: Option<&[u8]>,
    props: &Properties,
    spill_var_len: bool,
) -> Result<EliasFanoList> {
    let graph_bits = graph_data.map_or(0, |d| d.len() as u64 * 8);
    let largest = ef_upper_bound(props, graph_bits);
    let mut builder = EliasFanoBuilder::new(props.nodes, largest);
    scan_offsets(offsets_path, graph_data, props, |offset| {
        builder.add(offset)
    })?;
    builder.build(spill_var_len)
}
