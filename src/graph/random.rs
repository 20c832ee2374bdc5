/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::codecs::DynCodesReader;
use super::decode;
use super::BvGraph;
use crate::error::corrupt;
use crate::{Error, Result};

/// Random access to out-degrees and successor lists.
///
/// Each call seeks to the node's bit offset and decodes its record.
/// References are resolved by recursively decoding the referenced node,
/// which in turn may reference an earlier one, up to `max_ref_count`
/// levels; the iterator keeps the last `window_size + 1` fully decoded
/// lists so that chains touching nearby nodes do not decode the same
/// record twice.
///
/// Distinct iterators over the same graph are independent; a single
/// iterator hands out one list at a time.
pub struct RandomIter<'a> {
    graph: &'a BvGraph,
    reader: DynCodesReader<'a>,
    /// decoded-list cache, keyed by node id modulo its length
    window: Vec<Option<(u64, Vec<u64>)>>,
    blocks: Vec<u64>,
}

impl<'a> RandomIter<'a> {
    pub(crate) fn new(graph: &'a BvGraph) -> Result<Self> {
        let data = graph.graph_data().ok_or(Error::Unsupported)?;
        if !graph.has_offsets() {
            return Err(Error::RequiresOffsets);
        }
        Ok(Self {
            graph,
            reader: DynCodesReader::new(data, &graph.properties().flags)?,
            window: (0..graph.properties().window_size + 1).map(|_| None).collect(),
            blocks: Vec::new(),
        })
    }

    /// The out-degree of `node`, reading only the degree field.
    pub fn outdegree(&mut self, node: u64) -> Result<u64> {
        if node >= self.graph.num_nodes() {
            return Err(Error::VertexOutOfRange(node));
        }
        self.reader.seek(self.graph.offset(node)?)?;
        self.reader.read_outdegree()
    }

    /// The successors of `node`. The slice is valid until the next call
    /// on this iterator.
    pub fn successors(&mut self, node: u64) -> Result<&[u64]> {
        if node >= self.graph.num_nodes() {
            return Err(Error::VertexOutOfRange(node));
        }
        self.decode(node, 0)?;
        let slot = (node % self.window.len() as u64) as usize;
        match &self.window[slot] {
            Some((id, successors)) if *id == node => Ok(successors),
            _ => Err(corrupt("decoded list evicted from the window")),
        }
    }

    /// The cached list of `node`, if still in the window.
    fn cached(&self, node: u64) -> Option<&[u64]> {
        let slot = (node % self.window.len() as u64) as usize;
        match &self.window[slot] {
            Some((id, successors)) if *id == node => Some(successors),
            _ => None,
        }
    }

    fn cache_put(&mut self, node: u64, successors: Vec<u64>) {
        let slot = (node % self.window.len() as u64) as usize;
        self.window[slot] = Some((node, successors));
    }

    /// Decode `node`'s record into the window, following references at
    /// most `max_ref_count` levels deep.
    fn decode(&mut self, node: u64, depth: usize) -> Result<()> {
        if depth > self.graph.properties().max_ref_count {
            return Err(corrupt("reference chain deeper than maxrefcount"));
        }
        if self.cached(node).is_some() {
            return Ok(());
        }

        self.reader.seek(self.graph.offset(node)?)?;
        let degree = self.reader.read_outdegree()?;
        if degree == 0 {
            self.cache_put(node, Vec::new());
            return Ok(());
        }

        let props = self.graph.properties();
        let window_size = props.window_size;
        let min_interval_length = props.min_interval_length;

        let mut copied = Vec::new();
        if window_size > 0 {
            let reference = self.reader.read_reference()?;
            if reference > 0 {
                if reference > node || reference > window_size as u64 {
                    return Err(corrupt("reference outside the window"));
                }
                decode::read_block_list(&mut self.reader, &mut self.blocks)?;
                let blocks = std::mem::take(&mut self.blocks);
                // decoding the referenced node moves the cursor; come back
                // to the end of the block section afterwards
                let resume = self.reader.tell();
                self.decode(node - reference, depth + 1)?;
                let reference_list = self
                    .cached(node - reference)
                    .ok_or_else(|| corrupt("referenced list evicted from the window"))?;
                decode::apply_blocks(reference_list, &blocks, &mut copied)?;
                self.blocks = blocks;
                self.reader.seek(resume)?;
            }
        }

        let mut intervals = Vec::new();
        if (copied.len() as u64) < degree && min_interval_length > 0 {
            decode::read_intervals(&mut self.reader, node, min_interval_length, &mut intervals)?;
        }

        let consumed = (copied.len() + intervals.len()) as u64;
        if consumed > degree {
            return Err(corrupt("more successors than the out-degree"));
        }
        let mut residuals = Vec::new();
        decode::read_residuals(&mut self.reader, node, degree - consumed, &mut residuals)?;

        let mut successors = Vec::new();
        decode::merge_successors(
            &copied,
            &intervals,
            &residuals,
            degree,
            self.graph.num_nodes(),
            &mut successors,
        )?;
        self.cache_put(node, successors);
        Ok(())
    }
}
