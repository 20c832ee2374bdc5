/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::codecs::DynCodesReader;
use super::decode;
use crate::error::corrupt;
use crate::properties::Properties;
use crate::Result;

/// A circular buffer holding the successor lists of the last
/// `window_size + 1` nodes, the candidates for reference copying during
/// a sequential scan. Allocations are recycled to keep pressure off the
/// allocator.
pub(crate) struct CircularBuffer {
    data: Vec<Vec<u64>>,
    end_node_id: u64,
}

impl CircularBuffer {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            end_node_id: 0,
            data: (0..len).map(|_| Vec::new()).collect(),
        }
    }

    /// The id of the next node to be pushed.
    #[inline]
    pub(crate) fn end_node_id(&self) -> u64 {
        self.end_node_id
    }

    /// Take the buffer that will hold the next node's successors.
    pub(crate) fn take(&mut self) -> Vec<u64> {
        let idx = (self.end_node_id % self.data.len() as u64) as usize;
        let mut buf = std::mem::take(&mut self.data[idx]);
        buf.clear();
        buf
    }

    /// Put the decoded list back, making it the buffer of the next node.
    pub(crate) fn push(&mut self, buf: Vec<u64>) -> &[u64] {
        let idx = (self.end_node_id % self.data.len() as u64) as usize;
        self.end_node_id += 1;
        self.data[idx] = buf;
        &self.data[idx]
    }

    /// The successors of `node`, which must be within the window.
    #[inline]
    pub(crate) fn get(&self, node: u64) -> &[u64] {
        &self.data[(node % self.data.len() as u64) as usize]
    }
}

/// A sequential scan over all nodes of a BV graph and their successors.
///
/// Needs no offsets: the records are decoded back to back, and reference
/// copies are resolved against the successor lists of the previous
/// `window_size` nodes, which the iterator keeps around.
pub struct SequentialIter<'a> {
    reader: DynCodesReader<'a>,
    backrefs: CircularBuffer,
    window_size: usize,
    min_interval_length: usize,
    num_nodes: u64,
    // scratch space reused across records
    blocks: Vec<u64>,
    copied: Vec<u64>,
    intervals: Vec<u64>,
    residuals: Vec<u64>,
}

impl<'a> SequentialIter<'a> {
    pub(crate) fn new(data: &'a [u8], props: &Properties) -> Result<Self> {
        Ok(Self {
            reader: DynCodesReader::new(data, &props.flags)?,
            backrefs: CircularBuffer::new(props.window_size + 1),
            window_size: props.window_size,
            min_interval_length: props.min_interval_length,
            num_nodes: props.nodes,
            blocks: Vec::new(),
            copied: Vec::new(),
            intervals: Vec::new(),
            residuals: Vec::new(),
        })
    }

    /// The id of the node the next [`next_successors`] call will decode.
    ///
    /// [`next_successors`]: SequentialIter::next_successors
    #[inline]
    pub fn curr(&self) -> u64 {
        self.backrefs.end_node_id()
    }

    /// Whether there are nodes left to decode.
    #[inline]
    pub fn valid(&self) -> bool {
        self.curr() < self.num_nodes
    }

    /// The bit position of the cursor; before each record this is the
    /// offset of the node about to be decoded.
    #[inline]
    pub fn tell(&self) -> u64 {
        self.reader.tell()
    }

    /// The successors of the most recently decoded node, empty before the
    /// first [`next_successors`](SequentialIter::next_successors) call.
    /// Invalidated by the next call.
    pub fn outedges(&self) -> &[u64] {
        match self.backrefs.end_node_id() {
            0 => &[],
            node => self.backrefs.get(node - 1),
        }
    }

    /// Decode the next node and return its successors. The slice is valid
    /// until the next call.
    pub fn next_successors(&mut self) -> Result<&[u64]> {
        debug_assert!(self.valid());
        let node = self.curr();
        let mut results = self.backrefs.take();
        self.decode_record(node, &mut results)?;
        Ok(self.backrefs.push(results))
    }

    fn decode_record(&mut self, node: u64, results: &mut Vec<u64>) -> Result<()> {
        let degree = self.reader.read_outdegree()?;
        if degree == 0 {
            return Ok(());
        }

        self.copied.clear();
        self.intervals.clear();
        self.residuals.clear();

        if self.window_size > 0 {
            let reference = self.reader.read_reference()?;
            if reference > 0 {
                if reference > node || reference > self.window_size as u64 {
                    return Err(corrupt("reference outside the window"));
                }
                decode::read_block_list(&mut self.reader, &mut self.blocks)?;
                decode::apply_blocks(
                    self.backrefs.get(node - reference),
                    &self.blocks,
                    &mut self.copied,
                )?;
            }
        }

        if (self.copied.len() as u64) < degree && self.min_interval_length > 0 {
            decode::read_intervals(
                &mut self.reader,
                node,
                self.min_interval_length,
                &mut self.intervals,
            )?;
        }

        let consumed = (self.copied.len() + self.intervals.len()) as u64;
        if consumed > degree {
            return Err(corrupt("more successors than the out-degree"));
        }
        decode::read_residuals(&mut self.reader, node, degree - consumed, &mut self.residuals)?;

        decode::merge_successors(
            &self.copied,
            &self.intervals,
            &self.residuals,
            degree,
            self.num_nodes,
            results,
        )
    }
}

impl Iterator for SequentialIter<'_> {
    type Item = Result<(u64, Vec<u64>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.valid() {
            return None;
        }
        let node = self.curr();
        Some(self.next_successors().map(|succ| (node, succ.to_vec())))
    }
}
