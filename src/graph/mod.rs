/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The BV graph descriptor: loading, offsets policy, and iterators.

use crate::ef::{self, EliasFanoList, DEFAULT_SPILL_SIZE, MAX_ONES_PER_INVENTORY};
use crate::properties::Properties;
use crate::{Error, Result};
use mmap_rs::{Mmap, MmapOptions};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

mod codecs;
mod decode;
mod offsets;

mod sequential;
pub use sequential::SequentialIter;

mod random;
pub use random::RandomIter;

pub const GRAPH_EXTENSION: &str = "graph";
pub const OFFSETS_EXTENSION: &str = "offsets";
pub const PROPERTIES_EXTENSION: &str = "properties";

/// The longest accepted base path, in bytes.
pub const MAX_BASENAME_LEN: usize = 4096;

/// `<base>.<ext>` — `Path::with_extension` would clobber anything after a
/// dot in the basename itself.
fn with_ext(base: &Path, ext: &str) -> PathBuf {
    let mut os = base.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

fn mmap_err(e: mmap_rs::Error) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::Other, e.to_string()))
}

/// The bytes of the `.graph` file, wherever they live.
enum GraphData {
    /// Not loaded at all (metadata-only load without a graph file).
    None,
    /// Read into memory.
    Owned(Vec<u8>),
    /// Memory-mapped; the file stays on disk and is paged in on demand.
    Mapped(Mmap),
}

impl GraphData {
    fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            GraphData::None => None,
            GraphData::Owned(v) => Some(v),
            GraphData::Mapped(m) => Some(m.as_slice()),
        }
    }
}

/// How the per-node offsets are held.
enum OffsetsRepr {
    None,
    Dense(Vec<u64>),
    EliasFano(EliasFanoList),
}

/// The memory a load policy would need, in bytes, per buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub graph: u64,
    pub offsets: u64,
    pub elias_fano: u64,
}

/// Builder for loading a [`BvGraph`].
///
/// The `offset_step` selects the load policy:
///
/// | step   | graph bytes   | offsets                                  |
/// |--------|---------------|------------------------------------------|
/// | `-1`   | mapped        | none (sequential access only)            |
/// | `< -1` | mapped        | Elias–Fano                               |
/// | `0`    | in memory     | none (sequential access only)            |
/// | `1`    | in memory     | dense 64-bit array                       |
/// | `2`    | in memory     | Elias–Fano                               |
/// | `> 2`  | in memory     | dense if `8·n` bytes fit the step, else Elias–Fano |
///
/// For `offset_step > 2` the step is a budget in **bytes**.
pub struct LoadConfig {
    basename: PathBuf,
    offset_step: i64,
    graph_buffer: Option<Vec<u8>>,
    spill_var_len: bool,
}

impl LoadConfig {
    pub fn new(basename: impl AsRef<Path>) -> Self {
        Self {
            basename: basename.as_ref().to_path_buf(),
            offset_step: 0,
            graph_buffer: None,
            spill_var_len: true,
        }
    }

    pub fn offset_step(mut self, offset_step: i64) -> Self {
        self.offset_step = offset_step;
        self
    }

    /// Use a caller-provided buffer for the graph bytes instead of
    /// allocating one. Its capacity must cover the graph file.
    pub fn graph_buffer(mut self, buffer: Vec<u8>) -> Self {
        self.graph_buffer = Some(buffer);
        self
    }

    /// Fail with [`Error::SpillTooSmall`] instead of growing the select
    /// spill past its default capacity.
    pub fn fixed_size_spill(mut self) -> Self {
        self.spill_var_len = false;
        self
    }

    pub fn load(self) -> Result<BvGraph> {
        BvGraph::load_with(self)
    }
}

/// An immutable BV graph, loaded by [`LoadConfig`].
pub struct BvGraph {
    basename: PathBuf,
    props: Properties,
    data: GraphData,
    offsets: OffsetsRepr,
    offset_step: i64,
}

impl BvGraph {
    /// Load `<basename>.properties` (and, per `offset_step`,
    /// `<basename>.graph` and `<basename>.offsets`).
    pub fn load(basename: impl AsRef<Path>, offset_step: i64) -> Result<Self> {
        LoadConfig::new(basename).offset_step(offset_step).load()
    }

    fn load_with(config: LoadConfig) -> Result<Self> {
        let LoadConfig {
            basename,
            offset_step,
            graph_buffer,
            spill_var_len,
        } = config;
        if basename.as_os_str().len() > MAX_BASENAME_LEN {
            return Err(Error::FilenameTooLong);
        }

        let props = Properties::from_file(with_ext(&basename, PROPERTIES_EXTENSION))?;
        log::info!(
            "loading {} ({} nodes, {} arcs, offset_step {})",
            basename.display(),
            props.nodes,
            props.arcs,
            offset_step
        );

        let graph_path = with_ext(&basename, GRAPH_EXTENSION);
        let data = if offset_step >= 0 {
            let mut file = File::open(&graph_path)?;
            let file_len = file.metadata()?.len() as usize;
            let mut buffer = match graph_buffer {
                Some(buffer) => {
                    if buffer.capacity() < file_len {
                        return Err(Error::BufferTooSmall {
                            needed: file_len,
                            got: buffer.capacity(),
                        });
                    }
                    let mut buffer = buffer;
                    buffer.clear();
                    buffer
                }
                None => Vec::with_capacity(file_len),
            };
            file.read_to_end(&mut buffer)?;
            GraphData::Owned(buffer)
        } else {
            // the graph stays on disk
            match File::open(&graph_path) {
                Ok(file) => {
                    let len = file.metadata()?.len();
                    if len == 0 {
                        GraphData::Owned(Vec::new())
                    } else {
                        let mmap = unsafe {
                            MmapOptions::new(len as usize)
                                .map_err(mmap_err)?
                                .with_file(&file, 0)
                                .map()
                                .map_err(mmap_err)?
                        };
                        GraphData::Mapped(mmap)
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => GraphData::None,
                Err(e) => return Err(e.into()),
            }
        };

        let offsets_path = with_ext(&basename, OFFSETS_EXTENSION);
        let offsets = match offset_step {
            1 => OffsetsRepr::Dense(offsets::load_dense(
                &offsets_path,
                data.as_bytes(),
                &props,
            )?),
            2 => OffsetsRepr::EliasFano(offsets::load_elias_fano(
                &offsets_path,
                data.as_bytes(),
                &props,
                spill_var_len,
            )?),
            step if step < -1 => OffsetsRepr::EliasFano(offsets::load_elias_fano(
                &offsets_path,
                data.as_bytes(),
                &props,
                spill_var_len,
            )?),
            step if step > 2 => {
                if 8 * props.nodes <= step as u64 {
                    OffsetsRepr::Dense(offsets::load_dense(
                        &offsets_path,
                        data.as_bytes(),
                        &props,
                    )?)
                } else {
                    log::info!(
                        "dense offsets would need {} bytes, over the {} byte budget; \
                         using an Elias-Fano index",
                        8 * props.nodes,
                        step
                    );
                    OffsetsRepr::EliasFano(offsets::load_elias_fano(
                        &offsets_path,
                        data.as_bytes(),
                        &props,
                        spill_var_len,
                    )?)
                }
            }
            _ => OffsetsRepr::None,
        };

        Ok(Self {
            basename,
            props,
            data,
            offsets,
            offset_step,
        })
    }

    /// The number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> u64 {
        self.props.nodes
    }

    /// The number of arcs.
    #[inline]
    pub fn num_arcs(&self) -> u64 {
        self.props.arcs
    }

    /// The parsed metadata.
    #[inline]
    pub fn properties(&self) -> &Properties {
        &self.props
    }

    /// The load policy this graph was loaded with.
    #[inline]
    pub fn offset_step(&self) -> i64 {
        self.offset_step
    }

    pub(crate) fn graph_data(&self) -> Option<&[u8]> {
        self.data.as_bytes()
    }

    pub(crate) fn has_offsets(&self) -> bool {
        !matches!(self.offsets, OffsetsRepr::None)
    }

    /// The bit offset of `node`'s record in the graph stream.
    pub fn offset(&self, node: u64) -> Result<u64> {
        if node >= self.props.nodes {
            return Err(Error::VertexOutOfRange(node));
        }
        match &self.offsets {
            OffsetsRepr::Dense(offsets) => Ok(offsets[node as usize]),
            OffsetsRepr::EliasFano(ef) => ef.lookup(node),
            OffsetsRepr::None => Err(Error::RequiresOffsets),
        }
    }

    /// A sequential iterator over all nodes and their successors.
    pub fn iter(&self) -> Result<SequentialIter<'_>> {
        let data = self.graph_data().ok_or(Error::Unsupported)?;
        SequentialIter::new(data, &self.props)
    }

    /// A random-access iterator. Requires offsets (dense or Elias–Fano).
    pub fn random_iter(&self) -> Result<RandomIter<'_>> {
        RandomIter::new(self)
    }

    fn graph_bits(&self) -> u64 {
        match self.graph_data() {
            Some(data) => data.len() as u64 * 8,
            None => std::fs::metadata(with_ext(&self.basename, GRAPH_EXTENSION))
                .map(|m| m.len() * 8)
                .unwrap_or(0),
        }
    }

    /// The size of the Elias–Fano offsets structure for this graph, per
    /// the analytic formula: lower bits, upper bits, select inventory and
    /// the default spill, rounded to whole words.
    fn ef_size_bytes(&self) -> u64 {
        let n = self.props.nodes;
        let build_last = offsets::ef_upper_bound(&self.props, self.graph_bits());
        let s = ef::lower_bits(n, build_last);
        let lower_bytes = (s as u64 * n).div_ceil(64) * 8;
        let upper_len = n + (build_last >> s);
        let upper_bytes = upper_len.div_ceil(64) * 8;
        let window = if upper_len == 0 {
            1
        } else {
            (n * MAX_ONES_PER_INVENTORY).div_ceil(upper_len).max(1)
        };
        let ones_per_inventory = 1u64 << window.ilog2();
        let inventory_size = n.div_ceil(ones_per_inventory);
        lower_bytes + upper_bytes + inventory_size * 8 + DEFAULT_SPILL_SIZE as u64 * 8
    }

    /// Compute the memory loading this graph with `offset_step` would
    /// take, without loading anything.
    ///
    /// The intended use is to load with `offset_step = -1` first, query,
    /// and then reload with pre-sized buffers.
    pub fn required_memory(&self, offset_step: i64) -> Result<MemoryUsage> {
        if offset_step <= -1 {
            return Ok(MemoryUsage {
                graph: 0,
                offsets: 0,
                elias_fano: if offset_step < -1 {
                    self.ef_size_bytes()
                } else {
                    0
                },
            });
        }
        let graph = std::fs::metadata(with_ext(&self.basename, GRAPH_EXTENSION))?.len();
        let dense = 8 * self.props.nodes;
        let (offsets, elias_fano) = match offset_step {
            0 => (0, 0),
            1 => (dense, 0),
            2 => (0, self.ef_size_bytes()),
            step => {
                if step as u64 >= dense {
                    (dense, 0)
                } else {
                    (0, self.ef_size_bytes())
                }
            }
        };
        Ok(MemoryUsage {
            graph,
            offsets,
            elias_fano,
        })
    }
}
