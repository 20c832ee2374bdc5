/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::properties::Code;
use std::io;
use thiserror::Error;

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All the ways reading a BV graph can fail.
///
/// Each variant corresponds to one of the distinct error codes of the
/// original C library, so callers can match on the exact condition.
#[derive(Debug, Error)]
pub enum Error {
    /// Allocation failure. Kept for parity with the C error table; Rust
    /// aborts on failed allocations, so the crate never produces it.
    #[error("allocation failed")]
    OutOfMemory,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported operation")]
    Unsupported,
    #[error("base path too long")]
    FilenameTooLong,
    #[error("provided buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    #[error("malformed properties file: {0}")]
    PropertyFile(String),
    #[error("unsupported graph version {0}")]
    UnsupportedVersion(u32),
    #[error("unknown compression flag `{0}`")]
    CompressionFlag(String),
    #[error("node {0} out of range")]
    VertexOutOfRange(u64),
    #[error("random access requires offsets")]
    RequiresOffsets,
    #[error("unsupported coding {0:?}")]
    UnsupportedCoding(Code),
    #[error("index out of bounds")]
    OutOfBound,
    #[error("pre-allocated spill too small: need {0} entries")]
    SpillTooSmall(usize),
    #[error("sequence is not nondecreasing")]
    BatchNondecreasing,
}

/// A corrupt-stream error, reported through the [`Io`](Error::Io) kind.
pub(crate) fn corrupt(msg: &'static str) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidData, msg))
}
