/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::codes::*;
use crate::properties::{Code, CompFlags};
use crate::{Error, Result};

type Reader<'a> = BufferedBitReader<MemWordReader<'a>>;
type ReadFn<'a> = fn(&mut Reader<'a>) -> Result<u64>;

/// Decode a single value with a run-time-selected code.
///
/// Used where a full [`DynCodesReader`] would be overkill, such as the
/// offsets stream, which is read with one code only.
pub(crate) fn read_code(reader: &mut impl BitRead, code: Code) -> Result<u64> {
    match code {
        Code::Unary => reader.read_unary(),
        Code::Gamma => reader.read_gamma(),
        Code::Delta => reader.read_delta(),
        Code::Zeta { k: 1 } => reader.read_gamma(),
        Code::Zeta { k } if (2..=7).contains(&k) => reader.read_zeta(k),
        Code::Zeta { .. } => Err(Error::UnsupportedCoding(code)),
        Code::Nibble => reader.read_nibble(),
    }
}

/// A bit reader over a graph stream plus one decode function per field,
/// resolved once from the compression flags so the per-field dispatch is
/// a plain indirect call.
pub(crate) struct DynCodesReader<'a> {
    pub(crate) reader: Reader<'a>,
    read_outdegree: ReadFn<'a>,
    read_reference: ReadFn<'a>,
    read_block_count: ReadFn<'a>,
    read_block: ReadFn<'a>,
    read_interval_count: ReadFn<'a>,
    read_interval_start: ReadFn<'a>,
    read_interval_len: ReadFn<'a>,
    read_residual: ReadFn<'a>,
}

fn select_code<'a>(code: Code) -> Result<ReadFn<'a>> {
    Ok(match code {
        Code::Unary => |r| r.read_unary(),
        Code::Gamma => |r| r.read_gamma(),
        Code::Delta => |r| r.read_delta(),
        Code::Zeta { k: 1 } => |r| r.read_gamma(),
        Code::Zeta { k: 2 } => |r| r.read_zeta(2),
        Code::Zeta { k: 3 } => |r| r.read_zeta(3),
        Code::Zeta { k: 4 } => |r| r.read_zeta(4),
        Code::Zeta { k: 5 } => |r| r.read_zeta(5),
        Code::Zeta { k: 6 } => |r| r.read_zeta(6),
        Code::Zeta { k: 7 } => |r| r.read_zeta(7),
        Code::Nibble => |r| r.read_nibble(),
        Code::Zeta { .. } => return Err(Error::UnsupportedCoding(code)),
    })
}

impl<'a> DynCodesReader<'a> {
    pub(crate) fn new(data: &'a [u8], flags: &CompFlags) -> Result<Self> {
        Ok(Self {
            reader: BufferedBitReader::new(MemWordReader::new(data)),
            read_outdegree: select_code(flags.outdegrees)?,
            read_reference: select_code(flags.references)?,
            read_block_count: select_code(flags.block_count)?,
            read_block: select_code(flags.blocks)?,
            read_interval_count: select_code(flags.interval_count)?,
            read_interval_start: select_code(flags.interval_start)?,
            read_interval_len: select_code(flags.interval_len)?,
            read_residual: select_code(flags.residuals)?,
        })
    }

    #[inline(always)]
    pub(crate) fn read_outdegree(&mut self) -> Result<u64> {
        (self.read_outdegree)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn read_reference(&mut self) -> Result<u64> {
        (self.read_reference)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn read_block_count(&mut self) -> Result<u64> {
        (self.read_block_count)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn read_block(&mut self) -> Result<u64> {
        (self.read_block)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn read_interval_count(&mut self) -> Result<u64> {
        (self.read_interval_count)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn read_interval_start(&mut self) -> Result<u64> {
        (self.read_interval_start)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn read_interval_len(&mut self) -> Result<u64> {
        (self.read_interval_len)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn read_residual(&mut self) -> Result<u64> {
        (self.read_residual)(&mut self.reader)
    }

    #[inline(always)]
    pub(crate) fn tell(&self) -> u64 {
        self.reader.tell()
    }

    #[inline(always)]
    pub(crate) fn seek(&mut self, pos: u64) -> Result<()> {
        self.reader.seek(pos)
    }
}
