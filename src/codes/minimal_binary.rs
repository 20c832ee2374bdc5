/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! # Minimal binary
//! A near-optimal code for an integer with a known upper bound `u`: the
//! first 2^(⌊log₂u⌋+1) − u values use ⌊log₂u⌋ bits, the rest one more.

use super::BitRead;
use crate::Result;

/// Reading of minimal binary codes with upper bound `max`.
pub trait MinimalBinaryRead: BitRead {
    /// Read a value in `[0, max)`. `max` must be at least 1.
    fn read_minimal_binary(&mut self, max: u64) -> Result<u64> {
        debug_assert!(max >= 1);
        if max <= 1 {
            return Ok(0);
        }
        let l = max.ilog2();
        let value = self.read_bits(l)?;
        let limit = (1 << (l + 1)) - max;
        if value < limit {
            Ok(value)
        } else {
            let bit = self.read_bits(1)?;
            Ok(((value << 1) | bit) - limit)
        }
    }
}

impl<B: BitRead + ?Sized> MinimalBinaryRead for B {}
