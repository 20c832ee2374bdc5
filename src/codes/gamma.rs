/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! # Elias γ
//! Optimal for Zipf distributions of exponent 2.
//! γ codes x ≥ 0 by writing the length of the binary representation of
//! x + 1 in unary, followed by x + 1 without its most significant bit.

use super::BitRead;
use crate::error::corrupt;
use crate::Result;

/// Reading of γ codes.
pub trait GammaRead: BitRead {
    fn read_gamma(&mut self) -> Result<u64> {
        let len = self.read_unary()?;
        if len > 63 {
            return Err(corrupt("gamma code longer than 64 bits"));
        }
        Ok(self.read_bits(len as u32)? + (1 << len) - 1)
    }
}

impl<B: BitRead + ?Sized> GammaRead for B {}
