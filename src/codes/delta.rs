/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! # Elias δ
//! Like γ, but the length is itself γ-coded, which wins for larger values.

use super::{BitRead, GammaRead};
use crate::error::corrupt;
use crate::Result;

/// Reading of δ codes.
pub trait DeltaRead: GammaRead {
    fn read_delta(&mut self) -> Result<u64> {
        let len = self.read_gamma()?;
        if len > 63 {
            return Err(corrupt("delta code longer than 64 bits"));
        }
        Ok(self.read_bits(len as u32)? + (1 << len) - 1)
    }
}

impl<B: BitRead + ?Sized> DeltaRead for B {}
