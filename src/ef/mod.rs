/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Elias–Fano representation of monotone non-decreasing sequences.
//!
//! A sequence x₀ ≤ x₁ ≤ … ≤ x_{n−1} bounded by `largest` is stored by
//! splitting each element into its lower s = ⌊log₂((largest+1)/n)⌋ bits,
//! packed contiguously, and its upper bits, stored as a unary-like bit
//! array: for each i, bit (xᵢ ≫ s) + i of the upper array is set. The
//! whole sequence then takes at most 2 + ⌈log₂(largest/n)⌉ bits per
//! element, and xᵢ is recovered as ((select1(i) − i) ≪ s) | lowerᵢ.
//!
//! For example, for 5, 10, 15, 20 the split gives s = 2, lower bits
//! [1, 2, 3, 0] and upper-array bits {1, 3, 5, 8}; select1(1) = 3, so
//! x₁ = ((3 − 1) ≪ 2) | 2 = 10.

mod simple_select;
pub use simple_select::{SimpleSelect, DEFAULT_SPILL_SIZE, MAX_ONES_PER_INVENTORY, MAX_SPAN};

use crate::bits::{BitArray, CompactArray};
use crate::{Error, Result};

/// An immutable Elias–Fano list; build one with [`EliasFanoBuilder`].
#[derive(Debug, Clone)]
pub struct EliasFanoList {
    s: u32,
    len: u64,
    lower: CompactArray,
    upper: BitArray,
    select: SimpleSelect,
}

impl EliasFanoList {
    /// The number of elements.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `index`-th element. Fails with [`Error::OutOfBound`] when
    /// `index` is not smaller than the length.
    pub fn lookup(&self, index: u64) -> Result<u64> {
        if index >= self.len {
            return Err(Error::OutOfBound);
        }
        let high = self.select.select1(index, &self.upper)?;
        Ok(((high - index) << self.s) | self.lower.get(index))
    }

    /// The memory backing this list, in bytes, excluding the select
    /// inventory.
    pub fn size_bytes(&self) -> u64 {
        self.lower.size_bytes() + self.upper.num_words() * 8
    }

    /// The number of lower bits per element.
    #[inline]
    pub fn lower_bits(&self) -> u32 {
        self.s
    }
}

/// Incremental builder for [`EliasFanoList`].
pub struct EliasFanoBuilder {
    s: u32,
    size: u64,
    largest: u64,
    curr: u64,
    last: u64,
    lower: CompactArray,
    upper: BitArray,
}

/// The number of lower bits for `size` elements bounded by `largest`:
/// ⌊log₂((largest+1)/size)⌋, zero for an empty or degenerate split.
pub(crate) fn lower_bits(size: u64, largest: u64) -> u32 {
    if size == 0 {
        return 0;
    }
    match (largest + 1) / size {
        0 => 0,
        q => q.ilog2(),
    }
}

impl EliasFanoBuilder {
    /// Prepare a builder for `size` elements, all at most `largest`.
    pub fn new(size: u64, largest: u64) -> Self {
        let s = lower_bits(size, largest);
        let upper_len = size + (largest >> s);
        Self {
            s,
            size,
            largest,
            curr: 0,
            last: 0,
            lower: CompactArray::new(s, size),
            upper: BitArray::new(upper_len),
        }
    }

    /// Append an element.
    ///
    /// Fails with [`Error::OutOfBound`] when the list is full or the
    /// element exceeds the declared bound, and with
    /// [`Error::BatchNondecreasing`] when it is smaller than its
    /// predecessor.
    pub fn add(&mut self, element: u64) -> Result<()> {
        if self.curr >= self.size || element > self.largest {
            return Err(Error::OutOfBound);
        }
        if element < self.last {
            return Err(Error::BatchNondecreasing);
        }
        self.lower
            .insert(self.curr, element & ((1 << self.s) - 1));
        self.upper.set_bit((element >> self.s) + self.curr);
        self.last = element;
        self.curr += 1;
        Ok(())
    }

    /// Append a whole slice, checking monotonicity up front.
    pub fn add_batch(&mut self, elements: &[u64]) -> Result<()> {
        if elements.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::BatchNondecreasing);
        }
        for &element in elements {
            self.add(element)?;
        }
        Ok(())
    }

    /// Build the select structure and freeze the list.
    ///
    /// All declared elements must have been added. When `spill_var_len`
    /// is false the select spill is bound by its default capacity and the
    /// build fails with [`Error::SpillTooSmall`] if that is not enough;
    /// otherwise the spill grows to the exact size needed.
    pub fn build(self, spill_var_len: bool) -> Result<EliasFanoList> {
        debug_assert_eq!(self.curr, self.size);
        let select = SimpleSelect::build(&self.upper, self.size, spill_var_len)?;
        Ok(EliasFanoList {
            s: self.s,
            len: self.size,
            lower: self.lower,
            upper: self.upper,
            select,
        })
    }
}
