/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::bits::BitArray;
use crate::{Error, Result};

/// Target number of ones per inventory entry.
pub const MAX_ONES_PER_INVENTORY: u64 = 8192;
/// Inventory blocks spanning at least this many bits are spilled.
pub const MAX_SPAN: u64 = 1 << 16;
/// Pre-allocated spill capacity (entries).
pub const DEFAULT_SPILL_SIZE: usize = 10 * 8192;

/// Constant-expected-time `select1` over a bit array, a simplified
/// variant of the `simple` select algorithm.
///
/// The inventory records the position of every `ones_per_inventory`-th
/// one. A block whose ones are spread over fewer than [`MAX_SPAN`] bits
/// is answered by scanning forward from the recorded position; a sparser
/// block gets every one of its positions recorded in the spill, and its
/// inventory entry becomes the negated spill index (shifted by one so
/// that a spilled first block is distinguishable from a regular entry 0).
#[derive(Debug, Clone)]
pub struct SimpleSelect {
    num_ones: u64,
    log2_ones_per_inventory: u32,
    ones_per_inventory_mask: u64,
    inventory: Vec<i64>,
    exact_spill: Vec<u64>,
}

impl SimpleSelect {
    /// Build the structure for `bits`, which must contain exactly
    /// `num_ones` set bits.
    ///
    /// `spill_var_len` selects the overflow policy: grow the spill to the
    /// exact size needed, or fail with [`Error::SpillTooSmall`] when it
    /// would exceed [`DEFAULT_SPILL_SIZE`].
    pub fn build(bits: &BitArray, num_ones: u64, spill_var_len: bool) -> Result<Self> {
        let length = bits.len();
        let window = if length == 0 {
            1
        } else {
            ((num_ones * MAX_ONES_PER_INVENTORY).div_ceil(length)).max(1)
        };
        let log2_ones_per_inventory = window.ilog2();
        let ones_per_inventory = 1u64 << log2_ones_per_inventory;
        let ones_per_inventory_mask = ones_per_inventory - 1;
        let inventory_size = num_ones.div_ceil(ones_per_inventory);

        let mut inventory = Vec::with_capacity(inventory_size as usize + 1);
        let mut d = 0u64;
        for position in bits.ones() {
            if d & ones_per_inventory_mask == 0 {
                inventory.push(position as i64);
            }
            d += 1;
        }
        debug_assert_eq!(d, num_ones);
        inventory.push(length as i64);

        let mut exact_spill = Vec::new();
        if ones_per_inventory > 1 {
            // size the spill before filling it, so the overflow policy can
            // be applied against the exact requirement
            let mut spilled = 0u64;
            for block in 0..inventory_size {
                let start = inventory[block as usize] as u64;
                let span = inventory[block as usize + 1] as u64 - start;
                if span >= MAX_SPAN {
                    spilled += (num_ones - block * ones_per_inventory).min(ones_per_inventory);
                }
            }
            if spilled as usize > DEFAULT_SPILL_SIZE {
                if !spill_var_len {
                    return Err(Error::SpillTooSmall(spilled as usize));
                }
                log::warn!(
                    "select spill needs {} entries, more than the default {}; allocating exactly",
                    spilled,
                    DEFAULT_SPILL_SIZE
                );
            }
            exact_spill.reserve_exact(spilled as usize);

            for block in 0..inventory_size {
                let start = inventory[block as usize] as u64;
                let end = inventory[block as usize + 1] as u64;
                if end - start < MAX_SPAN {
                    continue;
                }
                let spill_start = exact_spill.len();
                for position in start..end {
                    if bits.get_bit(position) {
                        exact_spill.push(position);
                    }
                }
                inventory[block as usize] = -(spill_start as i64 + 1);
            }
        }

        Ok(Self {
            num_ones,
            log2_ones_per_inventory,
            ones_per_inventory_mask,
            inventory,
            exact_spill,
        })
    }

    /// The number of ones the structure was built for.
    #[inline]
    pub fn num_ones(&self) -> u64 {
        self.num_ones
    }

    /// The position of the `rank`-th one (zero-based) in `bits`, which
    /// must be the array the structure was built for.
    pub fn select1(&self, rank: u64, bits: &BitArray) -> Result<u64> {
        if rank >= self.num_ones {
            return Err(Error::OutOfBound);
        }
        let block = rank >> self.log2_ones_per_inventory;
        let subrank = rank & self.ones_per_inventory_mask;
        let entry = self.inventory[block as usize];
        if entry < 0 {
            return Ok(self.exact_spill[(-entry - 1) as usize + subrank as usize]);
        }
        let position = entry as u64;
        if subrank == 0 {
            return Ok(position);
        }

        // scan for the subrank-th one after `position`: finish the current
        // word bit by bit, then hop word by word on popcounts
        let mut word_index = position >> 6;
        let offset = position & 63;
        let mut word = bits.word(word_index) & (u64::MAX << 1 << offset);
        let mut remaining = subrank;
        loop {
            let ones = word.count_ones() as u64;
            if ones >= remaining {
                for _ in 1..remaining {
                    word &= word - 1;
                }
                return Ok((word_index << 6) + word.trailing_zeros() as u64);
            }
            remaining -= ones;
            word_index += 1;
            word = bits.word(word_index);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bit_array(positions: &[u64], len: u64) -> BitArray {
        let mut bits = BitArray::new(len);
        for &p in positions {
            bits.set_bit(p);
        }
        bits
    }

    fn check_all(positions: &[u64], len: u64) {
        let bits = bit_array(positions, len);
        let select = SimpleSelect::build(&bits, positions.len() as u64, true).unwrap();
        for (rank, &p) in positions.iter().enumerate() {
            assert_eq!(select.select1(rank as u64, &bits).unwrap(), p);
        }
        assert!(matches!(
            select.select1(positions.len() as u64, &bits),
            Err(Error::OutOfBound)
        ));
    }

    #[test]
    fn test_small() {
        check_all(&[2, 6, 9, 13], 14);
        check_all(&[0], 1);
        check_all(&[63, 64, 127, 128], 200);
    }

    #[test]
    fn test_empty() {
        check_all(&[], 0);
    }

    #[test]
    fn test_dense() {
        let positions: Vec<u64> = (0..5000).map(|i| i * 2).collect();
        check_all(&positions, 10_000);
    }

    #[test]
    fn test_spilled_blocks() {
        // a dense prefix keeps several ones per inventory block, then a
        // tail of ones more than 2^16 bits apart forces those blocks to
        // spill
        let positions: Vec<u64> = (0..100_000)
            .chain((0..100).map(|i| 200_000 + i * 70_000))
            .collect();
        let len = positions.last().unwrap() + 1;
        let bits = bit_array(&positions, len);
        let select = SimpleSelect::build(&bits, positions.len() as u64, true).unwrap();
        assert!(!select.exact_spill.is_empty());
        for (rank, &p) in positions.iter().enumerate() {
            assert_eq!(select.select1(rank as u64, &bits).unwrap(), p);
        }
    }

    #[test]
    fn test_mixed_density() {
        // a dense run, a desert, then another dense run
        let mut positions: Vec<u64> = (0..3000).collect();
        positions.extend((0..3000).map(|i| 1_000_000 + 17 * i));
        let len = positions.last().unwrap() + 5;
        check_all(&positions, len);
    }

    #[test]
    fn test_word_boundary_scan() {
        // inventory entry at a position whose word ends right after it
        let positions = [62, 63, 64, 65, 300, 301];
        check_all(&positions, 400);
    }
}
