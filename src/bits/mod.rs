/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Compact bit storage: a plain bit array and a fixed-width vector, both
//! over 64-bit words. These back the Elias–Fano list.

mod bit_array;
pub use bit_array::BitArray;

mod compact_array;
pub use compact_array::CompactArray;
