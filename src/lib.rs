/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unconditional_recursion)]
#![deny(unreachable_code)]
#![deny(unreachable_patterns)]
#![deny(trivial_casts)]

pub mod bits;
pub mod codes;
pub mod ef;
pub mod graph;
pub mod properties;
pub mod utils;

mod error;
pub use error::{Error, Result};

/// The most commonly used types, glob-importable.
pub mod prelude {
    pub use crate::bits::*;
    pub use crate::codes::*;
    pub use crate::ef::*;
    pub use crate::error::{Error, Result};
    pub use crate::graph::*;
    pub use crate::properties::*;
    pub use crate::utils::{int2nat, nat2int};
}
