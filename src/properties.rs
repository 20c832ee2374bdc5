/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parsing of `<base>.properties` files.
//!
//! The file is in Java properties format (`key=value` lines, `#` or `!`
//! comments). Keys are matched case-insensitively; values are
//! case-sensitive where it matters (codec names are uppercase).

use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// An instantaneous code, selectable per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Unary,
    Gamma,
    Delta,
    Zeta { k: u64 },
    Nibble,
}

/// The code used for each field of a BV graph record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompFlags {
    pub outdegrees: Code,
    pub references: Code,
    pub block_count: Code,
    pub blocks: Code,
    pub interval_count: Code,
    pub interval_start: Code,
    pub interval_len: Code,
    pub residuals: Code,
    pub offsets: Code,
}

impl Default for CompFlags {
    /// The default codes of the BV format.
    fn default() -> Self {
        CompFlags {
            outdegrees: Code::Gamma,
            references: Code::Unary,
            block_count: Code::Gamma,
            blocks: Code::Gamma,
            interval_count: Code::Gamma,
            interval_start: Code::Gamma,
            interval_len: Code::Gamma,
            residuals: Code::Zeta { k: 3 },
            offsets: Code::Gamma,
        }
    }
}

impl CompFlags {
    pub fn code_from_str(s: &str, k: u64) -> Option<Code> {
        match s {
            "UNARY" => Some(Code::Unary),
            "GAMMA" => Some(Code::Gamma),
            "DELTA" => Some(Code::Delta),
            "ZETA" => Some(Code::Zeta { k }),
            "NIBBLE" => Some(Code::Nibble),
            _ => None,
        }
    }
}

/// The metadata of a BV graph.
#[derive(Debug, Clone)]
pub struct Properties {
    /// Number of nodes.
    pub nodes: u64,
    /// Number of arcs.
    pub arcs: u64,
    /// Maximum distance of a reference, 0 disables reference compression.
    pub window_size: usize,
    /// Maximum length of a reference chain.
    pub max_ref_count: usize,
    /// Minimum length of an encoded interval, 0 disables intervals.
    pub min_interval_length: usize,
    /// The k parameter of ζ codes.
    pub zeta_k: u64,
    /// Average number of bits per arc, as recorded by the compressor.
    pub bits_per_link: f64,
    /// Format version.
    pub version: u32,
    /// Per-field code choices.
    pub flags: CompFlags,
}

impl Properties {
    /// Read and parse `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let map = java_properties::read(BufReader::new(file))
            .map_err(|e| Error::PropertyFile(e.to_string()))?;
        Self::from_map(&map)
    }

    /// Parse an already-read key/value map.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        // keys are case-insensitive
        let map: HashMap<String, &str> = map
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.as_str()))
            .collect();

        fn parse<T: std::str::FromStr>(map: &HashMap<String, &str>, key: &str) -> Result<Option<T>> {
            match map.get(key) {
                None => Ok(None),
                Some(value) => value
                    .trim()
                    .parse::<T>()
                    .map(Some)
                    .map_err(|_| Error::PropertyFile(format!("bad value for key `{}`", key))),
            }
        }

        let version: u32 = parse(&map, "version")?.unwrap_or(0);
        if version != 0 {
            return Err(Error::UnsupportedVersion(version));
        }

        let nodes = parse(&map, "nodes")?
            .ok_or_else(|| Error::PropertyFile("missing key `nodes`".into()))?;
        let arcs = parse(&map, "arcs")?
            .ok_or_else(|| Error::PropertyFile("missing key `arcs`".into()))?;
        let window_size = parse(&map, "windowsize")?.unwrap_or(7);
        let max_ref_count = parse(&map, "maxrefcount")?.unwrap_or(3);
        let min_interval_length = parse(&map, "minintervallength")?.unwrap_or(3);
        let zeta_k = parse(&map, "zetak")?.unwrap_or(3);
        let bits_per_link = parse(&map, "bitsperlink")?.unwrap_or(0.0);

        let mut flags = CompFlags {
            residuals: Code::Zeta { k: zeta_k },
            ..CompFlags::default()
        };
        if let Some(list) = map.get("compressionflags") {
            for token in list
                .split(|c: char| c.is_whitespace() || c == '|')
                .filter(|t| !t.is_empty())
            {
                let (field, code) = token
                    .rsplit_once('_')
                    .ok_or_else(|| Error::CompressionFlag(token.into()))?;
                let code = CompFlags::code_from_str(code, zeta_k)
                    .ok_or_else(|| Error::CompressionFlag(token.into()))?;
                match field {
                    "OUTDEGREES" => flags.outdegrees = code,
                    "REFERENCES" | "REFERENCE" => flags.references = code,
                    "BLOCKS" => {
                        flags.block_count = code;
                        flags.blocks = code;
                    }
                    "BLOCK_COUNT" => flags.block_count = code,
                    "INTERVALS" => {
                        flags.interval_count = code;
                        flags.interval_start = code;
                        flags.interval_len = code;
                    }
                    "INTERVAL_COUNT" => flags.interval_count = code,
                    "RESIDUALS" => flags.residuals = code,
                    "OFFSETS" => flags.offsets = code,
                    _ => return Err(Error::CompressionFlag(token.into())),
                }
            }
        }

        Ok(Properties {
            nodes,
            arcs,
            window_size,
            max_ref_count,
            min_interval_length,
            zeta_k,
            bits_per_link,
            version,
            flags,
        })
    }
}
