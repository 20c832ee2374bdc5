/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bvg::prelude::*;
use std::fs;

/// Offsets recomputed from a sequential scan, the ground truth.
fn scanned_offsets(graph: &BvGraph) -> Vec<u64> {
    let mut iter = graph.iter().unwrap();
    let mut offsets = Vec::new();
    while iter.valid() {
        offsets.push(iter.tell());
        iter.next_successors().unwrap();
    }
    offsets
}

#[test]
fn test_dense_offsets_match_scan() {
    let graph = BvGraph::load("tests/data/web8", 1).unwrap();
    for (node, expected) in scanned_offsets(&graph).into_iter().enumerate() {
        assert_eq!(graph.offset(node as u64).unwrap(), expected);
    }
}

#[test]
fn test_elias_fano_offsets_match_scan() {
    for basename in ["tests/data/toy", "tests/data/web8", "tests/data/loop1"] {
        let graph = BvGraph::load(basename, 2).unwrap();
        for (node, expected) in scanned_offsets(&graph).into_iter().enumerate() {
            assert_eq!(graph.offset(node as u64).unwrap(), expected, "{}", basename);
        }
    }
}

#[test]
fn test_offsets_rebuilt_without_offsets_file() {
    // copy the fixture without its .offsets companion: the loader falls
    // back to a sequential scan and random access still works
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("web8");
    for ext in ["graph", "properties"] {
        fs::copy(
            format!("tests/data/web8.{}", ext),
            base.with_extension(ext),
        )
        .unwrap();
    }
    for offset_step in [1, 2] {
        let graph = BvGraph::load(&base, offset_step).unwrap();
        let mut iter = graph.random_iter().unwrap();
        assert_eq!(iter.successors(2).unwrap(), [2, 3, 7]);
        assert_eq!(iter.successors(5).unwrap(), [0, 7]);
    }
}

#[test]
fn test_empty_graph_elias_fano() {
    let graph = BvGraph::load("tests/data/empty", 2).unwrap();
    assert!(matches!(graph.offset(0), Err(Error::VertexOutOfRange(0))));
}

#[test]
fn test_missing_graph_file() {
    assert!(matches!(
        BvGraph::load("tests/data/no-such-graph", 0),
        Err(Error::Io(_))
    ));
}
