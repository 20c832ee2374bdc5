/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bvg::prelude::*;

const TOY: &str = "tests/data/toy";
const WEB8: &str = "tests/data/web8";
const LOOP1: &str = "tests/data/loop1";
const EMPTY: &str = "tests/data/empty";
const NIB: &str = "tests/data/nib";

const WEB8_SUCCESSORS: [&[u64]; 8] = [
    &[1, 2, 3, 7],
    &[1, 2, 3, 7],
    &[2, 3, 7],
    &[],
    &[0, 1, 2, 3],
    &[0, 7],
    &[0, 1, 2, 3],
    &[6, 7],
];

fn sequential_lists(graph: &BvGraph) -> Vec<Vec<u64>> {
    graph
        .iter()
        .unwrap()
        .map(|r| r.unwrap().1)
        .collect::<Vec<_>>()
}

#[test]
fn test_toy_sequential() {
    let graph = BvGraph::load(TOY, 0).unwrap();
    assert_eq!(graph.num_nodes(), 4);
    assert_eq!(graph.num_arcs(), 5);
    let lists = sequential_lists(&graph);
    assert_eq!(lists[0], vec![1, 2]);
    assert_eq!(lists[1], vec![2]);
    assert_eq!(lists[2], vec![3]);
    assert_eq!(lists[3], vec![0]);
}

#[test]
fn test_toy_random() {
    let graph = BvGraph::load(TOY, 1).unwrap();
    let mut iter = graph.random_iter().unwrap();
    assert_eq!(iter.successors(0).unwrap(), [1, 2]);
    assert_eq!(iter.successors(2).unwrap(), [3]);
    assert_eq!(iter.successors(3).unwrap(), [0]);
    assert_eq!(iter.outdegree(0).unwrap(), 2);
    assert_eq!(iter.outdegree(3).unwrap(), 1);
}

#[test]
fn test_outedges_accessor() {
    let graph = BvGraph::load(TOY, 0).unwrap();
    let mut iter = graph.iter().unwrap();
    assert!(iter.outedges().is_empty());
    iter.next_successors().unwrap();
    assert_eq!(iter.outedges(), [1, 2]);
    iter.next_successors().unwrap();
    assert_eq!(iter.outedges(), [2]);
}

#[test]
fn test_web8_sequential() {
    let graph = BvGraph::load(WEB8, 0).unwrap();
    let lists = sequential_lists(&graph);
    for (node, expected) in WEB8_SUCCESSORS.iter().enumerate() {
        assert_eq!(lists[node], *expected, "node {}", node);
    }
}

#[test]
fn test_sequential_equals_random() {
    for basename in [TOY, WEB8, LOOP1] {
        for offset_step in [1, 2] {
            let graph = BvGraph::load(basename, offset_step).unwrap();
            let mut random = graph.random_iter().unwrap();
            let mut sequential = graph.iter().unwrap();
            while sequential.valid() {
                let node = sequential.curr();
                let seq = sequential.next_successors().unwrap().to_vec();
                let rand = random.successors(node).unwrap();
                assert_eq!(seq, rand, "{} node {}", basename, node);
            }
        }
    }
}

#[test]
fn test_degree_consistency() {
    let graph = BvGraph::load(WEB8, 2).unwrap();
    let mut iter = graph.random_iter().unwrap();
    for node in 0..graph.num_nodes() {
        let degree = iter.outdegree(node).unwrap();
        assert_eq!(degree, iter.successors(node).unwrap().len() as u64);
    }
}

#[test]
fn test_monotone_and_in_range() {
    for basename in [TOY, WEB8, LOOP1] {
        let graph = BvGraph::load(basename, 0).unwrap();
        for list in sequential_lists(&graph) {
            assert!(list.windows(2).all(|w| w[0] < w[1]));
            assert!(list.iter().all(|&succ| succ < graph.num_nodes()));
        }
    }
}

#[test]
fn test_edge_count() {
    for basename in [TOY, WEB8, LOOP1, EMPTY, NIB] {
        let graph = BvGraph::load(basename, 0).unwrap();
        let total: u64 = sequential_lists(&graph)
            .iter()
            .map(|l| l.len() as u64)
            .sum();
        assert_eq!(total, graph.num_arcs(), "{}", basename);
    }
}

#[test]
fn test_dangling_and_self_loops() {
    let graph = BvGraph::load(WEB8, 0).unwrap();
    let lists = sequential_lists(&graph);
    let dangling = lists.iter().filter(|l| l.is_empty()).count();
    let self_loops = lists
        .iter()
        .enumerate()
        .filter(|(node, l)| l.binary_search(&(*node as u64)).is_ok())
        .count();
    assert_eq!(dangling, 1);
    assert_eq!(self_loops, 3);

    let graph = BvGraph::load(TOY, 0).unwrap();
    let lists = sequential_lists(&graph);
    assert_eq!(lists.iter().filter(|l| l.is_empty()).count(), 0);
    assert_eq!(
        lists
            .iter()
            .enumerate()
            .filter(|(node, l)| l.contains(&(*node as u64)))
            .count(),
        0
    );
}

#[test]
fn test_single_self_loop() {
    let graph = BvGraph::load(LOOP1, 1).unwrap();
    assert_eq!(graph.num_nodes(), 1);
    assert_eq!(graph.num_arcs(), 1);
    let mut iter = graph.random_iter().unwrap();
    assert_eq!(iter.successors(0).unwrap(), [0]);
}

#[test]
fn test_empty_graph() {
    let graph = BvGraph::load(EMPTY, 0).unwrap();
    assert_eq!(graph.num_nodes(), 0);
    let mut iter = graph.iter().unwrap();
    assert!(!iter.valid());
    assert!(iter.next().is_none());
}

#[test]
fn test_signed_residual_to_predecessor() {
    // node 7's first residual is node 6, stored as a negative zig-zag
    // offset; random access must agree with the sequential scan on it
    let graph = BvGraph::load(WEB8, 1).unwrap();
    let mut iter = graph.random_iter().unwrap();
    assert_eq!(iter.successors(7).unwrap(), [6, 7]);
}

#[test]
fn test_reference_chain() {
    // node 2 references node 1, which references node 0: resolving it
    // from a cold cache walks a two-level chain, within maxrefcount
    let graph = BvGraph::load(WEB8, 1).unwrap();
    let mut iter = graph.random_iter().unwrap();
    assert_eq!(iter.successors(2).unwrap(), [2, 3, 7]);
    // again, now warm
    assert_eq!(iter.successors(2).unwrap(), [2, 3, 7]);
}

#[test]
fn test_random_access_in_any_order() {
    let graph = BvGraph::load(WEB8, 2).unwrap();
    let mut iter = graph.random_iter().unwrap();
    for node in [7, 0, 6, 2, 4, 1, 3, 5, 2, 7, 0] {
        assert_eq!(
            iter.successors(node).unwrap(),
            WEB8_SUCCESSORS[node as usize],
            "node {}",
            node
        );
    }
}

#[test]
fn test_iterators_are_independent() {
    let graph = BvGraph::load(WEB8, 1).unwrap();
    let mut a = graph.random_iter().unwrap();
    let mut b = graph.random_iter().unwrap();
    assert_eq!(a.successors(4).unwrap(), [0, 1, 2, 3]);
    assert_eq!(b.successors(7).unwrap(), [6, 7]);
    assert_eq!(a.successors(4).unwrap(), [0, 1, 2, 3]);
}

#[test]
fn test_nibble_coded_outdegrees() {
    // out-degrees routed through the nibble code by compressionflags
    let graph = BvGraph::load(NIB, 1).unwrap();
    assert_eq!(graph.properties().flags.outdegrees, Code::Nibble);
    let lists = sequential_lists(&graph);
    assert_eq!(lists[0], vec![1]);
    assert!(lists[1].is_empty());
    let mut iter = graph.random_iter().unwrap();
    assert_eq!(iter.successors(0).unwrap(), [1]);
    assert_eq!(iter.outdegree(1).unwrap(), 0);
}

#[test]
fn test_vertex_out_of_range() {
    let graph = BvGraph::load(TOY, 1).unwrap();
    let mut iter = graph.random_iter().unwrap();
    assert!(matches!(
        iter.successors(4),
        Err(Error::VertexOutOfRange(4))
    ));
    assert!(matches!(
        iter.outdegree(100),
        Err(Error::VertexOutOfRange(100))
    ));
}

#[test]
fn test_random_access_requires_offsets() {
    let graph = BvGraph::load(TOY, 0).unwrap();
    assert!(matches!(graph.random_iter(), Err(Error::RequiresOffsets)));
    assert!(matches!(graph.offset(0), Err(Error::RequiresOffsets)));
}

#[test]
fn test_sequential_on_disk() {
    // offset_step -1 leaves the graph on disk but still iterates
    let graph = BvGraph::load(WEB8, -1).unwrap();
    let lists = sequential_lists(&graph);
    for (node, expected) in WEB8_SUCCESSORS.iter().enumerate() {
        assert_eq!(lists[node], *expected, "node {}", node);
    }
    assert!(matches!(graph.random_iter(), Err(Error::RequiresOffsets)));
}

#[test]
fn test_random_access_on_disk() {
    // offset_step below -1: graph on disk plus an Elias-Fano index
    let graph = BvGraph::load(WEB8, -2).unwrap();
    let mut iter = graph.random_iter().unwrap();
    for (node, expected) in WEB8_SUCCESSORS.iter().enumerate() {
        assert_eq!(iter.successors(node as u64).unwrap(), *expected);
    }
}

#[test]
fn test_offset_step_budget() {
    // 8n = 64 bytes: a 64-byte budget fits dense offsets, 63 does not,
    // and both must serve identical successor lists
    for budget in [63, 64, 1000] {
        let graph = BvGraph::load(WEB8, budget).unwrap();
        let mut iter = graph.random_iter().unwrap();
        for (node, expected) in WEB8_SUCCESSORS.iter().enumerate() {
            assert_eq!(iter.successors(node as u64).unwrap(), *expected);
        }
    }
}
