/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{Context, Result};
use bvg::prelude::*;
use clap::{Parser, Subcommand};
use dsi_progress_logger::ProgressLogger;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

#[derive(Parser, Debug)]
#[command(about = "Check and benchmark access to a BV graph", long_about = None)]
struct Args {
    /// The basename of the graph.
    basename: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check random access against a sequential scan on randomly drawn nodes.
    Random { nodes: u64 },
    /// Check random access interleaving nodes from the head and the tail.
    HeadTail,
    /// Check random access on every node.
    All,
    /// Measure random access throughput on randomly drawn nodes.
    Perform { nodes: u64 },
    /// Scan the graph sequentially, printing every successor list.
    Iter,
}

/// Collect the whole edge set with a sequential scan.
fn load_all(graph: &BvGraph) -> Result<HashSet<(u64, u64)>> {
    let mut edges = HashSet::with_capacity(graph.num_arcs() as usize);
    let mut pl = ProgressLogger::default();
    pl.item_name = "node".into();
    pl.start("Scanning the graph...");
    let mut iter = graph.iter()?;
    while iter.valid() {
        let node = iter.curr();
        for &succ in iter.next_successors()? {
            edges.insert((node, succ));
        }
        pl.light_update();
    }
    pl.done();
    Ok(edges)
}

fn check_node(
    iter: &mut RandomIter,
    edges: &HashSet<(u64, u64)>,
    node: u64,
) -> Result<u64> {
    let successors = iter.successors(node)?;
    for &succ in successors {
        anyhow::ensure!(
            edges.contains(&(node, succ)),
            "wrong link from node {} to node {}",
            node,
            succ
        );
    }
    Ok(successors.len() as u64)
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    if let Command::Iter = args.command {
        let graph = BvGraph::load(&args.basename, 0)
            .with_context(|| format!("failed to load {}", args.basename))?;
        println!("Input file: {}", args.basename);
        println!("nodes = {}", graph.num_nodes());
        println!("edges = {}", graph.num_arcs());
        let mut iter = graph.iter()?;
        while iter.valid() {
            let node = iter.curr();
            let successors = iter.next_successors()?;
            println!("node {} has degree {}", node, successors.len());
            for succ in successors {
                println!("node {} links to node {}", node, succ);
            }
        }
        return Ok(());
    }

    // everything else is random access: load with dense offsets
    let graph = BvGraph::load(&args.basename, 1)
        .with_context(|| format!("failed to load {}", args.basename))?;
    println!("Input file: {}", args.basename);
    println!("nodes = {}", graph.num_nodes());
    println!("edges = {}", graph.num_arcs());

    match args.command {
        Command::Random { nodes } => {
            let edges = load_all(&graph)?;
            let mut iter = graph.random_iter()?;
            let mut rng = SmallRng::from_entropy();
            for _ in 0..nodes {
                let node = rng.gen_range(0..graph.num_nodes());
                check_node(&mut iter, &edges, node)?;
            }
            println!("Total {} random nodes generated and tested and correct.", nodes);
        }
        Command::HeadTail => {
            let edges = load_all(&graph)?;
            let mut iter = graph.random_iter()?;
            let n = graph.num_nodes();
            for i in 0..n {
                let node = if i % 2 == 0 { i / 2 } else { n - 1 - i / 2 };
                check_node(&mut iter, &edges, node)?;
            }
            println!("All links from head-tail test are tested and correct.");
        }
        Command::All => {
            let edges = load_all(&graph)?;
            let mut iter = graph.random_iter()?;
            for node in 0..graph.num_nodes() {
                let degree = check_node(&mut iter, &edges, node)?;
                println!("node {} has degree {}", node, degree);
            }
        }
        Command::Perform { nodes } => {
            let mut iter = graph.random_iter()?;
            let mut rng = SmallRng::from_entropy();
            let mut edge_count = 0u64;
            let start = std::time::Instant::now();
            for _ in 0..nodes {
                let node = rng.gen_range(0..graph.num_nodes());
                iter.outdegree(node)?;
                edge_count += iter.successors(node)?.len() as u64;
            }
            let elapsed = start.elapsed().as_secs_f64();
            println!(
                "Used {:.2} secs. Edges = {}. Edges per second = {:.2}",
                elapsed,
                edge_count,
                edge_count as f64 / elapsed
            );
        }
        Command::Iter => unreachable!(),
    }

    Ok(())
}
