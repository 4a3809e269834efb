//! Progressive weight-level refinement shared by the non-bipartite strategies.
//!
//! Levels run from the heaviest edge weight down to 1. Each level solves the view
//! of the current partition representatives restricted to edges at least that
//! heavy; the partitions it creates are then checked against the full graph before
//! the next level may merge them further.

use super::{Context, Strategy, coloring, ts, ttt};
use crate::disjoint_set::DisjointSet;
use crate::graph::SubGraph;
use log::debug;
use std::collections::BTreeSet;

/// Runs `strategy` to completion and returns the solved partition.
pub(super) fn solve<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    strategy: Strategy,
    all_edges: bool,
) -> DisjointSet {
    let graph = ctx.graph;
    let n = graph.vertex_count();
    let mut ds = DisjointSet::new(n);
    if n == 0 {
        return ds;
    }

    if all_edges || n > ctx.config.refinement_vertex_limit {
        debug!("single pass over {n} vertices and {} edges", graph.edge_count());
        run_strategy(ctx, strategy, graph.complete_view(), &mut ds);
        return ds;
    }

    let mut disabled = vec![false; graph.edge_count()];
    let mut support: BTreeSet<usize> = (0..n).collect();
    for level in (1..=graph.max_level()).rev() {
        if support.len() < 2 {
            break;
        }
        let view = graph.view(&support, level, &disabled);
        debug!(
            "level {level}: {} representatives, {} edges",
            support.len(),
            view.edges().count()
        );
        run_strategy(ctx, strategy, view, &mut ds);
        support = validate_partitions(ctx, &mut ds, &mut disabled);
    }
    ds
}

fn run_strategy<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    strategy: Strategy,
    view: SubGraph,
    ds: &mut DisjointSet,
) {
    match strategy {
        Strategy::Coloring => coloring::cover(ctx, &view, ds),
        Strategy::Ttt { fast } => ttt::cover(ctx, view, ds, fast),
        Strategy::Ts => {
            let priority: Vec<usize> = (0..ctx.graph.vertex_count()).collect();
            ts::cover(ctx, view, ds, &priority);
        }
        Strategy::Rts => ts::cover_randomized(ctx, view, ds),
    }
}

/// Disables every edge between two representatives whose partitions are not
/// pairwise compatible in the full graph; returns the representatives that keep
/// at least one enabled edge.
fn validate_partitions<V: Clone + Ord>(
    ctx: &Context<'_, V>,
    ds: &mut DisjointSet,
    disabled: &mut [bool],
) -> BTreeSet<usize> {
    let graph = ctx.graph;
    let groups = ds.partitions();
    let mut support = BTreeSet::new();
    let mut newly_disabled = 0usize;

    for (id, edge) in graph.edges().iter().enumerate() {
        if disabled[id] {
            continue;
        }
        let (Some(ga), Some(gb)) = (groups.get(&edge.a), groups.get(&edge.b)) else {
            continue;
        };
        let compatible = ga
            .iter()
            .all(|&u| gb.iter().all(|&v| graph.has_edge(u, v)));
        if compatible {
            support.insert(edge.a);
            support.insert(edge.b);
        } else {
            disabled[id] = true;
            newly_disabled += 1;
        }
    }
    debug!(
        "{} partitions, {newly_disabled} edges disabled, {} representatives remain",
        groups.len(),
        support.len()
    );
    support
}
