//! Greedy merge covering (TS) and its randomized multi-start variant (RTS).
//!
//! TS repeatedly contracts the edge whose endpoints share the most neighbors,
//! grows the resulting clique greedily from its representative, then retires it.
//! RTS reruns TS with shuffled vertex priorities and keeps the cheapest partition.

use super::{Context, clique_members};
use crate::disjoint_set::DisjointSet;
use crate::graph::{SubGraph, VertexId};
use log::debug;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xorshift::XorShiftRng;
use std::cmp::Reverse;

/// Sort key of a candidate merge; smaller is better.
type MergeKey = (Reverse<usize>, usize, bool, usize, usize);

fn merge_key<V: Clone + Ord>(
    ctx: &Context<'_, V>,
    view: &SubGraph,
    priority: &[usize],
    s: usize,
    t: usize,
) -> MergeKey {
    let shared = view.shared_neighbors(s, t);
    let invalidated = view.degree(s) + view.degree(t) - shared - 1;
    let needs_mux = !ctx.check.check_no_mux_needed(VertexId(s), VertexId(t));
    let (lo, hi) = if priority[s] <= priority[t] {
        (priority[s], priority[t])
    } else {
        (priority[t], priority[s])
    };
    (Reverse(shared), invalidated, needs_mux, lo, hi)
}

fn is_compliant<V: Clone + Ord>(
    ctx: &Context<'_, V>,
    ds: &mut DisjointSet,
    s: usize,
    t: usize,
) -> bool {
    if !ctx.check.check_edge_compatibility(VertexId(s), VertexId(t)) {
        return false;
    }
    let merged = clique_members(ds, &[s, t]);
    ctx.filter.select_candidate_to_remove(&merged, ctx.graph).is_none()
}

/// Best compliant pair among `candidates`.
fn best_pair<V: Clone + Ord>(
    ctx: &Context<'_, V>,
    view: &SubGraph,
    ds: &mut DisjointSet,
    priority: &[usize],
    candidates: impl Iterator<Item = (usize, usize)>,
) -> Option<(usize, usize)> {
    let mut ranked: Vec<(MergeKey, usize, usize)> = candidates
        .map(|(s, t)| (merge_key(ctx, view, priority, s, t), s, t))
        .collect();
    ranked.sort_unstable();
    ranked
        .into_iter()
        .find(|&(_, s, t)| is_compliant(ctx, ds, s, t))
        .map(|(_, s, t)| (s, t))
}

/// Contracts `a` and `b`, keeping only their common neighbors; returns the survivor.
fn merge<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    view: &mut SubGraph,
    ds: &mut DisjointSet,
    a: usize,
    b: usize,
) -> usize {
    let na: Vec<usize> = view.neighbors(a).keys().copied().collect();
    let nb: Vec<usize> = view.neighbors(b).keys().copied().collect();
    for &x in &na {
        if x != b && !view.has_edge(b, x) {
            view.remove_edge(a, x);
        }
    }
    for &x in &nb {
        if x != a && !view.has_edge(a, x) {
            view.remove_edge(b, x);
        }
    }
    let rep = ctx.join(ds, a, b);
    view.remove_vertex(if rep == a { b } else { a });
    rep
}

/// Greedy merge covering of `view`; ties are broken by `priority[v]` (lower first).
pub(super) fn cover<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    mut view: SubGraph,
    ds: &mut DisjointSet,
    priority: &[usize],
) {
    loop {
        view.remove_isolated();
        if view.support().len() < 2 {
            break;
        }
        let Some((s, t)) = best_pair(ctx, &view, ds, priority, view.edges().map(|(s, t, _)| (s, t)))
        else {
            break;
        };

        let mut rep = merge(ctx, &mut view, ds, s, t);
        let mut size = 2;
        while let Some((_, next)) = best_pair(
            ctx,
            &view,
            ds,
            priority,
            view.neighbors(rep).keys().map(move |&n| (rep, n)),
        ) {
            rep = merge(ctx, &mut view, ds, rep, next);
            size += 1;
        }
        debug!("greedy clique of {size} representatives closed at {rep}");
        view.remove_vertex(rep);
    }
}

/// Runs TS `min(|support|, rts_max_runs)` times and keeps the cheapest partition.
///
/// Costs are summed [`FilterClique::clique_cost`](crate::filter::FilterClique::clique_cost)
/// values, ties broken by clique count. The check is re-initialized before every run
/// and finally replayed with the winner's joins.
pub(super) fn cover_randomized<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    view: SubGraph,
    ds: &mut DisjointSet,
) {
    let graph = ctx.graph;
    let runs = view.support().len().min(ctx.config.rts_max_runs).max(1);
    let start = ds.clone();
    let mut best: Option<((u64, usize), DisjointSet)> = None;

    for run in 0..runs {
        let priority = run_priority(graph.vertex_count(), ctx.config.seed, run);
        ctx.check.initialize_structures(graph);
        let mut trial = start.clone();
        cover(ctx, view.clone(), &mut trial, &priority);
        let score = (ctx.partition_cost(&mut trial), trial.partitions().len());
        debug!("randomized run {run}: cost {}, {} cliques", score.0, score.1);
        if best.as_ref().is_none_or(|(b, _)| score < *b) {
            best = Some((score, trial));
        }
    }

    let Some((score, mut winner)) = best else {
        return;
    };
    debug!("best randomized run: cost {}, {} cliques", score.0, score.1);
    ctx.check.initialize_structures(graph);
    *ds = start;
    for group in winner.partitions().into_values() {
        if let Some((&first, rest)) = group.split_first() {
            for &m in rest {
                ctx.join(ds, first, m);
            }
        }
    }
}

/// Vertex priorities of one run: identity for run 0, a seeded shuffle otherwise.
fn run_priority(n: usize, seed: u64, run: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    if run == 0 {
        return order;
    }
    let mut rng = XorShiftRng::seed_from_u64(splitmix64(seed ^ run as u64));
    order.shuffle(&mut rng);
    let mut priority = vec![0; n];
    for (rank, &v) in order.iter().enumerate() {
        priority[v] = rank;
    }
    priority
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================
