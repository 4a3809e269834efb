//! Bipartite-matching covering.
//!
//! Vertices are grouped into exclusivity groups whose members must land in
//! distinct cliques. Groups are placed one at a time into a row of clique slots
//! (columns) by a min-cost assignment; when a group does not fit, one more column
//! is opened and placement restarts from scratch.

use super::{Context, ResourceBounds};
use crate::assignment::solve_min_cost_assignment;
use crate::coloring::dsatur_coloring;
use crate::disjoint_set::DisjointSet;
use crate::error::{CoverError, Result};
use crate::graph::VertexId;
use log::debug;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

/// Extra cost of opening an empty slot, so that joining a compatible clique wins.
pub const OPEN_SLOT_PENALTY: i64 = 32;

/// Exclusivity groups: explicit subpartitions, or the color classes of the
/// compatibility graph when none are given. Vertices left out form singletons.
/// Ordered by decreasing size, then by id.
fn exclusivity_groups<V: Clone + Ord>(
    ctx: &Context<'_, V>,
    subpartitions: &BTreeMap<usize, BTreeSet<VertexId>>,
) -> Vec<Vec<usize>> {
    let graph = ctx.graph;
    let n = graph.vertex_count();
    let mut groups: Vec<(usize, Vec<usize>)> = if subpartitions.is_empty() {
        let adj: Vec<Vec<usize>> = (0..n)
            .map(|v| graph.neighbors(VertexId(v)).map(|(u, _)| u.index()).collect())
            .collect();
        dsatur_coloring(&adj).classes().into_iter().enumerate().collect()
    } else {
        subpartitions
            .iter()
            .map(|(&id, members)| (id, members.iter().map(|v| v.index()).collect()))
            .collect()
    };

    let mut covered = vec![false; n];
    for (_, members) in &groups {
        for &v in members {
            covered[v] = true;
        }
    }
    let next_id = groups.iter().map(|(id, _)| id + 1).max().unwrap_or(0);
    groups.extend(
        (0..n)
            .filter(|&v| !covered[v])
            .map(|v| (next_id + v, vec![v])),
    );
    groups.sort_by_key(|(id, members)| (Reverse(members.len()), *id));
    groups.into_iter().map(|(_, members)| members).collect()
}

/// For every vertex, the positions in `groups` of the groups holding it.
fn memberships(n: usize, groups: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut of = vec![Vec::new(); n];
    for (gi, members) in groups.iter().enumerate() {
        for &v in members {
            of[v].push(gi);
        }
    }
    of
}

/// Returns whether `u` and `v` belong to a common exclusivity group.
fn share_group(membership: &[Vec<usize>], u: usize, v: usize) -> bool {
    membership[u].iter().any(|g| membership[v].contains(g))
}

/// Solves the bipartite-matching cover.
///
/// # Errors
/// Returns [`CoverError::ResourceBindingInfeasible`] when more columns than
/// `bounds.max` (or the vertex count) would be needed.
pub(super) fn cover<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    subpartitions: &BTreeMap<usize, BTreeSet<VertexId>>,
    bounds: &ResourceBounds,
) -> Result<DisjointSet> {
    let graph = ctx.graph;
    let n = graph.vertex_count();
    if n == 0 {
        return Ok(DisjointSet::new(0));
    }

    let groups = exclusivity_groups(ctx, subpartitions);
    let membership = memberships(n, &groups);
    let largest = groups.first().map_or(1, Vec::len);
    let mut cols = largest
        .max(bounds.min.unwrap_or(0))
        .max(bounds.suggest_min.unwrap_or(0))
        .max(1);
    let cap = bounds.max.unwrap_or_else(|| n.max(cols));
    debug!("{} groups, starting with {cols} columns (cap {cap})", groups.len());

    'restart: loop {
        if cols > cap {
            return Err(CoverError::ResourceBindingInfeasible {
                required: cols,
                max: cap,
            });
        }

        ctx.check.initialize_structures(graph);
        let mut ds = DisjointSet::new(n);
        let mut slots: Vec<Vec<usize>> = vec![Vec::new(); cols];
        let mut slot_of: Vec<Option<usize>> = vec![None; n];

        for rows in &groups {
            let shared: &Context<'_, V> = ctx;
            let placement = Placement {
                ds: &ds,
                slots: &slots,
                slot_of: &slot_of,
                membership: &membership,
            };
            let arc = |r: usize, c: usize| arc_cost(shared, &placement, r, c);
            let fits = rows.len() <= cols
                && rows.iter().all(|&r| (0..cols).any(|c| arc(r, c).is_some()));
            let assignment = if fits {
                solve_min_cost_assignment(rows.len(), cols, |i, c| arc(rows[i], c))
            } else {
                None
            };
            let Some(assignment) = assignment else {
                cols += 1;
                debug!("group of {} did not fit, retrying with {cols} columns", rows.len());
                continue 'restart;
            };

            for (i, &c) in assignment.iter().enumerate() {
                let row = rows[i];
                if slot_of[row].is_some() {
                    continue;
                }
                if let Some(&anchor) = slots[c].first() {
                    ctx.join(&mut ds, anchor, row);
                }
                slots[c].push(row);
                slot_of[row] = Some(c);
            }
        }

        debug!(
            "bipartite matching used {} of {cols} columns",
            slots.iter().filter(|s| !s.is_empty()).count()
        );
        return Ok(ds);
    }
}

/// Slot contents of one placement attempt.
struct Placement<'a> {
    ds: &'a DisjointSet,
    slots: &'a [Vec<usize>],
    slot_of: &'a [Option<usize>],
    membership: &'a [Vec<usize>],
}

/// Cost of placing `row` into slot `c`, or `None` if the arc is forbidden.
fn arc_cost<V: Clone + Ord>(
    ctx: &Context<'_, V>,
    placement: &Placement<'_>,
    row: usize,
    c: usize,
) -> Option<i64> {
    if let Some(own) = placement.slot_of[row] {
        return (own == c).then_some(1);
    }
    let graph = ctx.graph;
    let members = &placement.slots[c];
    if members.is_empty() {
        let single = BTreeSet::from([VertexId(row)]);
        return Some(1 + ctx.filter.clique_cost(&single, graph) as i64 + OPEN_SLOT_PENALTY);
    }

    if !members.iter().all(|&m| graph.has_edge(m, row)) {
        return None;
    }
    // Members of a common group never share a slot.
    if members.iter().any(|&m| share_group(placement.membership, m, row)) {
        return None;
    }
    let mut extended: BTreeSet<VertexId> = members.iter().copied().map(VertexId).collect();
    extended.insert(VertexId(row));
    if ctx.filter.select_candidate_to_remove(&extended, graph).is_some() {
        return None;
    }
    let rep = placement.ds.find_const(members[0]);
    if !ctx.check.check_edge_compatibility(VertexId(rep), VertexId(row)) {
        return None;
    }

    let mean_weight = graph.weight_into(row, members.iter().copied()) / members.len() as u64;
    let shortfall = i64::from(graph.max_weight()) - mean_weight as i64;
    Some(1 + ctx.filter.clique_cost(&extended, graph) as i64 + shortfall)
}

// ============================================================================
// Tests
// ============================================================================
