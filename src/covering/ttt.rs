//! Peel-and-repeat covering driven by a Tomita-style maximum-weight clique search.
//!
//! The search keeps `SUBG` (vertices still able to extend the current clique `Q`)
//! and `CAND` (vertices still to branch on). Branching is restricted to
//! `CAND - N(u)` for a pivot `u`, which enumerates every maximal clique once.

use super::{Context, clique_members};
use crate::disjoint_set::DisjointSet;
use crate::graph::SubGraph;
use log::debug;
use std::collections::BTreeSet;

// ============================================================================
// MaxWeightClique
// ============================================================================

/// Branch-and-bound state of one clique extraction.
pub(crate) struct MaxWeightClique<'a> {
    view: &'a SubGraph,
    fast: bool,
    upper_bound: i64,
    q: Vec<usize>,
    w_q: i64,
    q_max: Vec<usize>,
    w_q_max: i64,
}

impl<'a> MaxWeightClique<'a> {
    /// Prepares a search over `view`.
    ///
    /// The exhaustive search stops once it holds a clique weighing at least
    /// `upper_bound`; the fast one stops at the first maximal clique.
    pub(crate) fn new(view: &'a SubGraph, fast: bool, upper_bound: i64) -> Self {
        Self {
            view,
            fast,
            upper_bound,
            q: Vec::new(),
            w_q: 0,
            q_max: Vec::new(),
            w_q_max: -1,
        }
    }

    /// Runs the search; returns the best clique (sorted) and its edge weight.
    pub(crate) fn solve(mut self) -> (Vec<usize>, i64) {
        let all = self.view.support().clone();
        self.expand(all.clone(), all);
        let Self { mut q_max, w_q_max, .. } = self;
        q_max.sort_unstable();
        (q_max, w_q_max)
    }

    #[inline]
    fn done(&self) -> bool {
        if self.fast {
            self.w_q_max >= 0
        } else {
            self.upper_bound <= self.w_q_max
        }
    }

    fn expand(&mut self, subg: BTreeSet<usize>, mut cand: BTreeSet<usize>) {
        if self.done() {
            return;
        }
        if subg.is_empty() {
            if self.q.len() >= self.q_max.len()
                && (self.q.len() > self.q_max.len() || self.w_q > self.w_q_max)
            {
                self.q_max.clone_from(&self.q);
                self.w_q_max = self.w_q;
            }
            return;
        }
        if cand.is_empty() {
            return;
        }

        let view = self.view;
        let pivot_score = |u: usize| -> i64 {
            view.neighbors(u)
                .iter()
                .filter(|&(v, _)| cand.contains(v))
                .map(|(_, &w)| i64::from(w))
                .sum()
        };
        let mut pivot = usize::MAX;
        let mut best_score = -1;
        for &u in &subg {
            let score = pivot_score(u);
            if score > best_score {
                best_score = score;
                pivot = u;
            }
        }

        let mut ext: BTreeSet<usize> = cand
            .iter()
            .copied()
            .filter(|&v| !view.has_edge(pivot, v))
            .collect();

        while !ext.is_empty() {
            if self.done() {
                return;
            }
            let mut q = usize::MAX;
            let mut best_weight = -1;
            for &v in &ext {
                let w = view.incident_weight(v);
                if w > best_weight {
                    best_weight = w;
                    q = v;
                }
            }

            let added: i64 = self
                .q
                .iter()
                .filter_map(|p| view.neighbors(q).get(p))
                .map(|&w| i64::from(w))
                .sum();
            self.q.push(q);
            self.w_q += added;

            let nq = view.neighbors(q);
            let subg_q = subg.iter().copied().filter(|v| nq.contains_key(v)).collect();
            let cand_q = cand.iter().copied().filter(|v| nq.contains_key(v)).collect();
            self.expand(subg_q, cand_q);

            self.q.pop();
            self.w_q -= added;
            cand.remove(&q);
            ext.remove(&q);
        }
    }
}

// ============================================================================
// Covering
// ============================================================================

/// Peels maximum-weight cliques off `view` until no edge remains.
pub(super) fn cover<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    mut view: SubGraph,
    ds: &mut DisjointSet,
    fast: bool,
) {
    view.remove_isolated();
    let mut upper_bound = i64::MAX;

    while !view.support().is_empty() {
        let (mut reps, weight) = MaxWeightClique::new(&view, fast, upper_bound).solve();
        if reps.is_empty() {
            break;
        }
        if !fast {
            upper_bound = weight;
        }

        while reps.len() > 1 {
            let members = clique_members(ds, &reps);
            let Some(victim) = ctx.filter.select_candidate_to_remove(&members, ctx.graph) else {
                break;
            };
            let victim_rep = ds.find(victim.index());
            let before = reps.len();
            reps.retain(|&r| r != victim_rep);
            if reps.len() == before {
                break;
            }
            debug!("filter evicted {} from a clique of {}", ctx.graph.label(victim), members.len());
        }

        debug!("peeled clique of {} representatives (weight {weight})", reps.len());
        let first = reps[0];
        for &r in &reps[1..] {
            ctx.join(ds, first, r);
        }
        for &r in &reps {
            view.remove_vertex(r);
        }
        view.remove_isolated();
    }
}

// ============================================================================
// Tests
// ============================================================================
