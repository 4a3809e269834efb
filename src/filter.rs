//! Callback contracts that let a binding pass veto or price cliques.
//!
//! The engine knows nothing about hardware. A [`FilterClique`] looks at a whole
//! candidate clique and may name a member to evict; a [`CheckClique`] is consulted
//! edge by edge while cliques grow and is told about every join.
//!
//! [`NoFilter`] and [`NoCheck`] accept everything. [`SlackBasedFilter`] and
//! [`SlackAwareCheck`] model the functional-unit binding use case: sharing one unit
//! among several operations adds multiplexer inputs, which cost area and delay.

use crate::graph::{CompatibilityGraph, VertexId};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Traits
// ============================================================================

/// Whole-clique veto and pricing.
pub trait FilterClique<V> {
    /// Returns the member to evict if `candidate` violates an external constraint.
    ///
    /// `graph` doubles as the handle → element converter.
    fn select_candidate_to_remove(
        &self,
        candidate: &BTreeSet<VertexId>,
        graph: &CompatibilityGraph<V>,
    ) -> Option<VertexId>;

    /// Cost of turning `clique` into one resource. Lower is better.
    fn clique_cost(&self, clique: &BTreeSet<VertexId>, graph: &CompatibilityGraph<V>) -> u64;
}

/// Incremental, edge-level check kept in sync with the solver's joins.
pub trait CheckClique<V> {
    /// Resets all state for a fresh solve of `graph`.
    fn initialize_structures(&mut self, graph: &CompatibilityGraph<V>);

    /// Returns whether the clique represented by `rep` may absorb the clique of `other`.
    fn check_edge_compatibility(&self, rep: VertexId, other: VertexId) -> bool;

    /// Returns whether joining `other` into `rep` comes without additional muxes.
    fn check_no_mux_needed(&self, rep: VertexId, other: VertexId) -> bool;

    /// Records that the clique of `child` was merged into the clique of `rep`.
    fn update_after_join(&mut self, rep: VertexId, child: VertexId);

    /// Estimated total cost of a solution with `clique_count` resources.
    fn cost(&self, clique_count: usize) -> f64;

    /// Number of mux inputs introduced so far.
    fn num_mux(&self) -> usize;
}

impl<V, T: FilterClique<V> + ?Sized> FilterClique<V> for &T {
    fn select_candidate_to_remove(
        &self,
        candidate: &BTreeSet<VertexId>,
        graph: &CompatibilityGraph<V>,
    ) -> Option<VertexId> {
        (**self).select_candidate_to_remove(candidate, graph)
    }

    fn clique_cost(&self, clique: &BTreeSet<VertexId>, graph: &CompatibilityGraph<V>) -> u64 {
        (**self).clique_cost(clique, graph)
    }
}

// ============================================================================
// Null objects
// ============================================================================

/// Filter that never evicts and prices every clique at zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFilter;

impl<V> FilterClique<V> for NoFilter {
    #[inline]
    fn select_candidate_to_remove(
        &self,
        _candidate: &BTreeSet<VertexId>,
        _graph: &CompatibilityGraph<V>,
    ) -> Option<VertexId> {
        None
    }

    #[inline]
    fn clique_cost(&self, _clique: &BTreeSet<VertexId>, _graph: &CompatibilityGraph<V>) -> u64 {
        0
    }
}

/// Check that accepts every join.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCheck;

impl<V> CheckClique<V> for NoCheck {
    fn initialize_structures(&mut self, _graph: &CompatibilityGraph<V>) {}

    #[inline]
    fn check_edge_compatibility(&self, _rep: VertexId, _other: VertexId) -> bool {
        true
    }

    #[inline]
    fn check_no_mux_needed(&self, _rep: VertexId, _other: VertexId) -> bool {
        true
    }

    fn update_after_join(&mut self, _rep: VertexId, _child: VertexId) {}

    fn cost(&self, clique_count: usize) -> f64 {
        clique_count as f64
    }

    fn num_mux(&self) -> usize {
        0
    }
}

// ============================================================================
// Mux model
// ============================================================================

/// Linear area / logarithmic delay model of an N-to-1 multiplexer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MuxModel {
    /// Delay of one 2-to-1 level.
    pub delay_per_level: f64,
    /// Area added by each input beyond the first.
    pub area_per_input: f64,
}

impl Default for MuxModel {
    fn default() -> Self {
        Self {
            delay_per_level: 0.5,
            area_per_input: 1.0,
        }
    }
}

impl MuxModel {
    /// Delay of a mux with `inputs` inputs (zero for a single input).
    pub fn delay(&self, inputs: usize) -> f64 {
        if inputs <= 1 {
            return 0.0;
        }
        let levels = usize::BITS - (inputs - 1).leading_zeros();
        self.delay_per_level * f64::from(levels)
    }

    /// Area of a mux with `inputs` inputs (zero for a single input).
    pub fn area(&self, inputs: usize) -> f64 {
        self.area_per_input * inputs.saturating_sub(1) as f64
    }
}

/// Input source of one element: elements sharing a named source feed the resource
/// through the same wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Source {
    Named(u64),
    Own(usize),
}

fn source_of<V: Clone + Ord>(
    sources: &BTreeMap<V, u64>,
    graph: &CompatibilityGraph<V>,
    v: VertexId,
) -> Source {
    sources
        .get(graph.element(v))
        .map_or(Source::Own(v.index()), |&key| Source::Named(key))
}

// ============================================================================
// SlackBasedFilter
// ============================================================================

/// Scheduling data of one operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperationTiming {
    /// Time budget left before the operation misses its deadline.
    pub slack: f64,
    /// Scheduled start time within its control step.
    pub starting_time: f64,
}

impl Default for OperationTiming {
    fn default() -> Self {
        Self {
            slack: f64::INFINITY,
            starting_time: 0.0,
        }
    }
}

/// Evicts operations whose timing or area budget cannot pay for the muxes that
/// sharing one resource introduces.
#[derive(Clone, Debug)]
pub struct SlackBasedFilter<V> {
    timing: BTreeMap<V, OperationTiming>,
    sources: BTreeMap<V, u64>,
    controller_delay: f64,
    resource_area: f64,
    mux: MuxModel,
}

impl<V: Clone + Ord> SlackBasedFilter<V> {
    /// Creates a filter for resources of area `resource_area`.
    pub fn new(resource_area: f64, mux: MuxModel) -> Self {
        Self {
            timing: BTreeMap::new(),
            sources: BTreeMap::new(),
            controller_delay: 0.0,
            resource_area,
            mux,
        }
    }

    /// Sets the delay of the controller driving the mux selectors.
    pub fn with_controller_delay(mut self, controller_delay: f64) -> Self {
        self.controller_delay = controller_delay;
        self
    }

    /// Records the timing of `element`. Unknown elements have unlimited slack.
    pub fn set_timing(&mut self, element: V, timing: OperationTiming) {
        self.timing.insert(element, timing);
    }

    /// Declares that `element` reads its input from source `key`.
    pub fn set_source(&mut self, element: V, key: u64) {
        self.sources.insert(element, key);
    }

    fn mux_inputs(&self, clique: &BTreeSet<VertexId>, graph: &CompatibilityGraph<V>) -> usize {
        clique
            .iter()
            .map(|&v| source_of(&self.sources, graph, v))
            .collect::<BTreeSet<_>>()
            .len()
    }

    fn timing_of(&self, graph: &CompatibilityGraph<V>, v: VertexId) -> OperationTiming {
        self.timing.get(graph.element(v)).copied().unwrap_or_default()
    }
}

impl<V: Clone + Ord> FilterClique<V> for SlackBasedFilter<V> {
    fn select_candidate_to_remove(
        &self,
        candidate: &BTreeSet<VertexId>,
        graph: &CompatibilityGraph<V>,
    ) -> Option<VertexId> {
        let inputs = self.mux_inputs(candidate, graph);
        let total_muxes = inputs.saturating_sub(1);
        if total_muxes == 0 {
            return None;
        }

        let mut max_start = candidate
            .iter()
            .map(|&v| self.timing_of(graph, v).starting_time)
            .fold(0.0_f64, f64::max);
        if max_start < self.controller_delay {
            max_start = self.controller_delay;
        }

        let in_clique_weight =
            |v: VertexId| graph.weight_into(v.index(), candidate.iter().map(|u| u.index()));

        let mut victim: Option<(VertexId, f64)> = None;
        for &v in candidate {
            let t = self.timing_of(graph, v);
            let slack = t.slack - (max_start - t.starting_time);
            victim = match victim {
                None => Some((v, slack)),
                Some((_, best)) if slack < best => Some((v, slack)),
                Some((w, best)) if slack == best && in_clique_weight(v) < in_clique_weight(w) => {
                    Some((v, slack))
                }
                keep => keep,
            };
        }
        let (victim, min_slack) = victim?;

        let unshared_area = candidate.len() as f64 * self.resource_area;
        let evict = min_slack < 0.0
            || self.mux.area(inputs) + self.resource_area >= unshared_area
            || self.mux.delay(inputs) > min_slack;
        evict.then_some(victim)
    }

    fn clique_cost(&self, clique: &BTreeSet<VertexId>, graph: &CompatibilityGraph<V>) -> u64 {
        self.mux_inputs(clique, graph).saturating_sub(1) as u64
    }
}

// ============================================================================
// SlackAwareCheck
// ============================================================================

/// Tracks per-clique slack and input sources while cliques are merged.
#[derive(Clone, Debug)]
pub struct SlackAwareCheck<V> {
    slack_of: BTreeMap<V, f64>,
    source_of: BTreeMap<V, u64>,
    resource_area: f64,
    mux: MuxModel,
    slack: Vec<f64>,
    sources: Vec<BTreeSet<Source>>,
    num_mux: usize,
}

impl<V: Clone + Ord> SlackAwareCheck<V> {
    /// Creates a check pricing resources at `resource_area`.
    pub fn new(resource_area: f64, mux: MuxModel) -> Self {
        Self {
            slack_of: BTreeMap::new(),
            source_of: BTreeMap::new(),
            resource_area,
            mux,
            slack: Vec::new(),
            sources: Vec::new(),
            num_mux: 0,
        }
    }

    /// Records the slack of `element`. Unknown elements have unlimited slack.
    pub fn set_slack(&mut self, element: V, slack: f64) {
        self.slack_of.insert(element, slack);
    }

    /// Declares that `element` reads its input from source `key`.
    pub fn set_source(&mut self, element: V, key: u64) {
        self.source_of.insert(element, key);
    }

    fn joined_inputs(&self, rep: VertexId, other: VertexId) -> usize {
        self.sources[rep.index()]
            .union(&self.sources[other.index()])
            .count()
    }
}

impl<V: Clone + Ord> CheckClique<V> for SlackAwareCheck<V> {
    fn initialize_structures(&mut self, graph: &CompatibilityGraph<V>) {
        let n = graph.vertex_count();
        self.slack = (0..n)
            .map(|i| {
                self.slack_of
                    .get(graph.element(VertexId(i)))
                    .copied()
                    .unwrap_or(f64::INFINITY)
            })
            .collect();
        self.sources = (0..n)
            .map(|i| BTreeSet::from([source_of(&self.source_of, graph, VertexId(i))]))
            .collect();
        self.num_mux = 0;
    }

    fn check_edge_compatibility(&self, rep: VertexId, other: VertexId) -> bool {
        if self.check_no_mux_needed(rep, other) {
            return true;
        }
        let slack = self.slack[rep.index()].min(self.slack[other.index()]);
        self.mux.delay(self.joined_inputs(rep, other)) <= slack
    }

    fn check_no_mux_needed(&self, rep: VertexId, other: VertexId) -> bool {
        self.sources[other.index()].is_subset(&self.sources[rep.index()])
    }

    fn update_after_join(&mut self, rep: VertexId, child: VertexId) {
        let (r, c) = (rep.index(), child.index());
        if r == c {
            return;
        }
        self.num_mux -= self.sources[r].len() - 1 + self.sources[c].len() - 1;
        let moved = std::mem::take(&mut self.sources[c]);
        self.sources[r].extend(moved);
        self.num_mux += self.sources[r].len() - 1;
        self.slack[r] = self.slack[r].min(self.slack[c]);
    }

    fn cost(&self, clique_count: usize) -> f64 {
        clique_count as f64 * self.resource_area + self.num_mux as f64 * self.mux.area_per_input
    }

    fn num_mux(&self) -> usize {
        self.num_mux
    }
}

// ============================================================================
// Tests
// ============================================================================
