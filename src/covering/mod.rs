//! Clique-covering solver: algorithm selection, resource bounds and result access.
//!
//! A [`CliqueCovering`] owns one compatibility graph. [`CliqueCovering::exec`]
//! partitions its vertices into cliques with the chosen [`Algorithm`]; every
//! strategy works on a [`DisjointSet`] whose final partition is the cover.

mod bipartite;
mod coloring;
mod refine;
mod ts;
mod ttt;

use crate::disjoint_set::DisjointSet;
use crate::error::{CoverError, Result};
use crate::filter::{CheckClique, FilterClique};
use crate::graph::{CompatibilityGraph, MAX_EDGE_WEIGHT, VertexId};
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub use bipartite::OPEN_SLOT_PENALTY;

// ============================================================================
// Algorithm
// ============================================================================

/// Covering strategy.
///
/// The `*Weighted` variants (and [`Algorithm::WeightedColoring`]) walk the edge
/// weights from the highest level down, merging the most beneficial pairs first.
/// The others use every edge at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// DSATUR coloring of the complement graph.
    Coloring,
    /// Coloring with weight-level refinement.
    WeightedColoring,
    /// Exhaustive branch-and-bound maximum-weight clique, peeled repeatedly.
    Ttt,
    /// [`Algorithm::Ttt`] with weight-level refinement.
    TttWeighted,
    /// Branch-and-bound that keeps the first maximal clique found.
    TttFast,
    /// [`Algorithm::TttFast`] with weight-level refinement.
    TttFastWeighted,
    /// Greedy merge along the edge with the most shared neighbors.
    Ts,
    /// [`Algorithm::Ts`] with weight-level refinement.
    TsWeighted,
    /// Best of several randomized [`Algorithm::Ts`] runs.
    Rts,
    /// Min-cost assignment of exclusivity groups into clique slots.
    Bipartite,
}

/// Inner strategy run over one working view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Coloring,
    Ttt { fast: bool },
    Ts,
    Rts,
}

impl Algorithm {
    /// Every algorithm, in declaration order.
    pub const ALL: [Algorithm; 10] = [
        Algorithm::Coloring,
        Algorithm::WeightedColoring,
        Algorithm::Ttt,
        Algorithm::TttWeighted,
        Algorithm::TttFast,
        Algorithm::TttFastWeighted,
        Algorithm::Ts,
        Algorithm::TsWeighted,
        Algorithm::Rts,
        Algorithm::Bipartite,
    ];

    /// Command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Coloring => "coloring",
            Algorithm::WeightedColoring => "weighted-coloring",
            Algorithm::Ttt => "ttt",
            Algorithm::TttWeighted => "ttt-weighted",
            Algorithm::TttFast => "ttt-fast",
            Algorithm::TttFastWeighted => "ttt-fast-weighted",
            Algorithm::Ts => "ts",
            Algorithm::TsWeighted => "ts-weighted",
            Algorithm::Rts => "rts",
            Algorithm::Bipartite => "bipartite",
        }
    }

    /// Returns the inner strategy and whether all edges are used in one pass.
    /// `None` for bipartite matching.
    fn plan(self) -> Option<(Strategy, bool)> {
        match self {
            Algorithm::Coloring => Some((Strategy::Coloring, true)),
            Algorithm::WeightedColoring => Some((Strategy::Coloring, false)),
            Algorithm::Ttt => Some((Strategy::Ttt { fast: false }, true)),
            Algorithm::TttWeighted => Some((Strategy::Ttt { fast: false }, false)),
            Algorithm::TttFast => Some((Strategy::Ttt { fast: true }, true)),
            Algorithm::TttFastWeighted => Some((Strategy::Ttt { fast: true }, false)),
            Algorithm::Ts => Some((Strategy::Ts, true)),
            Algorithm::TsWeighted => Some((Strategy::Ts, false)),
            Algorithm::Rts => Some((Strategy::Rts, true)),
            Algorithm::Bipartite => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an algorithm name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown algorithm `{0}`")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Tuning knobs shared by all strategies.
#[derive(Clone, Debug)]
pub struct CoveringConfig {
    /// Graphs with more vertices skip weight-level refinement.
    pub refinement_vertex_limit: usize,
    /// Largest accepted edge weight.
    pub max_weight: u32,
    /// Upper bound on the number of randomized greedy runs.
    pub rts_max_runs: usize,
    /// Seed of the randomized greedy runs.
    pub seed: u64,
}

impl Default for CoveringConfig {
    fn default() -> Self {
        Self {
            refinement_vertex_limit: 200,
            max_weight: MAX_EDGE_WEIGHT,
            rts_max_runs: 10,
            seed: 0,
        }
    }
}

/// Bounds on the number of output cliques.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceBounds {
    /// Preferred lower bound on bipartite columns.
    pub suggest_min: Option<usize>,
    /// Hard lower bound on bipartite columns.
    pub min: Option<usize>,
    /// Soft upper bound; exceeding it only logs a warning.
    pub suggest_max: Option<usize>,
    /// Hard upper bound.
    pub max: Option<usize>,
}

// ============================================================================
// Solve context
// ============================================================================

/// Borrowed state threaded through one `exec` call.
pub(crate) struct Context<'a, V> {
    pub(crate) graph: &'a CompatibilityGraph<V>,
    pub(crate) filter: &'a dyn FilterClique<V>,
    pub(crate) check: &'a mut dyn CheckClique<V>,
    pub(crate) config: &'a CoveringConfig,
}

impl<V: Clone + Ord> Context<'_, V> {
    /// Merges the sets of `a` and `b`, reporting the join; returns the representative.
    pub(crate) fn join(&mut self, ds: &mut DisjointSet, a: usize, b: usize) -> usize {
        let (ra, rb) = (ds.find(a), ds.find(b));
        if ra == rb {
            return ra;
        }
        let rep = ds.union(ra, rb);
        let child = if rep == ra { rb } else { ra };
        self.check.update_after_join(VertexId(rep), VertexId(child));
        rep
    }

    /// Sum of the filter's clique cost over every set of `ds`.
    pub(crate) fn partition_cost(&self, ds: &mut DisjointSet) -> u64 {
        ds.partitions()
            .values()
            .map(|group| {
                let clique: BTreeSet<VertexId> = group.iter().copied().map(VertexId).collect();
                self.filter.clique_cost(&clique, self.graph)
            })
            .sum()
    }
}

// ============================================================================
// CliqueCovering
// ============================================================================

/// Weighted clique-covering problem plus its latest solution.
#[derive(Clone, Debug)]
pub struct CliqueCovering<V> {
    algorithm: Algorithm,
    config: CoveringConfig,
    graph: CompatibilityGraph<V>,
    subpartitions: BTreeMap<usize, BTreeSet<VertexId>>,
    bounds: ResourceBounds,
    cliques: Vec<BTreeSet<VertexId>>,
}

impl<V: Clone + Ord> CliqueCovering<V> {
    /// Creates a solver using `algorithm` with the default configuration.
    pub fn new(algorithm: Algorithm, vertex_count_hint: usize) -> Self {
        Self::with_config(algorithm, vertex_count_hint, CoveringConfig::default())
    }

    /// Creates a solver with an explicit configuration.
    pub fn with_config(
        algorithm: Algorithm,
        vertex_count_hint: usize,
        config: CoveringConfig,
    ) -> Self {
        Self {
            algorithm,
            graph: CompatibilityGraph::with_capacity(vertex_count_hint, config.max_weight),
            config,
            subpartitions: BTreeMap::new(),
            bounds: ResourceBounds::default(),
            cliques: Vec::new(),
        }
    }

    /// Selected algorithm.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &CoveringConfig {
        &self.config
    }

    /// Underlying compatibility graph.
    #[inline]
    pub fn graph(&self) -> &CompatibilityGraph<V> {
        &self.graph
    }

    /// Current resource bounds.
    #[inline]
    pub fn bounds(&self) -> ResourceBounds {
        self.bounds
    }

    /// Exclusivity groups registered with [`CliqueCovering::add_subpartition`].
    #[inline]
    pub fn subpartitions(&self) -> &BTreeMap<usize, BTreeSet<VertexId>> {
        &self.subpartitions
    }

    /// Adds a vertex. See [`CompatibilityGraph::add_vertex`].
    ///
    /// # Errors
    /// Returns [`CoverError::DuplicateVertex`] if `element` was already added.
    pub fn add_vertex(&mut self, element: V, label: impl Into<String>) -> Result<VertexId> {
        self.graph.add_vertex(element, label)
    }

    /// Adds a compatibility edge. See [`CompatibilityGraph::add_edge`].
    ///
    /// # Errors
    /// Returns [`CoverError::InvalidEdge`] or [`CoverError::UnknownVertex`].
    pub fn add_edge(&mut self, src: &V, dest: &V, weight: u32) -> Result<()> {
        self.graph.add_edge(src, dest, weight)
    }

    /// Puts `element` into exclusivity group `group_id`.
    ///
    /// # Errors
    /// Returns [`CoverError::UnknownVertex`] if `element` was never added.
    pub fn add_subpartition(&mut self, group_id: usize, element: &V) -> Result<()> {
        let id = self
            .graph
            .vertex_id(element)
            .ok_or(CoverError::UnknownVertex { context: "add_subpartition" })?;
        self.subpartitions.entry(group_id).or_default().insert(id);
        Ok(())
    }

    /// Sets the preferred minimum number of resources.
    pub fn suggest_min_resources(&mut self, n: usize) {
        self.bounds.suggest_min = Some(n);
    }

    /// Sets the hard minimum number of resources.
    pub fn min_resources(&mut self, n: usize) {
        self.bounds.min = Some(n);
    }

    /// Sets the soft maximum number of resources.
    pub fn suggest_max_resources(&mut self, n: usize) {
        self.bounds.suggest_max = Some(n);
    }

    /// Sets the hard maximum number of resources.
    pub fn max_resources(&mut self, n: usize) {
        self.bounds.max = Some(n);
    }

    /// Solves the cover from scratch.
    ///
    /// `check` is re-initialized first and sees every join performed by the
    /// returned solution.
    ///
    /// # Errors
    /// Returns [`CoverError::ResourceBindingInfeasible`] when bipartite matching
    /// (requested, or used as fallback for a violated `max_resources`) cannot fit
    /// the vertices into the allowed number of cliques.
    pub fn exec<F, C>(&mut self, filter: &F, check: &mut C) -> Result<()>
    where
        F: FilterClique<V>,
        C: CheckClique<V>,
    {
        self.cliques.clear();
        check.initialize_structures(&self.graph);

        let mut ctx = Context {
            graph: &self.graph,
            filter,
            check,
            config: &self.config,
        };

        let mut ds = match self.algorithm.plan() {
            None => bipartite::cover(&mut ctx, &self.subpartitions, &self.bounds)?,
            Some((strategy, all_edges)) => refine::solve(&mut ctx, strategy, all_edges),
        };
        let mut cliques = collect_cliques(&mut ds);

        if let Some(max) = self.bounds.max {
            if self.algorithm != Algorithm::Bipartite && cliques.len() > max {
                warn!(
                    "{} produced {} cliques, above max_resources {}; \
                     falling back to bipartite matching",
                    self.algorithm,
                    cliques.len(),
                    max
                );
                ctx.check.initialize_structures(ctx.graph);
                ds = bipartite::cover(&mut ctx, &self.subpartitions, &self.bounds)?;
                cliques = collect_cliques(&mut ds);
            }
        }
        if let Some(suggested) = self.bounds.suggest_max {
            if cliques.len() > suggested {
                warn!(
                    "{} cliques exceed suggested maximum of {} resources",
                    cliques.len(),
                    suggested
                );
            }
        }

        info!(
            "{}: {} vertices, {} edges -> {} cliques (cost {:.2}, muxes {})",
            self.algorithm,
            self.graph.vertex_count(),
            self.graph.edge_count(),
            cliques.len(),
            ctx.check.cost(cliques.len()),
            ctx.check.num_mux()
        );
        self.cliques = cliques;
        Ok(())
    }

    /// Number of cliques of the last solution (zero before `exec`).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.cliques.len()
    }

    /// Elements of clique `i`, or `None` if out of range.
    pub fn get_clique(&self, i: usize) -> Option<BTreeSet<V>> {
        self.cliques
            .get(i)
            .map(|c| c.iter().map(|&v| self.graph.element(v).clone()).collect())
    }

    /// Cliques of the last solution as vertex handles, ordered by smallest member.
    #[inline]
    pub fn cliques(&self) -> &[BTreeSet<VertexId>] {
        &self.cliques
    }

    /// Saves a Graphviz rendering of the compatibility graph.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_dot(&self, path: impl AsRef<Path>) -> io::Result<()> {
        self.graph.save_dot(path)
    }
}

/// All members of the sets represented by `reps`.
pub(crate) fn clique_members(ds: &mut DisjointSet, reps: &[usize]) -> BTreeSet<VertexId> {
    ds.expand(reps).into_iter().map(VertexId).collect()
}

fn collect_cliques(ds: &mut DisjointSet) -> Vec<BTreeSet<VertexId>> {
    let mut cliques: Vec<BTreeSet<VertexId>> = ds
        .partitions()
        .into_values()
        .map(|members| members.into_iter().map(VertexId).collect())
        .collect();
    cliques.sort_by_key(|c| c.first().copied());
    cliques
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{MuxModel, NoCheck, NoFilter, SlackAwareCheck, SlackBasedFilter};
    use crate::validate::validate_cover;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn scenario_a(algorithm: Algorithm) -> CliqueCovering<&'static str> {
        let mut cc = CliqueCovering::new(algorithm, 4);
        for name in ["a", "b", "c", "d"] {
            cc.add_vertex(name, name).unwrap();
        }
        cc.add_edge(&"a", &"b", 5).unwrap();
        cc.add_edge(&"a", &"c", 5).unwrap();
        cc.add_edge(&"b", &"c", 3).unwrap();
        cc.add_edge(&"c", &"d", 2).unwrap();
        cc
    }

    fn random_covering(
        rng: &mut XorShiftRng,
        algorithm: Algorithm,
        n: usize,
        p: f64,
    ) -> CliqueCovering<usize> {
        let mut cc = CliqueCovering::new(algorithm, n);
        for v in 0..n {
            cc.add_vertex(v, format!("v{v}")).unwrap();
        }
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.random_bool(p) {
                    cc.add_edge(&a, &b, rng.random_range(1..=MAX_EDGE_WEIGHT)).unwrap();
                }
            }
        }
        cc
    }

    fn sets(cc: &CliqueCovering<&'static str>) -> Vec<BTreeSet<&'static str>> {
        (0..cc.num_vertices()).map(|i| cc.get_clique(i).unwrap()).collect()
    }

    #[test]
    fn algorithm_names_parse_back() {
        for a in Algorithm::ALL {
            assert_eq!(a.to_string().parse::<Algorithm>(), Ok(a));
        }
        assert_eq!("TTT".parse::<Algorithm>(), Ok(Algorithm::Ttt));
        assert!("greedy".parse::<Algorithm>().is_err());
    }

    #[test]
    fn scenario_a_merges_the_triangle() {
        for algorithm in [
            Algorithm::WeightedColoring,
            Algorithm::Ttt,
            Algorithm::TttWeighted,
            Algorithm::TttFast,
            Algorithm::TttFastWeighted,
            Algorithm::Ts,
            Algorithm::TsWeighted,
            Algorithm::Rts,
        ] {
            let mut cc = scenario_a(algorithm);
            cc.exec(&NoFilter, &mut NoCheck).unwrap();
            assert_eq!(
                sets(&cc),
                vec![BTreeSet::from(["a", "b", "c"]), BTreeSet::from(["d"])],
                "{algorithm}"
            );
        }
    }

    #[test]
    fn plain_coloring_finds_a_two_clique_cover() {
        let mut cc = scenario_a(Algorithm::Coloring);
        cc.exec(&NoFilter, &mut NoCheck).unwrap();
        assert_eq!(cc.num_vertices(), 2);
        validate_cover(cc.graph(), cc.cliques(), None).unwrap();
    }

    #[test]
    fn empty_graph_has_no_cliques() {
        for algorithm in Algorithm::ALL {
            let mut cc = CliqueCovering::<u8>::new(algorithm, 0);
            cc.exec(&NoFilter, &mut NoCheck).unwrap();
            assert_eq!(cc.num_vertices(), 0);
            assert!(cc.get_clique(0).is_none());
        }
    }

    #[test]
    fn edgeless_graph_gives_singletons() {
        for algorithm in Algorithm::ALL {
            let mut cc = CliqueCovering::new(algorithm, 3);
            for v in 0..3u8 {
                cc.add_vertex(v, v.to_string()).unwrap();
            }
            cc.exec(&NoFilter, &mut NoCheck).unwrap();
            assert_eq!(cc.num_vertices(), 3, "{algorithm}");
        }
    }

    #[test]
    fn scenario_b_respects_subpartitions() {
        let mut cc = CliqueCovering::new(Algorithm::Bipartite, 6);
        for v in 0..6usize {
            cc.add_vertex(v, format!("op{v}")).unwrap();
        }
        for a in 0..6usize {
            for b in (a + 1)..6 {
                cc.add_edge(&a, &b, 4).unwrap();
            }
        }
        for v in 0..6usize {
            cc.add_subpartition(v / 2, &v).unwrap();
        }
        cc.min_resources(2);
        cc.exec(&NoFilter, &mut NoCheck).unwrap();
        assert!(cc.num_vertices() >= 2);
        let groups: BTreeMap<usize, BTreeSet<VertexId>> = (0..3)
            .map(|g| (g, [VertexId(2 * g), VertexId(2 * g + 1)].into_iter().collect()))
            .collect();
        validate_cover(cc.graph(), cc.cliques(), Some(&groups)).unwrap();
    }

    #[test]
    fn scenario_c_rejects_bad_construction() {
        let mut cc = CliqueCovering::new(Algorithm::Ttt, 2);
        cc.add_vertex("a", "a").unwrap();
        cc.add_vertex("b", "b").unwrap();
        for (src, dest, w) in [("a", "a", 3), ("a", "b", 0), ("a", "b", 32)] {
            assert!(matches!(
                cc.add_edge(&src, &dest, w),
                Err(CoverError::InvalidEdge { .. })
            ));
        }
        assert!(matches!(
            cc.add_vertex("a", "a"),
            Err(CoverError::DuplicateVertex { .. })
        ));
        assert_eq!(
            cc.add_subpartition(0, &"z"),
            Err(CoverError::UnknownVertex { context: "add_subpartition" })
        );
    }

    #[test]
    fn every_algorithm_yields_a_valid_partition() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        for round in 0..12 {
            let n = rng.random_range(1..30);
            let p = [0.2, 0.5, 0.8][round % 3];
            let seed = rng.random::<u64>();
            for algorithm in Algorithm::ALL {
                let mut rng = XorShiftRng::seed_from_u64(seed);
                let mut cc = random_covering(&mut rng, algorithm, n, p);
                cc.exec(&NoFilter, &mut NoCheck).unwrap();
                validate_cover(cc.graph(), cc.cliques(), None)
                    .unwrap_or_else(|e| panic!("{algorithm} on n={n}: {e}"));
            }
        }
    }

    #[test]
    fn large_graphs_skip_refinement_but_stay_valid() {
        let mut rng = XorShiftRng::seed_from_u64(11);
        let config = CoveringConfig {
            refinement_vertex_limit: 8,
            ..CoveringConfig::default()
        };
        for algorithm in [
            Algorithm::WeightedColoring,
            Algorithm::TttWeighted,
            Algorithm::TsWeighted,
        ] {
            let reference = random_covering(&mut rng, algorithm, 20, 0.5);
            let mut cc = CliqueCovering::with_config(algorithm, 20, config.clone());
            for v in 0..20usize {
                cc.add_vertex(v, format!("v{v}")).unwrap();
            }
            for e in reference.graph().edges() {
                cc.add_edge(&e.a, &e.b, e.weight).unwrap();
            }
            cc.exec(&NoFilter, &mut NoCheck).unwrap();
            validate_cover(cc.graph(), cc.cliques(), None).unwrap();
        }
    }

    #[test]
    fn deterministic_algorithms_are_idempotent() {
        let mut rng = XorShiftRng::seed_from_u64(99);
        for algorithm in [
            Algorithm::Coloring,
            Algorithm::WeightedColoring,
            Algorithm::Ttt,
            Algorithm::TttWeighted,
        ] {
            let mut cc = random_covering(&mut rng, algorithm, 25, 0.4);
            cc.exec(&NoFilter, &mut NoCheck).unwrap();
            let first = cc.cliques().to_vec();
            cc.exec(&NoFilter, &mut NoCheck).unwrap();
            assert_eq!(cc.num_vertices(), first.len());
            assert_eq!(cc.cliques(), first.as_slice());
        }
    }

    #[test]
    fn max_resources_is_respected_or_reported() {
        // Two disjoint triangles: two cliques suffice, one never does.
        let build = |algorithm| {
            let mut cc = CliqueCovering::new(algorithm, 6);
            for v in 0..6usize {
                cc.add_vertex(v, format!("v{v}")).unwrap();
            }
            for base in [0, 3] {
                cc.add_edge(&base, &(base + 1), 3).unwrap();
                cc.add_edge(&base, &(base + 2), 3).unwrap();
                cc.add_edge(&(base + 1), &(base + 2), 3).unwrap();
            }
            cc
        };
        for algorithm in Algorithm::ALL {
            let mut cc = build(algorithm);
            cc.max_resources(2);
            cc.exec(&NoFilter, &mut NoCheck).unwrap();
            assert!(cc.num_vertices() <= 2, "{algorithm}");

            let mut cc = build(algorithm);
            cc.max_resources(1);
            assert!(matches!(
                cc.exec(&NoFilter, &mut NoCheck),
                Err(CoverError::ResourceBindingInfeasible { .. })
            ));
            assert_eq!(cc.num_vertices(), 0);
        }
    }

    #[test]
    fn fallback_to_bipartite_when_heuristic_overshoots() {
        // Path 0-1-2-3 with a heavy middle edge: peeling the heaviest clique first
        // leaves 0 and 3 alone.
        let build = || {
            let mut cc = CliqueCovering::new(Algorithm::Ttt, 4);
            for v in 0..4u8 {
                cc.add_vertex(v, v.to_string()).unwrap();
            }
            cc.add_edge(&0, &1, 1).unwrap();
            cc.add_edge(&1, &2, 9).unwrap();
            cc.add_edge(&2, &3, 1).unwrap();
            cc
        };
        let mut unbounded = build();
        unbounded.exec(&NoFilter, &mut NoCheck).unwrap();
        assert_eq!(unbounded.num_vertices(), 3);

        let mut capped = build();
        capped.max_resources(2);
        capped.exec(&NoFilter, &mut NoCheck).unwrap();
        assert_eq!(capped.num_vertices(), 2);
        validate_cover(capped.graph(), capped.cliques(), None).unwrap();
    }

    fn tight_triangle(algorithm: Algorithm) -> CliqueCovering<u32> {
        let mut cc = CliqueCovering::new(algorithm, 3);
        for v in 0..3u32 {
            cc.add_vertex(v, format!("op{v}")).unwrap();
        }
        cc.add_edge(&0, &1, 5).unwrap();
        cc.add_edge(&0, &2, 5).unwrap();
        cc.add_edge(&1, &2, 5).unwrap();
        cc
    }

    #[test]
    fn slack_filter_splits_tight_cliques() {
        let mux = MuxModel { delay_per_level: 1.0, area_per_input: 0.1 };
        let mut filter = SlackBasedFilter::new(10.0, mux);
        for v in 0..3 {
            filter.set_timing(v, crate::filter::OperationTiming { slack: 1.5, starting_time: 0.0 });
        }
        for algorithm in [
            Algorithm::Ttt,
            Algorithm::TttFast,
            Algorithm::Ts,
            Algorithm::Rts,
            Algorithm::Bipartite,
        ] {
            let mut cc = tight_triangle(algorithm);
            let mut check = SlackAwareCheck::new(10.0, mux);
            cc.exec(&filter, &mut check).unwrap();
            // Three inputs need two mux levels; only pairs fit into the slack.
            assert_eq!(cc.num_vertices(), 2, "{algorithm}");
            assert!(cc.cliques().iter().all(|c| c.len() <= 2), "{algorithm}");
            assert_eq!(check.num_mux(), 1, "{algorithm}");
            validate_cover(cc.graph(), cc.cliques(), None).unwrap();
        }
    }

    #[test]
    fn slack_check_keeps_tight_operations_alone() {
        let mux = MuxModel { delay_per_level: 1.0, area_per_input: 1.0 };
        for algorithm in [Algorithm::Ts, Algorithm::Rts, Algorithm::Bipartite] {
            let mut cc = tight_triangle(algorithm);
            let mut check = SlackAwareCheck::new(10.0, mux);
            check.set_slack(1, 0.5);
            cc.exec(&NoFilter, &mut check).unwrap();
            assert!(
                cc.cliques().iter().all(|c| !c.contains(&VertexId(1)) || c.len() == 1),
                "{algorithm}"
            );
            assert_eq!(check.num_mux(), cc.num_vertices() - 1, "{algorithm}");
        }
    }

    #[test]
    fn greedy_merge_prefers_joins_without_muxes() {
        // Path 0-1-2 where 1 and 2 read the same source: merging them is free.
        for algorithm in [Algorithm::Ts, Algorithm::Rts] {
            let mut cc = CliqueCovering::new(algorithm, 3);
            for v in 0..3u32 {
                cc.add_vertex(v, format!("op{v}")).unwrap();
            }
            cc.add_edge(&0, &1, 3).unwrap();
            cc.add_edge(&1, &2, 3).unwrap();
            let mut check = SlackAwareCheck::new(1.0, MuxModel::default());
            check.set_source(1, 7);
            check.set_source(2, 7);
            cc.exec(&NoFilter, &mut check).unwrap();
            let expected: Vec<BTreeSet<VertexId>> = vec![
                BTreeSet::from([VertexId(0)]),
                BTreeSet::from([VertexId(1), VertexId(2)]),
            ];
            assert_eq!(cc.cliques(), expected.as_slice(), "{algorithm}");
            assert_eq!(check.num_mux(), 0, "{algorithm}");
        }
    }

    #[test]
    fn overlapping_subpartitions_stay_feasible() {
        let mut cc = CliqueCovering::new(Algorithm::Bipartite, 4);
        for v in 0..4usize {
            cc.add_vertex(v, format!("op{v}")).unwrap();
        }
        for a in 0..4usize {
            for b in (a + 1)..4 {
                cc.add_edge(&a, &b, 5).unwrap();
            }
        }
        for (group, v) in [(0, 0), (0, 1), (1, 2), (1, 3), (2, 1), (2, 3)] {
            cc.add_subpartition(group, &v).unwrap();
        }
        cc.exec(&NoFilter, &mut NoCheck).unwrap();
        assert_eq!(cc.num_vertices(), 2);
        validate_cover(cc.graph(), cc.cliques(), Some(cc.subpartitions())).unwrap();
    }

    #[test]
    fn rts_never_loses_to_plain_ts() {
        let mut rng = XorShiftRng::seed_from_u64(2024);
        let filter = SlackBasedFilter::<usize>::new(3.0, MuxModel::default());
        for _ in 0..10 {
            let seed = rng.random::<u64>();
            let build = |algorithm| {
                random_covering(&mut XorShiftRng::seed_from_u64(seed), algorithm, 18, 0.5)
            };
            let mut ts = build(Algorithm::Ts);
            let mut rts = build(Algorithm::Rts);
            ts.exec(&filter, &mut NoCheck).unwrap();
            rts.exec(&filter, &mut NoCheck).unwrap();
            let cost = |cc: &CliqueCovering<usize>| -> (u64, usize) {
                let total = cc.cliques().iter().map(|c| filter.clique_cost(c, cc.graph())).sum();
                (total, cc.num_vertices())
            };
            assert!(cost(&rts) <= cost(&ts));
        }
    }

    #[test]
    fn dot_export_writes_the_graph() {
        let cc = scenario_a(Algorithm::Ttt);
        let path = std::env::temp_dir().join(format!("cliquecover-{}.dot", std::process::id()));
        cc.write_dot(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("0--1 [label=\"5\"];"));
    }
}
