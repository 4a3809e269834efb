//! Compatibility graph storage and the working views the covering strategies mutate.
//!
//! A [`CompatibilityGraph`] maps caller elements onto dense indices (a side table) and
//! stores undirected weighted edges meaning "these two elements may share one
//! physical resource". Solvers never mutate it: they build [`SubGraph`] views
//! restricted to a support set, a minimum weight level and a set of disabled edges.

use crate::error::{CoverError, InvalidEdgeReason, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// ============================================================================
// Constants and handles
// ============================================================================

/// Largest edge weight accepted by default.
///
/// Edge weights double as refinement levels, so this is also the number of levels
/// the weighted strategies walk through.
pub const MAX_EDGE_WEIGHT: u32 = 31;

/// Dense handle of a vertex inside one [`CompatibilityGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl VertexId {
    /// Returns the dense index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Undirected weighted compatibility edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompatibilityEdge {
    /// Lower endpoint index.
    pub a: usize,
    /// Higher endpoint index.
    pub b: usize,
    /// Sharing benefit, in `[1, max_weight]`.
    pub weight: u32,
}

impl CompatibilityEdge {
    /// Returns whether the edge takes part in a view filtered at `level`.
    #[inline(always)]
    pub const fn edge_enabled_at(&self, level: u32) -> bool {
        self.weight >= level
    }

    /// Returns the endpoint opposite to `v`.
    #[inline]
    pub fn other(&self, v: usize) -> usize {
        debug_assert!(v == self.a || v == self.b);
        if v == self.a { self.b } else { self.a }
    }
}

// ============================================================================
// CompatibilityGraph
// ============================================================================

/// Vertex/edge store of one shareable-resource class.
///
/// Representation:
/// - `elements[i]`/`labels[i]` describe vertex `i`.
/// - `adj[i]` maps every neighbor of `i` to the index of the connecting edge in `edges`.
#[derive(Clone, Debug)]
pub struct CompatibilityGraph<V> {
    elements: Vec<V>,
    labels: Vec<String>,
    index: BTreeMap<V, VertexId>,
    edges: Vec<CompatibilityEdge>,
    adj: Vec<BTreeMap<usize, usize>>,
    max_weight: u32,
    max_level: u32,
}

impl<V: Clone + Ord> Default for CompatibilityGraph<V> {
    fn default() -> Self {
        Self::new(MAX_EDGE_WEIGHT)
    }
}

impl<V: Clone + Ord> CompatibilityGraph<V> {
    /// Creates an empty graph accepting weights in `[1, max_weight]`.
    pub fn new(max_weight: u32) -> Self {
        Self::with_capacity(0, max_weight)
    }

    /// Creates an empty graph with room for `vertex_count_hint` vertices.
    pub fn with_capacity(vertex_count_hint: usize, max_weight: u32) -> Self {
        debug_assert!(max_weight >= 1, "max_weight must allow at least weight 1");
        Self {
            elements: Vec::with_capacity(vertex_count_hint),
            labels: Vec::with_capacity(vertex_count_hint),
            index: BTreeMap::new(),
            edges: Vec::new(),
            adj: Vec::with_capacity(vertex_count_hint),
            max_weight,
            max_level: 0,
        }
    }

    /// Adds `element` with a display `label`.
    ///
    /// # Errors
    /// Returns [`CoverError::DuplicateVertex`] if `element` is already present.
    pub fn add_vertex(&mut self, element: V, label: impl Into<String>) -> Result<VertexId> {
        let label = label.into();
        if self.index.contains_key(&element) {
            return Err(CoverError::DuplicateVertex { label });
        }
        let id = VertexId(self.elements.len());
        self.index.insert(element.clone(), id);
        self.elements.push(element);
        self.labels.push(label);
        self.adj.push(BTreeMap::new());
        Ok(id)
    }

    /// Connects two previously added elements with an edge of the given weight.
    ///
    /// # Errors
    /// - [`CoverError::UnknownVertex`] if either element was never added.
    /// - [`CoverError::InvalidEdge`] on self-loops, out-of-range weights or a second
    ///   edge for the same pair.
    pub fn add_edge(&mut self, src: &V, dest: &V, weight: u32) -> Result<()> {
        let a = self
            .vertex_id(src)
            .ok_or(CoverError::UnknownVertex { context: "add_edge" })?;
        let b = self
            .vertex_id(dest)
            .ok_or(CoverError::UnknownVertex { context: "add_edge" })?;
        self.add_edge_between(a, b, weight)
    }

    /// Same as [`add_edge`](Self::add_edge), addressed by handles.
    ///
    /// # Errors
    /// See [`add_edge`](Self::add_edge).
    pub fn add_edge_between(&mut self, a: VertexId, b: VertexId, weight: u32) -> Result<()> {
        if a.0 >= self.elements.len() || b.0 >= self.elements.len() {
            return Err(CoverError::UnknownVertex { context: "add_edge" });
        }
        let reason = if a == b {
            Some(InvalidEdgeReason::SelfLoop)
        } else if weight == 0 || weight > self.max_weight {
            Some(InvalidEdgeReason::WeightOutOfRange {
                weight,
                max: self.max_weight,
            })
        } else if self.adj[a.0].contains_key(&b.0) {
            Some(InvalidEdgeReason::Duplicate)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CoverError::InvalidEdge {
                src: self.labels[a.0].clone(),
                dest: self.labels[b.0].clone(),
                reason,
            });
        }

        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let edge_id = self.edges.len();
        self.edges.push(CompatibilityEdge { a: lo, b: hi, weight });
        self.adj[lo].insert(hi, edge_id);
        self.adj[hi].insert(lo, edge_id);
        self.max_level = self.max_level.max(weight);
        Ok(())
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Largest weight accepted by [`add_edge`](Self::add_edge).
    #[inline]
    pub fn max_weight(&self) -> u32 {
        self.max_weight
    }

    /// Largest weight actually present (0 for an edgeless graph).
    #[inline]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Returns the caller element behind `id`.
    #[inline]
    pub fn element(&self, id: VertexId) -> &V {
        &self.elements[id.0]
    }

    /// Returns the display label of `id`.
    #[inline]
    pub fn label(&self, id: VertexId) -> &str {
        &self.labels[id.0]
    }

    /// Looks up the handle of `element`.
    #[inline]
    pub fn vertex_id(&self, element: &V) -> Option<VertexId> {
        self.index.get(element).copied()
    }

    /// All edges, indexed by edge id.
    #[inline]
    pub fn edges(&self) -> &[CompatibilityEdge] {
        &self.edges
    }

    /// Returns whether `u` and `v` are compatible.
    #[inline]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj[u].contains_key(&v)
    }

    /// Returns the weight of the edge `(u, v)` if it exists.
    #[inline]
    pub fn weight(&self, u: VertexId, v: VertexId) -> Option<u32> {
        self.adj[u.0].get(&v.0).map(|&e| self.edges[e].weight)
    }

    /// Returns the edge id connecting `u` and `v`.
    #[inline]
    pub fn edge_id(&self, u: usize, v: usize) -> Option<usize> {
        self.adj[u].get(&v).copied()
    }

    /// Iterates over `(neighbor, weight)` pairs of `v` in increasing neighbor order.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = (VertexId, u32)> + '_ {
        self.adj[v.0]
            .iter()
            .map(move |(&u, &e)| (VertexId(u), self.edges[e].weight))
    }

    /// Degree of `v` in the full graph.
    #[inline]
    pub fn degree(&self, v: VertexId) -> usize {
        self.adj[v.0].len()
    }

    /// Returns whether the given vertices are pairwise compatible.
    pub fn is_clique(&self, members: &[usize]) -> bool {
        for (i, &u) in members.iter().enumerate() {
            for &v in &members[i + 1..] {
                if !self.has_edge(u, v) {
                    return false;
                }
            }
        }
        true
    }

    /// Sum of the weights of the edges between `v` and the members of `set`.
    pub fn weight_into(&self, v: usize, set: impl IntoIterator<Item = usize>) -> u64 {
        set.into_iter()
            .filter_map(|u| self.adj[v].get(&u))
            .map(|&e| u64::from(self.edges[e].weight))
            .sum()
    }

    /// Builds a working view over `support`.
    ///
    /// An edge takes part in the view iff both endpoints are in `support`, it is
    /// enabled at `level` and it is not flagged in `disabled` (indexed by edge id;
    /// an empty slice disables nothing).
    pub fn view(&self, support: &BTreeSet<usize>, level: u32, disabled: &[bool]) -> SubGraph {
        let mut adj = vec![BTreeMap::new(); self.vertex_count()];
        for (id, edge) in self.edges.iter().enumerate() {
            if !edge.edge_enabled_at(level) || disabled.get(id).copied().unwrap_or(false) {
                continue;
            }
            if support.contains(&edge.a) && support.contains(&edge.b) {
                adj[edge.a].insert(edge.b, edge.weight);
                adj[edge.b].insert(edge.a, edge.weight);
            }
        }
        SubGraph {
            adj,
            support: support.clone(),
        }
    }

    /// View over every vertex and every edge.
    pub fn complete_view(&self) -> SubGraph {
        let support: BTreeSet<usize> = (0..self.vertex_count()).collect();
        self.view(&support, 1, &[])
    }

    /// Saves a Graphviz rendering of the graph to `filename`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_dot(&self, filename: impl AsRef<Path>) -> io::Result<()> {
        let f = File::create(filename)?;
        self.write_dot(BufWriter::new(f))
    }

    /// Writes a Graphviz rendering: vertices are labelled, edges carry their weight.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_dot<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "graph G {{")?;
        for (i, label) in self.labels.iter().enumerate() {
            writeln!(w, "{i}[label=\"{}\"];", escape_dot(label))?;
        }
        for edge in &self.edges {
            writeln!(w, "{}--{} [label=\"{}\"];", edge.a, edge.b, edge.weight)?;
        }
        writeln!(w, "}}")?;
        w.flush()
    }
}

fn escape_dot(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

// ============================================================================
// SubGraph
// ============================================================================

/// Mutable working view used while a strategy runs.
///
/// Vertices outside `support` have no neighbors. Removing a vertex drops it from the
/// support together with all its edges.
#[derive(Clone, Debug)]
pub struct SubGraph {
    adj: Vec<BTreeMap<usize, u32>>,
    support: BTreeSet<usize>,
}

impl SubGraph {
    /// Active vertices, in increasing order.
    #[inline]
    pub fn support(&self) -> &BTreeSet<usize> {
        &self.support
    }

    /// Returns whether `v` is still active.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.support.contains(&v)
    }

    /// `neighbor -> weight` map of `v` inside the view.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &BTreeMap<usize, u32> {
        &self.adj[v]
    }

    /// Degree of `v` inside the view.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.adj[v].len()
    }

    /// Returns whether `(u, v)` is an edge of the view.
    #[inline]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj[u].contains_key(&v)
    }

    /// Sum of the weights of all edges incident to `v`.
    #[inline]
    pub fn incident_weight(&self, v: usize) -> i64 {
        self.adj[v].values().map(|&w| i64::from(w)).sum()
    }

    /// Number of common neighbors of `u` and `v`.
    pub fn shared_neighbors(&self, u: usize, v: usize) -> usize {
        let (small, large) = if self.adj[u].len() <= self.adj[v].len() {
            (&self.adj[u], &self.adj[v])
        } else {
            (&self.adj[v], &self.adj[u])
        };
        small.keys().filter(|w| large.contains_key(w)).count()
    }

    /// Edges of the view as `(u, v, weight)` with `u < v`, in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.support.iter().flat_map(move |&u| {
            self.adj[u]
                .range(u + 1..)
                .map(move |(&v, &w)| (u, v, w))
        })
    }

    /// Deletes the edge `(u, v)` if present.
    pub fn remove_edge(&mut self, u: usize, v: usize) {
        self.adj[u].remove(&v);
        self.adj[v].remove(&u);
    }

    /// Drops `v` and all its edges from the view.
    pub fn remove_vertex(&mut self, v: usize) {
        let neighbors: Vec<usize> = self.adj[v].keys().copied().collect();
        for u in neighbors {
            self.adj[u].remove(&v);
        }
        self.adj[v].clear();
        self.support.remove(&v);
    }

    /// Drops every support vertex without edges; returns how many were dropped.
    pub fn remove_isolated(&mut self) -> usize {
        let isolated: Vec<usize> = self
            .support
            .iter()
            .copied()
            .filter(|&v| self.adj[v].is_empty())
            .collect();
        for v in &isolated {
            self.support.remove(v);
        }
        isolated.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
