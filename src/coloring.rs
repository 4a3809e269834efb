//! DSATUR greedy vertex coloring.
//!
//! The coloring-based cover colors the *conflict* graph (the complement of the
//! compatibility view): every color class is then a clique of compatible vertices.
//! The bipartite cover colors the compatibility graph itself to derive exclusivity
//! groups.

use std::collections::BTreeSet;

/// Result of a coloring: `colors[v]` is in `0..num_colors`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coloring {
    /// Color of every vertex.
    pub colors: Vec<usize>,
    /// Number of distinct colors used.
    pub num_colors: usize,
}

impl Coloring {
    /// Vertices grouped by color, each class in increasing vertex order.
    pub fn classes(&self) -> Vec<Vec<usize>> {
        let mut classes = vec![Vec::new(); self.num_colors];
        for (v, &c) in self.colors.iter().enumerate() {
            classes[c].push(v);
        }
        classes
    }
}

/// Colors the graph given by adjacency lists over `0..adj.len()`.
///
/// Each step picks the uncolored vertex with the highest saturation (number of
/// distinct neighbor colors), then the most uncolored neighbors, then the lowest
/// index, and gives it the smallest color unused by its neighbors. The result is
/// deterministic.
pub fn dsatur_coloring(adj: &[Vec<usize>]) -> Coloring {
    let n = adj.len();
    let mut colors = vec![usize::MAX; n];
    let mut saturation: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    let mut uncolored_degree: Vec<usize> = adj.iter().map(Vec::len).collect();
    let mut num_colors = 0;

    for _ in 0..n {
        let mut pick = usize::MAX;
        for v in 0..n {
            if colors[v] != usize::MAX {
                continue;
            }
            if pick == usize::MAX
                || (saturation[v].len(), uncolored_degree[v])
                    > (saturation[pick].len(), uncolored_degree[pick])
            {
                pick = v;
            }
        }

        let used = &saturation[pick];
        let color = (0..).find(|c| !used.contains(c)).unwrap_or(0);
        colors[pick] = color;
        num_colors = num_colors.max(color + 1);

        for &u in &adj[pick] {
            if colors[u] == usize::MAX {
                saturation[u].insert(color);
                uncolored_degree[u] -= 1;
            }
        }
    }

    Coloring { colors, num_colors }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn adjacency(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); n];
        for &(a, b) in edges {
            adj[a].push(b);
            adj[b].push(a);
        }
        adj
    }

    #[test]
    fn empty_and_edgeless_graphs() {
        assert_eq!(dsatur_coloring(&[]).num_colors, 0);
        let c = dsatur_coloring(&adjacency(4, &[]));
        assert_eq!(c.num_colors, 1);
        assert_eq!(c.classes(), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn odd_cycle_needs_three_colors() {
        let c = dsatur_coloring(&adjacency(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]));
        assert_eq!(c.num_colors, 3);
    }

    #[test]
    fn bipartite_graphs_get_two_colors() {
        // DSATUR is exact on bipartite graphs.
        let c = dsatur_coloring(&adjacency(6, &[(0, 3), (0, 4), (1, 4), (1, 5), (2, 5), (2, 3)]));
        assert_eq!(c.num_colors, 2);
    }

    #[test]
    fn random_colorings_are_proper() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        for _ in 0..30 {
            let n = rng.random_range(1..25);
            let mut edges = Vec::new();
            for a in 0..n {
                for b in (a + 1)..n {
                    if rng.random_bool(0.3) {
                        edges.push((a, b));
                    }
                }
            }
            let adj = adjacency(n, &edges);
            let c = dsatur_coloring(&adj);
            for &(a, b) in &edges {
                assert_ne!(c.colors[a], c.colors[b]);
            }
            assert!(c.colors.iter().all(|&col| col < c.num_colors));
            assert_eq!(c, dsatur_coloring(&adj));
        }
    }
}
