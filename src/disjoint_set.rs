//! Union-find over dense vertex indices.
//!
//! The solver state of every covering strategy: vertices that end up in the same
//! set form one output clique.

use std::collections::BTreeMap;

/// Disjoint-set forest with union by rank and path compression.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Creates `n` singleton sets `{0}, {1}, ..., {n-1}`.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Number of elements tracked.
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` when no element is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of `x`, compressing the path on the way.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Returns the representative of `x` without mutating the forest.
    pub fn find_const(&self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    /// Merges the sets of `a` and `b` and returns the new representative.
    ///
    /// The representative is always one of the two previous representatives.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => {
                self.parent[ra] = rb;
                rb
            }
            std::cmp::Ordering::Greater => {
                self.parent[rb] = ra;
                ra
            }
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
                ra
            }
        }
    }

    /// Returns `true` if `a` and `b` are in the same set.
    #[inline]
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Groups every element by representative, ordered by representative index.
    ///
    /// Members of each group are listed in increasing index order.
    pub fn partitions(&mut self) -> BTreeMap<usize, Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for x in 0..self.len() {
            let rep = self.find(x);
            groups.entry(rep).or_default().push(x);
        }
        groups
    }

    /// Members whose representative is in `reps`, in increasing index order.
    pub fn expand(&mut self, reps: &[usize]) -> Vec<usize> {
        let mut members = Vec::new();
        for x in 0..self.len() {
            let rep = self.find(x);
            if reps.contains(&rep) {
                members.push(x);
            }
        }
        members
    }
}

// ============================================================================
// Tests
// ============================================================================
