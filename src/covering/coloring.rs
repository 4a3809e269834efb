//! Coloring-based covering: color classes of the conflict graph are cliques.

use super::Context;
use crate::coloring::dsatur_coloring;
use crate::disjoint_set::DisjointSet;
use crate::graph::SubGraph;
use log::debug;

/// Merges every color class of the view's conflict graph.
pub(super) fn cover<V: Clone + Ord>(
    ctx: &mut Context<'_, V>,
    view: &SubGraph,
    ds: &mut DisjointSet,
) {
    let vertices: Vec<usize> = view.support().iter().copied().collect();
    if vertices.len() < 2 {
        return;
    }

    let mut conflicts = vec![Vec::new(); vertices.len()];
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if !view.has_edge(vertices[i], vertices[j]) {
                conflicts[i].push(j);
                conflicts[j].push(i);
            }
        }
    }

    let coloring = dsatur_coloring(&conflicts);
    debug!("{} vertices colored with {} colors", vertices.len(), coloring.num_colors);
    for class in coloring.classes() {
        let Some((&first, rest)) = class.split_first() else {
            continue;
        };
        for &other in rest {
            ctx.join(ds, vertices[first], vertices[other]);
        }
    }
}
