//! Path stitching: merge many per-trip stop sequences into one graph.
//!
//! # Overview
//!
//! Trips on one route mostly share stop sub-sequences. Stitching walks each
//! input [`Path`] in turn and grafts it onto the graph accumulated so far:
//!
//! - a label seen for the first time becomes a new node, linked from its
//!   predecessor in the path;
//! - the *anchor* is the most recent vertex of the current path that was
//!   already in the graph before this path began;
//! - when the path re-joins the graph at `v` after a detour of new nodes,
//!   the edge into `v` is added and a direct `anchor → v` edge, now
//!   bypassed by the detour, is removed;
//! - two consecutive pre-existing vertices are linked only if the second is
//!   not already reachable from the first, so a shorter trip never adds a
//!   shortcut over a longer one.
//!
//! ```text
//! [b, w, c] then [b, c]   →   b → w → c
//! [b, c] then [b, w, c]   →   b → w → c     (b → c removed as a shortcut)
//! ```
//!
//! Shortcut removal is incremental and depends on input order; it is not
//! equivalent to running [`crate::ops::transitive_reduction`] afterwards.
//! Every input edge stays reachable in the output.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::model::{Graph, Label, MutableGraph, Path};

/// Stitch paths into a single directed graph.
#[must_use]
#[instrument(skip_all)]
pub fn stitch<'a, L, I>(paths: I) -> Graph<L>
where
    L: Label + 'a,
    I: IntoIterator<Item = &'a Path<L>>,
{
    let mut graph: MutableGraph<L> = MutableGraph::new();
    let mut sources: HashSet<L> = HashSet::new();
    let mut path_count = 0_usize;

    for path in paths {
        path_count += 1;
        let vertices: Vec<&L> = path.vertices().collect();
        let pre_existing: Vec<bool> = vertices.iter().map(|label| graph.contains(label)).collect();
        let mut anchor: Option<&L> = None;

        for (position, &vertex) in vertices.iter().enumerate() {
            let previous = position.checked_sub(1).map(|p| (vertices[p], pre_existing[p]));

            if !pre_existing[position] {
                match previous {
                    Some((prev, _)) => graph.add_edge(prev.clone(), vertex.clone()),
                    None => {
                        graph.add_node(vertex.clone());
                        sources.insert(vertex.clone());
                    }
                }
                continue;
            }

            match previous {
                // Re-joining after a detour through new nodes.
                Some((prev, false)) => {
                    graph.add_edge(prev.clone(), vertex.clone());
                    sources.remove(vertex);
                    if anchor.is_some_and(|anchor| graph.discard_edge(anchor, vertex)) {
                        debug!(?anchor, ?vertex, "removed bypassed shortcut");
                    }
                }
                // Both ends already known: link only if not yet reachable.
                Some((prev, true)) => {
                    if !is_reachable(&graph, prev, vertex) {
                        graph.add_edge(prev.clone(), vertex.clone());
                        sources.remove(vertex);
                    }
                }
                None => {}
            }
            anchor = Some(vertex);
        }
    }

    debug!(
        paths = path_count,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        sources = sources.len(),
        "stitched paths"
    );
    graph.freeze()
}

fn is_reachable<L: Label>(graph: &MutableGraph<L>, from: &L, to: &L) -> bool {
    let mut seen: HashSet<&L> = HashSet::from([from]);
    let mut queue: VecDeque<&L> = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        if current == to {
            return true;
        }
        for next in graph.successors(current) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}
