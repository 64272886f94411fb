//! Transitive reduction.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::model::{Graph, Label, MutableGraph};

/// Compute the transitive reduction of a graph.
///
/// Returns a new graph with the same nodes, no self-loops, and without any
/// edge `(a, b)` for which another path `a → … → b` of length ≥ 2 exists.
/// Reachability is preserved.
///
/// # Algorithm
///
/// Work on a mutable copy. Drop self-loops first. Then, for each remaining
/// edge `(a, b)`, search from `a` while refusing to use that edge; if the
/// search reaches `b`, the edge is redundant and is deleted immediately.
/// Each search is O(V + E), so the whole pass is O(max(V, E) · E).
///
/// Deleting a redundant edge never removes reachability, so later searches
/// see the same reachability relation and the result is idempotent. Cyclic
/// inputs are accepted; edges inside a cycle are kept unless a longer route
/// bypasses them.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn transitive_reduction<L: Label>(graph: &Graph<L>) -> Graph<L> {
    let mut working = graph.mutable();

    for (from, to) in graph.edges() {
        if from == to {
            working.discard_edge(from, to);
        }
    }

    let candidates: Vec<(L, L)> = working
        .edges()
        .into_iter()
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect();

    let mut removed = 0_usize;
    for (from, to) in candidates {
        if has_longer_path(&working, &from, &to) {
            working.discard_edge(&from, &to);
            removed += 1;
        }
    }

    debug!(removed, "transitive reduction complete");
    working.freeze()
}

/// Whether `to` is reachable from `from` without using the edge `from → to`.
fn has_longer_path<L: Label>(graph: &MutableGraph<L>, from: &L, to: &L) -> bool {
    let mut seen: HashSet<&L> = HashSet::from([from]);
    let mut queue: VecDeque<&L> = VecDeque::from([from]);

    while let Some(current) = queue.pop_front() {
        for next in graph.successors(current) {
            if current == from && next == to {
                continue;
            }
            if next == to {
                return true;
            }
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitive_reduction_removes_redundant_edge() {
        // a → b → c and a → c (redundant)
        let graph = Graph::build([("a", "b"), ("b", "c"), ("a", "c")], []);
        let reduced = transitive_reduction(&graph);
        assert_eq!(reduced, Graph::build([("a", "b"), ("b", "c")], []));
    }

    #[test]
    fn transitive_reduction_preserves_minimal_graph() {
        let graph = Graph::build([("a", "b"), ("b", "c")], []);
        assert_eq!(transitive_reduction(&graph), graph);
    }

    #[test]
    fn transitive_reduction_diamond_removes_diagonal() {
        let graph = Graph::build(
            [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("a", "d")],
            [],
        );
        let reduced = transitive_reduction(&graph);
        assert_eq!(reduced.edge_count(), 4);
        assert!(!reduced.contains_edge(&"a", &"d"));
    }

    #[test]
    fn transitive_reduction_drops_self_loops() {
        let graph = Graph::build([("a", "a"), ("a", "b")], []);
        assert_eq!(transitive_reduction(&graph), Graph::build([("a", "b")], []));
    }

    #[test]
    fn transitive_reduction_keeps_cycle_edges() {
        let graph = Graph::build([("a", "b"), ("b", "a")], []);
        assert_eq!(transitive_reduction(&graph), graph);
    }

    #[test]
    fn transitive_reduction_long_bypass() {
        // 1 → 2 → 3 → 4 → 5 with a shortcut 1 → 5 and 2 → 4
        let graph = Graph::build([(1, 2), (2, 3), (3, 4), (4, 5), (1, 5), (2, 4)], []);
        let reduced = transitive_reduction(&graph);
        assert_eq!(reduced, Graph::build([(1, 2), (2, 3), (3, 4), (4, 5)], []));
        assert_eq!(transitive_reduction(&reduced), reduced);
    }

    #[test]
    fn transitive_reduction_keeps_isolated_nodes() {
        let graph = Graph::build([(1, 2)], [9]);
        assert_eq!(transitive_reduction(&graph), graph);
    }
}
