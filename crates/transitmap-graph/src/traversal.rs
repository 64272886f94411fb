//! Iterative depth-first traversals over immutable graphs.
//!
//! Service-map graphs can have thousands of nodes, so traversals use an
//! explicit stack rather than recursion. Post-order re-pushes a node with a
//! "children pushed" marker and emits it only once everything pushed above
//! it has been exhausted.

use fixedbitset::FixedBitSet;

use crate::model::{Label, Node};

/// When a node is yielded relative to its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Yield a node on first visit.
    Pre,
    /// Yield a node after all of its descendants.
    Post,
}

/// Depth-first traversal from `start`.
///
/// With `ignore_directionality` the walk also expands through in-neighbors,
/// which turns it into a connectivity search over the underlying undirected
/// graph. Siblings are explored in adjacency order.
#[must_use]
pub fn dfs<L: Label>(
    start: Node<'_, L>,
    order: TraversalOrder,
    ignore_directionality: bool,
) -> Vec<Node<'_, L>> {
    walk(start, order, ignore_directionality, |_| {})
}

/// Depth-first traversal exploring siblings in ascending `sort_key` order.
///
/// Use this where output must be stable regardless of how the graph was
/// assembled (line diagrams, tests).
#[must_use]
pub fn dfs_by_key<L, K, F>(
    start: Node<'_, L>,
    order: TraversalOrder,
    ignore_directionality: bool,
    mut sort_key: F,
) -> Vec<Node<'_, L>>
where
    L: Label,
    K: Ord,
    F: FnMut(&L) -> K,
{
    walk(start, order, ignore_directionality, |siblings| {
        siblings.sort_by_key(|node| sort_key(node.label()));
    })
}

fn walk<'g, L, A>(
    start: Node<'g, L>,
    order: TraversalOrder,
    ignore_directionality: bool,
    mut arrange: A,
) -> Vec<Node<'g, L>>
where
    L: Label,
    A: FnMut(&mut Vec<Node<'g, L>>),
{
    let mut visited = FixedBitSet::with_capacity(start.graph().node_count());
    let mut output = Vec::new();
    // (node, children already pushed)
    let mut stack: Vec<(Node<'g, L>, bool)> = vec![(start, false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            output.push(node);
            continue;
        }
        if visited.put(node.id().index()) {
            continue;
        }

        match order {
            TraversalOrder::Pre => output.push(node),
            TraversalOrder::Post => stack.push((node, true)),
        }

        let mut next: Vec<Node<'g, L>> = node.out_nodes().collect();
        if ignore_directionality {
            next.extend(node.in_nodes());
        }
        next.retain(|candidate| !visited.contains(candidate.id().index()));
        arrange(&mut next);

        // Reverse so the first sibling is popped first.
        stack.extend(next.into_iter().rev().map(|candidate| (candidate, false)));
    }

    output
}
