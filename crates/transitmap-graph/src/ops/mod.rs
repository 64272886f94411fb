//! Structural operations over immutable graphs: connected components,
//! shape casts, transitive reduction and tree–graph–tree decomposition.

mod cast;
mod reduce;
mod tgt;

use fixedbitset::FixedBitSet;
use tracing::instrument;

use crate::model::{Graph, Label, Node, NodeId};
use crate::traversal::{TraversalOrder, dfs};

pub use cast::{cast_to_path, cast_to_tree};
pub use reduce::transitive_reduction;
pub use tgt::{TgtDecomposition, calculate_tgt_decomposition};

/// Split a graph into its weakly connected components.
///
/// Components come out in the arena order of their first node. An empty
/// input yields a single empty graph.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn split_into_connected_components<L: Label>(graph: &Graph<L>) -> Vec<Graph<L>> {
    if graph.is_empty() {
        return vec![Graph::empty()];
    }

    let mut assigned = FixedBitSet::with_capacity(graph.node_count());
    let mut components = Vec::new();

    for node in graph.nodes() {
        if assigned.contains(node.id().index()) {
            continue;
        }
        let members: Vec<NodeId> = dfs(node, TraversalOrder::Pre, true)
            .into_iter()
            .map(Node::id)
            .collect();
        for id in &members {
            assigned.insert(id.index());
        }
        components.push(graph.induced_subgraph(members));
    }

    components
}
