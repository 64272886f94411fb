//! Shape casts: view a general graph as a [`Path`] or a [`Tree`].
//!
//! A failed cast returns `None`. That is the expected "wrong shape" branch,
//! not an error.

use crate::model::{Graph, Label, Node, Path, Tree};
use crate::traversal::{TraversalOrder, dfs};

/// Cast to a [`Path`].
///
/// Succeeds only if there is exactly one source, every node has in- and
/// out-degree at most one, and a walk from the source reaches every node.
#[must_use]
pub fn cast_to_path<L: Label>(graph: &Graph<L>) -> Option<Path<L>> {
    let source = single_source(graph)?;
    if graph
        .nodes()
        .any(|node| node.out_degree() > 1 || node.in_degree() > 1)
    {
        return None;
    }
    let visited = dfs(source, TraversalOrder::Pre, false);
    if visited.len() != graph.node_count() {
        return None;
    }
    let order = visited.into_iter().map(Node::id).collect();
    Some(Path::from_parts(graph.clone(), order))
}

/// Cast to a [`Tree`] rooted at the graph's only source.
///
/// Succeeds only if there is exactly one source, a walk from it reaches
/// every node, and there are exactly `nodes - 1` edges.
#[must_use]
pub fn cast_to_tree<L: Label>(graph: &Graph<L>) -> Option<Tree<L>> {
    let root = single_source(graph)?;
    if graph.edge_count() + 1 != graph.node_count() {
        return None;
    }
    if dfs(root, TraversalOrder::Pre, false).len() != graph.node_count() {
        return None;
    }
    Some(Tree::from_parts(graph.clone(), root.id()))
}

fn single_source<L: Label>(graph: &Graph<L>) -> Option<Node<'_, L>> {
    let mut sources = graph.sources();
    let source = sources.next()?;
    sources.next().is_none().then_some(source)
}
