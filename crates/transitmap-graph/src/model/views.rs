//! Structured views over an immutable [`Graph`]: trees, paths and ordered
//! graphs.
//!
//! Each view holds its backing graph (a cheap `Arc` handle) plus the one
//! extra field its shape needs. Views produced by the casts in
//! [`crate::ops`] have already been checked; nothing here re-validates.

use std::fmt;

use super::{Assembler, DirectedGraph, Graph, Label, Node, NodeId};
use crate::error::GraphError;

/// A graph with a single root from which every node is reachable, and
/// exactly `nodes - 1` edges.
#[derive(Clone)]
pub struct Tree<L> {
    graph: Graph<L>,
    root: NodeId,
}

impl<L: Label> Tree<L> {
    pub(crate) const fn from_parts(graph: Graph<L>, root: NodeId) -> Self {
        Self { graph, root }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> Node<'_, L> {
        self.graph.node_at(self.root)
    }

    /// The backing graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph<L> {
        &self.graph
    }

    /// Give up the tree structure and keep the graph.
    #[must_use]
    pub fn into_graph(self) -> Graph<L> {
        self.graph
    }
}

impl<L: Label> fmt::Debug for Tree<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", self.root().label())
            .field("graph", &self.graph)
            .finish()
    }
}

impl<L: Label> PartialEq for Tree<L> {
    fn eq(&self, other: &Self) -> bool {
        self.root().label() == other.root().label() && self.graph == other.graph
    }
}

/// A graph in which every node has in- and out-degree at most one, stored
/// with its explicit vertex order.
#[derive(Clone)]
pub struct Path<L> {
    graph: Graph<L>,
    order: Vec<NodeId>,
}

impl<L: Label> Path<L> {
    /// Build a path visiting `labels` in order.
    ///
    /// # Errors
    ///
    /// [`GraphError::RepeatedLabel`] if a label occurs twice.
    pub fn new<I>(labels: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = L>,
    {
        let mut asm = Assembler::with_capacity(0);
        let mut order = Vec::new();
        for label in labels {
            if asm.contains(&label) {
                return Err(GraphError::repeated_label(&label));
            }
            order.push(asm.intern(&label));
        }
        for pair in order.windows(2) {
            asm.connect(pair[0], pair[1]);
        }
        Ok(Self {
            graph: asm.finish(),
            order,
        })
    }

    pub(crate) const fn from_parts(graph: Graph<L>, order: Vec<NodeId>) -> Self {
        Self { graph, order }
    }

    /// Labels in path order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &L> + '_ {
        self.order.iter().map(|&id| self.graph.label_of(id))
    }

    /// Nodes in path order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = Node<'_, L>> + '_ {
        self.order.iter().map(|&id| self.graph.node_at(id))
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the path has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The backing graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph<L> {
        &self.graph
    }
}

impl<L: Label> fmt::Debug for Path<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Path").field(&self.vertices().collect::<Vec<_>>()).finish()
    }
}

impl<L: Label> PartialEq for Path<L> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices().eq(other.vertices())
    }
}

impl<L: Label> Eq for Path<L> {}

/// A graph together with a total order over its nodes.
#[derive(Clone)]
pub struct OrderedGraph<L> {
    graph: Graph<L>,
    order: Vec<NodeId>,
}

impl<L: Label> OrderedGraph<L> {
    pub(crate) const fn from_parts(graph: Graph<L>, order: Vec<NodeId>) -> Self {
        Self { graph, order }
    }

    /// Labels in order.
    pub fn ordered_labels(&self) -> impl ExactSizeIterator<Item = &L> + '_ {
        self.order.iter().map(|&id| self.graph.label_of(id))
    }

    /// Nodes in order.
    pub fn ordered_nodes(&self) -> impl ExactSizeIterator<Item = Node<'_, L>> + '_ {
        self.order.iter().map(|&id| self.graph.node_at(id))
    }

    /// The backing graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph<L> {
        &self.graph
    }
}

impl<L: Label> fmt::Debug for OrderedGraph<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedGraph")
            .field("order", &self.ordered_labels().collect::<Vec<_>>())
            .field("graph", &self.graph)
            .finish()
    }
}

impl<L: Label> From<Path<L>> for OrderedGraph<L> {
    fn from(path: Path<L>) -> Self {
        Self::from_parts(path.graph, path.order)
    }
}

macro_rules! delegate_directed_graph {
    ($view:ident) => {
        impl<L: Label> DirectedGraph for $view<L> {
            type Label = L;

            fn node_count(&self) -> usize {
                self.graph.node_count()
            }

            fn edge_count(&self) -> usize {
                self.graph.edge_count()
            }

            fn contains(&self, label: &L) -> bool {
                self.graph.node(label).is_some()
            }

            fn labels(&self) -> Vec<&L> {
                self.graph.nodes().map(Node::label).collect()
            }

            fn edge_pairs(&self) -> Vec<(&L, &L)> {
                self.graph.edges().collect()
            }
        }
    };
}

delegate_directed_graph!(Tree);
delegate_directed_graph!(Path);
delegate_directed_graph!(OrderedGraph);
