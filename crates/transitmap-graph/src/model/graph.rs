//! Immutable directed graph and its borrowed node views.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{Assembler, DirectedGraph, Label, MutableGraph, NodeId};

/// Frozen adjacency shared by every handle to one graph.
#[derive(Debug)]
struct Storage<L> {
    labels: Vec<L>,
    index: HashMap<L, NodeId>,
    outgoing: Vec<Box<[NodeId]>>,
    incoming: Vec<Box<[NodeId]>>,
    edge_count: usize,
}

/// An immutable directed graph keyed by label.
///
/// May be disconnected, cyclic or self-looping. Built once from an edge
/// list, a union of graphs, or a frozen [`MutableGraph`], and never mutated
/// afterwards; only the orientation bit can change.
#[derive(Clone)]
pub struct Graph<L> {
    storage: Arc<Storage<L>>,
    reversed: bool,
}

impl<L: Label> Graph<L> {
    pub(crate) fn from_storage(
        labels: Vec<L>,
        index: HashMap<L, NodeId>,
        outgoing: Vec<Box<[NodeId]>>,
        incoming: Vec<Box<[NodeId]>>,
        edge_count: usize,
    ) -> Self {
        Self {
            storage: Arc::new(Storage {
                labels,
                index,
                outgoing,
                incoming,
                edge_count,
            }),
            reversed: false,
        }
    }

    /// A graph with no nodes.
    #[must_use]
    pub fn empty() -> Self {
        Assembler::with_capacity(0).finish()
    }

    /// Build a graph from an edge list plus labels that should exist even
    /// without edges. Duplicate edges collapse into one.
    #[must_use]
    pub fn build<E, X>(edges: E, extra_labels: X) -> Self
    where
        E: IntoIterator<Item = (L, L)>,
        X: IntoIterator<Item = L>,
    {
        let mut asm = Assembler::with_capacity(0);
        for (from, to) in edges {
            let from = asm.intern(&from);
            let to = asm.intern(&to);
            asm.connect(from, to);
        }
        for label in extra_labels {
            asm.intern(&label);
        }
        asm.finish()
    }

    /// Union of several graphs: every label and every edge of each input,
    /// read through each input's own orientation.
    #[must_use]
    pub fn union<'a, I>(graphs: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        L: 'a,
    {
        let mut asm = Assembler::with_capacity(0);
        for graph in graphs {
            let ids: Vec<NodeId> = graph.nodes().map(|node| asm.intern(node.label())).collect();
            for node in graph.nodes() {
                for next in node.out_nodes() {
                    asm.connect(ids[node.id().index()], ids[next.id().index()]);
                }
            }
        }
        asm.finish()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.storage.labels.len()
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.storage.edge_count
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.labels.is_empty()
    }

    /// Whether edges are currently read reversed.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Look up a node by label.
    #[must_use]
    pub fn node(&self, label: &L) -> Option<Node<'_, L>> {
        self.storage
            .index
            .get(label)
            .map(|&id| Node { graph: self, id })
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node_by_id(&self, id: NodeId) -> Option<Node<'_, L>> {
        (id.index() < self.node_count()).then_some(Node { graph: self, id })
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = Node<'_, L>> + '_ {
        (0..self.node_count()).map(move |index| Node {
            graph: self,
            id: NodeId::new(index),
        })
    }

    /// Nodes with no in-edges.
    pub fn sources(&self) -> impl Iterator<Item = Node<'_, L>> + '_ {
        self.nodes().filter(|node| node.in_degree() == 0)
    }

    /// Nodes with no out-edges.
    pub fn sinks(&self) -> impl Iterator<Item = Node<'_, L>> + '_ {
        self.nodes().filter(|node| node.out_degree() == 0)
    }

    /// All edges as `(tail, head)` label pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&L, &L)> + '_ {
        self.nodes()
            .flat_map(|node| node.out_nodes().map(move |next| (node.label(), next.label())))
    }

    /// Whether the edge `from → to` exists under the current orientation.
    #[must_use]
    pub fn contains_edge(&self, from: &L, to: &L) -> bool {
        match (self.storage.index.get(from), self.storage.index.get(to)) {
            (Some(&from), Some(&to)) => self.successors(from).contains(&to),
            _ => false,
        }
    }

    /// Flip the orientation in O(1).
    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// A reversed handle sharing this graph's storage.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            reversed: !self.reversed,
        }
    }

    /// Copy into a [`MutableGraph`] with the same labels and (oriented) edges.
    #[must_use]
    pub fn mutable(&self) -> MutableGraph<L> {
        let mut graph = MutableGraph::with_capacity(self.node_count(), self.edge_count());
        for node in self.nodes() {
            graph.add_node(node.label().clone());
        }
        for (from, to) in self.edges() {
            graph.add_edge(from.clone(), to.clone());
        }
        graph
    }

    /// The subgraph induced by `keep`: those nodes and every edge between
    /// them. The result is freshly numbered and not reversed.
    #[must_use]
    pub fn induced_subgraph<I>(&self, keep: I) -> Self
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut kept: Vec<Option<NodeId>> = vec![None; self.node_count()];
        let mut asm = Assembler::with_capacity(0);
        for id in keep {
            kept[id.index()] = Some(asm.intern(self.label_of(id)));
        }
        for node in self.nodes() {
            let Some(from) = kept[node.id().index()] else {
                continue;
            };
            for next in node.out_nodes() {
                if let Some(to) = kept[next.id().index()] {
                    asm.connect(from, to);
                }
            }
        }
        asm.finish()
    }

    pub(crate) fn label_of(&self, id: NodeId) -> &L {
        &self.storage.labels[id.index()]
    }

    pub(crate) fn node_at(&self, id: NodeId) -> Node<'_, L> {
        Node { graph: self, id }
    }

    pub(crate) fn successors(&self, id: NodeId) -> &[NodeId] {
        if self.reversed {
            &self.storage.incoming[id.index()]
        } else {
            &self.storage.outgoing[id.index()]
        }
    }

    pub(crate) fn predecessors(&self, id: NodeId) -> &[NodeId] {
        if self.reversed {
            &self.storage.outgoing[id.index()]
        } else {
            &self.storage.incoming[id.index()]
        }
    }
}

impl<L: Label> Default for Graph<L> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<L: Label> fmt::Debug for Graph<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.storage.labels)
            .field("edges", &self.edges().collect::<Vec<_>>())
            .finish()
    }
}

impl<L: Label> DirectedGraph for Graph<L> {
    type Label = L;

    fn node_count(&self) -> usize {
        self.storage.labels.len()
    }

    fn edge_count(&self) -> usize {
        self.storage.edge_count
    }

    fn contains(&self, label: &L) -> bool {
        self.storage.index.contains_key(label)
    }

    fn labels(&self) -> Vec<&L> {
        self.storage.labels.iter().collect()
    }

    fn edge_pairs(&self) -> Vec<(&L, &L)> {
        self.edges().collect()
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A node of an immutable [`Graph`], borrowed from it.
///
/// Equality and hashing go by label only.
pub struct Node<'g, L> {
    graph: &'g Graph<L>,
    id: NodeId,
}

impl<'g, L: Label> Node<'g, L> {
    /// Arena id within the owning graph.
    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }

    /// The node's label.
    #[must_use]
    pub fn label(self) -> &'g L {
        self.graph.label_of(self.id)
    }

    /// The owning graph.
    #[must_use]
    pub const fn graph(self) -> &'g Graph<L> {
        self.graph
    }

    /// Out-neighbors under the graph's current orientation.
    pub fn out_nodes(self) -> impl ExactSizeIterator<Item = Node<'g, L>> + 'g {
        let graph = self.graph;
        graph
            .successors(self.id)
            .iter()
            .map(move |&id| Node { graph, id })
    }

    /// In-neighbors under the graph's current orientation.
    pub fn in_nodes(self) -> impl ExactSizeIterator<Item = Node<'g, L>> + 'g {
        let graph = self.graph;
        graph
            .predecessors(self.id)
            .iter()
            .map(move |&id| Node { graph, id })
    }

    /// Number of out-neighbors.
    #[must_use]
    pub fn out_degree(self) -> usize {
        self.graph.successors(self.id).len()
    }

    /// Number of in-neighbors.
    #[must_use]
    pub fn in_degree(self) -> usize {
        self.graph.predecessors(self.id).len()
    }
}

impl<L> Clone for Node<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L> Copy for Node<'_, L> {}

impl<L: Label> PartialEq for Node<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        self.label() == other.label()
    }
}

impl<L: Label> Eq for Node<'_, L> {}

impl<L: Label> Hash for Node<'_, L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label().hash(state);
    }
}

impl<L: Label> fmt::Debug for Node<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(self.label()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels<'g>(nodes: impl Iterator<Item = Node<'g, &'static str>>) -> Vec<&'static str> {
        nodes.map(|node| *node.label()).collect()
    }

    #[test]
    fn build_registers_edges_and_extra_labels() {
        let graph = Graph::build([("a", "b"), ("b", "c")], ["d"]);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge(&"a", &"b"));
        assert!(!graph.contains_edge(&"b", &"a"));
        assert_eq!(graph.node(&"d").map(Node::out_degree), Some(0));
    }

    #[test]
    fn sources_and_sinks() {
        let graph = Graph::build([("a", "b"), ("c", "b"), ("b", "d")], []);
        assert_eq!(labels(graph.sources()), vec!["a", "c"]);
        assert_eq!(labels(graph.sinks()), vec!["d"]);
    }

    #[test]
    fn reverse_swaps_neighbors_in_place() {
        let mut graph = Graph::build([("a", "b")], []);
        graph.reverse();
        assert!(graph.is_reversed());
        assert!(graph.contains_edge(&"b", &"a"));
        let a = graph.node(&"a").expect("a exists");
        assert_eq!(a.in_degree(), 1);
        assert_eq!(a.out_degree(), 0);
        assert_eq!(labels(graph.sources()), vec!["b"]);
        graph.reverse();
        assert!(graph.contains_edge(&"a", &"b"));
    }

    #[test]
    fn reversed_handle_shares_storage() {
        let graph = Graph::build([("a", "b"), ("b", "c")], []);
        let back = graph.reversed();
        assert!(Arc::ptr_eq(&graph.storage, &back.storage));
        assert!(back.contains_edge(&"c", &"b"));
        assert!(graph.contains_edge(&"b", &"c"));
    }

    #[test]
    fn union_merges_nodes_and_edges() {
        let left = Graph::build([("a", "b")], []);
        let right = Graph::build([("b", "c")], ["x"]).reversed();
        let merged = Graph::union([&left, &right]);
        let expected = Graph::build([("a", "b"), ("c", "b")], ["x"]);
        assert_eq!(merged, expected);
    }

    #[test]
    fn induced_subgraph_keeps_inner_edges_only() {
        let graph = Graph::build([("a", "b"), ("b", "c"), ("c", "d")], []);
        let keep = ["b", "c"].iter().filter_map(|l| graph.node(l)).map(Node::id);
        let sub = graph.induced_subgraph(keep);
        assert_eq!(sub, Graph::build([("b", "c")], []));
    }

    #[test]
    fn self_loops_are_allowed() {
        let graph = Graph::build([("a", "a")], []);
        let a = graph.node(&"a").expect("a exists");
        assert_eq!(a.in_degree(), 1);
        assert_eq!(a.out_degree(), 1);
        assert_eq!(graph.sources().count(), 0);
    }

    #[test]
    fn node_equality_is_by_label() {
        let left = Graph::build([("a", "b")], []);
        let right = Graph::build([("b", "a")], []);
        assert_eq!(left.node(&"a"), right.node(&"a"));
        assert_ne!(left.node(&"a"), right.node(&"b"));
    }

    #[test]
    fn node_by_id_bounds() {
        let graph = Graph::build([("a", "b")], []);
        assert!(graph.node_by_id(NodeId::new(1)).is_some());
        assert!(graph.node_by_id(NodeId::new(2)).is_none());
    }

    #[test]
    fn mutable_round_trip() {
        let graph = Graph::build([("a", "b"), ("b", "c"), ("c", "a")], ["z"]);
        assert_eq!(graph.mutable().freeze(), graph);
        assert_eq!(graph.mutable(), graph);
    }
}
