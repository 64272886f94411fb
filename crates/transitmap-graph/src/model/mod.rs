//! Graph model: immutable and mutable directed graphs plus the structured
//! views (tree, path, ordered graph) layered on top of them.
//!
//! # Storage
//!
//! Nodes live in an index arena. Adjacency is stored as [`NodeId`] lists,
//! never as node-to-node references, so a graph holds no reference cycles
//! and is released deterministically when its last handle drops. Graphs are
//! created and thrown away at high frequency while service maps are
//! recomputed; nothing here waits on a collector.
//!
//! - [`Graph`] is immutable. Adjacency is frozen into boxed slices once and
//!   shared behind an `Arc`, so cloning a graph (or wrapping it in a
//!   [`Tree`], [`Path`] or [`OrderedGraph`]) is O(1).
//! - [`MutableGraph`] wraps a petgraph `StableDiGraph` and supports node and
//!   edge creation and deletion. [`MutableGraph::freeze`] and
//!   [`Graph::mutable`] convert between the two in O(V + E).
//!
//! # Orientation
//!
//! Every graph carries a single orientation bit. [`Graph::reverse`] flips it
//! in O(1); nodes read the bit through their graph handle, so in- and
//! out-neighbors swap without touching per-node storage.

mod graph;
mod mutable;
mod views;

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

pub use graph::{Graph, Node};
pub use mutable::MutableGraph;
pub use views::{OrderedGraph, Path, Tree};

/// Anything usable as a node label (stop ids, station ids, test integers).
pub trait Label: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Label for T {}

/// Index of a node inside one immutable [`Graph`].
///
/// Ids are only meaningful for the graph that issued them; views created
/// from a graph (reversal, clones) share its id space, derived graphs
/// (subgraphs, unions) do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this node in its graph's arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Operations shared by every graph-like type in this crate.
///
/// Equality across implementors follows one rule: same label set and same
/// edge set, as seen through each graph's current orientation.
pub trait DirectedGraph {
    /// Node label type.
    type Label: Label;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of distinct edges.
    fn edge_count(&self) -> usize;

    /// Whether a node with this label exists.
    fn contains(&self, label: &Self::Label) -> bool;

    /// All node labels, in the graph's iteration order.
    fn labels(&self) -> Vec<&Self::Label>;

    /// All edges as `(tail, head)` label pairs.
    fn edge_pairs(&self) -> Vec<(&Self::Label, &Self::Label)>;

    /// Compare label and edge sets with another graph.
    fn same_structure<G>(&self, other: &G) -> bool
    where
        G: DirectedGraph<Label = Self::Label> + ?Sized,
    {
        if self.node_count() != other.node_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        let labels: HashSet<&Self::Label> = self.labels().into_iter().collect();
        if !other.labels().iter().all(|label| labels.contains(label)) {
            return false;
        }
        let edges: HashSet<(&Self::Label, &Self::Label)> =
            self.edge_pairs().into_iter().collect();
        other.edge_pairs().iter().all(|edge| edges.contains(edge))
    }
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Accumulates labels and deduplicated edges, then freezes them into a
/// [`Graph`].
#[derive(Debug)]
pub(crate) struct Assembler<L> {
    labels: Vec<L>,
    index: HashMap<L, NodeId>,
    seen: HashSet<(NodeId, NodeId)>,
    edges: Vec<(NodeId, NodeId)>,
}

impl<L: Label> Assembler<L> {
    pub(crate) fn with_capacity(nodes: usize) -> Self {
        Self {
            labels: Vec::with_capacity(nodes),
            index: HashMap::with_capacity(nodes),
            seen: HashSet::new(),
            edges: Vec::new(),
        }
    }

    pub(crate) fn contains(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    /// Return the id for `label`, registering it on first sight.
    pub(crate) fn intern(&mut self, label: &L) -> NodeId {
        if let Some(id) = self.index.get(label) {
            return *id;
        }
        let id = NodeId::new(self.labels.len());
        self.labels.push(label.clone());
        self.index.insert(label.clone(), id);
        id
    }

    pub(crate) fn connect(&mut self, from: NodeId, to: NodeId) {
        if self.seen.insert((from, to)) {
            self.edges.push((from, to));
        }
    }

    pub(crate) fn finish(self) -> Graph<L> {
        let mut outgoing: Vec<Vec<NodeId>> = vec![Vec::new(); self.labels.len()];
        let mut incoming: Vec<Vec<NodeId>> = vec![Vec::new(); self.labels.len()];
        for &(from, to) in &self.edges {
            outgoing[from.index()].push(to);
            incoming[to.index()].push(from);
        }
        Graph::from_storage(
            self.labels,
            self.index,
            outgoing.into_iter().map(Vec::into_boxed_slice).collect(),
            incoming.into_iter().map(Vec::into_boxed_slice).collect(),
            self.edges.len(),
        )
    }
}

macro_rules! impl_structural_eq {
    ($left:ident, $right:ident) => {
        impl<L: Label> PartialEq<$right<L>> for $left<L> {
            fn eq(&self, other: &$right<L>) -> bool {
                self.same_structure(other)
            }
        }
    };
}

impl_structural_eq!(Graph, Graph);
impl_structural_eq!(MutableGraph, MutableGraph);
impl_structural_eq!(Graph, MutableGraph);
impl_structural_eq!(MutableGraph, Graph);

impl<L: Label> Eq for Graph<L> {}
impl<L: Label> Eq for MutableGraph<L> {}
