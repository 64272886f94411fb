//! Mutable directed graph backed by a petgraph `StableDiGraph`.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use super::{Assembler, DirectedGraph, Graph, Label};
use crate::error::GraphError;

/// A directed graph supporting node and edge creation and deletion.
///
/// Node indices stay valid across deletions (`StableDiGraph`), and a
/// label → index map gives O(1) lookup. Edges are a set: creating an edge
/// that already exists is a no-op.
#[derive(Debug, Clone)]
pub struct MutableGraph<L> {
    graph: StableDiGraph<L, ()>,
    index: HashMap<L, NodeIndex>,
    reversed: bool,
}

impl<L: Label> Default for MutableGraph<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> MutableGraph<L> {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// An empty graph with room for `nodes` nodes and `edges` edges.
    #[must_use]
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: StableDiGraph::with_capacity(nodes, edges),
            index: HashMap::with_capacity(nodes),
            reversed: false,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether a node with this label exists.
    #[must_use]
    pub fn contains(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    /// The stored label equal to `label`, if present.
    #[must_use]
    pub fn node(&self, label: &L) -> Option<&L> {
        self.index.get(label).map(|&idx| &self.graph[idx])
    }

    /// Labels with no in-edges under the current orientation.
    #[must_use]
    pub fn sources(&self) -> Vec<&L> {
        self.endpoints(self.out_direction().opposite())
    }

    /// Labels with no out-edges under the current orientation.
    #[must_use]
    pub fn sinks(&self) -> Vec<&L> {
        self.endpoints(self.out_direction())
    }

    /// Flip the orientation in O(1).
    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Create a node.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] if the label already exists.
    pub fn create_node(&mut self, label: L) -> Result<(), GraphError> {
        if self.index.contains_key(&label) {
            return Err(GraphError::duplicate_node(&label));
        }
        self.insert_node(label);
        Ok(())
    }

    /// Create a node unless it already exists. Returns `true` if created.
    pub fn add_node(&mut self, label: L) -> bool {
        if self.index.contains_key(&label) {
            return false;
        }
        self.insert_node(label);
        true
    }

    /// Delete a node after removing every edge incident to it.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingNode`] if the label does not exist.
    pub fn delete_node(&mut self, label: &L) -> Result<(), GraphError> {
        let idx = self.lookup(label)?;
        let incident: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|edge| edge.id())
            .collect();
        for edge in incident {
            self.graph.remove_edge(edge);
        }
        self.graph.remove_node(idx);
        self.index.remove(label);
        Ok(())
    }

    /// Create the edge `from → to`.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingNode`] if either endpoint does not exist.
    pub fn create_edge(&mut self, from: &L, to: &L) -> Result<(), GraphError> {
        let (tail, head) = self.stored_endpoints(from, to)?;
        self.graph.update_edge(tail, head, ());
        Ok(())
    }

    /// Create the edge `from → to`, creating missing endpoints first.
    pub fn add_edge(&mut self, from: L, to: L) {
        let from = self.insert_node(from);
        let to = self.insert_node(to);
        let (tail, head) = if self.reversed { (to, from) } else { (from, to) };
        self.graph.update_edge(tail, head, ());
    }

    /// Delete the edge `from → to`.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingNode`] if either endpoint does not exist,
    /// [`GraphError::MissingEdge`] if the edge does not.
    pub fn delete_edge(&mut self, from: &L, to: &L) -> Result<(), GraphError> {
        let (tail, head) = self.stored_endpoints(from, to)?;
        let edge = self
            .graph
            .find_edge(tail, head)
            .ok_or_else(|| GraphError::missing_edge(from, to))?;
        self.graph.remove_edge(edge);
        Ok(())
    }

    /// Delete the edge `from → to` if present. Returns `true` if removed.
    pub fn discard_edge(&mut self, from: &L, to: &L) -> bool {
        let Ok((tail, head)) = self.stored_endpoints(from, to) else {
            return false;
        };
        self.graph
            .find_edge(tail, head)
            .and_then(|edge| self.graph.remove_edge(edge))
            .is_some()
    }

    /// Whether the edge `from → to` exists under the current orientation.
    #[must_use]
    pub fn contains_edge(&self, from: &L, to: &L) -> bool {
        self.stored_endpoints(from, to)
            .is_ok_and(|(tail, head)| self.graph.contains_edge(tail, head))
    }

    /// Out-neighbors of `label`; empty when the label does not exist.
    #[must_use]
    pub fn successors(&self, label: &L) -> Vec<&L> {
        self.neighbors(label, self.out_direction())
    }

    /// In-neighbors of `label`; empty when the label does not exist.
    #[must_use]
    pub fn predecessors(&self, label: &L) -> Vec<&L> {
        self.neighbors(label, self.out_direction().opposite())
    }

    /// All edges as `(tail, head)` label pairs under the current orientation.
    #[must_use]
    pub fn edges(&self) -> Vec<(&L, &L)> {
        (&self.graph)
            .edge_references()
            .map(|edge| {
                let (tail, head) = (&self.graph[edge.source()], &self.graph[edge.target()]);
                if self.reversed { (head, tail) } else { (tail, head) }
            })
            .collect()
    }

    /// Copy into an immutable [`Graph`].
    #[must_use]
    pub fn immutable(&self) -> Graph<L> {
        let mut asm = Assembler::with_capacity(self.node_count());
        for idx in self.graph.node_indices() {
            asm.intern(&self.graph[idx]);
        }
        for (from, to) in self.edges() {
            let from = asm.intern(from);
            let to = asm.intern(to);
            asm.connect(from, to);
        }
        asm.finish()
    }

    /// Consume into an immutable [`Graph`].
    #[must_use]
    pub fn freeze(self) -> Graph<L> {
        self.immutable()
    }

    fn insert_node(&mut self, label: L) -> NodeIndex {
        if let Some(&idx) = self.index.get(&label) {
            return idx;
        }
        let idx = self.graph.add_node(label.clone());
        self.index.insert(label, idx);
        idx
    }

    fn lookup(&self, label: &L) -> Result<NodeIndex, GraphError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| GraphError::missing_node(label))
    }

    /// Map an oriented edge onto the stored direction.
    fn stored_endpoints(&self, from: &L, to: &L) -> Result<(NodeIndex, NodeIndex), GraphError> {
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        Ok(if self.reversed { (to, from) } else { (from, to) })
    }

    const fn out_direction(&self) -> Direction {
        if self.reversed {
            Direction::Incoming
        } else {
            Direction::Outgoing
        }
    }

    fn endpoints(&self, empty: Direction) -> Vec<&L> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_directed(idx, empty).next().is_none())
            .map(|idx| &self.graph[idx])
            .collect()
    }

    fn neighbors(&self, label: &L, direction: Direction) -> Vec<&L> {
        self.index.get(label).map_or_else(Vec::new, |&idx| {
            self.graph
                .neighbors_directed(idx, direction)
                .map(|next| &self.graph[next])
                .collect()
        })
    }
}

impl<L: Label> DirectedGraph for MutableGraph<L> {
    type Label = L;

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn contains(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    fn labels(&self) -> Vec<&L> {
        self.graph.node_indices().map(|idx| &self.graph[idx]).collect()
    }

    fn edge_pairs(&self) -> Vec<(&L, &L)> {
        self.edges()
    }
}
