//! Tree–graph–tree (TGT) decomposition.
//!
//! Many rail lines are a straight run that fans out or in around terminal
//! branches and storage tracks. TGT splits such a DAG into:
//!
//! ```text
//!   a ─┐                        ┌─ x
//!   b ─┼─▶ J₁ ══ middle ══ J₂ ─┼─▶ y
//!   c ─┘                        └─ z
//!   leading in-tree           trailing out-tree
//! ```
//!
//! - the **leading tree**: every node that funnels into a single join `J₁`,
//!   stored reversed so the join is the root;
//! - the **middle graph**: whatever lies between the joins, `None` when
//!   the two trees meet at one node;
//! - the **trailing tree**: every node fanning out of the join `J₂`.

use std::fmt;

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use super::cast::{cast_to_path, cast_to_tree};
use crate::model::{Graph, Label, Node, NodeId, Tree};

/// Result of [`calculate_tgt_decomposition`].
///
/// All three parts are `None` when the graph does not decompose.
#[derive(Clone)]
pub struct TgtDecomposition<L> {
    /// Nodes funnelling into the first join, reversed so the join is root.
    pub leading: Option<Tree<L>>,
    /// Everything between the two joins, joins included when they differ.
    pub middle: Option<Graph<L>>,
    /// Nodes fanning out of the second join, rooted at it.
    pub trailing: Option<Tree<L>>,
}

impl<L: Label> TgtDecomposition<L> {
    const fn failed() -> Self {
        Self {
            leading: None,
            middle: None,
            trailing: None,
        }
    }

    /// Whether the decomposition produced anything.
    #[must_use]
    pub const fn is_decomposed(&self) -> bool {
        self.leading.is_some() || self.trailing.is_some()
    }
}

impl<L: Label> fmt::Debug for TgtDecomposition<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TgtDecomposition")
            .field("leading", &self.leading)
            .field("middle", &self.middle)
            .field("trailing", &self.trailing)
            .finish()
    }
}

/// Decompose a DAG into leading tree, middle graph and trailing tree.
///
/// A forward sweep from all sources absorbs a node once every in-edge has
/// been traversed and it has exactly one out-edge; a ready node with any
/// other out-degree is a candidate join. Exactly one candidate must
/// remain, otherwise the decomposition fails. The same sweep on the
/// reversed remainder finds the trailing tree.
///
/// On failure, a graph that is already path-shaped is returned as a single
/// leading tree; anything else yields all-`None`. Path-shaped graphs take
/// that branch up front.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn calculate_tgt_decomposition<L: Label>(graph: &Graph<L>) -> TgtDecomposition<L> {
    if let Some(path) = cast_to_path(graph) {
        debug!("graph is path-shaped, returning a single tree");
        return TgtDecomposition {
            leading: cast_to_tree(path.graph()),
            middle: None,
            trailing: None,
        };
    }

    decompose(graph).unwrap_or_else(|| {
        debug!("no unique join node, decomposition failed");
        TgtDecomposition::failed()
    })
}

fn decompose<L: Label>(graph: &Graph<L>) -> Option<TgtDecomposition<L>> {
    let lead = sweep(graph)?;

    let mut lead_members = lead.absorbed.clone();
    lead_members.insert(lead.join.index());
    let leading = cast_to_tree(&graph.induced_subgraph(ids(&lead_members)).reversed())?;

    // Everything the leading tree did not absorb; the first join stays.
    let mut rest = FixedBitSet::with_capacity(graph.node_count());
    rest.insert_range(..);
    rest.difference_with(&lead.absorbed);
    let remainder = graph.induced_subgraph(ids(&rest));

    let trail = sweep(&remainder.reversed())?;
    let mut trail_members = trail.absorbed.clone();
    trail_members.insert(trail.join.index());
    let trailing = cast_to_tree(&remainder.induced_subgraph(ids(&trail_members)))?;

    let mut middle_members = FixedBitSet::with_capacity(remainder.node_count());
    middle_members.insert_range(..);
    middle_members.difference_with(&trail.absorbed);
    let shared_join = remainder.node_by_id(trail.join).map(Node::label)
        == graph.node_by_id(lead.join).map(Node::label);
    if shared_join {
        middle_members.set(trail.join.index(), false);
    }
    let middle = (middle_members.count_ones(..) > 0)
        .then(|| remainder.induced_subgraph(ids(&middle_members)));

    Some(TgtDecomposition {
        leading: Some(leading),
        middle,
        trailing: Some(trailing),
    })
}

/// Outcome of one directional sweep.
struct Sweep {
    absorbed: FixedBitSet,
    join: NodeId,
}

fn sweep<L: Label>(graph: &Graph<L>) -> Option<Sweep> {
    let mut traversed = vec![0_usize; graph.node_count()];
    let mut absorbed = FixedBitSet::with_capacity(graph.node_count());
    let mut candidates: Vec<NodeId> = Vec::new();
    let mut ready: Vec<Node<'_, L>> = graph.sources().collect();

    while let Some(node) = ready.pop() {
        let mut successors = node.out_nodes();
        let (Some(next), None) = (successors.next(), successors.next()) else {
            candidates.push(node.id());
            continue;
        };
        absorbed.insert(node.id().index());
        let seen = &mut traversed[next.id().index()];
        *seen += 1;
        if *seen == next.in_degree() {
            ready.push(next);
        }
    }

    match candidates.as_slice() {
        [join] => Some(Sweep {
            absorbed,
            join: *join,
        }),
        _ => None,
    }
}

fn ids(set: &FixedBitSet) -> impl Iterator<Item = NodeId> + '_ {
    set.ones().map(NodeId::new)
}
