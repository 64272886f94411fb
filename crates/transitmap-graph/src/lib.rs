#![forbid(unsafe_code)]
//! transitmap-graph library.
//!
//! Directed-graph machinery behind service maps: an arena-backed graph
//! model, iterative traversals, structural casts, transitive reduction,
//! tree–graph–tree decomposition, path stitching and a chain-preserving
//! topological sort.
//!
//! ## Pipeline
//!
//! ```text
//! per-trip stop sequences
//!        ↓  model::Path::new()
//! Vec<Path<L>>
//!        ↓  stitch::stitch()
//! Graph<L> (DAG for ordinary lines, may be cyclic for loops)
//!        ↓  ops::cast_to_path()       (already a straight line?)
//!        ↓  sort::topological_sort()  (otherwise)
//! OrderedGraph<L>
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed errors via `thiserror` ([`GraphError`], [`SortError`]).
//!   Wrong-shape casts return `None`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod error;
pub mod model;
pub mod ops;
pub mod sort;
pub mod stitch;
pub mod traversal;

pub use error::{GraphError, SortError};
pub use model::{DirectedGraph, Graph, Label, MutableGraph, Node, NodeId, OrderedGraph, Path, Tree};
pub use ops::{
    TgtDecomposition, calculate_tgt_decomposition, cast_to_path, cast_to_tree,
    split_into_connected_components, transitive_reduction,
};
pub use sort::topological_sort;
pub use stitch::stitch;
pub use traversal::{TraversalOrder, dfs, dfs_by_key};
