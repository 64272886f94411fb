//! Error types for graph construction, mutation and ordering.
//!
//! Labels are generic, so errors carry their `Debug` rendering rather than
//! the label itself. That keeps the error types free of type parameters and
//! lets them cross crate boundaries as plain values.

use std::fmt::Debug;

// ---------------------------------------------------------------------------
// Machine-readable error codes
// ---------------------------------------------------------------------------

/// Machine-readable codes for [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphErrorCode {
    /// An operation referenced a label that is not in the graph.
    MissingNode,
    /// A node was created with a label that already exists.
    DuplicateNode,
    /// An edge was deleted that does not exist.
    MissingEdge,
    /// A path was built from a label list that repeats a label.
    RepeatedLabel,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from graph mutation and path construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The referenced node does not exist.
    #[error("node {label} does not exist")]
    MissingNode {
        /// Debug rendering of the missing label.
        label: String,
    },

    /// A node with this label already exists.
    #[error("node {label} already exists")]
    DuplicateNode {
        /// Debug rendering of the duplicated label.
        label: String,
    },

    /// The referenced edge does not exist.
    #[error("edge {from} -> {to} does not exist")]
    MissingEdge {
        /// Debug rendering of the edge's tail.
        from: String,
        /// Debug rendering of the edge's head.
        to: String,
    },

    /// A path must visit each label at most once.
    #[error("label {label} appears more than once in a path")]
    RepeatedLabel {
        /// Debug rendering of the repeated label.
        label: String,
    },
}

impl GraphError {
    pub(crate) fn missing_node<L: Debug>(label: &L) -> Self {
        Self::MissingNode {
            label: format!("{label:?}"),
        }
    }

    pub(crate) fn duplicate_node<L: Debug>(label: &L) -> Self {
        Self::DuplicateNode {
            label: format!("{label:?}"),
        }
    }

    pub(crate) fn missing_edge<L: Debug>(from: &L, to: &L) -> Self {
        Self::MissingEdge {
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }

    pub(crate) fn repeated_label<L: Debug>(label: &L) -> Self {
        Self::RepeatedLabel {
            label: format!("{label:?}"),
        }
    }

    /// Return the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> GraphErrorCode {
        match self {
            Self::MissingNode { .. } => GraphErrorCode::MissingNode,
            Self::DuplicateNode { .. } => GraphErrorCode::DuplicateNode,
            Self::MissingEdge { .. } => GraphErrorCode::MissingEdge,
            Self::RepeatedLabel { .. } => GraphErrorCode::RepeatedLabel,
        }
    }
}

/// Raised when a graph expected to be acyclic cannot be linearized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The source pool ran dry while nodes with pending in-edges remained.
    #[error("graph contains a cycle: {remaining} of {total} nodes could not be ordered")]
    CannotSort {
        /// Nodes left unordered when the sort stalled.
        remaining: usize,
        /// Total nodes in the graph.
        total: usize,
    },
}
