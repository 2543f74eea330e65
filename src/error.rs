//! Error types shared by all modules.

use thiserror::Error;

/// Errors returned by layout generation.
///
/// `IsolatedNode` and `DoorMismatch` are defects in the inputs or in the
/// collaborators: a run that hits one of them cannot produce a layout and
/// should be aborted rather than retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A placed node has no graph neighbours, so its validity mask is empty.
    #[error("node {node} has no neighbours")]
    IsolatedNode { node: usize },

    /// Two nodes accepted as touching share no door candidate.
    #[error("nodes {from} and {to} touch but have no common door candidate")]
    DoorMismatch { from: usize, to: usize },

    /// An operation that moves a node was given a node without a configuration.
    #[error("node {node} is not placed")]
    Unplaced { node: usize },

    #[error("invalid generator configuration: {0}")]
    Config(String),

    #[error("invalid graph: {0}")]
    Graph(String),

    #[error("invalid polygon: {0}")]
    Polygon(String),

    #[error("invalid chain decomposition: {0}")]
    Decomposition(String),

    #[error("shape catalog is empty")]
    EmptyCatalog,
}

pub type LayoutResult<T> = Result<T, LayoutError>;
