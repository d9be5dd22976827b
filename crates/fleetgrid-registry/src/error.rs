//! Error types for the node registry.

use thiserror::Error;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("node already exists: {0}")]
    DuplicateNode(String),

    #[error("insufficient capacity on node {node_id}: {available} available, {required} required")]
    InsufficientCapacity {
        node_id: String,
        available: u64,
        required: u64,
    },
}
