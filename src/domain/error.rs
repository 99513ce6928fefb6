//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Which operand of a move could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Dragged,
    Target,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Dragged => write!(f, "dragged"),
            NodeRole::Target => write!(f, "target"),
        }
    }
}

/// Domain errors represent violated tree invariants or caller bugs.
/// Ids are carried as their display form so the error stays non-generic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("item at position {position} is missing key '{key}'")]
    MissingKey { key: String, position: usize },

    #[error("circular dependency detected at node '{id}'")]
    CircularDependency { id: String },

    #[error("parent node with id '{parent}' not found for node with id '{id}'")]
    InvalidTree { id: String, parent: String },

    #[error("cannot find {role} node with id '{id}'")]
    NodeNotFound { role: NodeRole, id: String },
}

impl DomainError {
    pub(crate) fn circular(id: &impl fmt::Display) -> Self {
        DomainError::CircularDependency { id: id.to_string() }
    }

    pub(crate) fn not_found(role: NodeRole, id: Option<&impl fmt::Display>) -> Self {
        DomainError::NodeNotFound {
            role,
            id: id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
