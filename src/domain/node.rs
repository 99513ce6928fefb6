//! Nested tree value handed to and returned from every operation.

use serde::{Deserialize, Serialize};

/// A payload plus its ordered children.
///
/// The parent of a node is implicit: it is whichever children sequence (or
/// root list) contains it. Payload fields serialize flat, next to a
/// `children` array that is omitted for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node<T>>,
}

impl<T> Node<T> {
    pub fn leaf(data: T) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(data: T, children: Vec<Node<T>>) -> Self {
        Self { data, children }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, self included.
    pub fn size(&self) -> usize {
        1 + count_nodes(&self.children)
    }
}

/// Total number of nodes below and including the given roots.
pub fn count_nodes<T>(roots: &[Node<T>]) -> usize {
    roots.iter().map(Node::size).sum()
}
