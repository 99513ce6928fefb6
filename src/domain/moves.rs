//! Move engine: relocate one node within a tree, addressed by id paths.
//!
//! Every free function clones the caller's roots into a [`TreeArena`],
//! edits the arena and returns the result; the input is never touched.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, NodeRole, TreeResult};
use crate::domain::key::{KeySelector, NodeKey};
use crate::domain::node::Node;

/// Which side of the target a node lands on, relative to the target's siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Edge of the target row the pointer crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEdge {
    Top,
    Bottom,
}

/// Drop location of a drag gesture, carrying the target's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent<K> {
    Before(Vec<K>),
    After(Vec<K>),
    Inside(Vec<K>),
}

impl<K> DropIntent<K> {
    /// Top edge drops above the target, bottom edge below it.
    pub fn from_edge(edge: RowEdge, target: Vec<K>) -> Self {
        match edge {
            RowEdge::Top => DropIntent::Before(target),
            RowEdge::Bottom => DropIntent::After(target),
        }
    }

    pub fn target(&self) -> &[K] {
        match self {
            DropIntent::Before(path) | DropIntent::After(path) | DropIntent::Inside(path) => path,
        }
    }
}

impl<T, K: NodeKey> TreeArena<T, K> {
    /// Resolve the dragged path. `Ok(None)` is the tolerated case of a
    /// top-level (or empty) path that matches nothing.
    fn locate_dragged(&self, dragged: &[K]) -> TreeResult<Option<Index>> {
        match self.resolve_path(dragged) {
            Some(idx) => Ok(Some(idx)),
            None if dragged.len() <= 1 => {
                debug!(path = ?dragged, "dragged node not found at top level, nothing to move");
                Ok(None)
            }
            None => Err(DomainError::not_found(NodeRole::Dragged, dragged.last())),
        }
    }

    fn locate_target(&self, target: &[K]) -> TreeResult<Index> {
        self.resolve_path(target)
            .ok_or_else(|| DomainError::not_found(NodeRole::Target, target.last()))
    }

    /// Move the dragged node next to the target, in the target's sequence.
    ///
    /// Returns `Ok(false)` when nothing changed: an empty path, a dragged
    /// node missing at top level, or a node dropped next to itself.
    #[instrument(level = "debug", skip(self))]
    pub fn place(&mut self, dragged: &[K], target: &[K], placement: Placement) -> TreeResult<bool> {
        if dragged.is_empty() || target.is_empty() {
            return Ok(false);
        }
        let Some(dragged_idx) = self.locate_dragged(dragged)? else {
            return Ok(false);
        };
        let target_idx = self.locate_target(target)?;
        if dragged_idx == target_idx {
            return Ok(false);
        }
        if self.is_ancestor(dragged_idx, target_idx) {
            return Err(DomainError::circular(&target[target.len() - 1]));
        }

        let Some((target_parent, target_index)) = self.position(target_idx) else {
            return Err(DomainError::not_found(NodeRole::Target, target.last()));
        };
        let Some((source_parent, source_index)) = self.detach(dragged_idx) else {
            return Err(DomainError::not_found(NodeRole::Dragged, dragged.last()));
        };

        let mut insert_index = match placement {
            Placement::Before => target_index,
            Placement::After => target_index + 1,
        };
        // Removal shifted everything after the source one slot left
        if source_parent == target_parent && source_index < target_index {
            insert_index -= 1;
        }
        self.attach(dragged_idx, target_parent, insert_index);
        Ok(true)
    }

    /// Re-parent the dragged node as the last child of the target.
    #[instrument(level = "debug", skip(self))]
    pub fn move_as_child(&mut self, dragged: &[K], target: &[K]) -> TreeResult<bool> {
        if dragged.is_empty() || target.is_empty() || dragged == target {
            return Ok(false);
        }
        let Some(dragged_idx) = self.locate_dragged(dragged)? else {
            return Ok(false);
        };
        let target_idx = self.locate_target(target)?;
        if (target.len() > dragged.len() && target.starts_with(dragged))
            || self.is_ancestor(dragged_idx, target_idx)
        {
            return Err(DomainError::circular(&target[target.len() - 1]));
        }

        if self.detach(dragged_idx).is_none() {
            return Err(DomainError::not_found(NodeRole::Dragged, dragged.last()));
        }
        self.attach(dragged_idx, Some(target_idx), usize::MAX);
        Ok(true)
    }

    /// Dispatch a [`DropIntent`].
    pub fn apply_drop(&mut self, dragged: &[K], intent: &DropIntent<K>) -> TreeResult<bool> {
        match intent {
            DropIntent::Before(target) => self.place(dragged, target, Placement::Before),
            DropIntent::After(target) => self.place(dragged, target, Placement::After),
            DropIntent::Inside(target) => self.move_as_child(dragged, target),
        }
    }
}

fn edit<T, S, F>(roots: &[Node<T>], key: &S, op: F) -> TreeResult<Vec<Node<T>>>
where
    T: Clone,
    S: KeySelector<T>,
    F: FnOnce(&mut TreeArena<T, S::Key>) -> TreeResult<bool>,
{
    let mut working = TreeArena::from_nodes(roots, key)?;
    if op(&mut working)? {
        Ok(working.into_nodes())
    } else {
        Ok(roots.to_vec())
    }
}

/// Drop the dragged node directly below the target row.
pub fn place_after<T, S>(
    roots: &[Node<T>],
    key: &S,
    dragged: &[S::Key],
    target: &[S::Key],
) -> TreeResult<Vec<Node<T>>>
where
    T: Clone,
    S: KeySelector<T>,
{
    edit(roots, key, |tree| tree.place(dragged, target, Placement::After))
}

/// Drop the dragged node directly above the target row.
pub fn place_before<T, S>(
    roots: &[Node<T>],
    key: &S,
    dragged: &[S::Key],
    target: &[S::Key],
) -> TreeResult<Vec<Node<T>>>
where
    T: Clone,
    S: KeySelector<T>,
{
    edit(roots, key, |tree| tree.place(dragged, target, Placement::Before))
}

/// Append the dragged node to the target's children.
pub fn move_as_child<T, S>(
    roots: &[Node<T>],
    key: &S,
    dragged: &[S::Key],
    target: &[S::Key],
) -> TreeResult<Vec<Node<T>>>
where
    T: Clone,
    S: KeySelector<T>,
{
    edit(roots, key, |tree| tree.move_as_child(dragged, target))
}

/// Apply a drag gesture expressed as a [`DropIntent`].
pub fn apply_drop<T, S>(
    roots: &[Node<T>],
    key: &S,
    dragged: &[S::Key],
    intent: &DropIntent<S::Key>,
) -> TreeResult<Vec<Node<T>>>
where
    T: Clone,
    S: KeySelector<T>,
{
    edit(roots, key, |tree| tree.apply_drop(dragged, intent))
}
