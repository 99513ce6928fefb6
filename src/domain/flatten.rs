//! Flattening a nested tree into depth-annotated rows for linear display.

use std::collections::HashMap;

use serde::Serialize;
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::key::{KeySelector, NodeKey};
use crate::domain::node::Node;

/// Expand/collapse flags keyed by node id.
///
/// Opt-out: an id without an entry counts as expanded.
#[derive(Debug, Clone)]
pub struct ExpandedState<K> {
    entries: HashMap<K, bool>,
}

impl<K> Default for ExpandedState<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: NodeKey> ExpandedState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &K) -> bool {
        self.entries.get(id).copied().unwrap_or(true)
    }

    pub fn set(&mut self, id: K, expanded: bool) {
        self.entries.insert(id, expanded);
    }

    pub fn expand(&mut self, id: K) {
        self.set(id, true);
    }

    pub fn collapse(&mut self, id: K) {
        self.set(id, false);
    }

    /// Flip the current state, starting from the opt-out default.
    pub fn toggle(&mut self, id: K) {
        let next = !self.is_expanded(&id);
        self.set(id, next);
    }
}

impl<K: NodeKey> FromIterator<(K, bool)> for ExpandedState<K> {
    fn from_iter<It: IntoIterator<Item = (K, bool)>>(iter: It) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One visible node. Serializes the payload under `data`, next to the row
/// metadata, so payload field names never clash with `level` and friends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRow<'a, T, K> {
    pub data: &'a T,
    /// Depth, 0 for roots
    pub level: usize,
    /// Root-to-node ids, self included (never empty)
    pub ids: Vec<K>,
    /// Position among the node's siblings
    pub sibling_index: usize,
    /// Number of direct children, visible or not
    pub child_count: usize,
    /// Whether this node's children were emitted
    pub expanded: bool,
    /// Strictly below the node currently being dragged
    pub in_drag_subtree: bool,
}

impl<'a, T, K> FlatRow<'a, T, K> {
    pub fn id(&self) -> &K {
        &self.ids[self.ids.len() - 1]
    }

    pub fn parent_id(&self) -> Option<&K> {
        self.ids.len().checked_sub(2).map(|i| &self.ids[i])
    }
}

/// Inputs for [`flatten_with`].
#[derive(Debug, Clone)]
pub struct FlattenOptions<'s, K> {
    /// `None` includes every descendant
    pub expanded: Option<&'s ExpandedState<K>>,
    /// Root of the subtree being dragged, if any
    pub drag_root: Option<K>,
}

impl<K> Default for FlattenOptions<'_, K> {
    fn default() -> Self {
        Self {
            expanded: None,
            drag_root: None,
        }
    }
}

struct Frame<'a, T, K> {
    node: &'a Node<T>,
    level: usize,
    ids: Vec<K>,
    sibling_index: usize,
    in_drag_subtree: bool,
}

/// Visible rows: children only appear under expanded nodes.
pub fn flatten<'a, T, S>(
    roots: &'a [Node<T>],
    key: &S,
    expanded: &ExpandedState<S::Key>,
) -> TreeResult<Vec<FlatRow<'a, T, S::Key>>>
where
    S: KeySelector<T>,
{
    flatten_with(
        roots,
        key,
        &FlattenOptions {
            expanded: Some(expanded),
            drag_root: None,
        },
    )
}

/// All rows, ignoring any expansion state.
pub fn flatten_all<'a, T, S>(roots: &'a [Node<T>], key: &S) -> TreeResult<Vec<FlatRow<'a, T, S::Key>>>
where
    S: KeySelector<T>,
{
    flatten_with(roots, key, &FlattenOptions::default())
}

/// Depth-first, parent before children, sibling order preserved.
#[instrument(level = "debug", skip_all, fields(roots = roots.len()))]
pub fn flatten_with<'a, T, S>(
    roots: &'a [Node<T>],
    key: &S,
    options: &FlattenOptions<'_, S::Key>,
) -> TreeResult<Vec<FlatRow<'a, T, S::Key>>>
where
    S: KeySelector<T>,
{
    let select = |node: &Node<T>, position: usize| {
        key.select(&node.data).ok_or_else(|| DomainError::MissingKey {
            key: key.describe().into_owned(),
            position,
        })
    };

    let mut rows = Vec::new();
    let mut stack = Vec::with_capacity(roots.len());
    for (sibling_index, node) in roots.iter().enumerate().rev() {
        stack.push(Frame {
            node,
            level: 0,
            ids: Vec::new(),
            sibling_index,
            in_drag_subtree: false,
        });
    }

    while let Some(mut frame) = stack.pop() {
        let id = select(frame.node, rows.len())?;
        let expanded = options.expanded.map_or(true, |state| state.is_expanded(&id));
        let below_drag = frame.in_drag_subtree || options.drag_root.as_ref() == Some(&id);
        frame.ids.push(id);

        if expanded {
            for (sibling_index, child) in frame.node.children.iter().enumerate().rev() {
                stack.push(Frame {
                    node: child,
                    level: frame.level + 1,
                    ids: frame.ids.clone(),
                    sibling_index,
                    in_drag_subtree: below_drag,
                });
            }
        }

        rows.push(FlatRow {
            data: &frame.node.data,
            level: frame.level,
            ids: frame.ids,
            sibling_index: frame.sibling_index,
            child_count: frame.node.children.len(),
            expanded,
            in_drag_subtree: frame.in_drag_subtree,
        });
    }

    Ok(rows)
}

/// Root-to-node path of `id`, searching the whole tree.
pub fn find_path<T, S>(roots: &[Node<T>], key: &S, id: &S::Key) -> TreeResult<Option<Vec<S::Key>>>
where
    S: KeySelector<T>,
{
    Ok(flatten_all(roots, key)?
        .into_iter()
        .find(|row| row.id() == id)
        .map(|row| row.ids))
}
