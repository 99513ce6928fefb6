use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::key::{KeySelector, NodeKey};
use crate::domain::node::Node;

/// Tree node in the arena-based working structure.
#[derive(Debug, Clone)]
pub struct TreeNode<T, K> {
    /// Caller payload, moved in and out untouched
    pub data: T,
    /// Id read from the payload when the node entered the arena
    pub key: K,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in sibling order
    pub children: Vec<Index>,
}

/// Arena-based forest used as the working copy of a tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Paths are resolved to indices once; all edits afterwards are index splices
/// on a children list or on the root list.
#[derive(Debug, Clone)]
pub struct TreeArena<T, K> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<T, K>>,
    /// Root nodes in order
    roots: Vec<Index>,
}

impl<T, K> Default for TreeArena<T, K> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }
}

impl<T, K: NodeKey> TreeArena<T, K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone a nested tree into a fresh arena, reading every id with `key`.
    #[instrument(level = "debug", skip_all)]
    pub fn from_nodes<S>(nodes: &[Node<T>], key: &S) -> TreeResult<Self>
    where
        T: Clone,
        S: KeySelector<T, Key = K>,
    {
        let mut tree = Self::new();
        let mut position = 0;
        for node in nodes {
            tree.insert_subtree(node, key, None, &mut position)?;
        }
        Ok(tree)
    }

    fn insert_subtree<S>(
        &mut self,
        node: &Node<T>,
        key: &S,
        parent: Option<Index>,
        position: &mut usize,
    ) -> TreeResult<()>
    where
        T: Clone,
        S: KeySelector<T, Key = K>,
    {
        let id = key
            .select(&node.data)
            .ok_or_else(|| DomainError::MissingKey {
                key: key.describe().into_owned(),
                position: *position,
            })?;
        *position += 1;

        let idx = self.insert_node(node.data.clone(), id, parent);
        for child in &node.children {
            self.insert_subtree(child, key, Some(idx), position)?;
        }
        Ok(())
    }

    /// Insert a node as the last child of `parent`, or as the last root.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: T, key: K, parent: Option<Index>) -> Index {
        let node_idx = self.insert_detached(data, key);
        self.attach(node_idx, parent, usize::MAX);
        node_idx
    }

    /// Insert a node that is neither a root nor anybody's child yet.
    pub fn insert_detached(&mut self, data: T, key: K) -> Index {
        self.arena.insert(TreeNode {
            data,
            key,
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode<T, K>> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Number of nodes stored, including detached ones.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal over all roots, siblings left to right.
    pub fn iter(&self) -> TreeIterator<'_, T, K> {
        TreeIterator::new(self)
    }

    /// The sequence that holds children of `parent`, or the roots.
    fn siblings(&self, parent: Option<Index>) -> Option<&Vec<Index>> {
        match parent {
            Some(parent_idx) => self.arena.get(parent_idx).map(|p| &p.children),
            None => Some(&self.roots),
        }
    }

    fn siblings_mut(&mut self, parent: Option<Index>) -> Option<&mut Vec<Index>> {
        match parent {
            Some(parent_idx) => self.arena.get_mut(parent_idx).map(|p| &mut p.children),
            None => Some(&mut self.roots),
        }
    }

    /// Walk `path` from the roots, matching ids level by level.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve_path(&self, path: &[K]) -> Option<Index> {
        let mut level = &self.roots;
        let mut found = None;
        for id in path {
            let idx = *level
                .iter()
                .find(|&&idx| self.arena.get(idx).is_some_and(|n| &n.key == id))?;
            found = Some(idx);
            level = &self.arena.get(idx)?.children;
        }
        found
    }

    /// Root-to-node ids of `idx`, the inverse of [`resolve_path`](Self::resolve_path).
    pub fn path_of(&self, idx: Index) -> Vec<K> {
        let mut path = Vec::new();
        let mut current = self.arena.get(idx);
        while let Some(node) = current {
            path.push(node.key.clone());
            current = node.parent.and_then(|p| self.arena.get(p));
        }
        path.reverse();
        path
    }

    /// True when `ancestor` lies strictly above `idx`.
    pub fn is_ancestor(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = self.arena.get(idx).and_then(|n| n.parent);
        while let Some(parent_idx) = current {
            if parent_idx == ancestor {
                return true;
            }
            current = self.arena.get(parent_idx).and_then(|n| n.parent);
        }
        false
    }

    /// Containing sequence (parent, None for roots) and index within it.
    pub fn position(&self, idx: Index) -> Option<(Option<Index>, usize)> {
        let parent = self.arena.get(idx)?.parent;
        let index = self.siblings(parent)?.iter().position(|&i| i == idx)?;
        Some((parent, index))
    }

    /// Unlink a node (with its subtree) from its containing sequence.
    ///
    /// Returns where it was. The node stays in the arena until re-attached.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, idx: Index) -> Option<(Option<Index>, usize)> {
        let (parent, index) = self.position(idx)?;
        self.siblings_mut(parent)?.remove(index);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = None;
        }
        Some((parent, index))
    }

    /// Link a detached node into `parent`'s children (or the roots) at
    /// `index`, clamped to the sequence length.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, idx: Index, parent: Option<Index>, index: usize) {
        let Some(siblings) = self.siblings_mut(parent) else {
            return;
        };
        let index = index.min(siblings.len());
        siblings.insert(index, idx);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent;
        }
    }

    /// Move the reachable part of the arena out into nested nodes.
    /// Nodes not reachable from a root are dropped.
    pub fn into_nodes(mut self) -> Vec<Node<T>> {
        let roots = std::mem::take(&mut self.roots);
        roots
            .into_iter()
            .filter_map(|idx| self.take_subtree(idx))
            .collect()
    }

    fn take_subtree(&mut self, idx: Index) -> Option<Node<T>> {
        let node = self.arena.remove(idx)?;
        let children = node
            .children
            .into_iter()
            .filter_map(|child| self.take_subtree(child))
            .collect();
        Some(Node {
            data: node.data,
            children,
        })
    }
}

pub struct TreeIterator<'a, T, K> {
    tree: &'a TreeArena<T, K>,
    stack: Vec<Index>,
}

impl<'a, T, K: NodeKey> TreeIterator<'a, T, K> {
    fn new(tree: &'a TreeArena<T, K>) -> Self {
        // Reverse so the first root is popped first
        let stack = tree.roots().iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a, T, K: NodeKey> Iterator for TreeIterator<'a, T, K> {
    type Item = (Index, &'a TreeNode<T, K>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
