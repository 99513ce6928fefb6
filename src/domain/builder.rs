//! Tree builder: nests flat `{id, parentId}` records into a forest.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::cycle::find_cycle;
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::key::KeySelector;
use crate::domain::node::Node;

/// Strictness switches for [`TreeBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fail on parent cycles and on parent ids that name no item.
    /// When off, orphans become roots and cycles are not checked.
    pub throw_on_invalid_tree: bool,
}

impl BuildOptions {
    pub fn strict() -> Self {
        Self {
            throw_on_invalid_tree: true,
        }
    }
}

/// Constructs nested trees from flat records.
pub struct TreeBuilder<'a, I, P> {
    id: &'a I,
    parent_id: &'a P,
    options: BuildOptions,
}

impl<'a, I, P> TreeBuilder<'a, I, P> {
    pub fn new(id: &'a I, parent_id: &'a P) -> Self {
        Self {
            id,
            parent_id,
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the nested forest. Input records are copied, never moved.
    pub fn build<T>(&self, items: &[T]) -> TreeResult<Vec<Node<T>>>
    where
        T: Clone,
        I: KeySelector<T>,
        P: KeySelector<T, Key = I::Key>,
    {
        Ok(self.build_arena(items)?.into_nodes())
    }

    /// Build into an arena, keeping it around for further moves.
    #[instrument(level = "debug", skip_all, fields(items = items.len(), strict = self.options.throw_on_invalid_tree))]
    pub fn build_arena<T>(&self, items: &[T]) -> TreeResult<TreeArena<T, I::Key>>
    where
        T: Clone,
        I: KeySelector<T>,
        P: KeySelector<T, Key = I::Key>,
    {
        let strict = self.options.throw_on_invalid_tree;
        let mut tree = TreeArena::new();
        if items.is_empty() {
            return Ok(tree);
        }

        if strict {
            if let Some(id) = find_cycle(items, self.id, self.parent_id) {
                return Err(DomainError::circular(&id));
            }
        }

        // Lookup table: a repeated id replaces the payload, keeps the first slot
        let mut lookup = HashMap::with_capacity(items.len());
        let mut slots = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let key = self
                .id
                .select(item)
                .ok_or_else(|| DomainError::MissingKey {
                    key: self.id.describe().into_owned(),
                    position,
                })?;
            let slot = (key.clone(), self.parent_id.select(item), item.clone());
            match lookup.get(&key) {
                Some(&existing) => {
                    debug!(id = %key, "duplicate id, later record replaces earlier one");
                    slots[existing] = slot;
                }
                None => {
                    lookup.insert(key, slots.len());
                    slots.push(slot);
                }
            }
        }

        let mut links = Vec::with_capacity(slots.len());
        let mut indices = Vec::with_capacity(slots.len());
        for (key, parent, data) in slots {
            links.push((key.clone(), parent));
            indices.push(tree.insert_detached(data, key));
        }

        for (slot, (key, parent)) in links.into_iter().enumerate() {
            let idx = indices[slot];
            let Some(parent_key) = parent else {
                tree.attach(idx, None, usize::MAX);
                continue;
            };
            match lookup.get(&parent_key) {
                Some(&parent_slot) => tree.attach(idx, Some(indices[parent_slot]), usize::MAX),
                None if strict => {
                    return Err(DomainError::InvalidTree {
                        id: key.to_string(),
                        parent: parent_key.to_string(),
                    });
                }
                None => {
                    warn!(id = %key, parent = %parent_key, "parent not found, treating node as root");
                    tree.attach(idx, None, usize::MAX);
                }
            }
        }

        let reachable = tree.iter().count();
        if reachable < tree.len() {
            warn!(
                unreachable = tree.len() - reachable,
                "nodes caught in a parent cycle are not reachable from any root"
            );
        }

        Ok(tree)
    }
}

/// Build a forest from flat records; see [`TreeBuilder`].
pub fn build_tree<T, I, P>(
    items: &[T],
    id: &I,
    parent_id: &P,
    options: BuildOptions,
) -> TreeResult<Vec<Node<T>>>
where
    T: Clone,
    I: KeySelector<T>,
    P: KeySelector<T, Key = I::Key>,
{
    TreeBuilder::new(id, parent_id)
        .with_options(options)
        .build(items)
}
