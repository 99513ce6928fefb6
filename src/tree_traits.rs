/*
Terminal rendering of trees via termtree.
A forest renders as one termtree::Tree per root.
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{TreeArena, TreeNode};
use crate::domain::key::NodeKey;

pub trait TreeNodeConvert<T, K> {
    /// Render every root, labelling nodes with `label`.
    fn to_tree_string<F>(&self, label: F) -> Vec<Tree<String>>
    where
        F: Fn(&TreeNode<T, K>) -> String;
}

impl<T, K: NodeKey> TreeNodeConvert<T, K> for TreeArena<T, K> {
    #[instrument(level = "debug", skip_all)]
    fn to_tree_string<F>(&self, label: F) -> Vec<Tree<String>>
    where
        F: Fn(&TreeNode<T, K>) -> String,
    {
        fn build_tree<T, K: NodeKey, F>(
            arena: &TreeArena<T, K>,
            node_idx: Index,
            label: &F,
        ) -> Option<Tree<String>>
        where
            F: Fn(&TreeNode<T, K>) -> String,
        {
            let node = arena.get_node(node_idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build_tree(arena, child, label))
                .collect();
            Some(Tree::new(label(node)).with_leaves(leaves))
        }

        self.roots()
            .iter()
            .filter_map(|&root| build_tree(self, root, &label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_forest_when_rendering_then_one_tree_per_root() {
        let mut tree = TreeArena::new();
        let a = tree.insert_node("Iron Man", "1", None);
        tree.insert_node("Mark I Armor", "1-1", Some(a));
        tree.insert_node("Hawkeye", "4", None);

        let rendered = tree.to_tree_string(|n| format!("{} {}", n.key, n.data));

        assert_eq!(rendered.len(), 2);
        let first = rendered[0].to_string();
        assert!(first.starts_with("1 Iron Man\n"));
        assert!(first.contains("1-1 Mark I Armor"));
        assert_eq!(rendered[1].to_string(), "4 Hawkeye\n");
    }
}
