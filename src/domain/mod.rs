//! Domain layer: tree model and pure tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod cycle;
pub mod error;
pub mod flatten;
pub mod key;
pub mod list;
pub mod moves;
pub mod node;

pub use arena::{TreeArena, TreeNode};
pub use builder::{build_tree, BuildOptions, TreeBuilder};
pub use cycle::{find_cycle, has_cycle};
pub use error::{DomainError, NodeRole, TreeResult};
pub use flatten::{
    find_path, flatten, flatten_all, flatten_with, ExpandedState, FlatRow, FlattenOptions,
};
pub use key::{Field, KeySelector, NodeKey};
pub use list::{reorder, target_from_boundary};
pub use moves::{
    apply_drop, move_as_child, place_after, place_before, DropIntent, Placement, RowEdge,
};
pub use node::{count_nodes, Node};
