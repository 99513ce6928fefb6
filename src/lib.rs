//! treeshift: build, flatten and rearrange ordered trees.
//!
//! Layers:
//! - [`domain`]: tree model and pure algorithms (builder, cycle check, flattener, moves)
//! - [`application`]: JSON documents mapped onto the domain
//! - [`cli`]: argument parsing and command dispatch
//! - [`config`]: layered settings

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{
    apply_drop, build_tree, find_cycle, find_path, flatten, flatten_all, has_cycle,
    move_as_child, place_after, place_before, BuildOptions, DomainError, DropIntent,
    ExpandedState, Field, FlatRow, KeySelector, Node, TreeArena, TreeResult,
};
