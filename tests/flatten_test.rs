//! Flattening nested trees into visible rows.

mod common;

use rstest::rstest;

use common::{avengers, branch, item_id, leaf, path, Item};
use treeshift::domain::{
    find_path, flatten, flatten_all, flatten_with, DomainError, ExpandedState, FlattenOptions,
    Node,
};

fn iron_man_only() -> Vec<Node<Item>> {
    vec![branch(
        "1",
        "Iron Man",
        vec![leaf("1-1", "Mark I Armor"), leaf("1-2", "Mark 50 Armor")],
    )]
}

#[test]
fn given_collapsed_root_when_flattening_then_children_are_hidden() {
    // Arrange
    let roots = iron_man_only();
    let state: ExpandedState<String> = [("1".to_string(), false)].into_iter().collect();

    // Act
    let rows = flatten(&roots, &item_id, &state).unwrap();

    // Assert
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id(), "1");
    assert!(!rows[0].expanded);
    assert_eq!(rows[0].child_count, 2);
}

#[test]
fn given_expanded_root_when_flattening_then_children_follow_at_level_one() {
    let roots = iron_man_only();
    let state: ExpandedState<String> = [("1".to_string(), true)].into_iter().collect();

    let rows = flatten(&roots, &item_id, &state).unwrap();

    let levels: Vec<_> = rows.iter().map(|r| r.level).collect();
    let order: Vec<_> = rows.iter().map(|r| r.id().as_str()).collect();
    assert_eq!(levels, vec![0, 1, 1]);
    assert_eq!(order, vec!["1", "1-1", "1-2"]);
    assert_eq!(rows[2].ids, path(&["1", "1-2"]));
    assert_eq!(rows[2].sibling_index, 1);
}

#[rstest]
fn given_empty_state_when_flattening_then_everything_is_expanded(avengers: Vec<Node<Item>>) {
    let rows = flatten(&avengers, &item_id, &ExpandedState::new()).unwrap();

    assert_eq!(rows.len(), 12);
    assert_eq!(rows, flatten_all(&avengers, &item_id).unwrap());
}

#[rstest]
fn given_nested_collapse_when_flattening_then_only_that_subtree_hides(avengers: Vec<Node<Item>>) {
    // Arrange
    let mut state = ExpandedState::new();
    state.collapse("2".to_string());
    state.toggle("5".to_string());

    // Act
    let rows = flatten(&avengers, &item_id, &state).unwrap();

    // Assert
    let order: Vec<_> = rows.iter().map(|r| r.id().as_str()).collect();
    assert_eq!(order, vec!["1", "1-1", "1-2", "1-3", "2", "3", "4", "5"]);
    assert_eq!(rows[1].parent_id().map(String::as_str), Some("1"));
    assert_eq!(rows[4].parent_id(), None);
}

#[rstest]
fn given_drag_root_when_flattening_then_descendants_are_marked(avengers: Vec<Node<Item>>) {
    let options = FlattenOptions {
        expanded: None,
        drag_root: Some("1".to_string()),
    };

    let rows = flatten_with(&avengers, &item_id, &options).unwrap();

    let marked: Vec<_> = rows
        .iter()
        .filter(|r| r.in_drag_subtree)
        .map(|r| r.id().as_str())
        .collect();
    assert_eq!(marked, vec!["1-1", "1-2", "1-3"]);
}

#[rstest]
fn given_nested_id_when_finding_path_then_returns_root_to_node(avengers: Vec<Node<Item>>) {
    assert_eq!(
        find_path(&avengers, &item_id, &"5-2".to_string()).unwrap(),
        Some(path(&["5", "5-2"]))
    );
    assert_eq!(find_path(&avengers, &item_id, &"9".to_string()).unwrap(), None);
}

#[test]
fn given_node_without_id_when_flattening_then_missing_key() {
    let roots = vec![Node::leaf(("anonymous".to_string(), None::<String>))];
    let key = |item: &(String, Option<String>)| item.1.clone();

    let err = flatten_all(&roots, &key).unwrap_err();

    assert!(matches!(err, DomainError::MissingKey { position: 0, .. }));
}

#[test]
fn given_deep_chain_when_flattening_then_no_stack_overflow() {
    // Arrange: 2_000 levels, built bottom-up
    let mut node = leaf("0", "bottom");
    for i in 1..2_000 {
        node = branch(&i.to_string(), "link", vec![node]);
    }
    let roots = vec![node];

    // Act
    let rows = flatten_all(&roots, &item_id).unwrap();

    // Assert
    assert_eq!(rows.len(), 2_000);
    assert_eq!(rows[1_999].level, 1_999);
    assert_eq!(rows[1_999].id(), "0");
}
