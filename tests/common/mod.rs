//! Shared fixtures for integration tests.
#![allow(dead_code)]

use rstest::fixture;
use treeshift::domain::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub content: String,
}

pub fn item_id(item: &Item) -> Option<String> {
    Some(item.id.clone())
}

pub fn leaf(id: &str, content: &str) -> Node<Item> {
    Node::leaf(Item {
        id: id.into(),
        content: content.into(),
    })
}

pub fn branch(id: &str, content: &str, children: Vec<Node<Item>>) -> Node<Item> {
    Node::with_children(
        Item {
            id: id.into(),
            content: content.into(),
        },
        children,
    )
}

/// Five roots; Iron Man, Captain America and Thor carry children.
#[fixture]
pub fn avengers() -> Vec<Node<Item>> {
    vec![
        branch(
            "1",
            "Iron Man",
            vec![
                leaf("1-1", "Mark I Armor"),
                leaf("1-2", "Mark 50 Armor"),
                leaf("1-3", "Arc Reactor"),
            ],
        ),
        branch(
            "2",
            "Captain America",
            vec![
                leaf("2-1", "Vibranium Shield"),
                leaf("2-2", "Super Soldier Serum"),
            ],
        ),
        leaf("3", "Black Widow"),
        leaf("4", "Hawkeye"),
        branch(
            "5",
            "Thor",
            vec![leaf("5-1", "Mjolnir"), leaf("5-2", "Stormbreaker")],
        ),
    ]
}

pub fn path(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn ids(nodes: &[Node<Item>]) -> Vec<&str> {
    nodes.iter().map(|n| n.data.id.as_str()).collect()
}

/// Children of the root with the given id.
pub fn children_of<'a>(roots: &'a [Node<Item>], id: &str) -> &'a [Node<Item>] {
    roots
        .iter()
        .find(|n| n.data.id == id)
        .map(|n| n.children.as_slice())
        .unwrap_or_default()
}
