//! Cycle detection over flat `{id, parentId}` records.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::key::KeySelector;

/// True if following parent ids from any item leads back to itself.
pub fn has_cycle<T, I, P>(items: &[T], id: &I, parent_id: &P) -> bool
where
    I: KeySelector<T>,
    P: KeySelector<T, Key = I::Key>,
{
    find_cycle(items, id, parent_id).is_some()
}

/// Id at which the first cycle closes, scanning ids in first-seen order.
///
/// A parent id that names no item ends the chain (root or dangling link).
/// Items without an id are ignored. When ids repeat, the last record's parent
/// wins.
#[instrument(level = "debug", skip_all, fields(items = items.len()))]
pub fn find_cycle<T, I, P>(items: &[T], id: &I, parent_id: &P) -> Option<I::Key>
where
    I: KeySelector<T>,
    P: KeySelector<T, Key = I::Key>,
{
    let mut order = Vec::with_capacity(items.len());
    let mut parents = HashMap::with_capacity(items.len());
    for item in items {
        let Some(key) = id.select(item) else {
            continue;
        };
        if !parents.contains_key(&key) {
            order.push(key.clone());
        }
        parents.insert(key, parent_id.select(item));
    }

    let mut visited = HashSet::new();
    for start in order {
        // Each id has one parent, so the DFS from `start` is a single chain.
        let mut on_stack = HashSet::new();
        let mut current = Some(start);
        while let Some(key) = current {
            if on_stack.contains(&key) {
                debug!(id = %key, "cycle detected");
                return Some(key);
            }
            if visited.contains(&key) {
                break;
            }
            current = parents
                .get(&key)
                .and_then(|p| p.as_ref())
                .filter(|p| parents.contains_key(*p))
                .cloned();
            on_stack.insert(key);
        }
        visited.extend(on_stack);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type Rec = (u32, Option<u32>);

    fn id(r: &Rec) -> Option<u32> {
        Some(r.0)
    }

    fn parent(r: &Rec) -> Option<u32> {
        r.1
    }

    #[rstest]
    #[case::chain(vec![(1, None), (2, Some(1)), (3, Some(2))], None)]
    #[case::three_cycle(vec![(1, Some(2)), (2, Some(3)), (3, Some(1))], Some(1))]
    #[case::self_parent(vec![(1, None), (2, Some(2))], Some(2))]
    #[case::dangling(vec![(1, Some(99)), (2, Some(1))], None)]
    #[case::cycle_behind_tail(vec![(5, Some(1)), (1, Some(2)), (2, Some(1))], Some(1))]
    #[case::empty(vec![], None)]
    fn given_records_when_finding_cycle_then_reports_closing_id(
        #[case] items: Vec<Rec>,
        #[case] expected: Option<u32>,
    ) {
        assert_eq!(find_cycle(&items, &id, &parent), expected);
        assert_eq!(has_cycle(&items, &id, &parent), expected.is_some());
    }

    #[test]
    fn given_duplicate_ids_when_checking_then_last_parent_wins() {
        // 2 first points at 1 (fine), then is redeclared to point at 3 -> 3 -> 2
        let items: Vec<Rec> = vec![(1, None), (2, Some(1)), (3, Some(2)), (2, Some(3))];
        assert!(has_cycle(&items, &id, &parent));
    }
}
