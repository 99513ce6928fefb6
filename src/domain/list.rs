//! Flat list reordering used by single-level sortable lists.

/// Copy of `list` with the element at `from` moved to index `to`.
///
/// `from == to` or an out-of-range `from` returns an unchanged copy; `to` is
/// clamped to the end of the list.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut copy = list.to_vec();
    if from == to || from >= copy.len() {
        return copy;
    }
    let moved = copy.remove(from);
    let to = to.min(copy.len());
    copy.insert(to, moved);
    copy
}

/// Final index of an element dragged onto a divider.
///
/// Boundaries sit between rows: boundary `b` is directly above row `b`.
/// Dropping below the element's own row has to account for the element
/// leaving its original slot.
pub fn target_from_boundary(original_index: usize, boundary: usize) -> usize {
    if boundary <= original_index {
        boundary
    } else {
        boundary - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 2, vec!['b', 'c', 'a', 'd'])]
    #[case(3, 0, vec!['d', 'a', 'b', 'c'])]
    #[case(1, 1, vec!['a', 'b', 'c', 'd'])]
    #[case(1, 99, vec!['a', 'c', 'd', 'b'])]
    #[case(7, 0, vec!['a', 'b', 'c', 'd'])]
    fn given_list_when_reordering_then_moves_single_element(
        #[case] from: usize,
        #[case] to: usize,
        #[case] expected: Vec<char>,
    ) {
        let list = ['a', 'b', 'c', 'd'];
        assert_eq!(reorder(&list, from, to), expected);
    }

    #[rstest]
    #[case(2, 0, 0)]
    #[case(2, 2, 2)]
    #[case(2, 3, 2)]
    #[case(0, 4, 3)]
    fn given_boundary_when_computing_target_then_skips_own_slot(
        #[case] original: usize,
        #[case] boundary: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(target_from_boundary(original, boundary), expected);
    }

    #[test]
    fn given_boundary_below_item_when_reordering_then_lands_above_next_row() {
        // Drag 'a' to the divider between 'c' and 'd'
        let list = ['a', 'b', 'c', 'd'];
        let to = target_from_boundary(0, 3);
        assert_eq!(reorder(&list, 0, to), vec!['b', 'c', 'a', 'd']);
    }
}
