//! Successor pruning and move ordering for depth-first strategies.
//!
//! These rules skip moves that can never shorten a solution and decide the
//! order in which the remaining children are explored.

use crate::moves::{Axis, Move};

/// Priority bonus for turning an outermost layer.
const OUTER_LAYER_BONUS: i32 = 2;
/// Priority bonus for horizontal turns.
const HORIZONTAL_BONUS: i32 = 1;
/// Priority bonus for a child whose estimate is strictly below its parent's.
const IMPROVEMENT_BONUS: i32 = 10;

/// Check if `mv` may follow `previous` on a search path.
///
/// Undoing the previous move returns to the parent state, so it is banned.
pub fn is_banned_successor(previous: Option<Move>, mv: Move) -> bool {
    previous.is_some_and(|prev| prev.inverse() == mv)
}

/// Moves of `catalog` that may follow `previous`, in catalog order.
pub fn allowed_moves(catalog: &[Move], previous: Option<Move>) -> impl Iterator<Item = Move> + '_ {
    catalog
        .iter()
        .copied()
        .filter(move |&mv| !is_banned_successor(previous, mv))
}

/// Ordering score for a child reached by `mv`; higher is explored first.
pub fn move_priority(mv: Move, size: usize, child_estimate: u32, parent_estimate: u32) -> i32 {
    let mut priority = 0;
    if mv.is_outer_layer(size) {
        priority += OUTER_LAYER_BONUS;
    }
    if mv.axis == Axis::Horizontal {
        priority += HORIZONTAL_BONUS;
    }
    if child_estimate < parent_estimate {
        priority += IMPROVEMENT_BONUS;
    }
    priority
}

/// Sorts children by descending priority.
///
/// The sort is stable, so equal priorities keep catalog order and the search
/// is reproducible.
pub fn order_by_priority<T>(children: &mut [T], priority: impl Fn(&T) -> i32) {
    children.sort_by_key(|child| std::cmp::Reverse(priority(child)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{moves, Direction};

    #[test]
    fn test_inverse_banned() {
        let mv = Move::new(Axis::Vertical, 1, Direction::Forward);
        assert!(is_banned_successor(Some(mv), mv.inverse()));
        assert!(!is_banned_successor(Some(mv), mv));
        assert!(!is_banned_successor(None, mv.inverse()));
    }

    #[test]
    fn test_allowed_moves_drop_only_inverse() {
        let catalog = moves(3);
        let previous = catalog[4];
        let allowed: Vec<Move> = allowed_moves(&catalog, Some(previous)).collect();
        assert_eq!(allowed.len(), catalog.len() - 1);
        assert!(!allowed.contains(&previous.inverse()));
        assert_eq!(allowed_moves(&catalog, None).count(), catalog.len());
    }

    #[test]
    fn test_priority_components() {
        let outer_h = Move::new(Axis::Horizontal, 0, Direction::Forward);
        let inner_h = Move::new(Axis::Horizontal, 1, Direction::Forward);
        let inner_v = Move::new(Axis::Vertical, 1, Direction::Forward);
        let outer_l = Move::new(Axis::Lateral, 2, Direction::Reverse);

        assert_eq!(move_priority(outer_h, 3, 5, 5), 3);
        assert_eq!(move_priority(inner_h, 3, 5, 5), 1);
        assert_eq!(move_priority(inner_v, 3, 5, 5), 0);
        assert_eq!(move_priority(outer_l, 3, 5, 5), 2);
        assert_eq!(move_priority(inner_v, 3, 4, 5), 10);
        assert_eq!(move_priority(inner_v, 3, 6, 5), 0);
    }

    #[test]
    fn test_order_is_stable() {
        let catalog = moves(3);
        let mut children: Vec<(Move, u32)> = catalog.iter().map(|&mv| (mv, 5)).collect();
        // one improving child jumps to the front
        children[10].1 = 4;
        let improving = children[10].0;

        order_by_priority(&mut children, |&(mv, estimate)| move_priority(mv, 3, estimate, 5));
        assert_eq!(children[0].0, improving);

        // the rest: outer horizontal moves first, in catalog order
        let expected_second: Vec<Move> = catalog
            .iter()
            .copied()
            .filter(|mv| mv.axis == Axis::Horizontal && mv.is_outer_layer(3))
            .collect();
        let actual_second: Vec<Move> = children[1..1 + expected_second.len()]
            .iter()
            .map(|&(mv, _)| mv)
            .collect();
        assert_eq!(actual_second, expected_second);
    }
}
