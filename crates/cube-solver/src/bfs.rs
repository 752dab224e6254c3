//! Depth-capped breadth-first search.
//!
//! Complete and optimal for solutions of at most `max_depth` moves, and
//! exponential in memory, so it is only used for shallow scrambles.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::deadline::{Deadline, DeadlineCheck};
use crate::moves::Move;
use crate::puzzle::PuzzleModel;
use crate::search::{trace_path, SearchContext, SearchOutcome};

/// Breadth-first search from `initial` towards the goal.
///
/// Nodes are recorded in an arena of parent links so paths are rebuilt only
/// once a goal is generated.
pub fn breadth_first<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    catalog: &[Move],
    initial: &P,
    max_depth: usize,
    deadline: Deadline,
) -> SearchOutcome {
    if initial.is_goal() {
        return SearchOutcome::Found(Vec::new());
    }

    let mut check = DeadlineCheck::new(deadline);
    let mut arena: Vec<(Option<usize>, Option<Move>)> = vec![(None, None)];
    let mut visited: FxHashSet<P> = FxHashSet::default();
    visited.insert(initial.clone());

    let mut queue: VecDeque<(P, usize, usize)> = VecDeque::new();
    queue.push_back((initial.clone(), 0, 0));

    while let Some((state, node, depth)) = queue.pop_front() {
        if check.tick() {
            return SearchOutcome::TimedOut;
        }
        if depth >= max_depth {
            continue;
        }
        context.stats.nodes_expanded += 1;

        for &mv in catalog {
            let next = context.next_state(&state, mv);
            if !visited.insert(next.clone()) {
                continue;
            }

            arena.push((Some(node), Some(mv)));
            let child = arena.len() - 1;
            if next.is_goal() {
                return SearchOutcome::Found(trace_path(&arena, child));
            }
            queue.push_back((next, child, depth + 1));
        }
    }

    SearchOutcome::Exhausted
}
