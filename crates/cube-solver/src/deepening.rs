//! Plain iterative deepening without a heuristic.
//!
//! Serves as the fallback when no knowledge base is worth consulting: a quick
//! breadth-first pass settles shallow scrambles, then depth-limited searches
//! with growing bounds take over.

use log::debug;
use smallvec::SmallVec;

use crate::bfs::breadth_first;
use crate::deadline::{Deadline, DeadlineCheck};
use crate::moves::Move;
use crate::pruning::is_banned_successor;
use crate::puzzle::PuzzleModel;
use crate::search::{SearchContext, SearchOutcome};

/// Depth of the initial breadth-first pass.
pub const QUICK_BFS_DEPTH: usize = 4;

/// Breadth-first up to [`QUICK_BFS_DEPTH`], then depth-limited search for
/// every bound from `QUICK_BFS_DEPTH + 1` through `max_moves`.
pub fn iterative_deepening<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    catalog: &[Move],
    initial: &P,
    max_moves: usize,
    deadline: Deadline,
) -> SearchOutcome {
    match breadth_first(context, catalog, initial, QUICK_BFS_DEPTH, deadline) {
        SearchOutcome::Exhausted => {}
        outcome => return outcome,
    }

    let mut check = DeadlineCheck::new(deadline);
    for bound in QUICK_BFS_DEPTH + 1..=max_moves {
        if deadline.expired() {
            return SearchOutcome::TimedOut;
        }
        context.stats.iterations += 1;
        debug!("deepening: bound {}", bound);

        match depth_limited(context, catalog, initial, bound, &mut check) {
            SearchOutcome::Exhausted => {}
            outcome => return outcome,
        }
    }

    SearchOutcome::Exhausted
}

struct Frame<P> {
    state: P,
    depth: usize,
    previous: Option<Move>,
    next: usize,
}

/// Depth-first search for a goal at most `bound` moves away.
///
/// `Exhausted` here only means nothing was found within the bound.
fn depth_limited<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    catalog: &[Move],
    initial: &P,
    bound: usize,
    check: &mut DeadlineCheck,
) -> SearchOutcome {
    let mut path: SmallVec<[Move; 32]> = SmallVec::new();
    let mut stack = vec![Frame {
        state: initial.clone(),
        depth: 0,
        previous: None,
        next: 0,
    }];
    context.stats.nodes_expanded += 1;

    while let Some(frame) = stack.last_mut() {
        let Some(&mv) = catalog.get(frame.next) else {
            stack.pop();
            path.pop();
            continue;
        };
        frame.next += 1;
        if is_banned_successor(frame.previous, mv) {
            continue;
        }

        let depth = frame.depth + 1;
        let next = context.next_state(&frame.state, mv);
        if next.is_goal() {
            path.push(mv);
            return SearchOutcome::Found(path.into_vec());
        }
        if depth >= bound {
            continue;
        }

        if check.tick() {
            return SearchOutcome::TimedOut;
        }
        context.stats.nodes_expanded += 1;
        path.push(mv);
        stack.push(Frame {
            state: next,
            depth,
            previous: Some(mv),
            next: 0,
        });
    }

    SearchOutcome::Exhausted
}
