//! Iterative-deepening A*.
//!
//! Each iteration is a depth-first search that prunes every node whose
//! `f = g + h` exceeds the current threshold. The smallest pruned `f` becomes
//! the next threshold. Only the threshold carries over between iterations;
//! visited sets and paths start empty every time.
//!
//! The depth-first walk keeps an explicit stack of frames instead of
//! recursing, so the depth ceiling never touches the native call stack.

use log::debug;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::deadline::{Deadline, DeadlineCheck};
use crate::heuristic::Heuristic;
use crate::moves::Move;
use crate::pruning::{allowed_moves, move_priority, order_by_priority};
use crate::puzzle::PuzzleModel;
use crate::search::{SearchContext, SearchOutcome, SolutionPath};

/// Visited entries are keyed by `g` modulo this value, so a state may be
/// revisited at a different depth residue.
const DEPTH_RESIDUES: u32 = 4;

/// A generated child with its estimate, waiting to be explored.
#[derive(Debug, Clone)]
struct Child<P> {
    mv: Move,
    state: P,
    estimate: u32,
}

/// A node on the depth-first stack: its cost so far and its ordered children.
#[derive(Debug)]
struct Frame<P> {
    g: u32,
    children: Vec<Child<P>>,
    next: usize,
}

enum Iteration {
    Found(SolutionPath),
    /// Nothing found; carries the smallest pruned `f`, if any node was pruned.
    Cutoff(Option<u32>),
    TimedOut,
}

/// IDA* from `initial`, raising the threshold up to `depth_ceiling`.
pub fn ida_star<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    heuristic: &Heuristic<P>,
    catalog: &[Move],
    initial: &P,
    depth_ceiling: usize,
    deadline: Deadline,
) -> SearchOutcome {
    if initial.is_goal() {
        return SearchOutcome::Found(Vec::new());
    }

    let mut check = DeadlineCheck::new(deadline);
    let initial_estimate = heuristic.evaluate(initial, &mut context.stats);
    let mut threshold = initial_estimate.max(1);

    while threshold as usize <= depth_ceiling {
        context.stats.iterations += 1;
        debug!(
            "ida*: threshold {} after {} expansions",
            threshold, context.stats.nodes_expanded
        );

        match iterate(
            context,
            heuristic,
            catalog,
            initial,
            initial_estimate,
            threshold,
            &mut check,
        ) {
            Iteration::Found(path) => return SearchOutcome::Found(path),
            Iteration::TimedOut => return SearchOutcome::TimedOut,
            // nothing was pruned, so the reachable space is fully explored
            Iteration::Cutoff(None) => return SearchOutcome::Exhausted,
            Iteration::Cutoff(Some(next_threshold)) => threshold = next_threshold,
        }
    }

    SearchOutcome::Exhausted
}

/// One bounded depth-first pass.
fn iterate<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    heuristic: &Heuristic<P>,
    catalog: &[Move],
    initial: &P,
    initial_estimate: u32,
    threshold: u32,
    check: &mut DeadlineCheck,
) -> Iteration {
    if initial_estimate > threshold {
        return Iteration::Cutoff(Some(initial_estimate));
    }

    let size = initial.size();
    let mut next_threshold: Option<u32> = None;
    let mut visited: FxHashSet<(P, u32)> = FxHashSet::default();
    visited.insert((initial.clone(), 0));
    let mut path: SmallVec<[Move; 32]> = SmallVec::new();

    let root_children = expand(context, heuristic, catalog, initial, initial_estimate, None, size);
    let mut stack = vec![Frame {
        g: 0,
        children: root_children,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.next >= frame.children.len() {
            stack.pop();
            path.pop();
            continue;
        }
        let child = &frame.children[frame.next];
        let g = frame.g + 1;
        let f = g + child.estimate;
        let (mv, estimate) = (child.mv, child.estimate);

        if f > threshold {
            next_threshold = Some(next_threshold.map_or(f, |known| known.min(f)));
            frame.next += 1;
            continue;
        }
        if child.state.is_goal() {
            path.push(mv);
            return Iteration::Found(path.into_vec());
        }
        if !visited.insert((child.state.clone(), g % DEPTH_RESIDUES)) {
            frame.next += 1;
            continue;
        }

        let state = child.state.clone();
        frame.next += 1;

        if check.tick() {
            return Iteration::TimedOut;
        }
        let children = expand(context, heuristic, catalog, &state, estimate, Some(mv), size);
        path.push(mv);
        stack.push(Frame {
            g,
            children,
            next: 0,
        });
    }

    Iteration::Cutoff(next_threshold)
}

/// Generates and orders the children of `state`, skipping the move that
/// would undo `previous`.
fn expand<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    heuristic: &Heuristic<P>,
    catalog: &[Move],
    state: &P,
    estimate: u32,
    previous: Option<Move>,
    size: usize,
) -> Vec<Child<P>> {
    context.stats.nodes_expanded += 1;

    let mut children: Vec<Child<P>> = allowed_moves(catalog, previous)
        .map(|mv| {
            let next = context.next_state(state, mv);
            let child_estimate = heuristic.evaluate(&next, &mut context.stats);
            Child {
                mv,
                state: next,
                estimate: child_estimate,
            }
        })
        .collect();

    order_by_priority(&mut children, |child| {
        move_priority(child.mv, size, child.estimate, estimate)
    });
    children
}
