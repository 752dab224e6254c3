//! Meet-in-the-middle search.
//!
//! One frontier grows forward from the start state, the other backward from
//! the goal. Layers alternate until a newly generated state is already known
//! to the opposite frontier. Each frontier maps its states to the path from
//! its own root, which doubles as that frontier's visited set.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::deadline::{Deadline, DeadlineCheck};
use crate::moves::{invert_path, Move};
use crate::puzzle::PuzzleModel;
use crate::search::{SearchContext, SearchOutcome, SolutionPath};

/// Frontiers never exceed a handful of layers, so paths stay inline.
type FrontierPath = SmallVec<[Move; 8]>;

type Frontier<P> = FxHashMap<P, FrontierPath>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

enum LayerResult<P> {
    Met(SolutionPath),
    Next(Vec<P>),
    TimedOut,
}

/// Alternates forward and backward layers, at most `max_layers` of each.
pub fn bidirectional<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    catalog: &[Move],
    initial: &P,
    max_layers: usize,
    deadline: Deadline,
) -> SearchOutcome {
    if initial.is_goal() {
        return SearchOutcome::Found(Vec::new());
    }

    let goal = P::solved(initial.size());
    let mut check = DeadlineCheck::new(deadline);

    let mut forward: Frontier<P> = FxHashMap::default();
    forward.insert(initial.clone(), FrontierPath::new());
    let mut forward_layer = vec![initial.clone()];

    let mut backward: Frontier<P> = FxHashMap::default();
    backward.insert(goal.clone(), FrontierPath::new());
    let mut backward_layer = vec![goal];

    for _ in 0..max_layers {
        for side in [Side::Forward, Side::Backward] {
            if deadline.expired() {
                return SearchOutcome::TimedOut;
            }

            let (own, opposite, layer) = match side {
                Side::Forward => (&mut forward, &backward, &forward_layer),
                Side::Backward => (&mut backward, &forward, &backward_layer),
            };
            let next = match expand_layer(context, catalog, own, opposite, layer, side, &mut check) {
                LayerResult::Met(path) => return SearchOutcome::Found(path),
                LayerResult::TimedOut => return SearchOutcome::TimedOut,
                LayerResult::Next(next) => next,
            };

            // a frontier that stopped growing can never meet the other one
            if next.is_empty() {
                return SearchOutcome::Exhausted;
            }
            match side {
                Side::Forward => forward_layer = next,
                Side::Backward => backward_layer = next,
            }
        }
    }

    SearchOutcome::Exhausted
}

/// Expands every state of `layer` by one move.
fn expand_layer<P: PuzzleModel>(
    context: &mut SearchContext<P>,
    catalog: &[Move],
    own: &mut Frontier<P>,
    opposite: &Frontier<P>,
    layer: &[P],
    side: Side,
    check: &mut DeadlineCheck,
) -> LayerResult<P> {
    let mut next_layer = Vec::new();

    for state in layer {
        if check.tick() {
            return LayerResult::TimedOut;
        }
        let Some(base) = own.get(state).cloned() else {
            continue;
        };
        context.stats.nodes_expanded += 1;

        for &mv in catalog {
            let next = context.next_state(state, mv);

            if let Some(other) = opposite.get(&next) {
                let mut extended = base.clone();
                extended.push(mv);
                let path = match side {
                    Side::Forward => join(&extended, other),
                    Side::Backward => join(other, &extended),
                };
                return LayerResult::Met(path);
            }

            if own.contains_key(&next) {
                continue;
            }
            let mut extended = base.clone();
            extended.push(mv);
            own.insert(next.clone(), extended);
            next_layer.push(next);
        }
    }

    LayerResult::Next(next_layer)
}

/// Start-to-meeting path followed by the undone goal-to-meeting path.
fn join(forward_path: &[Move], backward_path: &[Move]) -> SolutionPath {
    let mut path = forward_path.to_vec();
    path.extend(invert_path(backward_path));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{scrambled, verify_solution};
    use crate::moves::{moves, Axis, Direction};
    use crate::puzzle::{unreachable_cube, Cube};
    use std::time::Duration;

    fn run(initial: &Cube, max_layers: usize, deadline: Deadline) -> SearchOutcome {
        let mut context = SearchContext::new(10_000);
        bidirectional(&mut context, &moves(initial.size()), initial, max_layers, deadline)
    }

    #[test]
    fn test_goal_needs_no_moves() {
        assert_eq!(run(&Cube::solved(3), 4, Deadline::none()), SearchOutcome::Found(Vec::new()));
    }

    #[test]
    fn test_single_move() {
        let start = Cube::solved(2).successor(Move::new(Axis::Lateral, 1, Direction::Forward));
        assert_eq!(
            run(&start, 4, Deadline::none()),
            SearchOutcome::Found(vec![Move::new(Axis::Lateral, 1, Direction::Reverse)])
        );
    }

    #[test]
    fn test_solves_four_move_scramble() {
        let scramble = [
            Move::new(Axis::Horizontal, 0, Direction::Forward),
            Move::new(Axis::Vertical, 1, Direction::Reverse),
            Move::new(Axis::Lateral, 0, Direction::Forward),
            Move::new(Axis::Vertical, 0, Direction::Forward),
        ];
        let start: Cube = scrambled(2, &scramble);
        let path = run(&start, 4, Deadline::none()).into_path().unwrap();
        assert!(path.len() <= scramble.len() + 1);
        assert!(verify_solution(&start, &path));
    }

    #[test]
    fn test_join_inverts_backward_half() {
        let catalog = moves(2);
        let forward = [catalog[0], catalog[7]];
        let backward = [catalog[3], catalog[10]];
        assert_eq!(
            join(&forward, &backward),
            vec![catalog[0], catalog[7], catalog[10].inverse(), catalog[3].inverse()]
        );
    }

    #[test]
    fn test_layer_limit_exhausts() {
        assert_eq!(run(&unreachable_cube(), 2, Deadline::none()), SearchOutcome::Exhausted);
        assert_eq!(run(&unreachable_cube(), 0, Deadline::none()), SearchOutcome::Exhausted);
    }

    #[test]
    fn test_expired_deadline_times_out() {
        assert_eq!(
            run(&unreachable_cube(), 8, Deadline::after(Duration::ZERO)),
            SearchOutcome::TimedOut
        );
    }
}
