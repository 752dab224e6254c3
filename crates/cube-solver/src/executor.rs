//! Replays move sequences against a puzzle state.
//!
//! Used to check that a reported solution really reaches the goal, and by
//! callers that need to build a scrambled state from a known move list.

use crate::moves::Move;
use crate::puzzle::PuzzleModel;

/// Result of replaying a move sequence
#[derive(Debug, Clone)]
pub struct ExecutionResult<P> {
    pub final_state: P,
    pub moves_applied: usize,
    pub solved: bool,
}

/// Apply every move of `path`, in order, to a copy of `initial`
pub fn execute<P: PuzzleModel>(initial: &P, path: &[Move]) -> ExecutionResult<P> {
    let mut state = initial.clone();
    for &mv in path {
        state.apply(mv);
    }

    ExecutionResult {
        solved: state.is_goal(),
        moves_applied: path.len(),
        final_state: state,
    }
}

/// Simple verification: does the path solve the puzzle?
pub fn verify_solution<P: PuzzleModel>(initial: &P, path: &[Move]) -> bool {
    execute(initial, path).solved
}

/// The goal state of `size` scrambled by `moves`.
pub fn scrambled<P: PuzzleModel>(size: usize, moves: &[Move]) -> P {
    execute(&P::solved(size), moves).final_state
}
