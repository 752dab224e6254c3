//! Lower-bound estimates of the number of moves left.
//!
//! Table hits are exact distances. Misses fall back to the maximum of three
//! facelet-counting estimators, each divided by the number of facelets of
//! that kind a single move can plausibly fix.

use std::sync::Arc;

use log::trace;

use crate::knowledge::KnowledgeBase;
use crate::puzzle::{PuzzleModel, FACE_COUNT};
use crate::search::SearchStats;

/// Output of one fallback estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate {
    Bound(u32),
    /// The estimator cannot say anything about this state.
    Unavailable(&'static str),
}

impl Estimate {
    /// Contribution to the combined estimate; unavailable counts as zero.
    pub fn value(self) -> u32 {
        match self {
            Estimate::Bound(value) => value,
            Estimate::Unavailable(_) => 0,
        }
    }
}

const FACELETS_PER_MOVE: u32 = 4;
const CORNERS_PER_MOVE: u32 = 6;
const EDGES_PER_MOVE: u32 = 8;

/// Table lookup with facelet-count fallbacks.
///
/// The knowledge base is shared read-only, so evaluators can be cloned freely
/// across engines and threads.
#[derive(Debug, Clone)]
pub struct Heuristic<P> {
    knowledge: Arc<KnowledgeBase<P>>,
    goal: P,
}

impl<P: PuzzleModel> Heuristic<P> {
    pub fn new(size: usize, knowledge: Arc<KnowledgeBase<P>>) -> Self {
        Self {
            knowledge,
            goal: P::solved(size),
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase<P> {
        &self.knowledge
    }

    pub fn goal(&self) -> &P {
        &self.goal
    }

    /// Estimated moves from `state` to the goal, recording the lookup in `stats`.
    pub fn evaluate(&self, state: &P, stats: &mut SearchStats) -> u32 {
        stats.heuristic_evaluations += 1;
        if let Some(distance) = self.knowledge.get(state) {
            stats.heuristic_hits += 1;
            return distance;
        }
        self.fallback(state)
    }

    /// Maximum of the fallback estimators, ignoring the table.
    pub fn fallback(&self, state: &P) -> u32 {
        [
            ("misplaced facelets", self.misplaced_facelets(state)),
            ("misplaced corners", self.misplaced_corners(state)),
            ("misplaced edges", self.misplaced_edges(state)),
        ]
        .into_iter()
        .map(|(name, estimate)| {
            if let Estimate::Unavailable(reason) = estimate {
                trace!("{name} estimator unavailable: {reason}");
            }
            estimate.value()
        })
        .max()
        .unwrap_or(0)
    }

    /// Facelets differing from the goal, over every position.
    pub fn misplaced_facelets(&self, state: &P) -> Estimate {
        let n = state.size();
        let positions = (0..FACE_COUNT)
            .flat_map(|face| (0..n).flat_map(move |row| (0..n).map(move |col| (face, row, col))));
        self.count_misplaced(state, positions)
            .map_or_else(Estimate::Unavailable, |count| {
                Estimate::Bound(count / FACELETS_PER_MOVE)
            })
    }

    /// Facelets differing from the goal in the four corners of each face.
    pub fn misplaced_corners(&self, state: &P) -> Estimate {
        let n = state.size();
        if n == 0 {
            return Estimate::Unavailable("empty puzzle");
        }
        let last = n - 1;
        let positions = (0..FACE_COUNT).flat_map(move |face| {
            [(0, 0), (0, last), (last, 0), (last, last)]
                .into_iter()
                .map(move |(row, col)| (face, row, col))
        });
        self.count_misplaced(state, positions)
            .map_or_else(Estimate::Unavailable, |count| {
                Estimate::Bound(count / CORNERS_PER_MOVE)
            })
    }

    /// Facelets differing from the goal at the middle of each face border.
    pub fn misplaced_edges(&self, state: &P) -> Estimate {
        let n = state.size();
        if n < 3 {
            return Estimate::Unavailable("no edge facelets below size 3");
        }
        let (mid, last) = (n / 2, n - 1);
        let positions = (0..FACE_COUNT).flat_map(move |face| {
            [(0, mid), (mid, 0), (mid, last), (last, mid)]
                .into_iter()
                .map(move |(row, col)| (face, row, col))
        });
        self.count_misplaced(state, positions)
            .map_or_else(Estimate::Unavailable, |count| {
                Estimate::Bound(count / EDGES_PER_MOVE)
            })
    }

    fn count_misplaced(
        &self,
        state: &P,
        positions: impl Iterator<Item = (usize, usize, usize)>,
    ) -> Result<u32, &'static str> {
        if state.size() != self.goal.size() {
            return Err("state size differs from goal size");
        }
        let mut count = 0;
        for (face, row, col) in positions {
            let actual = state.facelet(face, row, col).ok_or("facelet out of range")?;
            let expected = self.goal.facelet(face, row, col).ok_or("facelet out of range")?;
            if actual != expected {
                count += 1;
            }
        }
        Ok(count)
    }
}
