//! Types shared by all search strategies.

use std::fmt;

use serde::Serialize;

use crate::cache::TransitionCache;
use crate::moves::Move;
use crate::puzzle::PuzzleModel;

/// An ordered move sequence leading from a start state to the goal.
pub type SolutionPath = Vec<Move>;

/// How a strategy finished.
///
/// `Exhausted` means the strategy searched everything its bounds allowed and
/// found nothing; `TimedOut` means the deadline passed first and nothing is
/// known. Neither is a proof of unsolvability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SolutionPath),
    Exhausted,
    TimedOut,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&[Move]> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<SolutionPath> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SearchOutcome::Found(_) => "found",
            SearchOutcome::Exhausted => "exhausted",
            SearchOutcome::TimedOut => "timed_out",
        }
    }
}

/// The strategies the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    BreadthFirst,
    Bidirectional,
    IdaStar,
    Deepening,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::Bidirectional => "bidirectional",
            Strategy::IdaStar => "ida*",
            Strategy::Deepening => "deepening",
        };
        f.write_str(name)
    }
}

/// Counters for one strategy run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes_expanded: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub heuristic_evaluations: u64,
    pub heuristic_hits: u64,
    /// IDA* iterations or deepening bounds tried.
    pub iterations: u64,
}

/// Mutable state owned by a single solve call.
///
/// Nothing in here outlives the call that created it, so one engine can
/// serve any number of concurrent solves.
#[derive(Debug)]
pub struct SearchContext<P> {
    pub cache: TransitionCache<P>,
    pub stats: SearchStats,
}

impl<P: PuzzleModel> SearchContext<P> {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: TransitionCache::new(cache_capacity),
            stats: SearchStats::default(),
        }
    }

    /// Applies `mv` through the transition cache.
    pub fn next_state(&mut self, state: &P, mv: Move) -> P {
        self.cache.next_state(state, mv)
    }

    /// Takes the counters gathered so far and starts a fresh set.
    ///
    /// Cached transitions survive; only the bookkeeping is reset.
    pub fn take_stats(&mut self) -> SearchStats {
        let mut stats = std::mem::take(&mut self.stats);
        stats.cache_hits = self.cache.hits();
        stats.cache_misses = self.cache.misses();
        self.cache.reset_counters();
        stats
    }
}

/// Follows parent links from `index` back to the root of an arena.
///
/// Each entry is `(parent, move that produced it)`; the root has no parent.
pub(crate) fn trace_path(arena: &[(Option<usize>, Option<Move>)], index: usize) -> SolutionPath {
    let mut path = Vec::new();
    let mut cursor = Some(index);
    while let Some(i) = cursor {
        let (parent, mv) = arena[i];
        if let Some(mv) = mv {
            path.push(mv);
        }
        cursor = parent;
    }
    path.reverse();
    path
}
