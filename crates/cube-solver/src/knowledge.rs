//! Precomputed distance-to-goal table and the breadth-first builder.
//!
//! The builder explores outward from the goal. Every move has an inverse, so
//! the distance from the goal to a state equals the distance from that state
//! back to the goal, and the table can be used directly as a heuristic.
//!
//! Tables are partial by construction: a missing entry means "not explored",
//! never "unreachable".

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::moves::Move;
use crate::puzzle::PuzzleModel;

/// Map from state to the smallest distance from the goal discovered so far.
#[derive(Debug, Clone)]
pub struct KnowledgeBase<P> {
    distances: FxHashMap<P, u32>,
}

impl<P: PuzzleModel> KnowledgeBase<P> {
    pub fn new() -> Self {
        Self {
            distances: FxHashMap::default(),
        }
    }

    pub fn get(&self, state: &P) -> Option<u32> {
        self.distances.get(state).copied()
    }

    pub fn contains(&self, state: &P) -> bool {
        self.distances.contains_key(state)
    }

    /// Records `distance` unless a smaller or equal one is already known.
    ///
    /// Returns true when the table changed.
    pub fn insert_min(&mut self, state: P, distance: u32) -> bool {
        match self.distances.get_mut(&state) {
            Some(known) if *known <= distance => false,
            Some(known) => {
                *known = distance;
                true
            }
            None => {
                self.distances.insert(state, distance);
                true
            }
        }
    }

    /// Folds `other` in, keeping the smaller distance per state.
    pub fn merge(&mut self, other: KnowledgeBase<P>) {
        for (state, distance) in other.distances {
            self.insert_min(state, distance);
        }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn max_distance(&self) -> Option<u32> {
        self.distances.values().copied().max()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&P, u32)> {
        self.distances.iter().map(|(state, &distance)| (state, distance))
    }
}

impl<P: PuzzleModel> Default for KnowledgeBase<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PuzzleModel> FromIterator<(P, u32)> for KnowledgeBase<P> {
    fn from_iter<I: IntoIterator<Item = (P, u32)>>(iter: I) -> Self {
        let mut knowledge = Self::new();
        for (state, distance) in iter {
            knowledge.insert_min(state, distance);
        }
        knowledge
    }
}

/// Limits for a knowledge base build
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Hard cap on node expansions, applied on top of `branching^depth`
    pub max_nodes: u64,
    /// Pending queue length that triggers pruning
    pub queue_limit: usize,
    /// Entries kept (lowest depth first) when the queue is pruned
    pub queue_retain: usize,
    /// Expansions between progress log lines
    pub progress_interval: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_nodes: 1_000_000,
            queue_limit: 100_000,
            queue_retain: 50_000,
            progress_interval: 100_000,
        }
    }
}

/// Summary of a finished build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Entries in the resulting table
    pub total_states: usize,
    /// Entries written or improved by this build
    pub states_written: usize,
    pub nodes_expanded: u64,
    /// Times the pending queue was cut back
    pub queue_prunes: usize,
    /// Whether the node budget stopped the build early
    pub budget_exhausted: bool,
    pub elapsed: Duration,
}

impl BuildReport {
    /// True when no approximation was applied, so every state within the
    /// requested depth is present with its exact distance.
    pub fn is_complete(&self) -> bool {
        !self.budget_exhausted && self.queue_prunes == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseBuilder {
    config: BuilderConfig,
}

impl KnowledgeBaseBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Builds a table of every state within `depth` moves of `goal`,
    /// extending `existing` if given.
    pub fn build<P: PuzzleModel>(
        &self,
        goal: &P,
        moves: &[Move],
        depth: u32,
        existing: Option<KnowledgeBase<P>>,
    ) -> KnowledgeBase<P> {
        self.build_with_report(goal, moves, depth, existing).0
    }

    /// Same as [`build`](Self::build), also returning build statistics.
    ///
    /// The exploration is a FIFO breadth-first search, so the queue is always
    /// ordered by depth. When it grows past `queue_limit` only the
    /// `queue_retain` shallowest entries are kept; states behind the cut may be
    /// missing from the result.
    pub fn build_with_report<P: PuzzleModel>(
        &self,
        goal: &P,
        moves: &[Move],
        depth: u32,
        existing: Option<KnowledgeBase<P>>,
    ) -> (KnowledgeBase<P>, BuildReport) {
        let start_time = Instant::now();
        let mut knowledge = existing.unwrap_or_default();
        let mut report = BuildReport::default();

        if knowledge.insert_min(goal.clone(), 0) {
            report.states_written += 1;
        }

        let budget = self.node_budget(moves.len(), depth);
        debug!(
            "building knowledge base: depth {}, {} moves, node budget {}",
            depth,
            moves.len(),
            budget
        );

        // seen in this build, independent of what `existing` already holds
        let mut seen: FxHashSet<P> = FxHashSet::default();
        seen.insert(goal.clone());

        let mut queue: VecDeque<(P, u32)> = VecDeque::new();
        queue.push_back((goal.clone(), 0));

        while let Some((state, distance)) = queue.pop_front() {
            if distance >= depth {
                continue;
            }
            if report.nodes_expanded >= budget {
                report.budget_exhausted = true;
                break;
            }
            report.nodes_expanded += 1;

            for &mv in moves {
                let neighbor = state.successor(mv);
                if knowledge.insert_min(neighbor.clone(), distance + 1) {
                    report.states_written += 1;
                }
                if seen.insert(neighbor.clone()) {
                    queue.push_back((neighbor, distance + 1));
                }
            }

            if queue.len() > self.config.queue_limit {
                queue.truncate(self.config.queue_retain);
                report.queue_prunes += 1;
                warn!(
                    "knowledge base queue exceeded {} entries, kept the {} shallowest",
                    self.config.queue_limit, self.config.queue_retain
                );
            }

            if self.config.progress_interval > 0
                && report.nodes_expanded % self.config.progress_interval == 0
            {
                info!(
                    "knowledge base: {} nodes expanded, {} states, {} queued",
                    report.nodes_expanded,
                    knowledge.len(),
                    queue.len()
                );
            }
        }

        report.total_states = knowledge.len();
        report.elapsed = start_time.elapsed();
        info!(
            "knowledge base built: {} states ({} new) from {} expansions in {:.2?}",
            report.total_states, report.states_written, report.nodes_expanded, report.elapsed
        );

        (knowledge, report)
    }

    /// `min(branching^depth, max_nodes)`, saturating on overflow.
    fn node_budget(&self, branching: usize, depth: u32) -> u64 {
        (branching as u64)
            .checked_pow(depth)
            .unwrap_or(u64::MAX)
            .min(self.config.max_nodes)
    }
}
