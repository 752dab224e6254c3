//! Memoized move application.
//!
//! Every strategy of a solve shares one cache, so states reached by BFS do
//! not have to be recomputed by the strategies that run after it. Capacity is
//! bounded; when full the oldest quarter of the entries (by insertion order)
//! is evicted before the next insert.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::moves::Move;
use crate::puzzle::PuzzleModel;

/// Default number of cached transitions.
pub const DEFAULT_CAPACITY: usize = 100_000;

#[derive(Debug, Clone)]
pub struct TransitionCache<P> {
    capacity: usize,
    entries: FxHashMap<(P, Move), P>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<(P, Move)>,
    hits: u64,
    misses: u64,
}

impl<P: PuzzleModel> TransitionCache<P> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: FxHashMap::default(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The state reached by applying `mv` to `state`.
    pub fn next_state(&mut self, state: &P, mv: Move) -> P {
        let key = (state.clone(), mv);
        if let Some(next) = self.entries.get(&key) {
            self.hits += 1;
            return next.clone();
        }

        self.misses += 1;
        let next = state.successor(mv);
        if self.capacity == 0 {
            return next;
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest_quarter();
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, next.clone());
        next
    }

    fn evict_oldest_quarter(&mut self) {
        let count = (self.capacity / 4).max(1);
        for key in self.order.drain(..count.min(self.order.len())) {
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Zeroes the hit/miss counters, keeping cached entries.
    pub fn reset_counters(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }
}

impl<P: PuzzleModel> Default for TransitionCache<P> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::moves;
    use crate::puzzle::Cube;

    #[test]
    fn test_hit_returns_same_state() {
        let mut cache = TransitionCache::new(16);
        let goal = Cube::solved(2);
        let mv = moves(2)[0];

        let first = cache.next_state(&goal, mv);
        let second = cache.next_state(&goal, mv);
        assert_eq!(first, second);
        assert_eq!(first, goal.successor(mv));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let mut cache = TransitionCache::new(10);
        let mut state = Cube::solved(2);
        for mv in moves(2).into_iter().cycle().take(200) {
            state = cache.next_state(&state, mv);
            assert!(cache.len() <= cache.capacity());
        }
    }

    #[test]
    fn test_evicts_oldest_quarter() {
        let mut cache = TransitionCache::new(8);
        let goal = Cube::solved(2);
        let catalog = moves(2);

        for &mv in &catalog[..8] {
            cache.next_state(&goal, mv);
        }
        assert_eq!(cache.len(), 8);

        // ninth insert drops the two oldest entries first
        cache.next_state(&goal, catalog[8]);
        assert_eq!(cache.len(), 7);

        cache.reset_counters();
        cache.next_state(&goal, catalog[0]);
        assert_eq!(cache.misses(), 1);
        cache.next_state(&goal, catalog[2]);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_zero_capacity_still_computes() {
        let mut cache = TransitionCache::new(0);
        let goal = Cube::solved(2);
        let mv = moves(2)[3];
        assert_eq!(cache.next_state(&goal, mv), goal.successor(mv));
        assert!(cache.is_empty());
    }
}
