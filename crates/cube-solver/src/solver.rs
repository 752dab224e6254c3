//! Adaptive search engine.
//!
//! The engine owns only read-only data: the move catalog, the heuristic and
//! its shared knowledge base, and the configuration. Every solve call builds
//! its own [`SearchContext`], so a single engine behind an `Arc` can serve
//! concurrent solves from many threads.
//!
//! `solve` runs the strategies cheapest first and returns the first success:
//! breadth-first for shallow scrambles, then meet-in-the-middle, then IDA*.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::bfs::breadth_first;
use crate::bidirectional::bidirectional;
use crate::cache::DEFAULT_CAPACITY;
use crate::deadline::Deadline;
use crate::deepening::iterative_deepening;
use crate::error::{Result, SolverError};
use crate::heuristic::Heuristic;
use crate::ida_star::ida_star;
use crate::knowledge::KnowledgeBase;
use crate::moves::{moves, Move};
use crate::puzzle::{Cube, PuzzleModel};
use crate::search::{SearchContext, SearchOutcome, SearchStats, SolutionPath, Strategy};

/// Configuration for the engine
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Highest IDA* threshold; also bounds the bidirectional layers
    pub depth_ceiling: usize,
    /// Depth cap of the breadth-first pass
    pub bfs_depth: usize,
    /// Upper bound on bidirectional layers per side
    pub max_bidirectional_layers: usize,
    /// Transition cache entries per solve
    pub cache_capacity: usize,
    /// Wall-clock budget given to each strategy
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            depth_ceiling: 20,
            bfs_depth: 6,
            max_bidirectional_layers: 8,
            cache_capacity: DEFAULT_CAPACITY,
            timeout: None,
        }
    }
}

impl SolverConfig {
    /// Layers per side for the bidirectional pass.
    pub fn bidirectional_layers(&self) -> usize {
        (self.depth_ceiling / 2).min(self.max_bidirectional_layers)
    }
}

/// One strategy's run inside a solve
#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// Result of a solve: the overall outcome plus every strategy that ran
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub outcome: SearchOutcome,
    pub strategies: Vec<StrategyReport>,
    pub elapsed: Duration,
}

impl SolveReport {
    pub fn is_found(&self) -> bool {
        self.outcome.is_found()
    }

    pub fn solution(&self) -> Option<&[Move]> {
        self.outcome.path()
    }

    /// The strategy that produced the solution, if any.
    pub fn winner(&self) -> Option<Strategy> {
        self.strategies
            .iter()
            .find(|report| report.outcome.is_found())
            .map(|report| report.strategy)
    }

    /// Total expansions across all strategies.
    pub fn nodes_expanded(&self) -> u64 {
        self.strategies.iter().map(|report| report.stats.nodes_expanded).sum()
    }
}

/// Search engine bound to one puzzle size.
#[derive(Debug, Clone)]
pub struct AdaptiveSearchEngine<P: PuzzleModel = Cube> {
    config: SolverConfig,
    size: usize,
    catalog: Vec<Move>,
    heuristic: Heuristic<P>,
}

impl<P: PuzzleModel> AdaptiveSearchEngine<P> {
    pub fn new(size: usize, knowledge: Arc<KnowledgeBase<P>>, config: SolverConfig) -> Result<Self> {
        if size == 0 {
            return Err(SolverError::InvalidSize(size));
        }
        Ok(Self {
            config,
            size,
            catalog: moves(size),
            heuristic: Heuristic::new(size, knowledge),
        })
    }

    /// Engine without a knowledge base; IDA* relies on the fallback estimators.
    pub fn without_knowledge(size: usize, config: SolverConfig) -> Result<Self> {
        Self::new(size, Arc::new(KnowledgeBase::new()), config)
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn catalog(&self) -> &[Move] {
        &self.catalog
    }

    pub fn heuristic(&self) -> &Heuristic<P> {
        &self.heuristic
    }

    /// Runs breadth-first, bidirectional and IDA* in turn until one succeeds.
    ///
    /// When all fail the outcome is `TimedOut` if any of them ran out of
    /// time, `Exhausted` otherwise.
    pub fn solve(&self, initial: &P) -> Result<SolveReport> {
        self.check_size(initial)?;
        let start_time = Instant::now();
        let mut context = SearchContext::new(self.config.cache_capacity);
        let mut strategies = Vec::with_capacity(3);
        let mut timed_out = false;

        for strategy in [Strategy::BreadthFirst, Strategy::Bidirectional, Strategy::IdaStar] {
            let report = self.run(&mut context, strategy, initial, self.deadline());
            timed_out |= report.outcome == SearchOutcome::TimedOut;
            let found = report.outcome.is_found();
            strategies.push(report);
            if found {
                break;
            }
        }

        let outcome = match strategies.last() {
            Some(report) if report.outcome.is_found() => report.outcome.clone(),
            _ if timed_out => SearchOutcome::TimedOut,
            _ => SearchOutcome::Exhausted,
        };
        let report = SolveReport {
            outcome,
            strategies,
            elapsed: start_time.elapsed(),
        };

        info!(
            "solve: {} via {} in {:?} ({} expansions)",
            report.outcome.status(),
            report.winner().map_or_else(|| "-".to_string(), |s| s.to_string()),
            report.elapsed,
            report.nodes_expanded()
        );
        Ok(report)
    }

    /// Heuristic-free fallback: breadth-first to depth 4, then depth-limited
    /// search up to `max_moves`.
    pub fn solve_simple(
        &self,
        initial: &P,
        max_moves: usize,
        timeout: Option<Duration>,
    ) -> Result<SolveReport> {
        self.check_size(initial)?;
        let start_time = Instant::now();
        let mut context = SearchContext::new(self.config.cache_capacity);

        let strategy_start = Instant::now();
        let outcome = iterative_deepening(
            &mut context,
            &self.catalog,
            initial,
            max_moves,
            Deadline::from_timeout(timeout),
        );
        let report = StrategyReport {
            strategy: Strategy::Deepening,
            outcome: outcome.clone(),
            stats: context.take_stats(),
            elapsed: strategy_start.elapsed(),
        };

        info!("solve_simple: {} in {:?}", outcome.status(), report.elapsed);
        Ok(SolveReport {
            outcome,
            strategies: vec![report],
            elapsed: start_time.elapsed(),
        })
    }

    /// Runs a single strategy with the configured limits.
    ///
    /// `Deepening` uses `depth_ceiling` as its move limit.
    pub fn run_strategy(
        &self,
        strategy: Strategy,
        initial: &P,
        timeout: Option<Duration>,
    ) -> Result<SolveReport> {
        self.check_size(initial)?;
        let start_time = Instant::now();
        let mut context = SearchContext::new(self.config.cache_capacity);
        let report = self.run(&mut context, strategy, initial, Deadline::from_timeout(timeout));
        Ok(SolveReport {
            outcome: report.outcome.clone(),
            strategies: vec![report],
            elapsed: start_time.elapsed(),
        })
    }

    pub fn bfs(&self, initial: &P, max_depth: usize) -> Result<SearchOutcome> {
        self.bfs_until(initial, max_depth, Deadline::none())
    }

    pub fn bfs_with_timeout(
        &self,
        initial: &P,
        max_depth: usize,
        timeout: Duration,
    ) -> Result<SearchOutcome> {
        self.bfs_until(initial, max_depth, Deadline::after(timeout))
    }

    pub fn bidirectional(&self, initial: &P) -> Result<SearchOutcome> {
        Ok(self.run_strategy(Strategy::Bidirectional, initial, None)?.outcome)
    }

    pub fn bidirectional_with_timeout(&self, initial: &P, timeout: Duration) -> Result<SearchOutcome> {
        Ok(self.run_strategy(Strategy::Bidirectional, initial, Some(timeout))?.outcome)
    }

    pub fn ida_star(&self, initial: &P) -> Result<SearchOutcome> {
        Ok(self.run_strategy(Strategy::IdaStar, initial, None)?.outcome)
    }

    pub fn ida_star_with_timeout(&self, initial: &P, timeout: Duration) -> Result<SearchOutcome> {
        Ok(self.run_strategy(Strategy::IdaStar, initial, Some(timeout))?.outcome)
    }

    fn bfs_until(&self, initial: &P, max_depth: usize, deadline: Deadline) -> Result<SearchOutcome> {
        self.check_size(initial)?;
        let mut context = SearchContext::new(self.config.cache_capacity);
        Ok(breadth_first(&mut context, &self.catalog, initial, max_depth, deadline))
    }

    fn run(
        &self,
        context: &mut SearchContext<P>,
        strategy: Strategy,
        initial: &P,
        deadline: Deadline,
    ) -> StrategyReport {
        debug!("{}: starting", strategy);
        let start_time = Instant::now();

        let outcome = match strategy {
            Strategy::BreadthFirst => {
                breadth_first(context, &self.catalog, initial, self.config.bfs_depth, deadline)
            }
            Strategy::Bidirectional => bidirectional(
                context,
                &self.catalog,
                initial,
                self.config.bidirectional_layers(),
                deadline,
            ),
            Strategy::IdaStar => ida_star(
                context,
                &self.heuristic,
                &self.catalog,
                initial,
                self.config.depth_ceiling,
                deadline,
            ),
            Strategy::Deepening => iterative_deepening(
                context,
                &self.catalog,
                initial,
                self.config.depth_ceiling,
                deadline,
            ),
        };

        let report = StrategyReport {
            strategy,
            outcome,
            stats: context.take_stats(),
            elapsed: start_time.elapsed(),
        };
        debug!(
            "{}: {} after {} expansions in {:?}",
            strategy,
            report.outcome.status(),
            report.stats.nodes_expanded,
            report.elapsed
        );
        report
    }

    fn deadline(&self) -> Deadline {
        Deadline::from_timeout(self.config.timeout)
    }

    fn check_size(&self, state: &P) -> Result<()> {
        if state.size() != self.size {
            return Err(SolverError::SizeMismatch {
                expected: self.size,
                found: state.size(),
            });
        }
        Ok(())
    }
}
