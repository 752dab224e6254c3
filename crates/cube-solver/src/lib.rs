//! Heuristic state-space search for N x N x N layered cube puzzles.
//!
//! This crate provides a knowledge base builder (goal-rooted distance
//! tables), a heuristic evaluator, and several search strategies composed by
//! an adaptive engine: bounded breadth-first, bidirectional, IDA*, and a plain
//! iterative-deepening fallback.

pub mod bfs;
pub mod bidirectional;
pub mod cache;
pub mod deadline;
pub mod deepening;
pub mod error;
pub mod executor;
pub mod heuristic;
pub mod ida_star;
pub mod knowledge;
pub mod moves;
pub mod persistence;
pub mod pruning;
pub mod puzzle;
pub mod search;
pub mod solver;

// Re-export main types
pub use deadline::Deadline;
pub use error::{Result, SolverError};
pub use executor::{execute, scrambled, verify_solution, ExecutionResult};
pub use heuristic::{Estimate, Heuristic};
pub use knowledge::{BuildReport, BuilderConfig, KnowledgeBase, KnowledgeBaseBuilder};
pub use moves::{invert_path, moves, Axis, Direction, Move};
pub use persistence::{KnowledgeFile, KnowledgeMetadata};
pub use puzzle::{Cube, Face, PuzzleModel};
pub use search::{SearchOutcome, SearchStats, SolutionPath, Strategy};
pub use solver::{AdaptiveSearchEngine, SolveReport, SolverConfig, StrategyReport};
