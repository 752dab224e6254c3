//! CLI entry point for the cube solver.
//!
//! Usage:
//!   cube-solver build --size <n> --depth <d> --output <file> [--extend]
//!   cube-solver apply --size <n> <moves...>
//!   cube-solver solve <state> [options]
//!   cube-solver solve --stdin [options]
//!
//! Solve options:
//!   --knowledge <file>      Knowledge base written by `build`
//!   --strategy <name>       adaptive, bfs, bidirectional, ida or simple (default: adaptive)
//!   --timeout <seconds>     Time budget per strategy
//!   --depth-ceiling <n>     Highest IDA* threshold (default: 20)
//!   --max-moves <n>         Move limit of the simple strategy (default: 12)
//!
//! Pass -v for info logging and -vv for debug; RUST_LOG overrides both.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{info, warn, LevelFilter};
use serde::Serialize;

use cube_solver::{
    moves, verify_solution, AdaptiveSearchEngine, BuilderConfig, Cube, KnowledgeBase,
    KnowledgeBaseBuilder, KnowledgeFile, Move, PuzzleModel, Result, SolveReport, SolverConfig,
    SolverError, Strategy, StrategyReport,
};

#[derive(Parser)]
#[command(name = "cube-solver")]
#[command(about = "Heuristic search solver for N x N x N cube puzzles")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a knowledge base of distances from the solved state
    Build {
        /// Puzzle dimension
        #[arg(long)]
        size: usize,

        /// Exploration depth in moves
        #[arg(long)]
        depth: u32,

        /// Path of the JSON file to write
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Extend the knowledge base already stored at the output path
        #[arg(long)]
        extend: bool,

        /// Maximum node expansions
        #[arg(long, default_value = "1000000")]
        max_nodes: u64,
    },

    /// Apply moves to the solved state and print the result
    Apply {
        /// Puzzle dimension
        #[arg(long)]
        size: usize,

        /// Move descriptors such as h0+, v1- or l2+
        #[arg(value_name = "MOVES", allow_hyphen_values = true)]
        moves: Vec<String>,
    },

    /// Solve a serialized puzzle state
    Solve {
        /// Serialized state (use --stdin to read from stdin)
        #[arg(value_name = "STATE")]
        state: Option<String>,

        /// Read the state from stdin instead of the argument
        #[arg(long)]
        stdin: bool,

        /// Knowledge base file written by `build`
        #[arg(long, value_name = "FILE")]
        knowledge: Option<PathBuf>,

        /// Strategy to run
        #[arg(long, value_enum, default_value = "adaptive")]
        strategy: StrategyArg,

        /// Time budget per strategy in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Highest IDA* threshold
        #[arg(long, default_value = "20")]
        depth_ceiling: usize,

        /// Move limit of the simple strategy
        #[arg(long, default_value = "12")]
        max_moves: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Adaptive,
    Bfs,
    Bidirectional,
    Ida,
    Simple,
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<String>>,
    verified: bool,
    strategies: Vec<StrategyOutput>,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StrategyOutput {
    strategy: Strategy,
    status: &'static str,
    nodes_expanded: u64,
    cache_hits: u64,
    cache_misses: u64,
    heuristic_evaluations: u64,
    heuristic_hits: u64,
    iterations: u64,
    time_elapsed_ms: u64,
}

/// Output format for a knowledge base build
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildOutput {
    output: String,
    puzzle_size: usize,
    exploration_depth: u32,
    total_states: usize,
    states_written: usize,
    nodes_expanded: u64,
    queue_prunes: usize,
    budget_exhausted: bool,
    time_elapsed_ms: u64,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Runs one subcommand; `Ok(false)` means it finished without success.
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Build {
            size,
            depth,
            output,
            extend,
            max_nodes,
        } => build(size, depth, &output, extend, max_nodes).map(|_| true),

        Commands::Apply { size, moves } => {
            let state = apply(size, &moves)?;
            println!("{}", state.export_state());
            Ok(true)
        }

        Commands::Solve {
            state,
            stdin,
            knowledge,
            strategy,
            timeout,
            depth_ceiling,
            max_moves,
        } => {
            let serialized = if stdin {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else if let Some(state) = state {
                state
            } else {
                eprintln!("Error: Must provide either a state or --stdin");
                std::process::exit(1);
            };
            let initial = Cube::from_state(&serialized)?;

            let config = SolverConfig {
                depth_ceiling,
                timeout: timeout.map(Duration::from_secs),
                ..SolverConfig::default()
            };
            let engine = AdaptiveSearchEngine::new(
                initial.size(),
                Arc::new(load_knowledge(knowledge.as_deref(), initial.size())?),
                config,
            )?;

            let report = match strategy {
                StrategyArg::Adaptive => engine.solve(&initial)?,
                StrategyArg::Bfs => {
                    engine.run_strategy(Strategy::BreadthFirst, &initial, engine.config().timeout)?
                }
                StrategyArg::Bidirectional => {
                    engine.run_strategy(Strategy::Bidirectional, &initial, engine.config().timeout)?
                }
                StrategyArg::Ida => {
                    engine.run_strategy(Strategy::IdaStar, &initial, engine.config().timeout)?
                }
                StrategyArg::Simple => {
                    engine.solve_simple(&initial, max_moves, engine.config().timeout)?
                }
            };

            let output = format_report(&initial, &report);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(report.is_found())
        }
    }
}

fn build(size: usize, depth: u32, output: &Path, extend: bool, max_nodes: u64) -> Result<()> {
    if size == 0 {
        return Err(SolverError::InvalidSize(size));
    }

    let (existing, previous_depth) = if extend && output.exists() {
        let file = KnowledgeFile::load(output)?;
        if file.metadata.puzzle_size != size {
            return Err(SolverError::SizeMismatch {
                expected: size,
                found: file.metadata.puzzle_size,
            });
        }
        info!("extending {} stored states", file.metadata.total_states);
        (Some(file.to_knowledge::<Cube>()?), file.metadata.exploration_depth)
    } else {
        (None, 0)
    };

    let builder = KnowledgeBaseBuilder::new(BuilderConfig {
        max_nodes,
        ..BuilderConfig::default()
    });
    let (knowledge, report) =
        builder.build_with_report(&Cube::solved(size), &moves(size), depth, existing);

    let exploration_depth = depth.max(previous_depth);
    KnowledgeFile::from_knowledge(&knowledge, size, exploration_depth, report.elapsed)
        .save(output)?;

    let summary = BuildOutput {
        output: output.display().to_string(),
        puzzle_size: size,
        exploration_depth,
        total_states: report.total_states,
        states_written: report.states_written,
        nodes_expanded: report.nodes_expanded,
        queue_prunes: report.queue_prunes,
        budget_exhausted: report.budget_exhausted,
        time_elapsed_ms: report.elapsed.as_millis() as u64,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Applies descriptors to the solved state, skipping malformed ones.
fn apply(size: usize, descriptors: &[String]) -> Result<Cube> {
    if size == 0 {
        return Err(SolverError::InvalidSize(size));
    }

    let mut state = Cube::solved(size);
    for descriptor in descriptors {
        match descriptor.parse::<Move>() {
            Ok(mv) if mv.layer < size => state.apply(mv),
            Ok(mv) => warn!("skipping {}: layer out of range for size {}", mv, size),
            Err(e) => warn!("skipping move: {}", e),
        }
    }
    Ok(state)
}

fn load_knowledge(path: Option<&Path>, size: usize) -> Result<KnowledgeBase<Cube>> {
    let Some(path) = path else {
        return Ok(KnowledgeBase::new());
    };

    let file = KnowledgeFile::load(path)?;
    if file.metadata.puzzle_size != size {
        return Err(SolverError::SizeMismatch {
            expected: file.metadata.puzzle_size,
            found: size,
        });
    }
    let knowledge = file.to_knowledge()?;
    info!(
        "loaded {} states (depth {}) from {}",
        knowledge.len(),
        file.metadata.exploration_depth,
        path.display()
    );
    Ok(knowledge)
}

fn format_report(initial: &Cube, report: &SolveReport) -> SolveOutput {
    SolveOutput {
        status: report.outcome.status(),
        moves: report
            .solution()
            .map(|path| path.iter().map(|mv| mv.to_string()).collect()),
        verified: report
            .solution()
            .is_some_and(|path| verify_solution(initial, path)),
        strategies: report.strategies.iter().map(format_strategy).collect(),
        time_elapsed_ms: report.elapsed.as_millis() as u64,
    }
}

fn format_strategy(report: &StrategyReport) -> StrategyOutput {
    StrategyOutput {
        strategy: report.strategy,
        status: report.outcome.status(),
        nodes_expanded: report.stats.nodes_expanded,
        cache_hits: report.stats.cache_hits,
        cache_misses: report.stats.cache_misses,
        heuristic_evaluations: report.stats.heuristic_evaluations,
        heuristic_hits: report.stats.heuristic_hits,
        iterations: report.stats.iterations,
        time_elapsed_ms: report.elapsed.as_millis() as u64,
    }
}
