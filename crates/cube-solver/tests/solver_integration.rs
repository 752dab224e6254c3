use std::sync::Arc;
use std::time::Duration;

use log::info;

use cube_solver::{
    moves, scrambled, verify_solution, AdaptiveSearchEngine, Axis, Cube, Direction,
    KnowledgeBase, KnowledgeBaseBuilder, KnowledgeFile, Move, PuzzleModel, SearchOutcome,
    SolverConfig, Strategy,
};

/// Deterministic scramble of `length` moves that never undoes its last move.
fn scramble(size: usize, length: usize, seed: u64) -> Vec<Move> {
    let catalog = moves(size);
    let mut state = seed;
    let mut sequence: Vec<Move> = Vec::with_capacity(length);
    while sequence.len() < length {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let mv = catalog[(state >> 33) as usize % catalog.len()];
        if sequence.last().is_some_and(|last| last.inverse() == mv) {
            continue;
        }
        sequence.push(mv);
    }
    sequence
}

fn knowledge(size: usize, depth: u32) -> Arc<KnowledgeBase<Cube>> {
    Arc::new(KnowledgeBaseBuilder::default().build(&Cube::solved(size), &moves(size), depth, None))
}

#[test_log::test]
fn test_size_two_single_turn() {
    let start = Cube::solved(2).successor(Move::new(Axis::Horizontal, 0, Direction::Forward));
    let engine = AdaptiveSearchEngine::without_knowledge(2, SolverConfig::default()).unwrap();
    assert_eq!(
        engine.bfs(&start, 1).unwrap(),
        SearchOutcome::Found(vec![Move::new(Axis::Horizontal, 0, Direction::Reverse)])
    );
}

#[test_log::test]
fn test_knowledge_two_moves_out() {
    let table = knowledge(2, 2);
    let two_away: Cube = scrambled(
        2,
        &[
            Move::new(Axis::Vertical, 0, Direction::Forward),
            Move::new(Axis::Lateral, 1, Direction::Forward),
        ],
    );
    assert_eq!(table.get(&Cube::solved(2)), Some(0));
    assert!(table.get(&two_away).is_some_and(|distance| distance <= 2));
    assert!(table.iter().all(|(_, distance)| distance <= 2));
}

#[test_log::test]
fn test_every_strategy_round_trips_short_scrambles() {
    let engine = AdaptiveSearchEngine::new(2, knowledge(2, 4), SolverConfig::default()).unwrap();

    for length in 1..=4 {
        for seed in 0..3 {
            let start: Cube = scrambled(2, &scramble(2, length, seed));
            let outcomes = [
                (Strategy::BreadthFirst, engine.bfs(&start, 6).unwrap()),
                (Strategy::Bidirectional, engine.bidirectional(&start).unwrap()),
                (Strategy::IdaStar, engine.ida_star(&start).unwrap()),
                (
                    Strategy::Deepening,
                    engine.solve_simple(&start, 8, None).unwrap().outcome,
                ),
            ];

            for (strategy, outcome) in outcomes {
                let path = outcome
                    .into_path()
                    .unwrap_or_else(|| panic!("{} failed on length {} seed {}", strategy, length, seed));
                assert!(path.len() <= length, "{} returned {} moves", strategy, path.len());
                assert!(verify_solution(&start, &path));
            }
        }
    }
}

#[test_log::test]
fn test_ida_star_optimal_with_deep_enough_table() {
    let table = knowledge(2, 4);
    let engine = AdaptiveSearchEngine::new(2, Arc::clone(&table), SolverConfig::default()).unwrap();

    for seed in 0..5 {
        let start: Cube = scrambled(2, &scramble(2, 4, seed));
        let Some(distance) = table.get(&start) else {
            continue;
        };
        let path = engine.ida_star(&start).unwrap().into_path().unwrap();
        info!("seed {}: distance {} path {:?}", seed, distance, path);
        assert_eq!(path.len(), distance as usize);
    }
}

#[test_log::test]
fn test_adaptive_solve_on_three_by_three() {
    let engine = AdaptiveSearchEngine::new(3, knowledge(3, 2), SolverConfig::default()).unwrap();

    for seed in 0..3 {
        let start: Cube = scrambled(3, &scramble(3, 4, seed));
        let report = engine.solve(&start).unwrap();
        assert!(report.is_found());
        assert!(verify_solution(&start, report.solution().unwrap()));
        assert_eq!(report.strategies.len(), 1);
    }
}

#[test_log::test]
fn test_persisted_table_feeds_engine() {
    let table = knowledge(2, 3);
    let path = std::env::temp_dir().join(format!("cube-solver-it-{}.json", std::process::id()));
    KnowledgeFile::from_knowledge(&table, 2, 3, Duration::ZERO)
        .save(&path)
        .unwrap();
    let restored: KnowledgeBase<Cube> = KnowledgeFile::load(&path).unwrap().to_knowledge().unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(restored.len(), table.len());

    let start: Cube = scrambled(2, &scramble(2, 3, 7));
    let engine = AdaptiveSearchEngine::new(2, Arc::new(restored), SolverConfig::default()).unwrap();
    let path = engine.ida_star(&start).unwrap().into_path().unwrap();
    assert!(verify_solution(&start, &path));
}

#[test_log::test]
fn test_serialized_state_round_trip_through_solver() {
    let start: Cube = scrambled(3, &scramble(3, 3, 11));
    let parsed = Cube::from_state(&start.export_state()).unwrap();
    assert_eq!(parsed, start);

    let engine = AdaptiveSearchEngine::without_knowledge(3, SolverConfig::default()).unwrap();
    let report = engine.solve(&parsed).unwrap();
    assert!(verify_solution(&start, report.solution().unwrap()));
}
