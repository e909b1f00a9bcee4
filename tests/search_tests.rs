//! Search tests to verify the engine finds correct moves in various positions.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use bitchess::board::{iterative_deepening, search, Board, SearchConfig, MAX_SCORE};
use bitchess::engine::{EngineController, SearchParams, TimeConfig, TimeControl};
use bitchess::sync::StopFlag;
use bitchess::tt::TranspositionTable;

fn best_uci(fen: &str, depth: u32) -> Option<String> {
    let board = Board::from_fen(fen);
    let tt = TranspositionTable::new(4);
    search(&board, depth, &tt).best_move.map(|m| m.to_uci())
}

/// Test that the engine finds a simple mate in 1 with queen
#[test]
fn finds_mate_in_one_queen() {
    // White to move, Qxf7# is mate
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4";
    assert_eq!(best_uci(fen, 3).as_deref(), Some("h5f7"), "Should find Qxf7#");
}

#[test]
fn mate_in_one_suite() {
    let problems = [
        ("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", "e1e8"),
        ("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8"),
        ("k7/8/1K6/8/8/8/8/6Q1 w - - 0 1", "g1g8"),
        ("6rk/6pp/8/6N1/8/8/8/6K1 w - - 0 1", "g5f7"),
        ("r5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1", "a8a1"),
    ];

    for (fen, expected) in problems {
        let board = Board::from_fen(fen);
        let tt = TranspositionTable::new(1);
        let result = search(&board, 3, &tt);
        let mv = result.best_move.expect("no move found");
        assert_eq!(mv.to_uci(), expected, "mate in one failed for fen: {fen}");

        let mut after = board.clone();
        after.make_move(mv);
        assert!(after.is_checkmate(), "{expected} does not mate in {fen}");
        assert_eq!(result.score.abs(), MAX_SCORE + 2);
    }
}

#[test]
fn finds_mate_in_two() {
    // Ra7 or Rb7 followed by mate on the back rank
    let board = Board::from_fen("7k/8/8/8/8/8/R7/1R4K1 w - - 0 1");
    let tt = TranspositionTable::new(4);
    let result = search(&board, 4, &tt);

    assert_eq!(result.score, MAX_SCORE + 1);
    assert_eq!(result.mate_in(), Some(3));
    let first = result.best_move.map(|m| m.to_uci());
    assert!(
        matches!(first.as_deref(), Some("a2a7" | "b1b7")),
        "unexpected first move {first:?}"
    );
}

#[test]
fn promotes_with_capture() {
    let board = Board::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    let tt = TranspositionTable::new(16);
    let result = search(&board, 4, &tt);
    assert_eq!(result.best_move.map(|m| m.to_uci()).as_deref(), Some("d7c8q"));
    assert!(result.score >= 200, "score {}", result.score);
}

#[test]
fn escapes_check_with_king() {
    let board = Board::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
    let tt = TranspositionTable::new(16);
    let result = search(&board, 4, &tt);
    assert_eq!(result.best_move.map(|m| m.to_uci()).as_deref(), Some("g1h1"));
}

/// Test that the engine captures free material
#[test]
fn captures_free_rook() {
    let board = Board::from_fen("4k3/8/8/8/8/2r5/8/1N2K3 w - - 0 1");
    let tt = TranspositionTable::new(1);
    let result = search(&board, 3, &tt);
    assert_eq!(result.best_move.map(|m| m.to_uci()).as_deref(), Some("b1c3"));
    assert!(result.score > 200);
}

/// Test that search handles single legal move positions
#[test]
fn single_legal_move() {
    // Rook on b8 covers b1 and b2; a2 is the only escape
    assert_eq!(
        best_uci("1r6/8/8/8/8/8/8/K6k w - - 0 1", 3).as_deref(),
        Some("a1a2")
    );
}

#[test]
fn thread_count_does_not_change_result() {
    let board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    let stop = StopFlag::new();

    let single = iterative_deepening(
        &board,
        &SearchConfig::depth(4).with_threads(1),
        &TranspositionTable::new(4),
        &stop,
    );
    let multi = iterative_deepening(
        &board,
        &SearchConfig::depth(4).with_threads(4),
        &TranspositionTable::new(4),
        &stop,
    );

    assert_eq!(single.depth, 4);
    assert_eq!(single.best_move, multi.best_move);
    assert_eq!(single.score, multi.score);
}

#[test]
fn time_limited_search_returns_in_time() {
    let board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let limits = TimeControl::move_time(Duration::from_millis(300))
        .compute_limits(&TimeConfig::default())
        .unwrap();
    let config = SearchConfig::time(limits.optimal, limits.max).with_threads(2);
    let tt = TranspositionTable::new(4);

    let start = Instant::now();
    let result = iterative_deepening(&board, &config, &tt, &StopFlag::new());

    assert!(result.best_move.is_some());
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
fn controller_plays_from_current_position() {
    let mut engine = EngineController::new(4);
    engine.set_threads(2);
    engine.board_mut().make_move_uci("e2e4").unwrap();

    let (tx, rx) = mpsc::channel();
    engine
        .start_search(
            SearchParams {
                depth: Some(3),
                ..Default::default()
            },
            move |result| {
                let _ = tx.send(result);
            },
        )
        .unwrap();

    let result = rx.recv_timeout(Duration::from_secs(30)).unwrap();
    let mv = result.best_move.expect("black has moves");

    let mut board = engine.board().clone();
    assert!(board.generate_legal_moves().contains(&mv));
    assert_eq!(result.depth, 3);
}
