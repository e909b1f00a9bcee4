//! Perft (performance test) for move generation correctness.
//!
//! Only depths that finish quickly in a debug build run here; the full
//! reference table lives in the integration tests.

use crate::board::Board;
use std::time::Instant;

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(usize, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Initial Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depths: &[(1, 20), (2, 400), (3, 8902)],
    },
    TestPosition {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2039)],
    },
    TestPosition {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(1, 14), (2, 191), (3, 2812)],
    },
    TestPosition {
        name: "Position 4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        depths: &[(1, 6), (2, 264), (3, 9467)],
    },
    TestPosition {
        name: "Position 5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        depths: &[(1, 44), (2, 1486)],
    },
    TestPosition {
        name: "Pawn Endgame",
        fen: "8/8/ppk5/2p5/1P6/PKP5/8/8 w - - 0 1",
        depths: &[(1, 9), (2, 78), (3, 600), (4, 5369)],
    },
    TestPosition {
        name: "En Passant Capture",
        fen: "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        depths: &[(1, 31), (2, 707)],
    },
    TestPosition {
        name: "Promotion",
        fen: "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        depths: &[(1, 24), (2, 496), (3, 9483)],
    },
    TestPosition {
        name: "Castling",
        fen: "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        depths: &[(1, 26), (2, 568), (3, 13744)],
    },
];

#[test]
fn test_all_perft_positions() {
    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen);

        for &(depth, expected) in position.depths {
            let start = Instant::now();
            let nodes = board.perft(depth);
            let duration = start.elapsed();

            println!("  Depth {}: {} nodes in {:?}", depth, nodes, duration);

            assert_eq!(
                nodes, expected,
                "Perft failed for position '{}' at depth {}. Expected: {}, Got: {}",
                position.name, depth, expected, nodes
            );
        }
    }
}

#[test]
fn test_perft_leaves_board_untouched() {
    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen);
        let before = board.clone();
        board.perft(2);
        assert_eq!(board, before, "perft mutated '{}'", position.name);
    }
}

#[test]
fn test_parallel_perft_matches_serial() {
    let mut board = Board::from_fen(TEST_POSITIONS[1].fen);
    let serial = board.perft(3);
    for threads in [1, 2, 5] {
        assert_eq!(board.perft_parallel_with_threads(3, threads), serial);
    }
    assert_eq!(board.perft_parallel(3), serial);
}

#[test]
fn test_divide_sums_to_perft() {
    let mut board = Board::from_fen(TEST_POSITIONS[3].fen);
    let divide = board.perft_divide(3);
    assert_eq!(divide.len(), 6);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 9467);
}

#[test]
fn test_perft_depth_zero_is_one() {
    assert_eq!(Board::new().perft(0), 1);
}
