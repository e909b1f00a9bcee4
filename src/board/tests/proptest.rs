//! Property-based tests using proptest.

use crate::board::search::{HistoryTable, KillerTable, MAX_PLY};
use crate::board::{Board, Color, Move, Piece, PieceKind, Square, Undo};
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Play `num_moves` random legal moves from the start position.
fn random_walk(seed: u64, num_moves: usize) -> Board {
    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..num_moves {
        let moves = board.generate_legal_moves();
        if moves.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..moves.len());
        board.make_move(moves.as_slice()[idx]);
    }
    board
}

proptest! {
    /// Property: make_move followed by undo_move restores board state exactly
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);

        // Record initial state
        let initial = board.clone();
        let initial_hash = board.hash();

        let mut history: Vec<Undo> = Vec::new();

        // Make random moves
        for _ in 0..num_moves {
            let moves = board.generate_legal_moves();
            if moves.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..moves.len());
            history.push(board.make_move(moves.as_slice()[idx]));
        }

        // Unmake all moves
        while let Some(undo) = history.pop() {
            board.undo_move(undo);
        }

        // Verify state is restored
        prop_assert_eq!(board.hash(), initial_hash);
        prop_assert_eq!(board, initial);
    }

    /// Property: every legal move can be made and undone in place
    #[test]
    fn prop_each_legal_move_undoes(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = random_walk(seed, num_moves);
        let before = board.clone();
        let moves = board.generate_legal_moves();
        for mv in moves.iter() {
            let undo = board.make_move(*mv);
            board.undo_move(undo);
            prop_assert_eq!(&board, &before, "undo of {} changed the board", mv);
        }
    }

    /// Property: FEN round-trip preserves position and hash
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let board = random_walk(seed, num_moves);

        let fen = board.to_fen();
        let restored = Board::from_fen(&fen);

        prop_assert_eq!(board.hash(), restored.hash());
        prop_assert_eq!(&restored, &board);
        prop_assert_eq!(restored.to_fen(), fen);
    }

    /// Property: legal moves are always legal (no self-check)
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut board = random_walk(seed, num_moves);

        let current_color = board.side_to_move();
        let moves = board.generate_legal_moves();
        for mv in moves.iter() {
            let undo = board.make_move(*mv);
            prop_assert!(!board.is_in_check(current_color),
                "Legal move left king in check: {}", mv);
            board.undo_move(undo);
        }
    }

    /// Property: the twelve bitboards never overlap and each side keeps one king
    #[test]
    fn prop_bitboards_disjoint(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let board = random_walk(seed, num_moves);

        let mut seen = 0u64;
        for idx in 0..12 {
            let bits = board.bitboard(Piece::from_index(idx)).0;
            prop_assert_eq!(seen & bits, 0, "bitboard {} overlaps", idx);
            seen |= bits;
        }
        prop_assert_eq!(seen, board.all_occupancy().0);

        for color in Color::BOTH {
            prop_assert_eq!(board.bitboard(Piece::new(color, PieceKind::King)).popcount(), 1);
        }
    }

    /// Property: generation order is reproducible
    #[test]
    fn prop_generation_deterministic(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = random_walk(seed, num_moves);
        let first = board.generate_legal_moves();
        let second = board.generate_legal_moves();
        prop_assert_eq!(first.as_slice(), second.as_slice());
    }

    // ========================================================================
    // Move Ordering Property Tests
    // ========================================================================

    /// Property: killer moves are preserved after update
    #[test]
    fn prop_killer_preserves_moves(
        ply in 0..100usize,
        mv1_from in 0..64usize,
        mv1_to in 0..64usize,
        mv2_from in 0..64usize,
        mv2_to in 0..64usize
    ) {
        let mut table = KillerTable::new();

        let mv1 = Move::quiet(
            Piece::WHITE_KNIGHT,
            Square::from_index(mv1_from),
            Square::from_index(mv1_to)
        );
        let mv2 = Move::quiet(
            Piece::WHITE_KNIGHT,
            Square::from_index(mv2_from),
            Square::from_index(mv2_to)
        );

        table.update(ply, mv1);

        if ply < MAX_PLY {
            prop_assert_eq!(table.primary(ply), Some(mv1));
        } else {
            prop_assert_eq!(table.primary(ply), None);
        }

        if mv1 != mv2 {
            table.update(ply, mv2);
            if ply < MAX_PLY {
                prop_assert_eq!(table.primary(ply), Some(mv2));
                prop_assert_eq!(table.secondary(ply), Some(mv1));
            }
        }
    }

    /// Property: history scores stay within bounds after updates
    #[test]
    fn prop_history_bounded(
        mv_from in 0..64usize,
        mv_to in 0..64usize,
        depth in 1..64u32,
        num_updates in 1..50usize
    ) {
        let mut table = HistoryTable::new();
        let mv = Move::quiet(
            Piece::BLACK_ROOK,
            Square::from_index(mv_from),
            Square::from_index(mv_to)
        );

        let mut last = 0;
        for _ in 0..num_updates {
            table.update(&mv, depth);
            let score = table.score(&mv);
            prop_assert!(score >= last, "History score should never drop");
            last = score;
        }

        prop_assert!(last > 0);
        prop_assert!(last <= 7_000, "History score {} escaped the killer band", last);
    }

    // ========================================================================
    // Evaluation Property Tests
    // ========================================================================

    /// Property: evaluation is bounded (no extreme values)
    #[test]
    fn prop_eval_bounded(seed in seed_strategy(), num_moves in 0..30usize) {
        let board = random_walk(seed, num_moves);

        let eval = board.evaluate();
        // Max material is ~39 pawns worth = 3900 cp, plus positional bonuses
        prop_assert!(eval.abs() < 10000,
            "Evaluation {} is unreasonably large", eval);
    }

    // ========================================================================
    // Transposition Table Property Tests
    // ========================================================================

    /// Property: TT stores and retrieves correct data
    #[test]
    fn prop_tt_store_retrieve(
        hash in any::<u64>(),
        depth in 0..100u32,
        score in -10000..10000i32
    ) {
        use crate::tt::TranspositionTable;

        let tt = TranspositionTable::new(1);
        tt.set(hash, depth, score);

        prop_assert_eq!(tt.get(hash, depth), Some(score));
        prop_assert_eq!(tt.get(hash, depth + 1), None);
    }
}
