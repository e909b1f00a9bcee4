//! Zobrist hashing for chess positions.
//!
//! Keys come from a fixed-seed generator so hashes are reproducible across
//! runs. Halfmove and fullmove counters are never mixed in: positions that
//! differ only in their clocks hash equal.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Board, Color, Piece, Square};

const ZOBRIST_SEED: u64 = 1_234_567_890;

pub(crate) struct ZobristKeys {
    /// piece_keys[piece_index][square_index]
    pub(crate) piece_keys: [[u64; 64]; 12],
    /// White K, white Q, black K, black Q
    pub(crate) castling_keys: [u64; 4],
    /// One key per possible en passant target square
    pub(crate) en_passant_keys: [u64; 64],
    pub(crate) white_to_move_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_keys = [[0; 64]; 12];
        let mut castling_keys = [0; 4];
        let mut en_passant_keys = [0; 64];

        for piece in &mut piece_keys {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }
        for key in &mut castling_keys {
            *key = rng.gen();
        }
        for key in &mut en_passant_keys {
            *key = rng.gen();
        }
        let white_to_move_key = rng.gen();

        ZobristKeys {
            piece_keys,
            castling_keys,
            en_passant_keys,
            white_to_move_key,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[piece.index()][sq.index()]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// Hash of a position, recomputed from scratch.
#[must_use]
pub fn hash_position(board: &Board) -> u64 {
    let keys = &*ZOBRIST;
    let mut hash = 0u64;

    for idx in 0..12 {
        let piece = Piece::from_index(idx);
        for sq in board.bitboard(piece).iter() {
            hash ^= keys.piece(piece, sq);
        }
    }

    let castling = board.castling_rights().as_u8();
    for (bit, key) in keys.castling_keys.iter().enumerate() {
        if castling & (1 << bit) != 0 {
            hash ^= key;
        }
    }

    if let Some(ep) = board.en_passant() {
        hash ^= keys.en_passant_keys[ep.index()];
    }

    if board.side_to_move() == Color::White {
        hash ^= keys.white_to_move_key;
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clocks_do_not_affect_hash() {
        let a = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let b = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 12 40");
        let c = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
        assert_eq!(hash_position(&a), hash_position(&b));
        assert_eq!(hash_position(&a), hash_position(&c));
        assert_eq!(hash_position(&a), hash_position(&Board::new()));
    }

    #[test]
    fn en_passant_target_changes_hash() {
        let without = Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        let with = Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_ne!(hash_position(&without), hash_position(&with));
    }

    #[test]
    fn side_to_move_changes_hash() {
        let white = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let black = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(
            hash_position(&white) ^ hash_position(&black),
            ZOBRIST.white_to_move_key
        );
    }

    #[test]
    fn castling_flags_are_independent() {
        let all = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let some = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1");
        assert_eq!(
            hash_position(&all) ^ hash_position(&some),
            ZOBRIST.castling_keys[1] ^ ZOBRIST.castling_keys[2]
        );
    }
}
