//! Chess board representation and game logic.
//!
//! Twelve bitboards plus a side-to-move flag, castling rights, an en passant
//! target and the two clocks. Moves are applied in place and reverted from
//! an [`Undo`] snapshot.
//!
//! # Example
//! ```
//! use bitchess::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.generate_legal_moves();
//! assert_eq!(moves.len(), 20);
//! ```

mod error;
mod eval;
mod fen;
pub(crate) mod geometry;
mod make_unmake;
mod movegen;
mod perft;
mod pst;
pub mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use error::{FenError, MoveParseError, SquareError};
pub use state::{Board, Undo, STARTING_FEN};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, MoveListIntoIter, MoveType,
    Piece, PieceKind, Square,
};

// Public API - search functions and configuration
pub use perft::default_threads;
pub use search::{
    iterative_deepening, search, SearchConfig, SearchInfoCallback, SearchIterationInfo,
    SearchResult, MATE_THRESHOLD, MAX_PLY, MAX_SCORE,
};

pub(crate) use types::{ScoredMoveList, PROMOTION_KINDS};
