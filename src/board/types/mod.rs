//! Core chess types.
//!
//! - `Color`, `PieceKind`, `Piece` - the twelve colored pieces
//! - `Square` - board square indexed a8 = 0 .. h1 = 63
//! - `Bitboard` - 64-bit square set
//! - `Move`, `MoveType`, `MoveList` - move representation
//! - `CastlingRights` - the four castling flags

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveList, MoveListIntoIter, MoveType};
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;

pub(crate) use moves::ScoredMoveList;
pub(crate) use piece::PROMOTION_KINDS;
