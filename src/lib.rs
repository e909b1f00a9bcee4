pub mod board;
pub mod book;
pub mod engine;
pub mod sync;
pub mod tt;
pub mod uci;
pub mod zobrist;

pub use board::{Board, Color, Move, Piece, Square};
pub use book::{BookLookup, OpeningBook};
pub use engine::EngineController;
pub use tt::TranspositionTable;
