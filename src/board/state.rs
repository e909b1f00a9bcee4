use std::fmt;

use super::{Bitboard, CastlingRights, Color, Piece, PieceKind, Square};

/// FEN of the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Snapshot of every mutable board field, taken before a move is applied.
///
/// Restoring it is a blind copy; no chess logic runs on undo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    pub(crate) pieces: [Bitboard; 12],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

/// The authoritative position: twelve piece bitboards plus game state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub(crate) pieces: [Bitboard; 12],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Board {
    /// Board in the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        board.load_initial();
        board
    }

    /// Board with no pieces, white to move, no rights, fullmove 1.
    #[must_use]
    pub fn empty() -> Self {
        Board {
            pieces: [Bitboard::EMPTY; 12],
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Reset to the standard starting position.
    pub fn load_initial(&mut self) {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        *self = Board::empty();
        for (file, kind) in back_rank.iter().enumerate() {
            self.set_piece(Square::from_rank_file(0, file), Piece::new(Color::Black, *kind));
            self.set_piece(Square::from_rank_file(1, file), Piece::BLACK_PAWN);
            self.set_piece(Square::from_rank_file(6, file), Piece::WHITE_PAWN);
            self.set_piece(Square::from_rank_file(7, file), Piece::new(Color::White, *kind));
        }
        self.castling = CastlingRights::all();
    }

    #[inline]
    pub(crate) fn set_piece(&mut self, sq: Square, piece: Piece) {
        self.pieces[piece.index()].set(sq);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square, piece: Piece) {
        self.pieces[piece.index()].clear(sq);
    }

    /// Piece on `sq`, testing each bitboard in turn.
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.pieces
            .iter()
            .position(|bb| bb.contains(sq))
            .map(Piece::from_index)
    }

    #[inline]
    #[must_use]
    pub fn bitboard(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// All squares occupied by `color`
    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        let base = color.index() * 6;
        self.pieces[base..base + 6]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    #[inline]
    #[must_use]
    pub fn all_occupancy(&self) -> Bitboard {
        self.occupancy(Color::White) | self.occupancy(Color::Black)
    }

    #[inline]
    #[must_use]
    pub fn is_empty_square(&self, sq: Square) -> bool {
        !self.all_occupancy().contains(sq)
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.bitboard(Piece::new(color, PieceKind::King)).lsb()
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist fingerprint of the play-relevant state.
    #[must_use]
    pub fn hash(&self) -> u64 {
        crate::zobrist::hash_position(self)
    }

    /// Capture everything `undo_move` needs.
    #[inline]
    #[must_use]
    pub(crate) fn snapshot(&self) -> Undo {
        Undo {
            pieces: self.pieces,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Restore a snapshot taken by `make_move`.
    #[inline]
    pub fn undo_move(&mut self, undo: Undo) {
        self.pieces = undo.pieces;
        self.side_to_move = undo.side_to_move;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// Board diagram with rank 8 at the top.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const BORDER: &str = "  +---+---+---+---+---+---+---+---+";
        writeln!(f, "{BORDER}")?;
        for rank in 0..8 {
            write!(f, "{} |", 8 - rank)?;
            for file in 0..8 {
                let sq = Square::from_rank_file(rank, file);
                let ch = self.piece_at(sq).map_or(' ', Piece::to_fen_char);
                write!(f, " {ch} |")?;
            }
            writeln!(f)?;
            writeln!(f, "{BORDER}")?;
        }
        write!(f, "    a   b   c   d   e   f   g   h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_layout() {
        let board = Board::new();
        assert_eq!(board.piece_at(Square::E1), Some(Piece::WHITE_KING));
        assert_eq!(board.piece_at(Square::D8), Some(Piece::BLACK_QUEEN));
        assert_eq!(board.piece_at("e2".parse().unwrap()), Some(Piece::WHITE_PAWN));
        assert_eq!(board.piece_at("e4".parse().unwrap()), None);
        assert_eq!(board.all_occupancy().popcount(), 32);
        assert_eq!(board.castling_rights(), CastlingRights::all());
        assert_eq!(board.fullmove_number(), 1);
    }

    #[test]
    fn clone_is_independent() {
        let board = Board::new();
        let mut copy = board.clone();
        copy.remove_piece(Square::E1, Piece::WHITE_KING);
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
        assert_eq!(copy.king_square(Color::White), None);
    }

    #[test]
    fn empty_board_defaults() {
        let board = Board::empty();
        assert!(board.all_occupancy().is_empty());
        assert!(board.white_to_move());
        assert_eq!(board.en_passant(), None);
    }

    #[test]
    fn diagram_shows_pieces() {
        let text = Board::new().to_string();
        assert!(text.starts_with("  +---"));
        assert!(text.contains("8 | r | n | b | q | k | b | n | r |"));
        assert!(text.contains("1 | R | N | B | Q | K | B | N | R |"));
        assert!(text.contains("4 |   |   |   |   |   |   |   |   |"));
    }
}
