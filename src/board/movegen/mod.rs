//! Legal move generation.
//!
//! Pseudo-legal moves are produced per piece type, then each one is applied
//! and kept only if the mover's king is not attacked afterwards. The final
//! list is sorted into generation order so repeated calls agree exactly.

mod attacks;
mod kings;
mod knights;
mod pawns;
mod sliders;

use super::{Board, Move, MoveList, Piece, PieceKind, Square};

impl Board {
    /// Push a quiet move or capture from `from` to `to`.
    ///
    /// Own-occupied targets are skipped, as are captures of a king.
    #[inline]
    pub(crate) fn push_target(&self, moves: &mut MoveList, piece: Piece, from: Square, to: Square) {
        match self.piece_at(to) {
            None => moves.push(Move::quiet(piece, from, to)),
            Some(victim) => {
                if victim.color() != piece.color() && victim.kind() != PieceKind::King {
                    moves.push(Move::capture(piece, from, to, victim));
                }
            }
        }
    }

    fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.side_to_move;

        for from in self.bitboard(Piece::new(color, PieceKind::Pawn)).iter() {
            self.generate_pawn_moves(from, &mut moves);
        }
        for from in self.bitboard(Piece::new(color, PieceKind::Knight)).iter() {
            self.generate_knight_moves(from, &mut moves);
        }
        for kind in [PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
            for from in self.bitboard(Piece::new(color, kind)).iter() {
                self.generate_slider_moves(from, Piece::new(color, kind), &mut moves);
            }
        }
        for from in self.bitboard(Piece::new(color, PieceKind::King)).iter() {
            self.generate_king_moves(from, &mut moves);
        }
        self.generate_castling_moves(&mut moves);

        moves
    }

    /// All legal moves for the side to move, in generation order.
    ///
    /// Takes `&mut self` because legality is tested by applying each
    /// candidate; the board is restored before returning.
    ///
    /// # Example
    /// ```
    /// use bitchess::board::Board;
    ///
    /// let mut board = Board::new();
    /// assert_eq!(board.generate_legal_moves().len(), 20);
    /// ```
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let color = self.side_to_move;
        let pseudo_moves = self.generate_pseudo_moves();
        let mut legal_moves = MoveList::new();

        for &m in pseudo_moves.iter() {
            let undo = self.make_move(m);
            if !self.is_in_check(color) {
                legal_moves.push(m);
            }
            self.undo_move(undo);
        }

        legal_moves.sort_by(Move::generation_order);
        legal_moves
    }

    /// Side to move is in check and has no legal move.
    pub fn is_checkmate(&mut self) -> bool {
        let color = self.side_to_move;
        self.is_in_check(color) && self.generate_legal_moves().is_empty()
    }

    /// Side to move is not in check and has no legal move.
    pub fn is_stalemate(&mut self) -> bool {
        let color = self.side_to_move;
        !self.is_in_check(color) && self.generate_legal_moves().is_empty()
    }
}
