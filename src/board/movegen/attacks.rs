use super::super::geometry::GEOMETRY;
use super::super::{Bitboard, Board, Color, Piece, PieceKind, Square};

impl Board {
    /// Every square `color` attacks, treating captures as quiet moves.
    ///
    /// Pawns contribute their diagonal captures only; sliders stop on the
    /// first occupied square whoever owns it.
    #[must_use]
    pub fn attacked_squares(&self, color: Color) -> Bitboard {
        let occupied = self.all_occupancy();
        let mut attacked = Bitboard::EMPTY;

        for sq in self.bitboard(Piece::new(color, PieceKind::Pawn)).iter() {
            attacked |= Bitboard(GEOMETRY.pawn_attacks[color.index()][sq.index()]);
        }
        for sq in self.bitboard(Piece::new(color, PieceKind::Knight)).iter() {
            attacked |= Bitboard(GEOMETRY.knight_masks[sq.index()]);
        }
        for sq in self.bitboard(Piece::new(color, PieceKind::King)).iter() {
            attacked |= Bitboard(GEOMETRY.king_masks[sq.index()]);
        }
        let queens = self.bitboard(Piece::new(color, PieceKind::Queen));
        for sq in (self.bitboard(Piece::new(color, PieceKind::Bishop)) | queens).iter() {
            attacked |= GEOMETRY.bishop_attacks(sq, occupied);
        }
        for sq in (self.bitboard(Piece::new(color, PieceKind::Rook)) | queens).iter() {
            attacked |= GEOMETRY.rook_attacks(sq, occupied);
        }

        attacked
    }

    /// Whether any piece of `by` attacks `sq`.
    ///
    /// Looks outward from the target, so it agrees with
    /// `attacked_squares(by).contains(sq)` without building the whole map.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let idx = sq.index();
        let piece_bb = |kind| self.bitboard(Piece::new(by, kind)).0;

        // A pawn of `by` attacks `sq` from where an opposing pawn on `sq` would capture.
        if GEOMETRY.pawn_attacks[by.opponent().index()][idx] & piece_bb(PieceKind::Pawn) != 0 {
            return true;
        }
        if GEOMETRY.knight_masks[idx] & piece_bb(PieceKind::Knight) != 0 {
            return true;
        }
        if GEOMETRY.king_masks[idx] & piece_bb(PieceKind::King) != 0 {
            return true;
        }

        let occupied = self.all_occupancy();
        let queens = piece_bb(PieceKind::Queen);
        if GEOMETRY.rook_attacks(sq, occupied).0 & (piece_bb(PieceKind::Rook) | queens) != 0 {
            return true;
        }
        GEOMETRY.bishop_attacks(sq, occupied).0 & (piece_bb(PieceKind::Bishop) | queens) != 0
    }

    /// Whether `color`'s king is attacked. A side without a king is never in check.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opponent()))
    }
}
