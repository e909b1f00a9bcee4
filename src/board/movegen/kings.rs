use super::super::geometry::{GEOMETRY, OFF_BOARD};
use super::super::{Board, Color, Move, MoveList, Piece, PieceKind, Square};

struct CastleRoute {
    color: Color,
    kingside: bool,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    /// Must be empty
    between: &'static [Square],
    /// Must not be attacked, king square included
    king_path: &'static [Square],
}

const CASTLE_ROUTES: [CastleRoute; 4] = [
    CastleRoute {
        color: Color::White,
        kingside: true,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        between: &[Square::F1, Square::G1],
        king_path: &[Square::E1, Square::F1, Square::G1],
    },
    CastleRoute {
        color: Color::White,
        kingside: false,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        between: &[Square::B1, Square::C1, Square::D1],
        king_path: &[Square::E1, Square::D1, Square::C1],
    },
    CastleRoute {
        color: Color::Black,
        kingside: true,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        between: &[Square::F8, Square::G8],
        king_path: &[Square::E8, Square::F8, Square::G8],
    },
    CastleRoute {
        color: Color::Black,
        kingside: false,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        between: &[Square::B8, Square::C8, Square::D8],
        king_path: &[Square::E8, Square::D8, Square::C8],
    },
];

impl Board {
    pub(crate) fn generate_king_moves(&self, from: Square, moves: &mut MoveList) {
        let king = Piece::new(self.side_to_move, PieceKind::King);
        for &target in &GEOMETRY.king_steps[from.index()] {
            if target != OFF_BOARD {
                self.push_target(moves, king, from, Square::from_index(target as usize));
            }
        }
    }

    /// Castling moves whose path is clear and not attacked.
    ///
    /// The opponent attack map is computed once, and only when some right
    /// for the side to move remains.
    pub(crate) fn generate_castling_moves(&self, moves: &mut MoveList) {
        let color = self.side_to_move;
        if !self.castling.has(color, true) && !self.castling.has(color, false) {
            return;
        }

        let king = Piece::new(color, PieceKind::King);
        let rook = Piece::new(color, PieceKind::Rook);
        let mut enemy_attacks = None;

        for route in CASTLE_ROUTES.iter().filter(|r| r.color == color) {
            if !self.castling.has(color, route.kingside)
                || !self.bitboard(king).contains(route.king_from)
                || !self.bitboard(rook).contains(route.rook_from)
                || route.between.iter().any(|&sq| !self.is_empty_square(sq))
            {
                continue;
            }
            let attacked =
                *enemy_attacks.get_or_insert_with(|| self.attacked_squares(color.opponent()));
            if route.king_path.iter().any(|&sq| attacked.contains(sq)) {
                continue;
            }
            moves.push(Move::castle(king, route.king_from, route.king_to));
        }
    }
}
