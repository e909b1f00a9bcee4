use super::super::geometry::{GEOMETRY, OFF_BOARD};
use super::super::{Board, MoveList, Piece, PieceKind, Square};

impl Board {
    pub(crate) fn generate_knight_moves(&self, from: Square, moves: &mut MoveList) {
        let knight = Piece::new(self.side_to_move, PieceKind::Knight);
        for &target in &GEOMETRY.knight_jumps[from.index()] {
            if target != OFF_BOARD {
                self.push_target(moves, knight, from, Square::from_index(target as usize));
            }
        }
    }
}
