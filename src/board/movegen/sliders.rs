use super::super::geometry::{BISHOP_DIRECTIONS, DIRECTION_OFFSETS, GEOMETRY, ROOK_DIRECTIONS};
use super::super::{Board, MoveList, Piece, PieceKind, Square};

impl Board {
    /// Walk each of the slider's directions until the edge or the first
    /// occupied square, which is emitted as a capture when it is an enemy.
    pub(crate) fn generate_slider_moves(&self, from: Square, slider: Piece, moves: &mut MoveList) {
        let directions: &[usize] = match slider.kind() {
            PieceKind::Bishop => &BISHOP_DIRECTIONS,
            PieceKind::Rook => &ROOK_DIRECTIONS,
            _ => &[0, 1, 2, 3, 4, 5, 6, 7],
        };
        let occupied = self.all_occupancy();

        for &dir in directions {
            let mut to = from;
            for _ in 0..GEOMETRY.squares_to_edge[from.index()][dir] {
                to = to.offset(DIRECTION_OFFSETS[dir]);
                self.push_target(moves, slider, from, to);
                if occupied.contains(to) {
                    break;
                }
            }
        }
    }
}
