//! Tapered piece-square evaluation.

use super::pst::{MATERIAL_EG, MATERIAL_MG, PHASE_WEIGHTS, PST_EG, PST_MG, TOTAL_PHASE};
use super::{Board, Color, Piece, Square};

/// Phase at or below which the king-distance term applies
const ENDGAME_PHASE: i32 = 6;
const KING_DISTANCE_WEIGHT: i32 = 10;

impl Board {
    /// Remaining material phase, `TOTAL_PHASE` at the start, 0 with only
    /// pawns and kings. Clamped so extra promoted pieces cannot exceed it.
    #[must_use]
    pub fn game_phase(&self) -> i32 {
        let phase: i32 = (0..12)
            .map(|idx| {
                let piece = Piece::from_index(idx);
                PHASE_WEIGHTS[piece.kind().index()] * self.bitboard(piece).popcount() as i32
            })
            .sum();
        phase.min(TOTAL_PHASE)
    }

    /// Static score in centipawns from White's point of view.
    ///
    /// # Example
    /// ```
    /// use bitchess::board::Board;
    ///
    /// assert_eq!(Board::new().evaluate(), 0);
    /// ```
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        let mut mg = [0i32; 2];
        let mut eg = [0i32; 2];

        for idx in 0..12 {
            let piece = Piece::from_index(idx);
            let side = piece.color().index();
            let kind = piece.kind().index();
            for sq in self.bitboard(piece).iter() {
                let pst_sq = pst_square(sq, piece.color());
                mg[side] += MATERIAL_MG[kind] + PST_MG[kind][pst_sq];
                eg[side] += MATERIAL_EG[kind] + PST_EG[kind][pst_sq];
            }
        }

        let phase = self.game_phase();
        let mg_diff = mg[0] - mg[1];
        let eg_diff = eg[0] - eg[1];
        let mut score = (mg_diff * phase + eg_diff * (TOTAL_PHASE - phase)) / TOTAL_PHASE;

        if phase <= ENDGAME_PHASE && eg_diff != 0 {
            if let (Some(white_king), Some(black_king)) =
                (self.king_square(Color::White), self.king_square(Color::Black))
            {
                let closeness = 14 - white_king.manhattan_distance(black_king);
                score += closeness * KING_DISTANCE_WEIGHT * eg_diff.signum();
            }
        }

        score
    }
}

#[inline]
fn pst_square(sq: Square, color: Color) -> usize {
    match color {
        Color::White => sq.index(),
        Color::Black => sq.mirror().index(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_balanced() {
        assert_eq!(Board::new().evaluate(), 0);
        assert_eq!(Board::new().game_phase(), TOTAL_PHASE);
    }

    #[test]
    fn mirrored_positions_negate() {
        let white = Board::from_fen("4k3/8/8/8/8/2N5/PP6/4K3 w - - 0 1");
        let black = Board::from_fen("4k3/pp6/2n5/8/8/8/8/4K3 b - - 0 1");
        assert!(white.evaluate() > 0);
        assert_eq!(white.evaluate(), -black.evaluate());
    }

    #[test]
    fn missing_black_queen() {
        let board = Board::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
        assert_eq!(board.evaluate(), 895);
    }

    #[test]
    fn lone_kings_are_level() {
        assert_eq!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").evaluate(), 0);
    }

    #[test]
    fn rook_endgame_favors_stronger_side() {
        let board = Board::from_fen("8/8/8/3k4/8/3K4/8/7R w - - 0 1");
        assert!(board.game_phase() <= ENDGAME_PHASE);
        assert!(board.evaluate() > 400);
    }

    #[test]
    fn phase_is_clamped() {
        let board = Board::from_fen("QQQQkQQQ/8/8/8/8/8/8/QQQQKQQQ w - - 0 1");
        assert_eq!(board.game_phase(), TOTAL_PHASE);
    }
}
