use super::super::geometry::GEOMETRY;
use super::super::{Bitboard, Board, Move, MoveList, Piece, PieceKind, Square, PROMOTION_KINDS};

impl Board {
    /// Pushes, double pushes, captures, promotions and en passant for one pawn.
    pub(crate) fn generate_pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move;
        let pawn = Piece::new(color, PieceKind::Pawn);
        let push = color.pawn_push();
        let promotion_rank = color.promotion_rank();

        // A pawn never stands on its promotion rank, so one step forward is on the board.
        let forward = from.offset(push);
        if self.is_empty_square(forward) {
            if forward.rank() == promotion_rank {
                push_promotions(moves, pawn, from, forward, None);
            } else {
                moves.push(Move::quiet(pawn, from, forward));
                if from.rank() == color.pawn_start_rank() {
                    let double = forward.offset(push);
                    if self.is_empty_square(double) {
                        moves.push(Move::quiet(pawn, from, double));
                    }
                }
            }
        }

        let targets = Bitboard(GEOMETRY.pawn_attacks[color.index()][from.index()]);
        for to in targets.iter() {
            match self.piece_at(to) {
                Some(victim) if victim.color() != color && victim.kind() != PieceKind::King => {
                    if to.rank() == promotion_rank {
                        push_promotions(moves, pawn, from, to, Some(victim));
                    } else {
                        moves.push(Move::capture(pawn, from, to, victim));
                    }
                }
                Some(_) => {}
                None => {
                    if Some(to) == self.en_passant && from.rank() == color.en_passant_rank() {
                        let victim = Piece::new(color.opponent(), PieceKind::Pawn);
                        if self.bitboard(victim).contains(to.offset(-push)) {
                            moves.push(Move::en_passant(pawn, from, to, victim));
                        }
                    }
                }
            }
        }
    }
}

fn push_promotions(
    moves: &mut MoveList,
    pawn: Piece,
    from: Square,
    to: Square,
    captured: Option<Piece>,
) {
    for kind in PROMOTION_KINDS {
        let promoted = Piece::new(pawn.color(), kind);
        moves.push(Move::promotion(pawn, from, to, promoted, captured));
    }
}
