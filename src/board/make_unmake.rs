use super::{Board, Color, Move, MoveType, Piece, PieceKind, Square, Undo};

/// Castling right lost when a rook leaves or is captured on this corner.
#[inline]
fn corner_right(sq: Square) -> Option<(Color, bool)> {
    match sq {
        Square::H1 => Some((Color::White, true)),
        Square::A1 => Some((Color::White, false)),
        Square::H8 => Some((Color::Black, true)),
        Square::A8 => Some((Color::Black, false)),
        _ => None,
    }
}

impl Board {
    /// Apply `m` in place and return the snapshot that reverses it.
    ///
    /// `m` must come from `generate_legal_moves` (or `parse_uci_move`) for
    /// this exact position.
    pub fn make_move(&mut self, m: Move) -> Undo {
        let undo = self.snapshot();
        let color = self.side_to_move;

        if color == Color::Black {
            self.fullmove_number += 1;
        }

        if m.is_capture() || m.piece.kind() == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        match m.move_type {
            MoveType::Capture | MoveType::PromotionCapture => {
                if let Some(victim) = m.captured {
                    self.remove_piece(m.to, victim);
                }
            }
            MoveType::EnPassant => {
                let victim_sq = m.to.offset(-color.pawn_push());
                self.remove_piece(victim_sq, Piece::new(color.opponent(), PieceKind::Pawn));
            }
            _ => {}
        }

        self.remove_piece(m.from, m.piece);
        self.set_piece(m.to, m.promotion.unwrap_or(m.piece));

        if m.move_type == MoveType::Castle {
            let rook = Piece::new(color, PieceKind::Rook);
            let (rook_from, rook_to) = if m.to.file() == 6 {
                (m.to.offset(1), m.to.offset(-1))
            } else {
                (m.to.offset(-2), m.to.offset(1))
            };
            self.remove_piece(rook_from, rook);
            self.set_piece(rook_to, rook);
            self.castling.remove_color(color);
        }

        self.en_passant = None;
        if m.piece.kind() == PieceKind::Pawn
            && m.from.rank() == color.pawn_start_rank()
            && m.to.index() as i32 == m.from.index() as i32 + 2 * color.pawn_push()
        {
            self.en_passant = Some(m.from.offset(color.pawn_push()));
        }

        if m.piece.kind() == PieceKind::King {
            self.castling.remove_color(color);
        }
        if m.piece.kind() == PieceKind::Rook {
            if let Some((owner, kingside)) = corner_right(m.from) {
                if owner == color {
                    self.castling.remove(owner, kingside);
                }
            }
        }
        if m.captured.map(Piece::kind) == Some(PieceKind::Rook) {
            if let Some((owner, kingside)) = corner_right(m.to) {
                if owner != color {
                    self.castling.remove(owner, kingside);
                }
            }
        }

        self.side_to_move = color.opponent();
        undo
    }
}
