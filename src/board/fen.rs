use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, CastlingRights, Color, Move, Piece, PieceKind, Square};

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// Accepts one to six fields; missing trailing fields default to white to
    /// move, no castling, no en passant, halfmove 0, fullmove 1.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        board.load_fen(fen)?;
        Ok(board)
    }

    /// Parse a board position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Replace this position with the one described by `fen`.
    ///
    /// On error the board is left partially loaded and must be reloaded
    /// before use.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let placement = parts.first().ok_or(FenError::Empty)?;

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        for (rank, rank_str) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::WrongSquareCount {
                            rank,
                            squares: file + 1,
                        });
                    }
                    let sq = Square::from_rank_file(rank, file);
                    if piece.kind() == PieceKind::Pawn && (rank == 0 || rank == 7) {
                        return Err(FenError::PawnOnBackRank {
                            square: sq.to_string(),
                        });
                    }
                    self.set_piece(sq, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::WrongSquareCount {
                    rank,
                    squares: file,
                });
            }
        }

        if let Some(side) = parts.get(1) {
            self.side_to_move = match *side {
                "w" => Color::White,
                "b" => Color::Black,
                other => {
                    return Err(FenError::InvalidSideToMove {
                        found: other.to_string(),
                    })
                }
            };
        }

        if let Some(castling) = parts.get(2) {
            let mut rights = CastlingRights::none();
            for c in castling.chars() {
                match c {
                    'K' => rights.set(Color::White, true),
                    'Q' => rights.set(Color::White, false),
                    'k' => rights.set(Color::Black, true),
                    'q' => rights.set(Color::Black, false),
                    '-' => {}
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
            self.castling = rights;
        }

        if let Some(ep) = parts.get(3) {
            self.en_passant = if *ep == "-" {
                None
            } else {
                let sq: Square = ep.parse().map_err(|_| FenError::InvalidEnPassant {
                    found: (*ep).to_string(),
                })?;
                if sq.rank() != 2 && sq.rank() != 5 {
                    return Err(FenError::InvalidEnPassant {
                        found: (*ep).to_string(),
                    });
                }
                Some(sq)
            };
        }

        if let Some(halfmove) = parts.get(4) {
            self.halfmove_clock = parse_counter(halfmove)?;
        }
        if let Some(fullmove) = parts.get(5) {
            self.fullmove_number = parse_counter(fullmove)?;
        }

        Ok(())
    }

    /// Convert the board position to six-field FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in 0..8 {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::from_rank_file(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.white_to_move() { "w" } else { "b" };
        let mut castling = String::new();
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.castling.has(color, kingside) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in UCI long algebraic notation (e.g., "e2e4", "e7e8q").
    ///
    /// The returned record is the matching legal move, so its type and
    /// captured piece reflect the current position.
    ///
    /// # Example
    /// ```
    /// use bitchess::board::{Board, MoveType};
    ///
    /// let mut board = Board::new();
    /// let mv = board.parse_uci_move("e2e4").unwrap();
    /// assert_eq!(mv.move_type, MoveType::Quiet);
    /// ```
    pub fn parse_uci_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 || !uci.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match uci[4..].chars().next() {
            Some(c) => {
                let kind = PieceKind::from_char(c)
                    .filter(|k| !matches!(k, PieceKind::Pawn | PieceKind::King))
                    .ok_or(MoveParseError::InvalidPromotion { char: c })?;
                Some(kind)
            }
            None => None,
        };

        self.generate_legal_moves()
            .iter()
            .find(|m| m.from == from && m.to == to && m.promotion.map(Piece::kind) == promotion)
            .copied()
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse a UCI move and make it on the board in one call.
    ///
    /// # Example
    /// ```
    /// use bitchess::board::Board;
    ///
    /// let mut board = Board::new();
    /// board.make_move_uci("e2e4").unwrap();
    /// board.make_move_uci("e7e5").unwrap();
    /// ```
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_uci_move(uci)?;
        let _ = self.make_move(mv);
        Ok(mv)
    }
}

fn parse_counter(field: &str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::InvalidCounter {
        found: field.to_string(),
    })
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
