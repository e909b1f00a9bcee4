//! Move types and move list.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceKind};
use super::square::Square;

/// Kind of move. Declaration order is the generator's sort key (descending).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveType {
    Quiet,
    Capture,
    EnPassant,
    Castle,
    Promotion,
    PromotionCapture,
}

/// A fully described move.
///
/// `promotion` holds the new piece for promotions; `captured` holds the
/// victim for `Capture`, `EnPassant` and `PromotionCapture`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub move_type: MoveType,
    pub promotion: Option<Piece>,
    pub captured: Option<Piece>,
}

impl Move {
    /// Placeholder used to fill fixed-size move arrays
    pub(crate) const NULL: Move = Move {
        piece: Piece::WHITE_PAWN,
        from: Square::A8,
        to: Square::A8,
        move_type: MoveType::Quiet,
        promotion: None,
        captured: None,
    };

    #[inline]
    #[must_use]
    pub const fn quiet(piece: Piece, from: Square, to: Square) -> Self {
        Move {
            piece,
            from,
            to,
            move_type: MoveType::Quiet,
            promotion: None,
            captured: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn capture(piece: Piece, from: Square, to: Square, captured: Piece) -> Self {
        Move {
            piece,
            from,
            to,
            move_type: MoveType::Capture,
            promotion: None,
            captured: Some(captured),
        }
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(piece: Piece, from: Square, to: Square, captured: Piece) -> Self {
        Move {
            piece,
            from,
            to,
            move_type: MoveType::EnPassant,
            promotion: None,
            captured: Some(captured),
        }
    }

    #[inline]
    #[must_use]
    pub const fn castle(king: Piece, from: Square, to: Square) -> Self {
        Move {
            piece: king,
            from,
            to,
            move_type: MoveType::Castle,
            promotion: None,
            captured: None,
        }
    }

    /// Promotion, a capture when `captured` is set.
    #[inline]
    #[must_use]
    pub const fn promotion(
        pawn: Piece,
        from: Square,
        to: Square,
        promoted: Piece,
        captured: Option<Piece>,
    ) -> Self {
        let move_type = if captured.is_some() {
            MoveType::PromotionCapture
        } else {
            MoveType::Promotion
        };
        Move {
            piece: pawn,
            from,
            to,
            move_type,
            promotion: Some(promoted),
            captured,
        }
    }

    /// Captures of any kind, en passant included
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        matches!(
            self.move_type,
            MoveType::Capture | MoveType::EnPassant | MoveType::PromotionCapture
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(
            self.move_type,
            MoveType::Promotion | MoveType::PromotionCapture
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_castle(self) -> bool {
        matches!(self.move_type, MoveType::Castle)
    }

    /// Same squares and promotion kind; ignores the rest of the record.
    #[inline]
    #[must_use]
    pub fn same_squares(self, other: Move) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.promotion.map(Piece::kind) == other.promotion.map(Piece::kind)
    }

    /// Generator order: move type descending, then from, to, and promotion
    /// kind ascending (knight < bishop < rook < queen).
    #[must_use]
    pub fn generation_order(a: &Move, b: &Move) -> Ordering {
        b.move_type
            .cmp(&a.move_type)
            .then(a.from.cmp(&b.from))
            .then(a.to.cmp(&b.to))
            .then(promotion_rank(a).cmp(&promotion_rank(b)))
    }

    /// Long algebraic notation as used by UCI
    #[must_use]
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl MoveType {
    const ALL: [MoveType; 6] = [
        MoveType::Quiet,
        MoveType::Capture,
        MoveType::EnPassant,
        MoveType::Castle,
        MoveType::Promotion,
        MoveType::PromotionCapture,
    ];
}

/// Packed layout (bit 31 always set so a packed move is never zero):
/// - bits 0-5:   from
/// - bits 6-11:  to
/// - bits 12-15: piece index
/// - bits 16-18: move type
/// - bits 19-22: promotion piece index + 1, 0 = none
/// - bits 23-26: captured piece index + 1, 0 = none
const PACKED_VALID: u32 = 1 << 31;

impl Move {
    /// Pack into 32 bits for lockless table storage.
    #[must_use]
    pub(crate) fn to_bits(self) -> u32 {
        let optional = |p: Option<Piece>| p.map_or(0, |p| p.index() as u32 + 1);
        PACKED_VALID
            | self.from.index() as u32
            | (self.to.index() as u32) << 6
            | (self.piece.index() as u32) << 12
            | (self.move_type as u32) << 16
            | optional(self.promotion) << 19
            | optional(self.captured) << 23
    }

    /// Inverse of `to_bits`; `None` for the empty encoding.
    #[must_use]
    pub(crate) fn from_bits(bits: u32) -> Option<Move> {
        if bits & PACKED_VALID == 0 {
            return None;
        }
        let optional = |v: u32| (v != 0).then(|| Piece::from_index(v as usize - 1));
        Some(Move {
            from: Square::from_index((bits & 0x3F) as usize),
            to: Square::from_index(((bits >> 6) & 0x3F) as usize),
            piece: Piece::from_index(((bits >> 12) & 0xF) as usize),
            move_type: MoveType::ALL[((bits >> 16) & 0x7) as usize],
            promotion: optional((bits >> 19) & 0xF),
            captured: optional((bits >> 23) & 0xF),
        })
    }
}

fn promotion_rank(mv: &Move) -> Option<PieceKind> {
    mv.promotion.map(Piece::kind)
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {}{} {:?}", self.piece, self.from, self.to, self.move_type)?;
        if let Some(promo) = self.promotion {
            write!(f, " ={promo}")?;
        }
        if let Some(victim) = self.captured {
            write!(f, " x{victim}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.kind().to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        if idx < self.len {
            Some(self.moves[idx])
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, mv: &Move) -> bool {
        self.iter().any(|m| m == mv)
    }

    pub(crate) fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Move, &Move) -> Ordering,
    {
        self.as_mut_slice().sort_by(compare);
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Owning iterator over moves in a `MoveList`
pub struct MoveListIntoIter {
    list: MoveList,
    idx: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.list.len {
            let mv = self.list.moves[self.idx];
            self.idx += 1;
            Some(mv)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, idx: 0 }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

/// A scored move for move ordering.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves to avoid heap allocation.
#[derive(Clone, Debug)]
pub(crate) struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::NULL,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.moves[..self.len]
    }

    /// Sort by score descending; equal scores fall back to (from, to) ascending.
    pub fn sort(&mut self) {
        self.moves[..self.len].sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.mv.from.cmp(&b.mv.from))
                .then(a.mv.to.cmp(&b.mv.to))
                .then(promotion_rank(&a.mv).cmp(&promotion_rank(&b.mv)))
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.as_slice().iter().map(|s| s.mv)
    }
}
