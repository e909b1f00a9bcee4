//! Square type and utilities.
//!
//! Squares are numbered 0..63 with 0 = a8 and 63 = h1. Rank index 0 is the
//! eighth rank, file index 0 is the a-file.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// A square on the chess board, stored as its index (a8 = 0, h1 = 63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    pub const A8: Square = Square(0);
    pub const B8: Square = Square(1);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
    pub const A1: Square = Square(56);
    pub const B1: Square = Square(57);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);

    /// Create a square from an index. Indices >= 64 are a programmer error.
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        debug_assert!(idx < 64);
        Square(idx as u8)
    }

    /// Checked construction from an index.
    pub fn try_from_index(idx: usize) -> Result<Self, SquareError> {
        if idx < 64 {
            Ok(Square(idx as u8))
        } else {
            Err(SquareError::IndexOutOfRange { index: idx })
        }
    }

    /// Create a square from rank index (0 = rank 8) and file index (0 = a-file).
    #[inline]
    #[must_use]
    pub const fn from_rank_file(rank: usize, file: usize) -> Self {
        debug_assert!(rank < 8 && file < 8);
        Square((rank * 8 + file) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Rank index, 0 for the eighth rank through 7 for the first.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 / 8) as usize
    }

    /// File index, 0 for the a-file.
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 % 8) as usize
    }

    /// Flip rank, keep file (a8 <-> a1).
    #[inline]
    #[must_use]
    pub const fn mirror(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Square `delta` steps away in index space. Caller guarantees it stays on the board.
    #[inline]
    #[must_use]
    pub const fn offset(self, delta: i32) -> Self {
        let idx = self.0 as i32 + delta;
        debug_assert!(idx >= 0 && idx < 64);
        Square(idx as u8)
    }

    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// Manhattan distance between two squares.
    #[must_use]
    pub fn manhattan_distance(self, other: Square) -> i32 {
        let dr = self.rank() as i32 - other.rank() as i32;
        let df = self.file() as i32 - other.file() as i32;
        dr.abs() + df.abs()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (self.file() as u8 + b'a') as char,
            (b'8' - self.rank() as u8) as char
        )
    }
}

impl TryFrom<usize> for Square {
    type Error = SquareError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        Square::try_from_index(idx)
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }
        let file = match bytes[0] {
            b @ b'a'..=b'h' => (b - b'a') as usize,
            _ => {
                return Err(SquareError::InvalidNotation {
                    notation: s.to_string(),
                })
            }
        };
        let rank = match bytes[1] {
            b @ b'1'..=b'8' => (b'8' - b) as usize,
            _ => {
                return Err(SquareError::InvalidNotation {
                    notation: s.to_string(),
                })
            }
        };
        Ok(Square::from_rank_file(rank, file))
    }
}
