//! JSON opening book.
//!
//! The book file maps a position's Zobrist hash, written as a hex string, to
//! the UCI moves playable from that position:
//!
//! ```json
//! { "463b96181691fc9c": ["e2e4", "d2d4"] }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Move};

/// Error type for opening book loading failures
#[derive(Debug)]
pub enum BookError {
    /// The book file could not be read
    Io(io::Error),
    /// The book file is not a JSON object of string arrays
    Json(serde_json::Error),
    /// A key is not a hexadecimal 64-bit hash
    InvalidKey { key: String },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::Io(e) => write!(f, "Cannot read opening book: {e}"),
            BookError::Json(e) => write!(f, "Malformed opening book: {e}"),
            BookError::InvalidKey { key } => write!(f, "Invalid book hash key '{key}'"),
        }
    }
}

impl std::error::Error for BookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookError::Io(e) => Some(e),
            BookError::Json(e) => Some(e),
            BookError::InvalidKey { .. } => None,
        }
    }
}

impl From<io::Error> for BookError {
    fn from(e: io::Error) -> Self {
        BookError::Io(e)
    }
}

impl From<serde_json::Error> for BookError {
    fn from(e: serde_json::Error) -> Self {
        BookError::Json(e)
    }
}

/// Lookup hook consulted before searching.
pub trait BookLookup {
    /// Candidate moves in UCI notation for the position with `hash`.
    fn candidates(&self, hash: u64) -> &[String];

    /// Book moves that are legal in `board`, in book order.
    fn legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut scratch = board.clone();
        self.candidates(board.hash())
            .iter()
            .filter_map(|uci| match scratch.parse_uci_move(uci) {
                Ok(mv) => Some(mv),
                Err(e) => {
                    log::debug!("ignoring book move {uci}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Pick one legal book move at random.
    fn choose_move_with<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Option<Move>
    where
        Self: Sized,
    {
        self.legal_moves(board).choose(rng).copied()
    }

    /// Pick one legal book move using the thread-local generator.
    fn choose_move(&self, board: &Board) -> Option<Move>
    where
        Self: Sized,
    {
        self.choose_move_with(board, &mut rand::thread_rng())
    }
}

/// Opening book indexed by position hash
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: HashMap<u64, Vec<String>>,
}

impl OpeningBook {
    /// Load a book from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BookError> {
        let data = fs::read_to_string(path.as_ref())?;
        let book = Self::from_json(&data)?;
        log::info!(
            "loaded {} book positions from {}",
            book.len(),
            path.as_ref().display()
        );
        Ok(book)
    }

    /// Parse a book from JSON text.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, moves) in raw {
            let hash = parse_hash_key(&key).ok_or(BookError::InvalidKey { key })?;
            entries.entry(hash).or_insert_with(Vec::new).extend(moves);
        }
        Ok(OpeningBook { entries })
    }

    /// Add a move for the position with `hash`.
    pub fn insert(&mut self, hash: u64, uci: impl Into<String>) {
        self.entries.entry(hash).or_default().push(uci.into());
    }

    /// Number of positions in the book
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BookLookup for OpeningBook {
    fn candidates(&self, hash: u64) -> &[String] {
        self.entries.get(&hash).map_or(&[][..], Vec::as_slice)
    }
}

/// Hex hash key, with or without a `0x` prefix.
fn parse_hash_key(key: &str) -> Option<u64> {
    let digits = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
