//! Transposition table for caching search results.
//!
//! Entries are keyed on the exact pair (position hash, remaining depth), so a
//! probe never returns a score computed at a different depth. Each entry also
//! records whether the score is exact or a bound from a cutoff.
//!
//! This implementation uses lockless hashing for thread-safe access by the
//! root workers. Entries are stored as atomic u64 pairs using XOR
//! verification to detect torn reads.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

impl BoundType {
    fn to_u8(self) -> u8 {
        match self {
            BoundType::Exact => 0,
            BoundType::LowerBound => 1,
            BoundType::UpperBound => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v & 0x3 {
            0 => BoundType::Exact,
            1 => BoundType::LowerBound,
            _ => BoundType::UpperBound,
        }
    }
}

/// Unpacked TT entry for reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i16,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
}

impl TTEntry {
    pub fn score(&self) -> i32 {
        self.score as i32
    }

    /// Whether the stored score settles a node searched with `(alpha, beta)`.
    #[must_use]
    pub fn cutoff(&self, alpha: i32, beta: i32) -> Option<i32> {
        let score = self.score();
        match self.bound_type {
            BoundType::Exact => Some(score),
            BoundType::LowerBound if score >= beta => Some(score),
            BoundType::UpperBound if score <= alpha => Some(score),
            _ => None,
        }
    }
}

/// Packed entry format (fits in 64 bits):
/// - bits 0-31:  move (`Move::to_bits`, 0 = no move)
/// - bits 32-47: score (i16 as u16)
/// - bits 48-55: depth (u8)
/// - bits 56-57: bound
/// - bit 63:     occupied
const OCCUPIED: u64 = 1 << 63;

fn pack_entry(depth: u8, score: i16, bound_type: BoundType, best_move: Option<Move>) -> u64 {
    let mv = best_move.map_or(0, Move::to_bits);
    let sc: u16 = score as u16;

    OCCUPIED
        | (mv as u64)
        | ((sc as u64) << 32)
        | ((depth as u64) << 48)
        | ((bound_type.to_u8() as u64) << 56)
}

fn unpack_entry(data: u64) -> TTEntry {
    TTEntry {
        best_move: Move::from_bits((data & 0xFFFF_FFFF) as u32),
        score: ((data >> 32) & 0xFFFF) as u16 as i16,
        depth: ((data >> 48) & 0xFF) as u8,
        bound_type: BoundType::from_u8(((data >> 56) & 0x3) as u8),
    }
}

/// Mix the depth into the probe key so each depth of a position gets its
/// own slot.
#[inline]
fn entry_key(hash: u64, depth: u32) -> u64 {
    hash ^ u64::from(depth).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// A single TT slot using lockless hashing.
///
/// Uses the XOR technique: stores (key ^ data) and data separately.
/// On read, we verify by checking if (stored_key ^ data) equals the probe key.
/// This detects torn reads from concurrent writes.
#[repr(C)]
struct TTSlot {
    /// Stores: hash_key ^ packed_data
    key_xor: AtomicU64,
    /// Stores: packed_data
    data: AtomicU64,
}

impl TTSlot {
    fn new() -> Self {
        TTSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, key: u64, packed: u64) {
        // Data first, then key_xor
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(key ^ packed, Ordering::Relaxed);
    }

    fn load(&self, key: u64) -> Option<u64> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);

        if data != 0 && key_xor ^ data == key {
            Some(data)
        } else {
            None
        }
    }

    fn is_empty(&self) -> bool {
        self.data.load(Ordering::Relaxed) == 0
    }

    fn depth(&self) -> u8 {
        let data = self.data.load(Ordering::Relaxed);
        ((data >> 48) & 0xFF) as u8
    }

    fn clear(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

/// Number of slots per bucket for collision resolution
const BUCKET_SIZE: usize = 4;

/// A bucket containing multiple slots
#[repr(C)]
struct TTBucket {
    slots: [TTSlot; BUCKET_SIZE],
}

impl TTBucket {
    fn new() -> Self {
        TTBucket {
            slots: [TTSlot::new(), TTSlot::new(), TTSlot::new(), TTSlot::new()],
        }
    }
}

/// Thread-safe transposition table using lockless hashing.
///
/// Besides the depth-keyed entries it keeps, per position hash, the best move
/// from the deepest search stored so far, for move ordering.
pub struct TranspositionTable {
    buckets: Vec<TTBucket>,
    mask: usize,
    best_moves: Vec<TTSlot>,
    best_move_mask: usize,
}

/// Default size in megabytes
pub const DEFAULT_TT_MB: usize = 64;

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        // Seven eighths to the entries, the rest to the best-move slots.
        let num_buckets = power_of_two_below(bytes / 8 * 7 / mem::size_of::<TTBucket>());
        let num_best = power_of_two_below(bytes / 8 / mem::size_of::<TTSlot>());

        TranspositionTable {
            buckets: (0..num_buckets).map(|_| TTBucket::new()).collect(),
            mask: num_buckets - 1,
            best_moves: (0..num_best).map(|_| TTSlot::new()).collect(),
            best_move_mask: num_best - 1,
        }
    }

    fn bucket(&self, key: u64) -> &TTBucket {
        &self.buckets[(key as usize) & self.mask]
    }

    /// Probe for the entry stored under exactly `(hash, depth)`.
    pub fn probe(&self, hash: u64, depth: u32) -> Option<TTEntry> {
        let key = entry_key(hash, depth);
        self.bucket(key)
            .slots
            .iter()
            .find_map(|slot| slot.load(key))
            .map(unpack_entry)
            .filter(|entry| u32::from(entry.depth) == depth.min(255))
    }

    /// Store an entry under `(hash, depth)`.
    ///
    /// Replacement prefers, in order: a slot already holding this key, an
    /// empty slot, the slot with the shallowest depth.
    pub fn store(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
    ) {
        let key = entry_key(hash, depth);
        let depth_u8 = depth.min(255) as u8;
        let score_i16 = score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        let packed = pack_entry(depth_u8, score_i16, bound_type, best_move);
        let bucket = self.bucket(key);

        let target = bucket
            .slots
            .iter()
            .find(|slot| slot.load(key).is_some())
            .or_else(|| bucket.slots.iter().find(|slot| slot.is_empty()))
            .unwrap_or_else(|| {
                bucket
                    .slots
                    .iter()
                    .min_by_key(|slot| slot.depth())
                    .unwrap_or(&bucket.slots[0])
            });
        target.store(key, packed);

        if let Some(mv) = best_move {
            self.record_best_move(hash, depth_u8, mv);
        }
    }

    /// Exact score stored for `(hash, depth)`, if any.
    #[must_use]
    pub fn get(&self, hash: u64, depth: u32) -> Option<i32> {
        self.probe(hash, depth)
            .filter(|entry| entry.bound_type == BoundType::Exact)
            .map(|entry| entry.score())
    }

    /// Insert or overwrite the exact score for `(hash, depth)`.
    pub fn set(&self, hash: u64, depth: u32, score: i32) {
        self.store(hash, depth, score, BoundType::Exact, None);
    }

    fn record_best_move(&self, hash: u64, depth: u8, mv: Move) {
        let slot = &self.best_moves[(hash as usize) & self.best_move_mask];
        let packed = OCCUPIED | ((depth as u64) << 48) | mv.to_bits() as u64;
        if let Some(existing) = slot.load(hash) {
            if ((existing >> 48) & 0xFF) as u8 > depth {
                return;
            }
        }
        slot.store(hash, packed);
    }

    /// Best move from the deepest search stored for this position.
    #[must_use]
    pub fn best_move_deepest(&self, hash: u64) -> Option<Move> {
        let slot = &self.best_moves[(hash as usize) & self.best_move_mask];
        slot.load(hash)
            .and_then(|data| Move::from_bits((data & 0xFFFF_FFFF) as u32))
    }

    /// Number of occupied entry slots.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.slots.iter())
            .filter(|slot| !slot.is_empty())
            .count()
    }

    /// Total entry slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Returns hash table fullness in per mille (0-1000).
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        // Sample first 1000 buckets for efficiency
        let sample_size = self.buckets.len().min(1000);
        let occupied = self
            .buckets
            .iter()
            .take(sample_size)
            .flat_map(|bucket| bucket.slots.iter())
            .filter(|slot| !slot.is_empty())
            .count();

        let total_slots = sample_size * BUCKET_SIZE;
        ((occupied as u64 * 1000) / total_slots as u64) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                slot.clear();
            }
        }
        for slot in &self.best_moves {
            slot.clear();
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}

fn power_of_two_below(n: usize) -> usize {
    if n < 2 {
        1
    } else {
        (n + 1).next_power_of_two() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, Square};

    fn sample_move() -> Move {
        Move::quiet(Piece::WHITE_KNIGHT, Square::G1, "f3".parse().unwrap())
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let cases = [
            (10u8, 500i16, BoundType::Exact, Some(sample_move())),
            (255u8, -32000i16, BoundType::LowerBound, None),
            (0u8, 0i16, BoundType::UpperBound, None),
        ];

        for (depth, score, bound, mv) in cases {
            let unpacked = unpack_entry(pack_entry(depth, score, bound, mv));
            assert_eq!(unpacked.depth, depth);
            assert_eq!(unpacked.score, score);
            assert_eq!(unpacked.bound_type, bound);
            assert_eq!(unpacked.best_move, mv);
        }
    }

    #[test]
    fn test_get_set_exact_depth() {
        let tt = TranspositionTable::new(1);
        let hash = 0x1234_5678_9ABC_DEF0;

        tt.set(hash, 3, 42);
        assert_eq!(tt.get(hash, 3), Some(42));
        assert_eq!(tt.get(hash, 2), None);
        assert_eq!(tt.get(hash, 4), None);

        tt.set(hash, 3, -7);
        assert_eq!(tt.get(hash, 3), Some(-7));
    }

    #[test]
    fn test_zero_score_at_depth_zero_is_stored() {
        let tt = TranspositionTable::new(1);
        tt.set(0, 0, 0);
        assert_eq!(tt.get(0, 0), Some(0));
        assert_eq!(tt.size(), 1);
    }

    #[test]
    fn test_bounds_are_not_exact_hits() {
        let tt = TranspositionTable::new(1);
        let hash = 0xFEDC_BA98_7654_3210;
        tt.store(hash, 5, 120, BoundType::LowerBound, None);

        assert_eq!(tt.get(hash, 5), None);
        let entry = tt.probe(hash, 5).unwrap();
        assert_eq!(entry.cutoff(0, 100), Some(120));
        assert_eq!(entry.cutoff(0, 200), None);
    }

    #[test]
    fn test_no_false_positives() {
        let tt = TranspositionTable::new(1);
        tt.set(0x1234_5678_9ABC_DEF0, 10, 500);
        assert!(tt.probe(0xFEDC_BA98_7654_3210, 10).is_none());
    }

    #[test]
    fn test_best_move_keeps_deepest() {
        let tt = TranspositionTable::new(1);
        let hash = 99;
        let deep = sample_move();
        let shallow = Move::quiet(Piece::WHITE_KNIGHT, Square::B1, "c3".parse().unwrap());

        tt.store(hash, 6, 10, BoundType::Exact, Some(deep));
        tt.store(hash, 2, 10, BoundType::Exact, Some(shallow));
        assert_eq!(tt.best_move_deepest(hash), Some(deep));
        assert_eq!(tt.best_move_deepest(hash + 1), None);
    }

    #[test]
    fn test_clear_and_size() {
        let tt = TranspositionTable::new(1);
        for depth in 0..5 {
            tt.set(1000 + u64::from(depth), depth, 1);
        }
        assert_eq!(tt.size(), 5);
        tt.clear();
        assert_eq!(tt.size(), 0);
        assert_eq!(tt.get(1000, 0), None);
    }
}
