//! Move ordering for interior nodes.
//!
//! Priority, highest first: the transposition-table move, captures by
//! MVV-LVA, killer moves, then quiet moves by history score. Equal scores
//! keep (from, to) order so the sequence is reproducible.

use super::super::{Move, MoveList, ScoredMoveList};
use super::MAX_PLY;

const TT_MOVE_BONUS: i32 = 1_000_000;
const CAPTURE_BASE: i32 = 10_000;
const PRIMARY_KILLER: i32 = 9_000;
const SECONDARY_KILLER: i32 = 8_000;
/// History scores are clamped below the killer band
const HISTORY_MAX: i32 = 7_000;

/// MVV-LVA score: valuable victims first, cheap attackers first among equals.
#[inline]
#[must_use]
pub fn mvv_lva(mv: &Move) -> i32 {
    let victim = mv.captured.map_or(0, |p| p.kind().value());
    CAPTURE_BASE + 100 * victim - mv.piece.kind().value()
}

/// Quiet moves that caused a cutoff, two per ply.
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Option<Move> {
        self.slots.get(ply).and_then(|row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Option<Move> {
        self.slots.get(ply).and_then(|row| row[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != Some(mv) {
            row[1] = row[0];
            row[0] = Some(mv);
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[None; 2]; MAX_PLY];
    }
}

/// Cutoff counts per moving piece and destination square.
pub struct HistoryTable {
    entries: [[i32; 64]; 12],
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: [[0; 64]; 12],
        }
    }

    #[must_use]
    pub fn score(&self, mv: &Move) -> i32 {
        self.entries[mv.piece.index()][mv.to.index()]
    }

    /// Reward a quiet move that caused a beta cutoff
    pub fn update(&mut self, mv: &Move, depth: u32) {
        let bonus = (depth * depth) as i32;
        let entry = &mut self.entries[mv.piece.index()][mv.to.index()];
        *entry = entry.saturating_add(bonus).min(HISTORY_MAX);
    }

    pub fn reset(&mut self) {
        self.entries = [[0; 64]; 12];
    }
}

/// Score `moves` and sort them best first.
pub(crate) fn order_moves(
    moves: &MoveList,
    tt_move: Option<Move>,
    killers: &KillerTable,
    history: &HistoryTable,
    ply: usize,
) -> ScoredMoveList {
    let primary = killers.primary(ply);
    let secondary = killers.secondary(ply);
    let mut scored = ScoredMoveList::new();

    for &mv in moves.iter() {
        let mut score = 0;
        if tt_move.is_some_and(|tt| tt.same_squares(mv)) {
            score += TT_MOVE_BONUS;
        }
        if mv.is_capture() {
            score += mvv_lva(&mv);
        } else if primary == Some(mv) {
            score += PRIMARY_KILLER;
        } else if secondary == Some(mv) {
            score += SECONDARY_KILLER;
        } else {
            score += history.score(&mv);
        }
        scored.push(mv, score);
    }

    scored.sort();
    scored
}
