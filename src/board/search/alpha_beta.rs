use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::sync::StopReason;
use crate::tt::{BoundType, TranspositionTable};

use super::super::{Board, Color};
use super::move_order::{order_moves, HistoryTable, KillerTable};
use super::smp::RootLimits;
use super::{INFINITY, MAX_SCORE};

/// Nodes between flushes of the local counter and limit checks
const CHECK_INTERVAL: u64 = 1024;

/// Score of a position with no legal move, searched with `depth` plies left.
///
/// Checkmate scores `MAX_SCORE + depth` against the mated side, so a mate
/// found higher in the tree outranks a slower one. Stalemate is 0.
pub fn terminal_score(board: &Board, depth: u32) -> i32 {
    let side = board.side_to_move();
    if !board.is_in_check(side) {
        return 0;
    }
    let mate = MAX_SCORE + depth as i32;
    match side {
        Color::White => -mate,
        Color::Black => mate,
    }
}

/// Per-worker search state. Only the transposition table and the limits
/// are shared with other workers.
pub(crate) struct SearchContext<'a> {
    tt: &'a TranspositionTable,
    limits: &'a RootLimits<'a>,
    killers: KillerTable,
    history: HistoryTable,
    local_nodes: u64,
    aborted: bool,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(tt: &'a TranspositionTable, limits: &'a RootLimits<'a>) -> Self {
        SearchContext {
            tt,
            limits,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            local_nodes: 0,
            aborted: false,
        }
    }

    /// Whether the current search was cut short; its scores are meaningless.
    #[inline]
    pub(crate) fn aborted(&self) -> bool {
        self.aborted
    }

    /// Push locally counted nodes to the shared counter.
    pub(crate) fn flush_nodes(&mut self) {
        if self.local_nodes > 0 {
            self.limits.nodes.fetch_add(self.local_nodes, Ordering::Relaxed);
            self.local_nodes = 0;
        }
    }

    fn count_node(&mut self) {
        self.local_nodes += 1;
        if self.local_nodes >= CHECK_INTERVAL {
            self.flush_nodes();
            let total = self.limits.nodes.load(Ordering::Relaxed);
            if self.limits.node_limit.is_some_and(|limit| total >= limit) {
                self.limits.stop.stop(StopReason::NodeLimit);
            } else if self.limits.deadline.is_some_and(|d| Instant::now() >= d) {
                self.limits.stop.stop(StopReason::Deadline);
            }
        }
    }

    #[inline]
    fn should_stop(&mut self) -> bool {
        if !self.aborted && self.limits.stop.is_stopped() {
            self.aborted = true;
        }
        self.aborted
    }

    /// Minimax alpha-beta returning a White-relative score.
    ///
    /// `maximizing` is true when White is to move. Aborted searches return
    /// early without touching the table.
    pub(crate) fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u32,
        ply: usize,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.count_node();
        if depth == 0 {
            return board.evaluate();
        }
        if self.should_stop() {
            return 0;
        }

        let hash = board.hash();
        let entry = self.tt.probe(hash, depth);
        if let Some(score) = entry.and_then(|e| e.cutoff(alpha, beta)) {
            return score;
        }

        let moves = board.generate_legal_moves();
        if moves.is_empty() {
            return terminal_score(board, depth);
        }

        let tt_move = entry
            .and_then(|e| e.best_move)
            .or_else(|| self.tt.best_move_deepest(hash));
        let ordered = order_moves(&moves, tt_move, &self.killers, &self.history, ply);

        let (alpha_orig, beta_orig) = (alpha, beta);
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for mv in ordered.iter() {
            let undo = board.make_move(mv);
            let score = self.alpha_beta(board, depth - 1, ply + 1, !maximizing, alpha, beta);
            board.undo_move(undo);
            if self.should_stop() {
                return 0;
            }

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                if !mv.is_capture() {
                    self.killers.update(ply, mv);
                    self.history.update(&mv, depth);
                }
                break;
            }
        }

        let bound = if best <= alpha_orig {
            BoundType::UpperBound
        } else if best >= beta_orig {
            BoundType::LowerBound
        } else {
            BoundType::Exact
        };
        self.tt.store(hash, depth, best, bound, best_move);
        best
    }
}
