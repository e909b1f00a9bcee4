//! Parallel root search.
//!
//! Root moves are handed out to worker threads through a shared counter.
//! Every worker owns a board clone plus its own killer and history tables,
//! and all workers share the transposition table. Each root move is searched
//! with a full window, so its value does not depend on which worker took it
//! or on what the other workers left in the table.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crate::sync::{StopFlag, StopReason};
use crate::tt::TranspositionTable;

use super::super::{Board, Color, Move};
use super::alpha_beta::SearchContext;
use super::INFINITY;

/// Search thread stack size (32 MB to handle deep recursion)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Limits shared by every worker of a search.
///
/// The node counter accumulates across calls, so one `RootLimits` can span
/// all iterations of an iterative-deepening search.
pub struct RootLimits<'a> {
    pub(crate) stop: &'a StopFlag,
    pub(crate) deadline: Option<Instant>,
    pub(crate) node_limit: Option<u64>,
    pub(crate) nodes: AtomicU64,
}

impl<'a> RootLimits<'a> {
    /// Limits that only honour the stop flag.
    #[must_use]
    pub fn unlimited(stop: &'a StopFlag) -> Self {
        Self::new(stop, None, None)
    }

    #[must_use]
    pub fn new(stop: &'a StopFlag, deadline: Option<Instant>, node_limit: Option<u64>) -> Self {
        RootLimits {
            stop,
            deadline,
            node_limit,
            nodes: AtomicU64::new(0),
        }
    }

    /// Nodes counted so far
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }
}

/// Value of one root move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootResult {
    pub mv: Move,
    /// White-relative score
    pub score: i32,
    /// Position of the move in the root move list
    pub index: usize,
}

impl RootResult {
    /// Better score for the side to move wins. Among equal scores the
    /// stronger promotion piece wins, then the earlier root move.
    fn beats(&self, other: &RootResult, white_to_move: bool) -> bool {
        let by_score = if white_to_move {
            self.score.cmp(&other.score)
        } else {
            other.score.cmp(&self.score)
        };
        by_score
            .then(promotion_value(self.mv).cmp(&promotion_value(other.mv)))
            .then(other.index.cmp(&self.index))
            == CmpOrdering::Greater
    }
}

fn promotion_value(mv: Move) -> i32 {
    mv.promotion.map_or(0, |p| p.kind().value())
}

/// Outcome of [`search_root`]
#[derive(Debug, Clone, Copy)]
pub struct RootOutcome {
    /// Best root move, `None` when the search did not complete
    pub best: Option<RootResult>,
    /// Total nodes counted against the limits
    pub nodes: u64,
    /// Every root move was searched without interruption
    pub completed: bool,
}

struct WorkerOutcome {
    best: Option<RootResult>,
    searched: usize,
    aborted: bool,
}

/// Search every move of `moves` to `depth` plies over `threads` workers.
///
/// `moves` must be legal in `board`. An interrupted search reports no best
/// move; partial root values are never mixed with complete ones.
pub fn search_root(
    board: &Board,
    moves: &[Move],
    depth: u32,
    tt: &TranspositionTable,
    threads: usize,
    limits: &RootLimits<'_>,
) -> RootOutcome {
    let next = AtomicUsize::new(0);
    let workers = threads.clamp(1, moves.len().max(1));
    let white_to_move = board.side_to_move() == Color::White;
    let child_depth = depth.saturating_sub(1);

    let outcomes: Vec<WorkerOutcome> = thread::scope(|scope| {
        let next = &next;
        let mut handles = Vec::with_capacity(workers);
        for worker_id in 1..workers {
            let spawned = thread::Builder::new()
                .name(format!("search-{worker_id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn_scoped(scope, move || {
                    run_worker(board, moves, child_depth, tt, limits, next)
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    log::warn!("could not spawn search worker {worker_id}: {err}");
                    break;
                }
            }
        }

        // The calling thread takes part as worker 0
        let mut outcomes = vec![run_worker(board, moves, child_depth, tt, limits, next)];
        for handle in handles {
            match handle.join() {
                Ok(outcome) => outcomes.push(outcome),
                Err(_) => log::error!("search worker panicked"),
            }
        }
        outcomes
    });

    let searched: usize = outcomes.iter().map(|o| o.searched).sum();
    let completed = searched == moves.len() && outcomes.iter().all(|o| !o.aborted);
    let best = if completed {
        outcomes
            .iter()
            .filter_map(|o| o.best)
            .reduce(|a, b| if b.beats(&a, white_to_move) { b } else { a })
    } else {
        None
    };

    RootOutcome {
        best,
        nodes: limits.nodes(),
        completed,
    }
}

fn run_worker(
    board: &Board,
    moves: &[Move],
    child_depth: u32,
    tt: &TranspositionTable,
    limits: &RootLimits<'_>,
    next: &AtomicUsize,
) -> WorkerOutcome {
    let mut board = board.clone();
    let white_to_move = board.side_to_move() == Color::White;
    let mut ctx = SearchContext::new(tt, limits);
    let mut best: Option<RootResult> = None;
    let mut searched = 0;
    let mut stopped = false;

    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(&mv) = moves.get(index) else {
            break;
        };
        if limits.stop.is_stopped() {
            stopped = true;
            break;
        }

        let undo = board.make_move(mv);
        let score = ctx.alpha_beta(&mut board, child_depth, 1, !white_to_move, -INFINITY, INFINITY);
        board.undo_move(undo);
        if ctx.aborted() {
            break;
        }

        searched += 1;
        let candidate = RootResult { mv, score, index };
        if best.map_or(true, |current| candidate.beats(&current, white_to_move)) {
            best = Some(candidate);
        }
    }

    ctx.flush_nodes();
    WorkerOutcome {
        best,
        searched,
        aborted: stopped || ctx.aborted(),
    }
}
