//! Search module implementing parallel alpha-beta with iterative deepening.
//!
//! Features:
//! - Root moves shared out over worker threads, each with its own board clone
//! - Minimax alpha-beta with an explicit maximizing flag (scores are White-relative)
//! - Shared lockless transposition table keyed on (hash, depth)
//! - Move ordering (TT move, MVV-LVA, killers, history)
//! - Iterative deepening with time, node and stop-flag limits

mod alpha_beta;
mod iterative;
pub mod move_order;
mod smp;

use std::sync::Arc;
use std::time::Duration;

use crate::sync::StopFlag;
use crate::tt::TranspositionTable;

use super::{Board, Move};

pub use alpha_beta::terminal_score;
pub use iterative::iterative_deepening;
pub use move_order::{HistoryTable, KillerTable};
pub use smp::{search_root, RootLimits, RootOutcome, RootResult};

/// Base mate score; a mate found with `d` plies of depth left scores `MAX_SCORE + d`.
pub const MAX_SCORE: i32 = 30_000;

/// Window bound that no real score reaches
pub const INFINITY: i32 = 1_000_000;

/// Deepest iteration and killer-table size
pub const MAX_PLY: usize = 64;

/// Scores at or beyond this magnitude are forced mates
pub const MATE_THRESHOLD: i32 = MAX_SCORE;

/// Result of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best root move, `None` when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Score from White's point of view
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Plies to mate for mate scores, positive when White mates.
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        if self.score.abs() < MATE_THRESHOLD {
            return None;
        }
        let plies = self.depth as i32 - (self.score.abs() - MAX_SCORE);
        Some(plies.max(0) * self.score.signum())
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    /// White-relative score
    pub score: i32,
    pub best_move: Option<Move>,
    pub hashfull: u32,
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Limits and reporting for an iterative-deepening search
#[derive(Clone)]
pub struct SearchConfig {
    /// Maximum depth to search (None = `MAX_PLY`)
    pub max_depth: Option<u32>,
    /// No new iteration starts after this much time (None = unlimited)
    pub optimal_time: Option<Duration>,
    /// In-flight iterations abort at this much time (None = unlimited)
    pub max_time: Option<Duration>,
    /// Node limit (None = unlimited)
    pub node_limit: Option<u64>,
    /// Root worker threads
    pub threads: usize,
    /// Optional callback for iteration info
    pub info_callback: Option<SearchInfoCallback>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: None,
            optimal_time: None,
            max_time: None,
            node_limit: None,
            threads: super::perft::default_threads(),
            info_callback: None,
        }
    }
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Create a time-limited search config; `optimal` bounds new iterations,
    /// `max` aborts the running one.
    #[must_use]
    pub fn time(optimal: Duration, max: Duration) -> Self {
        SearchConfig {
            optimal_time: Some(optimal),
            max_time: Some(max),
            ..Default::default()
        }
    }

    /// Set node limit
    #[must_use]
    pub fn with_nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    /// Set root worker count
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

/// Fixed-depth search of `board`, parallel over root moves.
///
/// Returns the best move for the side to move and its White-relative score.
/// With no legal move the score is the mate or stalemate score and the move
/// is `None`. Results are deterministic for a given position, depth and
/// initial table contents.
///
/// # Example
/// ```
/// use bitchess::board::{search, Board};
/// use bitchess::tt::TranspositionTable;
///
/// let board = Board::new();
/// let tt = TranspositionTable::new(8);
/// let result = search(&board, 2, &tt);
/// assert!(result.best_move.is_some());
/// ```
#[must_use]
pub fn search(board: &Board, depth: u32, tt: &TranspositionTable) -> SearchResult {
    let config = SearchConfig::depth(depth);
    let stop = StopFlag::new();
    let start = std::time::Instant::now();
    let mut root = board.clone();
    let moves: Vec<Move> = root.generate_legal_moves().iter().copied().collect();

    if moves.is_empty() || depth == 0 {
        return SearchResult {
            best_move: moves.first().copied().filter(|_| depth > 0),
            score: if moves.is_empty() {
                terminal_score(&root, depth)
            } else {
                root.evaluate()
            },
            depth,
            nodes: 1,
            elapsed: start.elapsed(),
        };
    }

    let limits = RootLimits::unlimited(&stop);
    let outcome = search_root(&root, &moves, depth, tt, config.threads, &limits);
    SearchResult {
        best_move: outcome.best.map(|r| r.mv),
        score: outcome.best.map_or(0, |r| r.score),
        depth,
        nodes: outcome.nodes,
        elapsed: start.elapsed(),
    }
}
