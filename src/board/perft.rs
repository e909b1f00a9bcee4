//! Perft: leaf-node counts for move generator verification.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;

use super::{Board, Move};

/// Worker count used when the caller does not pick one.
#[must_use]
pub fn default_threads() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

impl Board {
    /// Number of leaf nodes `depth` plies below this position.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in moves {
            let undo = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.undo_move(undo);
        }
        nodes
    }

    /// Per-root-move leaf counts, in generation order.
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let moves = self.generate_legal_moves();
        let mut results = Vec::with_capacity(moves.len());
        for m in moves {
            let undo = self.make_move(m);
            results.push((m, self.perft(depth - 1)));
            self.undo_move(undo);
        }
        results
    }

    /// Same count as `perft`, with root moves spread over worker threads.
    pub fn perft_parallel(&mut self, depth: usize) -> u64 {
        self.perft_parallel_with_threads(depth, default_threads())
    }

    /// `perft_parallel` with an explicit worker count.
    ///
    /// Each worker clones the board and takes root moves from a shared
    /// index until none remain.
    pub fn perft_parallel_with_threads(&mut self, depth: usize, threads: usize) -> u64 {
        if depth <= 1 {
            return self.perft(depth);
        }

        let moves = self.generate_legal_moves();
        let next = AtomicUsize::new(0);
        let total = AtomicU64::new(0);
        let workers = threads.clamp(1, moves.len().max(1));
        let root: &Board = self;

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    let mut board = root.clone();
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(m) = moves.get(idx) else {
                            break;
                        };
                        let undo = board.make_move(m);
                        total.fetch_add(board.perft(depth - 1), Ordering::Relaxed);
                        board.undo_move(undo);
                    }
                });
            }
        });

        total.load(Ordering::Relaxed)
    }
}
