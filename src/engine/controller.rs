//! Engine controller implementation.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::board::{iterative_deepening, Board, SearchConfig, SearchInfoCallback, SearchResult};
use crate::sync::{StopFlag, StopReason};
use crate::tt::TranspositionTable;

use super::time::TimeLimits;

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Maximum sleep duration when polling time limits (avoids excessive CPU wake-ups)
const MAX_POLL_SLEEP_MS: u64 = 5;

/// Active search job state
pub struct SearchJob {
    /// Stop flag for the search
    stop: StopFlag,
    /// Handle to the search thread
    handle: JoinHandle<()>,
    /// Optional handle to the timer thread enforcing hard stops
    timer_handle: Option<JoinHandle<()>>,
}

impl SearchJob {
    /// Stop the search and wait for the thread to finish
    pub fn stop_and_wait(self) {
        self.stop.stop(StopReason::Requested);
        self.wait();
    }

    /// Wait for the search to end on its own
    pub fn wait(self) {
        if self.handle.join().is_err() {
            log::error!("search thread panicked");
        }
        if let Some(timer) = self.timer_handle {
            let _ = timer.join();
        }
    }

    /// Signal stop without waiting
    pub fn signal_stop(&self) {
        self.stop.stop(StopReason::Requested);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Search parameters for starting a new search
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Maximum depth to search (None = unlimited)
    pub depth: Option<u32>,
    /// Time budgets (None = no time limit)
    pub time: Option<TimeLimits>,
    /// Node budget (None = unlimited)
    pub nodes: Option<u64>,
    /// Run until stopped, ignoring time budgets
    pub infinite: bool,
}

/// Engine controller managing search and game state
pub struct EngineController {
    /// Current board position
    board: Board,
    /// Shared transposition table, locked by the search thread while it runs
    tt: Arc<Mutex<TranspositionTable>>,
    /// Active search job (if any)
    current_job: Option<SearchJob>,
    /// Optional callback for per-iteration search info
    info_callback: Option<SearchInfoCallback>,
    /// Number of root worker threads
    num_threads: usize,
}

impl EngineController {
    /// Create a new engine controller
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        EngineController {
            board: Board::new(),
            tt: Arc::new(Mutex::new(TranspositionTable::new(tt_mb))),
            current_job: None,
            info_callback: None,
            num_threads: crate::board::default_threads(),
        }
    }

    /// Set the number of root worker threads
    pub fn set_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads.max(1);
    }

    /// Get current thread count
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Get a reference to the current board
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get a mutable reference to the current board
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Set the board position
    pub fn set_board(&mut self, board: Board) {
        self.stop_search();
        self.board = board;
    }

    /// Reset the board to starting position
    pub fn new_game(&mut self) {
        self.stop_search();
        self.board = Board::new();
        self.tt.lock().clear();
    }

    /// Stop any active search
    pub fn stop_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.stop_and_wait();
        }
    }

    /// Signal stop to active search (non-blocking)
    pub fn signal_stop(&mut self) {
        if let Some(job) = &self.current_job {
            job.signal_stop();
        }
    }

    /// Block until the active search (if any) finishes by itself
    pub fn wait_for_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.wait();
        }
    }

    /// Check if there's an active search
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.as_ref().is_some_and(|job| !job.is_finished())
    }

    /// Resize the transposition table
    pub fn resize_hash(&mut self, mb: usize) {
        self.stop_search();
        *self.tt.lock() = TranspositionTable::new(mb);
        log::debug!("transposition table resized to {mb} MB");
    }

    /// Hash table fullness in per mille; waits for a running search.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        self.tt.lock().hashfull_per_mille()
    }

    /// Set callback for iteration info reporting.
    pub fn set_info_callback(&mut self, cb: Option<SearchInfoCallback>) {
        self.info_callback = cb;
    }

    fn build_search_config(&self, params: &SearchParams) -> SearchConfig {
        let mut config = match params.depth {
            Some(depth) => SearchConfig::depth(depth),
            None => SearchConfig::default(),
        };
        if let (Some(limits), false) = (params.time, params.infinite) {
            config.optimal_time = Some(limits.optimal);
            config.max_time = Some(limits.max);
        }
        if let Some(nodes) = params.nodes {
            config = config.with_nodes(nodes);
        }
        if let Some(cb) = &self.info_callback {
            config = config.with_info_callback(Arc::clone(cb));
        }
        config.with_threads(self.num_threads)
    }

    fn spawn_hard_stop_timer(deadline: Instant, stop: StopFlag) -> Option<JoinHandle<()>> {
        let spawned = thread::Builder::new()
            .name("search-timer".to_string())
            .spawn(move || loop {
                if stop.is_stopped() {
                    break;
                }
                let now = Instant::now();
                if now >= deadline {
                    stop.stop(StopReason::Deadline);
                    break;
                }
                let sleep_for = (deadline - now).min(Duration::from_millis(MAX_POLL_SLEEP_MS));
                thread::sleep(sleep_for);
            });
        match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("could not spawn timer thread: {err}");
                None
            }
        }
    }

    /// Start a search with the given parameters
    ///
    /// The `on_complete` callback is called on the search thread when the
    /// search finishes with the result.
    pub fn start_search<F>(&mut self, params: SearchParams, on_complete: F) -> std::io::Result<()>
    where
        F: FnOnce(SearchResult) + Send + 'static,
    {
        self.stop_search();

        let stop = StopFlag::new();
        let config = self.build_search_config(&params);

        let timer_handle = config
            .max_time
            .and_then(|max| Self::spawn_hard_stop_timer(Instant::now() + max, stop.clone()));

        let search_board = self.board.clone();
        let tt = Arc::clone(&self.tt);
        let search_stop = stop.clone();

        let spawned = thread::Builder::new()
            .name("search-main".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = {
                    let guard = tt.lock();
                    iterative_deepening(&search_board, &config, &guard, &search_stop)
                };
                // Release the timer thread
                search_stop.stop(StopReason::Finished);
                log::debug!("search ended: {:?}", search_stop.reason());
                on_complete(result);
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                stop.stop(StopReason::Finished);
                if let Some(timer) = timer_handle {
                    let _ = timer.join();
                }
                return Err(err);
            }
        };

        self.current_job = Some(SearchJob {
            stop,
            handle,
            timer_handle,
        });
        Ok(())
    }

    /// Run a search on the calling thread and return its result.
    pub fn search_blocking(&mut self, params: &SearchParams) -> SearchResult {
        self.stop_search();
        let config = self.build_search_config(params);
        let stop = StopFlag::new();
        let guard = self.tt.lock();
        iterative_deepening(&self.board, &config, &guard, &stop)
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.stop_search();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn blocking_search_respects_depth() {
        let mut engine = EngineController::new(1);
        engine.set_threads(2);
        let result = engine.search_blocking(&SearchParams {
            depth: Some(3),
            ..Default::default()
        });
        assert_eq!(result.depth, 3);
        assert!(result.best_move.is_some());
        assert!(engine.hashfull() <= 1000);
    }

    #[test]
    fn background_search_reports_result() {
        let mut engine = EngineController::new(1);
        let (tx, rx) = mpsc::channel();
        engine
            .start_search(
                SearchParams {
                    depth: Some(2),
                    ..Default::default()
                },
                move |result| {
                    let _ = tx.send(result);
                },
            )
            .unwrap();
        engine.wait_for_search();
        let result = rx.recv().unwrap();
        assert_eq!(result.depth, 2);
        assert!(!engine.is_searching());
    }

    #[test]
    fn infinite_search_stops_on_request() {
        let mut engine = EngineController::new(1);
        engine.set_threads(1);
        let (tx, rx) = mpsc::channel();
        engine
            .start_search(
                SearchParams {
                    infinite: true,
                    ..Default::default()
                },
                move |result| {
                    let _ = tx.send(result);
                },
            )
            .unwrap();
        thread::sleep(Duration::from_millis(50));
        engine.stop_search();
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(result.best_move.is_some());
    }

    #[test]
    fn time_limit_ends_search() {
        let mut engine = EngineController::new(1);
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        engine
            .start_search(
                SearchParams {
                    time: Some(TimeLimits {
                        optimal: Duration::from_millis(30),
                        max: Duration::from_millis(60),
                    }),
                    ..Default::default()
                },
                move |result| {
                    let _ = tx.send(result);
                },
            )
            .unwrap();
        let result = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(result.best_move.is_some());
        assert!(started.elapsed() < Duration::from_secs(5));
        engine.wait_for_search();
    }

    #[test]
    fn new_game_resets_board() {
        let mut engine = EngineController::new(1);
        engine.board_mut().make_move_uci("e2e4").unwrap();
        engine.new_game();
        assert_eq!(engine.board(), &Board::new());
    }
}
