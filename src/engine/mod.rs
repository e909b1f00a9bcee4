//! Engine controller for managing search and game state.
//!
//! Owns the current position and the transposition table, runs searches on a
//! background thread and turns clock information into time budgets.

mod controller;
pub mod time;

pub use controller::{EngineController, SearchJob, SearchParams};
pub use time::{TimeConfig, TimeControl, TimeLimits, DEFAULT_MOVE_OVERHEAD_MS};

/// Default transposition table size in MiB
pub const DEFAULT_HASH_MB: usize = 64;
