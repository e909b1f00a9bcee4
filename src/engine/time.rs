//! Time management for `go` commands.
//!
//! Turns the clock situation sent by the GUI into two budgets: an optimal
//! time after which no new iteration starts, and a maximum time at which the
//! running iteration is aborted.

use std::time::Duration;

/// Default safety margin subtracted from the remaining clock (ms)
pub const DEFAULT_MOVE_OVERHEAD_MS: u64 = 100;

/// Moves assumed left in the game when the GUI does not say
pub const SUDDEN_DEATH_MOVES: u64 = 30;

/// Share of the remaining time a single move may use at most
const MAX_TIME_DIVISOR: u64 = 2;
const SUDDEN_DEATH_MAX_TIME_DIVISOR: u64 = 5;

/// Configuration for time management calculations.
#[derive(Debug, Clone, Copy)]
pub struct TimeConfig {
    /// Time to reserve for move overhead (communication latency, etc.)
    pub move_overhead_ms: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead_ms: DEFAULT_MOVE_OVERHEAD_MS,
        }
    }
}

/// Time control settings for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// Infinite search - no time limit
    #[default]
    Infinite,
    /// Fixed depth search - no time limit, depth controlled externally
    Depth,
    /// Fixed time per move
    MoveTime { time_ms: u64 },
    /// Standard time control with remaining time and increment
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

/// Budgets for one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimits {
    /// No new iteration starts after this
    pub optimal: Duration,
    /// The running iteration is aborted at this point
    pub max: Duration,
}

impl TimeLimits {
    fn from_ms(optimal_ms: u64, max_ms: u64) -> Self {
        TimeLimits {
            optimal: Duration::from_millis(optimal_ms),
            max: Duration::from_millis(max_ms),
        }
    }
}

impl TimeControl {
    /// Create a new incremental time control from Duration values.
    #[must_use]
    pub fn incremental(time_left: Duration, inc: Duration, movestogo: Option<u64>) -> Self {
        TimeControl::Incremental {
            time_left_ms: time_left.as_millis() as u64,
            inc_ms: inc.as_millis() as u64,
            movestogo,
        }
    }

    /// Create a fixed move time control from Duration.
    #[must_use]
    pub fn move_time(time: Duration) -> Self {
        TimeControl::MoveTime {
            time_ms: time.as_millis() as u64,
        }
    }

    /// Check if this is an unlimited time control (infinite or depth-based).
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite | TimeControl::Depth)
    }

    /// Compute the optimal and maximum time for this time control.
    ///
    /// Returns `None` when the search is not bounded by time.
    #[must_use]
    pub fn compute_limits(&self, config: &TimeConfig) -> Option<TimeLimits> {
        match *self {
            TimeControl::Infinite | TimeControl::Depth => None,
            TimeControl::MoveTime { time_ms } => {
                // The user asked for exactly this long; only the overhead comes off
                let budget = time_ms.saturating_sub(config.move_overhead_ms).max(1);
                Some(TimeLimits::from_ms(budget, budget))
            }
            TimeControl::Incremental {
                time_left_ms,
                inc_ms,
                movestogo,
            } => Some(compute_incremental_limits(
                time_left_ms,
                inc_ms,
                movestogo,
                config,
            )),
        }
    }
}

/// Budgets for a clock with `time_left_ms` remaining.
///
/// Optimal is `safe / movestogo + 3/4 inc`, or `safe / 30 + 3/4 inc` in sudden
/// death. Max is half the remaining time, a fifth in sudden death, never more
/// than the safe remainder. Optimal never exceeds max.
fn compute_incremental_limits(
    time_left_ms: u64,
    inc_ms: u64,
    movestogo: Option<u64>,
    config: &TimeConfig,
) -> TimeLimits {
    let safe_ms = time_left_ms.saturating_sub(config.move_overhead_ms);
    let bonus = inc_ms * 3 / 4;

    let (optimal_ms, max_ms) = match movestogo.filter(|&n| n > 0) {
        Some(moves) => (safe_ms / moves + bonus, time_left_ms / MAX_TIME_DIVISOR),
        None => (
            safe_ms / SUDDEN_DEATH_MOVES + bonus,
            time_left_ms / SUDDEN_DEATH_MAX_TIME_DIVISOR,
        ),
    };

    let max_ms = max_ms.min(safe_ms).max(1);
    let optimal_ms = optimal_ms.min(max_ms).max(1);
    TimeLimits::from_ms(optimal_ms, max_ms)
}
