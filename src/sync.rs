//! Search cancellation shared between the controller, its timer thread and
//! the root workers.
//!
//! The flag remembers why the search was stopped. Only the first reason
//! sticks, so a search cut by its deadline still reports `Deadline` after the
//! controller marks it finished.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const RUNNING: u8 = 0;

/// Why a search was told to stop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// `stop`, `quit` or a new command from the front end
    Requested,
    /// The hard time limit passed
    Deadline,
    /// The node budget was spent
    NodeLimit,
    /// The search ended by itself; releases the timer thread
    Finished,
}

impl StopReason {
    fn to_u8(self) -> u8 {
        match self {
            StopReason::Requested => 1,
            StopReason::Deadline => 2,
            StopReason::NodeLimit => 3,
            StopReason::Finished => 4,
        }
    }

    fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(StopReason::Requested),
            2 => Some(StopReason::Deadline),
            3 => Some(StopReason::NodeLimit),
            4 => Some(StopReason::Finished),
            _ => None,
        }
    }
}

/// Shared stop flag. Clones observe the same flag.
#[derive(Clone, Debug)]
pub struct StopFlag(Arc<AtomicU8>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicU8::new(RUNNING)))
    }

    /// A flag already stopped with `Requested`; searches given it return at once.
    #[must_use]
    pub fn stopped() -> Self {
        StopFlag(Arc::new(AtomicU8::new(StopReason::Requested.to_u8())))
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire) != RUNNING
    }

    /// Stop with `reason`. Returns `false` if the flag was already stopped,
    /// in which case the earlier reason is kept.
    #[inline]
    pub fn stop(&self, reason: StopReason) -> bool {
        self.0
            .compare_exchange(RUNNING, reason.to_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// First reason given to `stop`, `None` while running.
    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        StopReason::from_u8(self.0.load(Ordering::Acquire))
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}
