//! Pausable time handling for animation playback.
//!
//! The host owns the real time source; the engine only sees it through the
//! [`Clock`] trait. [`TimeController`] turns absolute clock readings into the
//! per-tick advancement deltas the play-state machine consumes, honoring
//! pause/resume and reset without ever attributing a paused interval as a
//! delta burst.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Host time source. Implementations must be monotonic.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Seconds since an arbitrary fixed epoch.
    fn now(&self) -> f64;
}

/// Clock handle shared between a registry and every animation it owns.
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock backed by [`std::time::Instant`].
#[derive(Debug)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock for tests and benchmarks.
///
/// Stores whole nanoseconds so concurrent readers always observe a consistent
/// value, and so repeated small advances do not drift the way accumulating
/// f64 seconds would.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.nanos
            .fetch_add((seconds * 1e9) as u64, Ordering::Relaxed);
    }

    /// Jump the clock to an absolute reading of `seconds`.
    pub fn set(&self, seconds: f64) {
        self.nanos.store((seconds * 1e9) as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.nanos.load(Ordering::Relaxed) as f64 / 1e9
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ControllerState {
    Uninitialized,
    Running { baseline: f64 },
    Paused { accrued: f64 },
}

/// Converts a shared clock into per-tick advancement deltas.
///
/// State machine: uninitialized -> running -> paused -> running -> ...
/// `tick()` reports zero unless running. Pausing banks the partial interval
/// accrued since the last tick; resuming rebases the baseline so the paused
/// span is excluded from the next delta.
#[derive(Debug, Clone)]
pub struct TimeController {
    clock: SharedClock,
    state: ControllerState,
}

impl TimeController {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            state: ControllerState::Uninitialized,
        }
    }

    /// Start counting from the current clock reading.
    pub fn init(&mut self) {
        self.state = ControllerState::Running {
            baseline: self.clock.now(),
        };
    }

    /// Delta elapsed since the previous `tick()`, or zero while paused or
    /// uninitialized.
    pub fn tick(&mut self) -> f32 {
        match self.state {
            ControllerState::Running { baseline } => {
                let now = self.clock.now();
                self.state = ControllerState::Running { baseline: now };
                (now - baseline) as f32
            }
            _ => 0.0,
        }
    }

    /// Freeze delta accrual, keeping the interval accrued since the last tick.
    pub fn pause(&mut self) {
        if let ControllerState::Running { baseline } = self.state {
            self.state = ControllerState::Paused {
                accrued: self.clock.now() - baseline,
            };
        }
    }

    /// Resume accrual. The paused span never shows up in a delta.
    pub fn resume(&mut self) {
        if let ControllerState::Paused { accrued } = self.state {
            self.state = ControllerState::Running {
                baseline: self.clock.now() - accrued,
            };
        }
    }

    /// Return to the uninitialized state; `tick()` yields zero until `init()`.
    pub fn reset(&mut self) {
        self.state = ControllerState::Uninitialized;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, ControllerState::Running { .. })
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        matches!(self.state, ControllerState::Paused { .. })
    }
}
