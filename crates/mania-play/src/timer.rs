use std::cell::Cell;
use std::time::{Duration, Instant};

/// Abstraction over time sources.
/// Implementations: SystemTimeProvider (wall clock), ManualTimeProvider (headless runs, tests).
pub trait TimeProvider {
    /// Current time in microseconds from an arbitrary epoch.
    fn now_us(&self) -> i64;

    /// Block until `target_us`. Returns immediately if it already passed.
    fn sleep_until(&self, target_us: i64);
}

/// System time provider using std::time::Instant.
pub struct SystemTimeProvider {
    start: Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_us(&self) -> i64 {
        self.start.elapsed().as_micros() as i64
    }

    fn sleep_until(&self, target_us: i64) {
        let remaining = target_us - self.now_us();
        if remaining > 0 {
            std::thread::sleep(Duration::from_micros(remaining as u64));
        }
    }
}

/// Deterministic clock that only moves when told to.
///
/// `sleep_until` jumps straight to the target. A target that already passed
/// advances the clock by `min_step_us` so an unpaced loop still makes progress.
pub struct ManualTimeProvider {
    current_us: Cell<i64>,
    min_step_us: i64,
}

impl ManualTimeProvider {
    pub const DEFAULT_MIN_STEP_US: i64 = 1_000;

    pub fn new() -> Self {
        Self::with_min_step(Self::DEFAULT_MIN_STEP_US)
    }

    pub fn with_min_step(min_step_us: i64) -> Self {
        Self {
            current_us: Cell::new(0),
            min_step_us: min_step_us.max(1),
        }
    }

    pub fn set_time(&self, us: i64) {
        self.current_us.set(us);
    }

    pub fn advance(&self, delta_us: i64) {
        self.current_us.set(self.current_us.get() + delta_us);
    }
}

impl Default for ManualTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now_us(&self) -> i64 {
        self.current_us.get()
    }

    fn sleep_until(&self, target_us: i64) {
        let now = self.current_us.get();
        let next = if target_us > now {
            target_us
        } else {
            now + self.min_step_us
        };
        self.current_us.set(next);
    }
}

/// Paces a loop to a fixed frame rate on top of any `TimeProvider`.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval_us: i64,
    next_frame_us: Option<i64>,
}

impl FramePacer {
    /// `fps == 0` disables pacing.
    pub fn new(fps: i32) -> Self {
        let interval_us = if fps > 0 { 1_000_000 / fps as i64 } else { 0 };
        Self {
            interval_us,
            next_frame_us: None,
        }
    }

    pub fn interval_us(&self) -> i64 {
        self.interval_us
    }

    /// Wait for the next frame boundary.
    pub fn wait(&mut self, clock: &dyn TimeProvider) {
        let now = clock.now_us();
        if self.interval_us == 0 {
            clock.sleep_until(now);
            return;
        }
        let target = match self.next_frame_us {
            // Fell more than a frame behind: resync instead of bursting
            Some(next) if now - next > self.interval_us => now + self.interval_us,
            Some(next) => next,
            None => now + self.interval_us,
        };
        clock.sleep_until(target);
        self.next_frame_us = Some(target + self.interval_us);
    }
}
