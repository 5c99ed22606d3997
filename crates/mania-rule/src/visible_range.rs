use std::ops::Range;

use mania_model::HitObject;

/// How long an object stays in range after it ends (ms).
pub const TRAIL_MS: i64 = 1000;
/// How far past the fall time objects enter the range early (ms).
pub const LEAD_MS: i64 = 1000;

/// Incrementally advanced window of object indices worth judging and drawing.
///
/// `start` only moves forward, so each frame costs time proportional to the
/// objects entering or leaving rather than the whole beatmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleRange {
    start: usize,
    end: usize,
}

impl VisibleRange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Advance to time `now` and return the new index range.
    ///
    /// `objects` must be sorted by start time.
    pub fn advance(&mut self, now: i64, objects: &[HitObject], fall_time: i64) -> Range<usize> {
        let Some(last) = objects.len().checked_sub(1) else {
            self.start = 0;
            self.end = 0;
            return self.range();
        };

        let mut start = self.start.min(last);
        while start < last && objects[start].last_time() < now - TRAIL_MS {
            start += 1;
        }

        let horizon = now + LEAD_MS + fall_time;
        let mut scan = start;
        while scan < last && objects[scan].time < horizon {
            scan += 1;
        }

        self.start = start;
        self.end = (scan + 1).max(self.end);
        self.range()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
