use serde::{Deserialize, Serialize};

use mania_model::Judgment;

/// Timing half-widths in milliseconds around an object's expected time.
///
/// Derived once from Overall Difficulty. The formula is linear and is not
/// clamped: past OD 13.33 `window300` goes negative and nothing hits 300.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitWindows {
    pub window300: f64,
    pub window100: f64,
    pub window50: f64,
}

/// Outcome of classifying a timing offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// Pressed before the widest window opened; the object stays untouched.
    TooEarly,
    /// Inside a window (50/100/300) or past the latest acceptable time (miss).
    Judged(Judgment),
}

impl HitWindows {
    pub fn from_od(od: f64) -> Self {
        Self {
            window300: 160.0 - 12.0 * od,
            window100: 280.0 - 16.0 * od,
            window50: 400.0 - 20.0 * od,
        }
    }

    /// Classify `offset = now - expected` (positive = late).
    pub fn classify(&self, offset: i64) -> HitResult {
        let d = offset as f64;
        if d > self.window50 {
            HitResult::Judged(Judgment::Miss)
        } else if d < -self.window50 {
            HitResult::TooEarly
        } else if d.abs() > self.window100 {
            HitResult::Judged(Judgment::Fifty)
        } else if d.abs() > self.window300 {
            HitResult::Judged(Judgment::Hundred)
        } else {
            HitResult::Judged(Judgment::ThreeHundred)
        }
    }

    /// True once an object at `offset` has fallen past the latest acceptable time.
    pub fn is_passed(&self, offset: i64) -> bool {
        offset as f64 > self.window50
    }

    /// Widths are ordered narrowest to widest (holds for OD up to 20).
    pub fn is_monotonic(&self) -> bool {
        self.window300 <= self.window100 && self.window100 <= self.window50
    }
}
