use serde::{Deserialize, Serialize};

use crate::judgment::JudgmentState;

/// Width of the playfield in raw beatmap x units.
pub const PLAYFIELD_WIDTH: f64 = 512.0;

/// The kind of a hit object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitObjectKind {
    /// Single tap
    Note,
    /// Press at `time`, release at `end_time` (ms)
    Hold { end_time: i64 },
}

/// A single hit object in the beatmap timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitObject {
    /// Lane index (0-indexed)
    pub lane: usize,
    /// Note or hold
    pub kind: HitObjectKind,
    /// Expected press time in milliseconds
    pub time: i64,
    /// Hit sound selector, passed through untouched
    pub hit_sound: i32,
    /// Judgment progress, mutated by the track judge during play
    pub judgment: JudgmentState,
}

impl HitObject {
    pub fn note(lane: usize, time: i64, hit_sound: i32) -> Self {
        Self {
            lane,
            kind: HitObjectKind::Note,
            time,
            hit_sound,
            judgment: JudgmentState::Unjudged,
        }
    }

    pub fn hold(lane: usize, time: i64, end_time: i64, hit_sound: i32) -> Self {
        Self {
            lane,
            kind: HitObjectKind::Hold { end_time },
            time,
            hit_sound,
            judgment: JudgmentState::Unjudged,
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self.kind, HitObjectKind::Hold { .. })
    }

    /// Release time for holds, `None` for notes.
    pub fn end_time(&self) -> Option<i64> {
        match self.kind {
            HitObjectKind::Note => None,
            HitObjectKind::Hold { end_time } => Some(end_time),
        }
    }

    /// Last instant this object occupies on the timeline.
    pub fn last_time(&self) -> i64 {
        self.end_time().unwrap_or(self.time)
    }

    /// Forget any judgment progress (used when replaying a loaded beatmap).
    pub fn reset(&mut self) {
        self.judgment = JudgmentState::Unjudged;
    }
}

/// Map a raw x coordinate onto a lane.
///
/// `round(x * lanes / 512 - 0.5)` with ties rounded to even, then clamped to
/// the valid lane range.
pub fn lane_from_x(x: i32, lane_count: usize) -> usize {
    if lane_count == 0 {
        return 0;
    }
    let raw = (x as f64 * lane_count as f64 / PLAYFIELD_WIDTH - 0.5).round_ties_even();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(lane_count - 1)
    }
}
