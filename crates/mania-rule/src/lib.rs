// Hit windows, per-lane judgment, score accounting, visible range

mod hit_window;
mod score_master;
pub mod track;
mod visible_range;

pub use hit_window::{HitResult, HitWindows};
pub use score_master::{
    B_RANK_ACCURACY, C_RANK_ACCURACY, HitCounts, Rank, S_RANK_ACCURACY, ScoreError, ScoreMaster,
    ScoreSnapshot,
};
pub use track::{JudgeEvent, PressEdge, Track};
pub use visible_range::{LEAD_MS, TRAIL_MS, VisibleRange};

/// Grace period after the last object before a session counts as finished (ms).
pub const FINISH_DELAY_MS: i64 = 3000;
