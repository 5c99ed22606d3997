//! Read-only snapshots handed to whatever draws the playfield.

use mania_config::PlayfieldConfig;
use mania_model::{HitObject, JudgmentState};
use mania_rule::ScoreSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaneView {
    pub lane: usize,
    pub key: u32,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectView {
    /// Index into the beatmap's object list
    pub index: usize,
    pub lane: usize,
    pub judgment: JudgmentState,
    /// Top edge of the head, in pixels from the top of the track
    pub y: f64,
    /// Top edge of the tail for holds
    pub end_y: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudView {
    pub map_time: i64,
    pub score: ScoreSnapshot,
}

/// Vertical position of something due at `time` when the map is at `now`.
///
/// Reaches the hit line (`track_height - hit_distance - note_height`) exactly
/// at `time` and the top edge `fall_time` ms earlier.
pub fn object_y(now: i64, time: i64, fall_time: i64, playfield: &PlayfieldConfig) -> f64 {
    let travel = (playfield.track_height - playfield.hit_distance) as f64;
    (now - time + fall_time) as f64 * travel / fall_time as f64 - playfield.note_height as f64
}

pub fn object_view(
    index: usize,
    object: &HitObject,
    now: i64,
    fall_time: i64,
    playfield: &PlayfieldConfig,
) -> ObjectView {
    ObjectView {
        index,
        lane: object.lane,
        judgment: object.judgment,
        y: object_y(now, object.time, fall_time, playfield),
        end_y: object
            .end_time()
            .map(|end| object_y(now, end, fall_time, playfield)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_reaches_hit_line_on_time() {
        let p = PlayfieldConfig::default();
        // 800 - 100 - 30
        assert_eq!(object_y(1000, 1000, 1000, &p), 670.0);
        assert_eq!(object_y(0, 1000, 1000, &p), -30.0);
        assert_eq!(object_y(500, 1000, 1000, &p), 320.0);
    }

    #[test]
    fn hold_has_tail_above_head() {
        let p = PlayfieldConfig::default();
        let hold = HitObject::hold(2, 1000, 1500, 0);
        let view = object_view(4, &hold, 1000, 1000, &p);
        assert_eq!(view.index, 4);
        assert_eq!(view.lane, 2);
        assert_eq!(view.end_y, Some(320.0));
        assert!(view.end_y.unwrap() < view.y);

        let note = HitObject::note(0, 1000, 0);
        assert_eq!(object_view(0, &note, 1000, 1000, &p).end_y, None);
    }
}
