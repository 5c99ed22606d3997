//! End-to-end judgment scenarios driven frame by frame.

use mania_model::{HitObject, Judgment, JudgmentState};
use mania_rule::{HitWindows, JudgeEvent, Rank, ScoreMaster, Track, VisibleRange};
use proptest::prelude::*;

const FALL_TIME: i64 = 1000;

struct Lane {
    objects: Vec<HitObject>,
    track: Track,
    range: VisibleRange,
    score: ScoreMaster,
}

impl Lane {
    fn new(objects: Vec<HitObject>, od: f64) -> Self {
        Self {
            objects,
            track: Track::new(0, 100, HitWindows::from_od(od)),
            range: VisibleRange::new(),
            score: ScoreMaster::new(),
        }
    }

    fn frame(&mut self, now: i64, pressed: bool) -> Vec<JudgeEvent> {
        let visible = self.range.advance(now, &self.objects, FALL_TIME);
        self.track.set_state(pressed);
        self.track
            .update(now, &mut self.objects, visible, &mut self.score)
    }
}

#[test]
fn note_hit_late_inside_300_window() {
    let mut lane = Lane::new(vec![HitObject::note(0, 1000, 0)], 5.0);
    lane.frame(900, false);
    lane.frame(1050, true);
    assert_eq!(lane.objects[0].judgment, JudgmentState::Judged(Judgment::ThreeHundred));
    assert_eq!(lane.score.score(), 300);
    assert_eq!(lane.score.combo(), 1);
}

#[test]
fn untouched_note_missed_one_ms_after_window() {
    let mut lane = Lane::new(vec![HitObject::note(0, 1000, 0)], 5.0);
    for now in (0..=1300).step_by(10) {
        assert!(lane.frame(now, false).is_empty());
    }
    lane.frame(1301, false);
    assert_eq!(lane.objects[0].judgment, JudgmentState::Judged(Judgment::Miss));
    assert_eq!(lane.score.history(), &[0]);
}

#[test]
fn hold_pressed_and_released_on_time() {
    let mut lane = Lane::new(vec![HitObject::hold(0, 1000, 2000, 0)], 5.0);
    lane.frame(1000, false);
    lane.frame(1020, true);
    for now in (1030..2010).step_by(16) {
        lane.frame(now, true);
    }
    lane.frame(2010, false);
    assert_eq!(lane.score.history(), &[300]);
    assert_eq!(lane.objects[0].judgment, JudgmentState::Judged(Judgment::ThreeHundred));
}

#[test]
fn hold_released_half_way_is_a_miss() {
    let mut lane = Lane::new(vec![HitObject::hold(0, 1000, 3000, 0)], 5.0);
    lane.frame(1000, true);
    lane.frame(1500, false);
    assert_eq!(lane.score.history(), &[0]);
    assert_eq!(lane.score.combo(), 0);
}

#[test]
fn early_press_then_on_time_press() {
    let mut lane = Lane::new(vec![HitObject::note(0, 1000, 0)], 5.0);
    // 400 ms early: outside every window
    lane.frame(600, true);
    assert!(lane.objects[0].judgment.is_unjudged());
    lane.frame(700, false);
    lane.frame(1000, true);
    assert_eq!(lane.objects[0].judgment, JudgmentState::Judged(Judgment::ThreeHundred));
}

#[test]
fn stream_of_perfect_hits_is_ss() {
    let times: Vec<i64> = (0..20).map(|i| 1000 + i * 200).collect();
    let objects = times.iter().map(|&t| HitObject::note(0, t, 0)).collect();
    let mut lane = Lane::new(objects, 8.0);
    for &t in &times {
        lane.frame(t - 50, false);
        lane.frame(t, true);
    }
    lane.frame(10_000, false);
    assert_eq!(lane.score.max_combo(), 20);
    assert_eq!(lane.score.rank().unwrap(), Rank::SS);
}

#[test]
fn judgments_never_resolve_twice() {
    let objects = vec![
        HitObject::note(0, 1000, 0),
        HitObject::hold(0, 1400, 1800, 0),
        HitObject::note(0, 2200, 0),
    ];
    let mut lane = Lane::new(objects, 5.0);
    let mut pressed = false;
    for now in (0..5000).step_by(25) {
        pressed = !pressed;
        lane.frame(now, pressed);
    }
    assert_eq!(lane.score.len(), 3);
}

proptest! {
    #[test]
    fn windows_are_ordered(od in 0.0f64..=10.0) {
        let w = HitWindows::from_od(od);
        prop_assert!(w.window300 <= w.window100);
        prop_assert!(w.window100 <= w.window50);
    }

    #[test]
    fn max_combo_never_below_combo(values in prop::collection::vec(
        prop::sample::select(vec![-1, 0, 50, 100, 300]), 0..200)
    ) {
        let mut sm = ScoreMaster::new();
        for v in values {
            sm.append(v).unwrap();
            prop_assert!(sm.max_combo() >= sm.combo());
        }
    }

    #[test]
    fn any_key_pattern_appends_at_most_once_per_object(
        presses in prop::collection::vec(any::<bool>(), 1..400)
    ) {
        let objects: Vec<HitObject> = (0..12)
            .map(|i| if i % 3 == 0 {
                HitObject::hold(0, 500 + i * 150, 700 + i * 150, 0)
            } else {
                HitObject::note(0, 500 + i * 150, 0)
            })
            .collect();
        let count = objects.len();
        let mut lane = Lane::new(objects, 5.0);
        for (frame, pressed) in presses.into_iter().enumerate() {
            lane.frame(frame as i64 * 10, pressed);
        }
        prop_assert!(lane.score.len() <= count);
    }
}
