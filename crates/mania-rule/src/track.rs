//! Per-lane judgment state machine.
//!
//! A `Track` samples its key once per frame, derives the press/release edge,
//! and walks the objects of its lane inside the visible range in timeline
//! order. Each edge is consumed by at most one object.

use std::ops::Range;

use log::debug;
use mania_model::{HitObject, HitObjectKind, Judgment, JudgmentState};

use crate::hit_window::{HitResult, HitWindows};
use crate::score_master::ScoreMaster;

/// Key transition between the previous frame and this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressEdge {
    #[default]
    None,
    Pressed,
    Released,
}

impl PressEdge {
    pub fn from_states(last: bool, current: bool) -> Self {
        match (last, current) {
            (false, true) => Self::Pressed,
            (true, false) => Self::Released,
            _ => Self::None,
        }
    }
}

/// Something a track resolved during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeEvent {
    /// Object reached a terminal judgment. `offset` is `now - expected`
    /// (the start time for notes and passive misses, the end time for hold
    /// releases).
    Judged {
        index: usize,
        judgment: Judgment,
        offset: i64,
    },
    /// A hold's start was hit; it is now being held.
    HoldStarted { index: usize },
}

#[derive(Debug, Clone)]
pub struct Track {
    lane: usize,
    /// Key code bound to this lane
    key: u32,
    windows: HitWindows,
    pressed: bool,
    last_pressed: bool,
}

impl Track {
    pub fn new(lane: usize, key: u32, windows: HitWindows) -> Self {
        Self {
            lane,
            key,
            windows,
            pressed: false,
            last_pressed: false,
        }
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    pub fn windows(&self) -> &HitWindows {
        &self.windows
    }

    /// Key-down state for the coming update.
    pub fn set_state(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Edge the next `update` will act on.
    pub fn edge(&self) -> PressEdge {
        PressEdge::from_states(self.last_pressed, self.pressed)
    }

    /// Judge this lane's objects in `range` at time `now` (ms).
    ///
    /// Judgments are written into `objects` in place and appended to
    /// `score`. Returns what changed, in scan order.
    pub fn update(
        &mut self,
        now: i64,
        objects: &mut [HitObject],
        range: Range<usize>,
        score: &mut ScoreMaster,
    ) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        let mut edge = self.edge();
        let end = range.end.min(objects.len());
        let start = range.start.min(end);

        for index in start..end {
            let object = &mut objects[index];
            if object.lane != self.lane {
                continue;
            }
            let offset = now - object.time;

            // Passive miss: nothing pressed before the latest acceptable time.
            if object.judgment.is_unjudged() && self.windows.is_passed(offset) {
                object.judgment = JudgmentState::Judged(Judgment::Miss);
                score.record(Judgment::Miss);
                events.push(JudgeEvent::Judged {
                    index,
                    judgment: Judgment::Miss,
                    offset,
                });
                continue;
            }

            match object.kind {
                HitObjectKind::Note => {
                    if edge == PressEdge::Pressed && object.judgment.is_unjudged() {
                        if let HitResult::Judged(judgment) = self.windows.classify(offset) {
                            object.judgment = JudgmentState::Judged(judgment);
                            score.record(judgment);
                            events.push(JudgeEvent::Judged {
                                index,
                                judgment,
                                offset,
                            });
                            edge = PressEdge::None;
                        }
                    }
                }
                HitObjectKind::Hold { end_time } => match edge {
                    PressEdge::Pressed if object.judgment.is_unjudged() => {
                        if let HitResult::Judged(_) = self.windows.classify(offset) {
                            object.judgment = JudgmentState::Holding;
                            events.push(JudgeEvent::HoldStarted { index });
                            edge = PressEdge::None;
                        }
                    }
                    PressEdge::Released if object.judgment.is_holding() => {
                        let release = now - end_time;
                        // Letting go before the end window opens counts as a miss.
                        let judgment = match self.windows.classify(release) {
                            HitResult::Judged(judgment) => judgment,
                            HitResult::TooEarly => Judgment::Miss,
                        };
                        object.judgment = JudgmentState::Judged(judgment);
                        score.record(judgment);
                        events.push(JudgeEvent::Judged {
                            index,
                            judgment,
                            offset: release,
                        });
                        edge = PressEdge::None;
                    }
                    _ => {}
                },
            }
        }

        if !events.is_empty() {
            debug!("lane {} at {}ms: {:?}", self.lane, now, events);
        }
        self.last_pressed = self.pressed;
        events
    }

    /// Forget key history, e.g. when restarting a session.
    pub fn reset(&mut self) {
        self.pressed = false;
        self.last_pressed = false;
    }
}
