use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use mania_model::{Beatmap, HitObjectKind};
use serde::{Deserialize, Serialize};

/// How long autoplay keeps a key down for a plain note (ms).
pub const AUTOPLAY_PRESS_MS: i64 = 80;

/// Key state change at a specific map time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key code
    pub key: u32,
    /// true = pressed, false = released
    pub pressed: bool,
    /// Map time in milliseconds
    pub time: i64,
}

/// Abstraction over input sources.
/// Implementations: ScriptedInput (recorded key logs), AutoplayInput (perfect play).
pub trait InputProvider {
    /// Advance the source to `map_time` (ms). Called once per tick.
    fn poll(&mut self, map_time: i64);

    /// Whether `key` is held as of the last poll.
    fn is_pressed(&self, key: u32) -> bool;

    /// The player asked to leave the session.
    fn exit_requested(&self) -> bool;
}

/// Replays a time-ordered list of key events.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: Vec<KeyEvent>,
    cursor: usize,
    held: BTreeSet<u32>,
    exit_at: Option<i64>,
    exit_key: Option<u32>,
    exit: bool,
}

impl ScriptedInput {
    /// Events are stably sorted by time; simultaneous events keep their order.
    pub fn new(mut events: Vec<KeyEvent>) -> Self {
        if !events.windows(2).all(|w| w[0].time <= w[1].time) {
            warn!("Scripted input is not time-ordered, sorting {} events", events.len());
            events.sort_by_key(|e| e.time);
        }
        Self {
            events,
            ..Default::default()
        }
    }

    /// Request exit once map time reaches `time`.
    pub fn with_exit_at(mut self, time: i64) -> Self {
        self.exit_at = Some(time);
        self
    }

    /// Request exit when a press of `key` is polled.
    pub fn with_exit_key(mut self, key: u32) -> Self {
        self.exit_key = Some(key);
        self
    }

    /// Parse a JSON array of `{ "key", "pressed", "time" }` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let events: Vec<KeyEvent> =
            serde_json::from_str(json).context("Failed to parse scripted input")?;
        Ok(Self::new(events))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input script: {}", path.display()))?;
        Self::from_json(&data)
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Whether every event has been delivered.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }
}

impl InputProvider for ScriptedInput {
    /// Applies due events. A key changes at most once per poll; a later
    /// event for the same key waits for the next poll so each edge is seen.
    fn poll(&mut self, map_time: i64) {
        let mut changed = BTreeSet::new();
        while let Some(event) = self.events.get(self.cursor) {
            if event.time > map_time || changed.contains(&event.key) {
                break;
            }
            if event.pressed {
                self.held.insert(event.key);
                if self.exit_key == Some(event.key) {
                    self.exit = true;
                }
            } else {
                self.held.remove(&event.key);
            }
            changed.insert(event.key);
            self.cursor += 1;
        }
        if self.exit_at.is_some_and(|t| map_time >= t) {
            self.exit = true;
        }
    }

    fn is_pressed(&self, key: u32) -> bool {
        self.held.contains(&key)
    }

    fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Presses every object on time.
///
/// Holds release at their end time and notes after `AUTOPLAY_PRESS_MS`. When
/// that would reach the next object in the same lane, the release moves to
/// the midpoint between the two presses.
#[derive(Debug, Clone)]
pub struct AutoplayInput {
    script: ScriptedInput,
}

impl AutoplayInput {
    /// `keys[lane]` is the key code driven for each lane.
    pub fn new(beatmap: &Beatmap, keys: &[u32]) -> Self {
        let mut events = Vec::with_capacity(beatmap.objects.len() * 2);
        for (lane, &key) in keys.iter().enumerate() {
            let lane_objects: Vec<_> = beatmap
                .objects
                .iter()
                .filter(|o| o.lane == lane)
                .collect();
            for (i, object) in lane_objects.iter().enumerate() {
                let natural = match object.kind {
                    HitObjectKind::Note => object.time + AUTOPLAY_PRESS_MS,
                    HitObjectKind::Hold { end_time } => end_time,
                };
                let release = match lane_objects.get(i + 1) {
                    Some(next) if natural >= next.time => {
                        (object.time + (next.time - object.time) / 2).max(object.time + 1)
                    }
                    _ => natural,
                };
                events.push(KeyEvent {
                    key,
                    pressed: true,
                    time: object.time,
                });
                events.push(KeyEvent {
                    key,
                    pressed: false,
                    time: release,
                });
            }
        }
        // Releases before presses at equal times
        events.sort_by_key(|e| (e.time, e.pressed));
        debug!("Autoplay prepared {} key events", events.len());
        Self {
            script: ScriptedInput::new(events),
        }
    }

    /// The generated key log, e.g. to save as a script.
    pub fn script(&self) -> &ScriptedInput {
        &self.script
    }
}

impl InputProvider for AutoplayInput {
    fn poll(&mut self, map_time: i64) {
        self.script.poll(map_time);
    }

    fn is_pressed(&self, key: u32) -> bool {
        self.script.is_pressed(key)
    }

    fn exit_requested(&self) -> bool {
        false
    }
}
