use anyhow::{Result, bail};
use log::{debug, info, warn};
use mania_config::{Config, PlayfieldConfig};
use mania_model::Beatmap;
use mania_rule::{FINISH_DELAY_MS, HitWindows, JudgeEvent, ScoreMaster, Track, VisibleRange};

use crate::input::InputProvider;
use crate::result::PlayResult;
use crate::view::{self, HudView, LaneView, ObjectView};

/// One play-through of a beatmap: tracks, shared score and progress.
pub struct PlaySession {
    beatmap: Beatmap,
    tracks: Vec<Track>,
    range: VisibleRange,
    score: ScoreMaster,
    playfield: PlayfieldConfig,
    fall_time: i64,
    correction: i64,
    map_duration: i64,
    map_time: i64,
    audio_started: bool,
    finished: bool,
    finished_early: bool,
}

impl PlaySession {
    pub fn new(mut beatmap: Beatmap, config: &Config) -> Result<Self> {
        let lane_count = beatmap.lane_count();
        let Some(keys) = config.keys.keys_for(lane_count) else {
            bail!("No key bindings configured for {lane_count}K");
        };
        if keys.len() != lane_count {
            bail!(
                "{}K key binding has {} keys",
                lane_count,
                keys.len()
            );
        }
        if !beatmap.is_sorted() {
            warn!("Hit objects are not time-ordered, sorting");
            beatmap.objects.sort_by_key(|o| o.time);
        }
        beatmap.reset_judgments();

        let windows = HitWindows::from_od(beatmap.metadata.overall_difficulty);
        let tracks = keys
            .iter()
            .enumerate()
            .map(|(lane, &key)| Track::new(lane, key, windows))
            .collect();

        let lead_in = match beatmap.first_object_time() {
            Some(first) if first < config.lead_in => config.lead_in - first,
            _ => 0,
        };
        let correction = lead_in + config.offset;
        let map_duration = beatmap.map_duration();

        info!(
            "Session: {} ({}K, OD {}, {} objects, correction {}ms)",
            beatmap.metadata.display_name(),
            lane_count,
            beatmap.metadata.overall_difficulty,
            beatmap.total_objects(),
            correction
        );
        debug!(
            "Windows 300/100/50: {}/{}/{}ms",
            windows.window300, windows.window100, windows.window50
        );

        Ok(Self {
            beatmap,
            tracks,
            range: VisibleRange::new(),
            score: ScoreMaster::new(),
            playfield: config.playfield.clone(),
            fall_time: config.fall_time,
            correction,
            map_duration,
            map_time: -correction,
            audio_started: false,
            finished: false,
            finished_early: false,
        })
    }

    /// Advance the session to `map_time` with the key state from `input`.
    pub fn tick(&mut self, map_time: i64, input: &dyn InputProvider) -> Vec<JudgeEvent> {
        self.map_time = map_time;
        if !self.audio_started && map_time >= 0 {
            self.audio_started = true;
            debug!("Audio cue {} at {}ms", self.beatmap.metadata.audio_filename, map_time);
        }

        for track in &mut self.tracks {
            track.set_state(input.is_pressed(track.key()));
        }

        let visible = self
            .range
            .advance(map_time, &self.beatmap.objects, self.fall_time);

        let mut events = Vec::new();
        for track in &mut self.tracks {
            events.extend(track.update(
                map_time,
                &mut self.beatmap.objects,
                visible.clone(),
                &mut self.score,
            ));
        }

        if !self.finished && map_time >= self.map_duration + FINISH_DELAY_MS {
            self.finished = true;
            info!("Session finished at {}ms", map_time);
        }
        events
    }

    /// Stop between ticks at the player's request.
    pub fn end_early(&mut self) {
        if !self.finished {
            info!("Session ended early at {}ms", self.map_time);
            self.finished = true;
            self.finished_early = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn finished_early(&self) -> bool {
        self.finished_early
    }

    /// Milliseconds subtracted from elapsed time to get map time.
    pub fn correction(&self) -> i64 {
        self.correction
    }

    pub fn map_time(&self) -> i64 {
        self.map_time
    }

    pub fn map_duration(&self) -> i64 {
        self.map_duration
    }

    /// Whether map time has reached zero, where the audio track starts.
    pub fn audio_started(&self) -> bool {
        self.audio_started
    }

    pub fn beatmap(&self) -> &Beatmap {
        &self.beatmap
    }

    pub fn score(&self) -> &ScoreMaster {
        &self.score
    }

    /// Key code of every lane, in lane order.
    pub fn keys(&self) -> Vec<u32> {
        self.tracks.iter().map(Track::key).collect()
    }

    pub fn lane_views(&self) -> Vec<LaneView> {
        self.tracks
            .iter()
            .map(|track| LaneView {
                lane: track.lane(),
                key: track.key(),
                pressed: track.is_pressed(),
            })
            .collect()
    }

    /// Objects currently in the visible range.
    pub fn object_views(&self) -> Vec<ObjectView> {
        let range = self.range.range();
        self.beatmap.objects[range.clone()]
            .iter()
            .zip(range)
            .map(|(object, index)| {
                view::object_view(index, object, self.map_time, self.fall_time, &self.playfield)
            })
            .collect()
    }

    pub fn hud(&self) -> HudView {
        HudView {
            map_time: self.map_time,
            score: self.score.snapshot(),
        }
    }

    pub fn open_holds(&self) -> usize {
        self.beatmap
            .objects
            .iter()
            .filter(|o| o.judgment.is_holding())
            .count()
    }

    pub fn unjudged(&self) -> usize {
        self.beatmap
            .objects
            .iter()
            .filter(|o| o.judgment.is_unjudged())
            .count()
    }

    pub fn result(&self) -> Result<PlayResult> {
        let open_holds = self.open_holds();
        if open_holds > 0 {
            warn!("{open_holds} hold(s) still held at session end, not scored");
        }
        PlayResult::new(
            self.beatmap.metadata.display_name(),
            &self.score,
            self.finished_early,
            open_holds,
            self.unjudged(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyEvent, ScriptedInput};
    use mania_model::{BeatmapMetadata, HitObject, Judgment, JudgmentState};

    fn beatmap(objects: Vec<HitObject>) -> Beatmap {
        Beatmap {
            metadata: BeatmapMetadata {
                title: "Session".to_string(),
                ..Default::default()
            },
            objects,
        }
    }

    #[test]
    fn correction_pads_early_first_object() {
        let config = Config::default();
        let s = PlaySession::new(beatmap(vec![HitObject::note(0, 500, 0)]), &config).unwrap();
        assert_eq!(s.correction(), 1500);

        let s = PlaySession::new(beatmap(vec![HitObject::note(0, 2500, 0)]), &config).unwrap();
        assert_eq!(s.correction(), 0);
    }

    #[test]
    fn correction_includes_user_offset() {
        let config = Config {
            offset: 40,
            ..Default::default()
        };
        let s = PlaySession::new(beatmap(vec![HitObject::note(0, 500, 0)]), &config).unwrap();
        assert_eq!(s.correction(), 1540);
    }

    #[test]
    fn missing_bindings_fail() {
        let mut config = Config::default();
        config.keys.lanes.remove(&4);
        assert!(PlaySession::new(beatmap(vec![]), &config).is_err());

        let mut config = Config::default();
        config.keys.lanes.insert(4, vec![1, 2]);
        assert!(PlaySession::new(beatmap(vec![]), &config).is_err());
    }

    #[test]
    fn unsorted_objects_are_sorted() {
        let map = beatmap(vec![HitObject::note(0, 3000, 0), HitObject::note(1, 1000, 0)]);
        let s = PlaySession::new(map, &Config::default()).unwrap();
        assert!(s.beatmap().is_sorted());
    }

    #[test]
    fn tick_judges_with_bound_keys() {
        let config = Config::default();
        let key = config.keys.keys_for(4).unwrap()[2];
        let mut s =
            PlaySession::new(beatmap(vec![HitObject::note(2, 3000, 0)]), &config).unwrap();
        let mut input = ScriptedInput::new(vec![KeyEvent {
            key,
            pressed: true,
            time: 3010,
        }]);

        input.poll(2990);
        assert!(s.tick(2990, &input).is_empty());
        input.poll(3010);
        let events = s.tick(3010, &input);
        assert_eq!(events.len(), 1);
        assert_eq!(
            s.beatmap().objects[0].judgment,
            JudgmentState::Judged(Judgment::ThreeHundred)
        );
        assert!(s.lane_views()[2].pressed);
        assert_eq!(s.lane_views()[2].key, key);
        assert_eq!(s.keys(), config.keys.keys_for(4).unwrap());
        assert_eq!(s.hud().score.combo, 1);
    }

    #[test]
    fn finishes_three_seconds_after_last_object() {
        let input = ScriptedInput::default();
        let mut s = PlaySession::new(
            beatmap(vec![HitObject::hold(0, 2000, 4000, 0)]),
            &Config::default(),
        )
        .unwrap();
        s.tick(6999, &input);
        assert!(!s.is_finished());
        s.tick(7000, &input);
        assert!(s.is_finished());
        assert!(!s.finished_early());
    }

    #[test]
    fn end_early_marks_result() {
        let input = ScriptedInput::default();
        let mut s = PlaySession::new(
            beatmap(vec![HitObject::note(0, 2000, 0), HitObject::note(1, 9000, 0)]),
            &Config::default(),
        )
        .unwrap();
        s.tick(2500, &input);
        s.end_early();
        let result = s.result().unwrap();
        assert!(result.finished_early);
        assert_eq!(result.unjudged, 1);
        assert_eq!(result.hit_counts.miss, 1);
    }

    #[test]
    fn object_views_follow_visible_range() {
        let input = ScriptedInput::default();
        let mut s = PlaySession::new(
            beatmap(vec![HitObject::note(0, 2000, 0), HitObject::note(1, 9000, 0)]),
            &Config::default(),
        )
        .unwrap();
        s.tick(1000, &input);
        let views = s.object_views();
        assert_eq!(views.len(), 2);
        // One fall time before the hit: top edge of the track
        assert_eq!(views[0].y, -30.0);
        assert_eq!(views[1].index, 1);
    }
}
