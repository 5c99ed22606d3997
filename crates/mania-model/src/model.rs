use serde::{Deserialize, Serialize};

use crate::hit_object::HitObject;

/// Header data gathered from `[General]`, `[Metadata]`, `[Difficulty]` and `[Events]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapMetadata {
    // General
    pub audio_filename: String,
    /// Audio offset correction (`AudioLeadIn`) in milliseconds
    pub audio_lead_in: i64,

    // Metadata
    pub title: String,
    pub artist: String,
    pub creator: String,
    pub version: String,

    // Difficulty
    /// Lane count (`CircleSize` in mania beatmaps)
    pub lane_count: usize,
    pub overall_difficulty: f64,

    // Events
    /// Background image file, if the beatmap declares one
    pub background: Option<String>,
}

impl Default for BeatmapMetadata {
    fn default() -> Self {
        Self {
            audio_filename: String::new(),
            audio_lead_in: 0,
            title: String::new(),
            artist: String::new(),
            creator: String::new(),
            version: String::new(),
            lane_count: 4,
            overall_difficulty: 5.0,
            background: None,
        }
    }
}

impl BeatmapMetadata {
    /// "Artist - Title [Version]", skipping empty parts.
    pub fn display_name(&self) -> String {
        let mut name = match (self.artist.is_empty(), self.title.is_empty()) {
            (false, false) => format!("{} - {}", self.artist, self.title),
            (true, false) => self.title.clone(),
            (false, true) => self.artist.clone(),
            (true, true) => "Unknown".to_string(),
        };
        if !self.version.is_empty() {
            name.push_str(&format!(" [{}]", self.version));
        }
        name
    }
}

/// Complete beatmap: metadata plus the time-ordered hit object arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Beatmap {
    pub metadata: BeatmapMetadata,
    /// All hit objects, sorted ascending by `time`
    pub objects: Vec<HitObject>,
}

impl Beatmap {
    pub fn lane_count(&self) -> usize {
        self.metadata.lane_count
    }

    pub fn total_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn note_count(&self) -> usize {
        self.objects.iter().filter(|o| !o.is_hold()).count()
    }

    pub fn hold_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_hold()).count()
    }

    /// Indices of the objects in one lane, in timeline order.
    pub fn lane_objects(&self, lane: usize) -> Vec<usize> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.lane == lane)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn first_object_time(&self) -> Option<i64> {
        self.objects.first().map(|o| o.time)
    }

    /// Time in ms at which the last object (hold end included) finishes.
    pub fn map_duration(&self) -> i64 {
        self.objects
            .iter()
            .map(HitObject::last_time)
            .max()
            .unwrap_or(0)
    }

    pub fn is_sorted(&self) -> bool {
        self.objects.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Reset every object back to unjudged.
    pub fn reset_judgments(&mut self) {
        for object in &mut self.objects {
            object.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::{Judgment, JudgmentState};

    fn sample() -> Beatmap {
        Beatmap {
            metadata: BeatmapMetadata::default(),
            objects: vec![
                HitObject::note(0, 500, 0),
                HitObject::hold(1, 800, 3000, 0),
                HitObject::note(0, 1200, 0),
            ],
        }
    }

    #[test]
    fn duration_includes_hold_end() {
        assert_eq!(sample().map_duration(), 3000);
        assert_eq!(Beatmap::default().map_duration(), 0);
    }

    #[test]
    fn lane_objects_keeps_order() {
        assert_eq!(sample().lane_objects(0), vec![0, 2]);
        assert_eq!(sample().lane_objects(1), vec![1]);
        assert!(sample().lane_objects(3).is_empty());
    }

    #[test]
    fn counts() {
        let map = sample();
        assert_eq!(map.total_objects(), 3);
        assert_eq!(map.note_count(), 2);
        assert_eq!(map.hold_count(), 1);
        assert_eq!(map.first_object_time(), Some(500));
        assert!(map.is_sorted());
    }

    #[test]
    fn reset_clears_judgments() {
        let mut map = sample();
        map.objects[0].judgment = JudgmentState::Judged(Judgment::Hundred);
        map.objects[1].judgment = JudgmentState::Holding;
        map.reset_judgments();
        assert!(map.objects.iter().all(|o| o.judgment.is_unjudged()));
    }

    #[test]
    fn display_name() {
        let mut meta = BeatmapMetadata {
            artist: "Camellia".to_string(),
            title: "Exit This Earth's Atomosphere".to_string(),
            version: "4K Hard".to_string(),
            ..Default::default()
        };
        assert_eq!(
            meta.display_name(),
            "Camellia - Exit This Earth's Atomosphere [4K Hard]"
        );
        meta.artist.clear();
        meta.version.clear();
        assert_eq!(meta.display_name(), "Exit This Earth's Atomosphere");
    }
}
