use serde::{Deserialize, Serialize};

pub const TRACK_HEIGHT_MIN: i32 = 100;
pub const TRACK_HEIGHT_MAX: i32 = 4320;
pub const TRACK_WIDTH_MIN: i32 = 10;
pub const TRACK_WIDTH_MAX: i32 = 1000;

/// Pixel layout of the lanes, consumed by whatever draws the playfield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct PlayfieldConfig {
    pub track_width: i32,
    pub track_height: i32,
    pub track_spacing: i32,
    pub note_height: i32,
    /// Width of the thin body drawn between a hold's two ends
    pub hold_width: i32,
    /// Height of the hit line above the bottom edge
    pub hit_distance: i32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            track_width: 100,
            track_height: 800,
            track_spacing: 0,
            note_height: 30,
            hold_width: 80,
            hit_distance: 100,
        }
    }
}

impl PlayfieldConfig {
    pub fn validate(&mut self) {
        self.track_width = self.track_width.clamp(TRACK_WIDTH_MIN, TRACK_WIDTH_MAX);
        self.track_height = self.track_height.clamp(TRACK_HEIGHT_MIN, TRACK_HEIGHT_MAX);
        self.track_spacing = self.track_spacing.clamp(0, TRACK_WIDTH_MAX);
        self.hold_width = self.hold_width.clamp(1, self.track_width);
        // The hit line must leave room for notes to fall
        self.hit_distance = self.hit_distance.clamp(0, self.track_height - 1);
        self.note_height = self.note_height.clamp(1, self.track_height);
    }

    /// Horizontal offset of the hold body inside its lane.
    pub fn hold_x(&self) -> f64 {
        (self.track_width - self.hold_width) as f64 / 2.0
    }

    /// Total width of `lanes` tracks with spacing on both outer edges.
    pub fn total_width(&self, lanes: usize) -> i32 {
        lanes as i32 * (self.track_width + self.track_spacing) + self.track_spacing
    }

    /// Left edge of `lane` with the playfield centred in `screen_width`.
    pub fn lane_x(&self, lane: usize, lanes: usize, screen_width: i32) -> i32 {
        let x_offset = (screen_width - self.total_width(lanes)) / 2;
        (self.track_width + self.track_spacing) * lane as i32 + x_offset
    }
}
