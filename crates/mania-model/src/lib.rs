// Beatmap data model: parser, hit objects, judgment state

mod error;
mod hit_object;
mod judgment;
mod model;
mod parse;

pub use error::{BeatmapError, FormatError, ParseError};
pub use hit_object::{HitObject, HitObjectKind, PLAYFIELD_WIDTH, lane_from_x};
pub use judgment::{Judgment, JudgmentState, RAW_HOLDING, RAW_UNJUDGED};
pub use model::{Beatmap, BeatmapMetadata};
pub use parse::BeatmapDecoder;
