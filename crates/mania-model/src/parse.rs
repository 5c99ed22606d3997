use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{BeatmapError, FormatError, ParseError};
use crate::hit_object::{HitObject, lane_from_x};
use crate::model::{Beatmap, BeatmapMetadata};

/// Type flag bit for a single tap.
const TYPE_NOTE: i32 = 0b0000_0001;
/// Type flag bit for a mania hold.
const TYPE_HOLD: i32 = 0b1000_0000;

/// Minimum fields on a hit object line: x, y, time, type, hitSound.
const BASE_FIELDS: usize = 5;
/// Holds also carry `endTime:hitSample`.
const HOLD_FIELDS: usize = 6;

/// Beatmap (`.osu`) decoder
pub struct BeatmapDecoder;

impl BeatmapDecoder {
    pub fn decode(path: &Path) -> Result<Beatmap, BeatmapError> {
        let content = std::fs::read_to_string(path).map_err(|source| BeatmapError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::decode_str(&content)?;
        info!(
            "Loaded beatmap {} ({} objects, {} lanes)",
            path.display(),
            model.total_objects(),
            model.lane_count()
        );
        Ok(model)
    }

    /// Decode using the beatmap's own `CircleSize` as lane count.
    pub fn decode_str(content: &str) -> Result<Beatmap, BeatmapError> {
        Self::decode_inner(content, None)
    }

    /// Decode with an explicit lane count, overriding `CircleSize`.
    pub fn decode_str_with_lanes(content: &str, lane_count: usize) -> Result<Beatmap, BeatmapError> {
        if lane_count == 0 {
            return Err(ParseError::InvalidValue {
                key: "lane count",
                value: lane_count.to_string(),
            }
            .into());
        }
        Self::decode_inner(content, Some(lane_count))
    }

    /// List `.osu` files in `root` and one directory level below it, sorted by path.
    pub fn discover(root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_dir() {
                for inner in std::fs::read_dir(&path)? {
                    let inner = inner?.path();
                    if is_beatmap_file(&inner) {
                        found.push(inner);
                    }
                }
            } else if is_beatmap_file(&path) {
                found.push(path);
            }
        }
        found.sort();
        debug!("Discovered {} beatmaps under {}", found.len(), root.display());
        Ok(found)
    }

    fn decode_inner(content: &str, lane_override: Option<usize>) -> Result<Beatmap, BeatmapError> {
        let document = Document::new(content);
        let metadata = parse_metadata(&document, lane_override)?;

        let start = document
            .find("HitObjects")
            .ok_or(ParseError::MissingSection("HitObjects"))?;
        let mut objects = Vec::new();
        for (index, line) in document.body(start) {
            objects.push(parse_hit_object(index + 1, line, metadata.lane_count)?);
        }

        let mut model = Beatmap { metadata, objects };
        if !model.is_sorted() {
            warn!("Hit objects are not in chronological order, sorting by time");
            model.objects.sort_by_key(|o| o.time);
        }
        debug!(
            "Decoded {} notes and {} holds",
            model.note_count(),
            model.hold_count()
        );
        Ok(model)
    }
}

fn is_beatmap_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("osu"))
}

/// Line view over the source, with section lookup.
struct Document<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Document<'a> {
    fn new(content: &'a str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        Self {
            lines: content.lines().collect(),
        }
    }

    /// Index of the `[name]` marker line.
    fn find(&self, name: &str) -> Option<usize> {
        self.lines.iter().position(|line| {
            line.trim()
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .is_some_and(|section| section == name)
        })
    }

    /// Lines of a key/value section: from the marker up to the first blank line,
    /// the next section marker or the end of input. Comments are skipped.
    fn section(&self, marker: usize) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines
            .iter()
            .copied()
            .enumerate()
            .skip(marker + 1)
            .map(|(i, line)| (i, line.trim()))
            .take_while(|(_, line)| !line.is_empty() && !line.starts_with('['))
            .filter(|(_, line)| !line.starts_with("//"))
    }

    /// Lines of a list section (hit objects): blank lines are skipped rather than terminating.
    fn body(&self, marker: usize) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines
            .iter()
            .copied()
            .enumerate()
            .skip(marker + 1)
            .map(|(i, line)| (i, line.trim()))
            .take_while(|(_, line)| !line.starts_with('['))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"))
    }

    fn key_values(&self, name: &'static str) -> Result<Vec<(&'a str, &'a str)>, ParseError> {
        let marker = self.find(name).ok_or(ParseError::MissingSection(name))?;
        let mut pairs = Vec::new();
        for (index, line) in self.section(marker) {
            match line.split_once(':') {
                Some((key, value)) => pairs.push((key.trim(), value.trim())),
                None => warn!("[{name}] line {}: ignoring {line:?}", index + 1),
            }
        }
        Ok(pairs)
    }
}

fn lookup<'a>(pairs: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn require<'a>(
    pairs: &[(&'a str, &'a str)],
    section: &'static str,
    key: &'static str,
) -> Result<&'a str, ParseError> {
    lookup(pairs, key).ok_or(ParseError::MissingKey { section, key })
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_metadata(
    document: &Document<'_>,
    lane_override: Option<usize>,
) -> Result<BeatmapMetadata, ParseError> {
    let general = document.key_values("General")?;
    let metadata = document.key_values("Metadata")?;
    let difficulty = document.key_values("Difficulty")?;

    let audio_filename = require(&general, "General", "AudioFilename")?.to_string();
    let audio_lead_in = match lookup(&general, "AudioLeadIn") {
        Some(value) => parse_number("AudioLeadIn", value)?,
        None => 0,
    };

    let circle_size = require(&difficulty, "Difficulty", "CircleSize")?;
    let lane_count = match lane_override {
        Some(lanes) => lanes,
        None => {
            let size: f64 = parse_number("CircleSize", circle_size)?;
            if !size.is_finite() || size.round() < 1.0 {
                return Err(ParseError::InvalidValue {
                    key: "CircleSize",
                    value: circle_size.to_string(),
                });
            }
            size.round() as usize
        }
    };

    let od_value = require(&difficulty, "Difficulty", "OverallDifficulty")?;
    let overall_difficulty: f64 = parse_number("OverallDifficulty", od_value)?;
    if !overall_difficulty.is_finite() {
        return Err(ParseError::InvalidValue {
            key: "OverallDifficulty",
            value: od_value.to_string(),
        });
    }

    let text = |key: &str| lookup(&metadata, key).unwrap_or_default().to_string();

    Ok(BeatmapMetadata {
        audio_filename,
        audio_lead_in,
        title: text("Title"),
        artist: text("Artist"),
        creator: text("Creator"),
        version: text("Version"),
        lane_count,
        overall_difficulty,
        background: find_background(document),
    })
}

/// Background image from a `0,0,"file"` event line.
fn find_background(document: &Document<'_>) -> Option<String> {
    let marker = document.find("Events")?;
    document.section(marker).find_map(|(_, line)| {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match fields.as_slice() {
            ["0", "0", file, ..] => Some(file.trim_matches('"').to_string()),
            _ => None,
        }
    })
}

fn parse_field<T: std::str::FromStr>(
    line: usize,
    field: &'static str,
    value: &str,
) -> Result<T, FormatError> {
    value.trim().parse().map_err(|_| FormatError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

/// Parse one `x,y,time,type,hitSound[,endTime:hitSample]` line.
fn parse_hit_object(line: usize, text: &str, lane_count: usize) -> Result<HitObject, BeatmapError> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() < BASE_FIELDS {
        return Err(FormatError::FieldCount {
            line,
            expected: BASE_FIELDS,
            found: fields.len(),
        }
        .into());
    }

    let x: i32 = parse_field(line, "x", fields[0])?;
    let time: i64 = parse_field(line, "time", fields[2])?;
    let flags: i32 = parse_field(line, "type", fields[3])?;
    let hit_sound: i32 = parse_field(line, "hitSound", fields[4])?;
    let lane = lane_from_x(x, lane_count);

    if flags & TYPE_NOTE != 0 {
        Ok(HitObject::note(lane, time, hit_sound))
    } else if flags & TYPE_HOLD != 0 {
        let Some(extra) = fields.get(HOLD_FIELDS - 1) else {
            return Err(FormatError::FieldCount {
                line,
                expected: HOLD_FIELDS,
                found: fields.len(),
            }
            .into());
        };
        let end_token = extra.split(':').next().unwrap_or_default();
        let end_time: i64 = parse_field(line, "endTime", end_token)?;
        Ok(HitObject::hold(lane, time, end_time, hit_sound))
    } else {
        Err(ParseError::UnsupportedObjectType { line, flags }.into())
    }
}
