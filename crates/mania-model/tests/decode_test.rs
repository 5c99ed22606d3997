use std::fs;
use std::path::Path;

use mania_model::{BeatmapDecoder, BeatmapError, HitObjectKind, lane_from_x};
use proptest::prelude::*;

const FOUR_KEY: &str = "\
osu file format v14

[General]
AudioFilename: song.ogg
AudioLeadIn: 1500

[Metadata]
Title:Decode Test
Artist:mania
Version:Easy

[Difficulty]
CircleSize:4
OverallDifficulty:5

[Events]
0,0,\"background.png\",0,0

[HitObjects]
64,192,1000,1,0,0:0:0:0:
448,192,1000,1,0,0:0:0:0:
192,192,2000,128,0,3000:0:0:0:0:
320,192,3500,1,2,0:0:0:0:
";

fn write_map(dir: &Path, folder: &str, name: &str, content: &str) {
    let folder = dir.join(folder);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join(name), content).unwrap();
}

#[test]
fn decode_from_file() {
    let dir = tempfile::tempdir().unwrap();
    write_map(dir.path(), "song", "map.osu", FOUR_KEY);

    let map = BeatmapDecoder::decode(&dir.path().join("song/map.osu")).unwrap();
    assert_eq!(map.metadata.title, "Decode Test");
    assert_eq!(map.metadata.audio_filename, "song.ogg");
    assert_eq!(map.metadata.audio_lead_in, 1500);
    assert_eq!(map.metadata.background.as_deref(), Some("background.png"));
    assert_eq!(map.lane_count(), 4);
    assert_eq!(map.total_objects(), 4);
    assert_eq!(map.map_duration(), 3500);
}

#[test]
fn known_x_positions_map_to_edge_lanes() {
    let map = BeatmapDecoder::decode_str(FOUR_KEY).unwrap();
    assert_eq!(map.objects[0].lane, 0);
    assert_eq!(map.objects[1].lane, 3);
    assert_eq!(map.objects[2].kind, HitObjectKind::Hold { end_time: 3000 });
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.osu");
    let err = BeatmapDecoder::decode(&path).unwrap_err();
    match err {
        BeatmapError::FileRead { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn discover_finds_beatmaps_one_level_deep() {
    let dir = tempfile::tempdir().unwrap();
    write_map(dir.path(), "b_song", "hard.osu", FOUR_KEY);
    write_map(dir.path(), "a_song", "easy.OSU", FOUR_KEY);
    write_map(dir.path(), "a_song", "notes.txt", "not a map");
    fs::write(dir.path().join("loose.osu"), FOUR_KEY).unwrap();

    let found = BeatmapDecoder::discover(dir.path()).unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["easy.OSU", "hard.osu", "loose.osu"]);
}

#[test]
fn discover_missing_root_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(BeatmapDecoder::discover(&dir.path().join("missing")).is_err());
}

proptest! {
    #[test]
    fn lane_always_in_range(x in -1024i32..2048, lanes in 1usize..=10) {
        prop_assert!(lane_from_x(x, lanes) < lanes);
    }

    #[test]
    fn lane_is_monotonic_in_x(x in 0i32..511, lanes in 1usize..=10) {
        prop_assert!(lane_from_x(x, lanes) <= lane_from_x(x + 1, lanes));
    }
}
