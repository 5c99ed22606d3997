// mania: command-line front end for the timing and judgment engine.
//
// Inspects beatmaps and runs headless play sessions driven by autoplay or a
// recorded key script.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};

use mania_config::Config;
use mania_model::{Beatmap, BeatmapDecoder};
use mania_play::{
    AutoplayInput, GameLoop, InputProvider, ManualTimeProvider, PlayResult, PlaySession,
    ScriptedInput, SystemTimeProvider, TimeProvider,
};
use mania_rule::{HitWindows, JudgeEvent};

#[derive(Parser, Debug)]
#[command(name = "mania", about = "Vertical-scrolling rhythm game timing engine")]
struct Args {
    /// Path to config JSON file.
    #[arg(long, default_value = "config.json", env = "MANIA_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show metadata, object counts and hit windows of a beatmap.
    Info {
        beatmap: PathBuf,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List beatmaps found under the song folder.
    List {
        /// Folder to scan (defaults to the configured songpath).
        root: Option<PathBuf>,
    },
    /// Play a beatmap headless and print the result.
    Play {
        beatmap: PathBuf,
        /// Let the engine press every object on time.
        #[arg(long, conflicts_with = "replay")]
        autoplay: bool,
        /// JSON key script: [{"key": u32, "pressed": bool, "time": ms}, ...]
        #[arg(long)]
        replay: Option<PathBuf>,
        /// Pace frames against the wall clock instead of a simulated one.
        #[arg(long)]
        realtime: bool,
        /// Write the autoplay key script here.
        #[arg(long, requires = "autoplay")]
        record: Option<PathBuf>,
        /// Print every judgment as it happens.
        #[arg(long)]
        verbose: bool,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration.
    Config {
        /// Also write it (with defaults filled in) to the config path.
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load_or_default(&args.config);

    match args.command {
        Command::Info { beatmap, json } => info_command(&beatmap, json),
        Command::List { root } => list_command(&root.unwrap_or_else(|| config.songpath())),
        Command::Play {
            beatmap,
            autoplay,
            replay,
            realtime,
            record,
            verbose,
            json,
        } => {
            let options = PlayOptions {
                autoplay,
                replay,
                realtime,
                record,
                verbose,
            };
            let result = play_command(&beatmap, &config, &options)?;
            if json {
                println!("{}", result.to_json()?);
            } else {
                println!("{}", result.summary());
            }
            Ok(())
        }
        Command::Config { write } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if write {
                config.write(&args.config)?;
                info!("Wrote {}", args.config.display());
            }
            Ok(())
        }
    }
}

fn info_command(path: &Path, json: bool) -> Result<()> {
    let beatmap = BeatmapDecoder::decode(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&beatmap.metadata)?);
        return Ok(());
    }

    let meta = &beatmap.metadata;
    let windows = HitWindows::from_od(meta.overall_difficulty);
    println!("{}", meta.display_name());
    println!("Creator:   {}", meta.creator);
    println!("Audio:     {} (lead-in {}ms)", meta.audio_filename, meta.audio_lead_in);
    if let Some(bg) = &meta.background {
        println!("Background: {bg}");
    }
    println!("Keys:      {}K", meta.lane_count);
    println!("OD:        {}", meta.overall_difficulty);
    println!(
        "Windows:   300 ±{}ms  100 ±{}ms  50 ±{}ms",
        windows.window300, windows.window100, windows.window50
    );
    println!(
        "Objects:   {} ({} notes, {} holds)",
        beatmap.total_objects(),
        beatmap.note_count(),
        beatmap.hold_count()
    );
    println!("Length:    {}", format_duration(beatmap.map_duration()));
    Ok(())
}

fn list_command(root: &Path) -> Result<()> {
    let paths = BeatmapDecoder::discover(root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    let mut found = 0;
    for path in &paths {
        match BeatmapDecoder::decode(path) {
            Ok(beatmap) => {
                found += 1;
                println!(
                    "{:>2}K  {}  ({})",
                    beatmap.lane_count(),
                    beatmap.metadata.display_name(),
                    path.display()
                );
            }
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
    }
    info!("{} playable beatmap(s) under {}", found, root.display());
    Ok(())
}

struct PlayOptions {
    autoplay: bool,
    replay: Option<PathBuf>,
    realtime: bool,
    record: Option<PathBuf>,
    verbose: bool,
}

fn play_command(path: &Path, config: &Config, options: &PlayOptions) -> Result<PlayResult> {
    let beatmap = BeatmapDecoder::decode(path)?;

    if options.autoplay {
        let keys = config
            .keys
            .keys_for(beatmap.lane_count())
            .with_context(|| format!("No key bindings for {}K", beatmap.lane_count()))?;
        let input = AutoplayInput::new(&beatmap, keys);
        if let Some(record) = &options.record {
            std::fs::write(record, input.script().to_json()?)
                .with_context(|| format!("Failed to write {}", record.display()))?;
            info!("Saved autoplay script to {}", record.display());
        }
        run_with_clock(beatmap, config, input, options)
    } else if let Some(replay) = &options.replay {
        let input = ScriptedInput::load(replay)?.with_exit_key(config.keys.exit);
        run_with_clock(beatmap, config, input, options)
    } else {
        bail!("No input source: pass --autoplay or --replay <file>");
    }
}

fn run_with_clock<I: InputProvider>(
    beatmap: Beatmap,
    config: &Config,
    input: I,
    options: &PlayOptions,
) -> Result<PlayResult> {
    if options.realtime {
        run_session(beatmap, config, SystemTimeProvider::new(), input, options.verbose)
    } else {
        run_session(beatmap, config, ManualTimeProvider::new(), input, options.verbose)
    }
}

fn run_session<T: TimeProvider, I: InputProvider>(
    beatmap: Beatmap,
    config: &Config,
    clock: T,
    input: I,
    verbose: bool,
) -> Result<PlayResult> {
    let session = PlaySession::new(beatmap, config)?;
    let mut game = GameLoop::new(session, clock, input, config.max_frame_per_second);
    game.run_with(|session, events| {
        if !verbose {
            return;
        }
        for event in events {
            if let JudgeEvent::Judged {
                index,
                judgment,
                offset,
            } = event
            {
                let object = &session.beatmap().objects[*index];
                println!(
                    "{:>8}ms  lane {}  {:>4}  {:+}ms  combo {}",
                    session.map_time(),
                    object.lane,
                    judgment.to_string(),
                    offset,
                    session.score().combo()
                );
            }
        }
    })
}

fn format_duration(ms: i64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_format() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(61_500), "1:01");
        assert_eq!(format_duration(600_000), "10:00");
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["mania", "play", "map.osu", "--autoplay", "--json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.json"));
        match args.command {
            Command::Play { autoplay, json, replay, .. } => {
                assert!(autoplay);
                assert!(json);
                assert!(replay.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn autoplay_and_replay_conflict() {
        let parsed = Args::try_parse_from([
            "mania", "play", "map.osu", "--autoplay", "--replay", "keys.json",
        ]);
        assert!(parsed.is_err());
    }
}
