//! Color Game entry point
//!
//! Headless native runner: plays one round with the demo player at a fixed
//! frame rate, prints the result and saves stats.
//!
//! Usage: `color-game [--seed N] [--tuning PATH] [--settings PATH] [--stats PATH]`

use std::path::PathBuf;

use color_game::audio::AudioManager;
use color_game::highscores::{format_age, now_ms};
use color_game::persistence::JsonFileStore;
use color_game::{Scene, Session, Settings, Tuning};

const DEFAULT_STATS_PATH: &str = "color_game_stats.json";
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 10;

#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    tuning: Option<PathBuf>,
    settings: Option<PathBuf>,
    stats: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--seed" => {
                let raw = value()?;
                args.seed = Some(raw.parse().map_err(|_| format!("bad seed: {}", raw))?);
            }
            "--tuning" => args.tuning = Some(value()?.into()),
            "--settings" => args.settings = Some(value()?.into()),
            "--stats" => args.stats = Some(value()?.into()),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn run(args: Args) -> color_game::Result<()> {
    let seed = args.seed.unwrap_or_else(|| now_ms() as u64);
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let stats_path = args
        .stats
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATS_PATH));

    let mut audio = AudioManager::from_settings(&settings);
    let mut session = Session::new(seed, tuning, Box::new(JsonFileStore::new(&stats_path)))?;
    session.set_settings(settings);
    session.set_idle_mode(true);

    let mut frames = 0;
    while session.scene() == Scene::Game && frames < MAX_FRAMES {
        session.update(FRAME_DT);
        audio.handle_events(&session.drain_events());
        for playback in audio.drain() {
            log::debug!("play {} ({:.2})", playback.cue.file_name(), playback.volume);
        }
        frames += 1;
    }

    match session.scene() {
        Scene::GameOver {
            score,
            high_score,
            rank,
        } => {
            println!("Seed {}: scored {} (best {})", seed, score, high_score);
            if let Some(rank) = rank {
                println!("New leaderboard entry at #{}", rank);
            }
        }
        Scene::Game => {
            log::warn!("Round still running after {} frames", frames);
            println!("Seed {}: unfinished, score {}", seed, session.state().score);
        }
    }

    let stats = session.stats()?;
    println!("Rounds played: {}", stats.rounds_played);
    let now = now_ms();
    for (i, entry) in stats.leaderboard.entries.iter().enumerate() {
        println!(
            "{:>2}. {:>3}  seed {:<20} {}",
            i + 1,
            entry.score,
            entry.seed,
            format_age(entry.timestamp, now)
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Color Game (native) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: color-game [--seed N] [--tuning PATH] [--settings PATH] [--stats PATH]");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
