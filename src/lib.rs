//! Color Game - A track-hopping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tracks, spawning, contacts, round timer)
//! - `session`: Fixed-timestep driver, scene transitions, round-end saving
//! - `persistence`: Score/stat storage behind an explicit store trait
//! - `tuning`: Data-driven game balance and arena layout
//! - `autopilot`: Demo player that generates inputs

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use session::{Scene, Session};
pub use settings::Settings;
pub use tuning::{ArenaLayout, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of tracks (indices 0..=8)
    pub const TRACK_COUNT: usize = 9;
    /// Track the player starts on and returns to after a reset
    pub const START_TRACK: usize = 0;
    /// Last track; the exit side of the arena
    pub const LAST_TRACK: usize = TRACK_COUNT - 1;
    /// Tracks that receive obstacles each spawn tick
    pub const SPAWN_TRACKS: std::ops::RangeInclusive<usize> = 1..=7;
    /// Tracks eligible for a power-up
    pub const POWERUP_TRACKS: std::ops::RangeInclusive<usize> = 1..=6;

    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Power-up collision radius
    pub const POWERUP_RADIUS: f32 = 20.0;
    /// Target collision radius
    pub const TARGET_RADIUS: f32 = 30.0;

    /// Obstacle width (all size classes)
    pub const ENEMY_WIDTH: f32 = 20.0;
    /// Obstacle corner rounding
    pub const ENEMY_CORNER_RADIUS: f32 = 8.0;
}
