//! Data-driven game balance
//!
//! Every number the round rules depend on lives here so a level designer can
//! override it from a JSON file. Missing fields fall back to the defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TRACK_COUNT;
use crate::error::{Error, Result};

/// Arena geometry: visible area, track centre lines and the target spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// Visible width
    pub width: f32,
    /// Visible height; entities outside [0, height] are off-screen
    pub height: f32,
    /// X position of each track, indexed by track number
    pub track_x: Vec<f32>,
    /// Centre of the target circle
    pub target: Vec2,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        let track_x: Vec<f32> = (0..TRACK_COUNT).map(|i| 224.0 + i as f32 * 200.0).collect();
        let target = Vec2::new(track_x[TRACK_COUNT - 1], 768.0);
        Self {
            width: 2048.0,
            height: 1536.0,
            track_x,
            target,
        }
    }
}

impl ArenaLayout {
    /// Where a fresh player appears
    pub fn start_position(&self) -> Vec2 {
        Vec2::new(self.track_x.first().copied().unwrap_or(0.0), self.height / 2.0)
    }

    /// Whether a y coordinate is inside the visible height
    pub fn contains_y(&self, y: f32) -> bool {
        (0.0..=self.height).contains(&y)
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Round length in seconds
    pub round_seconds: f32,
    /// Remaining time at or below which the clock is "urgent"
    pub urgent_threshold: f32,
    /// Seconds granted per power-up
    pub powerup_time_bonus: f32,
    /// Seconds between spawn waves
    pub spawn_interval: f32,
    /// Chance that a wave carries a power-up
    pub powerup_chance: f64,
    /// Speeds a track may be assigned (units/s)
    pub track_speeds: Vec<f32>,
    /// Duration of a lateral hop
    pub hop_duration: f32,
    /// Vertical drift speed while up/down is held (units/s)
    pub drift_speed: f32,
    /// How far past the screen edge entities spawn
    pub spawn_offset: f32,
    /// How far past the screen edge entities are culled
    pub cull_margin: f32,
    /// Delay between scoring and the player reset
    pub celebration_seconds: f32,
    pub layout: ArenaLayout,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_seconds: 60.0,
            urgent_threshold: 5.0,
            powerup_time_bonus: 5.0,
            spawn_interval: 2.0,
            powerup_chance: 0.5,
            track_speeds: vec![180.0, 200.0, 250.0],
            hop_duration: 0.2,
            // 3 units every 0.01s
            drift_speed: 300.0,
            spawn_offset: 130.0,
            cull_margin: 150.0,
            celebration_seconds: 0.5,
            layout: ArenaLayout::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Write tuning to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidTuning(msg.to_string()));

        if self.layout.track_x.len() != TRACK_COUNT {
            return invalid("layout.track_x must list exactly 9 tracks");
        }
        if self.layout.width <= 0.0 || self.layout.height <= 0.0 {
            return invalid("layout dimensions must be positive");
        }
        if self.track_speeds.is_empty() || self.track_speeds.iter().any(|s| *s <= 0.0) {
            return invalid("track_speeds must be non-empty and positive");
        }
        if self.round_seconds < 1.0 {
            return invalid("round_seconds must be at least 1");
        }
        if self.spawn_interval <= 0.0 || self.hop_duration <= 0.0 {
            return invalid("spawn_interval and hop_duration must be positive");
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return invalid("powerup_chance must be within [0, 1]");
        }
        let negative = |v: f32| v.is_nan() || v < 0.0;
        // Time may only ever grow through a pickup
        if negative(self.powerup_time_bonus) {
            return invalid("powerup_time_bonus must not be negative");
        }
        if negative(self.drift_speed)
            || negative(self.urgent_threshold)
            || negative(self.celebration_seconds)
        {
            return invalid("drift_speed, urgent_threshold and celebration_seconds must not be negative");
        }
        // Otherwise fresh spawns would be swept on the wave they appear
        if self.cull_margin <= self.spawn_offset {
            return invalid("cull_margin must exceed spawn_offset");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.layout.track_x.len(), TRACK_COUNT);
        assert_eq!(tuning.layout.target.x, tuning.layout.track_x[8]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "round_seconds": 30.0 }"#).unwrap();
        assert_eq!(tuning.round_seconds, 30.0);
        assert_eq!(tuning.spawn_interval, 2.0);
        assert_eq!(tuning.track_speeds, vec![180.0, 200.0, 250.0]);
    }

    #[test]
    fn test_rejects_wrong_track_count() {
        let json = r#"{ "layout": { "track_x": [0.0, 100.0] } }"#;
        let err = Tuning::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_cull_inside_spawn() {
        let json = r#"{ "spawn_offset": 200.0, "cull_margin": 150.0 }"#;
        assert!(Tuning::from_json_str(json).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let cases = [
            Tuning {
                powerup_chance: 1.5,
                ..Default::default()
            },
            Tuning {
                powerup_chance: f64::NAN,
                ..Default::default()
            },
            Tuning {
                powerup_time_bonus: -5.0,
                ..Default::default()
            },
            Tuning {
                drift_speed: -300.0,
                ..Default::default()
            },
            Tuning {
                celebration_seconds: -1.0,
                ..Default::default()
            },
        ];
        for tuning in cases {
            assert!(
                matches!(tuning.validate(), Err(Error::InvalidTuning(_))),
                "{:?} accepted",
                tuning
            );
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json_str("{ round_seconds").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_start_position() {
        let layout = ArenaLayout::default();
        let start = layout.start_position();
        assert_eq!(start.x, layout.track_x[0]);
        assert_eq!(start.y, layout.height / 2.0);
        assert!(layout.contains_y(0.0));
        assert!(!layout.contains_y(-0.1));
    }
}
