//! Track (lane) model
//!
//! Nine vertical lanes laid out left to right. Each gets a direction and a
//! speed once per round; everything spawned on a track inherits them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{LAST_TRACK, SPAWN_TRACKS, TRACK_COUNT};
use crate::tuning::Tuning;

/// Travel direction along a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing y
    Up,
    /// Toward decreasing y
    Down,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// A single lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub index: usize,
    pub x: f32,
    pub direction: Direction,
    pub speed: f32,
}

impl Track {
    /// Velocity of anything riding this track
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(0.0, self.speed * self.direction.sign())
    }

    /// Off-screen y where entities enter, on the side they travel away from
    pub fn spawn_y(&self, height: f32, offset: f32) -> f32 {
        match self.direction {
            Direction::Up => -offset,
            Direction::Down => height + offset,
        }
    }

    /// Scene node name ("0".."8")
    pub fn name(&self) -> String {
        self.index.to_string()
    }
}

/// All tracks for a round, fixed once generated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracks {
    tracks: Vec<Track>,
}

impl Tracks {
    /// Roll a direction and speed for every track
    pub fn generate<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        let speeds = &tuning.track_speeds;
        let tracks = (0..TRACK_COUNT)
            .map(|index| {
                let speed = if speeds.is_empty() {
                    0.0
                } else {
                    speeds[rng.random_range(0..speeds.len())]
                };
                let direction = if rng.random_bool(0.5) {
                    Direction::Up
                } else {
                    Direction::Down
                };
                Track {
                    index,
                    x: tuning.layout.track_x.get(index).copied().unwrap_or(0.0),
                    direction,
                    speed,
                }
            })
            .collect();
        Self { tracks }
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Look a track up by its scene node name
    pub fn by_name(&self, name: &str) -> Option<&Track> {
        name.parse::<usize>().ok().and_then(|i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Index of the track after `index`, if any
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.tracks.len()).then_some(next)
    }

    /// Track 0 and the last track are reserved for start and exit
    pub fn is_spawnable(index: usize) -> bool {
        SPAWN_TRACKS.contains(&index) && index != LAST_TRACK
    }
}
