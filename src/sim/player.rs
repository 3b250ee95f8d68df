//! The player sprite
//!
//! Lateral movement is a discrete, animated hop to the next track. Vertical
//! movement is the track current plus an optional held drift.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::track::{Direction, Tracks};
use crate::consts::{LAST_TRACK, PLAYER_RADIUS, START_TRACK};

/// An in-flight hop between two tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hop {
    pub from_x: f32,
    pub to_x: f32,
    /// Height the player is pinned to for the whole hop
    pub y: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl Hop {
    /// Progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Current track; updated as soon as a hop starts
    pub track: usize,
    pub pos: Vec2,
    /// Track current the player is riding
    pub vel: Vec2,
    pub radius: f32,
    pub hop: Option<Hop>,
    /// Held vertical input
    pub drift: Option<Direction>,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            track: START_TRACK,
            pos: start,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            hop: None,
            drift: None,
        }
    }

    pub fn is_hopping(&self) -> bool {
        self.hop.is_some()
    }

    /// Begin a hop to the next track
    ///
    /// No-op while a hop is in flight or on the last track. Cancels any drift.
    /// Returns the destination track when a hop started.
    pub fn start_hop(&mut self, tracks: &Tracks, duration: f32) -> Option<usize> {
        if self.is_hopping() || self.track >= LAST_TRACK {
            return None;
        }
        let next = tracks.next_index(self.track)?;
        let to_x = tracks.get(next)?.x;

        self.drift = None;
        self.hop = Some(Hop {
            from_x: self.pos.x,
            to_x,
            y: self.pos.y,
            elapsed: 0.0,
            duration,
        });
        self.track = next;
        Some(next)
    }

    /// Start or stop drifting; ignored while hopping
    pub fn set_drift(&mut self, drift: Option<Direction>) -> bool {
        if self.is_hopping() {
            return false;
        }
        self.drift = drift;
        true
    }

    /// Move for one step; returns true when a hop landed this step
    pub fn step(&mut self, dt: f32, tracks: &Tracks, drift_speed: f32) -> bool {
        if let Some(hop) = &mut self.hop {
            hop.elapsed += dt;
            let t = hop.progress();
            self.pos.x = hop.from_x + (hop.to_x - hop.from_x) * t;
            self.pos.y = hop.y;

            if hop.is_done() {
                self.hop = None;
                self.vel = if self.track == LAST_TRACK {
                    Vec2::ZERO
                } else {
                    tracks
                        .get(self.track)
                        .map(|t| t.velocity())
                        .unwrap_or(Vec2::ZERO)
                };
                return true;
            }
            return false;
        }

        let drift = self
            .drift
            .map(|d| Vec2::new(0.0, d.sign() * drift_speed))
            .unwrap_or(Vec2::ZERO);
        self.pos += (self.vel + drift) * dt;
        false
    }

    /// Back to the start track, motionless
    pub fn reset(&mut self, start: Vec2) {
        *self = Player::new(start);
    }
}
