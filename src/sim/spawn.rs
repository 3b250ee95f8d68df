//! Spawn scheduler
//!
//! Every `spawn_interval` seconds a wave goes out: one obstacle per spawn
//! track, except that half the time one track carries a power-up instead.
//! Each wave ends with a sweep that drops everything that has left the
//! screen, which is the only place transient entities are freed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EnemySize, GameEvent, GameState, PowerUp};
use super::track::Tracks;
use crate::consts::{POWERUP_RADIUS, POWERUP_TRACKS, SPAWN_TRACKS};

/// Repeating wave clock; the first wave is due immediately
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    interval: f32,
    until_next: f32,
}

impl Spawner {
    pub fn new(interval: f32) -> Self {
        Self {
            // A zero interval would spin forever in `advance`
            interval: interval.max(0.01),
            until_next: 0.0,
        }
    }

    /// Clock whose first wave is `first_in` seconds away
    pub fn with_delay(interval: f32, first_in: f32) -> Self {
        Self {
            until_next: first_in,
            ..Self::new(interval)
        }
    }

    /// Advance the clock; returns how many waves are due
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.until_next -= dt;
        let mut due = 0;
        while self.until_next <= 0.0 {
            due += 1;
            self.until_next += self.interval;
        }
        due
    }
}

/// What one wave will contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnPlan {
    pub powerup_track: Option<usize>,
    /// (track, size) for every obstacle, in track order
    pub enemies: Vec<(usize, EnemySize)>,
}

impl SpawnPlan {
    /// Build a plan from fixed choices
    ///
    /// A power-up track outside the eligible range is dropped.
    pub fn new(powerup_track: Option<usize>, mut size_for: impl FnMut(usize) -> EnemySize) -> Self {
        let powerup_track = powerup_track.filter(|t| POWERUP_TRACKS.contains(t));
        let enemies = SPAWN_TRACKS
            .filter(|t| Some(*t) != powerup_track && Tracks::is_spawnable(*t))
            .map(|t| (t, size_for(t)))
            .collect();
        Self {
            powerup_track,
            enemies,
        }
    }

    /// Roll a plan: coin flip for a power-up, then a size per obstacle
    ///
    /// A chance outside [0, 1] is pinned to the nearest end, NaN counts as 0.
    pub fn roll<R: Rng>(rng: &mut R, powerup_chance: f64) -> Self {
        let chance = if powerup_chance >= 1.0 {
            1.0
        } else if powerup_chance > 0.0 {
            powerup_chance
        } else {
            0.0
        };
        let powerup_track = rng
            .random_bool(chance)
            .then(|| rng.random_range(POWERUP_TRACKS));
        Self::new(powerup_track, |_| {
            EnemySize::ALL[rng.random_range(0..EnemySize::ALL.len())]
        })
    }
}

/// Roll and spawn one wave, then sweep
pub fn spawn_wave(state: &mut GameState) {
    let chance = state.tuning.powerup_chance;
    let plan = SpawnPlan::roll(state.rng_mut(), chance);
    apply_plan(state, &plan);
}

/// Create the entities of a plan, then cull off-screen ones
pub fn apply_plan(state: &mut GameState, plan: &SpawnPlan) {
    let height = state.tuning.layout.height;
    let offset = state.tuning.spawn_offset;

    if let Some(track) = plan.powerup_track.and_then(|t| state.tracks.get(t).cloned()) {
        let id = state.next_entity_id();
        state.powerups.push(PowerUp {
            id,
            track: track.index,
            pos: Vec2::new(track.x, track.spawn_y(height, offset)),
            vel: track.velocity(),
            radius: POWERUP_RADIUS,
        });
    }

    let mut spawned = 0;
    for &(index, size) in &plan.enemies {
        let Some(track) = state.tracks.get(index).cloned() else {
            continue;
        };
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            track: index,
            size,
            pos: Vec2::new(track.x, track.spawn_y(height, offset)),
            vel: track.velocity(),
        });
        spawned += 1;
    }

    log::debug!(
        "Wave spawned: {} obstacles, power-up on {:?}",
        spawned,
        plan.powerup_track
    );
    state.events.push(GameEvent::WaveSpawned {
        powerup_track: plan.powerup_track,
        enemies: spawned,
    });

    let culled = cull_offscreen(state);
    if culled > 0 {
        state.events.push(GameEvent::Culled { count: culled });
    }
}

/// Remove obstacles and power-ups beyond the cull margin; returns the count
pub fn cull_offscreen(state: &mut GameState) -> usize {
    let low = -state.tuning.cull_margin;
    let high = state.tuning.layout.height + state.tuning.cull_margin;
    let visible = |y: f32| y >= low && y <= high;

    let before = state.enemies.len() + state.powerups.len();
    state.enemies.retain(|e| visible(e.pos.y));
    state.powerups.retain(|p| visible(p.pos.y));
    before - state.enemies.len() - state.powerups.len()
}
