//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::ContactTracker;
use super::player::Player;
use super::spawn::Spawner;
use super::timer::RoundTimer;
use super::track::Tracks;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clock running
    Playing,
    /// Everything frozen
    Paused,
    /// Clock ran out
    RoundOver,
}

/// Obstacle size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemySize {
    Small,
    Medium,
    Large,
}

impl EnemySize {
    pub const ALL: [EnemySize; 3] = [EnemySize::Small, EnemySize::Medium, EnemySize::Large];

    /// Obstacle length along the track
    pub fn height(self) -> f32 {
        match self {
            EnemySize::Small => 70.0,
            EnemySize::Medium => 100.0,
            EnemySize::Large => 130.0,
        }
    }
}

/// An obstacle moving along a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub track: usize,
    pub size: EnemySize,
    /// Centre of the bottom edge
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Enemy {
    /// Centre of the collision box
    pub fn box_center(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, self.size.height() / 2.0)
    }

    /// Half extents of the collision box
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(ENEMY_WIDTH / 2.0, self.size.height() / 2.0)
    }
}

/// A bonus-time pickup moving along a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub track: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Why the player went back to the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    /// Ran into an obstacle
    Obstacle,
    /// Left the visible height
    OutOfBounds,
    /// Celebration after scoring finished
    Scored,
}

/// Particle effects the simulation asks a front end to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Idle glow attached to the player
    Pulse,
    /// Burst shown after reaching the target
    Fireworks,
}

impl Effect {
    pub fn file_name(self) -> &'static str {
        match self {
            Effect::Pulse => "pulse.sks",
            Effect::Fireworks => "fireworks.sks",
        }
    }
}

/// Things that happened during a tick, for audio/HUD/effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    HopStarted { to_track: usize },
    HopFinished { track: usize },
    /// Player ran into an obstacle
    Failed,
    Scored { score: u32 },
    PowerUpCollected { track: usize, remaining: f32 },
    PlayerReset { cause: ResetCause },
    EffectStarted(Effect),
    EffectEnded(Effect),
    WaveSpawned { powerup_track: Option<usize>, enemies: usize },
    Culled { count: usize },
    /// Remaining time dropped to the urgency threshold
    TimeUrgent,
    /// A bonus lifted remaining time back above the threshold
    TimeCalm,
    Paused,
    Resumed,
    RoundOver { score: u32 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG, advanced by every random decision
    rng: Pcg32,
    pub tuning: Tuning,
    pub tracks: Tracks,
    pub phase: GamePhase,
    /// Targets reached this round
    pub score: u32,
    pub timer: RoundTimer,
    pub spawner: Spawner,
    pub player: Player,
    /// Active obstacles (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Active power-ups (sorted by id for determinism)
    pub powerups: Vec<PowerUp>,
    pub target: Vec2,
    pub contacts: ContactTracker,
    /// Seconds left before the post-score reset
    pub celebration: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new round with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new round; tracks are rolled from the seed
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let tracks = Tracks::generate(&tuning, &mut rng);
        let start = tuning.layout.start_position();

        let mut state = Self {
            seed,
            rng,
            tracks,
            phase: GamePhase::Playing,
            score: 0,
            timer: RoundTimer::new(tuning.round_seconds),
            spawner: Spawner::new(tuning.spawn_interval),
            player: Player::new(start),
            enemies: Vec::new(),
            powerups: Vec::new(),
            target: tuning.layout.target,
            contacts: ContactTracker::default(),
            celebration: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        log::info!("Round started (seed {})", seed);
        state.events.push(GameEvent::RoundStarted);
        state.events.push(GameEvent::EffectStarted(Effect::Pulse));
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn remaining_time(&self) -> f32 {
        self.timer.remaining()
    }

    pub fn is_time_urgent(&self) -> bool {
        self.timer.is_urgent()
    }

    /// Put the player back on the start track with no motion
    pub fn reset_player(&mut self, cause: ResetCause) {
        log::debug!("Player reset ({:?}) from track {}", cause, self.player.track);
        self.player.reset(self.tuning.layout.start_position());
        self.contacts.clear();
        if self.celebration.take().is_some() {
            self.events.push(GameEvent::EffectEnded(Effect::Fireworks));
        }
        self.events.push(GameEvent::PlayerReset { cause });
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.powerups.sort_by_key(|p| p.id);
    }
}
