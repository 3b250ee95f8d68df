//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod input;
pub mod player;
pub mod sdf;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;
pub mod track;

pub use collision::{Body, BodyId, Category, ContactOutcome, ContactTracker, resolve_contact};
pub use input::{Command, HudLayout, TouchPhase};
pub use player::{Hop, Player};
pub use spawn::{SpawnPlan, Spawner, apply_plan, cull_offscreen, spawn_wave};
pub use state::{
    Effect, Enemy, EnemySize, GameEvent, GamePhase, GameState, PowerUp, ResetCause,
};
pub use tick::{TickInput, tick};
pub use timer::{RoundTimer, TimerTick};
pub use track::{Direction, Track, Tracks};
