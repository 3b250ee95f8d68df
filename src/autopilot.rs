//! Demo player
//!
//! Reads the current `GameState` and produces the `TickInput` a cautious
//! player would: hop when the next lane is clear, keep away from the screen
//! edges, and on the last track steer onto the target.

use crate::consts::LAST_TRACK;
use crate::sim::{Direction, GamePhase, GameState, TickInput};

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Extra seconds watched past the hop itself
    pub lookahead: f32,
    /// Clearance added to the player radius
    pub margin: f32,
    /// Fraction of the arena height treated as the danger zone at each edge
    pub edge_fraction: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lookahead: 0.3,
            margin: 10.0,
            edge_fraction: 0.2,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input for the next tick
    pub fn input(&self, state: &GameState) -> TickInput {
        // Pausing and resuming stay with the player
        if state.phase != GamePhase::Playing {
            return TickInput::default();
        }

        let player = &state.player;
        if player.is_hopping() || state.celebration.is_some() {
            return TickInput::default();
        }

        if let Some(next) = state.tracks.next_index(player.track) {
            let window = state.tuning.hop_duration + self.lookahead;
            if self.lane_clear(state, next, player.pos.y, 0.0, window) {
                return TickInput {
                    advance: true,
                    ..Default::default()
                };
            }
        }

        let desired = self.desired_drift(state);
        if desired == player.drift {
            TickInput::default()
        } else if desired.is_some() {
            TickInput {
                drift: desired,
                ..Default::default()
            }
        } else {
            TickInput {
                release_drift: true,
                ..Default::default()
            }
        }
    }

    fn desired_drift(&self, state: &GameState) -> Option<Direction> {
        let player = &state.player;
        let layout = &state.tuning.layout;

        let wanted = if player.track == LAST_TRACK {
            let dy = state.target.y - player.pos.y;
            if dy.abs() <= player.radius {
                None
            } else if dy > 0.0 {
                Some(Direction::Up)
            } else {
                Some(Direction::Down)
            }
        } else {
            let edge = layout.height * self.edge_fraction;
            if player.pos.y < edge {
                Some(Direction::Up)
            } else if player.pos.y > layout.height - edge {
                Some(Direction::Down)
            } else {
                None
            }
        }?;

        let vy = player.vel.y + wanted.sign() * state.tuning.drift_speed;
        self.lane_clear(state, player.track, player.pos.y, vy, self.lookahead)
            .then_some(wanted)
    }

    /// True when no obstacle on `track` sweeps across `y` within `window`
    /// seconds, for a player moving at `vy`
    fn lane_clear(&self, state: &GameState, track: usize, y: f32, vy: f32, window: f32) -> bool {
        let clearance = state.player.radius + self.margin;
        state.enemies.iter().filter(|e| e.track == track).all(|enemy| {
            let travel = (enemy.vel.y - vy) * window;
            let low = enemy.pos.y.min(enemy.pos.y + travel) - clearance;
            let high = enemy.pos.y.max(enemy.pos.y + travel) + enemy.size.height() + clearance;
            y < low || y > high
        })
    }
}
