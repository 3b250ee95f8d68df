//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{
    Body, BodyId, ContactOutcome, circle_circle, circle_rounded_box, resolve_contact,
};
use super::input::Command;
use super::spawn::spawn_wave;
use super::state::{Effect, GameEvent, GamePhase, GameState, ResetCause};
use super::track::Direction;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Hop to the next track
    pub advance: bool,
    /// Start holding up/down
    pub drift: Option<Direction>,
    /// Touch lifted or cancelled
    pub release_drift: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn from_command(command: Command) -> Self {
        match command {
            Command::AdvanceTrack => Self {
                advance: true,
                ..Default::default()
            },
            Command::Drift(dir) => Self {
                drift: Some(dir),
                ..Default::default()
            },
            Command::TogglePause => Self {
                pause: true,
                ..Default::default()
            },
        }
    }

    /// Fold a later input into this one (inputs queued between ticks)
    pub fn merge(&mut self, other: &TickInput) {
        self.advance |= other.advance;
        // Two pause taps cancel out
        self.pause ^= other.pause;
        if other.drift.is_some() {
            self.drift = other.drift;
            self.release_drift = false;
        } else if other.release_drift {
            self.drift = None;
            self.release_drift = true;
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
            GamePhase::RoundOver => {}
        }
    }

    // Don't tick if paused or round over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    apply_input(state, input);

    // Celebration delay before the post-score reset
    if let Some(remaining) = state.celebration {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            state.reset_player(ResetCause::Scored);
        } else {
            state.celebration = Some(remaining);
        }
    }

    let waves = state.spawner.advance(dt);
    for _ in 0..waves {
        spawn_wave(state);
    }

    for enemy in &mut state.enemies {
        enemy.pos += enemy.vel * dt;
    }
    for powerup in &mut state.powerups {
        powerup.pos += powerup.vel * dt;
    }

    let drift_speed = state.tuning.drift_speed;
    if state.player.step(dt, &state.tracks, drift_speed) {
        state.events.push(GameEvent::HopFinished {
            track: state.player.track,
        });
    }

    if !state.tuning.layout.contains_y(state.player.pos.y) {
        state.reset_player(ResetCause::OutOfBounds);
    }

    resolve_contacts(state);

    let timer = state.timer.advance(dt);
    match state.timer.update_urgency(state.tuning.urgent_threshold) {
        Some(true) => state.events.push(GameEvent::TimeUrgent),
        Some(false) => state.events.push(GameEvent::TimeCalm),
        None => {}
    }
    if timer.expired {
        state.phase = GamePhase::RoundOver;
        state.events.push(GameEvent::RoundOver { score: state.score });
        log::info!("Round over, score {}", state.score);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if input.advance && state.player.track < LAST_TRACK {
        let duration = state.tuning.hop_duration;
        if let Some(to_track) = state.player.start_hop(&state.tracks, duration) {
            state.events.push(GameEvent::HopStarted { to_track });
        }
    }

    if let Some(dir) = input.drift {
        state.player.set_drift(Some(dir));
    } else if input.release_drift {
        state.player.set_drift(None);
    }
}

/// Bodies overlapping the player right now
fn touching_bodies(state: &GameState) -> Vec<BodyId> {
    let player = &state.player;
    let mut touching = Vec::new();

    for enemy in &state.enemies {
        if circle_rounded_box(
            player.pos,
            player.radius,
            enemy.box_center(),
            enemy.half_extents(),
            ENEMY_CORNER_RADIUS,
        ) {
            touching.push(BodyId::Enemy(enemy.id));
        }
    }
    for powerup in &state.powerups {
        if circle_circle(player.pos, player.radius, powerup.pos, powerup.radius) {
            touching.push(BodyId::PowerUp(powerup.id));
        }
    }
    if circle_circle(player.pos, player.radius, state.target, TARGET_RADIUS) {
        touching.push(BodyId::Target);
    }
    touching
}

fn resolve_contacts(state: &mut GameState) {
    let touching = touching_bodies(state);
    let began = state.contacts.begin(touching);
    let player = Body::player();

    for id in began {
        let Some(outcome) = resolve_contact(&player, &Body::from_id(id)) else {
            continue;
        };
        log::debug!("Contact {:?} -> {:?}", id, outcome);

        match outcome {
            ContactOutcome::Fail => {
                state.events.push(GameEvent::Failed);
                state.reset_player(ResetCause::Obstacle);
                // Player has moved; remaining contacts are stale
                break;
            }
            ContactOutcome::Score => {
                if state.celebration.is_some() {
                    continue;
                }
                state.score += 1;
                state.celebration = Some(state.tuning.celebration_seconds);
                state.events.push(GameEvent::Scored { score: state.score });
                state.events.push(GameEvent::EffectStarted(Effect::Fireworks));
            }
            ContactOutcome::Pickup { powerup_id } => {
                let Some(idx) = state.powerups.iter().position(|p| p.id == powerup_id) else {
                    continue;
                };
                let powerup = state.powerups.remove(idx);
                state.timer.add_bonus(state.tuning.powerup_time_bonus);
                state.events.push(GameEvent::PowerUpCollected {
                    track: powerup.track,
                    remaining: state.timer.remaining(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::Spawner;
    use crate::sim::state::{Enemy, EnemySize, PowerUp};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    /// A round with no spawning and the target parked off to the side
    fn quiet_state(seed: u64) -> GameState {
        let mut tuning = Tuning::default();
        tuning.layout.target = Vec2::new(-1000.0, -1000.0);
        let mut state = GameState::with_tuning(seed, tuning);
        state.spawner = Spawner::with_delay(1000.0, 1000.0);
        state.drain_events();
        state
    }

    fn advance() -> TickInput {
        TickInput {
            advance: true,
            ..Default::default()
        }
    }

    fn hop_and_land(state: &mut GameState) {
        tick(state, &advance(), SIM_DT);
        while state.player.is_hopping() {
            tick(state, &TickInput::default(), SIM_DT);
        }
    }

    #[test]
    fn test_first_wave_spawns_on_first_tick() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let obstacles = state.enemies.len();
        let powerups = state.powerups.len();
        assert!(obstacles == 7 && powerups == 0 || obstacles == 6 && powerups == 1);
    }

    #[test]
    fn test_advance_eight_times_reaches_last_track() {
        let mut state = quiet_state(1);
        for expected in 1..=8 {
            hop_and_land(&mut state);
            assert_eq!(state.player.track, expected);
        }
        assert_eq!(state.player.pos.x, state.tracks.get(8).unwrap().x);

        // No further advance possible
        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.player.track, LAST_TRACK);
        assert!(!state.player.is_hopping());
    }

    #[test]
    fn test_hop_emits_move_events() {
        let mut state = quiet_state(2);
        hop_and_land(&mut state);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::HopStarted { to_track: 1 }));
        assert!(events.contains(&GameEvent::HopFinished { track: 1 }));
    }

    #[test]
    fn test_advance_ignored_mid_hop() {
        let mut state = quiet_state(3);
        tick(&mut state, &advance(), SIM_DT);
        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.player.track, 1);
    }

    #[test]
    fn test_obstacle_contact_resets_without_scoring() {
        let mut state = quiet_state(4);
        hop_and_land(&mut state);
        hop_and_land(&mut state);
        hop_and_land(&mut state);
        assert_eq!(state.player.track, 3);
        state.score = 2;

        let id = state.next_entity_id();
        let pos = state.player.pos - Vec2::new(0.0, 10.0);
        state.enemies.push(Enemy {
            id,
            track: 3,
            size: EnemySize::Medium,
            pos,
            vel: Vec2::ZERO,
        });
        state.drain_events();

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player.track, START_TRACK);
        assert_eq!(state.player.pos, state.tuning.layout.start_position());
        assert_eq!(state.score, 2);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Failed));
        assert!(events.contains(&GameEvent::PlayerReset {
            cause: ResetCause::Obstacle
        }));
    }

    #[test]
    fn test_target_scores_then_resets_after_celebration() {
        let mut state = quiet_state(5);
        state.player.track = LAST_TRACK;
        state.player.pos = Vec2::new(500.0, 500.0);
        state.target = state.player.pos;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 1);
        assert!(state.celebration.is_some());
        assert_eq!(state.player.track, LAST_TRACK);

        // Still overlapping: no second point
        tick(&mut state, &TickInput::default(), 0.25);
        assert_eq!(state.score, 1);

        tick(&mut state, &TickInput::default(), 0.3);
        assert_eq!(state.player.track, START_TRACK);
        assert!(state.celebration.is_none());
        assert_eq!(state.score, 1);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Scored { score: 1 }));
        assert!(events.contains(&GameEvent::EffectStarted(Effect::Fireworks)));
        assert!(events.contains(&GameEvent::PlayerReset {
            cause: ResetCause::Scored
        }));
    }

    #[test]
    fn test_powerup_grants_time_once() {
        let mut state = quiet_state(6);
        let id = state.next_entity_id();
        state.powerups.push(PowerUp {
            id,
            track: 0,
            pos: state.player.pos,
            vel: Vec2::ZERO,
            radius: POWERUP_RADIUS,
        });

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.powerups.is_empty());
        assert!((state.remaining_time() - 65.0).abs() < 1e-4);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!((state.remaining_time() - 65.0).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_bounds_resets() {
        let mut state = quiet_state(7);
        state.player.track = 4;
        state.player.pos.y = state.tuning.layout.height + 5.0;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.track, START_TRACK);
        assert!(state.drain_events().contains(&GameEvent::PlayerReset {
            cause: ResetCause::OutOfBounds
        }));
    }

    #[test]
    fn test_out_of_bounds_below_zero_resets() {
        let mut state = quiet_state(13);
        state.player.track = 2;
        state.player.pos.y = 2.0;
        state.player.drift = Some(Direction::Down);

        // 300 units/s for 0.01 s takes the player to y = -1
        tick(&mut state, &TickInput::default(), 0.01);
        assert_eq!(state.player.track, START_TRACK);
        assert_eq!(state.player.pos, state.tuning.layout.start_position());
        assert!(state.player.drift.is_none());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PlayerReset {
            cause: ResetCause::OutOfBounds
        }));
        assert!(!events.contains(&GameEvent::Failed));
    }

    #[test]
    fn test_pickup_during_celebration_still_counts() {
        let mut state = quiet_state(14);
        state.player.track = LAST_TRACK;
        state.player.pos = Vec2::new(500.0, 500.0);
        state.target = state.player.pos;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.celebration.is_some());

        let id = state.next_entity_id();
        state.powerups.push(PowerUp {
            id,
            track: LAST_TRACK,
            pos: state.player.pos,
            vel: Vec2::ZERO,
            radius: POWERUP_RADIUS,
        });
        state.drain_events();
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.powerups.is_empty());
        assert!((state.remaining_time() - 65.0).abs() < 1e-4);
        assert_eq!(state.score, 1);
        assert!(state.celebration.is_some());
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::PowerUpCollected { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Scored { .. })));
    }

    #[test]
    fn test_drift_and_release() {
        let mut state = quiet_state(8);
        let start_y = state.player.pos.y;
        let up = TickInput {
            drift: Some(Direction::Up),
            ..Default::default()
        };
        tick(&mut state, &up, 0.01);
        assert!(state.player.pos.y > start_y);

        let release = TickInput {
            release_drift: true,
            ..Default::default()
        };
        tick(&mut state, &release, 0.01);
        let y = state.player.pos.y;
        tick(&mut state, &TickInput::default(), 0.01);
        assert_eq!(state.player.pos.y, y);
    }

    #[test]
    fn test_release_mid_hop_keeps_hopping() {
        let mut state = quiet_state(9);
        tick(&mut state, &advance(), SIM_DT);
        let release = TickInput {
            release_drift: true,
            ..Default::default()
        };
        tick(&mut state, &release, SIM_DT);
        assert!(state.player.is_hopping());
    }

    #[test]
    fn test_round_over_fires_once() {
        let mut tuning = Tuning::default();
        tuning.round_seconds = 2.0;
        let mut state = GameState::with_tuning(10, tuning);
        state.drain_events();

        let mut round_overs = 0;
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 0.5);
            round_overs += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundOver { .. }))
                .count();
        }
        assert_eq!(round_overs, 1);
        assert_eq!(state.phase, GamePhase::RoundOver);
        assert_eq!(state.remaining_time(), 0.0);
    }

    #[test]
    fn test_urgency_event() {
        let mut tuning = Tuning::default();
        tuning.round_seconds = 7.0;
        let mut state = GameState::with_tuning(11, tuning);
        state.spawner = Spawner::with_delay(1000.0, 1000.0);
        state.drain_events();

        tick(&mut state, &TickInput::default(), 1.0);
        assert!(!state.is_time_urgent());
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(state.is_time_urgent());
        let events = state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::TimeUrgent))
                .count(),
            1
        );
    }

    #[test]
    fn test_tick_pause() {
        let mut state = quiet_state(12);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, 1.0);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused
        tick(&mut state, &TickInput::default(), 5.0);
        assert_eq!(state.remaining_time(), 60.0);
        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.player.track, START_TRACK);

        // Unpause
        tick(&mut state, &pause, 1.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.remaining_time(), 59.0);
    }

    #[test]
    fn test_merge_inputs() {
        let mut queued = TickInput::from_command(Command::Drift(Direction::Up));
        queued.merge(&TickInput::from_command(Command::AdvanceTrack));
        assert!(queued.advance);
        assert_eq!(queued.drift, Some(Direction::Up));

        queued.merge(&TickInput {
            release_drift: true,
            ..Default::default()
        });
        assert!(queued.drift.is_none());
        assert!(queued.release_drift);

        queued.merge(&TickInput::from_command(Command::TogglePause));
        queued.merge(&TickInput::from_command(Command::TogglePause));
        assert!(!queued.pause);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            advance(),
            TickInput {
                drift: Some(Direction::Down),
                ..Default::default()
            },
            TickInput::default(),
            advance(),
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player.track, state2.player.track);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.score, state2.score);
    }

    fn input_strategy() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), 0u8..4, any::<bool>()).prop_map(|(advance, drift, pause)| TickInput {
            advance,
            drift: match drift {
                0 => Some(Direction::Up),
                1 => Some(Direction::Down),
                _ => None,
            },
            release_drift: drift == 3,
            // Rare pauses so most runs keep playing
            pause: pause && advance && drift == 0,
        })
    }

    proptest! {
        #[test]
        fn prop_round_invariants(
            seed in any::<u64>(),
            inputs in prop::collection::vec(input_strategy(), 1..400),
        ) {
            let mut state = GameState::new(seed);
            let mut last_score = 0;
            let mut round_overs = 0;

            for input in &inputs {
                tick(&mut state, input, 0.05);
                prop_assert!(state.player.track <= LAST_TRACK);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.score - last_score <= 1);
                prop_assert!(state.remaining_time() >= 0.0);
                last_score = state.score;
                round_overs += state
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::RoundOver { .. }))
                    .count();
            }
            prop_assert!(round_overs <= 1);
        }
    }
}
