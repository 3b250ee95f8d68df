//! Game session driver
//!
//! Runs the simulation at a fixed timestep from variable frame times, routes
//! touches into tick input and owns the round-end transition to the
//! game-over scene, where stats are written through the supplied store.

use glam::Vec2;

use crate::autopilot::Autopilot;
use crate::consts::*;
use crate::error::Result;
use crate::highscores::now_ms;
use crate::persistence::{GameStats, ScoreStore};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, HudLayout, TickInput, TouchPhase, tick};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Game,
    GameOver {
        score: u32,
        high_score: u32,
        /// Leaderboard rank, if the score made it
        rank: Option<usize>,
    },
}

pub struct Session {
    state: GameState,
    store: Box<dyn ScoreStore>,
    settings: Settings,
    scene: Scene,
    hud: HudLayout,
    accumulator: f32,
    input: TickInput,
    events: Vec<GameEvent>,
    /// Idle/demo mode - AI plays the game
    autopilot: Option<Autopilot>,
}

impl Session {
    /// Start a round; the tuning is validated first
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn ScoreStore>) -> Result<Self> {
        tuning.validate()?;
        let hud = HudLayout::for_arena(&tuning.layout);
        let mut state = GameState::with_tuning(seed, tuning);
        let events = state.drain_events();
        Ok(Self {
            state,
            store,
            settings: Settings::default(),
            scene: Scene::Game,
            hud,
            accumulator: 0.0,
            input: TickInput::default(),
            events,
            autopilot: None,
        })
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Let the demo player drive
    pub fn set_idle_mode(&mut self, on: bool) {
        self.autopilot = on.then(Autopilot::new);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn hud(&self) -> &HudLayout {
        &self.hud
    }

    /// Stats as the store currently has them
    pub fn stats(&self) -> Result<GameStats> {
        self.store.load()
    }

    /// Queue input for the next tick
    pub fn queue_input(&mut self, input: &TickInput) {
        self.input.merge(input);
    }

    /// Route a touch through the HUD buttons
    pub fn touch(&mut self, phase: TouchPhase, location: Vec2) {
        if self.scene != Scene::Game {
            return;
        }
        let input = self.hud.touch(phase, location);
        self.queue_input(&input);
    }

    /// Run simulation ticks for one frame
    pub fn update(&mut self, dt: f32) {
        if self.scene != Scene::Game {
            return;
        }

        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let mut input = self.input.clone();
            if let Some(pilot) = &self.autopilot {
                input.merge(&pilot.input(&self.state));
            }
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = TickInput::default();
            self.events.extend(self.state.drain_events());

            if self.state.phase == GamePhase::RoundOver {
                self.finish_round();
                break;
            }
        }
    }

    /// Record the round and switch to the game-over scene
    fn finish_round(&mut self) {
        let score = self.state.score;
        let mut stats = match self.store.load() {
            Ok(stats) => stats,
            Err(e) => {
                log::warn!("Could not load stats, starting fresh: {}", e);
                GameStats::default()
            }
        };
        let rank = stats.record(score, self.state.seed, now_ms());
        if let Err(e) = self.store.save(&stats) {
            log::warn!("Could not save stats: {}", e);
        }

        log::info!(
            "Game over: score {}, best {}, rounds {}",
            score,
            stats.high_score,
            stats.rounds_played
        );
        self.accumulator = 0.0;
        self.scene = Scene::GameOver {
            score,
            high_score: stats.high_score,
            rank,
        };
    }

    /// Everything that happened since the last drain
    ///
    /// Pulse and fireworks are left out when the settings turn effects off.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.events);
        if !self.settings.effective_effects() {
            events.retain(|e| {
                !matches!(e, GameEvent::EffectStarted(_) | GameEvent::EffectEnded(_))
            });
        }
        events
    }

    /// Reset game state for a new round with the same tuning
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::with_tuning(seed, tuning);
        self.events.extend(self.state.drain_events());
        self.scene = Scene::Game;
        self.accumulator = 0.0;
        self.input = TickInput::default();
    }

    /// Continue a saved round; its tuning is validated first
    pub fn load_state(&mut self, state: GameState) -> Result<()> {
        state.tuning.validate()?;
        self.hud = HudLayout::for_arena(&state.tuning.layout);
        self.state = state;
        self.scene = if self.state.phase == GamePhase::RoundOver {
            let score = self.state.score;
            let best = match self.store.load() {
                Ok(stats) => stats.high_score,
                Err(e) => {
                    log::warn!("Could not load stats: {}", e);
                    0
                }
            };
            Scene::GameOver {
                score,
                high_score: best.max(score),
                rank: None,
            }
        } else {
            Scene::Game
        };
        self.accumulator = 0.0;
        self.input = TickInput::default();
        Ok(())
    }
}
