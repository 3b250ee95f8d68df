//! Touch input routing
//!
//! A touch is hit-tested against named HUD buttons; the topmost button under
//! the finger decides the command.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tick::TickInput;
use super::track::Direction;
use crate::tuning::ArenaLayout;

/// Gameplay commands a touch can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AdvanceTrack,
    /// Start holding up or down
    Drift(Direction),
    TogglePause,
}

impl Command {
    /// Command bound to a button name
    pub fn for_button(name: &str) -> Option<Self> {
        match name {
            "right" => Some(Command::AdvanceTrack),
            "up" => Some(Command::Drift(Direction::Up)),
            "down" => Some(Command::Drift(Direction::Down)),
            "pause" => Some(Command::TogglePause),
            _ => None,
        }
    }
}

/// Lifecycle of a single touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Ended,
    Cancelled,
}

/// A named, axis-aligned hit area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    pub min: Vec2,
    pub max: Vec2,
}

impl Button {
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// HUD buttons in back-to-front order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudLayout {
    buttons: Vec<Button>,
}

impl HudLayout {
    /// Standard control layout for an arena: arrows bottom-left, pause top-right
    pub fn for_arena(layout: &ArenaLayout) -> Self {
        let size = Vec2::splat(120.0);
        let margin = 40.0;
        let mut hud = Self::default();
        hud.add("up", Vec2::new(margin, margin + size.y + 20.0), size);
        hud.add("down", Vec2::new(margin, margin), size);
        hud.add("right", Vec2::new(margin + size.x + 20.0, margin), size);
        hud.add(
            "pause",
            Vec2::new(layout.width - margin - size.x, layout.height - margin - size.y),
            size,
        );
        hud
    }

    /// Add a button on top of the existing ones
    pub fn add(&mut self, name: &str, origin: Vec2, size: Vec2) {
        self.buttons.push(Button {
            name: name.to_string(),
            min: origin,
            max: origin + size,
        });
    }

    pub fn button(&self, name: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.name == name)
    }

    /// Name of the topmost button at a location
    pub fn hit_test(&self, location: Vec2) -> Option<&str> {
        self.buttons
            .iter()
            .rev()
            .find(|b| b.contains(location))
            .map(|b| b.name.as_str())
    }

    /// Command for a touch at a location
    pub fn route(&self, location: Vec2) -> Option<Command> {
        self.hit_test(location).and_then(Command::for_button)
    }

    /// Translate a touch into one tick's input
    pub fn touch(&self, phase: TouchPhase, location: Vec2) -> TickInput {
        match phase {
            TouchPhase::Began => self
                .route(location)
                .map(TickInput::from_command)
                .unwrap_or_default(),
            TouchPhase::Ended | TouchPhase::Cancelled => TickInput {
                release_drift: true,
                ..Default::default()
            },
        }
    }
}
