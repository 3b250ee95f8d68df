//! Contact categories and resolution
//!
//! Bodies carry a category bit and a contact-test mask. A contact between two
//! bodies is resolved by checking each body against the category constants
//! directly, so argument order never matters.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sdf::{circle_touches, sd_circle, sd_rounded_box};

bitflags! {
    /// Physics category bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Category: u32 {
        const PLAYER = 1 << 0;
        const ENEMY = 1 << 1;
        const TARGET = 1 << 2;
        const POWERUP = 1 << 3;
    }
}

/// Which entity a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyId {
    Player,
    Enemy(u32),
    PowerUp(u32),
    Target,
}

/// A participant in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub id: BodyId,
    pub category: Category,
    /// Categories this body reports contacts with
    pub contact_test: Category,
}

impl Body {
    pub fn player() -> Self {
        Self {
            id: BodyId::Player,
            category: Category::PLAYER,
            contact_test: Category::ENEMY | Category::TARGET | Category::POWERUP,
        }
    }

    pub fn enemy(id: u32) -> Self {
        Self {
            id: BodyId::Enemy(id),
            category: Category::ENEMY,
            contact_test: Category::empty(),
        }
    }

    pub fn powerup(id: u32) -> Self {
        Self {
            id: BodyId::PowerUp(id),
            category: Category::POWERUP,
            contact_test: Category::empty(),
        }
    }

    pub fn target() -> Self {
        Self {
            id: BodyId::Target,
            category: Category::TARGET,
            contact_test: Category::empty(),
        }
    }

    /// Body for an id, with the category that id always has
    pub fn from_id(id: BodyId) -> Self {
        match id {
            BodyId::Player => Self::player(),
            BodyId::Enemy(i) => Self::enemy(i),
            BodyId::PowerUp(i) => Self::powerup(i),
            BodyId::Target => Self::target(),
        }
    }
}

/// Gameplay result of a player contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// Player ran into an obstacle
    Fail,
    /// Player reached the target
    Score,
    /// Player picked up a power-up
    Pickup { powerup_id: u32 },
}

/// Resolve a contact between two bodies, in either order
///
/// Returns `None` for pairs that do not involve the player, or whose
/// categories the player does not test against.
pub fn resolve_contact(a: &Body, b: &Body) -> Option<ContactOutcome> {
    let (player, other) = if a.category == Category::PLAYER {
        (a, b)
    } else if b.category == Category::PLAYER {
        (b, a)
    } else {
        return None;
    };

    if !player.contact_test.contains(other.category) || other.category.is_empty() {
        return None;
    }

    if other.category == Category::ENEMY {
        Some(ContactOutcome::Fail)
    } else if other.category == Category::TARGET {
        Some(ContactOutcome::Score)
    } else if other.category == Category::POWERUP {
        match other.id {
            BodyId::PowerUp(powerup_id) => Some(ContactOutcome::Pickup { powerup_id }),
            _ => None,
        }
    } else {
        None
    }
}

/// Circle against circle
#[inline]
pub fn circle_circle(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    circle_touches(sd_circle(a, b, b_radius), a_radius)
}

/// Circle against a rounded box
#[inline]
pub fn circle_rounded_box(
    center: Vec2,
    radius: f32,
    box_center: Vec2,
    half_extents: Vec2,
    corner: f32,
) -> bool {
    circle_touches(sd_rounded_box(center, box_center, half_extents, corner), radius)
}

/// Turns per-tick overlap sets into "contact began" notifications
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactTracker {
    touching: Vec<BodyId>,
}

impl ContactTracker {
    /// Record the bodies touching the player this tick; returns the ones that
    /// were not touching last tick, in the order given
    pub fn begin(&mut self, now_touching: Vec<BodyId>) -> Vec<BodyId> {
        let began = now_touching
            .iter()
            .filter(|id| !self.touching.contains(*id))
            .copied()
            .collect();
        self.touching = now_touching;
        began
    }

    /// Forget everything (player respawned)
    pub fn clear(&mut self) {
        self.touching.clear();
    }

    pub fn is_touching(&self, id: BodyId) -> bool {
        self.touching.contains(&id)
    }
}
