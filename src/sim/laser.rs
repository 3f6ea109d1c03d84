//! Projectiles fired by ships (and the lingering explosion effects)
//!
//! A laser lives in exactly one roster, player-fired or enemy-fired, and is
//! dropped the moment it hits something or leaves the playfield.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::LaserType;
use super::mask::{CollisionMask, Sprite, collide};
use crate::consts::*;

/// Movement policy of a laser type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaserPattern {
    /// Straight line at the type's velocity
    #[default]
    Normal,
    /// Hold still for a while, then park far off-screen (explosion effects)
    Delayed,
    /// Drift right for a half-period, then left, while travelling
    Weave,
    /// Mirror phase of `Weave`
    Weave2,
}

impl LaserPattern {
    /// Apply one frame of movement; `timer` is the laser's pattern-local counter
    pub fn step(self, pos: &mut Vec2, timer: &mut u32, velocity: f32) {
        match self {
            LaserPattern::Normal => {
                pos.y += velocity;
            }
            LaserPattern::Delayed => {
                if *timer < DELAY_FRAMES {
                    *timer += 1;
                } else {
                    pos.y = PARKED_Y;
                }
            }
            LaserPattern::Weave | LaserPattern::Weave2 => {
                let first_half = *timer % (2 * WEAVE_HALF_PERIOD) < WEAVE_HALF_PERIOD;
                let rightward = first_half == (self == LaserPattern::Weave);
                pos.x += if rightward { WEAVE_STEP } else { -WEAVE_STEP };
                pos.y += velocity;
                *timer = timer.wrapping_add(1);
            }
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Laser {
    /// Top-left corner
    pub pos: Vec2,
    /// Pattern-local frame counter
    pub move_timer: u32,
    kind: Arc<LaserType>,
}

impl Laser {
    pub fn new(kind: Arc<LaserType>, pos: Vec2) -> Self {
        Self {
            pos,
            move_timer: 0,
            kind,
        }
    }

    /// Laser type name (catalog key)
    pub fn kind(&self) -> &str {
        &self.kind.name
    }

    pub fn damage(&self) -> u32 {
        self.kind.damage
    }

    pub fn velocity(&self) -> f32 {
        self.kind.velocity
    }

    pub fn cooldown(&self) -> u32 {
        self.kind.cooldown
    }

    pub fn pattern(&self) -> LaserPattern {
        self.kind.pattern
    }

    /// Footprint name, for the renderer
    pub fn sprite(&self) -> &str {
        &self.kind.footprint.name
    }

    /// Zero-damage lasers are purely visual and never hit anything
    pub fn is_effect(&self) -> bool {
        self.kind.damage == 0
    }

    /// Move one frame according to the type's pattern
    pub fn advance(&mut self) {
        let velocity = self.kind.velocity;
        self.kind
            .pattern
            .step(&mut self.pos, &mut self.move_timer, velocity);
    }

    /// Outside `[top, height)` vertically
    pub fn is_off_screen(&self, top: f32, height: f32) -> bool {
        self.pos.y < top || self.pos.y >= height
    }

    /// Pixel-accurate hit test against a ship (effects never hit)
    pub fn collides_with<S: Sprite + ?Sized>(&self, target: &S) -> bool {
        !self.is_effect() && collide(target, self)
    }
}

impl Sprite for Laser {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn mask(&self) -> &CollisionMask {
        &self.kind.footprint.mask
    }
}
