//! Ships: the shared hull plus player and enemy specialisations

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, LaserType, Species};
use super::laser::Laser;
use super::mask::{CollisionMask, Footprint, Sprite, collide};
use crate::consts::*;
use crate::error::SimError;

/// Enemy movement policy (selected per species)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePattern {
    /// Straight down at species speed
    #[default]
    Down,
    /// Down at species speed while sliding sideways, reversing every half-period
    Zigzag,
}

impl MovePattern {
    pub fn step(self, pos: &mut Vec2, timer: &mut u32, speed: f32) {
        match self {
            MovePattern::Down => {
                pos.y += speed;
            }
            MovePattern::Zigzag => {
                let rightward = *timer % (2 * WEAVE_HALF_PERIOD) < WEAVE_HALF_PERIOD;
                pos.x += if rightward { speed } else { -speed };
                pos.y += speed;
                *timer = timer.wrapping_add(1);
            }
        }
    }
}

/// Which way a ship's guns point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Up,
    Down,
}

/// State every ship carries: position, health, gun and cooldown
#[derive(Debug, Clone)]
pub struct Hull {
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per frame
    pub speed: f32,
    health: u32,
    max_health: u32,
    cooldown: u32,
    footprint: Footprint,
    weapon: Arc<LaserType>,
    explosion: Arc<LaserType>,
}

impl Hull {
    pub fn new(
        pos: Vec2,
        health: u32,
        speed: f32,
        footprint: Footprint,
        weapon: Arc<LaserType>,
        explosion: Arc<LaserType>,
    ) -> Self {
        Self {
            pos,
            speed,
            health,
            max_health: health,
            cooldown: 0,
            footprint,
            weapon,
            explosion,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Frames until the next shot is allowed
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn laser_type(&self) -> &str {
        &self.weapon.name
    }

    /// Footprint name, for the renderer
    pub fn sprite(&self) -> &str {
        &self.footprint.name
    }

    pub fn width(&self) -> f32 {
        self.footprint.width()
    }

    pub fn height(&self) -> f32 {
        self.footprint.height()
    }

    pub fn centre(&self) -> Vec2 {
        self.pos + Vec2::new(self.width(), self.height()) / 2.0
    }

    /// Lose health, never below zero
    pub fn deplete_health(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Regain health, never above the maximum
    pub fn recover_health(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Set health directly (clamped to the maximum)
    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    /// Tick the gun cooldown down by one frame
    pub fn cool_down(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Fire if the gun is ready; returns whether a laser was spawned
    pub fn fire(&mut self, facing: Facing, roster: &mut Vec<Laser>) -> bool {
        if self.cooldown != 0 {
            return false;
        }
        let laser_width = self.weapon.footprint.width();
        let x = self.pos.x + self.width() / 2.0 - laser_width / 2.0;
        let y = match facing {
            Facing::Up => self.pos.y - MUZZLE_GAP,
            Facing::Down => self.pos.y + self.height(),
        };
        roster.push(Laser::new(self.weapon.clone(), Vec2::new(x, y)));
        self.cooldown = self.weapon.cooldown;
        true
    }

    /// Leave an explosion where the ship is; roster bookkeeping is the caller's
    pub fn explode(&self, roster: &mut Vec<Laser>) {
        let pos = Vec2::new(
            self.pos.x - EXPLOSION_OFFSET + self.width() / 2.0,
            self.pos.y - EXPLOSION_OFFSET,
        );
        roster.push(Laser::new(self.explosion.clone(), pos));
    }
}

impl Sprite for Hull {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn mask(&self) -> &CollisionMask {
        &self.footprint.mask
    }
}

/// The ship the player flies
#[derive(Debug, Clone)]
pub struct PlayerShip {
    pub hull: Hull,
}

impl PlayerShip {
    /// Player ship from the catalog loadout, top-left at `pos`
    pub fn new(catalog: &Catalog, pos: Vec2) -> Self {
        let loadout = catalog.player();
        Self {
            hull: Hull::new(
                pos,
                loadout.health,
                loadout.speed,
                loadout.footprint.clone(),
                loadout.weapon.clone(),
                loadout.explosion.clone(),
            ),
        }
    }

    /// Horizontally centred, `offset` above the bottom of the playfield
    pub fn spawn(catalog: &Catalog, width: f32, height: f32, offset: f32) -> Self {
        let mut player = Self::new(catalog, Vec2::ZERO);
        player.hull.pos = Vec2::new(width / 2.0 - player.hull.width() / 2.0, height - offset);
        player
    }

    /// Move by `direction` (components in -1..=1) times ship speed
    pub fn steer(&mut self, direction: Vec2) {
        self.hull.pos += direction * self.hull.speed;
    }

    /// Keep the whole sprite inside the playfield, above the HUD strip
    pub fn clamp_to(&mut self, width: f32, height: f32, hud_margin: f32) {
        let max_x = (width - self.hull.width()).max(0.0);
        let max_y = (height - hud_margin - self.hull.height()).max(0.0);
        self.hull.pos.x = self.hull.pos.x.clamp(0.0, max_x);
        self.hull.pos.y = self.hull.pos.y.clamp(0.0, max_y);
    }

    pub fn shoot(&mut self, roster: &mut Vec<Laser>) -> bool {
        self.hull.fire(Facing::Up, roster)
    }

    pub fn explode(&self, roster: &mut Vec<Laser>) {
        self.hull.explode(roster);
    }
}

impl Sprite for PlayerShip {
    fn position(&self) -> Vec2 {
        self.hull.pos
    }

    fn mask(&self) -> &CollisionMask {
        self.hull.mask()
    }
}

/// A scripted enemy; identity is roster membership
#[derive(Debug, Clone)]
pub struct EnemyShip {
    pub hull: Hull,
    species: Arc<Species>,
    /// Pattern-local frame counter
    pub move_timer: u32,
}

impl EnemyShip {
    /// Enemy of the named species, top-left at `pos`
    pub fn new(catalog: &Catalog, species: &str, pos: Vec2) -> Result<Self, SimError> {
        Ok(Self::from_species(catalog.species(species)?.clone(), pos))
    }

    pub fn from_species(species: Arc<Species>, pos: Vec2) -> Self {
        let hull = Hull::new(
            pos,
            species.health,
            species.speed,
            species.footprint.clone(),
            species.weapon.clone(),
            species.explosion.clone(),
        );
        Self {
            hull,
            species,
            move_timer: 0,
        }
    }

    pub fn species(&self) -> &str {
        &self.species.name
    }

    /// Score awarded when this ship is shot down
    pub fn points(&self) -> u32 {
        self.species.points
    }

    /// Move one frame according to the species' pattern
    pub fn advance(&mut self) {
        let speed = self.hull.speed;
        self.species
            .pattern
            .step(&mut self.hull.pos, &mut self.move_timer, speed);
    }

    pub fn shoot(&mut self, roster: &mut Vec<Laser>) -> bool {
        self.hull.fire(Facing::Down, roster)
    }

    pub fn explode(&self, roster: &mut Vec<Laser>) {
        self.hull.explode(roster);
    }

    /// Has the ship sunk past the bottom edge of the playfield?
    pub fn is_past_bottom(&self, height: f32) -> bool {
        self.hull.pos.y > height - self.hull.height()
    }

    pub fn collides_with<S: Sprite + ?Sized>(&self, other: &S) -> bool {
        collide(other, self)
    }
}

impl Sprite for EnemyShip {
    fn position(&self) -> Vec2 {
        self.hull.pos
    }

    fn mask(&self) -> &CollisionMask {
        self.hull.mask()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_health_clamps_both_ways() {
        let mut player = PlayerShip::new(&catalog(), Vec2::ZERO);
        player.hull.deplete_health(30);
        assert_eq!(player.hull.health(), 70);
        player.hull.recover_health(500);
        assert_eq!(player.hull.health(), 100);
        player.hull.deplete_health(1000);
        assert_eq!(player.hull.health(), 0);
        assert!(player.hull.is_destroyed());
        player.hull.set_health(250);
        assert_eq!(player.hull.health(), 100);
    }

    #[test]
    fn test_shoot_is_gated_by_cooldown() {
        let mut player = PlayerShip::new(&catalog(), Vec2::new(100.0, 500.0));
        let mut lasers = Vec::new();
        assert!(player.shoot(&mut lasers));
        assert!(!player.shoot(&mut lasers));
        assert_eq!(lasers.len(), 1);
        assert_eq!(player.hull.cooldown(), 15);

        for _ in 0..14 {
            player.hull.cool_down();
        }
        assert!(!player.shoot(&mut lasers));
        player.hull.cool_down();
        assert!(player.shoot(&mut lasers));
        assert_eq!(lasers.len(), 2);
    }

    #[test]
    fn test_cool_down_floors_at_zero() {
        let mut player = PlayerShip::new(&catalog(), Vec2::ZERO);
        player.hull.cool_down();
        assert_eq!(player.hull.cooldown(), 0);
    }

    #[test]
    fn test_player_muzzle_is_centred_above_hull() {
        let mut player = PlayerShip::new(&catalog(), Vec2::new(100.0, 500.0));
        let mut lasers = Vec::new();
        player.shoot(&mut lasers);
        // 64-wide hull, 16-wide blast
        assert_eq!(lasers[0].pos, Vec2::new(124.0, 490.0));
        assert_eq!(lasers[0].kind(), "player_green");
    }

    #[test]
    fn test_enemy_muzzle_is_below_hull() {
        let mut enemy = EnemyShip::new(&catalog(), "squid", Vec2::new(64.0, 100.0)).unwrap();
        let mut lasers = Vec::new();
        assert!(enemy.shoot(&mut lasers));
        // 32-wide hull, 8-wide spark
        assert_eq!(lasers[0].pos, Vec2::new(76.0, 132.0));
        assert!(lasers[0].velocity() > 0.0);
    }

    #[test]
    fn test_explode_centres_blast_on_hull() {
        let player = PlayerShip::new(&catalog(), Vec2::new(200.0, 600.0));
        let mut lasers = Vec::new();
        player.explode(&mut lasers);
        assert_eq!(lasers.len(), 1);
        assert_eq!(lasers[0].pos, Vec2::new(168.0, 536.0));
        assert_eq!(lasers[0].kind(), "explosion_zero");
    }

    #[test]
    fn test_unknown_species_fails_fast() {
        let err = EnemyShip::new(&catalog(), "kraken", Vec2::ZERO).unwrap_err();
        assert!(matches!(err, SimError::UnknownSpecies { .. }));
    }

    #[test]
    fn test_clamp_keeps_sprite_above_hud() {
        let mut player = PlayerShip::new(&catalog(), Vec2::new(-50.0, 2000.0));
        player.clamp_to(800.0, 800.0, 20.0);
        assert_eq!(player.hull.pos, Vec2::new(0.0, 716.0));

        player.hull.pos = Vec2::new(900.0, -10.0);
        player.clamp_to(800.0, 800.0, 20.0);
        assert_eq!(player.hull.pos, Vec2::new(736.0, 0.0));
    }

    #[test]
    fn test_spawn_position() {
        let player = PlayerShip::spawn(&catalog(), 800.0, 800.0, 100.0);
        assert_eq!(player.hull.pos, Vec2::new(368.0, 700.0));
    }

    #[test]
    fn test_enemy_moves_down_by_speed() {
        let mut enemy = EnemyShip::new(&catalog(), "squid", Vec2::new(64.0, -100.0)).unwrap();
        enemy.advance();
        enemy.advance();
        assert_eq!(enemy.hull.pos, Vec2::new(64.0, -98.0));
    }

    #[test]
    fn test_zigzag_returns_after_full_period() {
        let mut enemy =
            EnemyShip::new(&catalog(), "flappy_blue", Vec2::new(100.0, 0.0)).unwrap();
        for _ in 0..WEAVE_HALF_PERIOD {
            enemy.advance();
        }
        assert_eq!(enemy.hull.pos.x, 130.0);
        for _ in 0..WEAVE_HALF_PERIOD {
            enemy.advance();
        }
        assert_eq!(enemy.hull.pos, Vec2::new(100.0, 60.0));
    }

    #[test]
    fn test_past_bottom() {
        let mut enemy = EnemyShip::new(&catalog(), "squid", Vec2::new(0.0, 768.0)).unwrap();
        assert!(!enemy.is_past_bottom(800.0));
        enemy.advance();
        assert!(enemy.is_past_bottom(800.0));
    }

    #[derive(Debug, Clone)]
    enum HealthOp {
        Deplete(u32),
        Recover(u32),
    }

    fn health_op() -> impl Strategy<Value = HealthOp> {
        prop_oneof![
            (0u32..250).prop_map(HealthOp::Deplete),
            (0u32..250).prop_map(HealthOp::Recover),
        ]
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(ops in proptest::collection::vec(health_op(), 0..64)) {
            let mut enemy = EnemyShip::new(&catalog(), "block", Vec2::ZERO).unwrap();
            for op in ops {
                match op {
                    HealthOp::Deplete(n) => enemy.hull.deplete_health(n),
                    HealthOp::Recover(n) => enemy.hull.recover_health(n),
                }
                prop_assert!(enemy.hull.health() <= enemy.hull.max_health());
            }
        }
    }
}
