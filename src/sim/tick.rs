//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one frame. Order within a frame:
//! input, player clamp and cooldown, enemies, player lasers, enemy lasers,
//! kill sweep, level advance, lose check.
//!
//! Every roster is taken out of the state, walked by value and rebuilt from
//! the survivors, so removals never skip or repeat an entry.

use glam::Vec2;
use rand::Rng;

use super::ship::EnemyShip;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Demo mode: the simulation flies the player
    pub autopilot: bool,
}

impl TickInput {
    /// Unit steps per axis; opposite keys cancel
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| pos as i8 as f32 - neg as i8 as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    if state.phase == GamePhase::Over {
        return;
    }
    state.time_ticks += 1;
    let lost = state.is_lost();

    // Player
    if !lost {
        let mut input = *input;
        if input.autopilot {
            autopilot(state, &mut input);
        }
        state.player.steer(input.direction());
        if input.fire {
            state.player.shoot(&mut state.player_lasers);
        }
    }
    let (width, height) = (state.config.width, state.config.height);
    state.player.clamp_to(width, height, state.config.hud_margin);
    if !lost {
        state.player.hull.cool_down();
    }

    update_enemies(state, lost);
    update_player_lasers(state);
    update_enemy_lasers(state, lost);

    // Kills landed by this frame's lasers
    for enemy in std::mem::take(&mut state.enemies) {
        if enemy.hull.is_destroyed() {
            award_kill(state, &enemy);
        } else {
            state.enemies.push(enemy);
        }
    }

    state.banner_ticks = state.banner_ticks.saturating_sub(1);
    if state.enemies.is_empty() {
        state.start_next_wave();
    }

    check_lose(state);
}

fn update_enemies(state: &mut GameState, lost: bool) {
    let odds = state.config.enemy_fire_odds;
    let height = state.config.height;

    for mut enemy in std::mem::take(&mut state.enemies) {
        enemy.advance();
        if odds > 0 && state.rng.random_range(0..odds) == 0 {
            enemy.shoot(&mut state.enemy_lasers);
        }
        enemy.hull.cool_down();

        if enemy.hull.is_destroyed() {
            award_kill(state, &enemy);
        } else if enemy.is_past_bottom(height) || (!lost && enemy.collides_with(&state.player)) {
            log::debug!("{} crashed at {}", enemy.species(), enemy.hull.pos);
            enemy.explode(&mut state.enemy_lasers);
            state.events.push(GameEvent::EnemyCrashed {
                species: enemy.species().to_string(),
            });
        } else {
            state.enemies.push(enemy);
        }
    }
}

fn update_player_lasers(state: &mut GameState) {
    let (top, height) = (state.config.offscreen_top, state.config.height);

    for mut laser in std::mem::take(&mut state.player_lasers) {
        laser.advance();

        // First live enemy in roster order absorbs the hit
        let target = state
            .enemies
            .iter_mut()
            .find(|enemy| !enemy.hull.is_destroyed() && laser.collides_with(&**enemy));
        if let Some(enemy) = target {
            enemy.hull.deplete_health(laser.damage());
            continue;
        }

        if !laser.is_off_screen(top, height) {
            state.player_lasers.push(laser);
        }
    }
}

fn update_enemy_lasers(state: &mut GameState, lost: bool) {
    let (top, height) = (state.config.offscreen_top, state.config.height);

    for mut laser in std::mem::take(&mut state.enemy_lasers) {
        laser.advance();

        if !lost && laser.collides_with(&state.player) {
            let damage = laser.damage();
            state.player.hull.deplete_health(damage);
            log::debug!(
                "Player hit by {} for {damage} ({} left)",
                laser.kind(),
                state.player.hull.health()
            );
            state.events.push(GameEvent::PlayerHit { damage });
            continue;
        }

        if !laser.is_off_screen(top, height) {
            state.enemy_lasers.push(laser);
        }
    }
}

fn award_kill(state: &mut GameState, enemy: &EnemyShip) {
    let points = enemy.points();
    state.score += u64::from(points);
    log::debug!("{} destroyed (+{points}, score {})", enemy.species(), state.score);
    state.events.push(GameEvent::EnemyDestroyed {
        species: enemy.species().to_string(),
        points,
    });
}

fn check_lose(state: &mut GameState) {
    if !state.player.hull.is_destroyed() {
        return;
    }

    if state.phase == GamePhase::Playing {
        state.phase = GamePhase::Lost;
        state.player.explode(&mut state.player_lasers);
        log::info!("Player destroyed at tick {}, score {}", state.time_ticks, state.score);
        state.events.push(GameEvent::PlayerDestroyed);
    }

    state.lose_ticks += 1;
    if state.lose_ticks > state.config.lose_ticks() {
        state.phase = GamePhase::Over;
        log::info!("Game over, final score {}", state.score);
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

/// Demo pilot: slide under the lowest enemy on screen and keep firing
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player_x = state.player.hull.centre().x;
    let target_x = state
        .enemies
        .iter()
        .filter(|e| e.hull.pos.y + e.hull.height() > 0.0)
        .max_by(|a, b| {
            a.hull
                .pos
                .y
                .partial_cmp(&b.hull.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.hull.centre().x)
        .unwrap_or(state.config.width / 2.0);

    // Dead zone of one step so the ship does not jitter around the target
    let dead_zone = state.player.hull.speed;
    input.left = target_x < player_x - dead_zone;
    input.right = target_x > player_x + dead_zone;
    input.up = false;
    input.down = false;
    input.fire = true;
}
