//! Game state and the observables a host draws from
//!
//! The state owns every roster. Nothing outside [`super::tick`] mutates them
//! during play; hosts read a [`Snapshot`] instead.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::laser::Laser;
use super::levels::LevelSequence;
use super::ship::{EnemyShip, PlayerShip};
use super::spawn::Spawner;
use crate::error::SimError;
use crate::settings::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player destroyed; the lose screen is counting down
    Lost,
    /// Lose screen expired, the run is finished
    Over,
}

/// Something that happened during the last tick (sound and UI hooks)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `index` is the sequence index, `wave_number` counts every wave started
    WaveStarted { index: usize, wave_number: u32 },
    EnemyDestroyed { species: String, points: u32 },
    /// Enemy rammed the player or slipped past the bottom edge
    EnemyCrashed { species: String },
    PlayerHit { damage: u32 },
    PlayerDestroyed,
    GameOver { score: u64 },
}

/// What the level banner should say
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerKind {
    /// "Level n"
    Level(u32),
    /// First time the last wave is reached
    FinalStage,
    /// The last wave again
    Encore,
}

impl BannerKind {
    /// Banner for the `wave_number`-th wave (1-based) of a `len`-wave sequence
    pub fn for_wave(wave_number: u32, len: usize) -> Self {
        match (wave_number as usize).cmp(&len) {
            std::cmp::Ordering::Less => BannerKind::Level(wave_number),
            std::cmp::Ordering::Equal => BannerKind::FinalStage,
            std::cmp::Ordering::Greater => BannerKind::Encore,
        }
    }

    pub fn message(&self) -> String {
        match self {
            BannerKind::Level(n) => format!("Level {n}"),
            BannerKind::FinalStage => "Welcome to Heck.".to_string(),
            BannerKind::Encore => "So, You Want More???".to_string(),
        }
    }
}

/// A drawable: footprint name and top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub sprite: String,
    pub pos: Vec2,
}

/// A drawable ship with its health bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub sprite: String,
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
}

/// Everything a renderer or HUD needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub lost: bool,
    pub score: u64,
    pub player: ShipView,
    pub enemies: Vec<ShipView>,
    pub player_lasers: Vec<SpriteView>,
    pub enemy_lasers: Vec<SpriteView>,
    pub current_level_index: usize,
    pub waves_started: u32,
    pub banner: Option<BannerKind>,
    pub lose_ticks: u32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub(crate) catalog: Catalog,
    pub(crate) rng: Pcg32,
    pub(crate) levels: LevelSequence,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub player: PlayerShip,
    pub enemies: Vec<EnemyShip>,
    pub player_lasers: Vec<Laser>,
    pub enemy_lasers: Vec<Laser>,
    /// Waves started so far, repeats included
    pub waves_started: u32,
    /// Frames left on the level banner
    pub banner_ticks: u32,
    /// Frames spent on the lose screen
    pub lose_ticks: u32,
    /// Events from the most recent tick (or from construction)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Validate everything up front, place the player and start wave one
    pub fn new(
        config: GameConfig,
        catalog: Catalog,
        levels: LevelSequence,
    ) -> Result<Self, SimError> {
        config.validate()?;
        levels.validate(&catalog)?;
        if levels.is_empty() {
            log::warn!("Starting with an empty level sequence");
        }

        let mut player = PlayerShip::spawn(
            &catalog,
            config.width,
            config.height,
            config.player_start_offset,
        );
        player.clamp_to(config.width, config.height, config.hud_margin);

        let mut state = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            catalog,
            levels,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            player,
            enemies: Vec::new(),
            player_lasers: Vec::new(),
            enemy_lasers: Vec::new(),
            waves_started: 0,
            banner_ticks: 0,
            lose_ticks: 0,
            events: Vec::new(),
        };
        state.start_next_wave();
        Ok(state)
    }

    /// Stock catalog and campaign
    pub fn builtin(config: GameConfig) -> Result<Self, SimError> {
        Self::new(config, Catalog::builtin()?, LevelSequence::builtin())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn levels(&self) -> &LevelSequence {
        &self.levels
    }

    /// Index of the next wave in the level sequence
    pub fn current_level_index(&self) -> usize {
        self.levels.current_index()
    }

    pub fn is_lost(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Banner to show, if one is up
    pub fn banner(&self) -> Option<BannerKind> {
        (self.banner_ticks > 0 && self.waves_started > 0)
            .then(|| BannerKind::for_wave(self.waves_started, self.levels.len()))
    }

    /// Spawn the next wave of the level sequence
    pub fn start_next_wave(&mut self) {
        let mut spawner = Spawner::new(
            &self.catalog,
            &mut self.enemies,
            &mut self.rng,
            self.config.width,
        );
        match self.levels.advance(&mut spawner) {
            Ok(Some(index)) => {
                self.waves_started += 1;
                self.banner_ticks = self.config.banner_ticks;
                log::info!(
                    "Wave {} started ({} enemies, sequence index {})",
                    self.waves_started,
                    self.enemies.len(),
                    index
                );
                self.events.push(GameEvent::WaveStarted {
                    index,
                    wave_number: self.waves_started,
                });
            }
            Ok(None) => {}
            Err(err) => log::error!("Failed to spawn wave: {err}"),
        }
    }

    /// Resize the playfield and pull the player back inside it
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        self.config.resize(width, height)?;
        self.player
            .clamp_to(self.config.width, self.config.height, self.config.hud_margin);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        fn ship(hull: &super::ship::Hull) -> ShipView {
            ShipView {
                sprite: hull.sprite().to_string(),
                pos: hull.pos,
                health: hull.health(),
                max_health: hull.max_health(),
            }
        }
        fn laser(laser: &Laser) -> SpriteView {
            SpriteView {
                sprite: laser.sprite().to_string(),
                pos: laser.pos,
            }
        }

        Snapshot {
            time_ticks: self.time_ticks,
            phase: self.phase,
            lost: self.is_lost(),
            score: self.score,
            player: ship(&self.player.hull),
            enemies: self.enemies.iter().map(|e| ship(&e.hull)).collect(),
            player_lasers: self.player_lasers.iter().map(laser).collect(),
            enemy_lasers: self.enemy_lasers.iter().map(laser).collect(),
            current_level_index: self.current_level_index(),
            waves_started: self.waves_started,
            banner: self.banner(),
            lose_ticks: self.lose_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levels::{Formation, Wave};

    fn one_row() -> LevelSequence {
        LevelSequence::new(vec![Wave::new(
            "row",
            vec![Formation::Row {
                distance: -100.0,
                species: "squid".to_string(),
                species2: None,
                x_offset: 0.0,
            }],
        )])
    }

    #[test]
    fn test_new_starts_first_wave() {
        let state = GameState::builtin(GameConfig::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 40);
        assert_eq!(state.waves_started, 1);
        assert_eq!(state.current_level_index(), 1);
        assert_eq!(state.banner_ticks, 120);
        assert_eq!(state.banner(), Some(BannerKind::Level(1)));
        assert_eq!(
            state.events,
            vec![GameEvent::WaveStarted {
                index: 0,
                wave_number: 1
            }]
        );
        assert_eq!(state.player.hull.pos, Vec2::new(368.0, 700.0));
    }

    #[test]
    fn test_row_wave_lands_on_screen() {
        let state =
            GameState::new(GameConfig::default(), Catalog::builtin().unwrap(), one_row()).unwrap();
        assert_eq!(state.enemies.len(), 10);
        for (i, enemy) in state.enemies.iter().enumerate() {
            assert_eq!(enemy.hull.pos, Vec2::new(64.0 * (i + 1) as f32, 100.0));
        }
    }

    #[test]
    fn test_new_rejects_bad_inputs() {
        let config = GameConfig {
            fps: 0,
            ..GameConfig::default()
        };
        assert!(GameState::builtin(config).is_err());

        let levels = LevelSequence::new(vec![Wave::new(
            "bad",
            vec![Formation::Split {
                distance: 0.0,
                species: "kraken".to_string(),
                species2: None,
            }],
        )]);
        let err = GameState::new(GameConfig::default(), Catalog::builtin().unwrap(), levels)
            .unwrap_err();
        assert!(matches!(err, SimError::UnknownSpecies { .. }));
    }

    #[test]
    fn test_empty_sequence_starts_without_enemies() {
        let state = GameState::new(
            GameConfig::default(),
            Catalog::builtin().unwrap(),
            LevelSequence::new(Vec::new()),
        )
        .unwrap();
        assert!(state.enemies.is_empty());
        assert_eq!(state.waves_started, 0);
        assert_eq!(state.banner(), None);
    }

    #[test]
    fn test_banner_kinds() {
        assert_eq!(BannerKind::for_wave(1, 6), BannerKind::Level(1));
        assert_eq!(BannerKind::for_wave(5, 6), BannerKind::Level(5));
        assert_eq!(BannerKind::for_wave(6, 6), BannerKind::FinalStage);
        assert_eq!(BannerKind::for_wave(9, 6), BannerKind::Encore);
        assert_eq!(BannerKind::Level(3).message(), "Level 3");
        assert_eq!(BannerKind::FinalStage.message(), "Welcome to Heck.");
    }

    #[test]
    fn test_resize_reclamps_player() {
        let mut state = GameState::builtin(GameConfig::default()).unwrap();
        state.resize(400.0, 300.0).unwrap();
        assert_eq!(state.player.hull.pos, Vec2::new(336.0, 216.0));

        assert!(state.resize(0.0, 300.0).is_err());
        assert_eq!(state.config.width, 400.0);
    }

    #[test]
    fn test_snapshot_reports_rosters() {
        let state = GameState::builtin(GameConfig::default()).unwrap();
        let snap = state.snapshot();
        assert_eq!(snap.enemies.len(), 40);
        assert_eq!(snap.player.sprite, "main_ship");
        assert_eq!(snap.player.health, 100);
        assert_eq!(snap.current_level_index, 1);
        assert!(!snap.lost);
        assert!(snap.player_lasers.is_empty());
        assert_eq!(snap.banner, Some(BannerKind::Level(1)));
    }
}
