//! Garuda - a vertical-scrolling space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, pixel collisions, waves, scoring)
//! - `settings`: Playfield and timing configuration
//! - `error`: Construction-time failures (unknown ids, bad data files)
//!
//! Rendering, input polling and frame pacing belong to the host. The host
//! builds a [`sim::GameState`], feeds one [`sim::TickInput`] per frame to
//! [`sim::tick`] and draws whatever [`sim::GameState::snapshot`] reports.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Frames per second the simulation is tuned for (one tick per frame)
    pub const FPS: u32 = 60;

    /// Default playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;
    /// Strip at the bottom of the playfield the player may not enter
    pub const HUD_MARGIN: f32 = 20.0;
    /// Player spawns this far above the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 100.0;

    /// Spawn grid unit (pixels) used by every formation
    pub const GRID: f32 = 64.0;
    /// Enemies per row / column formation
    pub const FORMATION_SIZE: usize = 10;
    /// Enemies in a V formation
    pub const V_FORMATION_SIZE: usize = 11;
    /// Default centipede body length
    pub const CENTIPEDE_LENGTH: u32 = 7;
    /// Vertical gap between consecutive random-rain enemies
    pub const RAIN_SPACING: f32 = 800.0;

    /// Frames a delayed laser (explosion) lingers before vanishing
    pub const DELAY_FRAMES: u32 = 30;
    /// Where delayed lasers are parked once they expire (far below the field)
    pub const PARKED_Y: f32 = 10_000.0;
    /// Horizontal step of weaving lasers and zigzagging ships
    pub const WEAVE_STEP: f32 = 3.0;
    /// Half-period of weave/zigzag oscillation (frames)
    pub const WEAVE_HALF_PERIOD: u32 = 30;

    /// Gap between a hull and its laser muzzle
    pub const MUZZLE_GAP: f32 = 10.0;
    /// Explosion sprites are offset this much up/left from the hull centre
    pub const EXPLOSION_OFFSET: f32 = 64.0;

    /// Lose screen duration (seconds)
    pub const LOSE_SECONDS: u32 = 5;
    /// Level banner duration (frames)
    pub const BANNER_TICKS: u32 = 120;
}
