//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (roster order)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod laser;
pub mod levels;
pub mod mask;
pub mod ship;
pub mod spawn;
pub mod state;
pub mod tick;

pub use catalog::{Catalog, CatalogTables, FootprintShape, LaserType, PlayerLoadout, Species};
pub use laser::{Laser, LaserPattern};
pub use levels::{Formation, LevelSequence, Wave};
pub use mask::{CollisionMask, Footprint, MaskError, Sprite, collide};
pub use ship::{EnemyShip, Facing, Hull, MovePattern, PlayerShip};
pub use spawn::Spawner;
pub use state::{BannerKind, GameEvent, GamePhase, GameState, ShipView, Snapshot, SpriteView};
pub use tick::{TickInput, tick};
