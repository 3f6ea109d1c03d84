//! Static data tables: footprints, laser types, enemy species, player loadout
//!
//! Everything a ship or laser needs is looked up here by name when it is
//! built, so adding an enemy is a table entry, not new code. Tables can come
//! from JSON or from [`CatalogTables::builtin`]. Every cross-reference is
//! resolved in [`Catalog::new`], so a typo fails before the first tick.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::laser::LaserPattern;
use super::mask::{CollisionMask, Footprint, MaskError};
use super::ship::MovePattern;
use crate::error::SimError;

/// Declarative footprint shape (hosts may swap in real image masks later)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum FootprintShape {
    Rect { width: u32, height: u32 },
    Ellipse { width: u32, height: u32 },
    Rows { rows: Vec<String> },
}

impl FootprintShape {
    pub fn build(&self) -> Result<CollisionMask, MaskError> {
        match self {
            FootprintShape::Rect { width, height } => CollisionMask::rect(*width, *height),
            FootprintShape::Ellipse { width, height } => CollisionMask::ellipse(*width, *height),
            FootprintShape::Rows { rows } => CollisionMask::from_rows(rows),
        }
    }
}

/// Laser table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserSpec {
    pub damage: u32,
    /// Pixels per frame along y (negative travels up)
    pub velocity: f32,
    /// Frames the firing ship must wait before its next shot
    pub cooldown: u32,
    pub footprint: String,
    #[serde(default)]
    pub pattern: LaserPattern,
}

fn default_explosion() -> String {
    "explosion".to_string()
}

/// Species table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSpec {
    /// Pixels per frame
    pub speed: f32,
    #[serde(default)]
    pub pattern: MovePattern,
    pub footprint: String,
    pub laser: String,
    pub health: u32,
    pub points: u32,
    /// Laser type spawned when the ship blows up
    #[serde(default = "default_explosion")]
    pub explosion: String,
}

/// Player ship entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub footprint: String,
    pub laser: String,
    pub health: u32,
    pub speed: f32,
    pub explosion: String,
}

/// Raw, unresolved tables (the serialized form)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTables {
    pub footprints: BTreeMap<String, FootprintShape>,
    pub lasers: BTreeMap<String, LaserSpec>,
    pub species: BTreeMap<String, SpeciesSpec>,
    pub player: PlayerSpec,
}

/// Resolved laser type shared by every laser of that type
#[derive(Debug, Clone, PartialEq)]
pub struct LaserType {
    pub name: String,
    pub damage: u32,
    pub velocity: f32,
    pub cooldown: u32,
    pub pattern: LaserPattern,
    pub footprint: Footprint,
}

/// Resolved enemy species
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub name: String,
    pub speed: f32,
    pub pattern: MovePattern,
    pub health: u32,
    pub points: u32,
    pub footprint: Footprint,
    pub weapon: Arc<LaserType>,
    pub explosion: Arc<LaserType>,
}

/// Resolved player ship
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLoadout {
    pub health: u32,
    pub speed: f32,
    pub footprint: Footprint,
    pub weapon: Arc<LaserType>,
    pub explosion: Arc<LaserType>,
}

/// Validated lookup tables
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: CatalogTables,
    footprints: HashMap<String, Footprint>,
    lasers: HashMap<String, Arc<LaserType>>,
    species: HashMap<String, Arc<Species>>,
    player: PlayerLoadout,
}

impl Catalog {
    /// Build masks and resolve every name; fails on the first dangling reference
    pub fn new(tables: CatalogTables) -> Result<Self, SimError> {
        let mut footprints = HashMap::with_capacity(tables.footprints.len());
        for (name, shape) in &tables.footprints {
            let mask = shape.build().map_err(|err| SimError::InvalidFootprint {
                name: name.clone(),
                reason: err.to_string(),
            })?;
            check_not_empty(name, &mask)?;
            footprints.insert(name.clone(), Footprint::new(name.clone(), mask));
        }
        resolve(tables, footprints)
    }

    /// The stock tables
    pub fn builtin() -> Result<Self, SimError> {
        Self::new(CatalogTables::builtin())
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Replace a footprint with a real image mask and re-resolve the tables
    ///
    /// Ships and lasers already built keep the mask they were built with.
    pub fn insert_footprint(
        &mut self,
        name: impl Into<String>,
        mask: CollisionMask,
    ) -> Result<(), SimError> {
        let name = name.into();
        check_not_empty(&name, &mask)?;
        let mut footprints = self.footprints.clone();
        footprints.insert(name.clone(), Footprint::new(name, mask));
        *self = resolve(self.tables.clone(), footprints)?;
        Ok(())
    }

    pub fn tables(&self) -> &CatalogTables {
        &self.tables
    }

    pub fn footprint(&self, name: &str) -> Result<&Footprint, SimError> {
        self.footprints.get(name).ok_or_else(|| SimError::UnknownFootprint {
            name: name.to_string(),
        })
    }

    pub fn laser(&self, name: &str) -> Result<&Arc<LaserType>, SimError> {
        self.lasers.get(name).ok_or_else(|| SimError::UnknownLaser {
            name: name.to_string(),
        })
    }

    pub fn species(&self, name: &str) -> Result<&Arc<Species>, SimError> {
        self.species.get(name).ok_or_else(|| SimError::UnknownSpecies {
            name: name.to_string(),
        })
    }

    pub fn player(&self) -> &PlayerLoadout {
        &self.player
    }

    /// Species names in sorted order
    pub fn species_names(&self) -> impl Iterator<Item = &str> {
        self.tables.species.keys().map(String::as_str)
    }
}

fn check_not_empty(name: &str, mask: &CollisionMask) -> Result<(), SimError> {
    if mask.width() == 0 || mask.height() == 0 {
        return Err(SimError::InvalidFootprint {
            name: name.to_string(),
            reason: "footprint has no pixels".to_string(),
        });
    }
    Ok(())
}

fn resolve(
    tables: CatalogTables,
    footprints: HashMap<String, Footprint>,
) -> Result<Catalog, SimError> {
    let footprint = |name: &str| {
        footprints
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::UnknownFootprint {
                name: name.to_string(),
            })
    };

    let mut lasers = HashMap::with_capacity(tables.lasers.len());
    for (name, spec) in &tables.lasers {
        let kind = LaserType {
            name: name.clone(),
            damage: spec.damage,
            velocity: spec.velocity,
            cooldown: spec.cooldown,
            pattern: spec.pattern,
            footprint: footprint(&spec.footprint)?,
        };
        lasers.insert(name.clone(), Arc::new(kind));
    }

    let laser = |name: &str| {
        lasers
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::UnknownLaser {
                name: name.to_string(),
            })
    };

    let mut species = HashMap::with_capacity(tables.species.len());
    for (name, spec) in &tables.species {
        let entry = Species {
            name: name.clone(),
            speed: spec.speed,
            pattern: spec.pattern,
            health: spec.health,
            points: spec.points,
            footprint: footprint(&spec.footprint)?,
            weapon: laser(&spec.laser)?,
            explosion: laser(&spec.explosion)?,
        };
        species.insert(name.clone(), Arc::new(entry));
    }

    let player = PlayerLoadout {
        health: tables.player.health,
        speed: tables.player.speed,
        footprint: footprint(&tables.player.footprint)?,
        weapon: laser(&tables.player.laser)?,
        explosion: laser(&tables.player.explosion)?,
    };

    log::debug!(
        "Catalog resolved: {} footprints, {} lasers, {} species",
        footprints.len(),
        lasers.len(),
        species.len()
    );

    Ok(Catalog {
        tables,
        footprints,
        lasers,
        species,
        player,
    })
}

impl CatalogTables {
    /// Stock footprints, lasers and species
    pub fn builtin() -> Self {
        use FootprintShape::*;

        let footprints = [
            ("main_ship", Ellipse { width: 64, height: 64 }),
            ("enemy_round", Ellipse { width: 32, height: 32 }),
            ("enemy_square", Rect { width: 32, height: 32 }),
            ("enemy_arrow", arrow_rows()),
            ("laser_bolt", Rect { width: 16, height: 32 }),
            ("laser_blast", Ellipse { width: 16, height: 32 }),
            ("laser_spark", Ellipse { width: 8, height: 16 }),
            ("explosion", Ellipse { width: 128, height: 128 }),
        ]
        .into_iter()
        .map(|(name, shape)| (name.to_string(), shape))
        .collect();

        let laser = |damage, velocity, cooldown, footprint: &str, pattern| LaserSpec {
            damage,
            velocity,
            cooldown,
            footprint: footprint.to_string(),
            pattern,
        };
        let lasers = [
            ("green", laser(10, 10.0, 15, "laser_bolt", LaserPattern::Normal)),
            ("player_green", laser(10, -10.0, 15, "laser_blast", LaserPattern::Normal)),
            ("blue_shot", laser(10, 6.0, 30, "laser_spark", LaserPattern::Normal)),
            ("blue_weave", laser(10, 5.0, 30, "laser_spark", LaserPattern::Weave)),
            ("blue_weave2", laser(10, 5.0, 30, "laser_spark", LaserPattern::Weave2)),
            ("explosion", laser(30, 10.0, 15, "explosion", LaserPattern::Delayed)),
            ("explosion_zero", laser(0, 10.0, 15, "explosion", LaserPattern::Delayed)),
        ]
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect();

        // (name, footprint, pattern, laser, health)
        let roster = [
            ("squid", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("blue_squid", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("metal_squid", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("red_metal_squid", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("arrow_blue", "enemy_arrow", MovePattern::Down, "blue_shot", 10),
            ("arrow_gold", "enemy_arrow", MovePattern::Down, "blue_shot", 10),
            ("arrow_pink", "enemy_arrow", MovePattern::Down, "blue_shot", 10),
            ("arrow_red", "enemy_arrow", MovePattern::Down, "blue_shot", 10),
            ("arrow_stealth", "enemy_arrow", MovePattern::Down, "blue_shot", 10),
            ("block", "enemy_square", MovePattern::Down, "blue_shot", 20),
            ("metal_1", "enemy_square", MovePattern::Down, "blue_shot", 10),
            ("hammer", "enemy_square", MovePattern::Down, "blue_shot", 10),
            ("blue_spark", "enemy_round", MovePattern::Down, "blue_weave", 10),
            ("green_spark", "enemy_round", MovePattern::Down, "blue_weave2", 10),
            ("centi_blue", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("centi_green", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("centihead_blue", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("centihead_dud", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("centihead_green", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("centihead_panda", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("centihead_red", "enemy_round", MovePattern::Down, "blue_shot", 10),
            ("flappy_blue", "enemy_round", MovePattern::Zigzag, "blue_shot", 10),
            ("flappy_green", "enemy_round", MovePattern::Zigzag, "blue_shot", 10),
            ("flappy_red", "enemy_round", MovePattern::Zigzag, "blue_shot", 10),
            ("flappy_stealth", "enemy_round", MovePattern::Zigzag, "blue_shot", 10),
            ("flappy_white", "enemy_round", MovePattern::Zigzag, "blue_shot", 10),
        ];
        let species = roster
            .into_iter()
            .map(|(name, footprint, pattern, laser, health)| {
                let spec = SpeciesSpec {
                    speed: 1.0,
                    pattern,
                    footprint: footprint.to_string(),
                    laser: laser.to_string(),
                    health,
                    points: 10,
                    explosion: default_explosion(),
                };
                (name.to_string(), spec)
            })
            .collect();

        Self {
            footprints,
            lasers,
            species,
            player: PlayerSpec {
                footprint: "main_ship".to_string(),
                laser: "player_green".to_string(),
                health: 100,
                speed: 5.0,
                explosion: "explosion_zero".to_string(),
            },
        }
    }
}

/// Downward-pointing arrowhead, 32x32
fn arrow_rows() -> FootprintShape {
    let rows = (0..32)
        .map(|y: i32| {
            let half = 16 - y / 2;
            (0..32)
                .map(|x: i32| if (x - 16).abs() < half.max(1) { '#' } else { '.' })
                .collect()
        })
        .collect();
    FootprintShape::Rows { rows }
}
