//! Level sequencing: waves of formations, played in order
//!
//! A wave is plain data (a list of [`Formation`]s) so campaigns can be loaded
//! from JSON. The sequence starts at index 0 and moves forward one wave per
//! [`LevelSequence::advance`] until it reaches the last wave, which then
//! repeats forever.

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::spawn::Spawner;
use crate::consts::CENTIPEDE_LENGTH;
use crate::error::SimError;

/// One formation to place when a wave starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Formation {
    Row {
        distance: f32,
        species: String,
        #[serde(default)]
        species2: Option<String>,
        #[serde(default)]
        x_offset: f32,
    },
    Block {
        distance: f32,
        species: String,
        #[serde(default)]
        species2: Option<String>,
    },
    Column {
        distance: f32,
        x: f32,
        species: String,
        #[serde(default)]
        species2: Option<String>,
    },
    Split {
        distance: f32,
        species: String,
        #[serde(default)]
        species2: Option<String>,
    },
    VFormation {
        distance: f32,
        species: String,
        #[serde(default)]
        species2: Option<String>,
    },
    CentipedeLeft {
        distance: f32,
        head: String,
        body1: String,
        body2: String,
        #[serde(default = "default_centipede_length")]
        length: u32,
    },
    CentipedeRight {
        distance: f32,
        head: String,
        body1: String,
        body2: String,
        #[serde(default = "default_centipede_length")]
        length: u32,
    },
    RandomRain {
        distance: f32,
        quantity: u32,
        species: String,
    },
}

fn default_centipede_length() -> u32 {
    CENTIPEDE_LENGTH
}

impl Formation {
    /// Every species this formation places
    pub fn species_ids(&self) -> Vec<&str> {
        match self {
            Formation::Row {
                species, species2, ..
            }
            | Formation::Block {
                species, species2, ..
            }
            | Formation::Column {
                species, species2, ..
            }
            | Formation::Split {
                species, species2, ..
            }
            | Formation::VFormation {
                species, species2, ..
            } => std::iter::once(species.as_str())
                .chain(species2.as_deref())
                .collect(),
            Formation::CentipedeLeft {
                head, body1, body2, ..
            }
            | Formation::CentipedeRight {
                head, body1, body2, ..
            } => vec![head.as_str(), body1.as_str(), body2.as_str()],
            Formation::RandomRain { species, .. } => vec![species.as_str()],
        }
    }

    pub fn spawn(&self, spawner: &mut Spawner) -> Result<(), SimError> {
        match self {
            Formation::Row {
                distance,
                species,
                species2,
                x_offset,
            } => spawner.row(*distance, species, species2.as_deref(), *x_offset),
            Formation::Block {
                distance,
                species,
                species2,
            } => spawner.block(*distance, species, species2.as_deref()),
            Formation::Column {
                distance,
                x,
                species,
                species2,
            } => spawner.column(*distance, *x, species, species2.as_deref()),
            Formation::Split {
                distance,
                species,
                species2,
            } => spawner.split(*distance, species, species2.as_deref()),
            Formation::VFormation {
                distance,
                species,
                species2,
            } => spawner.v_formation(*distance, species, species2.as_deref()),
            Formation::CentipedeLeft {
                distance,
                head,
                body1,
                body2,
                length,
            } => spawner.centipede_left(*distance, head, body1, body2, *length),
            Formation::CentipedeRight {
                distance,
                head,
                body1,
                body2,
                length,
            } => spawner.centipede_right(*distance, head, body1, body2, *length),
            Formation::RandomRain {
                distance,
                quantity,
                species,
            } => spawner.random_rain(*distance, *quantity, species),
        }
    }
}

/// A named group of formations spawned together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub name: String,
    pub formations: Vec<Formation>,
}

impl Wave {
    pub fn new(name: impl Into<String>, formations: Vec<Formation>) -> Self {
        Self {
            name: name.into(),
            formations,
        }
    }

    pub fn spawn(&self, spawner: &mut Spawner) -> Result<(), SimError> {
        for formation in &self.formations {
            formation.spawn(spawner)?;
        }
        Ok(())
    }
}

/// Ordered waves plus the index of the next one to play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSequence {
    pub waves: Vec<Wave>,
    #[serde(skip)]
    index: usize,
}

impl LevelSequence {
    pub fn new(waves: Vec<Wave>) -> Self {
        Self { waves, index: 0 }
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every species id against the catalog
    pub fn validate(&self, catalog: &Catalog) -> Result<(), SimError> {
        for wave in &self.waves {
            for formation in &wave.formations {
                for species in formation.species_ids() {
                    catalog.species(species)?;
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Index of the wave the next [`advance`](Self::advance) will spawn
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Spawn the current wave, then step forward unless already on the last
    ///
    /// Returns the index of the wave that was spawned, or `None` for an empty
    /// sequence.
    pub fn advance(&mut self, spawner: &mut Spawner) -> Result<Option<usize>, SimError> {
        let Some(wave) = self.waves.get(self.index) else {
            log::debug!("Level sequence is empty, nothing to spawn");
            return Ok(None);
        };
        wave.spawn(spawner)?;
        let spawned = self.index;
        if self.index + 1 < self.waves.len() {
            self.index += 1;
        }
        Ok(Some(spawned))
    }

    /// Stock campaign: two opening levels then increasingly busy waves
    pub fn builtin() -> Self {
        use Formation::*;

        let row = |distance: f32, species: &str| Row {
            distance,
            species: species.to_string(),
            species2: None,
            x_offset: 0.0,
        };
        let name = |s: &str| s.to_string();

        Self::new(vec![
            Wave::new(
                "first contact",
                vec![
                    row(-100.0, "squid"),
                    row(-164.0, "squid"),
                    row(200.0, "squid"),
                    row(264.0, "squid"),
                ],
            ),
            Wave::new(
                "block",
                vec![Block {
                    distance: 200.0,
                    species: name("squid"),
                    species2: None,
                }],
            ),
            Wave::new(
                "gap",
                vec![
                    Split {
                        distance: 100.0,
                        species: name("arrow_red"),
                        species2: Some(name("arrow_gold")),
                    },
                    Column {
                        distance: 300.0,
                        x: 0.0,
                        species: name("hammer"),
                        species2: None,
                    },
                    Column {
                        distance: 300.0,
                        x: 736.0,
                        species: name("hammer"),
                        species2: None,
                    },
                ],
            ),
            Wave::new(
                "geese",
                vec![
                    VFormation {
                        distance: 100.0,
                        species: name("arrow_pink"),
                        species2: Some(name("blue_spark")),
                    },
                    VFormation {
                        distance: 700.0,
                        species: name("green_spark"),
                        species2: Some(name("arrow_blue")),
                    },
                    row(1300.0, "flappy_blue"),
                ],
            ),
            Wave::new(
                "centipedes",
                vec![
                    CentipedeLeft {
                        distance: 100.0,
                        head: name("centihead_red"),
                        body1: name("centi_blue"),
                        body2: name("centi_green"),
                        length: CENTIPEDE_LENGTH,
                    },
                    CentipedeRight {
                        distance: 400.0,
                        head: name("centihead_green"),
                        body1: name("centi_green"),
                        body2: name("centi_blue"),
                        length: CENTIPEDE_LENGTH,
                    },
                    Split {
                        distance: 700.0,
                        species: name("metal_squid"),
                        species2: Some(name("red_metal_squid")),
                    },
                ],
            ),
            Wave::new(
                "heck",
                vec![
                    RandomRain {
                        distance: 100.0,
                        quantity: 5,
                        species: name("metal_1"),
                    },
                    Block {
                        distance: 400.0,
                        species: name("block"),
                        species2: Some(name("blue_squid")),
                    },
                    Row {
                        distance: 1200.0,
                        species: name("flappy_red"),
                        species2: Some(name("arrow_stealth")),
                        x_offset: 0.0,
                    },
                ],
            ),
        ])
    }
}

impl Default for LevelSequence {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ship::EnemyShip;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn advance(
        levels: &mut LevelSequence,
        catalog: &Catalog,
        roster: &mut Vec<EnemyShip>,
    ) -> Option<usize> {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new(catalog, roster, &mut rng, 800.0);
        levels.advance(&mut spawner).unwrap()
    }

    fn two_waves() -> LevelSequence {
        LevelSequence::new(vec![
            Wave::new(
                "a",
                vec![Formation::Row {
                    distance: 0.0,
                    species: "squid".to_string(),
                    species2: None,
                    x_offset: 0.0,
                }],
            ),
            Wave::new(
                "b",
                vec![Formation::Split {
                    distance: 0.0,
                    species: "block".to_string(),
                    species2: None,
                }],
            ),
        ])
    }

    #[test]
    fn test_level_wrap_pins_last_wave() {
        let catalog = Catalog::builtin().unwrap();
        let mut levels = two_waves();
        let mut roster = Vec::new();

        assert_eq!(advance(&mut levels, &catalog, &mut roster), Some(0));
        assert_eq!(levels.current_index(), 1);
        assert_eq!(roster.len(), 10);

        roster.clear();
        assert_eq!(advance(&mut levels, &catalog, &mut roster), Some(1));
        assert_eq!(levels.current_index(), 1);
        assert_eq!(roster.len(), 8);

        roster.clear();
        assert_eq!(advance(&mut levels, &catalog, &mut roster), Some(1));
        assert_eq!(levels.current_index(), 1);
        assert_eq!(roster.len(), 8);
        assert!(roster.iter().all(|e| e.species() == "block"));
    }

    #[test]
    fn test_empty_sequence_spawns_nothing() {
        let catalog = Catalog::builtin().unwrap();
        let mut levels = LevelSequence::new(Vec::new());
        let mut roster = Vec::new();
        assert_eq!(advance(&mut levels, &catalog, &mut roster), None);
        assert!(roster.is_empty());
        assert_eq!(levels.current_index(), 0);
    }

    #[test]
    fn test_builtin_campaign_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        let levels = LevelSequence::builtin();
        assert!(levels.len() >= 2);
        levels.validate(&catalog).unwrap();
    }

    #[test]
    fn test_builtin_opening_waves() {
        let catalog = Catalog::builtin().unwrap();
        let mut levels = LevelSequence::builtin();
        let mut roster = Vec::new();

        advance(&mut levels, &catalog, &mut roster);
        assert_eq!(roster.len(), 40);
        assert_eq!(roster.iter().filter(|e| e.hull.pos.y == 100.0).count(), 10);

        roster.clear();
        advance(&mut levels, &catalog, &mut roster);
        assert_eq!(roster.len(), 100);
    }

    #[test]
    fn test_validate_reports_unknown_species() {
        let catalog = Catalog::builtin().unwrap();
        let levels = LevelSequence::new(vec![Wave::new(
            "bad",
            vec![Formation::RandomRain {
                distance: 0.0,
                quantity: 3,
                species: "kraken".to_string(),
            }],
        )]);
        assert!(matches!(
            levels.validate(&catalog),
            Err(SimError::UnknownSpecies { name }) if name == "kraken"
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "waves": [
                { "name": "opener", "formations": [
                    { "kind": "row", "distance": -100.0, "species": "squid" },
                    { "kind": "centipede_left", "distance": 0.0, "head": "centihead_red",
                      "body1": "centi_blue", "body2": "centi_green" }
                ] }
            ]
        }"#;
        let levels = LevelSequence::from_json(json).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels.current_index(), 0);
        match &levels.waves[0].formations[1] {
            Formation::CentipedeLeft { length, .. } => assert_eq!(*length, CENTIPEDE_LENGTH),
            other => panic!("unexpected formation {other:?}"),
        }
        assert_eq!(levels.waves[0].formations[0].species_ids(), vec!["squid"]);
    }
}
