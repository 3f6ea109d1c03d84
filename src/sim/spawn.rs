//! Enemy formations
//!
//! Every function places enemies on a 64px grid. `distance` is how far above
//! the top edge the formation starts: negative values put it on screen,
//! positive values leave it to scroll in. With a second species the
//! formation alternates between the two.
//!
//! Formations only append to the enemy roster. Species are resolved before
//! anything is placed, so a bad name spawns nothing.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::catalog::{Catalog, Species};
use super::ship::EnemyShip;
use crate::consts::*;
use crate::error::SimError;

/// Places enemies into a roster
pub struct Spawner<'a> {
    catalog: &'a Catalog,
    roster: &'a mut Vec<EnemyShip>,
    rng: &'a mut Pcg32,
    width: f32,
}

impl<'a> Spawner<'a> {
    pub fn new(
        catalog: &'a Catalog,
        roster: &'a mut Vec<EnemyShip>,
        rng: &'a mut Pcg32,
        width: f32,
    ) -> Self {
        Self {
            catalog,
            roster,
            rng,
            width,
        }
    }

    fn pair(
        &self,
        species: &str,
        species2: Option<&str>,
    ) -> Result<(Arc<Species>, Arc<Species>), SimError> {
        let first = self.catalog.species(species)?.clone();
        let second = match species2 {
            Some(name) => self.catalog.species(name)?.clone(),
            None => first.clone(),
        };
        Ok((first, second))
    }

    fn place(&mut self, species: &Arc<Species>, x: f32, y: f32) {
        self.roster
            .push(EnemyShip::from_species(species.clone(), Vec2::new(x, y)));
    }

    /// Ten enemies side by side starting one grid unit in from the left
    pub fn row(
        &mut self,
        distance: f32,
        species: &str,
        species2: Option<&str>,
        x_offset: f32,
    ) -> Result<(), SimError> {
        let (a, b) = self.pair(species, species2)?;
        for i in 0..FORMATION_SIZE {
            let x = GRID + x_offset + GRID * i as f32;
            self.place(if i % 2 == 0 { &a } else { &b }, x, -distance);
        }
        Ok(())
    }

    /// Ten rows, each one grid unit further back
    pub fn block(
        &mut self,
        distance: f32,
        species: &str,
        species2: Option<&str>,
    ) -> Result<(), SimError> {
        self.pair(species, species2)?;
        for r in 0..FORMATION_SIZE {
            self.row(distance + GRID * r as f32, species, species2, 0.0)?;
        }
        Ok(())
    }

    /// Ten enemies stacked at a fixed x
    pub fn column(
        &mut self,
        distance: f32,
        x: f32,
        species: &str,
        species2: Option<&str>,
    ) -> Result<(), SimError> {
        let (a, b) = self.pair(species, species2)?;
        for i in 0..FORMATION_SIZE {
            let y = -(distance + GRID * i as f32);
            self.place(if i % 2 == 0 { &a } else { &b }, x, y);
        }
        Ok(())
    }

    /// A row with slots 3 and 4 left empty
    pub fn split(
        &mut self,
        distance: f32,
        species: &str,
        species2: Option<&str>,
    ) -> Result<(), SimError> {
        let (a, b) = self.pair(species, species2)?;
        for i in (0..FORMATION_SIZE).filter(|&i| i != 3 && i != 4) {
            let x = GRID + GRID * i as f32;
            self.place(if i % 2 == 0 { &a } else { &b }, x, -distance);
        }
        Ok(())
    }

    /// Eleven enemies in a V: the apex leads, the arms trail back one grid
    /// unit per slot
    pub fn v_formation(
        &mut self,
        distance: f32,
        species: &str,
        species2: Option<&str>,
    ) -> Result<(), SimError> {
        let (a, b) = self.pair(species, species2)?;
        let apex = V_FORMATION_SIZE / 2;
        let left = ((self.width - GRID * V_FORMATION_SIZE as f32) / 2.0).max(0.0);
        for i in 0..V_FORMATION_SIZE {
            let x = left + GRID * i as f32;
            let y = -(distance + GRID * i.abs_diff(apex) as f32);
            self.place(if i % 2 == 0 { &a } else { &b }, x, y);
        }
        Ok(())
    }

    /// Horizontal chain hugging the left edge: body segments then the head
    pub fn centipede_left(
        &mut self,
        distance: f32,
        head: &str,
        body1: &str,
        body2: &str,
        length: u32,
    ) -> Result<(), SimError> {
        self.centipede(distance, head, body1, body2, length, |i| GRID * i as f32)
    }

    /// Mirror of [`Spawner::centipede_left`] hugging the right edge
    pub fn centipede_right(
        &mut self,
        distance: f32,
        head: &str,
        body1: &str,
        body2: &str,
        length: u32,
    ) -> Result<(), SimError> {
        let width = self.width;
        self.centipede(distance, head, body1, body2, length, |i| {
            width - GRID * (i + 1) as f32
        })
    }

    fn centipede(
        &mut self,
        distance: f32,
        head: &str,
        body1: &str,
        body2: &str,
        length: u32,
        slot_x: impl Fn(u32) -> f32,
    ) -> Result<(), SimError> {
        let head = self.catalog.species(head)?.clone();
        let (a, b) = self.pair(body1, Some(body2))?;
        if length == 0 {
            return Ok(());
        }
        for i in 0..length {
            self.place(if i % 2 == 0 { &a } else { &b }, slot_x(i), -distance);
        }
        self.place(&head, slot_x(length), -distance);
        Ok(())
    }

    /// `quantity` enemies at random x, each 800px further back than the last
    pub fn random_rain(
        &mut self,
        distance: f32,
        quantity: u32,
        species: &str,
    ) -> Result<(), SimError> {
        let species = self.catalog.species(species)?.clone();
        let max_x = (self.width - GRID).max(0.0) as u32;
        for i in 0..quantity {
            let x = self.rng.random_range(0..=max_x) as f32;
            let y = -(distance + RAIN_SPACING * i as f32);
            self.place(&species, x, y);
        }
        Ok(())
    }
}
