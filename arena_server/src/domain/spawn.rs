// Spawn-point selection and respawning.

use crate::domain::errors::SimError;
use crate::domain::state::SimEntity;
use crate::domain::terrain::{CellCoord, TerrainState};
use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f64::consts::TAU;

/// Seeded source of spawn positions and headings.
#[derive(Debug, Clone)]
pub struct SpawnPicker {
    rng: Pcg32,
    max_attempts: usize,
}

impl SpawnPicker {
    pub fn new(rng: Pcg32, max_attempts: usize) -> Self {
        Self { rng, max_attempts }
    }

    /// Centre of a random free cell.
    ///
    /// Probes random cells up to the attempt cap, then falls back to picking
    /// among all free cells; fails only when the grid has none.
    pub fn spawn_point(&mut self, terrain: &TerrainState, cell_size: f64) -> Result<DVec2, SimError> {
        let size = terrain.size();
        if size == 0 {
            return Err(SimError::NoSpawnPoint { attempts: 0 });
        }

        for _ in 0..self.max_attempts {
            let cell = CellCoord::new(self.rng.random_range(0..size), self.rng.random_range(0..size));
            if !terrain.material(cell).is_solid() {
                return Ok(cell_center(cell, cell_size));
            }
        }

        let free: Vec<CellCoord> = terrain.free_cells().collect();
        if free.is_empty() {
            return Err(SimError::NoSpawnPoint {
                attempts: self.max_attempts,
            });
        }
        let cell = free[self.rng.random_range(0..free.len())];
        Ok(cell_center(cell, cell_size))
    }

    pub fn random_heading(&mut self) -> f64 {
        self.rng.random_range(0.0..TAU)
    }
}

pub fn cell_center(cell: CellCoord, cell_size: f64) -> DVec2 {
    DVec2::new(
        (cell.col as f64 + 0.5) * cell_size,
        (cell.row as f64 + 0.5) * cell_size,
    )
}

/// Heals, stops and relocates an entity; it keeps its identity and score.
///
/// On spawn failure the entity is still healed and stopped but stays where it is.
pub fn respawn(
    e: &mut SimEntity,
    picker: &mut SpawnPicker,
    terrain: &TerrainState,
    cell_size: f64,
) -> Result<(), SimError> {
    e.health = e.max_health;
    e.velocity = DVec2::ZERO;
    e.direction = picker.random_heading();
    e.last_fired = None;
    e.position = picker.spawn_point(terrain, cell_size)?;
    Ok(())
}
