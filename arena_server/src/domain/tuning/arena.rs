// Arena-wide tuning: terrain shape, destruction and population.

use crate::domain::terrain::GeneratorSettings;

#[derive(Debug, Clone, Copy)]
pub struct ArenaTuning {
    /// Terrain generation; `terrain.size` is the grid side length in cells.
    pub terrain: GeneratorSettings,

    /// Side length of one cell in world units.
    pub cell_size: f64,

    /// Line-of-sight radius in cells.
    pub visibility_radius: usize,

    /// Integrity of a freshly generated rock cell.
    pub rock_integrity: i32,

    /// Seed for terrain and spawn randomness; `None` picks one at startup.
    pub seed: Option<u64>,

    /// AI opponents spawned when the arena opens.
    pub ai_count: usize,

    /// Random spawn probes before falling back to a full scan of free cells.
    pub spawn_attempts: usize,
}

impl ArenaTuning {
    pub fn grid_size(&self) -> usize {
        self.terrain.size
    }

    /// Side length of the square play area in world units.
    pub fn world_size(&self) -> f64 {
        self.terrain.size as f64 * self.cell_size
    }
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            terrain: GeneratorSettings::default(),
            cell_size: 32.0,
            visibility_radius: 8,
            rock_integrity: 12,
            seed: None,
            ai_count: 3,
            spawn_attempts: 256,
        }
    }
}
