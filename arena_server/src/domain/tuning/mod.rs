// Gameplay tuning, kept apart from runtime configuration.

pub mod arena;
pub mod player;
pub mod projectile;
pub mod ship;

pub use arena::ArenaTuning;
pub use player::PlayerTuning;
pub use projectile::{ProjectileCatalogue, ProjectileKind, ProjectileTuning};
pub use ship::{ControlType, ShipCatalogue, ShipProfile};

use crate::domain::errors::SimError;

/// Everything the simulation needs to know before the first tick.
#[derive(Debug, Clone, Default)]
pub struct ArenaConfig {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub ships: ShipCatalogue,
    pub projectiles: ProjectileCatalogue,
}

impl ArenaConfig {
    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        let arena = &self.arena;
        if arena.grid_size() == 0 {
            return Err(SimError::InvalidConfig("grid size must be positive".into()));
        }
        if !(arena.cell_size > 0.0) {
            return Err(SimError::InvalidConfig("cell size must be positive".into()));
        }
        if arena.visibility_radius == 0 {
            return Err(SimError::InvalidConfig(
                "visibility radius must be at least one cell".into(),
            ));
        }
        if arena.rock_integrity <= 0 {
            return Err(SimError::InvalidConfig("rock integrity must be positive".into()));
        }
        if !(0.0..=1.0).contains(&arena.terrain.wall_probability)
            || !(0.0..=1.0).contains(&arena.terrain.cave_fill)
        {
            return Err(SimError::InvalidConfig(
                "generator probabilities must lie in [0, 1]".into(),
            ));
        }
        if self.player.drag > 0.0 || self.player.drag <= -1.0 {
            return Err(SimError::InvalidConfig("drag must lie in (-1, 0]".into()));
        }
        if self.player.max_health <= 0 {
            return Err(SimError::InvalidConfig("max health must be positive".into()));
        }
        if self.ships.is_empty() {
            return Err(SimError::InvalidConfig("ship catalogue is empty".into()));
        }
        if let Some(ship) = self.ships.iter().find(|s| !(s.radius >= 0.0)) {
            return Err(SimError::InvalidConfig(format!(
                "ship type {} has a negative radius",
                ship.name
            )));
        }
        Ok(())
    }
}
