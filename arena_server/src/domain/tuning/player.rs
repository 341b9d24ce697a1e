/// Gameplay tuning shared by every ship regardless of type.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Health a ship spawns and respawns with.
    pub max_health: i32,

    /// Linear drag coefficient applied per tick; negative values decay velocity.
    pub drag: f64,

    /// Integrity a ship grinds off a rock cell each tick it scrapes against it.
    pub terrain_damage: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            drag: -0.01,
            terrain_damage: 1,
        }
    }
}
