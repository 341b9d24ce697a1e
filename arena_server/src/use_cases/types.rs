// Use-case level inputs/outputs for the arena loop.

use crate::domain::terrain::{Material, VisibilitySet};
use crate::domain::tuning::ShipProfile;
use crate::domain::{EntitySnapshot, Intent, ProjectileSnapshot};
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum GameEvent {
    Join { player_id: u64, display_name: String },
    Leave { player_id: u64 },
    Intent { player_id: u64, intent: Intent },
    /// Request the current static snapshot for a new observer.
    Observe { reply: oneshot::Sender<InitSnapshot> },
}

/// Derived per-tick counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickMetrics {
    pub tick: u64,
    pub humans: usize,
    pub ai: usize,
    pub projectiles: usize,
    pub shots_fired: u32,
    pub hits: u32,
    pub kills: u32,
    pub cells_destroyed: u32,
    pub respawns: u32,
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub entities: Vec<EntitySnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub metrics: TickMetrics,
}

/// A terrain cell whose material or visibility changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainDelta {
    pub row: usize,
    pub col: usize,
    pub material: Material,
    pub visible: VisibilitySet,
}

/// Static arena description handed once to a newly joined observer.
#[derive(Debug, Clone)]
pub struct InitSnapshot {
    pub grid_size: usize,
    pub cell_size: f64,
    pub visibility_radius: usize,
    pub drag: f64,
    pub max_health: i32,
    pub ships: Vec<ShipProfile>,
    /// Row-major materials.
    pub materials: Vec<Material>,
    /// Row-major rock integrity; 0 for free cells.
    pub integrity: Vec<i32>,
    /// Visible flat indices per cell, row-major.
    pub visibility: Vec<VisibilitySet>,
}
