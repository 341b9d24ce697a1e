// Use cases layer: the arena orchestrator and its async driver.

pub mod game;
pub mod simulation;
pub mod types;

pub use simulation::Simulation;
pub use types::{GameEvent, InitSnapshot, TerrainDelta, TickMetrics, WorldUpdate};
