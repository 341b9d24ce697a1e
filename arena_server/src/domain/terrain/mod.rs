// Destructible grid terrain: generation, line of sight and live state.

pub mod generator;
pub mod grid;
pub mod state;
pub mod visibility;

pub use generator::{GeneratorSettings, TerrainMode};
pub use grid::{CellCoord, GridShape, Material, TerrainLayout, Walls};
pub use state::{CellChange, DamageOutcome, TerrainListener, TerrainState};
pub use visibility::VisibilitySet;
