// Domain layer: core simulation types and rules.

pub mod angles;
pub mod errors;
pub mod intent;
pub mod spawn;
pub mod state;
pub mod systems;
pub mod terrain;
pub mod tuning;

pub use errors::SimError;
pub use intent::{Intent, IntentQueue, KeyEdge, apply_intent};
pub use state::{EntitySnapshot, ProjectileSnapshot, SimEntity, SimProjectile};
pub use tuning::ArenaConfig;
