pub mod autopilot;
pub mod collision;
pub mod movement;
pub mod projectiles;

pub use autopilot::Autopilot;
pub use movement::{MovementContext, MovementOutcome, tick_entity};
pub use projectiles::{ProjectileContext, ProjectileReport, tick_projectiles};
