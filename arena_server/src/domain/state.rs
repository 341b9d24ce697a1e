// Domain-level simulation entities and snapshot types.

use crate::domain::tuning::ProjectileKind;
use glam::DVec2;

#[derive(Debug, Clone)]
pub struct EntitySnapshot {
    pub id: u64,
    pub display_name: String,
    pub is_ai: bool,
    pub ship_type: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub direction: f64,
    pub health: i32,
    pub max_health: i32,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub owner_id: u64,
    pub kind: ProjectileKind,
    pub x: f64,
    pub y: f64,
    pub direction: f64,
}

#[derive(Debug, Clone)]
pub struct SimEntity {
    pub id: u64,
    pub display_name: String,
    pub is_ai: bool,
    pub ship_type: String,

    // Kinematics (world units, milliseconds, radians).
    pub position: DVec2,
    pub velocity: DVec2,
    pub direction: f64, // [0, 2π)
    pub vr: f64,        // radians per millisecond
    pub accel: f64,     // forward acceleration per tick

    // Tank-style commanded axes, -1.0..=1.0.
    pub strafe: f64,
    pub throttle: f64,

    // Combat state.
    pub firing: bool,
    pub last_fired: Option<f64>, // elapsed ms of the last shot
    pub score: u32,
    pub health: i32,
    pub max_health: i32,
}

impl SimEntity {
    pub fn new(
        id: u64,
        display_name: impl Into<String>,
        ship_type: impl Into<String>,
        max_health: i32,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_ai: false,
            ship_type: ship_type.into(),
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            direction: 0.0,
            vr: 0.0,
            accel: 0.0,
            strafe: 0.0,
            throttle: 0.0,
            firing: false,
            last_fired: None,
            score: 0,
            health: max_health,
            max_health,
        }
    }

    /// Unit vector along the heading.
    pub fn forward(&self) -> DVec2 {
        DVec2::new(self.direction.cos(), self.direction.sin())
    }
}

#[derive(Debug, Clone)]
pub struct SimProjectile {
    pub id: u64,
    pub owner_id: u64,
    pub kind: ProjectileKind,
    pub position: DVec2,
    pub velocity: DVec2,
    pub direction: f64,
    pub remaining: f64, // ms until expiry
}

impl From<&SimEntity> for EntitySnapshot {
    fn from(e: &SimEntity) -> Self {
        Self {
            id: e.id,
            display_name: e.display_name.clone(),
            is_ai: e.is_ai,
            ship_type: e.ship_type.clone(),
            x: e.position.x,
            y: e.position.y,
            vx: e.velocity.x,
            vy: e.velocity.y,
            direction: e.direction,
            health: e.health,
            max_health: e.max_health,
            score: e.score,
        }
    }
}

impl From<&SimProjectile> for ProjectileSnapshot {
    fn from(p: &SimProjectile) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            kind: p.kind,
            x: p.position.x,
            y: p.position.y,
            direction: p.direction,
        }
    }
}
