// Gameplay tuning for projectiles.
//
// Distances are world units, times are milliseconds.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Laser,
    Cannonball,
}

impl ProjectileKind {
    pub fn name(self) -> &'static str {
        match self {
            ProjectileKind::Laser => "laser",
            ProjectileKind::Cannonball => "cannonball",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Speed added along the shooter's heading, in world units per millisecond.
    pub muzzle_speed: f64,

    /// Lifetime before the projectile is despawned.
    pub life_time: f64,

    /// Health removed from a ship on hit.
    pub damage: i32,

    /// Integrity removed from a rock cell on impact.
    pub terrain_damage: i32,
}

/// Per-kind projectile tuning.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileCatalogue {
    pub laser: ProjectileTuning,
    pub cannonball: ProjectileTuning,
}

impl ProjectileCatalogue {
    pub fn get(&self, kind: ProjectileKind) -> &ProjectileTuning {
        match kind {
            ProjectileKind::Laser => &self.laser,
            ProjectileKind::Cannonball => &self.cannonball,
        }
    }
}

impl Default for ProjectileCatalogue {
    fn default() -> Self {
        Self {
            laser: ProjectileTuning {
                muzzle_speed: 0.6,
                life_time: 1200.0,
                damage: 10,
                terrain_damage: 1,
            },
            cannonball: ProjectileTuning {
                muzzle_speed: 0.35,
                life_time: 2000.0,
                damage: 35,
                terrain_damage: 4,
            },
        }
    }
}
