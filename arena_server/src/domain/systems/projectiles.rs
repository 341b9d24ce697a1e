use crate::domain::spawn::{self, SpawnPicker};
use crate::domain::state::{SimEntity, SimProjectile};
use crate::domain::systems::collision::{self, CircleMove};
use crate::domain::terrain::TerrainState;
use crate::domain::tuning::ArenaConfig;
use tracing::{error, info};

pub struct ProjectileContext<'a> {
    pub config: &'a ArenaConfig,
    pub terrain: &'a mut TerrainState,
    pub spawner: &'a mut SpawnPicker,
}

/// What happened to projectiles during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectileReport {
    pub terrain_hits: u32,
    pub cells_destroyed: u32,
    pub player_hits: u32,
    pub kills: u32,
}

/// Advances every projectile by `dt` ms and resolves terrain and player hits.
///
/// Surviving projectiles keep their order. Entities are checked in insertion
/// order and the first non-owner in range takes the hit.
pub fn tick_projectiles(
    entities: &mut [SimEntity],
    projectiles: &mut Vec<SimProjectile>,
    dt: f64,
    ctx: &mut ProjectileContext<'_>,
) -> ProjectileReport {
    let config = ctx.config;
    let cell_size = config.arena.cell_size;
    let world_size = config.arena.world_size();
    let mut report = ProjectileReport::default();

    projectiles.retain_mut(|p| {
        let from = p.position;
        p.position += p.velocity * dt;
        p.remaining -= dt;

        let tuning = config.projectiles.get(p.kind);
        let outcome = collision::resolve(
            ctx.terrain,
            cell_size,
            CircleMove {
                from,
                to: p.position,
                velocity: p.velocity,
                radius: 0.0,
                damage: tuning.terrain_damage,
            },
        );
        if outcome.hit.is_some() {
            report.terrain_hits += 1;
            if outcome.destroyed {
                report.cells_destroyed += 1;
            }
            return false;
        }

        let inside = p.position.x > 0.0
            && p.position.x < world_size
            && p.position.y > 0.0
            && p.position.y < world_size;
        if p.remaining <= 0.0 || !inside {
            return false;
        }

        // Projectile vs player collision (naive O(P*E)).
        let victim = entities.iter().position(|e| {
            if e.id == p.owner_id {
                return false;
            }
            config
                .ships
                .get(&e.ship_type)
                .is_some_and(|ship| e.position.distance(p.position) <= ship.radius)
        });
        let Some(victim) = victim else {
            return true;
        };

        report.player_hits += 1;
        let target = &mut entities[victim];
        target.health -= tuning.damage;
        info!(
            victim_id = target.id,
            shooter_id = p.owner_id,
            projectile_id = p.id,
            victim_health = target.health,
            "player hit"
        );

        if target.health <= 0 {
            report.kills += 1;
            if let Err(e) = spawn::respawn(target, ctx.spawner, ctx.terrain, cell_size) {
                error!(player_id = target.id, error = %e, "respawn failed");
            }
            // Shooter may already be gone.
            if let Some(shooter) = entities.iter_mut().find(|e| e.id == p.owner_id) {
                shooter.score += 1;
            }
        }
        false
    });

    report
}
