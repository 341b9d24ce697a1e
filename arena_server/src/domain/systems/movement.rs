use crate::domain::angles::wrap_angle;
use crate::domain::state::{SimEntity, SimProjectile};
use crate::domain::systems::collision::{self, CircleMove};
use crate::domain::terrain::TerrainState;
use crate::domain::tuning::{ArenaConfig, ControlType, ShipProfile};
use glam::DVec2;
use tracing::warn;

/// Shared state one entity update reads and writes.
pub struct MovementContext<'a> {
    pub config: &'a ArenaConfig,
    pub terrain: &'a mut TerrainState,
    pub projectiles: &'a mut Vec<SimProjectile>,
    pub next_projectile_id: &'a mut u64,
    /// Elapsed simulation time in ms, used for fire-rate gating.
    pub elapsed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementOutcome {
    /// Ship type unknown; nothing about the entity changed.
    Skipped,
    Moved {
        fired: bool,
        /// The entity ended the tick inside rock and must be respawned.
        breached: bool,
    },
}

/// Advances one entity by `dt` milliseconds.
pub fn tick_entity(e: &mut SimEntity, dt: f64, ctx: &mut MovementContext<'_>) -> MovementOutcome {
    let config = ctx.config;
    let Some(ship) = config.ships.get(&e.ship_type) else {
        warn!(player_id = e.id, ship_type = %e.ship_type, "unknown ship type; skipping entity");
        return MovementOutcome::Skipped;
    };
    let cell_size = config.arena.cell_size;

    // Tank movement is commanded directly, so momentum never decays there.
    let drag = match ship.control {
        ControlType::Rocket => config.player.drag,
        ControlType::Tank => 0.0,
    };
    let (base, thrust) = match ship.control {
        ControlType::Rocket => (e.velocity, e.forward() * e.accel),
        ControlType::Tank => (DVec2::new(e.strafe, e.throttle) * ship.max_speed, DVec2::ZERO),
    };
    let velocity = base + thrust + e.velocity * drag;
    let proposed = e.position + velocity * dt;

    let outcome = collision::resolve(
        ctx.terrain,
        cell_size,
        CircleMove {
            from: e.position,
            to: proposed,
            velocity,
            radius: ship.radius,
            damage: config.player.terrain_damage,
        },
    );
    e.position = outcome.position;
    e.velocity = outcome.velocity;

    e.direction = wrap_angle(e.direction + e.vr * dt);
    wrap_position(&mut e.position, config.arena.world_size());

    let fired = try_fire(e, ship, ctx);
    let breached = ctx
        .terrain
        .material_at_world(e.position.x, e.position.y, cell_size)
        .is_solid();

    MovementOutcome::Moved { fired, breached }
}

fn try_fire(e: &mut SimEntity, ship: &ShipProfile, ctx: &mut MovementContext<'_>) -> bool {
    if !e.firing {
        return false;
    }
    let ready = e
        .last_fired
        .is_none_or(|last| ctx.elapsed - last >= ship.fire_delay);
    if !ready {
        return false;
    }

    let tuning = ctx.config.projectiles.get(ship.projectile);
    let forward = e.forward();
    ctx.projectiles.push(SimProjectile {
        id: *ctx.next_projectile_id,
        owner_id: e.id,
        kind: ship.projectile,
        // Spawn at the nose, on the edge of the ship's radius.
        position: e.position + forward * ship.radius,
        velocity: e.velocity + forward * tuning.muzzle_speed,
        direction: e.direction,
        remaining: tuning.life_time,
    });
    *ctx.next_projectile_id = ctx.next_projectile_id.wrapping_add(1);
    e.last_fired = Some(ctx.elapsed);
    true
}

/// Toroidal wrap into `[0, world_size)` on both axes.
fn wrap_position(position: &mut DVec2, world_size: f64) {
    for axis in [&mut position.x, &mut position.y] {
        let wrapped = axis.rem_euclid(world_size);
        *axis = if wrapped >= world_size { 0.0 } else { wrapped };
    }
}
