use super::simulation::Simulation;
use super::types::{GameEvent, TerrainDelta, WorldUpdate};
use crate::domain::{EntitySnapshot, ProjectileSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc};
use tracing::{debug, info, warn};

/// Fixed-step driver around one arena; returns the simulation once shut down.
pub async fn world_task(
    mut sim: Simulation,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    terrain_tx: broadcast::Sender<TerrainDelta>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) -> Simulation {
    // Forward destroyed terrain to observers; no subscribers is fine.
    sim.set_terrain_listener(move |change| {
        let _ = terrain_tx.send(TerrainDelta {
            row: change.row,
            col: change.col,
            material: change.material,
            visible: change.visible.to_vec(),
        });
    });

    let dt = tick_interval.as_secs_f64() * 1000.0;
    let mut elapsed = 0.0;
    let mut interval = tokio::time::interval(tick_interval);
    info!(seed = sim.seed(), tick_ms = dt, "arena running");

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(ev) = input_rx.try_recv() {
            handle_event(&mut sim, ev);
        }

        elapsed += dt;
        let metrics = sim.update(dt, elapsed);

        let _ = world_tx.send(WorldUpdate {
            tick: metrics.tick,
            entities: sim.entities().iter().map(EntitySnapshot::from).collect(),
            projectiles: sim.projectiles().iter().map(ProjectileSnapshot::from).collect(),
            metrics,
        });
    }

    info!(tick = sim.tick(), "arena stopped");
    sim
}

fn handle_event(sim: &mut Simulation, ev: GameEvent) {
    match ev {
        GameEvent::Join {
            player_id,
            display_name,
        } => {
            if let Err(e) = sim.add_entity(player_id, &display_name) {
                warn!(player_id, error = %e, "join rejected");
            }
        }
        GameEvent::Leave { player_id } => {
            if let Err(e) = sim.remove_entity(player_id) {
                warn!(player_id, error = %e, "leave rejected");
            }
        }
        GameEvent::Intent { player_id, intent } => {
            if let Err(e) = sim.queue_intent(player_id, intent) {
                debug!(player_id, error = %e, "intent dropped");
            }
        }
        GameEvent::Observe { reply } => {
            let _ = reply.send(sim.init_snapshot());
        }
    }
}
