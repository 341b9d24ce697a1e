// Framework bootstrap for the arena server runtime.

use crate::domain::ArenaConfig;
use crate::frameworks::config;
use crate::interface_adapters::net::{terrain_delta_serializer, world_update_serializer};
use crate::interface_adapters::state::AppState;
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, Simulation, TerrainDelta, WorldUpdate};

use std::{io::Result, sync::Arc, time::Duration};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::task::JoinHandle;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Spawns the world task and its serializers, returning the shared channels.
pub fn start_arena(
    sim: Simulation,
    tick_interval: Duration,
) -> (Arc<AppState>, JoinHandle<Simulation>) {
    // Channel wiring for the world loop.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
    let (world_tx, _world_rx) =
        broadcast::channel::<WorldUpdate>(config::WORLD_BROADCAST_CAPACITY);
    let (terrain_tx, _terrain_rx) =
        broadcast::channel::<TerrainDelta>(config::TERRAIN_BROADCAST_CAPACITY);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<String>(String::new());
    let (terrain_bytes_tx, _terrain_bytes_rx) =
        broadcast::channel::<String>(config::TERRAIN_BROADCAST_CAPACITY);
    let shutdown = Arc::new(Notify::new());

    let state = Arc::new(AppState {
        input_tx,
        world_tx,
        terrain_tx,
        world_latest_tx,
        terrain_bytes_tx,
        shutdown,
    });

    // Subscribe the serializers before the first tick so nothing is missed.
    tokio::spawn(world_update_serializer(
        state.world_tx.subscribe(),
        state.world_latest_tx.clone(),
    ));
    tokio::spawn(terrain_delta_serializer(
        state.terrain_tx.subscribe(),
        state.terrain_bytes_tx.clone(),
    ));

    let world = tokio::spawn(world_task(
        sim,
        input_rx,
        state.world_tx.clone(),
        state.terrain_tx.clone(),
        tick_interval,
        state.shutdown.clone(),
    ));

    (state, world)
}

/// Runs an arena until Ctrl-C, then stops the world loop and reports the scores.
pub async fn run(arena: ArenaConfig, tick_interval: Duration) -> Result<()> {
    let sim = Simulation::new(arena).map_err(|e| {
        tracing::error!(error = %e, "failed to build arena");
        std::io::Error::other(e.to_string())
    })?;
    let (state, world) = start_arena(sim, tick_interval);

    tokio::signal::ctrl_c().await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    })?;
    tracing::info!("shutdown requested");
    state.shutdown.notify_one();

    let sim = world.await.map_err(|e| {
        tracing::error!(error = %e, "world task failed");
        std::io::Error::other(e)
    })?;
    for e in sim.entities() {
        tracing::info!(
            player_id = e.id,
            name = %e.display_name,
            score = e.score,
            "final score"
        );
    }
    Ok(())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();
    run(config::arena_config(), config::tick_interval()).await
}
