use crate::use_cases::{GameEvent, TerrainDelta, WorldUpdate};
use std::sync::Arc;
use tokio::sync::{Notify, broadcast, mpsc, watch};

/// Channels a transport layer uses to talk to one running arena.
#[derive(Clone)]
pub struct AppState {
    // Joins, leaves and intents flowing into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // World updates produced by the world task (domain structs).
    pub world_tx: broadcast::Sender<WorldUpdate>,
    // Terrain cells changed by destruction.
    pub terrain_tx: broadcast::Sender<TerrainDelta>,
    // Latest serialized world update for lag recovery.
    pub world_latest_tx: watch::Sender<String>,
    // Serialized terrain deltas, shared across observers.
    pub terrain_bytes_tx: broadcast::Sender<String>,
    // Stops the world task.
    pub shutdown: Arc<Notify>,
}
