use crate::interface_adapters::protocol::{ServerMessage, TerrainDeltaDto, WorldUpdateDto};
use crate::use_cases::{TerrainDelta, WorldUpdate};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{error, warn};

/// Serializes each world update once and publishes the latest payload.
///
/// Lagging behind only skips stale updates; the loop ends when the world
/// task drops its sender.
pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_latest_tx: watch::Sender<String>,
) {
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(update));
                if let Some(txt) = encode(&msg) {
                    let _ = world_latest_tx.send(txt);
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

/// Serializes terrain deltas in order; every delta matters, so lag is reported as an error.
pub async fn terrain_delta_serializer(
    mut terrain_rx: broadcast::Receiver<TerrainDelta>,
    terrain_bytes_tx: broadcast::Sender<String>,
) {
    loop {
        match terrain_rx.recv().await {
            Ok(delta) => {
                let msg = ServerMessage::TerrainDelta(TerrainDeltaDto::from(delta));
                if let Some(txt) = encode(&msg) {
                    let _ = terrain_bytes_tx.send(txt);
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                error!(missed = n, "terrain serializer lagged; observers need a fresh init");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("terrain channel closed; serializer exiting");
                break;
            }
        }
    }
}

fn encode<T: Serialize>(msg: &T) -> Option<String> {
    serde_json::to_string(msg)
        .inspect_err(|e| error!(error = ?e, "failed to serialize server message"))
        .ok()
}
