// Wire protocol DTOs and conversions for arena observers and clients.

use crate::domain::terrain::Material;
use crate::domain::tuning::{ControlType, ShipProfile};
use crate::domain::{EntitySnapshot, Intent, KeyEdge, ProjectileSnapshot, SimError};
use crate::use_cases::{GameEvent, InitSnapshot, TerrainDelta, TickMetrics, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to observers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Static arena description, sent once after joining.
    Init(InitSnapshotDto),
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // One terrain cell changed material or visibility.
    TerrainDelta(TerrainDeltaDto),
}

/// Messages a client sends to the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Join(JoinPayload),
    Leave,
    // Discrete button edge such as "fire-down".
    Key(KeyPayload),
    // Continuous control axis in [-1, 1].
    Axis(AxisPayload),
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinPayload {
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyPayload {
    pub token: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    Turn,
    Accelerate,
    Heading,
    Strafe,
    Throttle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AxisPayload {
    pub axis: AxisKind,
    #[serde(default)]
    pub value: f64,
}

impl ClientMessage {
    /// Turns a decoded client message into an arena event for `player_id`.
    pub fn into_event(self, player_id: u64) -> Result<GameEvent, SimError> {
        let event = match self {
            ClientMessage::Join(payload) => GameEvent::Join {
                player_id,
                display_name: payload.display_name,
            },
            ClientMessage::Leave => GameEvent::Leave { player_id },
            ClientMessage::Key(payload) => GameEvent::Intent {
                player_id,
                intent: Intent::Key(payload.token.parse::<KeyEdge>()?),
            },
            ClientMessage::Axis(payload) => {
                let v = payload.value;
                let intent = match payload.axis {
                    AxisKind::Turn => Intent::Turn(v),
                    AxisKind::Accelerate => Intent::Accelerate(v),
                    AxisKind::Heading => Intent::Heading(v),
                    AxisKind::Strafe => Intent::Strafe(v),
                    AxisKind::Throttle => Intent::Throttle(v),
                };
                GameEvent::Intent {
                    player_id,
                    intent: intent.clamped(),
                }
            }
        };
        Ok(event)
    }
}

fn material_code(material: Material) -> u8 {
    match material {
        Material::Free => 0,
        Material::Rock => 1,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipDto {
    pub name: String,
    pub control: &'static str,
    pub radius: f64,
    pub fire_delay: f64,
    pub projectile: &'static str,
    pub turn_rate: f64,
    pub acceleration: f64,
    pub max_speed: f64,
}

impl From<&ShipProfile> for ShipDto {
    fn from(ship: &ShipProfile) -> Self {
        Self {
            name: ship.name.clone(),
            control: match ship.control {
                ControlType::Rocket => "rocket",
                ControlType::Tank => "tank",
            },
            radius: ship.radius,
            fire_delay: ship.fire_delay,
            projectile: ship.projectile.name(),
            turn_rate: ship.turn_rate,
            acceleration: ship.acceleration,
            max_speed: ship.max_speed,
        }
    }
}

/// Grids are flattened row-major; materials encode 0 = free, 1 = rock.
#[derive(Debug, Clone, Serialize)]
pub struct InitSnapshotDto {
    pub grid_size: usize,
    pub cell_size: f64,
    pub visibility_radius: usize,
    pub drag: f64,
    pub max_health: i32,
    pub ships: Vec<ShipDto>,
    pub materials: Vec<u8>,
    pub integrity: Vec<i32>,
    pub visibility: Vec<Vec<u32>>,
}

impl From<InitSnapshot> for InitSnapshotDto {
    fn from(snapshot: InitSnapshot) -> Self {
        Self {
            grid_size: snapshot.grid_size,
            cell_size: snapshot.cell_size,
            visibility_radius: snapshot.visibility_radius,
            drag: snapshot.drag,
            max_health: snapshot.max_health,
            ships: snapshot.ships.iter().map(ShipDto::from).collect(),
            materials: snapshot.materials.into_iter().map(material_code).collect(),
            integrity: snapshot.integrity,
            visibility: snapshot.visibility,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TerrainDeltaDto {
    pub row: usize,
    pub col: usize,
    pub material: u8,
    pub visible: Vec<u32>,
}

impl From<TerrainDelta> for TerrainDeltaDto {
    fn from(delta: TerrainDelta) -> Self {
        Self {
            row: delta.row,
            col: delta.col,
            material: material_code(delta.material),
            visible: delta.visible,
        }
    }
}

/// Snapshot of the world sent to observers on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub entities: Vec<EntityStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
    pub metrics: TickMetricsDto,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            entities: update.entities.iter().map(EntityStateDto::from).collect(),
            projectiles: update
                .projectiles
                .iter()
                .map(ProjectileStateDto::from)
                .collect(),
            metrics: update.metrics.into(),
        }
    }
}

/// Flattened entity state; ids are strings so JavaScript clients keep full precision.
#[derive(Debug, Clone, Serialize)]
pub struct EntityStateDto {
    pub id: String,
    pub name: String,
    pub ai: bool,
    pub ship: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub rot: f64,
    pub hp: i32,
    pub max_hp: i32,
    pub score: u32,
}

impl From<&EntitySnapshot> for EntityStateDto {
    fn from(entity: &EntitySnapshot) -> Self {
        Self {
            id: entity.id.to_string(),
            name: entity.display_name.clone(),
            ai: entity.is_ai,
            ship: entity.ship_type.clone(),
            x: entity.x,
            y: entity.y,
            vx: entity.vx,
            vy: entity.vy,
            rot: entity.direction,
            hp: entity.health,
            max_hp: entity.max_health,
            score: entity.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileStateDto {
    pub id: String,
    pub owner_id: String,
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub rot: f64,
}

impl From<&ProjectileSnapshot> for ProjectileStateDto {
    fn from(projectile: &ProjectileSnapshot) -> Self {
        Self {
            id: projectile.id.to_string(),
            owner_id: projectile.owner_id.to_string(),
            kind: projectile.kind.name(),
            x: projectile.x,
            y: projectile.y,
            rot: projectile.direction,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TickMetricsDto {
    pub humans: usize,
    pub ai: usize,
    pub projectiles: usize,
    pub shots_fired: u32,
    pub hits: u32,
    pub kills: u32,
    pub cells_destroyed: u32,
    pub respawns: u32,
}

impl From<TickMetrics> for TickMetricsDto {
    fn from(m: TickMetrics) -> Self {
        Self {
            humans: m.humans,
            ai: m.ai,
            projectiles: m.projectiles,
            shots_fired: m.shots_fired,
            hits: m.hits,
            kills: m.kills,
            cells_destroyed: m.cells_destroyed,
            respawns: m.respawns,
        }
    }
}
