// Arena orchestrator: owns the world and runs one tick at a time.

use super::types::{InitSnapshot, TickMetrics};
use crate::domain::spawn::{self, SpawnPicker};
use crate::domain::systems::{
    Autopilot, MovementContext, MovementOutcome, ProjectileContext, tick_entity, tick_projectiles,
};
use crate::domain::terrain::{CellChange, TerrainLayout, TerrainState, generator};
use crate::domain::{
    ArenaConfig, Intent, IntentQueue, SimEntity, SimError, SimProjectile, apply_intent,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::{debug, info, warn};

/// First id handed to AI entities; human session ids are expected below it.
pub const AI_ID_BASE: u64 = 1 << 62;

pub struct Simulation {
    config: ArenaConfig,
    seed: u64,
    terrain: TerrainState,
    entities: Vec<SimEntity>,
    projectiles: Vec<SimProjectile>,
    autopilots: Vec<Autopilot>,
    intents: IntentQueue,
    spawner: SpawnPicker,
    next_projectile_id: u64,
    next_ai_id: u64,
    tick: u64,
}

impl Simulation {
    /// Generates terrain from the configured mode and seed, then spawns the AI roster.
    pub fn new(config: ArenaConfig) -> Result<Self, SimError> {
        config.validate()?;
        let seed = config.arena.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = generator::generate(&config.arena.terrain, &mut rng);
        info!(
            seed,
            mode = %config.arena.terrain.mode,
            size = config.arena.grid_size(),
            "terrain generated"
        );
        Self::assemble(config, seed, layout, rng)
    }

    /// Builds an arena on a prepared layout instead of generating one.
    pub fn with_layout(config: ArenaConfig, layout: TerrainLayout) -> Result<Self, SimError> {
        config.validate()?;
        if layout.shape.size != config.arena.grid_size() {
            return Err(SimError::InvalidConfig(format!(
                "layout is {} cells wide but the arena expects {}",
                layout.shape.size,
                config.arena.grid_size()
            )));
        }
        let seed = config.arena.seed.unwrap_or_else(rand::random);
        Self::assemble(config, seed, layout, Pcg32::seed_from_u64(seed))
    }

    fn assemble(
        config: ArenaConfig,
        seed: u64,
        layout: TerrainLayout,
        rng: Pcg32,
    ) -> Result<Self, SimError> {
        let terrain = TerrainState::new(
            layout,
            config.arena.rock_integrity,
            config.arena.visibility_radius,
        );
        let spawner = SpawnPicker::new(rng, config.arena.spawn_attempts);
        let ai_count = config.arena.ai_count;

        let mut sim = Self {
            config,
            seed,
            terrain,
            entities: Vec::new(),
            projectiles: Vec::new(),
            autopilots: Vec::new(),
            intents: IntentQueue::default(),
            spawner,
            next_projectile_id: 1,
            next_ai_id: AI_ID_BASE,
            tick: 0,
        };
        for _ in 0..ai_count {
            sim.spawn_ai()?;
        }
        Ok(sim)
    }

    /// Registers the terrain change callback, replacing any previous one.
    pub fn set_terrain_listener<F>(&mut self, listener: F)
    where
        F: FnMut(CellChange<'_>) + Send + 'static,
    {
        self.terrain.set_listener(Box::new(listener));
    }

    /// Creates a human entity at a fresh spawn point.
    pub fn add_entity(&mut self, player_id: u64, display_name: &str) -> Result<(), SimError> {
        if self.entity(player_id).is_some() {
            return Err(SimError::DuplicatePlayer(player_id));
        }
        let e = self.spawn_entity(player_id, display_name, false)?;
        info!(
            player_id,
            display_name,
            x = e.position.x,
            y = e.position.y,
            "player joined"
        );
        self.entities.push(e);
        Ok(())
    }

    /// Adds one AI entity with its own autopilot and returns its id.
    pub fn spawn_ai(&mut self) -> Result<u64, SimError> {
        let mut id = self.next_ai_id;
        while self.entity(id).is_some() {
            id += 1;
        }
        self.next_ai_id = id + 1;

        let name = format!("Bot {}", id - AI_ID_BASE + 1);
        let e = self.spawn_entity(id, &name, true)?;
        debug!(player_id = id, name = %name, "ai spawned");
        self.entities.push(e);
        self.autopilots.push(Autopilot::new(id));
        Ok(id)
    }

    fn spawn_entity(&mut self, id: u64, name: &str, is_ai: bool) -> Result<SimEntity, SimError> {
        let ship = self
            .config
            .ships
            .default_ship()
            .ok_or_else(|| SimError::InvalidConfig("ship catalogue is empty".into()))?;
        let mut e = SimEntity::new(id, name, ship.name.clone(), self.config.player.max_health);
        e.is_ai = is_ai;
        e.position = self
            .spawner
            .spawn_point(&self.terrain, self.config.arena.cell_size)?;
        e.direction = self.spawner.random_heading();
        Ok(e)
    }

    /// Removes a human entity along with its projectiles and pending intents.
    pub fn remove_entity(&mut self, player_id: u64) -> Result<SimEntity, SimError> {
        let index = self
            .entities
            .iter()
            .position(|e| e.id == player_id)
            .ok_or(SimError::UnknownPlayer(player_id))?;
        if self.entities[index].is_ai {
            return Err(SimError::AiPlayer(player_id));
        }

        let e = self.entities.remove(index);
        self.projectiles.retain(|p| p.owner_id != player_id);
        self.intents.forget(player_id);
        info!(player_id, score = e.score, "player left");
        Ok(e)
    }

    /// Queues an intent to be applied at the start of the next tick.
    pub fn queue_intent(&mut self, player_id: u64, intent: Intent) -> Result<(), SimError> {
        if self.entity(player_id).is_none() {
            return Err(SimError::UnknownPlayer(player_id));
        }
        self.intents.push(player_id, intent);
        Ok(())
    }

    /// Runs one tick: autopilots, queued intents, ship physics, projectiles, metrics.
    ///
    /// `dt` and `elapsed` are in milliseconds. Nothing inside a tick fails;
    /// per-entity faults are logged and skipped.
    pub fn update(&mut self, dt: f64, elapsed: f64) -> TickMetrics {
        self.tick += 1;
        let mut metrics = TickMetrics {
            tick: self.tick,
            ..TickMetrics::default()
        };
        let destroyed_before = self.terrain.destroyed_count();

        for pilot in &mut self.autopilots {
            for intent in pilot.update(&self.entities) {
                self.intents.push(pilot.entity_id, intent);
            }
        }

        for (player_id, intent) in self.intents.drain() {
            let Some(e) = self.entities.iter_mut().find(|e| e.id == player_id) else {
                debug!(player_id, "dropping intent for departed player");
                continue;
            };
            if let Err(err) = apply_intent(e, intent, &self.config.ships) {
                warn!(player_id, error = %err, "intent rejected");
            }
        }

        let cell_size = self.config.arena.cell_size;
        let mut ctx = MovementContext {
            config: &self.config,
            terrain: &mut self.terrain,
            projectiles: &mut self.projectiles,
            next_projectile_id: &mut self.next_projectile_id,
            elapsed,
        };
        for e in &mut self.entities {
            let MovementOutcome::Moved { fired, breached } = tick_entity(e, dt, &mut ctx) else {
                continue;
            };
            if fired {
                metrics.shots_fired += 1;
            }
            if breached {
                warn!(
                    player_id = e.id,
                    x = e.position.x,
                    y = e.position.y,
                    "entity inside rock; respawning"
                );
                metrics.respawns += 1;
                if let Err(err) = spawn::respawn(e, &mut self.spawner, ctx.terrain, cell_size) {
                    warn!(player_id = e.id, error = %err, "respawn failed");
                }
            }
        }

        let mut ctx = ProjectileContext {
            config: &self.config,
            terrain: &mut self.terrain,
            spawner: &mut self.spawner,
        };
        let report = tick_projectiles(&mut self.entities, &mut self.projectiles, dt, &mut ctx);

        metrics.hits = report.player_hits;
        metrics.kills = report.kills;
        metrics.respawns += report.kills;
        metrics.cells_destroyed = (self.terrain.destroyed_count() - destroyed_before) as u32;
        metrics.ai = self.autopilots.len();
        metrics.humans = self.entities.len() - metrics.ai;
        metrics.projectiles = self.projectiles.len();
        metrics
    }

    /// Static configuration plus the current terrain for a new observer.
    pub fn init_snapshot(&self) -> InitSnapshot {
        InitSnapshot {
            grid_size: self.terrain.size(),
            cell_size: self.config.arena.cell_size,
            visibility_radius: self.terrain.visibility_radius(),
            drag: self.config.player.drag,
            max_health: self.config.player.max_health,
            ships: self.config.ships.iter().cloned().collect(),
            materials: self.terrain.materials().to_vec(),
            integrity: self.terrain.integrity().to_vec(),
            visibility: self.terrain.visibility().to_vec(),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn terrain(&self) -> &TerrainState {
        &self.terrain
    }

    pub fn entities(&self) -> &[SimEntity] {
        &self.entities
    }

    pub fn projectiles(&self) -> &[SimProjectile] {
        &self.projectiles
    }

    pub fn entity(&self, player_id: u64) -> Option<&SimEntity> {
        self.entities.iter().find(|e| e.id == player_id)
    }

    /// Direct mutable access, for scripted scenarios.
    pub fn entity_mut(&mut self, player_id: u64) -> Option<&mut SimEntity> {
        self.entities.iter_mut().find(|e| e.id == player_id)
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KeyEdge;
    use crate::domain::terrain::{CellCoord, Material, TerrainMode};
    use crate::domain::tuning::ProjectileKind;
    use glam::DVec2;
    use std::sync::{Arc, Mutex};

    fn config(size: usize) -> ArenaConfig {
        let mut config = ArenaConfig::default();
        config.arena.terrain.size = size;
        config.arena.cell_size = 10.0;
        config.arena.visibility_radius = 2;
        config.arena.rock_integrity = 3;
        config.arena.ai_count = 0;
        config.arena.seed = Some(7);
        config
    }

    fn open_arena(size: usize) -> Simulation {
        Simulation::with_layout(config(size), TerrainLayout::empty(size)).expect("valid arena")
    }

    #[test]
    fn when_same_seed_is_used_then_arenas_are_identical() {
        let mut cfg = config(24);
        cfg.arena.terrain.mode = TerrainMode::Cave;
        cfg.arena.ai_count = 2;

        let a = Simulation::new(cfg.clone()).expect("valid arena");
        let b = Simulation::new(cfg).expect("valid arena");

        assert_eq!(a.terrain().materials(), b.terrain().materials());
        let positions =
            |s: &Simulation| s.entities().iter().map(|e| e.position).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn when_layout_size_mismatches_then_arena_is_rejected() {
        let result = Simulation::with_layout(config(10), TerrainLayout::empty(12));

        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn when_adding_same_player_twice_then_second_join_fails() {
        let mut sim = open_arena(10);

        sim.add_entity(1, "Ada").expect("first join");
        let second = sim.add_entity(1, "Ada");

        assert_eq!(second, Err(SimError::DuplicatePlayer(1)));
        assert_eq!(sim.entities().len(), 1);
    }

    #[test]
    fn when_removing_ai_then_request_is_refused() {
        let mut cfg = config(10);
        cfg.arena.ai_count = 1;
        let mut sim = Simulation::with_layout(cfg, TerrainLayout::empty(10)).expect("valid arena");
        let bot = sim.entities()[0].id;

        assert_eq!(sim.remove_entity(bot).map(|e| e.id), Err(SimError::AiPlayer(bot)));
        assert_eq!(sim.remove_entity(42).map(|e| e.id), Err(SimError::UnknownPlayer(42)));
        assert_eq!(sim.entities().len(), 1);
    }

    #[test]
    fn when_player_leaves_then_their_projectiles_and_intents_go_too() {
        let mut sim = open_arena(20);
        sim.add_entity(1, "Ada").expect("join");
        sim.add_entity(2, "Bob").expect("join");
        for owner in [1, 2] {
            sim.projectiles.push(SimProjectile {
                id: owner,
                owner_id: owner,
                kind: ProjectileKind::Laser,
                position: DVec2::new(50.0, 50.0),
                velocity: DVec2::ZERO,
                direction: 0.0,
                remaining: 100.0,
            });
        }
        sim.queue_intent(1, KeyEdge::FireDown.into()).expect("known player");

        sim.remove_entity(1).expect("human player");

        assert_eq!(sim.projectiles().len(), 1);
        assert_eq!(sim.projectiles()[0].owner_id, 2);
        assert_eq!(sim.pending_intents(), 0);
    }

    #[test]
    fn when_intent_targets_unknown_player_then_it_is_refused() {
        let mut sim = open_arena(10);

        let result = sim.queue_intent(9, KeyEdge::FireDown.into());

        assert_eq!(result, Err(SimError::UnknownPlayer(9)));
    }

    #[test]
    fn when_fire_intent_is_queued_then_shot_happens_on_the_next_tick() {
        let mut sim = open_arena(20);
        sim.add_entity(1, "Ada").expect("join");
        sim.entity_mut(1).expect("joined").position = DVec2::new(100.0, 100.0);
        sim.queue_intent(1, KeyEdge::FireDown.into()).expect("known player");

        let metrics = sim.update(16.0, 1000.0);

        assert_eq!(metrics.tick, 1);
        assert_eq!(metrics.shots_fired, 1);
        assert_eq!(metrics.humans, 1);
        assert_eq!(metrics.projectiles, 1);
        assert!(sim.entity(1).expect("still present").firing);
    }

    #[test]
    fn when_ai_sees_a_player_then_it_fires_through_the_shared_intent_path() {
        let mut cfg = config(20);
        cfg.arena.ai_count = 1;
        let mut sim = Simulation::with_layout(cfg, TerrainLayout::empty(20)).expect("valid arena");
        sim.add_entity(1, "Ada").expect("join");

        let metrics = sim.update(16.0, 1000.0);

        let bot = sim.entities().iter().find(|e| e.is_ai).expect("ai spawned");
        assert!(bot.firing);
        assert_eq!(metrics.ai, 1);
        assert_eq!(metrics.shots_fired, 1);
    }

    #[test]
    fn when_entity_ends_up_inside_rock_then_it_is_respawned_on_free_ground() {
        let layout = TerrainLayout::from_rows(&[
            "..........",
            "..........",
            "..........",
            "..........",
            "....###...",
            "....###...",
            "....###...",
            "..........",
            "..........",
            "..........",
        ]);
        let mut sim = Simulation::with_layout(config(10), layout).expect("valid arena");
        sim.add_entity(1, "Ada").expect("join");
        let e = sim.entity_mut(1).expect("joined");
        e.position = DVec2::new(55.0, 55.0);
        e.health = 10;

        let metrics = sim.update(1.0, 1.0);

        let e = sim.entity(1).expect("still present");
        assert_eq!(metrics.respawns, 1);
        assert_eq!(e.health, e.max_health);
        assert_eq!(
            sim.terrain().material_at_world(e.position.x, e.position.y, 10.0),
            Material::Free
        );
    }

    #[test]
    fn when_rock_is_destroyed_then_listener_hears_every_cell_in_radius() {
        let mut layout = TerrainLayout::empty(10);
        let index = layout.shape.index(CellCoord::new(5, 5));
        layout.materials[index] = Material::Rock;
        let mut cfg = config(10);
        cfg.arena.rock_integrity = 1;
        let mut sim = Simulation::with_layout(cfg, layout).expect("valid arena");
        let heard = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&heard);
        sim.set_terrain_listener(move |change| {
            if let Ok(mut cells) = sink.lock() {
                cells.push((change.row, change.col, change.material));
            }
        });
        sim.add_entity(1, "Ada").expect("join");
        sim.projectiles.push(SimProjectile {
            id: 99,
            owner_id: 1,
            kind: ProjectileKind::Laser,
            position: DVec2::new(45.0, 55.0),
            velocity: DVec2::new(1.0, 0.0),
            direction: 0.0,
            remaining: 100.0,
        });
        sim.entity_mut(1).expect("joined").position = DVec2::new(15.0, 15.0);

        let metrics = sim.update(8.0, 8.0);

        let heard = heard.lock().expect("listener mutex");
        assert_eq!(metrics.cells_destroyed, 1);
        assert_eq!(heard.len(), 13);
        assert!(heard.contains(&(5, 5, Material::Free)));
    }
}
