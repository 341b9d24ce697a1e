// Shared builders for deterministic arenas across integration tests.
#![allow(dead_code)]

use arena_server::Simulation;
use arena_server::domain::ArenaConfig;
use arena_server::domain::terrain::TerrainLayout;
use glam::DVec2;
use std::sync::OnceLock;

// One-time guard so every test binary installs a single log subscriber.
static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();
    });
}

// Small, seeded, AI-free arena with one-cell visibility so setup stays cheap.
pub fn config(size: usize, cell_size: f64) -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.arena.terrain.size = size;
    config.arena.cell_size = cell_size;
    config.arena.visibility_radius = 1;
    config.arena.ai_count = 0;
    config.arena.seed = Some(2024);
    config
}

pub fn arena(config: ArenaConfig, layout: TerrainLayout) -> Simulation {
    init_tracing();
    Simulation::with_layout(config, layout).expect("test arena should be valid")
}

pub fn open_arena(size: usize, cell_size: f64) -> Simulation {
    arena(config(size, cell_size), TerrainLayout::empty(size))
}

// Join a player and pin it in place, stopped, with the given heading.
pub fn place(sim: &mut Simulation, id: u64, x: f64, y: f64, direction: f64) {
    sim.add_entity(id, &format!("P{id}"))
        .expect("player should join");
    let e = sim.entity_mut(id).expect("player just joined");
    e.position = DVec2::new(x, y);
    e.velocity = DVec2::ZERO;
    e.direction = direction;
}
