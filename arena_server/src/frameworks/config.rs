use crate::domain::ArenaConfig;
use crate::domain::terrain::TerrainMode;
use std::{env, str::FromStr, time::Duration};
use tracing::warn;

// Runtime/server constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;
pub const TERRAIN_BROADCAST_CAPACITY: usize = 1024;

pub const DEFAULT_TICK_MS: u64 = 1000 / 60;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparsable setting; using default");
            default
        }),
        Err(_) => default,
    }
}

pub fn grid_size() -> usize {
    env_or("ARENA_GRID_SIZE", 64)
}

pub fn cell_size() -> f64 {
    env_or("ARENA_CELL_SIZE", 32.0)
}

pub fn terrain_mode() -> TerrainMode {
    env_or("ARENA_TERRAIN_MODE", TerrainMode::Cave)
}

/// Fixed seed for reproducible arenas; unset means a fresh one per start.
pub fn seed() -> Option<u64> {
    env::var("ARENA_SEED").ok().and_then(|v| v.parse().ok())
}

pub fn ai_count() -> usize {
    env_or("ARENA_AI_COUNT", 3)
}

pub fn visibility_radius() -> usize {
    env_or("ARENA_VISIBILITY_RADIUS", 8)
}

pub fn tick_interval() -> Duration {
    Duration::from_millis(env_or("ARENA_TICK_MS", DEFAULT_TICK_MS).max(1))
}

/// Default tuning with the environment overrides applied.
pub fn arena_config() -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.arena.terrain.size = grid_size();
    config.arena.terrain.mode = terrain_mode();
    config.arena.cell_size = cell_size();
    config.arena.seed = seed();
    config.arena.ai_count = ai_count();
    config.arena.visibility_radius = visibility_radius();
    config
}
