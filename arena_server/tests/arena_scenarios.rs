mod support;

use arena_server::domain::terrain::{Material, TerrainLayout, TerrainMode, generator};
use arena_server::domain::{KeyEdge, SimError};
use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[test]
fn when_thrusting_for_one_tick_then_position_follows_the_integration_formula() {
    let mut cfg = support::config(200, 1.0);
    cfg.player.drag = -0.01;
    let mut sim = support::arena(cfg, TerrainLayout::empty(200));
    support::place(&mut sim, 1, 100.0, 100.0, 0.0);
    sim.entity_mut(1).expect("placed").accel = 0.01;

    sim.update(16.0, 16.0);

    let e = sim.entity(1).expect("still present");
    assert_eq!(e.velocity, DVec2::new(0.01, 0.0));
    assert!((e.position.x - 100.16).abs() < 1e-12);
    assert_eq!(e.position.y, 100.0);
}

#[test]
fn when_projectile_outlives_its_lifetime_within_one_tick_then_it_never_survives() {
    let mut cfg = support::config(40, 10.0);
    cfg.projectiles.laser.life_time = 1.0;
    let mut sim = support::arena(cfg, TerrainLayout::empty(40));
    support::place(&mut sim, 1, 200.0, 200.0, 0.0);
    sim.queue_intent(1, KeyEdge::FireDown.into())
        .expect("player present");

    let metrics = sim.update(2.0, 1000.0);

    assert_eq!(metrics.shots_fired, 1);
    assert_eq!(metrics.projectiles, 0);
    assert!(sim.projectiles().is_empty());
}

#[test]
fn when_two_ships_duel_then_only_the_target_takes_damage() {
    let mut sim = support::open_arena(40, 10.0);
    support::place(&mut sim, 1, 100.0, 100.0, 0.0);
    support::place(&mut sim, 2, 130.0, 100.0, 0.0);
    sim.queue_intent(1, KeyEdge::FireDown.into())
        .expect("player present");

    let mut hits = 0;
    for tick in 1..=5 {
        hits += sim.update(16.0, 16.0 * tick as f64).hits;
    }

    let shooter = sim.entity(1).expect("shooter present");
    let target = sim.entity(2).expect("target present");
    assert!(hits >= 1);
    assert_eq!(shooter.health, shooter.max_health);
    assert!(target.health < target.max_health);
}

#[test]
fn when_hit_is_lethal_then_score_rises_by_one_and_target_respawns_on_free_ground() {
    let rows = [
        "##########",
        "#........#",
        "#..####..#",
        "#........#",
        "#........#",
        "#..####..#",
        "#........#",
        "#........#",
        "#........#",
        "##########",
    ];
    let mut sim = support::arena(support::config(10, 40.0), TerrainLayout::from_rows(&rows));
    support::place(&mut sim, 1, 60.0, 140.0, 0.0);
    support::place(&mut sim, 2, 85.0, 140.0, 0.0);
    let laser = sim.config().projectiles.laser.damage;
    sim.entity_mut(2).expect("placed").health = laser;
    sim.queue_intent(1, KeyEdge::FireDown.into())
        .expect("player present");

    let metrics = sim.update(16.0, 1000.0);

    let shooter = sim.entity(1).expect("shooter present");
    let target = sim.entity(2).expect("target present");
    assert_eq!(metrics.kills, 1);
    assert_eq!(shooter.score, 1);
    assert_eq!(target.health, target.max_health);
    assert_eq!(target.velocity, DVec2::ZERO);
    assert_eq!(
        sim.terrain()
            .material_at_world(target.position.x, target.position.y, 40.0),
        Material::Free
    );
}

#[test]
fn when_every_cell_is_rock_then_joining_fails_loudly() {
    let mut cfg = support::config(3, 10.0);
    cfg.arena.spawn_attempts = 8;
    let mut sim = support::arena(cfg, TerrainLayout::from_rows(&["###", "###", "###"]));

    let result = sim.add_entity(1, "Ada");

    assert_eq!(result, Err(SimError::NoSpawnPoint { attempts: 8 }));
    assert!(sim.entities().is_empty());
}

#[test]
fn when_random_wall_arenas_are_generated_then_every_cell_is_reachable() {
    for seed in 0..25 {
        let mut cfg = support::config(16, 10.0);
        cfg.arena.terrain.mode = TerrainMode::RandomWalls;
        let mut rng = Pcg32::seed_from_u64(seed);

        let layout = generator::generate(&cfg.arena.terrain, &mut rng);

        let start = layout.shape.coord(0);
        let reached = generator::reachable_through_walls(layout.shape, &layout.walls, start);
        assert!(reached.iter().all(|r| *r), "seed {seed} left a pocket");
    }
}

#[test]
fn when_cave_arena_is_generated_then_players_spawn_and_see_themselves() {
    let mut cfg = support::config(32, 16.0);
    cfg.arena.terrain.mode = TerrainMode::Cave;
    cfg.arena.visibility_radius = 3;
    support::init_tracing();
    let mut sim = arena_server::Simulation::new(cfg).expect("cave arena should build");

    sim.add_entity(1, "Ada").expect("cave has free cells");

    let e = sim.entity(1).expect("joined");
    let terrain = sim.terrain();
    assert_eq!(terrain.material_at_world(e.position.x, e.position.y, 16.0), Material::Free);
    for (index, visible) in terrain.visibility().iter().enumerate() {
        assert!(visible.contains(&(index as u32)));
    }
}
