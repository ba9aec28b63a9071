use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use neon_arcade_core::{Command, Event, LaneCategory, SeededDice, Vec2};
use neon_arcade_system_spawning::{HordeSpawner, WaveController, WavePhase};
use neon_arcade_world::{self as world, query, LaneRules, World};

fn step(world: &mut World, controller: &mut WaveController, log: &mut Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
    let mut commands = Vec::new();
    controller.handle(&events, query::live_enemy_count(world), &mut commands);
    for command in commands {
        log.push(command.clone());
        world::apply(world, command, &mut events);
    }
    let mut settled = Vec::new();
    let _ = world::settle(world, &events, &mut settled);
    events.extend(settled);
    events
}

fn start(world: &mut World, controller: &mut WaveController, log: &mut Vec<Command>) {
    let mut events = Vec::new();
    world::apply(world, Command::SetRunning { running: true }, &mut events);
    let mut commands = Vec::new();
    controller.handle(&events, query::live_enemy_count(world), &mut commands);
    for command in commands {
        log.push(command.clone());
        world::apply(world, command, &mut events);
    }
}

#[test]
fn first_wave_releases_on_interval_frames() {
    let mut world = World::new(LaneRules::default()).expect("default rules");
    let mut controller = WaveController::new();
    let mut log = Vec::new();
    start(&mut world, &mut controller, &mut log);

    for _ in 0..360 {
        let _ = step(&mut world, &mut controller, &mut log);
    }

    let spawns = log
        .iter()
        .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
        .count();
    assert_eq!(spawns, 6, "wave one releases six basic enemies by frame 360");
    assert_eq!(query::live_enemy_count(&world), 6);
    assert!(matches!(
        log.first(),
        Some(Command::BeginWave { plan }) if plan.category == LaneCategory::Basic
    ));
}

#[test]
fn cleared_wave_completes_exactly_once() {
    let mut world = World::new(LaneRules::default()).expect("default rules");
    let mut controller = WaveController::new();
    let mut log = Vec::new();
    start(&mut world, &mut controller, &mut log);
    for _ in 0..360 {
        let _ = step(&mut world, &mut controller, &mut log);
    }

    for enemy in world.store_mut().enemies_mut() {
        enemy.vitals.hit_points = 0.0;
    }
    let mut scratch = Vec::new();
    let _ = world::settle(&mut world, &[], &mut scratch);
    assert_eq!(query::live_enemy_count(&world), 0);

    let mut cleared = Vec::new();
    for _ in 0..5 {
        cleared.extend(
            step(&mut world, &mut controller, &mut log)
                .into_iter()
                .filter(|event| matches!(event, Event::WaveCleared { .. })),
        );
    }

    assert_eq!(
        cleared,
        vec![Event::WaveCleared {
            wave: 1,
            reward: 60
        }]
    );
    assert_eq!(query::money(&world), 260);
    assert_eq!(query::wave(&world), 2);
    assert!(!query::is_running(&world));
    assert_eq!(controller.phase(), WavePhase::Cleared);
    assert_eq!(controller.plan().category, LaneCategory::Swarm);
}

#[test]
fn sealing_the_only_corridor_is_refused_and_wave_keeps_releasing() {
    let mut world = World::new(LaneRules {
        columns: 3,
        rows: 1,
        source: neon_arcade_core::CellCoord::new(0, 0),
        target: neon_arcade_core::CellCoord::new(2, 0),
        ..LaneRules::default()
    })
    .expect("valid rules");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceStructure {
            cell: neon_arcade_core::CellCoord::new(1, 0),
            structure: neon_arcade_core::Structure::Obstacle,
        },
        &mut events,
    );
    assert!(
        matches!(events.as_slice(), [Event::PlacementRejected { .. }]),
        "the only corridor cannot be blocked"
    );

    let mut controller = WaveController::new();
    let mut log = Vec::new();
    start(&mut world, &mut controller, &mut log);
    for _ in 0..360 {
        let _ = step(&mut world, &mut controller, &mut log);
    }
    assert!(!controller.is_releasing());
    assert_eq!(query::live_enemy_count(&world), 6);
}

#[test]
fn horde_replay_is_deterministic() {
    fn fingerprint(seed: u64) -> u64 {
        let spawner = HordeSpawner::default();
        let mut dice = SeededDice::new(seed);
        let mut hasher = DefaultHasher::new();
        for frame in 1..=600 {
            let level = 1 + (frame / 200) as u32;
            if let Some(request) = spawner.poll(frame, level, Vec2::new(400.0, 300.0), &mut dice) {
                frame.hash(&mut hasher);
                format!("{:?}", request.category).hash(&mut hasher);
                request.position.x.to_bits().hash(&mut hasher);
                request.position.y.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    assert_eq!(fingerprint(0xfeed), fingerprint(0xfeed));
    assert_ne!(fingerprint(0xfeed), fingerprint(0xbeef));
}
