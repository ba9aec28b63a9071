use neon_arcade_core::{
    CellCoord, DamageKind, EmplacementKind, EnemyCategory, Event, HordeCategory, LaneCategory,
    ScriptedDice, Vec2,
};
use neon_arcade_system_combat::{Combat, Config};
use neon_arcade_system_physics::advance_homing;
use neon_arcade_world::{
    Arena, ArenaRules, EnemySpawn, EntityStore, Projectile, ProjectileMotion,
};

const CELL: f32 = 30.0;

fn lane_enemy(store: &mut EntityStore, category: LaneCategory, cell: CellCoord) {
    let _ = store.spawn_enemy(EnemySpawn {
        category: EnemyCategory::Lane(category),
        position: cell.center(CELL),
        hit_point_scale: 1.0,
        path: vec![cell],
    });
}

fn quiet() -> Combat {
    Combat::new(Config {
        burst_particles: 0,
        ..Config::default()
    })
}

fn fly_until_impact(combat: &Combat, store: &mut EntityStore, events: &mut Vec<Event>) {
    let mut dice = ScriptedDice::default();
    for _ in 0..20 {
        advance_homing(store);
        combat.resolve_homing_impacts(store, &mut dice, events);
        if store.projectiles().iter().all(|projectile| projectile.removed) {
            return;
        }
    }
    panic!("projectile never landed");
}

#[test]
fn turret_shot_applies_half_armor_to_basic_infantry() {
    let mut store = EntityStore::new();
    let _ = store.add_emplacement(CellCoord::new(5, 6), EmplacementKind::Turret);
    lane_enemy(&mut store, LaneCategory::Basic, CellCoord::new(7, 7));
    let combat = quiet();
    let mut events = Vec::new();

    combat.fire_emplacements(&mut store, 40, CELL, &mut events);
    assert!(events.is_empty(), "cooldown must strictly elapse");

    combat.fire_emplacements(&mut store, 41, CELL, &mut events);
    assert!(matches!(
        events.as_slice(),
        [Event::ProjectileFired {
            damage_kind: DamageKind::Kinetic,
            target: Some(_),
            ..
        }]
    ));
    assert_eq!(store.emplacements()[0].last_fired, 41);

    events.clear();
    fly_until_impact(&combat, &mut store, &mut events);

    let enemy = &store.enemies()[0];
    assert_eq!(enemy.vitals.hit_points, 36.0);
    assert!(matches!(
        events.as_slice(),
        [Event::EnemyHit { damage, .. }] if *damage == 24.0
    ));
}

#[test]
fn emplacements_ignore_enemies_out_of_range() {
    let mut store = EntityStore::new();
    let _ = store.add_emplacement(CellCoord::new(0, 0), EmplacementKind::Blaster);
    lane_enemy(&mut store, LaneCategory::Basic, CellCoord::new(4, 0));
    let mut events = Vec::new();
    quiet().fire_emplacements(&mut store, 100, CELL, &mut events);
    assert!(events.is_empty());
    assert!(store.projectiles().is_empty());
}

#[test]
fn dead_enemy_is_never_hit_twice() {
    let mut store = EntityStore::new();
    lane_enemy(&mut store, LaneCategory::Swarm, CellCoord::new(2, 2));
    store.enemies_mut()[0].vitals.shield = 0.0;
    let target = store.enemies()[0].id;
    for _ in 0..2 {
        store.push_projectile(Projectile {
            position: CellCoord::new(2, 2).center(CELL),
            motion: ProjectileMotion::Homing {
                target,
                speed: 12.0,
            },
            damage: 150.0,
            damage_kind: DamageKind::Explosive,
            radius: 0.0,
            arrived: false,
            removed: false,
        });
    }

    let mut events = Vec::new();
    fly_until_impact(&quiet(), &mut store, &mut events);

    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyHit { .. }))
        .count();
    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { reward: 5, .. }))
        .count();
    assert_eq!(hits, 1);
    assert_eq!(kills, 1);
    assert_eq!(store.cull().enemies, 1);
}

#[test]
fn multishot_fans_out_around_the_aim_line() {
    let mut arena = Arena::new(ArenaRules::default());
    let _ = arena.store_mut().spawn_enemy(EnemySpawn {
        category: EnemyCategory::Horde(HordeCategory::Grunt),
        position: Vec2::new(500.0, 300.0),
        hit_point_scale: 1.0,
        path: Vec::new(),
    });
    arena.avatar_mut().weapon.projectile_count = 3;

    let combat = quiet();
    let mut events = Vec::new();
    let (avatar, store) = arena.parts_mut();
    combat.fire_weapon(avatar, store, 21, &mut events);

    let headings: Vec<f32> = store
        .projectiles()
        .iter()
        .map(|projectile| match projectile.motion {
            ProjectileMotion::Ballistic { velocity, .. } => velocity.y.atan2(velocity.x),
            ProjectileMotion::Homing { .. } => f32::NAN,
        })
        .collect();
    assert_eq!(headings.len(), 3);
    for (heading, expected) in headings.iter().zip([-0.2_f32, 0.0, 0.2]) {
        assert!((heading - expected).abs() < 1e-5, "{heading} vs {expected}");
    }
    assert_eq!(avatar.weapon.last_fired, 21);

    events.clear();
    combat.fire_weapon(avatar, store, 30, &mut events);
    assert!(events.is_empty(), "weapon waits out its fire interval");
}

#[test]
fn bullet_kill_drops_a_pickup_and_particles() {
    let mut arena = Arena::new(ArenaRules::default());
    let _ = arena.store_mut().spawn_enemy(EnemySpawn {
        category: EnemyCategory::Horde(HordeCategory::Rusher),
        position: Vec2::new(420.0, 300.0),
        hit_point_scale: 1.0,
        path: Vec::new(),
    });
    let combat = Combat::default();
    let mut dice = ScriptedDice::new(vec![0.5]);
    let mut events = Vec::new();
    let (avatar, store) = arena.parts_mut();
    combat.fire_weapon(avatar, store, 21, &mut events);
    combat.resolve_bullet_contacts(store, &mut dice, &mut events);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemyKilled {
            reward: 3,
            category: EnemyCategory::Horde(HordeCategory::Rusher),
            ..
        }
    )));
    assert_eq!(store.pickups().len(), 1);
    assert_eq!(store.pickups()[0].value, 3);
    assert_eq!(store.particles().len(), 8);
    assert!(store.projectiles()[0].removed);
}
