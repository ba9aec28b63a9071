#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Neon Arcade.
//!
//! The lane-defense [`World`] owns the grid, the entity store and the
//! economy counters. Hosts and systems mutate it through [`apply`], per-tick
//! systems step its [`EntityStore`] directly, and [`settle`] folds the
//! resulting events back into lives, money and score before culling.

pub mod arena;
pub mod grid;
pub mod navigation;
pub mod store;

pub use arena::{Arena, ArenaRules, Avatar, Bounds, MovementStats, WeaponStats};
pub use grid::Grid;
pub use navigation::find_path;
pub use store::{
    CullReport, Emplacement, Enemy, EnemySpawn, EntityStore, Particle, Pickup, Projectile,
    ProjectileMotion,
};

use neon_arcade_core::{
    lane_hit_point_scale, CellCoord, CellKind, Command, EnemyCategory, Event, GridError,
    LaneCategory, PlacementError, RemovalError, Structure,
};
use tracing::{debug, info, warn};

/// Starting layout and economy of a lane world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneRules {
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Edge length of a cell in world units.
    pub cell_size: f32,
    /// Entry cell.
    pub source: CellCoord,
    /// Exit cell.
    pub target: CellCoord,
    /// Currency held at the start.
    pub starting_money: u32,
    /// Lives held at the start.
    pub starting_lives: u32,
}

impl Default for LaneRules {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            cell_size: 30.0,
            source: CellCoord::new(0, 7),
            target: CellCoord::new(19, 7),
            starting_money: 200,
            starting_lives: 10,
        }
    }
}

/// Represents the authoritative lane-defense world state.
#[derive(Clone, Debug)]
pub struct World {
    rules: LaneRules,
    grid: Grid,
    store: EntityStore,
    money: u32,
    lives: u32,
    wave: u32,
    score: u64,
    frame: u64,
    running: bool,
    game_over: bool,
    cached_path: Vec<CellCoord>,
}

impl World {
    /// Creates a new world from the provided rules.
    pub fn new(rules: LaneRules) -> Result<Self, GridError> {
        let mut grid = Grid::new(rules.columns, rules.rows, rules.source, rules.target)?;
        let cached_path = find_path(&mut grid, rules.source, rules.target, false);
        Ok(Self {
            rules,
            grid,
            store: EntityStore::new(),
            money: rules.starting_money,
            lives: rules.starting_lives,
            wave: 1,
            score: 0,
            frame: 0,
            running: false,
            game_over: false,
            cached_path,
        })
    }

    /// Mutable entity collections for per-tick systems.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    fn place(&mut self, cell: CellCoord, structure: Structure) -> Result<u32, PlacementError> {
        if self.game_over {
            return Err(PlacementError::GameOver);
        }
        if self.running {
            return Err(PlacementError::WaveInProgress);
        }
        let kind = self.grid.kind(cell).ok_or(PlacementError::OutOfBounds)?;
        if kind.is_protected() {
            return Err(PlacementError::Protected);
        }
        if kind != CellKind::Empty {
            return Err(PlacementError::Occupied);
        }
        let cost = structure.cost();
        if self.money < cost {
            return Err(PlacementError::InsufficientFunds {
                cost,
                available: self.money,
            });
        }

        let _ = self.grid.set_kind(cell, CellKind::from(structure));
        let path = find_path(&mut self.grid, self.rules.source, self.rules.target, false);
        if path.is_empty() {
            let _ = self.grid.set_kind(cell, kind);
            return Err(PlacementError::WouldSeverPath);
        }

        self.money -= cost;
        if let Structure::Emplacement(kind) = structure {
            let _ = self.store.add_emplacement(cell, kind);
        }
        self.cached_path = path;
        Ok(cost)
    }

    fn remove(&mut self, cell: CellCoord) -> Result<Structure, RemovalError> {
        if self.game_over {
            return Err(RemovalError::GameOver);
        }
        if self.running {
            return Err(RemovalError::WaveInProgress);
        }
        let kind = self.grid.kind(cell).ok_or(RemovalError::OutOfBounds)?;
        if kind.is_protected() {
            return Err(RemovalError::Protected);
        }
        let structure = kind.structure().ok_or(RemovalError::NothingToRemove)?;

        let _ = self.grid.set_kind(cell, CellKind::Empty);
        if let Structure::Emplacement(_) = structure {
            let _ = self.store.remove_emplacement_at(cell);
        }
        self.money = self.money.saturating_add(structure.refund());
        self.cached_path = find_path(&mut self.grid, self.rules.source, self.rules.target, false);
        Ok(structure)
    }

    /// Routes every enemy on the field again from the cell it stands on.
    ///
    /// Enemies that cannot reach the target keep their previous route.
    fn repath_enemies(&mut self, out: &mut Vec<Event>) {
        let Self {
            grid,
            store,
            rules,
            ..
        } = self;
        for enemy in store.enemies_mut() {
            if !enemy.is_alive() {
                continue;
            }
            let from = grid.nearest_cell(enemy.position, rules.cell_size);
            let path = find_path(grid, from, rules.target, enemy.category.is_aerial());
            if path.is_empty() {
                debug!(enemy = enemy.id.get(), "re-path failed, keeping stale route");
                out.push(Event::RepathFailed { enemy: enemy.id });
            } else {
                enemy.path = path.into();
                out.push(Event::EnemyRepathed {
                    enemy: enemy.id,
                    remaining_cells: enemy.path.len(),
                });
            }
        }
    }

    fn spawn(&mut self, category: LaneCategory, wave: u32, out: &mut Vec<Event>) {
        let source = self.rules.source;
        let path = find_path(&mut self.grid, source, self.rules.target, category.is_aerial());
        if path.is_empty() {
            warn!(?category, "no route from source, spawn skipped");
            out.push(Event::SpawnSkipped { category });
            return;
        }

        let position = source.center(self.rules.cell_size);
        let enemy = self.store.spawn_enemy(EnemySpawn {
            category: EnemyCategory::Lane(category),
            position,
            hit_point_scale: lane_hit_point_scale(wave),
            path,
        });
        debug!(enemy = enemy.get(), ?category, wave, "enemy spawned");
        out.push(Event::EnemySpawned {
            enemy,
            category: EnemyCategory::Lane(category),
            position,
        });
    }

    fn set_running(&mut self, running: bool, out: &mut Vec<Event>) {
        let running = running && !self.game_over;
        if self.running != running {
            self.running = running;
            out.push(Event::RunningChanged { running });
        }
    }

    fn end_game(&mut self, out: &mut Vec<Event>) {
        if self.game_over {
            return;
        }
        self.set_running(false, out);
        self.game_over = true;
        info!(wave = self.wave, score = self.score, "game over");
        out.push(Event::GameOver);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out: &mut Vec<Event>) {
    match command {
        Command::SetRunning { running } => world.set_running(running, out),
        Command::Tick => {
            if world.running && !world.game_over {
                world.frame += 1;
                out.push(Event::TimeAdvanced { frame: world.frame });
            }
        }
        Command::PlaceStructure { cell, structure } => match world.place(cell, structure) {
            Ok(cost) => {
                debug!(?cell, ?structure, cost, "structure placed");
                out.push(Event::StructurePlaced {
                    cell,
                    structure,
                    cost,
                });
                world.repath_enemies(out);
            }
            Err(reason) => {
                warn!(?cell, ?structure, %reason, "placement rejected");
                out.push(Event::PlacementRejected {
                    cell,
                    structure,
                    reason,
                });
            }
        },
        Command::RemoveStructure { cell } => match world.remove(cell) {
            Ok(structure) => {
                debug!(?cell, ?structure, "structure removed");
                out.push(Event::StructureRemoved {
                    cell,
                    structure,
                    refund: structure.refund(),
                });
                world.repath_enemies(out);
            }
            Err(reason) => {
                warn!(?cell, %reason, "removal rejected");
                out.push(Event::RemovalRejected { cell, reason });
            }
        },
        Command::BeginWave { plan } => {
            world.wave = plan.wave;
            info!(
                wave = plan.wave,
                category = ?plan.category,
                count = plan.count,
                "wave started"
            );
            out.push(Event::WaveStarted { plan });
        }
        Command::SpawnEnemy { category, wave } => {
            if world.running && !world.game_over {
                world.spawn(category, wave, out);
            }
        }
        Command::CompleteWave { wave, reward } => {
            if world.game_over {
                return;
            }
            world.money = world.money.saturating_add(reward);
            world.wave = wave + 1;
            info!(wave, reward, "wave cleared");
            out.push(Event::WaveCleared { wave, reward });
            world.set_running(false, out);
        }
    }
}

/// Folds one tick's events into the economy, then culls dead records.
///
/// Leaks cost a life and kills pay their reward into both money and score.
/// Losing the last life ends the game. Consequences are appended to `out`.
pub fn settle(world: &mut World, events: &[Event], out: &mut Vec<Event>) -> CullReport {
    for event in events {
        match event {
            Event::EnemyLeaked { .. } => {
                if world.game_over {
                    continue;
                }
                world.lives = world.lives.saturating_sub(1);
                out.push(Event::LifeLost {
                    remaining: world.lives,
                });
                if world.lives == 0 {
                    world.end_game(out);
                }
            }
            Event::EnemyKilled { reward, .. } => {
                world.money = world.money.saturating_add(*reward);
                world.score = world.score.saturating_add(u64::from(*reward));
            }
            _ => {}
        }
    }
    world.store.cull()
}

/// Restores the world to its freshly created state.
pub fn reset(world: &mut World) {
    let rules = world.rules;
    let mut grid = world.grid.clone();
    let built: Vec<CellCoord> = grid.structures().map(|(cell, _)| cell).collect();
    for cell in built {
        let _ = grid.set_kind(cell, CellKind::Empty);
    }
    let cached_path = find_path(&mut grid, rules.source, rules.target, false);
    *world = World {
        rules,
        grid,
        store: EntityStore::new(),
        money: rules.starting_money,
        lives: rules.starting_lives,
        wave: 1,
        score: 0,
        frame: 0,
        running: false,
        game_over: false,
        cached_path,
    };
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use neon_arcade_core::CellCoord;

    use super::{EntityStore, Grid, LaneRules, World};

    /// Rules the world was created from.
    #[must_use]
    pub fn rules(world: &World) -> &LaneRules {
        &world.rules
    }

    /// Read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Read-only access to the entity collections.
    #[must_use]
    pub fn store(world: &World) -> &EntityStore {
        &world.store
    }

    /// Edge length of a cell in world units.
    #[must_use]
    pub fn cell_size(world: &World) -> f32 {
        world.rules.cell_size
    }

    /// Spendable currency.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Current wave number.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Sum of kill rewards earned so far.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Frames simulated so far.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Reports whether ticks currently advance the simulation.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.running
    }

    /// Reports whether the game has ended.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Current ground route from source to target, refreshed after each edit.
    #[must_use]
    pub fn cached_path(world: &World) -> &[CellCoord] {
        &world.cached_path
    }

    /// Number of enemies that have neither died nor leaked.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.store.live_enemy_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_arcade_core::EmplacementKind;

    fn world() -> World {
        World::new(LaneRules::default()).expect("default rules are valid")
    }

    fn place(world: &mut World, cell: CellCoord, structure: Structure) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::PlaceStructure { cell, structure }, &mut events);
        events
    }

    #[test]
    fn fresh_world_caches_straight_route() {
        let world = world();
        assert_eq!(query::cached_path(&world).len(), 20);
        assert_eq!(query::money(&world), 200);
        assert_eq!(query::lives(&world), 10);
        assert_eq!(query::wave(&world), 1);
    }

    #[test]
    fn placing_an_obstacle_charges_and_detours() {
        let mut world = world();
        let events = place(&mut world, CellCoord::new(10, 7), Structure::Obstacle);
        assert_eq!(
            events,
            vec![Event::StructurePlaced {
                cell: CellCoord::new(10, 7),
                structure: Structure::Obstacle,
                cost: 5,
            }]
        );
        assert_eq!(query::money(&world), 195);
        let path = query::cached_path(&world);
        assert_eq!(path.len(), 22);
        assert!(path.contains(&CellCoord::new(10, 6)) || path.contains(&CellCoord::new(10, 8)));
    }

    #[test]
    fn placement_that_severs_the_path_is_reverted() {
        let mut world = world();
        let target = CellCoord::new(19, 7);
        for cell in [CellCoord::new(19, 6), CellCoord::new(19, 8)] {
            let _ = place(&mut world, cell, Structure::Obstacle);
        }
        let money = query::money(&world);

        let events = place(&mut world, CellCoord::new(18, 7), Structure::Obstacle);

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                cell: CellCoord::new(18, 7),
                structure: Structure::Obstacle,
                reason: PlacementError::WouldSeverPath,
            }]
        );
        assert_eq!(query::money(&world), money);
        assert_eq!(
            query::grid(&world).kind(CellCoord::new(18, 7)),
            Some(CellKind::Empty)
        );
        assert_eq!(query::cached_path(&world).last(), Some(&target));
    }

    #[test]
    fn placement_guards_report_reasons() {
        let mut world = world();
        let sniper = Structure::Emplacement(EmplacementKind::Sniper);

        let _ = place(&mut world, CellCoord::new(3, 3), sniper);
        let events = place(&mut world, CellCoord::new(4, 3), sniper);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::InsufficientFunds {
                    cost: 150,
                    available: 50
                },
                ..
            }]
        ));

        let events = place(&mut world, CellCoord::new(3, 3), Structure::Obstacle);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::Occupied,
                ..
            }]
        ));

        let events = place(&mut world, CellCoord::new(0, 7), Structure::Obstacle);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::Protected,
                ..
            }]
        ));

        let events = place(&mut world, CellCoord::new(25, 7), Structure::Obstacle);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::OutOfBounds,
                ..
            }]
        ));

        let mut scratch = Vec::new();
        apply(&mut world, Command::SetRunning { running: true }, &mut scratch);
        let events = place(&mut world, CellCoord::new(5, 5), Structure::Obstacle);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::WaveInProgress,
                ..
            }]
        ));
    }

    #[test]
    fn removal_refunds_and_drops_emplacement() {
        let mut world = world();
        let cell = CellCoord::new(6, 2);
        let _ = place(&mut world, cell, Structure::Emplacement(EmplacementKind::Turret));
        assert_eq!(query::store(&world).emplacements().len(), 1);
        assert_eq!(query::money(&world), 140);

        let mut events = Vec::new();
        apply(&mut world, Command::RemoveStructure { cell }, &mut events);

        assert_eq!(query::money(&world), 188);
        assert!(query::store(&world).emplacements().is_empty());
        assert_eq!(
            events,
            vec![Event::StructureRemoved {
                cell,
                structure: Structure::Emplacement(EmplacementKind::Turret),
                refund: 48,
            }]
        );

        events.clear();
        apply(&mut world, Command::RemoveStructure { cell }, &mut events);
        assert_eq!(
            events,
            vec![Event::RemovalRejected {
                cell,
                reason: RemovalError::NothingToRemove,
            }]
        );
    }

    #[test]
    fn ticks_only_advance_while_running() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::frame(&world), 0);

        apply(&mut world, Command::SetRunning { running: true }, &mut events);
        apply(&mut world, Command::Tick, &mut events);
        assert_eq!(
            events,
            vec![
                Event::RunningChanged { running: true },
                Event::TimeAdvanced { frame: 1 },
            ]
        );
    }

    #[test]
    fn ground_spawns_follow_the_cached_route() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::SetRunning { running: true }, &mut events);
        apply(
            &mut world,
            Command::SpawnEnemy {
                category: LaneCategory::Basic,
                wave: 1,
            },
            &mut events,
        );
        let enemy = &query::store(&world).enemies()[0];
        assert_eq!(enemy.path.len(), 20);
        assert_eq!(enemy.position, CellCoord::new(0, 7).center(30.0));
        assert!((enemy.vitals.hit_points - 72.0).abs() < 1e-4);
    }

    #[test]
    fn paused_edits_repath_enemies_in_transit() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::SetRunning { running: true }, &mut events);
        apply(
            &mut world,
            Command::SpawnEnemy {
                category: LaneCategory::Basic,
                wave: 1,
            },
            &mut events,
        );
        apply(&mut world, Command::SetRunning { running: false }, &mut events);

        let _ = place(&mut world, CellCoord::new(5, 7), Structure::Obstacle);
        let events = place(&mut world, CellCoord::new(5, 6), Structure::Obstacle);

        let enemy = &query::store(&world).enemies()[0];
        assert!(matches!(events.last(), Some(Event::EnemyRepathed { .. })));
        assert!(!enemy.path.contains(&CellCoord::new(5, 7)));
        assert!(!enemy.path.contains(&CellCoord::new(5, 6)));
    }

    #[test]
    fn boxed_in_enemy_keeps_its_stale_route() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::SetRunning { running: true }, &mut events);
        apply(
            &mut world,
            Command::SpawnEnemy {
                category: LaneCategory::Basic,
                wave: 1,
            },
            &mut events,
        );
        apply(&mut world, Command::SetRunning { running: false }, &mut events);
        world.store_mut().enemies_mut()[0].position = CellCoord::new(5, 2).center(30.0);

        for cell in [
            CellCoord::new(5, 1),
            CellCoord::new(5, 3),
            CellCoord::new(4, 2),
        ] {
            let _ = place(&mut world, cell, Structure::Obstacle);
        }
        let stale = query::store(&world).enemies()[0].path.clone();

        let events = place(&mut world, CellCoord::new(6, 2), Structure::Obstacle);

        let enemy = &query::store(&world).enemies()[0];
        assert_eq!(
            events,
            vec![
                Event::StructurePlaced {
                    cell: CellCoord::new(6, 2),
                    structure: Structure::Obstacle,
                    cost: 5,
                },
                Event::RepathFailed { enemy: enemy.id },
            ]
        );
        assert_eq!(enemy.path, stale);
        assert_eq!(query::cached_path(&world).len(), 20);
    }

    #[test]
    fn sealed_source_skips_ground_spawns_only() {
        let mut world = world();
        for cell in [
            CellCoord::new(1, 7),
            CellCoord::new(0, 6),
            CellCoord::new(0, 8),
        ] {
            let _ = world.grid.set_kind(cell, CellKind::Obstacle);
        }
        let mut events = Vec::new();
        apply(&mut world, Command::SetRunning { running: true }, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::SpawnEnemy {
                category: LaneCategory::Basic,
                wave: 1,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::SpawnSkipped {
                category: LaneCategory::Basic
            }]
        );
        assert_eq!(query::live_enemy_count(&world), 0);

        events.clear();
        apply(
            &mut world,
            Command::SpawnEnemy {
                category: LaneCategory::Air,
                wave: 1,
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::EnemySpawned {
                category: EnemyCategory::Lane(LaneCategory::Air),
                ..
            }]
        ));
        assert_eq!(query::store(&world).enemies()[0].path.len(), 20);
    }

    #[test]
    fn wave_completion_pays_and_stops() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::SetRunning { running: true }, &mut events);
        events.clear();
        apply(
            &mut world,
            Command::CompleteWave {
                wave: 1,
                reward: 60,
            },
            &mut events,
        );
        assert_eq!(query::money(&world), 260);
        assert_eq!(query::wave(&world), 2);
        assert!(!query::is_running(&world));
        assert_eq!(
            events,
            vec![
                Event::WaveCleared {
                    wave: 1,
                    reward: 60
                },
                Event::RunningChanged { running: false },
            ]
        );
    }

    #[test]
    fn settling_leaks_ends_the_game_on_last_life() {
        let mut world = World::new(LaneRules {
            starting_lives: 2,
            ..LaneRules::default()
        })
        .expect("valid rules");
        let mut events = Vec::new();
        apply(&mut world, Command::SetRunning { running: true }, &mut events);
        events.clear();

        let leaks = vec![
            Event::EnemyLeaked {
                enemy: neon_arcade_core::EnemyId::new(0),
            },
            Event::EnemyLeaked {
                enemy: neon_arcade_core::EnemyId::new(1),
            },
        ];
        let _ = settle(&mut world, &leaks, &mut events);

        assert_eq!(query::lives(&world), 0);
        assert!(query::is_game_over(&world));
        assert!(!query::is_running(&world));
        assert_eq!(
            events,
            vec![
                Event::LifeLost { remaining: 1 },
                Event::LifeLost { remaining: 0 },
                Event::RunningChanged { running: false },
                Event::GameOver,
            ]
        );
    }

    #[test]
    fn reset_clears_structures_and_counters() {
        let mut world = world();
        let _ = place(&mut world, CellCoord::new(10, 7), Structure::Obstacle);
        reset(&mut world);
        assert_eq!(query::grid(&world).structures().count(), 0);
        assert_eq!(query::money(&world), 200);
        assert_eq!(query::cached_path(&world).len(), 20);
    }
}
