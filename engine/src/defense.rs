use neon_arcade_core::{
    CellCoord, CellKind, Command, Event, GridError, HudSnapshot, InputState, Key,
    PlacementError, RemovalError, RunState, SeededDice, Structure, Vec2,
};
use neon_arcade_system_builder::{Builder, BuilderInput};
use neon_arcade_system_combat::Combat;
use neon_arcade_system_physics::Physics;
use neon_arcade_system_spawning::WaveController;
use neon_arcade_world::{self as world, query, World};
use tracing::debug;

use crate::{config::LaneConfig, Simulation};

/// Lane-defense game: build a maze between waves, then watch it hold.
#[derive(Debug)]
pub struct DefenseEngine {
    world: World,
    waves: WaveController,
    builder: Builder,
    physics: Physics,
    combat: Combat,
    dice: SeededDice,
    seed: u64,
    input: InputState,
    published: Vec<Event>,
}

impl DefenseEngine {
    /// Creates a game from validated configuration.
    pub fn new(config: &LaneConfig, seed: u64) -> Result<Self, GridError> {
        Ok(Self {
            world: World::new(config.rules())?,
            waves: WaveController::new(),
            builder: Builder::new(),
            physics: Physics::default(),
            combat: Combat::new(config.combat()),
            dice: SeededDice::new(seed),
            seed,
            input: InputState::default(),
            published: Vec::new(),
        })
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Structure placed by the next click.
    #[must_use]
    pub fn selected_tool(&self) -> Structure {
        self.builder.tool()
    }

    /// Selects the structure placed by subsequent clicks.
    pub fn select_tool(&mut self, tool: Structure) {
        self.builder.select_tool(tool);
    }

    /// Structures currently on the grid, in row-major order.
    #[must_use]
    pub fn structures(&self) -> Vec<(CellCoord, Structure)> {
        query::grid(&self.world).structures().collect()
    }

    /// Builds `structure` on `cell` and returns the amount paid.
    pub fn try_place(
        &mut self,
        cell: CellCoord,
        structure: Structure,
    ) -> Result<u32, PlacementError> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlaceStructure { cell, structure },
            &mut events,
        );
        let outcome = events.iter().find_map(|event| match event {
            Event::StructurePlaced { cost, .. } => Some(Ok(*cost)),
            Event::PlacementRejected { reason, .. } => Some(Err(*reason)),
            _ => None,
        });
        self.published.extend(events);
        outcome.unwrap_or(Err(PlacementError::OutOfBounds))
    }

    /// Demolishes the structure on `cell` and returns it.
    pub fn try_remove(&mut self, cell: CellCoord) -> Result<Structure, RemovalError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::RemoveStructure { cell }, &mut events);
        let outcome = events.iter().find_map(|event| match event {
            Event::StructureRemoved { structure, .. } => Some(Ok(*structure)),
            Event::RemovalRejected { reason, .. } => Some(Err(*reason)),
            _ => None,
        });
        self.published.extend(events);
        outcome.unwrap_or(Err(RemovalError::NothingToRemove))
    }

    fn run_commands(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    fn control_waves(&mut self, events: &mut Vec<Event>, live_enemies: usize) {
        let mut commands = Vec::new();
        self.waves.handle(events, live_enemies, &mut commands);
        self.run_commands(commands, events);
    }
}

impl Simulation for DefenseEngine {
    fn game_name(&self) -> &'static str {
        "gridlock"
    }

    fn set_running(&mut self, running: bool) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::SetRunning { running }, &mut events);
        let live = query::live_enemy_count(&self.world);
        self.control_waves(&mut events, live);
        self.published.extend(events);
    }

    fn tick(&mut self) -> HudSnapshot {
        if !query::is_running(&self.world) {
            return self.snapshot();
        }

        let live = query::live_enemy_count(&self.world);
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);
        self.control_waves(&mut events, live);

        if query::is_running(&self.world) {
            let frame = query::frame(&self.world);
            let cell_size = query::cell_size(&self.world);
            let store = self.world.store_mut();
            self.physics.advance_lane(store, cell_size, &mut events);
            self.combat
                .fire_emplacements(store, frame, cell_size, &mut events);
            self.combat
                .resolve_homing_impacts(store, &mut self.dice, &mut events);
        }

        let mut consequences = Vec::new();
        let report = world::settle(&mut self.world, &events, &mut consequences);
        if report.enemies > 0 {
            debug!(culled = report.enemies, "enemies removed");
        }
        events.extend(consequences);
        self.published.extend(events);
        self.snapshot()
    }

    fn handle_pointer(&mut self, x: f32, y: f32, pressed: bool) {
        let position = Vec2::new(x, y);
        let world = &self.world;
        let cell = query::grid(world).cell_at(position, query::cell_size(world));
        let mut commands = Vec::new();
        self.builder.handle(
            BuilderInput::new(pressed, cell),
            |cell| query::grid(world).kind(cell).and_then(CellKind::structure),
            &mut commands,
        );
        let mut events = Vec::new();
        self.run_commands(commands, &mut events);
        self.published.extend(events);
    }

    fn handle_key(&mut self, code: &str, pressed: bool) {
        let Some(key) = Key::from_code(code) else {
            return;
        };
        let was_held = self.input.is_held(key);
        self.input.key(code, pressed);
        if !pressed || was_held {
            return;
        }
        match key {
            Key::Space => {
                let running = query::is_running(&self.world);
                self.set_running(!running);
            }
            Key::Digit(digit) => {
                if let Some(tool) = Builder::tool_for_digit(digit) {
                    self.builder.select_tool(tool);
                }
            }
            Key::Up | Key::Down | Key::Left | Key::Right => {}
        }
    }

    fn snapshot(&self) -> HudSnapshot {
        let world = &self.world;
        let state = if query::is_game_over(world) {
            RunState::GameOver
        } else if query::is_running(world) {
            RunState::Running
        } else {
            RunState::Menu
        };
        HudSnapshot {
            frame: query::frame(world),
            score: query::score(world),
            money: query::money(world),
            lives: query::lives(world),
            wave: query::wave(world),
            level: 0,
            hit_points: 0.0,
            max_hit_points: 0.0,
            experience: 0,
            experience_threshold: 0,
            state,
            upgrade_options: Vec::new(),
            next_wave: (state != RunState::GameOver).then(|| self.waves.plan()),
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.published)
    }

    fn restart(&mut self) {
        world::reset(&mut self.world);
        self.waves.reset();
        self.builder = Builder::new();
        self.dice = SeededDice::new(self.seed);
        self.input.clear();
        self.published.clear();
    }
}
