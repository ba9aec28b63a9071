use neon_arcade_core::{
    EnemyCategory, Event, HudSnapshot, InputState, Key, RunState, SeededDice, UpgradeError,
    UpgradeKind,
};
use neon_arcade_system_combat::Combat;
use neon_arcade_system_physics::Physics;
use neon_arcade_system_progression::Progression;
use neon_arcade_system_spawning::HordeSpawner;
use neon_arcade_world::{Arena, EnemySpawn};
use tracing::debug;

use crate::{config::SurvivorConfig, Simulation};

const SCORE_PER_REWARD: u64 = 10;

/// Survivor game: steer the avatar through an endless horde and level up.
#[derive(Debug)]
pub struct SurvivorEngine {
    arena: Arena,
    spawner: HordeSpawner,
    physics: Physics,
    combat: Combat,
    progression: Progression,
    dice: SeededDice,
    seed: u64,
    input: InputState,
    host_paused: bool,
    published: Vec<Event>,
}

impl SurvivorEngine {
    /// Creates a game waiting in the menu.
    #[must_use]
    pub fn new(config: &SurvivorConfig, seed: u64) -> Self {
        Self {
            arena: Arena::new(config.rules()),
            spawner: config.spawner(),
            physics: Physics::new(config.physics()),
            combat: Combat::new(config.combat()),
            progression: Progression::new(config.progression()),
            dice: SeededDice::new(seed),
            seed,
            input: InputState::default(),
            host_paused: false,
            published: Vec::new(),
        }
    }

    /// Arena holding the avatar and the horde.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.progression.state()
    }

    /// Leaves the menu and starts the run.
    pub fn start(&mut self) {
        self.set_running(true);
    }

    /// Applies one of the offered upgrades and resumes the run.
    pub fn select_upgrade(&mut self, upgrade: UpgradeKind) -> Result<(), UpgradeError> {
        let mut events = Vec::new();
        let result = self.progression.select(
            upgrade,
            self.arena.avatar_mut(),
            &mut self.dice,
            &mut events,
        );
        self.published.extend(events);
        result
    }

    fn spawn(&mut self, frame: u64, events: &mut Vec<Event>) {
        let (level, position) = (self.arena.avatar().level, self.arena.avatar().position);
        let Some(request) = self.spawner.poll(frame, level, position, &mut self.dice) else {
            return;
        };
        let category = EnemyCategory::Horde(request.category);
        let enemy = self.arena.store_mut().spawn_enemy(EnemySpawn {
            category,
            position: request.position,
            hit_point_scale: request.hit_point_scale,
            path: Vec::new(),
        });
        debug!(enemy = enemy.get(), ?category, "horde enemy spawned");
        events.push(Event::EnemySpawned {
            enemy,
            category,
            position: request.position,
        });
    }
}

impl Simulation for SurvivorEngine {
    fn game_name(&self) -> &'static str {
        "neon-survivor"
    }

    fn set_running(&mut self, running: bool) {
        let mut events = Vec::new();
        if running {
            self.progression.start(&mut events);
        }
        if self.host_paused == running {
            self.host_paused = !running;
            if self.progression.state() == RunState::Running && events.is_empty() {
                events.push(Event::RunningChanged { running });
            }
        }
        self.published.extend(events);
    }

    fn tick(&mut self) -> HudSnapshot {
        if self.host_paused || !self.progression.is_simulating() {
            return self.snapshot();
        }

        let frame = self.arena.advance_frame();
        let mut events = vec![Event::TimeAdvanced { frame }];
        self.spawn(frame, &mut events);

        self.physics
            .advance_arena(&mut self.arena, self.input.movement_axis());
        {
            let (avatar, store) = self.arena.parts_mut();
            self.combat.fire_weapon(avatar, store, frame, &mut events);
            self.combat
                .resolve_bullet_contacts(store, &mut self.dice, &mut events);
        }
        self.physics.resolve_contacts(&mut self.arena, &mut events);
        self.physics.collect_pickups(&mut self.arena, &mut events);

        for event in &events {
            if let Event::EnemyKilled { reward, .. } = event {
                self.arena.add_score(u64::from(*reward) * SCORE_PER_REWARD);
            }
        }

        let mut consequences = Vec::new();
        self.progression.handle(
            &events,
            self.arena.avatar_mut(),
            &mut self.dice,
            &mut consequences,
        );
        events.extend(consequences);
        let _ = self.arena.store_mut().cull();

        self.published.extend(events);
        self.snapshot()
    }

    fn handle_pointer(&mut self, _x: f32, _y: f32, _pressed: bool) {}

    fn handle_key(&mut self, code: &str, pressed: bool) {
        let Some(key) = Key::from_code(code) else {
            return;
        };
        let was_held = self.input.is_held(key);
        self.input.key(code, pressed);
        if !pressed || was_held {
            return;
        }
        match (key, self.progression.state()) {
            (Key::Space, RunState::Menu) => self.start(),
            (Key::Space, RunState::Running) => self.set_running(self.host_paused),
            (Key::Digit(digit), RunState::PausedForUpgrade) => {
                let offer = usize::from(digit)
                    .checked_sub(1)
                    .and_then(|index| self.progression.offers().get(index).copied());
                if let Some(upgrade) = offer {
                    let _ = self.select_upgrade(upgrade);
                }
            }
            _ => {}
        }
    }

    fn snapshot(&self) -> HudSnapshot {
        let avatar = self.arena.avatar();
        HudSnapshot {
            frame: self.arena.frame(),
            score: self.arena.score(),
            money: 0,
            lives: 0,
            wave: 0,
            level: avatar.level,
            hit_points: avatar.vitals.hit_points.max(0.0),
            max_hit_points: avatar.vitals.max_hit_points,
            experience: avatar.experience,
            experience_threshold: avatar.experience_threshold,
            state: self.progression.state(),
            upgrade_options: self.progression.offers().to_vec(),
            next_wave: None,
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.published)
    }

    fn restart(&mut self) {
        self.arena.reset();
        self.progression.reset();
        self.dice = SeededDice::new(self.seed);
        self.input.clear();
        self.host_paused = false;
        self.published.clear();
    }
}
