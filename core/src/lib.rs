#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Neon Arcade simulation.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Two games share this surface: the lane-defense game, where enemies follow
//! grid paths from a source to a target, and the survivor game, where a
//! player avatar roams an open arena while hordes close in.

pub mod dice;
pub mod input;

pub use dice::{Dice, ScriptedDice, SeededDice};
pub use glam::Vec2;
pub use input::{InputState, Key};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Neon Arcade.";

/// Number of fixed simulation steps executed per second of play.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Energy hits drain this many shield points per impact.
pub const ENERGY_SHIELD_DRAIN: f32 = 5.0;

/// Extra reach granted to bullet-versus-enemy checks to cover sprite extent.
pub const BULLET_CONTACT_SLACK: f32 = 10.0;

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a placed emplacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmplacementId(u32);

impl EmplacementId {
    /// Creates a new emplacement identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub const fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Centre of the cell in world units for the provided cell edge length.
    #[must_use]
    pub fn center(self, cell_size: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * cell_size,
            (self.row as f32 + 0.5) * cell_size,
        )
    }

    /// Cell containing the provided world point, or `None` when the point
    /// lies at negative coordinates.
    #[must_use]
    pub fn containing(point: Vec2, cell_size: f32) -> Option<Self> {
        if !(cell_size > 0.0) || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / cell_size).floor();
        let row = (point.y / cell_size).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(Self::new(column as u32, row as u32))
    }
}

/// Category of damage carried by a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Physical slugs; blocked by shields point-for-point, halved armor applies.
    Kinetic,
    /// Beams; burn through shields and suffer full armor reduction.
    Energy,
    /// Warheads; ignore armor entirely.
    Explosive,
}

/// Enumerates the emplacements the player can build on the lane grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmplacementKind {
    /// Balanced kinetic emplacement.
    Turret,
    /// Long-range explosive emplacement with a slow reload.
    Sniper,
    /// Short-range energy emplacement with a very fast cycle.
    Blaster,
}

impl EmplacementKind {
    /// Every emplacement kind in catalog order.
    pub const ALL: [EmplacementKind; 3] = [Self::Turret, Self::Sniper, Self::Blaster];

    /// Static combat profile associated with the kind.
    #[must_use]
    pub const fn stats(self) -> EmplacementStats {
        match self {
            Self::Turret => EmplacementStats {
                range_in_cells: 4.0,
                damage: 25.0,
                cooldown_frames: 40,
                cost: 60,
                damage_kind: DamageKind::Kinetic,
                projectile_speed: 12.0,
            },
            Self::Sniper => EmplacementStats {
                range_in_cells: 9.0,
                damage: 150.0,
                cooldown_frames: 150,
                cost: 150,
                damage_kind: DamageKind::Explosive,
                projectile_speed: 12.0,
            },
            Self::Blaster => EmplacementStats {
                range_in_cells: 3.5,
                damage: 6.0,
                cooldown_frames: 6,
                cost: 220,
                damage_kind: DamageKind::Energy,
                projectile_speed: 12.0,
            },
        }
    }
}

/// Combat profile shared by every emplacement of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmplacementStats {
    /// Engagement radius measured in cells.
    pub range_in_cells: f32,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Frames that must elapse between consecutive shots.
    pub cooldown_frames: u64,
    /// Currency required to build the emplacement.
    pub cost: u32,
    /// Damage category of fired projectiles.
    pub damage_kind: DamageKind,
    /// Travel speed of fired projectiles in world units per frame.
    pub projectile_speed: f32,
}

impl EmplacementStats {
    /// Engagement radius converted into world units.
    #[must_use]
    pub fn range_in_units(&self, cell_size: f32) -> f32 {
        self.range_in_cells * cell_size
    }
}

/// Anything the player can build on an empty lane cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Structure {
    /// Inert wall that only reshapes the path.
    Obstacle,
    /// Firing emplacement of the provided kind.
    Emplacement(EmplacementKind),
}

impl Structure {
    /// Currency charged when the structure is built.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Obstacle => 5,
            Self::Emplacement(kind) => kind.stats().cost,
        }
    }

    /// Currency returned when the structure is removed (80% of cost, floored).
    #[must_use]
    pub const fn refund(self) -> u32 {
        self.cost() * 4 / 5
    }
}

/// Type tag stored in every grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open ground.
    Empty,
    /// Player-built wall.
    Obstacle,
    /// Cell where lane enemies enter.
    Source,
    /// Cell lane enemies try to reach.
    Target,
    /// Cell holding an emplacement.
    Emplacement(EmplacementKind),
}

impl CellKind {
    /// Reports whether ground units may not enter the cell.
    #[must_use]
    pub const fn blocks_ground(self) -> bool {
        matches!(self, Self::Obstacle | Self::Emplacement(_))
    }

    /// Reports whether the cell belongs to the fixed lane endpoints.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Source | Self::Target)
    }

    /// Structure occupying the cell, if any.
    #[must_use]
    pub const fn structure(self) -> Option<Structure> {
        match self {
            Self::Obstacle => Some(Structure::Obstacle),
            Self::Emplacement(kind) => Some(Structure::Emplacement(kind)),
            Self::Empty | Self::Source | Self::Target => None,
        }
    }
}

impl From<Structure> for CellKind {
    fn from(structure: Structure) -> Self {
        match structure {
            Structure::Obstacle => Self::Obstacle,
            Structure::Emplacement(kind) => Self::Emplacement(kind),
        }
    }
}

/// Base statistics for one enemy category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    /// Hit points before wave or level scaling.
    pub hit_points: f32,
    /// Movement speed in world units per frame.
    pub speed: f32,
    /// Starting shield points.
    pub shield: f32,
    /// Flat armor value.
    pub armor: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Currency (lane) or experience (horde) granted on death.
    pub reward: u32,
    /// Damage dealt to the avatar on contact.
    pub contact_damage: f32,
}

impl EnemyProfile {
    /// Builds fresh vitals, scaling hit points by the provided factor.
    #[must_use]
    pub fn vitals(&self, hit_point_scale: f32) -> Vitals {
        Vitals::new(self.hit_points * hit_point_scale, self.shield, self.armor)
    }
}

/// Enemy categories of the lane-defense game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneCategory {
    /// Baseline walker with light armor.
    Basic,
    /// Fragile, fast and shielded.
    Swarm,
    /// Slow and heavily armored.
    Tank,
    /// Flies straight over every structure.
    Air,
}

impl LaneCategory {
    /// Static profile of the category.
    #[must_use]
    pub const fn profile(self) -> EnemyProfile {
        match self {
            Self::Basic => EnemyProfile {
                hit_points: 60.0,
                speed: 1.5,
                shield: 0.0,
                armor: 2.0,
                radius: 8.0,
                reward: 5,
                contact_damage: 0.0,
            },
            Self::Swarm => EnemyProfile {
                hit_points: 20.0,
                speed: 2.5,
                shield: 2.0,
                armor: 0.0,
                radius: 5.0,
                reward: 5,
                contact_damage: 0.0,
            },
            Self::Tank => EnemyProfile {
                hit_points: 300.0,
                speed: 0.8,
                shield: 0.0,
                armor: 20.0,
                radius: 12.0,
                reward: 15,
                contact_damage: 0.0,
            },
            Self::Air => EnemyProfile {
                hit_points: 60.0,
                speed: 2.0,
                shield: 0.0,
                armor: 0.0,
                radius: 8.0,
                reward: 5,
                contact_damage: 0.0,
            },
        }
    }

    /// Reports whether the category ignores obstacles when routing.
    #[must_use]
    pub const fn is_aerial(self) -> bool {
        matches!(self, Self::Air)
    }
}

/// Enemy categories of the survivor game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HordeCategory {
    /// Common chaser.
    Grunt,
    /// Small and fast.
    Rusher,
    /// Rare heavyweight.
    Brute,
}

impl HordeCategory {
    /// Static profile of the category before level scaling.
    #[must_use]
    pub const fn profile(self) -> EnemyProfile {
        match self {
            Self::Grunt => EnemyProfile {
                hit_points: 20.0,
                speed: 1.5,
                shield: 0.0,
                armor: 0.0,
                radius: 10.0,
                reward: 1,
                contact_damage: 10.0,
            },
            Self::Rusher => EnemyProfile {
                hit_points: 10.0,
                speed: 3.5,
                shield: 0.0,
                armor: 0.0,
                radius: 8.0,
                reward: 3,
                contact_damage: 10.0,
            },
            Self::Brute => EnemyProfile {
                hit_points: 100.0,
                speed: 0.8,
                shield: 0.0,
                armor: 0.0,
                radius: 20.0,
                reward: 10,
                contact_damage: 10.0,
            },
        }
    }
}

/// Category tag carried by every enemy record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyCategory {
    /// Lane-defense walker or flyer.
    Lane(LaneCategory),
    /// Survivor horde member.
    Horde(HordeCategory),
}

impl EnemyCategory {
    /// Static profile of the wrapped category.
    #[must_use]
    pub const fn profile(self) -> EnemyProfile {
        match self {
            Self::Lane(category) => category.profile(),
            Self::Horde(category) => category.profile(),
        }
    }

    /// Reports whether the enemy ignores obstacles when routing.
    #[must_use]
    pub const fn is_aerial(self) -> bool {
        match self {
            Self::Lane(category) => category.is_aerial(),
            Self::Horde(_) => false,
        }
    }
}

/// Damage-absorbing state of an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vitals {
    /// Remaining hit points.
    pub hit_points: f32,
    /// Hit points at full health.
    pub max_hit_points: f32,
    /// Remaining shield points.
    pub shield: f32,
    /// Flat armor value.
    pub armor: f32,
}

impl Vitals {
    /// Creates vitals at full health.
    #[must_use]
    pub const fn new(hit_points: f32, shield: f32, armor: f32) -> Self {
        Self {
            hit_points,
            max_hit_points: hit_points,
            shield,
            armor,
        }
    }

    /// Reports whether hit points have run out.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.hit_points <= 0.0
    }
}

/// Hit point multiplier of lane enemies released in the provided wave.
#[must_use]
pub fn lane_hit_point_scale(wave: u32) -> f32 {
    1.0 + 0.2 * wave as f32
}

/// Spawn schedule for one lane wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WavePlan {
    /// One-based wave number.
    pub wave: u32,
    /// Category released for the whole wave.
    pub category: LaneCategory,
    /// Number of enemies released.
    pub count: u32,
    /// Frames between releases.
    pub interval_frames: u64,
}

impl WavePlan {
    /// Currency granted once the wave is cleared.
    #[must_use]
    pub const fn clear_reward(&self) -> u32 {
        50 + 10 * self.wave
    }
}

/// Survivor upgrades offered at level-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Increases weapon damage.
    Damage,
    /// Shortens the weapon fire interval.
    FireRate,
    /// Strengthens avatar acceleration.
    MoveSpeed,
    /// Raises maximum hit points and heals.
    Hull,
    /// Adds one projectile per volley.
    Multishot,
}

impl UpgradeKind {
    /// Every upgrade in catalog order.
    pub const ALL: [UpgradeKind; 5] = [
        Self::Damage,
        Self::FireRate,
        Self::MoveSpeed,
        Self::Hull,
        Self::Multishot,
    ];

    /// Stable identifier hosts use when reporting a selection.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::FireRate => "fire_rate",
            Self::MoveSpeed => "move_speed",
            Self::Hull => "hull",
            Self::Multishot => "multishot",
        }
    }

    /// Resolves a host-provided identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

/// Lifecycle state of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Simulation is idle and waiting for the host to start it.
    Menu,
    /// Simulation advances on every tick.
    Running,
    /// Simulation is frozen until the host picks an upgrade.
    PausedForUpgrade,
    /// Terminal state until the host restarts.
    GameOver,
}

/// Commands that express all permissible lane-world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Opens or closes the gate that lets ticks advance the simulation.
    SetRunning {
        /// Whether ticks should advance the simulation.
        running: bool,
    },
    /// Advances the simulation clock by one frame.
    Tick,
    /// Requests construction of a structure on an empty cell.
    PlaceStructure {
        /// Cell that should receive the structure.
        cell: CellCoord,
        /// Structure to build.
        structure: Structure,
    },
    /// Requests demolition of the structure on a cell.
    RemoveStructure {
        /// Cell whose structure should be removed.
        cell: CellCoord,
    },
    /// Announces the schedule of the wave that is about to start.
    BeginWave {
        /// Schedule for the wave.
        plan: WavePlan,
    },
    /// Requests that one enemy enter at the source cell.
    SpawnEnemy {
        /// Category of the new enemy.
        category: LaneCategory,
        /// Wave the enemy belongs to, used for hit point scaling.
        wave: u32,
    },
    /// Closes the active wave and pays its reward.
    CompleteWave {
        /// Wave being closed.
        wave: u32,
        /// Currency granted for clearing it.
        reward: u32,
    },
}

/// Events broadcast after processing commands or running systems.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Frame index reached after the advance.
        frame: u64,
    },
    /// Announces that the running gate changed.
    RunningChanged {
        /// New value of the gate.
        running: bool,
    },
    /// Confirms that a structure was built.
    StructurePlaced {
        /// Cell that received the structure.
        cell: CellCoord,
        /// Structure that was built.
        structure: Structure,
        /// Currency spent.
        cost: u32,
    },
    /// Confirms that a structure was removed.
    StructureRemoved {
        /// Cell that was cleared.
        cell: CellCoord,
        /// Structure that was removed.
        structure: Structure,
        /// Currency returned.
        refund: u32,
    },
    /// Reports that a placement request was refused.
    PlacementRejected {
        /// Cell named by the request.
        cell: CellCoord,
        /// Structure named by the request.
        structure: Structure,
        /// Reason the request failed.
        reason: PlacementError,
    },
    /// Reports that a removal request was refused.
    RemovalRejected {
        /// Cell named by the request.
        cell: CellCoord,
        /// Reason the request failed.
        reason: RemovalError,
    },
    /// Announces that a wave began releasing enemies.
    WaveStarted {
        /// Schedule of the wave.
        plan: WavePlan,
    },
    /// Announces that every enemy of a wave has been resolved.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
        /// Currency granted.
        reward: u32,
    },
    /// Confirms that an enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Category of the enemy.
        category: EnemyCategory,
        /// Entry position in world units.
        position: Vec2,
    },
    /// Reports that a ground spawn found no route and was skipped.
    SpawnSkipped {
        /// Category that could not be released.
        category: LaneCategory,
    },
    /// Reports that an enemy adopted a fresh route after a grid edit.
    EnemyRepathed {
        /// Enemy that was re-routed.
        enemy: EnemyId,
        /// Number of cells left on the new route.
        remaining_cells: usize,
    },
    /// Reports that re-routing failed and the enemy kept its previous route.
    RepathFailed {
        /// Enemy whose route is now stale.
        enemy: EnemyId,
    },
    /// Reports that an enemy exhausted its route and reached the target.
    EnemyLeaked {
        /// Enemy that reached the target.
        enemy: EnemyId,
    },
    /// Reports that the player lost a life.
    LifeLost {
        /// Lives left afterwards.
        remaining: u32,
    },
    /// Reports that a projectile left its muzzle.
    ProjectileFired {
        /// Muzzle position in world units.
        origin: Vec2,
        /// Enemy the projectile homes on, if any.
        target: Option<EnemyId>,
        /// Damage category of the projectile.
        damage_kind: DamageKind,
    },
    /// Reports a projectile impact; hosts draw damage numbers from it.
    EnemyHit {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Hit points removed by the impact.
        damage: f32,
        /// Shield points drained by the impact.
        shield_drained: f32,
        /// Impact position in world units.
        position: Vec2,
    },
    /// Reports that an enemy ran out of hit points.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Category of the enemy.
        category: EnemyCategory,
        /// Currency or experience granted.
        reward: u32,
        /// Position of death in world units.
        position: Vec2,
    },
    /// Reports contact damage dealt to the survivor avatar.
    AvatarDamaged {
        /// Hit points removed.
        amount: f32,
        /// Hit points left afterwards.
        remaining: f32,
    },
    /// Reports that the avatar collected an experience pickup.
    PickupCollected {
        /// Experience granted.
        value: u32,
    },
    /// Reports that the avatar reached a new level and must choose an upgrade.
    LevelUp {
        /// Level reached.
        level: u32,
        /// Upgrades on offer.
        options: Vec<UpgradeKind>,
    },
    /// Confirms that an upgrade was applied and the run resumed.
    UpgradeApplied {
        /// Upgrade that was applied.
        upgrade: UpgradeKind,
    },
    /// Announces that the run ended.
    GameOver,
}

/// Reasons a structure placement can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// Edits are locked while a wave is running.
    #[error("cannot build while a wave is in progress")]
    WaveInProgress,
    /// Edits are locked once the game has ended.
    #[error("cannot build after the game has ended")]
    GameOver,
    /// The cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The cell already holds a structure.
    #[error("cell is already occupied")]
    Occupied,
    /// The cell is the source or the target.
    #[error("source and target cells cannot be built on")]
    Protected,
    /// The player cannot afford the structure.
    #[error("structure costs {cost} but only {available} is available")]
    InsufficientFunds {
        /// Price of the structure.
        cost: u32,
        /// Currency held by the player.
        available: u32,
    },
    /// The structure would disconnect the source from the target.
    #[error("structure would block the only path")]
    WouldSeverPath,
}

/// Reasons a structure removal can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum RemovalError {
    /// Edits are locked while a wave is running.
    #[error("cannot demolish while a wave is in progress")]
    WaveInProgress,
    /// Edits are locked once the game has ended.
    #[error("cannot demolish after the game has ended")]
    GameOver,
    /// The cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The cell is the source or the target.
    #[error("source and target cells cannot be demolished")]
    Protected,
    /// The cell holds no structure.
    #[error("nothing to remove")]
    NothingToRemove,
}

/// Reasons an upgrade selection can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum UpgradeError {
    /// The run is not waiting for an upgrade choice.
    #[error("no upgrade choice is pending")]
    NotPaused,
    /// The upgrade is not among the current offers.
    #[error("upgrade `{}` is not on offer", .0.id())]
    NotOffered(UpgradeKind),
}

/// Reasons a grid layout is invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GridError {
    /// The grid has no columns or no rows.
    #[error("grid needs at least one column and one row")]
    Empty,
    /// An endpoint lies outside the grid.
    #[error("cell ({}, {}) lies outside the grid", .0.column(), .0.row())]
    OutOfBounds(CellCoord),
    /// Source and target share a cell.
    #[error("source and target must be distinct cells")]
    Coincident,
}

/// Frame summary hosts paint into their HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Frames simulated so far.
    pub frame: u64,
    /// Accumulated score.
    pub score: u64,
    /// Spendable currency (lane game).
    pub money: u32,
    /// Remaining lives (lane game).
    pub lives: u32,
    /// Current wave number (lane game).
    pub wave: u32,
    /// Avatar level (survivor game).
    pub level: u32,
    /// Avatar hit points (survivor game).
    pub hit_points: f32,
    /// Avatar maximum hit points (survivor game).
    pub max_hit_points: f32,
    /// Experience collected towards the next level (survivor game).
    pub experience: u32,
    /// Experience required for the next level (survivor game).
    pub experience_threshold: u32,
    /// Lifecycle state.
    pub state: RunState,
    /// Upgrades on offer while paused for a choice.
    pub upgrade_options: Vec<UpgradeKind>,
    /// Schedule of the next lane wave, shown while building.
    pub next_wave: Option<WavePlan>,
}

impl HudSnapshot {
    /// Reports whether the run has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state == RunState::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = CellCoord::new(0, 7);
        let b = CellCoord::new(19, 3);
        assert_eq!(a.manhattan_distance(b), 23);
        assert_eq!(b.manhattan_distance(a), 23);
    }

    #[test]
    fn refunds_floor_eighty_percent_of_cost() {
        assert_eq!(Structure::Obstacle.refund(), 4);
        assert_eq!(Structure::Emplacement(EmplacementKind::Turret).refund(), 48);
        assert_eq!(Structure::Emplacement(EmplacementKind::Sniper).refund(), 120);
        assert_eq!(Structure::Emplacement(EmplacementKind::Blaster).refund(), 176);
    }

    #[test]
    fn containing_cell_floors_world_coordinates() {
        assert_eq!(
            CellCoord::containing(Vec2::new(59.9, 30.0), 30.0),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(CellCoord::containing(Vec2::new(-0.1, 5.0), 30.0), None);
        assert_eq!(
            CellCoord::new(2, 3).center(30.0),
            Vec2::new(75.0, 105.0),
            "centre sits half a cell in"
        );
    }

    #[test]
    fn only_walls_and_emplacements_block_ground_units() {
        assert!(CellKind::Obstacle.blocks_ground());
        assert!(CellKind::Emplacement(EmplacementKind::Sniper).blocks_ground());
        assert!(!CellKind::Source.blocks_ground());
        assert!(!CellKind::Target.blocks_ground());
        assert!(!CellKind::Empty.blocks_ground());
    }

    #[test]
    fn upgrade_ids_round_trip_through_lookup() {
        for kind in UpgradeKind::ALL {
            assert_eq!(UpgradeKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(UpgradeKind::from_id("warp_drive"), None);
    }

    #[test]
    fn wave_plan_scales_with_wave_number() {
        let plan = WavePlan {
            wave: 5,
            category: LaneCategory::Tank,
            count: 4,
            interval_frames: 120,
        };
        assert_eq!(plan.clear_reward(), 100);
        assert!((lane_hit_point_scale(plan.wave) - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn error_messages_name_the_problem() {
        let error = PlacementError::InsufficientFunds {
            cost: 150,
            available: 20,
        };
        assert_eq!(
            error.to_string(),
            "structure costs 150 but only 20 is available"
        );
        assert_eq!(
            UpgradeError::NotOffered(UpgradeKind::Hull).to_string(),
            "upgrade `hull` is not on offer"
        );
    }
}
